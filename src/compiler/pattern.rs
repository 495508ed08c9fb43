//! 编译后模式模型

use regex::Regex;

use crate::rule::Category;

#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String), // 包含匹配（触发词已转小写，输入需先转小写）
    Regex(Regex),     // 正则匹配（忽略大小写）
}

impl Matcher {
    /// 匹配已转小写的输入
    pub fn is_match(&self, lowered: &str) -> bool {
        match self {
            Matcher::Contains(s) => lowered.contains(s.as_str()),
            Matcher::Regex(regex) => regex.is_match(lowered),
        }
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        match self {
            Matcher::Contains(s) => s,
            Matcher::Regex(r) => r.as_str(),
        }
    }
}

/// 编译后的关键词规则
#[derive(Debug, Clone)]
pub struct CompiledKeywordRule {
    pub category: Category,
    pub matchers: Vec<Matcher>,
}

impl CompiledKeywordRule {
    /// 任一触发词命中
    pub fn is_match(&self, lowered: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(lowered))
    }

    /// 命中的触发词数量
    pub fn match_count(&self, lowered: &str) -> usize {
        self.matchers.iter().filter(|m| m.is_match(lowered)).count()
    }
}

/// 编译后的规则集，保持优先级顺序
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleSet {
    pub rules: Vec<CompiledKeywordRule>,
}

impl CompiledRuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
