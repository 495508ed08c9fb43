//! 规则编译器核心
//! 仅负责将关键词规则编译为可执行的匹配模式

use std::time::Instant;

use regex::RegexBuilder;
use tracing::{debug, warn};

use super::pattern::{CompiledKeywordRule, CompiledRuleSet, Matcher};
use crate::error::{RscResult, RscategorizerError};
use crate::rule::{KeywordRule, RuleLibrary};

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则库
    pub fn compile(rule_lib: &RuleLibrary) -> RscResult<CompiledRuleSet> {
        let start = Instant::now();
        let mut stats = CompileStats::default();
        let mut rules = Vec::with_capacity(rule_lib.rules.len());

        for rule in &rule_lib.rules {
            if let Some(compiled) = Self::compile_rule(rule, &mut stats)? {
                rules.push(compiled);
            }
        }

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：规则{}条、子串触发词{}条、正则触发词{}条、跳过{}条",
            rules.len(),
            stats.contains_count,
            stats.regex_count,
            stats.skipped_count
        );

        Ok(CompiledRuleSet { rules })
    }

    /// 编译单条关键词规则，全部触发词无效时返回 None
    fn compile_rule(rule: &KeywordRule, stats: &mut CompileStats) -> RscResult<Option<CompiledKeywordRule>> {
        if rule.triggers.is_empty() {
            return Err(RscategorizerError::RuleParseError(format!(
                "规则 [{}] 未包含任何触发词",
                rule.category
            )));
        }

        let mut matchers = Vec::with_capacity(rule.triggers.len());
        for trigger in &rule.triggers {
            match Self::compile_trigger(trigger) {
                Ok(Matcher::Contains(s)) => {
                    stats.contains_count += 1;
                    matchers.push(Matcher::Contains(s));
                }
                Ok(Matcher::Regex(r)) => {
                    stats.regex_count += 1;
                    matchers.push(Matcher::Regex(r));
                }
                Err(e) => {
                    stats.skipped_count += 1;
                    warn!("分类 [{}] 的触发词 {:?} 无效，已跳过：{}", rule.category, trigger, e);
                }
            }
        }

        if matchers.is_empty() {
            warn!("分类 [{}] 的规则没有可用触发词，已跳过", rule.category);
            return Ok(None);
        }

        Ok(Some(CompiledKeywordRule {
            category: rule.category,
            matchers,
        }))
    }

    /// 编译单个触发词：`/.../` 为正则，其余为小写子串
    fn compile_trigger(raw: &str) -> RscResult<Matcher> {
        let trimmed = raw.trim();

        if trimmed.len() > 2 && trimmed.starts_with('/') && trimmed.ends_with('/') {
            let regex = RegexBuilder::new(&trimmed[1..trimmed.len() - 1])
                .case_insensitive(true)
                .build()?;
            return Ok(Matcher::Regex(regex));
        }

        if trimmed.is_empty() {
            return Err(RscategorizerError::InvalidInput("触发词为空".to_string()));
        }

        Ok(Matcher::Contains(trimmed.to_lowercase()))
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    contains_count: usize,
    regex_count: usize,
    skipped_count: usize,
}
