//! 关键词分析器：按优先级匹配编译后的关键词规则
use tracing::debug;

use crate::compiler::CompiledRuleSet;
use crate::config::TieBreakPolicy;
use crate::rule::Category;
use crate::utils::MessageExtractor;

/// 关键词分析器
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// 分析文本，返回命中的分类；空白文本或无命中返回 None
    pub fn analyze(rules: &CompiledRuleSet, text: &str, policy: TieBreakPolicy) -> Option<Category> {
        if text.trim().is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();
        let category = match policy {
            TieBreakPolicy::FirstMatch => Self::first_match(rules, &lowered),
            TieBreakPolicy::HighestScore => Self::highest_score(rules, &lowered),
        };

        debug!(
            "关键词分析：文本={:?}，策略={:?}，结果={:?}",
            MessageExtractor::preview(text),
            policy,
            category
        );
        category
    }

    /// 第一个命中的规则胜出
    fn first_match(rules: &CompiledRuleSet, lowered: &str) -> Option<Category> {
        for rule in &rules.rules {
            if let Some(matcher) = rule.matchers.iter().find(|m| m.is_match(lowered)) {
                debug!("命中规则：分类={}，触发词={}", rule.category, matcher.describe());
                return Some(rule.category);
            }
        }
        None
    }

    /// 命中触发词最多的规则胜出，计数相同取靠前者
    fn highest_score(rules: &CompiledRuleSet, lowered: &str) -> Option<Category> {
        let mut best: Option<(Category, usize)> = None;

        for rule in &rules.rules {
            let score = rule.match_count(lowered);
            if score == 0 {
                continue;
            }
            debug!("规则得分：分类={}，命中数={}", rule.category, score);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((rule.category, score));
            }
        }

        best.map(|(category, _)| category)
    }
}
