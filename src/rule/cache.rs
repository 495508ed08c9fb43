//! 会话分类缓存
//! 由调用方显式持有并传入，记录每个会话首条消息的分类结果

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use super::model::ClassificationResult;

/// 会话分类缓存（session_id -> 分类结果）
///
/// 会话首条用户消息时条目失效并重新分类，后续消息复用缓存结果。
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: RwLock<HashMap<String, ClassificationResult>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询缓存；`first_turn` 为 true 时清除旧条目并返回 None
    pub fn lookup(&self, session_id: &str, first_turn: bool) -> Option<ClassificationResult> {
        if first_turn {
            self.invalidate(session_id);
            return None;
        }

        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(session_id).cloned()
    }

    /// 写入缓存
    pub fn store(&self, session_id: &str, result: ClassificationResult) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        debug!("会话 [{}] 缓存分类结果：{}", session_id, result.category);
        entries.insert(session_id.to_string(), result);
    }

    /// 清除单个会话
    pub fn invalidate(&self, session_id: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(session_id);
    }

    /// 清空缓存
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::builtin::default_preset;
    use crate::rule::model::{Category, ClassificationSource};

    fn result(category: Category) -> ClassificationResult {
        ClassificationResult {
            category,
            preset: default_preset(category),
            source: ClassificationSource::Keyword,
        }
    }

    #[test]
    fn test_lookup_reuses_entry_after_first_turn() {
        let cache = SessionCache::new();
        assert!(cache.lookup("chat-1", false).is_none());

        cache.store("chat-1", result(Category::Translation));
        assert_eq!(
            cache.lookup("chat-1", false).map(|r| r.category),
            Some(Category::Translation)
        );
        assert!(cache.lookup("chat-2", false).is_none());
    }

    #[test]
    fn test_first_turn_invalidates_entry() {
        let cache = SessionCache::new();
        cache.store("chat-1", result(Category::Translation));

        assert!(cache.lookup("chat-1", true).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = SessionCache::new();
        cache.store("a", result(Category::General));
        cache.store("b", result(Category::Summarization));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
