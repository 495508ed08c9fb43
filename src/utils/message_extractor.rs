//! 对话消息提取工具
//! 从请求的对话列表中取出用于分类的用户文本

use crate::adapter::ChatMessage;

/// 日志中用户文本预览的最大字符数
const PREVIEW_CHARS: usize = 30;

/// 对话消息提取工具
pub struct MessageExtractor;

impl MessageExtractor {
    /// 最后一条用户消息的文本；没有用户消息时返回 None
    pub fn last_user_text(messages: &[ChatMessage]) -> Option<String> {
        messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.text())
    }

    /// 用户消息条数
    pub fn user_turn_count(messages: &[ChatMessage]) -> usize {
        messages.iter().filter(|m| m.is_user()).count()
    }

    /// 是否为会话首条用户消息
    pub fn is_first_turn(messages: &[ChatMessage]) -> bool {
        Self::user_turn_count(messages) <= 1
    }

    /// 截断文本用于日志
    pub fn preview(text: &str) -> String {
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}
