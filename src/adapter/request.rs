//! 请求适配器
//! 定义聊天请求体，并把参数预设与分类标注合并进请求

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::rule::{Category, ClassificationResult, ParameterPreset};

/// 文本分片（多模态消息中的一段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 消息内容：纯文本或分片列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// 提取文本（分片按换行拼接，忽略非文本分片）
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// 追加文本
    pub fn push_text(&mut self, text: &str) {
        match self {
            MessageContent::Text(s) => s.push_str(text),
            MessageContent::Parts(parts) => parts.push(ContentPart {
                kind: "text".to_string(),
                text: Some(text.to_string()),
                extra: Map::new(),
            }),
        }
    }
}

// content 为 null 时（如工具调用消息）按空文本处理
fn nullable_content<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageContent, D::Error> {
    Ok(Option::<MessageContent>::deserialize(deserializer)?.unwrap_or_default())
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, deserialize_with = "nullable_content")]
    pub content: MessageContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(content.into()),
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn is_user(&self) -> bool {
        self.role == "user"
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// 聊天请求体
///
/// 未识别的字段保存在 `extra` 中原样回写。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestBody {
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}

/// 请求适配器
pub struct RequestAdapter;

impl RequestAdapter {
    /// 合并参数预设
    ///
    /// `overwrite` 为 false 时只填充请求中缺失（或为 null）的字段，重复调用结果不变；
    /// 为 true 时预设值总是覆盖请求中的值。
    pub fn apply(mut body: RequestBody, preset: &ParameterPreset, overwrite: bool) -> RequestBody {
        fn merge<T: Clone>(slot: &mut Option<T>, value: &Option<T>, overwrite: bool) {
            if value.is_some() && (overwrite || slot.is_none()) {
                slot.clone_from(value);
            }
        }

        merge(&mut body.temperature, &preset.temperature, overwrite);
        merge(&mut body.top_p, &preset.top_p, overwrite);
        merge(&mut body.top_k, &preset.top_k, overwrite);
        merge(&mut body.max_tokens, &preset.max_tokens, overwrite);
        merge(&mut body.frequency_penalty, &preset.frequency_penalty, overwrite);
        merge(&mut body.presence_penalty, &preset.presence_penalty, overwrite);
        merge(&mut body.stop, &preset.stop, overwrite);
        merge(&mut body.model, &preset.model, overwrite);
        body
    }

    /// 在 metadata 中记录分类结果
    pub fn annotate(body: &mut RequestBody, result: &ClassificationResult) {
        let metadata = body.metadata.get_or_insert_with(Map::new);
        metadata.insert("category".to_string(), Value::from(result.category.label()));
        metadata.insert("category_source".to_string(), Value::from(result.source.to_string()));
        if let Ok(preset) = serde_json::to_value(&result.preset) {
            metadata.insert("preset".to_string(), preset);
        }
    }

    /// 把分类标签加入 tags（不重复）
    pub fn tag(body: &mut RequestBody, category: Category) {
        let label = category.label();
        if !body.tags.iter().any(|t| t == label) {
            body.tags.push(label.to_string());
        }
    }

    /// 注入分类提示：已有 system 消息则追加，否则在开头插入一条
    pub fn inject_system_hint(body: &mut RequestBody, category: Category) {
        if let Some(first) = body.messages.first_mut().filter(|m| m.is_system()) {
            let hint = format!("\n\nThe user's request falls under the category: {}.", category);
            let existing = first.content.text();
            let already_hinted = existing.contains(hint.trim_start())
                || existing.starts_with(&format!("Category: {}\n", category));
            if !already_hinted {
                first.content.push_text(&hint);
            }
            return;
        }

        body.messages.insert(
            0,
            ChatMessage::system(format!(
                "Category: {}\nProcess the following user request accordingly.",
                category
            )),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::builtin::default_preset;
    use crate::rule::ClassificationSource;
    use serde_json::json;

    fn creative_result() -> ClassificationResult {
        ClassificationResult {
            category: Category::CreativeWriting,
            preset: default_preset(Category::CreativeWriting),
            source: ClassificationSource::Keyword,
        }
    }

    #[test]
    fn test_apply_preserves_user_settings() {
        let body = RequestBody {
            temperature: Some(0.1),
            ..RequestBody::with_messages(vec![ChatMessage::user("write a story")])
        };

        let applied = RequestAdapter::apply(body, &default_preset(Category::CreativeWriting), false);
        assert_eq!(applied.temperature, Some(0.1));
        assert_eq!(applied.top_p, Some(0.95));
        assert_eq!(applied.max_tokens, Some(1024));
    }

    #[test]
    fn test_apply_overwrite() {
        let body = RequestBody {
            temperature: Some(0.1),
            max_tokens: Some(16),
            ..Default::default()
        };

        let applied = RequestAdapter::apply(body, &default_preset(Category::CreativeWriting), true);
        assert_eq!(applied.temperature, Some(0.9));
        assert_eq!(applied.max_tokens, Some(1024));
    }

    #[test]
    fn test_apply_is_idempotent_without_overwrite() {
        let body = RequestBody {
            top_k: Some(7),
            ..RequestBody::with_messages(vec![ChatMessage::user("hi")])
        };
        let preset = default_preset(Category::General);

        let once = RequestAdapter::apply(body, &preset, false);
        let twice = RequestAdapter::apply(once.clone(), &preset, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_null_fields_are_filled() {
        let body: RequestBody = serde_json::from_value(json!({
            "messages": [{ "role": "user", "content": "hello" }],
            "temperature": null,
            "stream": true
        }))
        .unwrap();

        let applied = RequestAdapter::apply(body, &default_preset(Category::General), false);
        let value = serde_json::to_value(&applied).unwrap();
        assert_eq!(value["temperature"], json!(0.7));
        // 未识别字段原样保留
        assert_eq!(value["stream"], json!(true));
    }

    #[test]
    fn test_annotate_and_tag() {
        let mut body = RequestBody::default();
        let result = creative_result();

        RequestAdapter::annotate(&mut body, &result);
        RequestAdapter::tag(&mut body, result.category);
        RequestAdapter::tag(&mut body, result.category);

        let metadata = body.metadata.as_ref().unwrap();
        assert_eq!(metadata["category"], json!("Creative Writing"));
        assert_eq!(metadata["category_source"], json!("keyword"));
        assert_eq!(metadata["preset"]["max_tokens"], json!(1024));
        assert_eq!(body.tags, vec!["Creative Writing".to_string()]);
    }

    #[test]
    fn test_inject_system_hint() {
        // 已有 system 消息：追加提示，重复调用不重复追加
        let mut body = RequestBody::with_messages(vec![
            ChatMessage::system("You are helpful."),
            ChatMessage::user("summarize this"),
        ]);
        RequestAdapter::inject_system_hint(&mut body, Category::Summarization);
        RequestAdapter::inject_system_hint(&mut body, Category::Summarization);
        assert_eq!(
            body.messages[0].content.text(),
            "You are helpful.\n\nThe user's request falls under the category: Summarization."
        );

        // 无 system 消息：插入新消息
        let mut body = RequestBody::with_messages(vec![ChatMessage::user("hi")]);
        RequestAdapter::inject_system_hint(&mut body, Category::General);
        assert_eq!(body.messages.len(), 2);
        assert!(body.messages[0].is_system());
        assert!(body.messages[0].content.text().starts_with("Category: General"));
    }

    #[test]
    fn test_multimodal_content_text() {
        let message: ChatMessage = serde_json::from_value(json!({
            "role": "user",
            "content": [
                { "type": "text", "text": "describe this" },
                { "type": "image_url", "image_url": { "url": "http://x/y.png" } },
                { "type": "text", "text": "in a poem" }
            ]
        }))
        .unwrap();

        assert_eq!(message.content.text(), "describe this\nin a poem");
    }
}
