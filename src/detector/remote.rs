//! 远程分类器
//! 调用 OpenAI 兼容的 chat/completions 接口，由模型返回 `[分类]` 形式的标签
//!
//! 单次请求、无重试，超时由配置固定；失败以 `ClassificationError` 返回，由调用方回退。

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{ClassificationError, RscResult};
use crate::rule::Category;
use crate::utils::LabelParser;

const SYSTEM_PROMPT: &str = "You are a category classifier.";

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    model: &'a str,
    messages: Vec<ClassifyMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ClassifyMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClassifyReply {
    #[serde(default)]
    choices: Vec<ReplyChoice>,
}

#[derive(Debug, Deserialize)]
struct ReplyChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// 远程分类器
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    client: Client,
    config: RemoteConfig,
}

impl RemoteClassifier {
    /// 创建远程分类器（HTTP 客户端超时即分类超时）
    pub fn new(config: RemoteConfig) -> RscResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rscategorizer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// 远程分类
    pub async fn classify_remote(&self, text: &str) -> Result<Category, ClassificationError> {
        let prompt = Self::build_prompt(text);
        let payload = ClassifyRequest {
            model: &self.config.model,
            messages: vec![
                ClassifyMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ClassifyMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ClassifyReply = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClassificationError::Timeout(self.config.timeout)
            } else {
                ClassificationError::Format(format!("响应不是合法的 chat completion JSON：{}", e))
            }
        })?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClassificationError::Format("响应中没有 choices[0].message.content".to_string()))?;

        debug!("远程分类原始回复：{:?}", content);
        LabelParser::parse(&content)
    }

    /// 构建分类提示词
    fn build_prompt(text: &str) -> String {
        let labels = Category::ALL.map(|c| c.label()).join(", ");
        format!(
            "Classify this request into one of these categories: {}.\n\
             Return only the category name in square brackets, e.g., [Summarization].\n\n\
             Request: {}",
            labels, text
        )
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ClassificationError {
        if error.is_timeout() {
            ClassificationError::Timeout(self.config.timeout)
        } else {
            ClassificationError::Network(error.to_string())
        }
    }
}

/// 使用默认模型与超时的一次性远程分类
pub async fn classify_remote(
    text: &str,
    endpoint: &str,
    api_key: &str,
) -> Result<Category, ClassificationError> {
    let classifier = RemoteClassifier::new(RemoteConfig::new(endpoint, api_key))
        .map_err(|e| ClassificationError::Network(e.to_string()))?;
    classifier.classify_remote(text).await
}
