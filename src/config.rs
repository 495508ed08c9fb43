//! 全局配置管理,存储所有可配置项

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{RscResult, RscategorizerError};

/// 远程分类超时上限
const MAX_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// 多个分类同时命中时的裁决策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreakPolicy {
    /// 按规则声明顺序，第一个命中的分类胜出
    #[default]
    FirstMatch,
    /// 命中触发词最多的分类胜出，计数相同时取声明顺序靠前者
    HighestScore,
}

/// 远程分类失败后的回退方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteFallback {
    /// 直接使用默认分类（General）
    #[default]
    Default,
    /// 改用离线关键词分类
    Keyword,
}

/// 远程分类器配置
#[derive(Clone)]
pub struct RemoteConfig {
    // OpenAI 兼容的 chat/completions 地址
    pub endpoint: String,
    // Bearer token，为空时不携带 Authorization
    pub api_key: String,
    // 分类模型
    pub model: String,
    // 单次请求超时
    pub timeout: Duration,
    // 分类回复的最大 token 数
    pub max_tokens: u32,
    pub fallback: RemoteFallback,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

// api_key 不输出到日志
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("RemoteConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "microsoft/phi-3-mini-128k-instruct:free".to_string(),
            timeout: Duration::from_secs(5),
            max_tokens: 50,
            fallback: RemoteFallback::Default,
        }
    }
}

/// 全局配置
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    // 预设文件路径（None 时使用内置规则与预设）
    pub preset_file: Option<PathBuf>,
    // 是否覆盖请求中已有的生成参数
    pub overwrite: bool,
    pub tie_break: TieBreakPolicy,
    // 是否把分类结果写入 metadata
    pub annotate_metadata: bool,
    // 是否把分类标签追加到 tags
    pub tag_request: bool,
    // 是否在 system 消息中注入分类提示
    pub inject_system_hint: bool,
    // 是否识别 "in N characters" 长度提示
    pub apply_length_hints: bool,
    pub chars_per_token: u32,
    // 远程分类器（None 时仅离线分类）
    pub remote: Option<RemoteConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            preset_file: None,
            overwrite: false,
            tie_break: TieBreakPolicy::FirstMatch,
            annotate_metadata: true,
            tag_request: true,
            inject_system_hint: false,
            apply_length_hints: true,
            chars_per_token: 4,
            remote: None,
        }
    }
}

impl ClassifierConfig {
    /// 校验配置，在分类器构建时执行一次
    pub fn validate(&self) -> RscResult<()> {
        if self.chars_per_token == 0 {
            return Err(RscategorizerError::ConfigError(
                "chars_per_token 必须大于 0".to_string(),
            ));
        }

        if let Some(remote) = &self.remote {
            let endpoint = Url::parse(&remote.endpoint)?;
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(RscategorizerError::ConfigError(format!(
                    "远程分类地址协议不支持：{}",
                    endpoint.scheme()
                )));
            }
            if remote.timeout.is_zero() || remote.timeout > MAX_REMOTE_TIMEOUT {
                return Err(RscategorizerError::ConfigError(format!(
                    "远程分类超时必须在 (0, {:?}] 范围内，当前：{:?}",
                    MAX_REMOTE_TIMEOUT, remote.timeout
                )));
            }
            if remote.max_tokens == 0 {
                return Err(RscategorizerError::ConfigError(
                    "远程分类 max_tokens 必须大于 0".to_string(),
                ));
            }
            if remote.model.trim().is_empty() {
                return Err(RscategorizerError::ConfigError(
                    "远程分类模型不能为空".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: ClassifierConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.preset_file = Some(path.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    pub fn tie_break(mut self, policy: TieBreakPolicy) -> Self {
        self.config.tie_break = policy;
        self
    }

    pub fn annotate_metadata(mut self, annotate: bool) -> Self {
        self.config.annotate_metadata = annotate;
        self
    }

    pub fn tag_request(mut self, tag: bool) -> Self {
        self.config.tag_request = tag;
        self
    }

    pub fn inject_system_hint(mut self, inject: bool) -> Self {
        self.config.inject_system_hint = inject;
        self
    }

    pub fn apply_length_hints(mut self, apply: bool) -> Self {
        self.config.apply_length_hints = apply;
        self
    }

    pub fn chars_per_token(mut self, chars: u32) -> Self {
        self.config.chars_per_token = chars;
        self
    }

    pub fn remote(mut self, remote: RemoteConfig) -> Self {
        self.config.remote = Some(remote);
        self
    }

    pub fn build(self) -> ClassifierConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigManager::get_default().validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = ConfigManager::custom()
            .overwrite(true)
            .tie_break(TieBreakPolicy::HighestScore)
            .inject_system_hint(true)
            .chars_per_token(3)
            .build();

        assert!(config.overwrite);
        assert_eq!(config.tie_break, TieBreakPolicy::HighestScore);
        assert!(config.inject_system_hint);
        assert_eq!(config.chars_per_token, 3);
        assert!(config.annotate_metadata);
    }

    #[test]
    fn test_validate_rejects_bad_remote() {
        // 非 http 协议
        let config = ConfigManager::custom()
            .remote(RemoteConfig::new("ftp://example.com/classify", "key"))
            .build();
        assert!(matches!(config.validate(), Err(RscategorizerError::ConfigError(_))));

        // 无法解析的地址
        let config = ConfigManager::custom()
            .remote(RemoteConfig::new("not a url", "key"))
            .build();
        assert!(matches!(config.validate(), Err(RscategorizerError::UrlError(_))));

        // 超时为 0
        let mut remote = RemoteConfig::new("http://localhost:8080/v1/chat/completions", "");
        remote.timeout = Duration::ZERO;
        let config = ConfigManager::custom().remote(remote).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ConfigManager::custom()
            .remote(RemoteConfig::new("https://example.com/v1/chat/completions", "sk-secret-token"))
            .build();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret-token"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("https://example.com/v1/chat/completions"));
    }

    #[test]
    fn test_validate_rejects_zero_chars_per_token() {
        let config = ConfigManager::custom().chars_per_token(0).build();
        assert!(config.validate().is_err());
    }
}
