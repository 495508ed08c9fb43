//! 分类器核心：整合关键词分析、远程分类与请求适配
use std::sync::Arc;

use tracing::{debug, warn};

use super::analyzer::KeywordAnalyzer;
use super::remote::RemoteClassifier;
use crate::adapter::{RequestAdapter, RequestBody};
use crate::compiler::{CompiledRuleSet, RuleCompiler};
use crate::config::{ClassifierConfig, RemoteFallback};
use crate::error::RscResult;
use crate::rule::{
    Category, ClassificationResult, ClassificationSource, ParameterPreset, RuleLibrary, RuleLoader,
    SessionCache,
};
use crate::utils::{LengthHintExtractor, MessageExtractor};

/// 分类器
///
/// 规则与预设在构建后只读，通过 `Arc` 在并发请求间共享。
#[derive(Debug, Clone)]
pub struct CategoryDetector {
    compiled_rules: Arc<CompiledRuleSet>,
    library: Arc<RuleLibrary>,
    config: ClassifierConfig,
    remote: Option<RemoteClassifier>,
}

impl CategoryDetector {
    /// 创建分类器（校验配置、加载并编译规则库）
    pub async fn new(config: ClassifierConfig) -> RscResult<Self> {
        config.validate()?;
        let library = RuleLoader::load(&config).await?;
        Self::with_library(library, config)
    }

    /// 使用已加载的规则库创建分类器
    pub fn with_library(library: RuleLibrary, config: ClassifierConfig) -> RscResult<Self> {
        config.validate()?;
        let compiled_rules = RuleCompiler::compile(&library)?;
        let remote = config.remote.clone().map(RemoteClassifier::new).transpose()?;

        Ok(Self {
            compiled_rules: Arc::new(compiled_rules),
            library: Arc::new(library),
            config,
            remote,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn library(&self) -> &RuleLibrary {
        &self.library
    }

    /// 离线分类，永不失败
    pub fn classify(&self, text: &str) -> Category {
        KeywordAnalyzer::analyze(&self.compiled_rules, text, self.config.tie_break).unwrap_or_default()
    }

    /// 查询分类预设
    pub fn get_preset(&self, category: Category) -> &ParameterPreset {
        self.library.get_preset(category)
    }

    /// 离线分类并给出完整结果
    pub fn classify_offline(&self, text: &str) -> ClassificationResult {
        match KeywordAnalyzer::analyze(&self.compiled_rules, text, self.config.tie_break) {
            Some(category) => self.build_result(category, ClassificationSource::Keyword, text),
            None => self.build_result(Category::General, ClassificationSource::Fallback, text),
        }
    }

    /// 分类：配置了远程分类器时优先远程，失败按配置回退
    pub async fn classify_text(&self, text: &str) -> ClassificationResult {
        let Some(remote) = &self.remote else {
            return self.classify_offline(text);
        };

        if text.trim().is_empty() {
            return self.build_result(Category::General, ClassificationSource::Fallback, text);
        }

        match remote.classify_remote(text).await {
            Ok(category) => {
                debug!("远程分类成功：{}", category);
                self.build_result(category, ClassificationSource::Remote, text)
            }
            Err(e) => {
                warn!("远程分类失败，回退方式={:?}：{}", remote.config().fallback, e);
                match remote.config().fallback {
                    RemoteFallback::Default => {
                        self.build_result(Category::General, ClassificationSource::Fallback, text)
                    }
                    RemoteFallback::Keyword => self.classify_offline(text),
                }
            }
        }
    }

    /// 处理请求：分类 -> 取预设 -> 合并进请求体
    pub async fn process(&self, body: RequestBody) -> RequestBody {
        let text = MessageExtractor::last_user_text(&body.messages).unwrap_or_default();
        let result = self.classify_text(&text).await;
        self.finalize(body, &result)
    }

    /// 仅使用离线分类处理请求
    pub fn process_offline(&self, body: RequestBody) -> RequestBody {
        let text = MessageExtractor::last_user_text(&body.messages).unwrap_or_default();
        let result = self.classify_offline(&text);
        self.finalize(body, &result)
    }

    /// 带会话缓存处理请求：首条用户消息重新分类，后续消息复用该会话的分类
    pub async fn process_with_session(
        &self,
        body: RequestBody,
        session_id: &str,
        cache: &SessionCache,
    ) -> RequestBody {
        let text = MessageExtractor::last_user_text(&body.messages).unwrap_or_default();
        let first_turn = MessageExtractor::is_first_turn(&body.messages);

        let result = match cache.lookup(session_id, first_turn) {
            Some(cached) => {
                debug!("会话 [{}] 复用缓存分类：{}", session_id, cached.category);
                self.build_result(cached.category, cached.source, &text)
            }
            None => {
                let result = self.classify_text(&text).await;
                cache.store(session_id, result.clone());
                result
            }
        };

        self.finalize(body, &result)
    }

    /// 构建分类结果：复制分类预设，并应用文本中的长度提示
    fn build_result(&self, category: Category, source: ClassificationSource, text: &str) -> ClassificationResult {
        let mut preset = self.get_preset(category).clone();

        if self.config.apply_length_hints {
            if let Some(max_tokens) = LengthHintExtractor::max_tokens_hint(text, self.config.chars_per_token) {
                debug!("检测到长度提示，max_tokens 调整为 {}", max_tokens);
                preset.max_tokens = Some(max_tokens);
            }
        }

        ClassificationResult {
            category,
            preset,
            source,
        }
    }

    /// 合并预设并按配置写入标注
    fn finalize(&self, body: RequestBody, result: &ClassificationResult) -> RequestBody {
        debug!(
            "请求分类：{}（来源：{}），覆盖已有参数：{}",
            result.category, result.source, self.config.overwrite
        );

        let mut body = RequestAdapter::apply(body, &result.preset, self.config.overwrite);
        if self.config.annotate_metadata {
            RequestAdapter::annotate(&mut body, result);
        }
        if self.config.tag_request {
            RequestAdapter::tag(&mut body, result.category);
        }
        if self.config.inject_system_hint {
            RequestAdapter::inject_system_hint(&mut body, result.category);
        }
        body
    }
}
