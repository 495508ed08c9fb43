//! 全局分类器单例管理
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use super::detector::CategoryDetector;
use crate::adapter::RequestBody;
use crate::config::{ClassifierConfig, ConfigManager};
use crate::error::{RscResult, RscategorizerError};
use crate::rule::{ClassificationResult, RuleLibrary};

/// 全局分类器实例
static GLOBAL_DETECTOR: Lazy<Arc<OnceCell<CategoryDetector>>> = Lazy::new(|| {
    Arc::new(OnceCell::new())
});

/// 初始化全局分类器（默认配置）
pub async fn init_categorizer() -> RscResult<()> {
    init_categorizer_with_config(ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局分类器；重复初始化不生效
pub async fn init_categorizer_with_config(config: ClassifierConfig) -> RscResult<()> {
    GLOBAL_DETECTOR
        .get_or_try_init(|| async {
            let detector = CategoryDetector::new(config).await?;
            info!(
                "全局分类器初始化完成：{} 条关键词规则，远程分类={}",
                detector.library().rules.len(),
                detector.config().remote.is_some()
            );
            Ok::<_, RscategorizerError>(detector)
        })
        .await?;
    Ok(())
}

/// 使用已加载的规则库初始化全局分类器
pub async fn init_categorizer_with_library(library: RuleLibrary, config: ClassifierConfig) -> RscResult<()> {
    GLOBAL_DETECTOR
        .get_or_try_init(|| async { CategoryDetector::with_library(library, config) })
        .await?;
    Ok(())
}

/// 获取全局分类器
pub(crate) fn get_global_detector() -> RscResult<&'static CategoryDetector> {
    GLOBAL_DETECTOR.get()
        .ok_or(RscategorizerError::DetectorNotInitialized)
}

/// 使用全局分类器处理请求体
pub async fn categorize_request(body: RequestBody) -> RscResult<RequestBody> {
    let detector = get_global_detector()?;
    Ok(detector.process(body).await)
}

/// 使用全局分类器对文本分类
pub async fn classify_text(text: &str) -> RscResult<ClassificationResult> {
    let detector = get_global_detector()?;
    Ok(detector.classify_text(text).await)
}
