//! 规则模块：负责关键词规则与参数预设的数据模型、内置表、加载与会话缓存
pub mod model;
pub mod builtin;
pub mod loader;
pub mod cache;

// 导出核心接口
pub use self::model::{
    Category, ClassificationResult, ClassificationSource, KeywordRule, ParameterPreset, RuleLibrary,
};
pub use self::loader::RuleLoader;
pub use self::cache::SessionCache;
