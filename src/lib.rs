//! rscategorizer - 大模型请求分类与生成参数预设注入工具

// 导出全局错误类型
pub use self::error::{ClassificationError, RscategorizerError, RscResult};

// 导出配置模块
pub use self::config::{
    ClassifierConfig, ConfigManager, CustomConfigBuilder, RemoteConfig, RemoteFallback, TieBreakPolicy,
};

// 导出规则模块核心接口
pub use self::rule::{
    Category, ClassificationResult, ClassificationSource, KeywordRule, ParameterPreset, RuleLibrary,
    RuleLoader, SessionCache,
};

// 导出工具模块核心接口
pub use self::utils::{LabelParser, LengthHintExtractor, MessageExtractor};

// 导出编译模块核心接口
pub use self::compiler::{CompiledKeywordRule, CompiledRuleSet, Matcher, RuleCompiler};

// 导出适配模块核心接口
pub use self::adapter::{
    ChatMessage, ContentPart, MessageContent, RequestAdapter, RequestBody, ResponseAnnotator,
};

// 导出分类模块核心接口
pub use self::detector::{
    CategoryDetector,
    KeywordAnalyzer,
    RemoteClassifier,
    classify_remote,
    init_categorizer,
    init_categorizer_with_config,
    init_categorizer_with_library,
    categorize_request,
    classify_text,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod utils;
pub mod compiler;
pub mod adapter;
pub mod detector;
