//! 分类模块：关键词分析、远程分类与请求处理
pub mod global;
pub mod analyzer;
pub mod remote;
pub mod detector;

// 导出核心接口
pub use self::global::{
    init_categorizer, init_categorizer_with_config, init_categorizer_with_library,
    categorize_request, classify_text,
};
pub use self::analyzer::KeywordAnalyzer;
pub use self::remote::{RemoteClassifier, classify_remote};
pub use self::detector::CategoryDetector;
