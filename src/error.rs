//! 全局错误类型定义

use std::io::Error as IoError;
use std::time::Duration;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum RscategorizerError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则解析失败：{0}")]
    RuleParseError(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 配置相关错误
    #[error("配置无效：{0}")]
    ConfigError(String),

    // 检测相关错误
    #[error("分类器未初始化")]
    DetectorNotInitialized,

    // 远程分类错误
    #[error("远程分类失败：{0}")]
    Classification(#[from] ClassificationError),

    // 网络相关错误
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

/// 远程分类调用的错误
///
/// 调用方负责捕获并回退到默认分类或离线分类器，不会向请求处理流程外传播。
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("网络错误：{0}")]
    Network(String),
    #[error("请求超时（{0:?}）")]
    Timeout(Duration),
    #[error("返回状态码 {status}：{body}")]
    Status { status: u16, body: String },
    #[error("响应格式错误：{0}")]
    Format(String),
    #[error("未知分类标签：{0}")]
    UnknownLabel(String),
}

// 全局Result类型
pub type RscResult<T> = Result<T, RscategorizerError>;
