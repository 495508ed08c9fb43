//! 适配模块：请求参数合并与响应标注
pub mod request;
pub mod response;

pub use self::request::{ChatMessage, ContentPart, MessageContent, RequestAdapter, RequestBody};
pub use self::response::ResponseAnnotator;
