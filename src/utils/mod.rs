//! 工具模块：消息提取、长度提示与标签解析
pub mod message_extractor;
pub mod length_hint;
pub mod label_parser;

pub use self::message_extractor::MessageExtractor;
pub use self::length_hint::LengthHintExtractor;
pub use self::label_parser::LabelParser;
