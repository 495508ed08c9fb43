//! 分类标签解析工具
//! 从远程分类模型的回复中取出 `[Label]` 形式的分类标签

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ClassificationError;
use crate::rule::Category;

static BRACKET_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[(.*?)\]").expect("分类标签正则无效"));

/// 分类标签解析工具
pub struct LabelParser;

impl LabelParser {
    /// 解析回复中的第一个方括号标签
    ///
    /// 没有方括号视为格式错误；标签不在分类集合内视为未知标签。
    pub fn parse(reply: &str) -> Result<Category, ClassificationError> {
        let label = BRACKET_LABEL_REGEX
            .captures(reply)
            .and_then(|captures| captures.get(1))
            .map(|m| Self::clean(m.as_str()))
            .ok_or_else(|| ClassificationError::Format(format!("回复中没有方括号标签：{:?}", reply)))?;

        Category::from_label(label).ok_or_else(|| ClassificationError::UnknownLabel(label.to_string()))
    }

    /// 去除标签两侧的引号与标点
    fn clean(label: &str) -> &str {
        label.trim_matches(|c: char| c.is_whitespace() || "\"'.,;:()[]".contains(c))
    }
}
