//! 长度提示提取工具
//! 识别用户文本中的 "in N characters" 并换算为 max_tokens

use once_cell::sync::Lazy;
use regex::Regex;

static CHAR_LIMIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bin (\d+) characters?\b").expect("字符数提示正则无效")
});

/// 长度提示提取工具
pub struct LengthHintExtractor;

impl LengthHintExtractor {
    /// 提取字符数上限
    pub fn extract_char_limit(text: &str) -> Option<u32> {
        CHAR_LIMIT_REGEX
            .captures(text)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    }

    /// 字符数换算为 token 数，最少为 1
    pub fn to_max_tokens(char_limit: u32, chars_per_token: u32) -> u32 {
        (char_limit / chars_per_token.max(1)).max(1)
    }

    /// 从文本中得到 max_tokens 覆盖值
    pub fn max_tokens_hint(text: &str, chars_per_token: u32) -> Option<u32> {
        Self::extract_char_limit(text).map(|limit| Self::to_max_tokens(limit, chars_per_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_char_limit() {
        assert_eq!(LengthHintExtractor::extract_char_limit("Write a poem in 280 characters"), Some(280));
        assert_eq!(LengthHintExtractor::extract_char_limit("describe it In 1 Character"), Some(1));
        assert_eq!(LengthHintExtractor::extract_char_limit("in one hundred characters"), None);
        assert_eq!(LengthHintExtractor::extract_char_limit("in 99999999999 characters"), None);
        assert_eq!(LengthHintExtractor::extract_char_limit(""), None);
    }

    #[test]
    fn test_to_max_tokens() {
        assert_eq!(LengthHintExtractor::to_max_tokens(280, 4), 70);
        assert_eq!(LengthHintExtractor::to_max_tokens(3, 4), 1);
        assert_eq!(LengthHintExtractor::to_max_tokens(10, 0), 10);
    }

    #[test]
    fn test_max_tokens_hint() {
        assert_eq!(LengthHintExtractor::max_tokens_hint("a story in 400 characters", 4), Some(100));
        assert_eq!(LengthHintExtractor::max_tokens_hint("a story", 4), None);
    }
}
