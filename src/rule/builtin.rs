//! 内置规则表
//! 唯一的关键词规则表与分类预设表

use std::collections::HashMap;

use super::model::{Category, KeywordRule, ParameterPreset, RuleLibrary};

/// 内置关键词规则，顺序即优先级（General 无规则，作为兜底分类）
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            Category::Summarization,
            &["summarize", "summarise", "summary", "tl;dr", "tldr", "condense", "key points"],
        ),
        KeywordRule::new(
            Category::Translation,
            &[
                "translate",
                "translation",
                r"/\b(?:into|to) (?:english|spanish|french|german|chinese|japanese|korean|italian|portuguese|russian|arabic)\b/",
            ],
        ),
        KeywordRule::new(
            Category::CreativeWriting,
            &[
                r"/\bstor(?:y|ies)\b/",
                r"/\bpoems?\b/",
                "poetry",
                r"/\bnovels?\b/",
                r"/\bfiction(?:al)?\b/",
                "imagine",
                "creative",
                "lyrics",
                "haiku",
                "fairy tale",
                r"/\b(?:plot|chapter|scene|character)s?\b/",
            ],
        ),
        KeywordRule::new(
            Category::TechnicalWriting,
            &[
                "technical",
                "stack trace",
                "documentation",
                r"/\b(?:code|coding|function|algorithm|debug|script|api|sdk|programming|compiler?)\b/",
                r"/\b(?:python|javascript|typescript|rust|java|golang|sql|regex)\b/",
            ],
        ),
        KeywordRule::new(
            Category::BusinessWriting,
            &[
                "business",
                "proposal",
                "professional email",
                "meeting minutes",
                r"/\bmemos?\b/",
                "cover letter",
                "strategy",
                r"/\b(?:e-?mail|report)\b/",
            ],
        ),
        KeywordRule::new(
            Category::EducationalContent,
            &[
                "explain",
                r"/\bteach(?:es|ing)?\b/",
                "lesson",
                "tutorial",
                "educational",
                "for beginners",
                "curriculum",
                "homework",
                r"/\blearn(?:ing)?\b/",
            ],
        ),
        KeywordRule::new(
            Category::SocialMediaPosts,
            &[
                "tweet",
                "social media",
                "hashtag",
                "instagram",
                "linkedin",
                "facebook",
                "tiktok",
                "caption",
                r"/\bpost\b/",
            ],
        ),
        KeywordRule::new(
            Category::QuestionAnswering,
            &[
                "how to",
                "what is",
                r"/\?\s*$/",
                r"/^\s*(?:what|how|why|who|when|where|which)\b/",
            ],
        ),
    ]
}

/// 分类的内置预设
pub fn default_preset(category: Category) -> ParameterPreset {
    let (temperature, top_p, top_k, frequency_penalty, presence_penalty, max_tokens) = match category {
        Category::CreativeWriting => (0.9, 0.95, 0, 0.0, 0.0, 1024),
        Category::TechnicalWriting => (0.2, 0.8, 40, 0.2, 0.0, 512),
        Category::QuestionAnswering => (0.2, 0.8, 40, 0.2, 0.0, 512),
        Category::BusinessWriting => (0.4, 0.9, 40, 0.1, 0.0, 400),
        Category::EducationalContent => (0.5, 0.9, 0, 0.0, 0.0, 800),
        Category::SocialMediaPosts => (0.7, 0.95, 0, 0.0, 0.0, 280),
        Category::Translation => (0.1, 1.0, 0, 0.0, 0.0, 512),
        Category::Summarization => (0.3, 0.9, 0, 0.0, 0.3, 200),
        Category::General => (0.7, 0.9, 40, 0.0, 0.0, 512),
    };

    ParameterPreset {
        temperature: Some(temperature),
        top_p: Some(top_p),
        top_k: Some(top_k),
        max_tokens: Some(max_tokens),
        frequency_penalty: Some(frequency_penalty),
        presence_penalty: Some(presence_penalty),
        stop: None,
        model: None,
    }
}

/// 全部内置预设
pub fn default_presets() -> HashMap<Category, ParameterPreset> {
    Category::ALL
        .into_iter()
        .map(|category| (category, default_preset(category)))
        .collect()
}

/// 内置规则库
pub fn default_library() -> RuleLibrary {
    RuleLibrary {
        rules: default_rules(),
        presets: default_presets(),
    }
}
