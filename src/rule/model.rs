//! 规则数据模型定义
//! 仅存储分类、关键词规则与参数预设，无任何业务逻辑，支持序列化/反序列化

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::builtin;

/// 内容分类（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Creative Writing")]
    CreativeWriting,
    #[serde(rename = "Technical Writing")]
    TechnicalWriting,
    #[serde(rename = "Business Writing")]
    BusinessWriting,
    #[serde(rename = "Educational Content")]
    EducationalContent,
    #[serde(rename = "Social Media Posts")]
    SocialMediaPosts,
    #[serde(rename = "Translation")]
    Translation,
    #[serde(rename = "Summarization")]
    Summarization,
    #[serde(rename = "Question Answering")]
    QuestionAnswering,
    #[default]
    #[serde(rename = "General", alias = "Default")]
    General,
}

impl Category {
    /// 全部分类，按声明顺序
    pub const ALL: [Category; 9] = [
        Category::CreativeWriting,
        Category::TechnicalWriting,
        Category::BusinessWriting,
        Category::EducationalContent,
        Category::SocialMediaPosts,
        Category::Translation,
        Category::Summarization,
        Category::QuestionAnswering,
        Category::General,
    ];

    /// 展示用标签
    pub fn label(&self) -> &'static str {
        match self {
            Category::CreativeWriting => "Creative Writing",
            Category::TechnicalWriting => "Technical Writing",
            Category::BusinessWriting => "Business Writing",
            Category::EducationalContent => "Educational Content",
            Category::SocialMediaPosts => "Social Media Posts",
            Category::Translation => "Translation",
            Category::Summarization => "Summarization",
            Category::QuestionAnswering => "Question Answering",
            Category::General => "General",
        }
    }

    /// 从标签解析分类
    ///
    /// 忽略大小写，`_`/`-` 视为空格（兼容 `creative_writing` 写法），`default` 视为 General。
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if normalized == "default" {
            return Some(Category::General);
        }

        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 关键词规则：分类 + 触发词列表
///
/// 触发词默认为小写子串；写成 `/.../` 形式时按正则处理（忽略大小写）。
/// 规则列表的顺序即优先级。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: Category,
    pub triggers: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: Category, triggers: &[&str]) -> Self {
        Self {
            category,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// 生成参数预设
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterPreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    // 推荐模型
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ParameterPreset {
    /// 是否未设置任何参数
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.max_tokens.is_none()
            && self.frequency_penalty.is_none()
            && self.presence_penalty.is_none()
            && self.stop.is_none()
            && self.model.is_none()
    }

    /// 用 other 中已设置的字段覆盖自身
    pub fn merge_from(&mut self, other: &ParameterPreset) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        take(&mut self.temperature, &other.temperature);
        take(&mut self.top_p, &other.top_p);
        take(&mut self.top_k, &other.top_k);
        take(&mut self.max_tokens, &other.max_tokens);
        take(&mut self.frequency_penalty, &other.frequency_penalty);
        take(&mut self.presence_penalty, &other.presence_penalty);
        take(&mut self.stop, &other.stop);
        take(&mut self.model, &other.model);
    }
}

/// 兜底预设：即使规则库缺失 General 也保证查询不失败
static FALLBACK_PRESET: Lazy<ParameterPreset> = Lazy::new(|| builtin::default_preset(Category::General));

/// 完整规则库：有序关键词规则 + 每个分类一个预设
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleLibrary {
    pub rules: Vec<KeywordRule>,
    pub presets: HashMap<Category, ParameterPreset>,
}

impl RuleLibrary {
    /// 构建规则库，缺失或为空的分类预设使用内置预设补齐
    pub fn new(rules: Vec<KeywordRule>, mut presets: HashMap<Category, ParameterPreset>) -> Self {
        for category in Category::ALL {
            let preset = presets.entry(category).or_default();
            if preset.is_empty() {
                *preset = builtin::default_preset(category);
            }
        }
        Self { rules, presets }
    }

    /// 查询分类对应的预设，永不失败
    pub fn get_preset(&self, category: Category) -> &ParameterPreset {
        self.presets
            .get(&category)
            .or_else(|| self.presets.get(&Category::General))
            .unwrap_or(&FALLBACK_PRESET)
    }

    /// 按标签查询预设，未知标签按 General 处理
    pub fn get_preset_by_label(&self, label: &str) -> &ParameterPreset {
        self.get_preset(Category::from_label(label).unwrap_or_default())
    }
}

impl Default for RuleLibrary {
    fn default() -> Self {
        builtin::default_library()
    }
}

/// 分类结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Keyword,
    Remote,
    Fallback,
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationSource::Keyword => f.write_str("keyword"),
            ClassificationSource::Remote => f.write_str("remote"),
            ClassificationSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// 单次请求的分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub preset: ParameterPreset,
    pub source: ClassificationSource,
}
