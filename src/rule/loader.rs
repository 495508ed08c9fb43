//! 规则加载管理器
//! 负责在启动时加载内置规则库，或从本地 JSON 预设文件构建规则库

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::builtin;
use super::model::{Category, KeywordRule, ParameterPreset, RuleLibrary};
use crate::config::ClassifierConfig;
use crate::error::{RscResult, RscategorizerError};

/// 预设文件结构
///
/// ```json
/// {
///   "presets": { "Creative Writing": { "temperature": 1.0 } },
///   "rules": [ { "category": "Translation", "triggers": ["translate"] } ]
/// }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
struct PresetDocument {
    #[serde(default)]
    presets: HashMap<String, ParameterPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<RawKeywordRule>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawKeywordRule {
    category: String,
    #[serde(default)]
    triggers: Vec<String>,
}

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 加载规则库（配置了预设文件则读取文件，否则使用内置规则库）
    pub async fn load(config: &ClassifierConfig) -> RscResult<RuleLibrary> {
        match &config.preset_file {
            Some(path) => Self::load_from_file(path).await,
            None => {
                debug!("未配置预设文件，使用内置规则库");
                Ok(builtin::default_library())
            }
        }
    }

    /// 从本地 JSON 文件加载规则库
    pub async fn load_from_file(path: &Path) -> RscResult<RuleLibrary> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RscategorizerError::RuleLoadError(format!("读取预设文件 {} 失败：{}", path.display(), e))
        })?;

        let library = Self::parse(&content)?;
        debug!(
            "预设文件 {} 加载成功，关键词规则数：{}，预设数：{}",
            path.display(),
            library.rules.len(),
            library.presets.len()
        );
        Ok(library)
    }

    /// 解析预设文件内容
    ///
    /// 文件中的预设按字段覆盖内置预设；未知分类的预设跳过并告警；
    /// 出现 `rules` 时整体替换内置规则表，规则中的未知分类视为错误。
    pub fn parse(content: &str) -> RscResult<RuleLibrary> {
        let document: PresetDocument = serde_json::from_str(content)?;

        let mut presets = builtin::default_presets();
        for (label, overrides) in &document.presets {
            let Some(category) = Category::from_label(label) else {
                warn!("预设文件包含未知分类 [{}]，已忽略", label);
                continue;
            };
            presets.entry(category).or_default().merge_from(overrides);
        }

        let rules = match document.rules {
            Some(raw_rules) => raw_rules
                .into_iter()
                .map(|raw| {
                    let category = Category::from_label(&raw.category).ok_or_else(|| {
                        RscategorizerError::RuleParseError(format!("规则引用了未知分类：{}", raw.category))
                    })?;
                    Ok(KeywordRule {
                        category,
                        triggers: raw.triggers,
                    })
                })
                .collect::<RscResult<Vec<_>>>()?,
            None => builtin::default_rules(),
        };

        Ok(RuleLibrary::new(rules, presets))
    }

    /// 导出规则库为预设文件格式（便于在内置规则基础上修改）
    pub fn export(library: &RuleLibrary) -> RscResult<String> {
        let presets = Category::ALL
            .into_iter()
            .map(|category| (category.label().to_string(), library.get_preset(category).clone()))
            .collect();
        let rules = library
            .rules
            .iter()
            .map(|rule| RawKeywordRule {
                category: rule.category.label().to_string(),
                triggers: rule.triggers.clone(),
            })
            .collect();

        let document = PresetDocument {
            presets,
            rules: Some(rules),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_overrides_preset_fields() {
        let content = r#"{
            "presets": {
                "creative_writing": { "temperature": 1.1, "stop": ["THE END"] },
                "Flirting": { "temperature": 2.0 }
            }
        }"#;

        let library = RuleLoader::parse(content).unwrap();
        let creative = library.get_preset(Category::CreativeWriting);
        assert_eq!(creative.temperature, Some(1.1));
        assert_eq!(creative.stop, Some(vec!["THE END".to_string()]));
        // 未覆盖的字段保留内置值
        assert_eq!(creative.max_tokens, Some(1024));
        // 未出现 rules 时使用内置规则表
        assert_eq!(library.rules, builtin::default_rules());
    }

    #[test]
    fn test_parse_replaces_rules() {
        let content = r#"{
            "rules": [
                { "category": "Technical Writing", "triggers": ["code", "api"] },
                { "category": "Creative Writing", "triggers": ["story", "poem"] }
            ]
        }"#;

        let library = RuleLoader::parse(content).unwrap();
        assert_eq!(library.rules.len(), 2);
        assert_eq!(library.rules[0].category, Category::TechnicalWriting);
        assert_eq!(library.presets.len(), Category::ALL.len());
    }

    #[test]
    fn test_parse_rejects_unknown_rule_category() {
        let content = r#"{ "rules": [ { "category": "Cooking", "triggers": ["recipe"] } ] }"#;
        assert!(matches!(
            RuleLoader::parse(content),
            Err(RscategorizerError::RuleParseError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            RuleLoader::parse("{ presets: "),
            Err(RscategorizerError::JsonError(_))
        ));
    }

    #[test]
    fn test_export_then_parse_keeps_library() {
        let library = builtin::default_library();
        let exported = RuleLoader::export(&library).unwrap();
        assert_eq!(RuleLoader::parse(&exported).unwrap(), library);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "presets": {{ "General": {{ "max_tokens": 300 }} }} }}"#).unwrap();

        let config = ClassifierConfig {
            preset_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let library = RuleLoader::load(&config).await.unwrap();
        assert_eq!(library.get_preset(Category::General).max_tokens, Some(300));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let config = ClassifierConfig {
            preset_file: Some("/nonexistent/rscategorizer/presets.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            RuleLoader::load(&config).await,
            Err(RscategorizerError::RuleLoadError(_))
        ));
    }

    #[tokio::test]
    async fn test_load_without_file_uses_builtin() {
        let library = RuleLoader::load(&ClassifierConfig::default()).await.unwrap();
        assert_eq!(library, builtin::default_library());
    }
}
