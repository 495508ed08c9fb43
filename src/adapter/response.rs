//! 响应标注
//! 在模型输出前加上分类提示

use serde_json::Value;

use crate::rule::ClassificationResult;

/// 响应标注工具
pub struct ResponseAnnotator;

impl ResponseAnnotator {
    /// 生成分类提示，例如 `[System: Using creative writing settings - Temp=0.9, Top_k=0]`
    pub fn notice(result: &ClassificationResult) -> String {
        let temperature = result
            .preset
            .temperature
            .map(|t| format!("{:?}", t))
            .unwrap_or_else(|| "n/a".to_string());
        let top_k = result
            .preset
            .top_k
            .map(|k| k.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        format!(
            "[System: Using {} settings - Temp={}, Top_k={}]",
            result.category.label().to_lowercase(),
            temperature,
            top_k
        )
    }

    /// 在文本前加提示（已带提示则原样返回）
    pub fn annotate(content: &str, result: &ClassificationResult) -> String {
        let notice = Self::notice(result);
        if content.starts_with(&notice) {
            return content.to_string();
        }
        format!("{}\n\n{}", notice, content)
    }

    /// 标注 chat completion 响应中每个 `choices[*].message.content`，返回标注数量
    pub fn annotate_json(response: &mut Value, result: &ClassificationResult) -> usize {
        let Some(choices) = response.get_mut("choices").and_then(Value::as_array_mut) else {
            return 0;
        };

        let mut annotated = 0;
        for choice in choices {
            let Some(content) = choice.pointer_mut("/message/content") else {
                continue;
            };
            if let Value::String(text) = content {
                *text = Self::annotate(text, result);
                annotated += 1;
            }
        }
        annotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::builtin::default_preset;
    use crate::rule::{Category, ClassificationSource};
    use serde_json::json;

    fn result(category: Category) -> ClassificationResult {
        ClassificationResult {
            category,
            preset: default_preset(category),
            source: ClassificationSource::Keyword,
        }
    }

    #[test]
    fn test_notice() {
        assert_eq!(
            ResponseAnnotator::notice(&result(Category::CreativeWriting)),
            "[System: Using creative writing settings - Temp=0.9, Top_k=0]"
        );

        // 整数值温度保留小数位
        let mut translation = result(Category::Translation);
        translation.preset.temperature = Some(1.0);
        assert_eq!(
            ResponseAnnotator::notice(&translation),
            "[System: Using translation settings - Temp=1.0, Top_k=0]"
        );
    }

    #[test]
    fn test_annotate_once() {
        let result = result(Category::General);
        let once = ResponseAnnotator::annotate("Hello!", &result);
        assert!(once.ends_with("\n\nHello!"));
        assert_eq!(ResponseAnnotator::annotate(&once, &result), once);
    }

    #[test]
    fn test_annotate_json() {
        let mut response = json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "A dragon..." } },
                { "index": 1, "message": { "role": "assistant", "content": null } }
            ]
        });

        let count = ResponseAnnotator::annotate_json(&mut response, &result(Category::CreativeWriting));
        assert_eq!(count, 1);
        assert!(response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap()
            .starts_with("[System: Using creative writing settings"));

        let mut no_choices = json!({ "error": "x" });
        assert_eq!(ResponseAnnotator::annotate_json(&mut no_choices, &result(Category::General)), 0);
    }
}
