//! 题目数据结构
//!
//! 模型输出先按这里的结构反序列化，再经过形状校验和模板归一化。
//! 模型返回的内容一律视为不可信输入。

use serde::{Deserialize, Serialize};

use crate::models::exam::ExamTemplate;

/// 一道题目的小问
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPart {
    /// 小问标号（a/b/c，备选问渲染为 d）
    pub label: String,
    /// 小问题干
    pub text: String,
    /// 分值
    #[serde(default)]
    pub marks: u32,
    /// 是否带有 OR 备选问
    #[serde(rename = "hasOR", default)]
    pub has_or: bool,
    /// 备选问题干，仅在 has_or 为真时存在
    #[serde(rename = "orText", skip_serializing_if = "Option::is_none")]
    pub or_text: Option<String>,
}

/// 一道完整题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionNumber", default)]
    pub question_number: u32,
    pub parts: Vec<QuestionPart>,
}

/// 第一阶段生成的题目大纲条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutline {
    #[serde(rename = "questionNumber", default)]
    pub question_number: u32,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Question {
    /// 校验模型返回的题目形状
    ///
    /// 要求：
    /// - 至少 3 个小问，前三问标号依次为 a/b/c（容忍大小写）
    /// - 每个小问题干非空
    /// - 恰好一个小问带 OR 备选，且备选题干非空
    pub fn check_shape(&self) -> Result<(), String> {
        if self.parts.len() < 3 {
            return Err(format!("期望至少 3 个小问，实际 {}", self.parts.len()));
        }

        for (idx, expected) in ["a", "b", "c"].iter().enumerate() {
            let label = self.parts[idx].label.trim().to_lowercase();
            if label != *expected {
                return Err(format!(
                    "第 {} 个小问标号应为 '{}'，实际 '{}'",
                    idx + 1,
                    expected,
                    self.parts[idx].label
                ));
            }
        }

        for part in &self.parts {
            if part.text.trim().is_empty() {
                return Err(format!("小问 '{}' 题干为空", part.label));
            }
        }

        let or_parts: Vec<&QuestionPart> = self.parts.iter().filter(|p| p.has_or).collect();
        if or_parts.len() != 1 {
            return Err(format!("期望恰好 1 个 OR 备选问，实际 {}", or_parts.len()));
        }
        let or_text_ok = or_parts[0]
            .or_text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if !or_text_ok {
            return Err("OR 备选问缺少备选题干".to_string());
        }

        Ok(())
    }

    /// 用模板归一化不可信字段
    ///
    /// 题号与小问分值是确定性数据，以大纲位置和模板为准，
    /// 模型输出的对应字段一律覆盖；多余的小问被裁掉。
    pub fn apply_template(&mut self, question_number: u32, template: &ExamTemplate) {
        self.question_number = question_number;
        self.parts.truncate(template.part_marks.len());
        for (part, marks) in self.parts.iter_mut().zip(template.part_marks.iter()) {
            part.label = part.label.trim().to_lowercase();
            part.marks = *marks;
            if !part.has_or {
                part.or_text = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::ExamType;

    fn sample_question_json() -> &'static str {
        r#"{
            "questionNumber": 1,
            "parts": [
                {"label": "a", "text": "Define a stack", "marks": 3},
                {"label": "b", "text": "Explain stack operations", "marks": 3},
                {"label": "c", "text": "Apply stacks to expression evaluation", "marks": 4,
                 "hasOR": true, "orText": "Analyze stack-based backtracking"}
            ]
        }"#
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let q: Question = serde_json::from_str(sample_question_json()).unwrap();
        assert_eq!(q.question_number, 1);
        assert_eq!(q.parts.len(), 3);
        assert!(q.parts[2].has_or);
        assert_eq!(
            q.parts[2].or_text.as_deref(),
            Some("Analyze stack-based backtracking")
        );
        assert!(!q.parts[0].has_or);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let q: Question = serde_json::from_str(sample_question_json()).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"questionNumber\""));
        assert!(json.contains("\"hasOR\""));
        assert!(json.contains("\"orText\""));
        // 没有备选问的小问不序列化 orText
        assert_eq!(json.matches("\"orText\"").count(), 1);
    }

    #[test]
    fn test_check_shape_accepts_valid_question() {
        let q: Question = serde_json::from_str(sample_question_json()).unwrap();
        assert!(q.check_shape().is_ok());
    }

    #[test]
    fn test_check_shape_rejects_too_few_parts() {
        let q: Question = serde_json::from_str(
            r#"{"parts": [
                {"label": "a", "text": "Define", "marks": 3},
                {"label": "b", "text": "Explain", "marks": 3}
            ]}"#,
        )
        .unwrap();
        assert!(q.check_shape().unwrap_err().contains("3 个小问"));
    }

    #[test]
    fn test_check_shape_rejects_missing_or_part() {
        let q: Question = serde_json::from_str(
            r#"{"parts": [
                {"label": "a", "text": "Define", "marks": 3},
                {"label": "b", "text": "Explain", "marks": 3},
                {"label": "c", "text": "Apply", "marks": 4}
            ]}"#,
        )
        .unwrap();
        assert!(q.check_shape().is_err());
    }

    #[test]
    fn test_check_shape_rejects_empty_or_text() {
        let q: Question = serde_json::from_str(
            r#"{"parts": [
                {"label": "a", "text": "Define", "marks": 3},
                {"label": "b", "text": "Explain", "marks": 3},
                {"label": "c", "text": "Apply", "marks": 4, "hasOR": true, "orText": "  "}
            ]}"#,
        )
        .unwrap();
        assert!(q.check_shape().unwrap_err().contains("备选题干"));
    }

    #[test]
    fn test_apply_template_overrides_untrusted_fields() {
        let mut q: Question = serde_json::from_str(
            r#"{"questionNumber": 99, "parts": [
                {"label": "A", "text": "Define", "marks": 10},
                {"label": "b", "text": "Explain", "marks": 10},
                {"label": "c", "text": "Apply", "marks": 10, "hasOR": true, "orText": "Analyze"},
                {"label": "d", "text": "Extra part the model invented", "marks": 1}
            ]}"#,
        )
        .unwrap();

        let template = ExamType::MstOne.template();
        q.apply_template(1, &template);

        assert_eq!(q.question_number, 1);
        assert_eq!(q.parts.len(), 3);
        assert_eq!(q.parts[0].label, "a");
        let marks: Vec<u32> = q.parts.iter().map(|p| p.marks).collect();
        assert_eq!(marks, vec![3, 3, 4]);
    }
}
