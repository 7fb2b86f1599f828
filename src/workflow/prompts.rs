//! 生成提示词构建
//!
//! 两阶段提示：第一阶段只要题目级大纲（省 token），第二阶段按大纲
//! 逐题生成完整小问。提示词里反复强调"只输出 JSON"，清洗解析时
//! 仍然按不可信输入对待。

use crate::models::exam::{ExamRequest, ExamTemplate};
use crate::services::llm_service::PromptSpec;

/// 大纲阶段采样温度（结构性输出，压低随机性）
const OUTLINE_TEMPERATURE: f32 = 0.3;
/// 大纲阶段输出上限
const OUTLINE_MAX_TOKENS: u32 = 800;
/// 内容阶段采样温度
const CONTENT_TEMPERATURE: f32 = 0.5;
/// 内容阶段输出上限
const CONTENT_MAX_TOKENS: u32 = 1000;

/// 构建第一阶段（大纲）提示词
pub fn outline_prompt(request: &ExamRequest, template: &ExamTemplate) -> PromptSpec {
    let topics = request.topics_joined();
    let user = format!(
        r#"You must generate ONLY valid JSON. No markdown, no explanations.

Create an exam outline with {num_questions} questions.

Course: {course}
Topics: {topics}

Return ONLY this JSON array (no other text):
[
  {{"questionNumber": 1, "topic": "topic1"}},
  {{"questionNumber": 2, "topic": "topic2"}}
]

Rules:
- Each question uses a DIFFERENT topic from: {topics}
- Output ONLY the JSON array
- No markdown, no code blocks, no explanations"#,
        num_questions = template.num_questions,
        course = request.course_name,
        topics = topics,
    );

    PromptSpec {
        system: None,
        user,
        temperature: OUTLINE_TEMPERATURE,
        max_tokens: OUTLINE_MAX_TOKENS,
    }
}

/// 构建第二阶段（单题内容）提示词
pub fn content_prompt(
    request: &ExamRequest,
    template: &ExamTemplate,
    question_number: u32,
    topic: &str,
) -> PromptSpec {
    let marks_ab = template.part_marks[0];
    let marks_cd = template.part_marks[2];
    let user = format!(
        r#"You must generate ONLY valid JSON. No markdown, no explanations.

Generate ONE exam question:
- Question Number: {q_num}
- Topic: {topic}
- Course: {course}

Return ONLY this JSON (no other text):
{{
  "questionNumber": {q_num},
  "parts": [
    {{"label": "a", "text": "Define {topic}", "marks": {marks_ab}}},
    {{"label": "b", "text": "Explain {topic}", "marks": {marks_ab}}},
    {{"label": "c", "text": "Apply {topic}", "marks": {marks_cd}, "hasOR": true, "orText": "Analyze {topic}"}}
  ]
}}

Rules:
- Part a: Basic definition ({marks_ab} marks)
- Part b: Explanation ({marks_ab} marks)
- Part c: Application ({marks_cd} marks) with hasOR=true and orText
- Make questions specific to: {topic}
- Output ONLY JSON, no markdown"#,
        q_num = question_number,
        topic = topic,
        course = request.course_name,
        marks_ab = marks_ab,
        marks_cd = marks_cd,
    );

    PromptSpec {
        system: None,
        user,
        temperature: CONTENT_TEMPERATURE,
        max_tokens: CONTENT_MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::ExamType;

    fn sample_request() -> ExamRequest {
        ExamRequest::parse("Data Structures", "MST-1", "Arrays, Stacks").unwrap()
    }

    #[test]
    fn test_outline_prompt_carries_count_and_topics() {
        let request = sample_request();
        let template = ExamType::MstOne.template();
        let spec = outline_prompt(&request, &template);

        assert!(spec.user.contains("2 questions"));
        assert!(spec.user.contains("Data Structures"));
        assert!(spec.user.contains("Arrays, Stacks"));
        assert_eq!(spec.temperature, 0.3);
        assert_eq!(spec.max_tokens, 800);
    }

    #[test]
    fn test_content_prompt_injects_template_marks() {
        let request = sample_request();
        let template = ExamType::MstOne.template();
        let spec = content_prompt(&request, &template, 1, "Arrays");

        assert!(spec.user.contains("\"marks\": 3"));
        assert!(spec.user.contains("\"marks\": 4"));
        assert!(spec.user.contains("hasOR"));
        assert!(spec.user.contains("Arrays"));
        assert_eq!(spec.temperature, 0.5);
    }

    #[test]
    fn test_content_prompt_end_sem_marks() {
        let request = ExamRequest::parse("Operating Systems", "End-Sem", "Paging").unwrap();
        let template = ExamType::EndSem.template();
        let spec = content_prompt(&request, &template, 3, "Paging");

        assert!(spec.user.contains("\"marks\": 4"));
        assert!(spec.user.contains("\"marks\": 6"));
    }
}
