//! 表单视图状态 - 客户端状态机
//!
//! 持有表单输入、后端健康状态、一次未完成的生成请求标记、
//! 以及最近一次生成结果。同一时刻最多一个在途生成请求。

use tracing::{info, warn};

use crate::client::backend_client::{BackendClient, ClientError};
use crate::client::health::HealthMonitor;
use crate::document::paper::{format_marks, PaperDocument, PaperHeader};
use crate::models::api::{GenerateRequest, GenerateResponse};
use crate::models::exam::{ExamInfo, ExamType};
use crate::utils::logging::truncate_text;

/// 表单字段
///
/// 课程代码/院系/学期只进卷面页眉，不参与生成请求。
#[derive(Debug, Clone, Default)]
pub struct ExamForm {
    pub course_name: String,
    pub course_code: String,
    pub department: String,
    pub semester: String,
    pub exam_type: String,
    pub topic_headings: String,
}

/// 表单视图状态
#[derive(Default)]
pub struct FormState {
    pub form: ExamForm,
    health: HealthMonitor,
    generating: bool,
    questions: Vec<crate::models::question::Question>,
    exam_info: Option<ExamInfo>,
    model_used: Option<String>,
    error_banner: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 健康检查 ==========

    /// 刷新后端健康状态（初次加载和手动"重新检查"共用）
    pub async fn refresh_health(&mut self, client: &BackendClient) {
        let result = client.check_health().await;
        if result.is_err() {
            warn!("⚠️ 后端健康检查失败，禁用生成按钮");
        }
        self.health.record(&result);
    }

    pub fn backend_status(&self) -> crate::client::health::BackendStatus {
        self.health.status()
    }

    /// 生成按钮是否可用：后端在线且没有在途请求
    pub fn can_generate(&self) -> bool {
        self.health.can_generate() && !self.generating
    }

    // ========== 生成请求 ==========

    /// 发起一次生成请求
    ///
    /// 请求期间按钮保持禁用；完成（无论成败）后恢复。
    pub async fn submit(&mut self, client: &BackendClient) {
        if !self.can_generate() {
            warn!("⚠️ 当前不可生成（后端离线或已有在途请求）");
            return;
        }

        let request = GenerateRequest {
            course_name: self.form.course_name.clone(),
            exam_type: self.form.exam_type.clone(),
            topic_headings: self.form.topic_headings.clone(),
        };

        self.generating = true;
        self.error_banner = None;

        let result = client.generate_questions(&request).await;
        self.generating = false;

        match result {
            Ok(response) => self.apply_success(response),
            Err(e) => self.apply_failure(e),
        }
    }

    fn apply_success(&mut self, response: GenerateResponse) {
        info!(
            "✅ 收到 {} 道题 (模型: {})",
            response.questions.len(),
            response.model_used
        );
        self.questions = response.questions;
        self.exam_info = Some(response.exam_info);
        self.model_used = Some(response.model_used);
        self.error_banner = None;
    }

    fn apply_failure(&mut self, error: ClientError) {
        warn!("❌ 生成失败: {}", error);
        let banner = match error {
            ClientError::Backend { detail, .. } => detail,
            ClientError::Transport(_) => {
                "Could not reach the generation service. Please check the backend and retry."
                    .to_string()
            }
        };
        self.error_banner = Some(banner);
    }

    // ========== 视图读取 ==========

    pub fn questions(&self) -> &[crate::models::question::Question] {
        &self.questions
    }

    pub fn exam_info(&self) -> Option<&ExamInfo> {
        self.exam_info.as_ref()
    }

    pub fn model_used(&self) -> Option<&str> {
        self.model_used.as_deref()
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// 行内摘要列表，小问题干截断便于扫读
    pub fn summary_lines(&self, max_len: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for question in &self.questions {
            for part in &question.parts {
                lines.push(format!(
                    "Q{}({}) {} [{}]",
                    question.question_number,
                    part.label,
                    truncate_text(&part.text, max_len),
                    format_marks(part.marks)
                ));
            }
        }
        lines
    }

    // ========== 文档导出 ==========

    /// 导出可打印文档
    ///
    /// 没有已生成的题目时拒绝导出，返回面向用户的提示信息。
    pub fn export_document(&self) -> Result<String, String> {
        if self.questions.is_empty() {
            return Err("No questions generated yet. Please generate questions first.".to_string());
        }

        let exam_type = ExamType::find(&self.form.exam_type)
            .ok_or_else(|| format!("unknown examType: {}", self.form.exam_type))?;

        let header = PaperHeader {
            course_name: self.form.course_name.clone(),
            course_code: self.form.course_code.clone(),
            department: self.form.department.clone(),
            semester: self.form.semester.clone(),
            exam_type,
        };

        Ok(PaperDocument::new(&header, &self.questions).render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::HealthResponse;
    use crate::models::question::{Question, QuestionPart};

    fn online_health() -> Result<HealthResponse, ClientError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            api: "operational".to_string(),
            available_models: vec![],
        })
    }

    fn sample_response() -> GenerateResponse {
        GenerateResponse {
            success: true,
            questions: vec![Question {
                question_number: 1,
                parts: vec![
                    QuestionPart {
                        label: "a".to_string(),
                        text: "Define a binary search tree and list its core invariants".to_string(),
                        marks: 3,
                        has_or: false,
                        or_text: None,
                    },
                    QuestionPart {
                        label: "b".to_string(),
                        text: "Explain insertion".to_string(),
                        marks: 3,
                        has_or: false,
                        or_text: None,
                    },
                    QuestionPart {
                        label: "c".to_string(),
                        text: "Apply BST to indexing".to_string(),
                        marks: 4,
                        has_or: true,
                        or_text: Some("Analyze balancing".to_string()),
                    },
                ],
            }],
            message: "Questions generated successfully".to_string(),
            exam_info: ExamInfo {
                duration: "1 Hour".to_string(),
                num_questions: 2,
            },
            model_used: "gemini-2.5-flash".to_string(),
        }
    }

    fn filled_state() -> FormState {
        let mut state = FormState::new();
        state.form.course_name = "Data Structures".to_string();
        state.form.course_code = "CS-301".to_string();
        state.form.department = "Computer Science".to_string();
        state.form.semester = "III".to_string();
        state.form.exam_type = "MST-1".to_string();
        state.form.topic_headings = "Trees, Graphs".to_string();
        state
    }

    #[test]
    fn test_export_refused_without_questions() {
        let state = filled_state();
        let err = state.export_document().unwrap_err();
        assert!(err.contains("No questions generated yet"));
    }

    #[test]
    fn test_export_succeeds_after_generation() {
        let mut state = filled_state();
        state.apply_success(sample_response());

        let html = state.export_document().expect("应该能导出文档");
        assert!(html.contains("Data Structures"));
        assert!(html.contains(">OR</div>"));
    }

    #[test]
    fn test_generation_blocked_until_backend_online() {
        let mut state = filled_state();
        assert!(!state.can_generate());

        state.health.record(&online_health());
        assert!(state.can_generate());

        state.health.record(&Err(ClientError::Backend {
            status: 503,
            detail: "down".to_string(),
        }));
        assert!(!state.can_generate());
    }

    #[test]
    fn test_failure_sets_error_banner() {
        let mut state = filled_state();
        state.apply_failure(ClientError::Backend {
            status: 429,
            detail: "API quota exceeded. Please try again later.".to_string(),
        });
        assert_eq!(
            state.error_banner(),
            Some("API quota exceeded. Please try again later.")
        );
    }

    #[test]
    fn test_success_clears_error_banner() {
        let mut state = filled_state();
        state.apply_failure(ClientError::Backend {
            status: 500,
            detail: "boom".to_string(),
        });
        state.apply_success(sample_response());
        assert!(state.error_banner().is_none());
        assert_eq!(state.questions().len(), 1);
        assert_eq!(state.model_used(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn test_summary_lines_truncate_and_pad_marks() {
        let mut state = filled_state();
        state.apply_success(sample_response());

        let lines = state.summary_lines(20);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Q1(a)"));
        assert!(lines[0].contains("..."));
        assert!(lines[0].ends_with("[03]"));
        assert!(lines[2].ends_with("[04]"));
    }
}
