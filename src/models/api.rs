//! HTTP 接口数据结构
//!
//! 服务端 handler 与客户端 BackendClient 共用同一套 DTO，
//! 字段名按线上协议使用 camelCase。

use serde::{Deserialize, Serialize};

use crate::models::exam::ExamInfo;
use crate::models::question::Question;

/// POST /api/generate-questions 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "courseName")]
    pub course_name: String,
    #[serde(rename = "examType")]
    pub exam_type: String,
    #[serde(rename = "topicHeadings")]
    pub topic_headings: String,
}

/// POST /api/generate-questions 成功响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub message: String,
    #[serde(rename = "examInfo")]
    pub exam_info: ExamInfo,
    #[serde(rename = "modelUsed")]
    pub model_used: String,
}

/// GET /health 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub api: String,
    pub available_models: Vec<String>,
}

impl HealthResponse {
    /// 服务是否处于可生成状态
    pub fn is_operational(&self) -> bool {
        self.status == "healthy" && self.api == "operational"
    }
}

/// 非 2xx 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_wire_names() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"courseName": "Data Structures", "examType": "MST-1", "topicHeadings": "Arrays, Stacks"}"#,
        )
        .unwrap();
        assert_eq!(req.course_name, "Data Structures");
        assert_eq!(req.exam_type, "MST-1");

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"courseName\""));
        assert!(json.contains("\"topicHeadings\""));
    }

    #[test]
    fn test_health_operational_check() {
        let healthy = HealthResponse {
            status: "healthy".to_string(),
            api: "operational".to_string(),
            available_models: vec!["gemini-2.5-flash".to_string()],
        };
        assert!(healthy.is_operational());

        let degraded = HealthResponse {
            status: "degraded".to_string(),
            api: "unconfigured".to_string(),
            available_models: vec![],
        };
        assert!(!degraded.is_operational());
    }
}
