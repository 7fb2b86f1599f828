use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 请求参数校验错误
    Validation(ValidationError),
    /// 上游生成模型错误
    Upstream(UpstreamError),
    /// 回退列表全部尝试失败
    AllModelsExhausted {
        attempts: usize,
        last: Box<UpstreamError>,
    },
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Upstream(e) => write!(f, "上游错误: {}", e),
            AppError::AllModelsExhausted { attempts, last } => {
                write!(f, "全部 {} 个回退模型均失败，最后一个错误: {}", attempts, last)
            }
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Upstream(e) => Some(e),
            AppError::AllModelsExhausted { last, .. } => Some(last.as_ref()),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 请求参数校验错误
#[derive(Debug)]
pub enum ValidationError {
    /// 课程名称为空
    EmptyCourseName,
    /// 主题列表为空
    EmptyTopicHeadings,
    /// 未知的考试类型
    UnknownExamType { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyCourseName => write!(f, "课程名称不能为空"),
            ValidationError::EmptyTopicHeadings => write!(f, "主题列表不能为空"),
            ValidationError::UnknownExamType { value } => {
                write!(f, "无法识别的考试类型: {}", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 上游生成模型错误
#[derive(Debug)]
pub enum UpstreamError {
    /// 配额/频率限制
    QuotaExceeded { model: String },
    /// 密钥缺失或被拒绝
    AuthRejected { reason: String },
    /// 单次调用超时
    Timeout { model: String, secs: u64 },
    /// 返回内容无法解析或不符合题目结构
    MalformedResponse { model: String, reason: String },
    /// 返回内容为空
    EmptyResponse { model: String },
    /// 网络请求失败
    RequestFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl UpstreamError {
    /// 是否可以换下一个模型重试
    ///
    /// 密钥错误换模型也不会成功，其余错误都继续走回退列表。
    pub fn is_retryable(&self) -> bool {
        !matches!(self, UpstreamError::AuthRejected { .. })
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::QuotaExceeded { model } => {
                write!(f, "API配额超限 (模型: {})", model)
            }
            UpstreamError::AuthRejected { reason } => {
                write!(f, "API密钥无效: {}", reason)
            }
            UpstreamError::Timeout { model, secs } => {
                write!(f, "模型 {} 调用超时 ({}秒)", model, secs)
            }
            UpstreamError::MalformedResponse { model, reason } => {
                write!(f, "模型 {} 返回内容无法解析: {}", model, reason)
            }
            UpstreamError::EmptyResponse { model } => {
                write!(f, "模型 {} 返回内容为空", model)
            }
            UpstreamError::RequestFailed { model, source } => {
                write!(f, "模型 {} 请求失败: {}", model, source)
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 模型回退列表为空
    EmptyModelList,
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyModelList => write!(f, "模型回退列表为空"),
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建配额超限错误
    pub fn quota_exceeded(model: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError::QuotaExceeded {
            model: model.into(),
        })
    }

    /// 创建密钥错误
    pub fn auth_rejected(reason: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError::AuthRejected {
            reason: reason.into(),
        })
    }

    /// 创建超时错误
    pub fn timeout(model: impl Into<String>, secs: u64) -> Self {
        AppError::Upstream(UpstreamError::Timeout {
            model: model.into(),
            secs,
        })
    }

    /// 创建内容解析失败错误
    pub fn malformed_response(model: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError::MalformedResponse {
            model: model.into(),
            reason: reason.into(),
        })
    }

    /// 创建空响应错误
    pub fn empty_response(model: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError::EmptyResponse {
            model: model.into(),
        })
    }

    /// 创建上游请求失败错误
    pub fn upstream_request_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Upstream(UpstreamError::RequestFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

// ========== HTTP 映射 ==========

impl UpstreamError {
    fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            UpstreamError::AuthRejected { .. } => StatusCode::UNAUTHORIZED,
            UpstreamError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::MalformedResponse { .. }
            | UpstreamError::EmptyResponse { .. }
            | UpstreamError::RequestFailed { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// 面向调用方的说明文字，不暴露密钥和内部细节
    fn detail(&self) -> String {
        match self {
            UpstreamError::QuotaExceeded { .. } => {
                "API quota exceeded. Please try again later.".to_string()
            }
            UpstreamError::AuthRejected { .. } => "Invalid API key configuration".to_string(),
            UpstreamError::Timeout { .. } => "Request timed out. Please try again.".to_string(),
            UpstreamError::MalformedResponse { model, reason } => {
                format!("Failed to generate questions: model {} returned an unreadable response ({})", model, reason)
            }
            UpstreamError::EmptyResponse { model } => {
                format!("Failed to generate questions: model {} returned an empty response", model)
            }
            UpstreamError::RequestFailed { model, .. } => {
                format!("Failed to generate questions: request to model {} failed", model)
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream(e) => e.status_code(),
            AppError::AllModelsExhausted { last, .. } => last.status_code(),
            AppError::Config(_) | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 响应体中的 detail 字段
    pub fn detail(&self) -> String {
        match self {
            AppError::Validation(ValidationError::EmptyCourseName) => {
                "courseName must not be empty".to_string()
            }
            AppError::Validation(ValidationError::EmptyTopicHeadings) => {
                "topicHeadings must not be empty".to_string()
            }
            AppError::Validation(ValidationError::UnknownExamType { value }) => {
                format!("unknown examType: {}", value)
            }
            AppError::Upstream(e) => e.detail(),
            AppError::AllModelsExhausted { attempts, last } => {
                format!("All {} fallback models failed. {}", attempts, last.detail())
            }
            AppError::Config(_) | AppError::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON处理失败: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(format!("IO错误: {}", err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
