//! 后端 API 客户端
//!
//! 封装所有与生成服务相关的 HTTP 调用逻辑

use thiserror::Error;
use tracing::debug;

use crate::models::api::{ErrorBody, GenerateRequest, GenerateResponse, HealthResponse};

/// 客户端错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    /// 请求没有到达后端（网络/超时）
    #[error("请求发送失败: {0}")]
    Transport(#[from] reqwest::Error),
    /// 后端返回了非 2xx 响应
    #[error("后端返回错误 ({status}): {detail}")]
    Backend { status: u16, detail: String },
}

/// 生成服务客户端
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// 创建新的后端客户端
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 探测后端健康状态
    pub async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!("健康检查: {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::backend_error(status.as_u16(), response).await);
        }

        Ok(response.json::<HealthResponse>().await?)
    }

    /// 发起一次题目生成请求
    pub async fn generate_questions(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ClientError> {
        let url = format!("{}/api/generate-questions", self.base_url);
        debug!("生成请求: {} ({})", url, request.exam_type);

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::backend_error(status.as_u16(), response).await);
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    /// 把非 2xx 响应体里的 detail 提取成客户端错误
    async fn backend_error(status: u16, response: reqwest::Response) -> ClientError {
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("HTTP {}", status),
        };
        ClientError::Backend { status, detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_backend_error_display_carries_detail() {
        let err = ClientError::Backend {
            status: 429,
            detail: "API quota exceeded. Please try again later.".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("quota"));
    }
}
