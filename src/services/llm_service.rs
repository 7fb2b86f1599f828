//! LLM 服务 - 业务能力层
//!
//! 只负责"调用生成模型"这一件事，不关心提示词内容和流程顺序。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 走 Gemini 的 OpenAI 兼容端点，模型名由调用方逐次指定
//! - 每次调用包一层超时，超时视为该模型失败

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, UpstreamError};

/// 一次模型调用的提示词与采样参数
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 生成模型能力抽象
///
/// 流程层只依赖这个 trait，测试时用脚本化的 mock 替换真实服务。
#[async_trait]
pub trait TextModel: Send + Sync {
    /// 向指定模型发送一次提示词，返回文本响应
    async fn generate(&self, model: &str, prompt: &PromptSpec) -> AppResult<String>;

    /// 列出上游当前可用的模型标识
    async fn list_models(&self) -> AppResult<Vec<String>>;
}

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// 密钥缺失时用空密钥构建客户端；调用方负责在发起请求前拦截。
    pub fn new(config: &Config) -> Self {
        let api_key = config.llm_api_key.clone().unwrap_or_default();
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }
}

#[async_trait]
impl TextModel for LlmService {
    async fn generate(&self, model: &str, prompt: &PromptSpec) -> AppResult<String> {
        debug!("调用生成模型: {}", model);
        debug!("用户消息长度: {} 字符", prompt.user.len());

        // 构建消息列表
        let mut messages = Vec::new();

        if let Some(sys_msg) = &prompt.system {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()
                .map_err(|e| AppError::upstream_request_failed(model, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.as_str())
            .build()
            .map_err(|e| AppError::upstream_request_failed(model, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(prompt.temperature)
            .max_tokens(prompt.max_tokens)
            .build()
            .map_err(|e| AppError::upstream_request_failed(model, e))?;

        // 调用 API，外层包一次超时
        let response = match tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(api_err)) => {
                warn!("模型 {} 调用失败: {}", model, api_err);
                return Err(AppError::Upstream(classify_upstream_failure(
                    model,
                    &api_err.to_string(),
                )));
            }
            Err(_elapsed) => {
                warn!("模型 {} 调用超时 ({}秒)", model, self.timeout.as_secs());
                return Err(AppError::timeout(model, self.timeout.as_secs()));
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        // 少于 10 个字符的响应视为无效（上游偶尔返回空串或单个标点）
        if content.trim().len() < 10 {
            return Err(AppError::empty_response(model));
        }

        debug!("模型 {} 调用成功", model);
        Ok(content.trim().to_string())
    }

    async fn list_models(&self) -> AppResult<Vec<String>> {
        let response = match tokio::time::timeout(self.timeout, self.client.models().list()).await {
            Ok(Ok(response)) => response,
            Ok(Err(api_err)) => {
                return Err(AppError::Upstream(classify_upstream_failure(
                    "models",
                    &api_err.to_string(),
                )));
            }
            Err(_elapsed) => return Err(AppError::timeout("models", self.timeout.as_secs())),
        };

        Ok(response.data.into_iter().map(|m| m.id).collect())
    }
}

/// 根据上游错误信息归类错误
///
/// 上游把配额、鉴权等信息揉在错误文本里，这里按关键词归类，
/// 归不进去的都算网络/服务失败（可换模型重试）。
pub fn classify_upstream_failure(model: &str, message: &str) -> UpstreamError {
    let lower = message.to_lowercase();

    const QUOTA_KEYWORDS: [&str; 4] = ["429", "quota", "rate limit", "resource exhausted"];
    const AUTH_KEYWORDS: [&str; 5] = [
        "401",
        "unauthorized",
        "api key",
        "invalid authentication",
        "permission denied",
    ];

    if QUOTA_KEYWORDS.iter().any(|k| lower.contains(k)) {
        UpstreamError::QuotaExceeded {
            model: model.to_string(),
        }
    } else if AUTH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        UpstreamError::AuthRejected {
            reason: "credential rejected by upstream".to_string(),
        }
    } else {
        UpstreamError::RequestFailed {
            model: model.to_string(),
            source: message.to_string().into(),
        }
    }
}
