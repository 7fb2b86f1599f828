//! HTTP 接口 - 路由与处理函数
//!
//! 三个端点：
//! - `GET /` 运行状态横幅
//! - `GET /health` 健康检查，列出当前可用的回退模型
//! - `POST /api/generate-questions` 生成试卷题目

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::api::{GenerateRequest, GenerateResponse, HealthResponse};
use crate::models::exam::ExamRequest;
use crate::services::llm_service::TextModel;
use crate::utils::logging::log_generation_request;
use crate::workflow::generation_flow::GenerationFlow;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub flow: Arc<GenerationFlow>,
    pub llm: Arc<dyn TextModel>,
}

/// GET / 响应体
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}

/// 构建带 CORS 白名单的完整路由
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/generate-questions", post(generate_questions))
        .layer(cors)
        .with_state(state)
}

/// 运行状态横幅
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Exam Paper Generator API is running".to_string(),
        status: "healthy".to_string(),
    })
}

/// 健康检查
///
/// 密钥未配置时报告降级状态；否则向上游查询模型列表，
/// 取与回退列表的交集（保持回退顺序）。上游查询失败不算
/// 服务不健康，只是模型列表为空。
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    if !state.config.has_api_key() {
        return Json(HealthResponse {
            status: "degraded".to_string(),
            api: "unconfigured".to_string(),
            available_models: vec![],
        });
    }

    let available_models = match state.llm.list_models().await {
        Ok(upstream_models) => state
            .config
            .model_fallback
            .iter()
            .filter(|m| upstream_models.iter().any(|u| u == *m))
            .cloned()
            .collect(),
        Err(e) => {
            warn!("⚠️ 查询上游模型列表失败: {}", e);
            vec![]
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        api: "operational".to_string(),
        available_models,
    })
}

/// 生成试卷题目
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> AppResult<Json<GenerateResponse>> {
    log_generation_request(&request.course_name, &request.exam_type);

    // 密钥缺失在发起任何上游调用之前拦截
    if !state.config.has_api_key() {
        return Err(AppError::auth_rejected("credential not configured"));
    }

    // 参数校验（校验失败不触发任何模型调用）
    let exam_request = ExamRequest::parse(
        &request.course_name,
        &request.exam_type,
        &request.topic_headings,
    )?;

    let generated = state.flow.generate(&exam_request).await?;

    info!("✅ 请求完成，使用模型: {}", generated.model_used);

    Ok(Json(GenerateResponse {
        success: true,
        questions: generated.questions,
        message: "Questions generated successfully".to_string(),
        exam_info: generated.exam_info,
        model_used: generated.model_used,
    }))
}
