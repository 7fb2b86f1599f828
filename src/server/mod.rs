//! HTTP 服务 - 接口层
//!
//! `App` 负责把配置、LLM 服务和生成流程装配成一个 axum 应用，
//! 并管理监听与启动。

pub mod api;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::config::Config;
use crate::services::llm_service::{LlmService, TextModel};
use crate::utils::logging::log_startup;
use crate::workflow::generation_flow::GenerationFlow;

pub use api::{build_router, AppState};

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用：装配服务与路由
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let llm: Arc<dyn TextModel> = Arc::new(LlmService::new(&config));
        let flow = Arc::new(GenerationFlow::new(&config, llm.clone()));

        let state = AppState {
            config: Arc::new(config.clone()),
            flow,
            llm,
        };

        Ok(Self {
            config,
            router: build_router(state),
        })
    }

    /// 启动监听并运行至进程结束
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.listen_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("🚀 服务已启动，监听 {}", addr);

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
