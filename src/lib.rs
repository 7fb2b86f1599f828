//! # Paper Vista
//!
//! 一个调用生成式模型自动出卷的 Web 服务
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `config` - 环境变量配置（端口、密钥、模型回退列表）
//! - `logger` - tracing 日志初始化
//! - `error` - 统一错误类型与 HTTP 状态映射
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `LlmService` - 调用生成模型能力（带单次超时）
//! - `response_parser` - 模型响应清洗与解析能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次生成请求"的完整处理流程
//! - `prompts` - 两阶段提示词构建
//! - `GenerationFlow` - 流程编排（大纲 → 内容 → 模型回退）
//!
//! ### ④ 接口层（Server）
//! - `server/` - axum 路由、CORS 白名单、应用装配与启动
//!
//! ### ⑤ 客户端（Client）
//! - `client/` - 表单状态机、后端健康探测、生成接口调用
//! - `document/` - 可打印试卷文档模板
//!
//! ## 模块结构

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod logger;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use client::{BackendClient, BackendStatus, FormState, HealthMonitor};
pub use config::Config;
pub use document::{format_marks, PaperDocument, PaperHeader};
pub use error::{AppError, AppResult};
pub use models::{ExamInfo, ExamRequest, ExamTemplate, ExamType, Question, QuestionPart};
pub use server::App;
pub use services::{LlmService, PromptSpec, TextModel};
pub use workflow::{GeneratedExam, GenerationFlow};
