//! 试卷生成流程 - 流程层
//!
//! 核心职责：定义"一次生成请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 按回退列表取一个模型
//! 2. 阶段一：生成题目大纲（截断/补齐到模板题数）
//! 3. 阶段二：按大纲逐题生成内容（同模型内重试）
//! 4. 任一阶段可重试失败 → 换下一个模型；列表耗尽 → 整体失败

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, UpstreamError};
use crate::models::exam::{ExamInfo, ExamRequest, ExamTemplate};
use crate::models::question::{Question, QuestionOutline};
use crate::services::llm_service::TextModel;
use crate::services::response_parser;
use crate::utils::logging::truncate_text;
use crate::workflow::prompts;

/// 换模型/重试前的退避间隔
const RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// 相邻题目之间的间隔，避免触发上游频率限制
const QUESTION_PACING: Duration = Duration::from_millis(500);

/// 一次生成请求的成功结果
#[derive(Debug, Clone)]
pub struct GeneratedExam {
    pub questions: Vec<Question>,
    pub exam_info: ExamInfo,
    /// 最终成功的模型标识
    pub model_used: String,
}

/// 试卷生成流程
///
/// - 编排两阶段提示与模型回退
/// - 不持有 HTTP 资源，只依赖 `TextModel` 能力
/// - 每个请求独立，无共享可变状态
pub struct GenerationFlow {
    llm: Arc<dyn TextModel>,
    model_fallback: Vec<String>,
    content_max_retries: usize,
    verbose_logging: bool,
}

impl GenerationFlow {
    /// 创建新的生成流程
    pub fn new(config: &Config, llm: Arc<dyn TextModel>) -> Self {
        Self {
            llm,
            model_fallback: config.model_fallback.clone(),
            content_max_retries: config.content_max_retries.max(1),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 执行一次完整的生成请求
    pub async fn generate(&self, request: &ExamRequest) -> AppResult<GeneratedExam> {
        if self.model_fallback.is_empty() {
            return Err(AppError::Config(ConfigError::EmptyModelList));
        }

        let template = request.exam_type.template();
        info!(
            "⚙️ 生成配置: {} / {} 道题 / 主题 {} 个",
            request.exam_type,
            template.num_questions,
            request.topics.len()
        );

        let mut attempts = 0usize;
        let mut last_error: Option<UpstreamError> = None;

        for model in &self.model_fallback {
            attempts += 1;
            info!("🔄 第 {} 次尝试: 使用模型 {}", attempts, model);

            match self.attempt_with_model(model, request, &template).await {
                Ok(questions) => {
                    info!("🎉 模型 {} 生成完成，共 {} 道题", model, questions.len());
                    return Ok(GeneratedExam {
                        questions,
                        exam_info: ExamInfo::from(request.exam_type),
                        model_used: model.clone(),
                    });
                }
                Err(AppError::Upstream(upstream)) if upstream.is_retryable() => {
                    warn!("⚠️ 模型 {} 失败: {}，尝试下一个模型", model, upstream);
                    last_error = Some(upstream);
                    sleep(RETRY_BACKOFF).await;
                }
                Err(other) => return Err(other),
            }
        }

        // 列表耗尽，带着最后一个上游错误整体失败
        let last = last_error.unwrap_or(UpstreamError::EmptyResponse {
            model: "unknown".to_string(),
        });
        Err(AppError::AllModelsExhausted {
            attempts,
            last: Box::new(last),
        })
    }

    /// 在单个模型上跑完两个阶段
    async fn attempt_with_model(
        &self,
        model: &str,
        request: &ExamRequest,
        template: &ExamTemplate,
    ) -> AppResult<Vec<Question>> {
        // ========== 阶段一: 生成大纲 ==========
        info!("📋 阶段一: 生成题目大纲...");

        let outline_spec = prompts::outline_prompt(request, template);
        let raw = self.llm.generate(model, &outline_spec).await?;

        if self.verbose_logging {
            info!("大纲原始响应: {}", truncate_text(&raw, 200));
        }

        let mut outline = response_parser::parse_outline(&raw)
            .map_err(|reason| AppError::malformed_response(model, reason))?;
        normalize_outline(&mut outline, request, template);

        info!("✓ 阶段一完成: 大纲共 {} 道题", outline.len());

        // ========== 阶段二: 逐题生成内容 ==========
        info!("📝 阶段二: 逐题生成内容...");

        let mut questions = Vec::with_capacity(outline.len());
        for (idx, entry) in outline.iter().enumerate() {
            let question = self
                .generate_question(model, request, template, entry)
                .await?;
            info!("  ↳ 第 {} 题生成完成", entry.question_number);
            questions.push(question);

            if idx + 1 < outline.len() {
                sleep(QUESTION_PACING).await;
            }
        }

        Ok(questions)
    }

    /// 生成单道题目，同一模型内最多重试 content_max_retries 次
    async fn generate_question(
        &self,
        model: &str,
        request: &ExamRequest,
        template: &ExamTemplate,
        entry: &QuestionOutline,
    ) -> AppResult<Question> {
        let topic = entry
            .topic
            .as_deref()
            .unwrap_or_else(|| fallback_topic(request, entry.question_number));
        let spec = prompts::content_prompt(request, template, entry.question_number, topic);

        let mut last_error = None;
        for retry in 1..=self.content_max_retries {
            match self.try_question_once(model, &spec, entry.question_number, template).await {
                Ok(question) => return Ok(question),
                Err(AppError::Upstream(upstream)) if upstream.is_retryable() => {
                    warn!(
                        "  ⚠️ 第 {} 题重试 {}/{}: {}",
                        entry.question_number, retry, self.content_max_retries, upstream
                    );
                    last_error = Some(AppError::Upstream(upstream));
                    if retry < self.content_max_retries {
                        sleep(RETRY_BACKOFF).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::empty_response(model)))
    }

    /// 单次内容生成尝试：调用 → 解析 → 形状校验 → 模板归一化
    async fn try_question_once(
        &self,
        model: &str,
        spec: &crate::services::llm_service::PromptSpec,
        question_number: u32,
        template: &ExamTemplate,
    ) -> AppResult<Question> {
        let raw = self.llm.generate(model, spec).await?;

        let mut question = response_parser::parse_question(&raw)
            .map_err(|reason| AppError::malformed_response(model, reason))?;
        question
            .check_shape()
            .map_err(|reason| AppError::malformed_response(model, reason))?;
        question.apply_template(question_number, template);

        Ok(question)
    }
}

/// 按请求主题补全大纲的缺省主题
fn fallback_topic(request: &ExamRequest, question_number: u32) -> &str {
    let idx = question_number.saturating_sub(1) as usize % request.topics.len();
    &request.topics[idx]
}

/// 归一化大纲：截断到模板题数，不足时循环主题补齐，并统一重排题号
fn normalize_outline(
    outline: &mut Vec<QuestionOutline>,
    request: &ExamRequest,
    template: &ExamTemplate,
) {
    outline.truncate(template.num_questions);

    while outline.len() < template.num_questions {
        let idx = outline.len();
        outline.push(QuestionOutline {
            question_number: (idx + 1) as u32,
            topic: Some(request.topics[idx % request.topics.len()].clone()),
        });
    }

    for (idx, entry) in outline.iter_mut().enumerate() {
        entry.question_number = (idx + 1) as u32;
    }
}
