//! 日志工具模块
//!
//! 提供启动横幅和文本截断等辅助函数

use tracing::{info, warn};

use crate::config::Config;

/// 记录服务启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 试卷生成服务启动");
    info!("📊 监听端口: {}", config.listen_port);
    info!("🌐 前端地址: {}", config.frontend_url);
    info!("🧠 模型回退列表: {}", config.model_fallback.join(" → "));
    info!("⏱️ 单次调用超时: {}秒", config.generation_timeout_secs);
    if !config.has_api_key() {
        warn!("⚠️ GEMINI_API_KEY 未配置，生成接口将返回鉴权错误");
    }
    info!("{}", "=".repeat(60));
}

/// 记录一次生成请求
pub fn log_generation_request(course_name: &str, exam_type: &str) {
    info!("\n📝 新请求: {} / {}", exam_type, course_name);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
