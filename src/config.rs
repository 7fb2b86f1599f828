/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 服务监听端口
    pub listen_port: u16,
    /// 允许跨域访问的前端地址
    pub frontend_url: String,
    /// 生成模型 API 密钥（缺失时服务降级，不直接崩溃）
    pub llm_api_key: Option<String>,
    /// 生成模型 API 基础地址（OpenAI 兼容端点）
    pub llm_api_base_url: String,
    /// 模型回退列表，按顺序逐个尝试
    pub model_fallback: Vec<String>,
    /// 单次模型调用的超时时间（秒）
    pub generation_timeout_secs: u64,
    /// 单道题目内容生成的最大重试次数（同一模型内）
    pub content_max_retries: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: 8000,
            frontend_url: "https://paper-vista-five.vercel.app".to_string(),
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model_fallback: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-flash-lite".to_string(),
                "gemini-3-flash".to_string(),
            ],
            generation_timeout_secs: 45,
            content_max_retries: 3,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            listen_port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.listen_port),
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(default.frontend_url),
            llm_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.trim().is_empty()),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            model_fallback: std::env::var("MODEL_FALLBACK_LIST")
                .ok()
                .map(|v| parse_model_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(default.model_fallback),
            generation_timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.generation_timeout_secs),
            content_max_retries: std::env::var("CONTENT_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.content_max_retries),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 是否配置了生成模型密钥
    pub fn has_api_key(&self) -> bool {
        self.llm_api_key.is_some()
    }

    /// CORS 白名单：配置的前端地址 + 固定的线上/本地开发地址
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![
            self.frontend_url.clone(),
            "https://paper-vista-five.vercel.app".to_string(),
            "http://localhost:5173".to_string(),
            "http://localhost:3000".to_string(),
        ];
        origins.dedup();
        origins
    }
}

/// 解析逗号分隔的模型列表，去掉空白项
fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_port, 8000);
        assert_eq!(config.generation_timeout_secs, 45);
        assert_eq!(config.model_fallback.len(), 3);
        assert_eq!(config.model_fallback[0], "gemini-2.5-flash");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_parse_model_list() {
        let models = parse_model_list("gemini-2.5-flash, gemini-2.5-flash-lite ,, ");
        assert_eq!(models, vec!["gemini-2.5-flash", "gemini-2.5-flash-lite"]);
    }

    #[test]
    fn test_allowed_origins_include_local_dev() {
        let config = Config::default();
        let origins = config.allowed_origins();
        assert!(origins.contains(&"http://localhost:5173".to_string()));
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }
}
