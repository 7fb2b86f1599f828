//! 后端健康状态机
//!
//! 三个状态：未检查 / 在线 / 离线。状态只由健康检查的结果驱动，
//! 手动"重新检查"就是再记录一次新的检查结果。

use crate::client::backend_client::ClientError;
use crate::models::api::HealthResponse;

/// 后端可达性状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    /// 尚未进行过健康检查
    #[default]
    Unchecked,
    /// 最近一次检查成功
    Online,
    /// 最近一次检查失败
    Offline,
}

/// 健康状态机
#[derive(Debug, Default)]
pub struct HealthMonitor {
    status: BackendStatus,
    /// 最近一次检查返回的模型列表（在线时有值）
    available_models: Vec<String>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> BackendStatus {
        self.status
    }

    pub fn available_models(&self) -> &[String] {
        &self.available_models
    }

    /// 记录一次健康检查结果
    pub fn record(&mut self, result: &Result<HealthResponse, ClientError>) {
        match result {
            Ok(health) => {
                self.status = BackendStatus::Online;
                self.available_models = health.available_models.clone();
            }
            Err(_) => {
                self.status = BackendStatus::Offline;
                self.available_models.clear();
            }
        }
    }

    /// 是否允许发起生成
    ///
    /// 只有确认在线才放行；未检查状态同样禁用。
    pub fn can_generate(&self) -> bool {
        self.status == BackendStatus::Online
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_response() -> Result<HealthResponse, ClientError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            api: "operational".to_string(),
            available_models: vec!["gemini-2.5-flash".to_string()],
        })
    }

    fn failed_check() -> Result<HealthResponse, ClientError> {
        Err(ClientError::Backend {
            status: 503,
            detail: "unavailable".to_string(),
        })
    }

    #[test]
    fn test_initial_state_blocks_generation() {
        let monitor = HealthMonitor::new();
        assert_eq!(monitor.status(), BackendStatus::Unchecked);
        assert!(!monitor.can_generate());
    }

    #[test]
    fn test_failed_check_disables_generation() {
        let mut monitor = HealthMonitor::new();
        monitor.record(&healthy_response());
        assert!(monitor.can_generate());

        monitor.record(&failed_check());
        assert_eq!(monitor.status(), BackendStatus::Offline);
        assert!(!monitor.can_generate());
        assert!(monitor.available_models().is_empty());
    }

    #[test]
    fn test_recheck_restores_generation() {
        let mut monitor = HealthMonitor::new();
        monitor.record(&failed_check());
        assert!(!monitor.can_generate());

        // 手动重新检查成功后恢复可用
        monitor.record(&healthy_response());
        assert_eq!(monitor.status(), BackendStatus::Online);
        assert!(monitor.can_generate());
        assert_eq!(monitor.available_models(), ["gemini-2.5-flash"]);
    }
}
