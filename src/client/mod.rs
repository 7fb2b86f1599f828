//! 客户端 - 表单与文档装配
//!
//! 对应浏览器端的职责：采集表单输入、探测后端健康、调用生成
//! 接口、持有结果视图状态、导出可打印文档。

pub mod backend_client;
pub mod form_state;
pub mod health;

pub use backend_client::{BackendClient, ClientError};
pub use form_state::{ExamForm, FormState};
pub use health::{BackendStatus, HealthMonitor};
