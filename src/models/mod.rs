pub mod api;
pub mod exam;
pub mod question;

pub use api::{ErrorBody, GenerateRequest, GenerateResponse, HealthResponse};
pub use exam::{ExamInfo, ExamRequest, ExamTemplate, ExamType};
pub use question::{Question, QuestionOutline, QuestionPart};
