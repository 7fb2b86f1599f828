pub mod llm_service;
pub mod response_parser;

pub use llm_service::{LlmService, PromptSpec, TextModel};
