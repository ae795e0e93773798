use rca_core::error::AppError;
use serde::{Deserialize, Serialize};

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

pub trait ChatModel {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AppError>;
}

pub mod openai;
pub mod prompts;
