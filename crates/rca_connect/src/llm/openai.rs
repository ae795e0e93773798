use rca_core::error::AppError;
use serde::Deserialize;

use super::{ChatMessage, ChatModel};
use crate::config::LlmConfig;

/// Reply used when the completion API returns no usable choice.
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";

#[derive(Debug, Clone)]
pub struct OpenAiChat {
    base_url: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// First choice's message content, or the fixed fallback when absent.
pub fn reply_from_response(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

impl ChatModel for OpenAiChat {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        let resp = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(std::time::Duration::from_secs(30))
            .send_json(payload);

        match resp {
            Ok(r) => {
                let v: CompletionResponse = r.into_json().map_err(|e| {
                    AppError::new("LLM_COMPLETION_FAILED", "Failed to decode completion response")
                        .with_details(e.to_string())
                })?;
                Ok(reply_from_response(v))
            }
            Err(ureq::Error::Status(code, _)) => Err(AppError::new(
                "LLM_COMPLETION_FAILED",
                "Completion request failed",
            )
            .with_details(format!("status={code}"))),
            Err(e) => Err(
                AppError::new("LLM_COMPLETION_FAILED", "Failed to call completion endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CompletionResponse {
        serde_json::from_str(json).expect("parse")
    }

    #[test]
    fn takes_first_choice_content() {
        let r = parse(
            r#"{"choices": [
                {"message": {"content": "first"}},
                {"message": {"content": "second"}}
            ]}"#,
        );
        assert_eq!(reply_from_response(r), "first");
    }

    #[test]
    fn falls_back_when_choices_are_empty_or_contentless() {
        assert_eq!(reply_from_response(parse(r#"{"choices": []}"#)), FALLBACK_REPLY);
        assert_eq!(reply_from_response(parse(r#"{}"#)), FALLBACK_REPLY);
        assert_eq!(
            reply_from_response(parse(r#"{"choices": [{"message": {"content": null}}]}"#)),
            FALLBACK_REPLY
        );
        assert_eq!(
            reply_from_response(parse(r#"{"choices": [{"message": null}]}"#)),
            FALLBACK_REPLY
        );
    }
}
