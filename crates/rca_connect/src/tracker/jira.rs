use rca_core::error::AppError;
use serde::Deserialize;

use super::IssueTracker;
use crate::auth::basic_auth_header;
use crate::config::TrackerConfig;

const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    auth: String,
    project_key: String,
}

impl JiraClient {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: basic_auth_header(&config.email, &config.api_token),
            project_key: config.project_key.clone(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3{path}", self.base_url)
    }
}

/// Rich-text document wrapper: root doc -> one paragraph -> one text node.
pub fn rich_text_doc(text: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": "paragraph",
                "content": [
                    {"type": "text", "text": text}
                ]
            }
        ]
    })
}

pub fn create_issue_payload(
    project_key: &str,
    summary: &str,
    description: &str,
    issue_type: &str,
) -> serde_json::Value {
    serde_json::json!({
        "fields": {
            "project": {"key": project_key},
            "summary": summary,
            "description": rich_text_doc(description),
            "issuetype": {"name": issue_type}
        }
    })
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

fn remote_error(code: &str, message: &str, status: u16) -> AppError {
    AppError::new(code, message).with_details(format!("status={status}"))
}

fn transport_error(code: &str, message: &str, err: ureq::Error) -> AppError {
    AppError::new(code, message)
        .with_details(err.to_string())
        .with_retryable(true)
}

impl IssueTracker for JiraClient {
    fn create_issue(
        &self,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> Result<String, AppError> {
        let payload = create_issue_payload(&self.project_key, summary, description, issue_type);
        let resp = ureq::post(&self.api_url("/issue"))
            .set("Authorization", &self.auth)
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(r) => {
                let created: CreatedIssue = r.into_json().map_err(|e| {
                    AppError::new("TRACKER_CREATE_FAILED", "Failed to decode created issue")
                        .with_details(e.to_string())
                })?;
                Ok(created.key)
            }
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "TRACKER_CREATE_FAILED",
                "Issue creation failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "TRACKER_CREATE_FAILED",
                "Failed to call issue create endpoint",
                e,
            )),
        }
    }

    fn update_issue(&self, issue_key: &str, description: &str) -> Result<(), AppError> {
        let payload = serde_json::json!({
            "fields": {"description": rich_text_doc(description)}
        });
        let resp = ureq::put(&self.api_url(&format!("/issue/{issue_key}")))
            .set("Authorization", &self.auth)
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "TRACKER_UPDATE_FAILED",
                "Issue update failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "TRACKER_UPDATE_FAILED",
                "Failed to call issue update endpoint",
                e,
            )),
        }
    }

    fn add_comment(&self, issue_key: &str, comment: &str) -> Result<(), AppError> {
        let payload = serde_json::json!({"body": rich_text_doc(comment)});
        let resp = ureq::post(&self.api_url(&format!("/issue/{issue_key}/comment")))
            .set("Authorization", &self.auth)
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "TRACKER_COMMENT_FAILED",
                "Issue comment failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "TRACKER_COMMENT_FAILED",
                "Failed to call issue comment endpoint",
                e,
            )),
        }
    }
}
