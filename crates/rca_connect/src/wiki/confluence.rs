use rca_core::error::AppError;
use rca_core::render::{escape_markup, info_macro};
use serde::Deserialize;

use super::{PageInfo, WikiPublisher};
use crate::auth::basic_auth_header;
use crate::config::WikiConfig;

const CALL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    base_url: String,
    auth: String,
}

impl ConfluenceClient {
    pub fn new(config: &WikiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: basic_auth_header(&config.email, &config.api_token),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/wiki/rest/api{path}", self.base_url)
    }
}

/// Request body for page creation. Labels get the `global` prefix; the
/// ancestors list is present only when a parent is given.
pub fn create_page_payload(
    space_key: &str,
    title: &str,
    body: &str,
    labels: &[String],
    parent_id: Option<&str>,
) -> serde_json::Value {
    let label_objects: Vec<serde_json::Value> = labels
        .iter()
        .map(|label| serde_json::json!({"prefix": "global", "name": label}))
        .collect();
    let ancestors: Vec<serde_json::Value> = parent_id
        .map(|id| vec![serde_json::json!({"id": id})])
        .unwrap_or_default();

    serde_json::json!({
        "type": "page",
        "title": title,
        "space": {"key": space_key},
        "body": {
            "storage": {
                "value": body,
                "representation": "storage"
            }
        },
        "metadata": {"labels": label_objects},
        "ancestors": ancestors,
    })
}

/// Request body for a page update carrying the incremented version number.
pub fn update_page_payload(title: &str, body: &str, next_version: i64) -> serde_json::Value {
    serde_json::json!({
        "version": {"number": next_version},
        "title": title,
        "type": "page",
        "body": {
            "storage": {
                "value": body,
                "representation": "storage"
            }
        }
    })
}

/// Request body for a page comment; the text is escaped and wrapped in the
/// storage-format info macro.
pub fn comment_payload(page_id: &str, comment: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "comment",
        "container": {"id": page_id},
        "body": {
            "storage": {
                "value": info_macro(&escape_markup(comment)),
                "representation": "storage"
            }
        }
    })
}

/// Hand-shaped `multipart/form-data` body for the attachment endpoint.
pub fn multipart_file_body(boundary: &str, filename: &str, file: &[u8]) -> Vec<u8> {
    let safe_name = filename.replace('"', "_");
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{safe_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[derive(Debug, Deserialize)]
struct CreatedContent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageWithVersion {
    id: String,
    version: VersionNumber,
}

#[derive(Debug, Deserialize)]
struct VersionNumber {
    number: i64,
}

fn remote_error(code: &str, message: &str, status: u16) -> AppError {
    AppError::new(code, message).with_details(format!("status={status}"))
}

fn transport_error(code: &str, message: &str, err: ureq::Error) -> AppError {
    AppError::new(code, message)
        .with_details(err.to_string())
        .with_retryable(true)
}

impl WikiPublisher for ConfluenceClient {
    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        labels: &[String],
        parent_id: Option<&str>,
    ) -> Result<String, AppError> {
        let payload = create_page_payload(space_key, title, body, labels, parent_id);
        let resp = ureq::post(&self.api_url("/content"))
            .set("Authorization", &self.auth)
            .set("X-Atlassian-Token", "no-check")
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(r) => {
                let created: CreatedContent = r.into_json().map_err(|e| {
                    AppError::new("WIKI_CREATE_FAILED", "Failed to decode created page")
                        .with_details(e.to_string())
                })?;
                Ok(created.id)
            }
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "WIKI_CREATE_FAILED",
                "Wiki page creation failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "WIKI_CREATE_FAILED",
                "Failed to call wiki create endpoint",
                e,
            )),
        }
    }

    fn get_page(&self, page_id: &str) -> Result<PageInfo, AppError> {
        let url = self.api_url(&format!("/content/{page_id}?expand=version"));
        let resp = ureq::get(&url)
            .set("Authorization", &self.auth)
            .timeout(CALL_TIMEOUT)
            .call();

        match resp {
            Ok(r) => {
                let page: PageWithVersion = r.into_json().map_err(|e| {
                    AppError::new("WIKI_GET_FAILED", "Failed to decode wiki page")
                        .with_details(e.to_string())
                })?;
                Ok(PageInfo {
                    id: page.id,
                    version: page.version.number,
                })
            }
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "WIKI_GET_FAILED",
                "Wiki page fetch failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "WIKI_GET_FAILED",
                "Failed to call wiki get endpoint",
                e,
            )),
        }
    }

    fn update_page(&self, page_id: &str, title: &str, body: &str) -> Result<(), AppError> {
        let current = self.get_page(page_id)?;
        let payload = update_page_payload(title, body, current.version + 1);

        let resp = ureq::put(&self.api_url(&format!("/content/{page_id}")))
            .set("Authorization", &self.auth)
            .set("X-Atlassian-Token", "no-check")
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(_) => Ok(()),
            // A stale version loses the optimistic-concurrency check.
            Err(ureq::Error::Status(409, _)) => Err(remote_error(
                "WIKI_UPDATE_CONFLICT",
                "Wiki page version conflict",
                409,
            )),
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "WIKI_UPDATE_FAILED",
                "Wiki page update failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "WIKI_UPDATE_FAILED",
                "Failed to call wiki update endpoint",
                e,
            )),
        }
    }

    fn add_comment(&self, page_id: &str, comment: &str) -> Result<(), AppError> {
        let payload = comment_payload(page_id, comment);
        let resp = ureq::post(&self.api_url(&format!("/content/{page_id}/child/comment")))
            .set("Authorization", &self.auth)
            .timeout(CALL_TIMEOUT)
            .send_json(payload);

        match resp {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "WIKI_COMMENT_FAILED",
                "Wiki comment creation failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "WIKI_COMMENT_FAILED",
                "Failed to call wiki comment endpoint",
                e,
            )),
        }
    }

    fn add_attachment(
        &self,
        page_id: &str,
        file: &[u8],
        filename: &str,
    ) -> Result<(), AppError> {
        let boundary = "rca-attachment-boundary";
        let body = multipart_file_body(boundary, filename, file);

        let resp = ureq::post(&self.api_url(&format!("/content/{page_id}/child/attachment")))
            .set("Authorization", &self.auth)
            .set("X-Atlassian-Token", "no-check")
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .timeout(CALL_TIMEOUT)
            .send_bytes(&body);

        match resp {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(remote_error(
                "WIKI_ATTACHMENT_FAILED",
                "Wiki attachment upload failed",
                status,
            )),
            Err(e) => Err(transport_error(
                "WIKI_ATTACHMENT_FAILED",
                "Failed to call wiki attachment endpoint",
                e,
            )),
        }
    }

    fn page_url(&self, space_key: &str, page_id: &str) -> String {
        format!("{}/wiki/spaces/{space_key}/pages/{page_id}", self.base_url)
    }
}
