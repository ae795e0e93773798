use rca_core::error::AppError;
use serde::{Deserialize, Serialize};

/// Page identity plus the version counter the remote system uses for
/// optimistic-concurrency update checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub id: String,
    pub version: i64,
}

/// Wiki publishing boundary. Every call is fire-once: no retry, no
/// idempotency key; a failed call is terminal for that invocation.
pub trait WikiPublisher {
    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        labels: &[String],
        parent_id: Option<&str>,
    ) -> Result<String, AppError>;

    fn get_page(&self, page_id: &str) -> Result<PageInfo, AppError>;

    /// Reads the current version and submits `current + 1`. Two callers
    /// racing on the same page are not coordinated here; a stale version
    /// surfaces as a conflict error from the remote system.
    fn update_page(&self, page_id: &str, title: &str, body: &str) -> Result<(), AppError>;

    fn add_comment(&self, page_id: &str, comment: &str) -> Result<(), AppError>;

    fn add_attachment(
        &self,
        page_id: &str,
        file: &[u8],
        filename: &str,
    ) -> Result<(), AppError>;

    /// Browse URL for a published page, used in chat replies.
    fn page_url(&self, space_key: &str, page_id: &str) -> String;
}

pub mod confluence;
