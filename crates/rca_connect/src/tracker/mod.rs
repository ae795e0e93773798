use rca_core::error::AppError;

/// Issue-tracker boundary. Descriptions and comments are plain text here;
/// clients shape them into the tracker's rich-text document format.
pub trait IssueTracker {
    fn create_issue(
        &self,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> Result<String, AppError>;

    fn update_issue(&self, issue_key: &str, description: &str) -> Result<(), AppError>;

    fn add_comment(&self, issue_key: &str, comment: &str) -> Result<(), AppError>;
}

pub mod jira;
