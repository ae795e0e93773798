use serde::{Deserialize, Serialize};
use std::fmt;

/// Action label derived from a raw chat message by keyword sniffing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionLabel {
    Resolution,
    Investigation,
    ErrorReport,
    Update,
}

impl ActionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLabel::Resolution => "Resolution",
            ActionLabel::Investigation => "Investigation",
            ActionLabel::ErrorReport => "Error Report",
            ActionLabel::Update => "Update",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw message into an action label.
///
/// Case-insensitive substring checks, first match wins, in this order:
/// "fixed"/"resolved" -> Resolution, "investigating" -> Investigation,
/// "error"/"failed" -> Error Report, otherwise Update.
pub fn classify_action(text: &str) -> ActionLabel {
    let lower = text.to_lowercase();
    if lower.contains("fixed") || lower.contains("resolved") {
        ActionLabel::Resolution
    } else if lower.contains("investigating") {
        ActionLabel::Investigation
    } else if lower.contains("error") || lower.contains("failed") {
        ActionLabel::ErrorReport
    } else {
        ActionLabel::Update
    }
}
