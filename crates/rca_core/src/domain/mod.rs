use serde::{Deserialize, Serialize};

/// Incident severity, ordered by decreasing urgency (P1 is the most urgent).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    P1,
    P2,
    P3,
    P4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::P1 => "P1",
            Severity::P2 => "P2",
            Severity::P3 => "P3",
            Severity::P4 => "P4",
        }
    }
}

/// Lifecycle tag for an incident. This is a plain label, not a validated
/// state machine: callers may set any value at any time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Identified => "identified",
            IncidentStatus::Monitoring => "monitoring",
            IncidentStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActionItemStatus {
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionItemPriority {
    High,
    Medium,
    Low,
}

/// One timeline event. `timestamp` is expected to be RFC3339 UTC; renderers
/// canonicalize where possible and pass unparseable values through escaped
/// rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionItem {
    pub id: String,
    pub description: String,
    pub assignee: String,
    pub due_date: Option<String>,
    pub status: ActionItemStatus,
    pub priority: ActionItemPriority,
}

/// Caller-owned incident record feeding the RCA renderer.
///
/// Notes:
/// - There is no backing data store; callers construct these from whatever
///   incident system they have.
/// - `status = resolved` does not guarantee `end_ts` is present. The model
///   tolerates the inconsistency and the overview renderer substitutes
///   "Ongoing" for a missing end timestamp regardless of status.
/// - `timeline` order is preserved as given; nothing re-sorts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentRecord {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub start_ts: String,
    pub end_ts: Option<String>,
    pub description: String,
    pub impacted_services: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub root_cause: Option<String>,
    pub resolution: Option<String>,
    pub action_items: Vec<ActionItem>,
}

/// Placement metadata for a published document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishMetadata {
    pub space_key: String,
    pub parent_id: Option<String>,
    pub labels: Vec<String>,
    pub template_id: Option<String>,
}

/// Soft finding surfaced alongside results instead of being logged and
/// dropped. Codes are stable strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
