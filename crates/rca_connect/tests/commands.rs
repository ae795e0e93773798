use std::cell::RefCell;

use pretty_assertions::assert_eq;

use rca_connect::chat::Reply;
use rca_connect::commands::{
    handle_create_ticket, handle_incident_rca, handle_summarize, handle_update_rca,
    parse_incident_rca_args, parse_update_rca_args, CommandContext, INCIDENT_RCA_USAGE,
    UPDATE_RCA_USAGE,
};
use rca_connect::config::Availability;
use rca_connect::llm::{ChatMessage, ChatModel};
use rca_connect::tracker::IssueTracker;
use rca_connect::wiki::{PageInfo, WikiPublisher};
use rca_core::domain::{IncidentRecord, IncidentStatus, Severity, TimelineEntry};
use rca_core::error::AppError;
use rca_core::template::TemplateCatalog;

#[derive(Default)]
struct MockWiki {
    created: RefCell<Vec<(String, String, String, Vec<String>, Option<String>)>>,
    updated: RefCell<Vec<(String, String, String)>>,
    comments: RefCell<Vec<(String, String)>>,
    update_conflict: bool,
}

impl WikiPublisher for MockWiki {
    fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
        labels: &[String],
        parent_id: Option<&str>,
    ) -> Result<String, AppError> {
        self.created.borrow_mut().push((
            space_key.to_string(),
            title.to_string(),
            body.to_string(),
            labels.to_vec(),
            parent_id.map(|s| s.to_string()),
        ));
        Ok("98765".to_string())
    }

    fn get_page(&self, page_id: &str) -> Result<PageInfo, AppError> {
        Ok(PageInfo {
            id: page_id.to_string(),
            version: 7,
        })
    }

    fn update_page(&self, page_id: &str, title: &str, body: &str) -> Result<(), AppError> {
        if self.update_conflict {
            return Err(AppError::new(
                "WIKI_UPDATE_CONFLICT",
                "Wiki page version conflict",
            )
            .with_details("status=409"));
        }
        self.updated.borrow_mut().push((
            page_id.to_string(),
            title.to_string(),
            body.to_string(),
        ));
        Ok(())
    }

    fn add_comment(&self, page_id: &str, comment: &str) -> Result<(), AppError> {
        self.comments
            .borrow_mut()
            .push((page_id.to_string(), comment.to_string()));
        Ok(())
    }

    fn add_attachment(&self, _: &str, _: &[u8], _: &str) -> Result<(), AppError> {
        Ok(())
    }

    fn page_url(&self, space_key: &str, page_id: &str) -> String {
        format!("https://wiki.test/wiki/spaces/{space_key}/pages/{page_id}")
    }
}

#[derive(Default)]
struct MockTracker {
    issues: RefCell<Vec<(String, String, String)>>,
}

impl IssueTracker for MockTracker {
    fn create_issue(
        &self,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> Result<String, AppError> {
        self.issues.borrow_mut().push((
            summary.to_string(),
            description.to_string(),
            issue_type.to_string(),
        ));
        Ok("INC-101".to_string())
    }

    fn update_issue(&self, _: &str, _: &str) -> Result<(), AppError> {
        Ok(())
    }

    fn add_comment(&self, _: &str, _: &str) -> Result<(), AppError> {
        Ok(())
    }
}

struct MockLlm;

impl ChatModel for MockLlm {
    fn complete(&self, _model: &str, messages: &[ChatMessage]) -> Result<String, AppError> {
        Ok(format!("summary of: {}", messages[1].content))
    }
}

fn unavailable(name: &str) -> AppError {
    AppError::new("CONFIG_MISSING", format!("{name} configuration missing"))
}

fn record() -> IncidentRecord {
    IncidentRecord {
        id: "INC-1".to_string(),
        title: "Auth outage".to_string(),
        severity: Severity::P1,
        status: IncidentStatus::Resolved,
        start_ts: "2024-01-10T10:00:00Z".to_string(),
        end_ts: Some("2024-01-10T14:30:00Z".to_string()),
        description: "Service outage affecting user authentication".to_string(),
        impacted_services: vec!["auth-service".to_string()],
        timeline: vec![TimelineEntry {
            timestamp: "2024-01-10T10:00:00Z".to_string(),
            user: "monitoring".to_string(),
            action: "Error Report".to_string(),
            details: "High latency detected".to_string(),
        }],
        root_cause: None,
        resolution: None,
        action_items: Vec::new(),
    }
}

struct Mocks {
    catalog: TemplateCatalog,
    wiki: MockWiki,
    tracker: MockTracker,
    llm: MockLlm,
}

impl Mocks {
    fn new() -> Self {
        Self {
            catalog: TemplateCatalog::builtin("ENG"),
            wiki: MockWiki::default(),
            tracker: MockTracker::default(),
            llm: MockLlm,
        }
    }

    fn ctx(&self) -> CommandContext<'_> {
        CommandContext {
            catalog: &self.catalog,
            llm: Availability::Ready(&self.llm as &dyn ChatModel),
            wiki: Availability::Ready(&self.wiki as &dyn WikiPublisher),
            tracker: Availability::Ready(&self.tracker as &dyn IssueTracker),
            llm_model: "gpt-3.5-turbo".to_string(),
            wiki_parent_id: Some("777".to_string()),
        }
    }
}

#[test]
fn incident_rca_args_split_on_single_delimiter() {
    let (id, title) = parse_incident_rca_args("INC-1 - Auth outage - partial").expect("parse");
    assert_eq!(id, "INC-1");
    // No quoting support: the rest of the text is the title.
    assert_eq!(title, "Auth outage - partial");

    let err = parse_incident_rca_args("INC-1 Auth outage").expect_err("no delimiter");
    assert_eq!(err.code, "COMMAND_USAGE");
    assert_eq!(err.message, INCIDENT_RCA_USAGE);

    let err = parse_incident_rca_args("INC-1 - ").expect_err("empty title");
    assert_eq!(err.message, INCIDENT_RCA_USAGE);
}

#[test]
fn update_rca_args_split_on_whitespace() {
    let (page_id, status) = parse_update_rca_args("98765 monitoring").expect("parse");
    assert_eq!(page_id, "98765");
    assert_eq!(status, "monitoring");

    let err = parse_update_rca_args("98765").expect_err("missing status");
    assert_eq!(err.code, "COMMAND_USAGE");
    assert_eq!(err.message, UPDATE_RCA_USAGE);
}

#[test]
fn incident_rca_publishes_page_and_replies_with_link() {
    let mocks = Mocks::new();
    let reply = handle_incident_rca(&mocks.ctx(), &record());

    let text = reply.text_content();
    assert!(text.contains("✅ Created RCA document for incident INC-1"));
    assert!(text.contains("*Severity:* P1"));
    assert!(text.contains("https://wiki.test/wiki/spaces/ENG/pages/98765"));

    let created = mocks.wiki.created.borrow();
    assert_eq!(created.len(), 1);
    let (space, title, body, labels, parent) = &created[0];
    assert_eq!(space, "ENG");
    assert_eq!(title, "Auth outage");
    assert!(body.contains("<h1>Incident Overview</h1>"));
    assert!(body.contains("<table>"));
    assert_eq!(labels, &vec![
        "incident".to_string(),
        "rca".to_string(),
        "severity-P1".to_string()
    ]);
    assert_eq!(parent.as_deref(), Some("777"));

    let comments = mocks.wiki.comments.borrow();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].0, "98765");
    assert!(comments[0].1.contains("Created by Incident Bot"));
    assert!(comments[0].1.contains("Severity: P1"));
}

#[test]
fn unconfigured_wiki_yields_capability_message_not_a_crash() {
    let mocks = Mocks::new();
    let mut ctx = mocks.ctx();
    ctx.wiki = Availability::Unavailable(unavailable("Wiki"));

    let reply = handle_incident_rca(&ctx, &record());
    match reply {
        Reply::Text(text) => assert!(text.starts_with("⚠️ Wiki configuration missing")),
        Reply::Blocks(_) => panic!("expected a plain capability message"),
    }
    assert!(mocks.wiki.created.borrow().is_empty());
}

#[test]
fn update_rca_updates_page_and_leaves_status_comment() {
    let mocks = Mocks::new();
    let reply = handle_update_rca(&mocks.ctx(), &record(), "98765", "monitoring", "alice");

    assert!(reply
        .text_content()
        .contains("✅ Updated RCA document status to monitoring"));

    let updated = mocks.wiki.updated.borrow();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, "98765");

    let comments = mocks.wiki.comments.borrow();
    assert_eq!(comments[0].1, "Status updated to monitoring by alice");
}

#[test]
fn stale_version_conflict_becomes_an_apology_reply() {
    let mocks = Mocks::new();
    let conflicted = MockWiki {
        update_conflict: true,
        ..MockWiki::default()
    };
    let mut ctx = mocks.ctx();
    ctx.wiki = Availability::Ready(&conflicted as &dyn WikiPublisher);

    let reply = handle_update_rca(&ctx, &record(), "98765", "resolved", "alice");
    let text = reply.text_content();
    assert!(text.contains("❌ Failed to update RCA document"));
    // The raw remote error never reaches the chat surface.
    assert!(!text.contains("409"));
    assert!(conflicted.comments.borrow().is_empty());
}

#[test]
fn create_ticket_files_an_incident_issue() {
    let mocks = Mocks::new();
    let reply = handle_create_ticket(&mocks.ctx(), &record());

    assert!(reply
        .text_content()
        .contains("✅ Created ticket INC-101 for incident INC-1"));

    let issues = mocks.tracker.issues.borrow();
    assert_eq!(
        issues[0],
        (
            "Auth outage".to_string(),
            "Service outage affecting user authentication".to_string(),
            "Incident".to_string()
        )
    );
}

#[test]
fn summarize_runs_the_model_over_the_conversation() {
    let mocks = Mocks::new();
    let reply = handle_summarize(&mocks.ctx(), "alice: api is down\nbob: investigating");
    assert!(reply
        .text_content()
        .contains("summary of: alice: api is down\nbob: investigating"));
}

#[test]
fn summarize_without_llm_reports_the_capability_gap() {
    let mocks = Mocks::new();
    let mut ctx = mocks.ctx();
    ctx.llm = Availability::Unavailable(unavailable("LLM"));

    let reply = handle_summarize(&ctx, "anything");
    match reply {
        Reply::Text(text) => assert!(text.contains("LLM configuration missing")),
        Reply::Blocks(_) => panic!("expected a plain capability message"),
    }
}
