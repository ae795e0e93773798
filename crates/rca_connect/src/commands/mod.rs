use rca_core::assemble::assemble;
use rca_core::domain::IncidentRecord;
use rca_core::error::AppError;
use rca_core::template::{rca_metadata, TemplateCatalog};

use crate::chat::{Block, Reply};
use crate::config::Availability;
use crate::llm::{prompts, ChatModel};
use crate::tracker::IssueTracker;
use crate::wiki::WikiPublisher;

pub const INCIDENT_RCA_USAGE: &str = "Usage: /incident-rca <incident-id> - <title>";
pub const UPDATE_RCA_USAGE: &str = "Usage: /update-rca <page-id> <status>";

/// Dependencies a command handler needs, constructed once at startup and
/// passed in explicitly. Integrations may be unavailable; handlers check
/// readiness before use.
pub struct CommandContext<'a> {
    pub catalog: &'a TemplateCatalog,
    pub llm: Availability<&'a dyn ChatModel>,
    pub wiki: Availability<&'a dyn WikiPublisher>,
    pub tracker: Availability<&'a dyn IssueTracker>,
    pub llm_model: String,
    pub wiki_parent_id: Option<String>,
}

fn usage_error(usage: &str) -> AppError {
    AppError::new("COMMAND_USAGE", usage)
}

/// Parse `"<incident-id> - <title>"`. Single delimiter split, no quoting.
pub fn parse_incident_rca_args(text: &str) -> Result<(String, String), AppError> {
    let (id, title) = text
        .split_once(" - ")
        .ok_or_else(|| usage_error(INCIDENT_RCA_USAGE))?;
    let id = id.trim();
    let title = title.trim();
    if id.is_empty() || title.is_empty() {
        return Err(usage_error(INCIDENT_RCA_USAGE));
    }
    Ok((id.to_string(), title.to_string()))
}

/// Parse `"<page-id> <status>"`. Extra tokens are ignored.
pub fn parse_update_rca_args(text: &str) -> Result<(String, String), AppError> {
    let mut tokens = text.split_whitespace();
    let page_id = tokens.next().ok_or_else(|| usage_error(UPDATE_RCA_USAGE))?;
    let status = tokens.next().ok_or_else(|| usage_error(UPDATE_RCA_USAGE))?;
    Ok((page_id.to_string(), status.to_string()))
}

/// Convert a handler failure into the reply relayed to the invoking user.
/// Raw remote errors never reach the chat surface.
fn failure_reply(err: &AppError, apology: &str) -> Reply {
    match err.code.as_str() {
        "COMMAND_USAGE" => {
            log::info!("rejected command: {}", err.message);
            Reply::Text(err.message.clone())
        }
        "CONFIG_MISSING" => {
            log::warn!("command needs an unconfigured integration: {err}");
            Reply::Text(format!("⚠️ {}. Ask an admin to configure it.", err.message))
        }
        _ => {
            log::error!("{apology}: {err}");
            Reply::Blocks(vec![Block::section(format!(
                "❌ {apology}. Please check the logs for more details."
            ))])
        }
    }
}

fn incident_rca(ctx: &CommandContext<'_>, record: &IncidentRecord) -> Result<Reply, AppError> {
    let template = ctx.catalog.lookup("rca")?;
    let wiki = ctx.wiki.ready()?;

    let metadata = rca_metadata(template, record, ctx.wiki_parent_id.clone());
    let document = assemble(template, record);

    let page_id = wiki.create_page(
        &metadata.space_key,
        &record.title,
        &document.body,
        &metadata.labels,
        metadata.parent_id.as_deref(),
    )?;

    let comment = format!(
        "Created by Incident Bot\nTemplate: {}\nSeverity: {}\nStatus: {}",
        template.name,
        record.severity.as_str(),
        record.status.as_str()
    );
    wiki.add_comment(&page_id, &comment)?;

    Ok(Reply::Blocks(vec![
        Block::section(format!(
            "✅ Created RCA document for incident {}",
            record.id
        )),
        Block::section(format!(
            "*Title:* {}\n*Severity:* {}\n*Status:* {}",
            record.title,
            record.severity.as_str(),
            record.status.as_str()
        )),
        Block::section(format!(
            "View the RCA document here: {}",
            wiki.page_url(&metadata.space_key, &page_id)
        )),
    ]))
}

/// `/incident-rca` — assemble the RCA document for a caller-supplied record
/// and publish it as a new wiki page with a provenance comment.
pub fn handle_incident_rca(ctx: &CommandContext<'_>, record: &IncidentRecord) -> Reply {
    incident_rca(ctx, record)
        .unwrap_or_else(|err| failure_reply(&err, "Failed to create RCA document"))
}

fn update_rca(
    ctx: &CommandContext<'_>,
    record: &IncidentRecord,
    page_id: &str,
    status_label: &str,
    user: &str,
) -> Result<Reply, AppError> {
    let template = ctx.catalog.lookup("rca")?;
    let wiki = ctx.wiki.ready()?;

    let document = assemble(template, record);
    wiki.update_page(page_id, &record.title, &document.body)?;
    wiki.add_comment(
        page_id,
        &format!("Status updated to {status_label} by {user}"),
    )?;

    Ok(Reply::Blocks(vec![Block::section(format!(
        "✅ Updated RCA document status to {status_label}"
    ))]))
}

/// `/update-rca` — re-assemble the document and update the existing page
/// (read current version, submit current + 1), then leave a status comment.
pub fn handle_update_rca(
    ctx: &CommandContext<'_>,
    record: &IncidentRecord,
    page_id: &str,
    status_label: &str,
    user: &str,
) -> Reply {
    update_rca(ctx, record, page_id, status_label, user)
        .unwrap_or_else(|err| failure_reply(&err, "Failed to update RCA document"))
}

fn create_ticket(ctx: &CommandContext<'_>, record: &IncidentRecord) -> Result<Reply, AppError> {
    let tracker = ctx.tracker.ready()?;
    let issue_key = tracker.create_issue(&record.title, &record.description, "Incident")?;
    Ok(Reply::Blocks(vec![Block::section(format!(
        "✅ Created ticket {issue_key} for incident {}",
        record.id
    ))]))
}

/// `/create-ticket` — file an issue for a caller-supplied incident record.
pub fn handle_create_ticket(ctx: &CommandContext<'_>, record: &IncidentRecord) -> Reply {
    create_ticket(ctx, record).unwrap_or_else(|err| failure_reply(&err, "Failed to create ticket"))
}

fn summarize(ctx: &CommandContext<'_>, conversation: &str) -> Result<Reply, AppError> {
    let llm = ctx.llm.ready()?;
    let messages = prompts::summary_messages(conversation);
    let summary = llm.complete(&ctx.llm_model, &messages)?;
    Ok(Reply::Blocks(vec![
        Block::header("Incident summary"),
        Block::divider(),
        Block::section(summary),
    ]))
}

/// `/summarize` — run the completion model over fetched conversation text.
pub fn handle_summarize(ctx: &CommandContext<'_>, conversation: &str) -> Reply {
    summarize(ctx, conversation)
        .unwrap_or_else(|err| failure_reply(&err, "Failed to summarize the conversation"))
}
