use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::domain::IncidentRecord;
use crate::template::{SectionBody, TemplateSection};

/// Outcome of rendering one template section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRender {
    /// Markup fragment for the document body.
    Fragment(String),
    /// The section declares structure only; nothing was emitted.
    Declarative,
}

/// Escape user-supplied text for embedding in storage-format markup.
///
/// Ampersand must be replaced first; the other four would otherwise be
/// double-escaped.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Wrap already-escaped content in the wiki's `info` structured macro.
/// Used for comment bodies, matching the publisher's storage representation.
pub fn info_macro(escaped: &str) -> String {
    format!(
        "<ac:structured-macro ac:name=\"info\"><ac:rich-text-body>{escaped}</ac:rich-text-body></ac:structured-macro>"
    )
}

/// Canonicalize a timestamp to RFC3339 UTC for display. Unparseable values
/// pass through escaped so a sloppy record degrades visibly, not fatally.
fn canonical_or_escaped(ts: &str) -> String {
    match OffsetDateTime::parse(ts, &Rfc3339) {
        Ok(dt) => dt
            .to_offset(UtcOffset::UTC)
            .format(&Rfc3339)
            .unwrap_or_else(|_| escape_markup(ts)),
        Err(_) => escape_markup(ts),
    }
}

fn overview_fragment(record: &IncidentRecord) -> String {
    let mut out = String::new();
    out.push_str("<h1>Incident Overview</h1>");
    out.push_str(&format!(
        "<p><strong>Severity:</strong> {}</p>",
        record.severity.as_str()
    ));
    out.push_str(&format!(
        "<p><strong>Start Time:</strong> {}</p>",
        canonical_or_escaped(&record.start_ts)
    ));
    let end = match record.end_ts.as_deref() {
        Some(ts) => canonical_or_escaped(ts),
        None => "Ongoing".to_string(),
    };
    out.push_str(&format!("<p><strong>End Time:</strong> {end}</p>"));

    // An incident with no impacted services still gets the (empty) list
    // element so the document structure is stable.
    out.push_str("<p><strong>Impacted Services:</strong></p><ul>");
    for service in &record.impacted_services {
        out.push_str(&format!("<li>{}</li>", escape_markup(service)));
    }
    out.push_str("</ul>");
    out
}

fn timeline_fragment(record: &IncidentRecord) -> String {
    let mut out = String::new();
    out.push_str(
        "<table><thead><tr><th>Time</th><th>User</th><th>Action</th><th>Details</th></tr></thead><tbody>",
    );
    // Input order is preserved; the renderer never re-sorts.
    for entry in &record.timeline {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            canonical_or_escaped(&entry.timestamp),
            escape_markup(&entry.user),
            escape_markup(&entry.action),
            escape_markup(&entry.details),
        ));
    }
    out.push_str("</tbody></table>");
    out
}

/// Render one template section against an incident record.
///
/// Dispatch is on the section's `body` tag, never its display title.
/// Declarative sections return an explicit marker so callers can report
/// what the template declared but the renderer does not yet fill.
pub fn render_section(section: &TemplateSection, record: &IncidentRecord) -> SectionRender {
    match section.body {
        SectionBody::IncidentOverview => SectionRender::Fragment(overview_fragment(record)),
        SectionBody::Timeline => SectionRender::Fragment(timeline_fragment(record)),
        SectionBody::Declarative => SectionRender::Declarative,
    }
}
