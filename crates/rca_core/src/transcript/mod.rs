use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::classify::classify_action;
use crate::domain::{TimelineEntry, ValidationWarning};

/// One parsed conversation message. Missing fields stay `None`; nothing is
/// guessed or defaulted during parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptMessage {
    pub ts: Option<String>,
    pub author: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptParse {
    pub detected_format: String,
    pub messages: Vec<TranscriptMessage>,
    pub warnings: Vec<ValidationWarning>,
}

fn canonicalize_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    let utc = dt.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).ok()
}

fn split_line_rfc3339ish(line: &str) -> (Option<String>, Option<String>, String) {
    // Supported minimal formats:
    // - "<rfc3339> - <author>: <text>"
    // - "<rfc3339> <author>: <text>"
    //
    // If no RFC3339 prefix is found, ts/author may be None.
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return (None, None, String::new());
    }

    let mut parts = trimmed.splitn(2, ' ');
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let ts = OffsetDateTime::parse(first, &Rfc3339)
        .ok()
        .and_then(canonicalize_rfc3339_utc);
    let payload = if ts.is_some() { rest } else { trimmed };

    // Remove optional leading "- " after timestamp.
    let payload = payload.strip_prefix("- ").unwrap_or(payload).trim();

    if let Some((author, text)) = payload.split_once(':') {
        let author = author.trim();
        let text = text.trim();
        let author = if author.is_empty() {
            None
        } else {
            Some(author.to_string())
        };
        (ts, author, text.to_string())
    } else {
        (ts, None, payload.to_string())
    }
}

fn parse_slack_ts_seconds_to_rfc3339(ts: &str) -> Option<String> {
    // Slack JSON export uses string seconds-with-fraction, e.g.
    // "1700000000.000100". Parsed deterministically without floats.
    let trimmed = ts.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (secs_s, frac_s) = trimmed.split_once('.').unwrap_or((trimmed, "0"));
    let secs: i64 = secs_s.parse().ok()?;

    let mut frac = frac_s.chars().take(9).collect::<String>();
    while frac.len() < 9 {
        frac.push('0');
    }
    let nanos: i64 = frac.parse().ok()?;

    let base = OffsetDateTime::from_unix_timestamp(secs).ok()?;
    let dt = base + Duration::nanoseconds(nanos);
    canonicalize_rfc3339_utc(dt)
}

fn detect_format(transcript: &str) -> String {
    let s = transcript.trim_start();
    if s.starts_with('[') || s.starts_with('{') {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(s) {
            if v.is_array() {
                return "slack_json_export".to_string();
            }
        }
    }

    // If the first non-empty line starts with an RFC3339 token, treat the
    // whole transcript as line-oriented.
    for line in transcript.lines() {
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        let first = t.split_whitespace().next().unwrap_or("");
        if OffsetDateTime::parse(first, &Rfc3339).is_ok() {
            return "line_rfc3339".to_string();
        }
        break;
    }

    "raw_lines".to_string()
}

/// Parse a pasted or fetched conversation transcript into ordered messages.
///
/// Contract:
/// - Format is detected, never configured: Slack JSON export array,
///   line-oriented RFC3339, or raw lines as a fallback.
/// - Messages keep input order; empty lines/texts are dropped.
/// - Missing timestamps and unknown formats produce warnings, not errors.
pub fn parse_transcript(transcript: &str) -> TranscriptParse {
    let mut warnings = Vec::new();
    let mut messages = Vec::new();
    let detected_format = detect_format(transcript);

    match detected_format.as_str() {
        "slack_json_export" => {
            let parsed: Result<serde_json::Value, _> = serde_json::from_str(transcript);
            let arr = parsed
                .ok()
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();

            for (idx, item) in arr.iter().enumerate() {
                let obj = match item.as_object() {
                    Some(o) => o,
                    None => {
                        warnings.push(
                            ValidationWarning::new(
                                "TRANSCRIPT_JSON_ROW_SKIPPED",
                                "Skipped non-object entry in Slack JSON export",
                            )
                            .with_details(format!("index={idx}")),
                        );
                        continue;
                    }
                };

                let text = obj
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .trim()
                    .to_string();
                if text.is_empty() {
                    continue;
                }

                let author = obj
                    .get("user")
                    .and_then(|u| u.as_str())
                    .or_else(|| obj.get("username").and_then(|u| u.as_str()))
                    .map(|s| s.to_string());

                let ts = obj
                    .get("ts")
                    .and_then(|t| t.as_str())
                    .and_then(parse_slack_ts_seconds_to_rfc3339);

                if ts.is_none() {
                    warnings.push(
                        ValidationWarning::new(
                            "TRANSCRIPT_TS_UNKNOWN",
                            "Slack JSON message missing/invalid timestamp",
                        )
                        .with_details(format!("index={idx}")),
                    );
                }

                messages.push(TranscriptMessage { ts, author, text });
            }
        }
        "line_rfc3339" => {
            for (idx, line) in transcript.lines().enumerate() {
                let (ts, author, text) = split_line_rfc3339ish(line);
                if text.trim().is_empty() {
                    continue;
                }
                if ts.is_none() {
                    warnings.push(
                        ValidationWarning::new(
                            "TRANSCRIPT_TS_UNKNOWN",
                            "Transcript line missing RFC3339 timestamp",
                        )
                        .with_details(format!("line={idx}")),
                    );
                }
                messages.push(TranscriptMessage { ts, author, text });
            }
        }
        _ => {
            warnings.push(
                ValidationWarning::new(
                    "TRANSCRIPT_FORMAT_UNKNOWN",
                    "Unknown transcript format; preserved raw lines without timestamps",
                )
                .with_details("detected_format=raw_lines"),
            );

            for line in transcript.lines() {
                let t = line.trim();
                if t.is_empty() {
                    continue;
                }

                let (author, text) = if let Some((a, rest)) = t.split_once(':') {
                    let a = a.trim();
                    let rest = rest.trim();
                    let a = if a.is_empty() {
                        None
                    } else {
                        Some(a.to_string())
                    };
                    (a, rest.to_string())
                } else {
                    (None, t.to_string())
                };

                messages.push(TranscriptMessage {
                    ts: None,
                    author,
                    text,
                });
            }
        }
    }

    TranscriptParse {
        detected_format,
        messages,
        warnings,
    }
}

/// Build timeline entries from parsed messages, classifying each text into
/// an action label. Missing timestamps/authors render as "UNKNOWN" rather
/// than being dropped, so the timeline row count always matches the input.
pub fn timeline_from_transcript(messages: &[TranscriptMessage]) -> Vec<TimelineEntry> {
    messages
        .iter()
        .map(|m| TimelineEntry {
            timestamp: m.ts.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            user: m.author.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
            action: classify_action(&m.text).as_str().to_string(),
            details: m.text.clone(),
        })
        .collect()
}
