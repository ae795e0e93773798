use serde::{Deserialize, Serialize};

use crate::domain::IncidentRecord;
use crate::render::{render_section, SectionRender};
use crate::template::{Template, TemplateSection};

/// A fully assembled document body plus the sections the template declared
/// but no fragment builder filled. `skipped_sections` makes the "declared
/// but unrendered" condition visible to callers and tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssembledDocument {
    pub body: String,
    pub skipped_sections: Vec<String>,
}

fn walk(
    sections: &[TemplateSection],
    record: &IncidentRecord,
    body: &mut String,
    skipped: &mut Vec<String>,
) {
    for section in sections {
        match render_section(section, record) {
            SectionRender::Fragment(fragment) => body.push_str(&fragment),
            SectionRender::Declarative => skipped.push(section.title.clone()),
        }
        walk(&section.children, record, body, skipped);
    }
}

/// Assemble a document by walking the template's section tree depth-first
/// in declared order and concatenating fragments with no extra separator.
///
/// Deterministic: the same (template, record) pair yields byte-identical
/// output. No "now" timestamps are embedded; only the record's own
/// timestamps appear.
pub fn assemble(template: &Template, record: &IncidentRecord) -> AssembledDocument {
    let mut body = String::new();
    let mut skipped = Vec::new();
    walk(&template.sections, record, &mut body, &mut skipped);
    AssembledDocument {
        body,
        skipped_sections: skipped,
    }
}
