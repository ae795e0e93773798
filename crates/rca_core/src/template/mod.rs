use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{IncidentRecord, PublishMetadata};
use crate::error::AppError;

/// Declared visual kind of a template section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Table,
    Code,
    Note,
}

/// Dispatch tag selecting which fragment builder runs for a section.
///
/// This replaces dispatch-by-display-title: titles are presentation only,
/// and a section with no generated body is `Declarative` — an explicit,
/// testable condition instead of a silent no-op.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionBody {
    /// Severity/start/end key-value block plus impacted-service list.
    IncidentOverview,
    /// Time/User/Action/Details table, one row per timeline entry.
    Timeline,
    /// Structure-only section: contributes nothing to the document body.
    Declarative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateSection {
    pub title: String,
    pub kind: SectionKind,
    pub body: SectionBody,
    pub content: Option<String>,
    pub children: Vec<TemplateSection>,
}

impl TemplateSection {
    fn leaf(title: &str, kind: SectionKind, body: SectionBody) -> Self {
        Self {
            title: title.to_string(),
            kind,
            body,
            content: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub space_key: String,
    pub labels: Vec<String>,
    pub sections: Vec<TemplateSection>,
}

/// Process-wide, read-only registry of document templates. Built once at
/// startup; adding a template means shipping a new build.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Template>,
}

impl TemplateCatalog {
    /// Catalog with the built-in "rca" template.
    pub fn builtin(space_key: &str) -> Self {
        let mut templates = BTreeMap::new();
        templates.insert("rca".to_string(), rca_template(space_key));
        Self { templates }
    }

    pub fn lookup(&self, template_id: &str) -> Result<&Template, AppError> {
        self.templates.get(template_id).ok_or_else(|| {
            AppError::new("TEMPLATE_NOT_FOUND", "Document template not found")
                .with_details(format!("template_id={template_id}"))
        })
    }

    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.keys().map(|k| k.as_str()).collect()
    }
}

fn rca_template(space_key: &str) -> Template {
    use SectionBody::{Declarative, IncidentOverview, Timeline};
    use SectionKind::{Heading1, Heading2};

    Template {
        id: "rca".to_string(),
        name: "Root Cause Analysis".to_string(),
        space_key: space_key.to_string(),
        labels: vec!["incident".to_string(), "rca".to_string()],
        sections: vec![
            TemplateSection {
                title: "Incident Overview".to_string(),
                kind: Heading1,
                body: IncidentOverview,
                content: None,
                children: vec![
                    TemplateSection::leaf("Impact", Heading2, Declarative),
                    TemplateSection::leaf("Timeline", Heading2, Timeline),
                    TemplateSection::leaf("Root Cause", Heading2, Declarative),
                ],
            },
            TemplateSection {
                title: "Resolution".to_string(),
                kind: Heading1,
                body: Declarative,
                content: None,
                children: vec![
                    TemplateSection::leaf("Actions Taken", Heading2, Declarative),
                    TemplateSection::leaf("Verification Steps", Heading2, Declarative),
                ],
            },
            TemplateSection {
                title: "Prevention".to_string(),
                kind: Heading1,
                body: Declarative,
                content: None,
                children: vec![
                    TemplateSection::leaf("Immediate Actions", Heading2, Declarative),
                    TemplateSection::leaf("Long-term Improvements", Heading2, Declarative),
                    TemplateSection::leaf("Monitoring & Alerts", Heading2, Declarative),
                ],
            },
            TemplateSection {
                title: "Lessons Learned".to_string(),
                kind: Heading1,
                body: Declarative,
                content: None,
                children: vec![
                    TemplateSection::leaf("What Went Well", Heading2, Declarative),
                    TemplateSection::leaf("What Needs Improvement", Heading2, Declarative),
                    TemplateSection::leaf("Action Items", Heading2, Declarative),
                ],
            },
        ],
    }
}

/// Publish metadata for an RCA page: template labels plus a severity label,
/// in that order.
pub fn rca_metadata(
    template: &Template,
    record: &IncidentRecord,
    parent_id: Option<String>,
) -> PublishMetadata {
    let mut labels = template.labels.clone();
    labels.push(format!("severity-{}", record.severity.as_str()));
    PublishMetadata {
        space_key: template.space_key.clone(),
        parent_id,
        labels,
        template_id: Some(template.id.clone()),
    }
}
