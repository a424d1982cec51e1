//! GitHub Projects (v2) data as seen by the pipeline.

use serde::{Deserialize, Serialize};

use crate::identity::make_key;

/// Rendered in place of a project field that was never populated.
pub const NOT_AVAILABLE: &str = "---";

/// Field values one project holds for a linked issue.
///
/// `None` means the field was never populated for this issue, which is distinct from a
/// field holding an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub project_title: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub size: Option<String>,
    pub moscow: Option<String>,
}

impl ProjectStatus {
    pub fn new(project_title: impl Into<String>) -> Self {
        Self {
            project_title: project_title.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn status_text(&self) -> &str {
        or_not_available(&self.status)
    }
}

/// Text of an optional field value, with the `---` sentinel for `None`.
pub fn or_not_available(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// Option vocabulary of a project's single select fields.
///
/// Each project names its options freely, so a value is assigned to a field by membership
/// in that field's options, never by comparing to fixed strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectFieldOptions {
    pub status: Vec<String>,
    pub priority: Vec<String>,
    pub size: Vec<String>,
    pub moscow: Vec<String>,
}

impl ProjectFieldOptions {
    /// Records the options of a project field. Fields other than Status, Priority, Size and
    /// MoSCoW are ignored; names match case-insensitively.
    pub fn add_field(&mut self, field_name: &str, options: Vec<String>) {
        match field_name.to_lowercase().as_str() {
            "status" => self.status = options,
            "priority" => self.priority = options,
            "size" => self.size = options,
            "moscow" => self.moscow = options,
            _ => {}
        }
    }
}

/// A project linked to a mined repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawProject {
    /// GraphQL node id.
    pub id: String,
    pub number: u64,
    pub title: String,
    pub organization_name: String,
    pub field_options: ProjectFieldOptions,
}

impl RawProject {
    /// Maps an item's single select values onto status/priority/size/moscow.
    pub fn status_for(&self, field_values: &[String]) -> ProjectStatus {
        let pick = |options: &[String]| {
            field_values
                .iter()
                .find(|value| options.contains(value))
                .cloned()
        };
        ProjectStatus {
            project_title: self.title.clone(),
            status: pick(&self.field_options.status),
            priority: pick(&self.field_options.priority),
            size: pick(&self.field_options.size),
            moscow: pick(&self.field_options.moscow),
        }
    }
}

/// An issue item found on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawProjectIssue {
    pub organization_name: String,
    pub repository_name: String,
    pub number: u64,
    pub field_values: Vec<String>,
}

impl RawProjectIssue {
    pub fn key(&self) -> String {
        make_key(&self.organization_name, &self.repository_name, self.number)
    }
}

/// Whether a project passes a repository's title filter. An empty filter accepts all.
pub fn matches_title_filter(title: &str, filter: &[String]) -> bool {
    filter.is_empty() || filter.iter().any(|f| f == title)
}
