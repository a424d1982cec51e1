//! Repository issues and the consolidated record the pipeline renders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::classify::{Classification, DocumentationGroup};
use crate::identity::make_key_for_repository;
use crate::layout::{issue_directories, split_repository_id, LayoutMode};
use crate::project::ProjectStatus;
use crate::sanitize::sanitize_filename;

pub const MISSING_TITLE_MESSAGE: &str =
    "Issue page filename generation failed (issue does not have a title).";

/// Filename of a directory index page. Features are rendered as one.
pub const INDEX_PAGE_FILENAME: &str = "_index.md";

/// An issue as returned by the issue source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub title: Option<String>,
    pub state: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub html_url: String,
}

/// Kinds of recovered per-issue errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueErrorKind {
    Attribute,
    Documentation,
    Topic,
}

impl fmt::Display for IssueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueErrorKind::Attribute => "AttributeError",
            IssueErrorKind::Documentation => "DocumentationError",
            IssueErrorKind::Topic => "TopicError",
        };
        f.write_str(name)
    }
}

/// One repository issue merged with every project it is linked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedIssue {
    /// `"{organization}/{repository}"`
    pub repository_id: String,
    /// 0 until repository data is loaded.
    pub number: u64,
    pub title: Option<String>,
    pub state: String,
    pub body: String,
    pub labels: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub html_url: String,
    pub linked_to_project: bool,
    /// One entry per project match, in encounter order. Never deduplicated.
    pub project_statuses: Vec<ProjectStatus>,
    pub group: DocumentationGroup,
    pub topics: Vec<String>,
    pub errors: BTreeMap<IssueErrorKind, String>,
}

impl ConsolidatedIssue {
    pub fn new(repository_id: impl Into<String>) -> Self {
        Self {
            repository_id: repository_id.into(),
            number: 0,
            title: None,
            state: String::new(),
            body: String::new(),
            labels: Vec::new(),
            created_at: None,
            updated_at: None,
            closed_at: None,
            html_url: String::new(),
            linked_to_project: false,
            project_statuses: Vec::new(),
            group: DocumentationGroup::Unclassified,
            topics: Vec::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn from_repository_issue(repository_id: impl Into<String>, issue: RawIssue) -> Self {
        let mut consolidated = Self::new(repository_id);
        consolidated.update_with_repository_data(issue);
        consolidated
    }

    pub fn update_with_repository_data(&mut self, issue: RawIssue) {
        self.number = issue.number;
        self.title = issue.title;
        self.state = issue.state;
        self.body = issue.body.unwrap_or_default();
        self.labels = issue.labels;
        self.created_at = issue.created_at;
        self.updated_at = issue.updated_at;
        self.closed_at = issue.closed_at;
        self.html_url = issue.html_url;
    }

    /// Appends one project status. Called once per matching project item.
    pub fn update_with_project_data(&mut self, status: ProjectStatus) {
        self.linked_to_project = true;
        self.project_statuses.push(status);
    }

    pub fn key(&self) -> String {
        make_key_for_repository(&self.repository_id, self.number)
    }

    pub fn organization_name(&self) -> &str {
        split_repository_id(&self.repository_id).0
    }

    pub fn repository_name(&self) -> &str {
        split_repository_id(&self.repository_id).1
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Every project status, comma separated, in encounter order.
    pub fn aggregated_status(&self) -> String {
        self.project_statuses
            .iter()
            .map(ProjectStatus::status_text)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Adds an error to the bag. A second message of the same kind is appended to the first.
    pub fn record_error(&mut self, kind: IssueErrorKind, message: impl Into<String>) {
        let message = message.into();
        match self.errors.get_mut(&kind) {
            Some(existing) if existing.contains(message.as_str()) => {}
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&message);
            }
            None => {
                self.errors.insert(kind, message);
            }
        }
    }

    pub fn apply_classification(&mut self, classification: Classification) {
        self.group = classification.group;
        self.topics = classification.topics;
        for (kind, message) in classification.errors {
            self.record_error(kind, message);
        }
    }

    /// Directory name of a Feature: `"{number}_{title}"`, sanitized.
    fn page_stem(&self) -> Option<String> {
        self.title
            .as_ref()
            .map(|title| sanitize_filename(&format!("{}_{}", self.number, title.to_lowercase())))
    }

    /// Filename of the issue page.
    ///
    /// Features are directory index nodes and always get `_index.md`. An issue without a
    /// title falls back to `"{number}.md"` and records an `AttributeError`.
    pub fn generate_page_filename(&mut self) -> String {
        let filename = self.title.as_ref().map(|title| {
            sanitize_filename(&format!("{}_{}.md", self.number, title.to_lowercase()))
        });
        if filename.is_none() {
            warn!(issue = %self.key(), "Issue has no title, falling back to its number");
            self.record_error(IssueErrorKind::Attribute, MISSING_TITLE_MESSAGE);
        }

        if self.group == DocumentationGroup::Feature {
            return INDEX_PAGE_FILENAME.to_string();
        }
        filename.unwrap_or_else(|| format!("{}.md", self.number))
    }

    /// Every directory the issue page is written to.
    ///
    /// A Feature gets one more level: its own directory, whose `_index.md` is the page.
    pub fn generate_directory_path(&self, output_dir: &Path, layout: LayoutMode) -> Vec<PathBuf> {
        let directories = issue_directories(
            output_dir,
            layout,
            self.group,
            &self.topics,
            &self.repository_id,
        );
        if self.group != DocumentationGroup::Feature {
            return directories;
        }
        let feature_dir = self
            .page_stem()
            .unwrap_or_else(|| self.number.to_string());
        directories
            .into_iter()
            .map(|dir| dir.join(&feature_dir))
            .collect()
    }
}
