use std::path::PathBuf;
use thiserror::Error;

use crate::contract::SourceError;
use crate::templates::TemplateKind;

/// Template loading and rendering failures.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to load the {kind} template from {path}: {source}")]
    Load {
        kind: TemplateKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the {0} template is empty")]
    Empty(TemplateKind),

    #[error("unresolved template placeholders: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),
}

/// Errors that abort a whole generation run.
///
/// Per-issue problems never end up here: they are recorded in the issue's error bag.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("failed to prepare output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch issues of repository {repository}: {source}")]
    FetchIssues {
        repository: String,
        #[source]
        source: SourceError,
    },

    #[error("failed to fetch project data for repository {repository}: {source}")]
    FetchProjects {
        repository: String,
        #[source]
        source: SourceError,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
