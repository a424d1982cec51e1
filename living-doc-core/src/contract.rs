#![allow(unused)]

//! # contract: interfaces to the collaborators around the pipeline
//!
//! The pipeline never talks to GitHub, the template directory or the filesystem directly.
//! It goes through the traits below, which are implemented by the real clients (see the
//! `living-doc` crate for the GitHub client, [`crate::templates`] and [`crate::writer`] for
//! the filesystem ones) and by `mockall` mocks in tests.
//!
//! ## Error handling
//! - Sources return the boxed [`SourceError`]. A source that cannot resolve a repository
//!   must return an error; the pipeline aborts the run on it.
//! - Sources must translate transient failures themselves: the pipeline performs no retries.
//! - Writers surface every `std::io::Error` (disk full, permission denied); all of them end
//!   the run.
//!
//! ## Mocking
//! - Mocks are generated with `automock` for tests and, through the default
//!   `test-export-mocks` feature, for integration tests of dependent crates.

use async_trait::async_trait;
use std::path::Path;

use mockall::{automock, predicate::*};

use crate::error::TemplateError;
use crate::issue::RawIssue;
use crate::project::{RawProject, RawProjectIssue};
use crate::templates::TemplateKind;

/// Error type of the issue and project sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches the issues of a repository.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Returns every issue of `repository_id` (`"org/repo"`) carrying any of `label_filter`,
    /// or every issue when the filter is empty. Must not drop matching issues.
    async fn fetch_issues(
        &self,
        repository_id: &str,
        label_filter: &[String],
    ) -> Result<Vec<RawIssue>, SourceError>;
}

/// Fetches GitHub Projects data. Only used when project state mining is enabled.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Projects linked to `repository_id` whose title passes `title_filter`
    /// (an empty filter accepts every project).
    async fn fetch_projects(
        &self,
        repository_id: &str,
        title_filter: &[String],
    ) -> Result<Vec<RawProject>, SourceError>;

    /// Issue items of a project with their single select field values.
    async fn fetch_project_issues(
        &self,
        project: &RawProject,
    ) -> Result<Vec<RawProjectIssue>, SourceError>;
}

/// Loads page templates.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait TemplateLoader: Send + Sync {
    fn load_template(&self, kind: TemplateKind) -> Result<String, TemplateError>;
}

/// Writes the generated tree.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait DocumentWriter: Send + Sync {
    fn write(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// Creates the directory and its parents if absent. Must tolerate existing directories.
    fn ensure_directory(&self, path: &Path) -> std::io::Result<()>;

    /// Removes a directory tree. A missing tree is not an error.
    fn remove_tree(&self, path: &Path) -> std::io::Result<()>;
}
