//! Output locations: which directories an issue page lands in for each layout mode.
//!
//! Everything here is a pure function of its arguments. Directories are only created
//! later by the [`crate::contract::DocumentWriter`].

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::classify::{DocumentationGroup, NO_TOPIC};
use crate::sanitize::sanitize_filename;

/// Global directory fan-out policy for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    /// `{group}/`
    Flat,
    /// `{group}/{org}/{repo}/`
    Structured,
    /// `{group}/{topic}/`, one copy per topic
    TopicGrouped,
    /// `{group}/{org}/{repo}/{topic}/`, one copy per topic
    StructuredAndTopicGrouped,
}

impl LayoutMode {
    pub fn from_flags(structured_output: bool, group_output_by_topics: bool) -> Self {
        match (structured_output, group_output_by_topics) {
            (false, false) => LayoutMode::Flat,
            (true, false) => LayoutMode::Structured,
            (false, true) => LayoutMode::TopicGrouped,
            (true, true) => LayoutMode::StructuredAndTopicGrouped,
        }
    }

    pub fn is_structured(self) -> bool {
        matches!(
            self,
            LayoutMode::Structured | LayoutMode::StructuredAndTopicGrouped
        )
    }

    pub fn is_grouped_by_topic(self) -> bool {
        matches!(
            self,
            LayoutMode::TopicGrouped | LayoutMode::StructuredAndTopicGrouped
        )
    }
}

/// Splits `"org/repo"` into its two halves. An id without `/` is treated as an
/// organization with an empty repository name.
pub fn split_repository_id(repository_id: &str) -> (&str, &str) {
    repository_id.split_once('/').unwrap_or((repository_id, ""))
}

/// Root directory of a documentation group.
pub fn group_root(output_dir: &Path, group: DocumentationGroup) -> PathBuf {
    output_dir.join(group.dir_name())
}

/// Directories an issue page is written to.
///
/// Topic modes return one directory per topic; every other mode returns exactly one.
pub fn issue_directories(
    output_dir: &Path,
    layout: LayoutMode,
    group: DocumentationGroup,
    topics: &[String],
    repository_id: &str,
) -> Vec<PathBuf> {
    let mut base = group_root(output_dir, group);
    if layout.is_structured() {
        let (organization, repository) = split_repository_id(repository_id);
        base = base
            .join(sanitize_filename(organization))
            .join(sanitize_filename(repository));
    }

    if !layout.is_grouped_by_topic() {
        return vec![base];
    }

    if topics.is_empty() {
        return vec![base.join(NO_TOPIC)];
    }
    topics
        .iter()
        .map(|topic| base.join(sanitize_filename(topic)))
        .collect()
}

/// Markdown link target from a page in `from_dir` to `filename` inside `to_dir`.
///
/// Both directories are expected under the same output root; the result always uses `/`.
pub fn relative_link(from_dir: &Path, to_dir: &Path, filename: &str) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = to_dir.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.push(filename.to_string());
    parts.join("/")
}
