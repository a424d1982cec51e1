//! Joins repository issues with project items on the identity key.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::issue::{ConsolidatedIssue, RawIssue};
use crate::project::ProjectStatus;

/// Issues of one repository, as fetched.
#[derive(Debug, Clone)]
pub struct RepositoryIssues {
    pub repository_id: String,
    pub issues: Vec<RawIssue>,
}

/// Folds `(identity key, ProjectStatus)` pairs into a collection of consolidated issues.
///
/// Keys without a matching issue are dropped: an unlinked issue is the steady state.
pub struct ProjectStatusAggregator<'a> {
    issues: &'a mut [ConsolidatedIssue],
    positions: HashMap<String, usize>,
    unmatched: usize,
}

impl<'a> ProjectStatusAggregator<'a> {
    pub fn new(issues: &'a mut [ConsolidatedIssue]) -> Self {
        let positions = issues
            .iter()
            .enumerate()
            .map(|(idx, issue)| (issue.key(), idx))
            .collect();
        Self {
            issues,
            positions,
            unmatched: 0,
        }
    }

    /// Appends `status` to the issue with identity `key`. Returns whether an issue matched.
    pub fn add(&mut self, key: &str, status: ProjectStatus) -> bool {
        match self.positions.get(key) {
            Some(&idx) => {
                self.issues[idx].update_with_project_data(status);
                true
            }
            None => {
                debug!(key, project = %status.project_title, "Project item has no mined issue");
                self.unmatched += 1;
                false
            }
        }
    }

    /// Number of pairs that matched no issue.
    pub fn unmatched(&self) -> usize {
        self.unmatched
    }
}

/// Builds one consolidated issue per unique identity key, in fetch order, then attaches
/// every project status.
pub fn consolidate<I>(repositories: Vec<RepositoryIssues>, project_entries: I) -> Vec<ConsolidatedIssue>
where
    I: IntoIterator<Item = (String, ProjectStatus)>,
{
    let mut issues: Vec<ConsolidatedIssue> = Vec::new();
    let mut seen = HashSet::new();
    for repository in repositories {
        for raw in repository.issues {
            let issue = ConsolidatedIssue::from_repository_issue(&repository.repository_id, raw);
            if seen.insert(issue.key()) {
                issues.push(issue);
            } else {
                debug!(key = %issue.key(), "Skipping duplicate issue");
            }
        }
    }

    let mut aggregator = ProjectStatusAggregator::new(&mut issues);
    let mut matched = 0usize;
    for (key, status) in project_entries {
        if aggregator.add(&key, status) {
            matched += 1;
        }
    }
    let unmatched = aggregator.unmatched();

    info!(
        issues = issues.len(),
        project_matches = matched,
        project_unmatched = unmatched,
        "[CONSOLIDATE] Consolidated issues"
    );
    issues
}
