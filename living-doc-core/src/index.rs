//! Summary pages built from the whole issue collection: index tables for every directory
//! level of the active layout, and the per-group report of recovered errors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::classify::DocumentationGroup;
use crate::issue::{ConsolidatedIssue, IssueErrorKind};
use crate::layout::{group_root, relative_link, LayoutMode};
use crate::sanitize::sanitize_filename;
use crate::templates::TemplateKind;

pub const LINKED_GLYPH: &str = "🟢";
pub const UNLINKED_GLYPH: &str = "🔴";
pub const REPORT_PAGE_FILENAME: &str = "report_page.md";

/// An issue together with where its page was placed.
#[derive(Debug, Clone)]
pub struct PlacedIssue {
    pub issue: ConsolidatedIssue,
    pub directories: Vec<PathBuf>,
    pub filename: String,
}

impl PlacedIssue {
    /// Link to the page as seen from an index page in `index_dir`. Prefers the copy that
    /// lives below the index so topic indexes link to their own topic's copy.
    pub fn link_from(&self, index_dir: &Path) -> String {
        let target = self
            .directories
            .iter()
            .find(|dir| dir.starts_with(index_dir))
            .or_else(|| self.directories.first());
        match target {
            Some(dir) => relative_link(index_dir, dir, &self.filename),
            None => self.filename.clone(),
        }
    }
}

/// One index page to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub kind: TemplateKind,
    pub directory: PathBuf,
    pub group: DocumentationGroup,
    pub title: String,
    pub organization_name: Option<String>,
    pub repository_name: Option<String>,
    pub data_level_name: Option<String>,
    pub issue_overview_table: String,
}

/// Escapes text for use inside a Markdown table cell.
pub fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Markdown table with one row per issue, in the given order.
pub fn issue_overview_table(issues: &[&PlacedIssue], index_dir: &Path, mining: bool) -> String {
    let mut table = if mining {
        String::from(
            "| Organization name | Repository name | Issue 'Number - Title' | Linked to project | Project status | Issue URL |\n\
             |-------------------|-----------------|------------------------|-------------------|----------------|-----------|\n",
        )
    } else {
        String::from(
            "| Organization name | Repository name | Issue 'Number - Title' | Issue state |\n\
             |-------------------|-----------------|------------------------|-------------|\n",
        )
    };

    for placed in issues {
        let issue = &placed.issue;
        let title_cell = format!(
            "[#{} - {}]({})",
            issue.number,
            table_cell(issue.display_title()),
            placed.link_from(index_dir)
        );
        let row = if mining {
            let glyph = if issue.linked_to_project {
                LINKED_GLYPH
            } else {
                UNLINKED_GLYPH
            };
            let status = if issue.project_statuses.is_empty() {
                crate::project::NOT_AVAILABLE.to_string()
            } else {
                issue.aggregated_status()
            };
            format!(
                "| {} | {} | {} | {} | {} | <a href='{}' target='_blank'>GitHub link</a> |\n",
                issue.organization_name(),
                issue.repository_name(),
                title_cell,
                glyph,
                table_cell(&status),
                issue.html_url
            )
        } else {
            format!(
                "| {} | {} | {} | {} |\n",
                issue.organization_name(),
                issue.repository_name(),
                title_cell,
                table_cell(&issue.state)
            )
        };
        table.push_str(&row);
    }
    table
}

fn distinct<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

struct PageBuilder<'a> {
    group: DocumentationGroup,
    mining: bool,
    pages: &'a mut Vec<IndexPage>,
}

impl PageBuilder<'_> {
    fn push(
        &mut self,
        kind: TemplateKind,
        directory: PathBuf,
        title: &str,
        scope: (Option<&str>, Option<&str>, Option<&str>),
        issues: &[&PlacedIssue],
    ) {
        if issues.is_empty() {
            info!(path = %directory.display(), "[INDEX] No issues in scope, skipping index page");
            return;
        }
        let (organization_name, repository_name, data_level_name) = scope;
        self.pages.push(IndexPage {
            kind,
            issue_overview_table: issue_overview_table(issues, &directory, self.mining),
            directory,
            group: self.group,
            title: title.to_string(),
            organization_name: organization_name.map(str::to_string),
            repository_name: repository_name.map(str::to_string),
            data_level_name: data_level_name.map(str::to_string),
        });
    }

    fn topic_pages(&mut self, base: &Path, issues: &[&PlacedIssue], scope: (Option<&str>, Option<&str>)) {
        let topics = distinct(
            issues
                .iter()
                .copied()
                .flat_map(|p| p.issue.topics.iter().map(String::as_str)),
        );
        for topic in topics {
            let members: Vec<&PlacedIssue> = issues
                .iter()
                .copied()
                .filter(|p| p.issue.topics.iter().any(|t| t == topic))
                .collect();
            self.push(
                TemplateKind::DataLevelIndex,
                base.join(sanitize_filename(topic)),
                topic,
                (scope.0, scope.1, Some(topic)),
                &members,
            );
        }
    }
}

/// Every index page for the active layout.
///
/// - Flat: `{group}/_index.md`
/// - Structured: group root, then one page per organization and per repository
/// - TopicGrouped: group root, then one page per topic
/// - StructuredAndTopicGrouped: group root, organization, repository, then topic pages
///
/// Scopes without issues produce no page.
pub fn build_index_pages(
    issues: &[PlacedIssue],
    layout: LayoutMode,
    output_dir: &Path,
    mining: bool,
) -> Vec<IndexPage> {
    let mut pages = Vec::new();
    for group in DocumentationGroup::ALL {
        let members: Vec<&PlacedIssue> = issues.iter().filter(|p| p.issue.group == group).collect();
        let root = group_root(output_dir, group);
        let mut builder = PageBuilder {
            group,
            mining,
            pages: &mut pages,
        };

        if layout == LayoutMode::Flat {
            builder.push(TemplateKind::FlatIndex, root, group.title(), (None, None, None), &members);
            continue;
        }

        builder.push(TemplateKind::RootIndex, root.clone(), group.title(), (None, None, None), &members);

        if !layout.is_structured() {
            builder.topic_pages(&root, &members, (None, None));
            continue;
        }

        for organization in distinct(members.iter().copied().map(|p| p.issue.organization_name())) {
            let org_members: Vec<&PlacedIssue> = members
                .iter()
                .copied()
                .filter(|p| p.issue.organization_name() == organization)
                .collect();
            let org_dir = root.join(sanitize_filename(organization));
            builder.push(
                TemplateKind::OrganizationIndex,
                org_dir.clone(),
                organization,
                (Some(organization), None, None),
                &org_members,
            );

            for repository in distinct(org_members.iter().copied().map(|p| p.issue.repository_name())) {
                let repo_members: Vec<&PlacedIssue> = org_members
                    .iter()
                    .copied()
                    .filter(|p| p.issue.repository_name() == repository)
                    .collect();
                let repo_dir = org_dir.join(sanitize_filename(repository));
                builder.push(
                    TemplateKind::RepositoryIndex,
                    repo_dir.clone(),
                    repository,
                    (Some(organization), Some(repository), None),
                    &repo_members,
                );
                if layout.is_grouped_by_topic() {
                    builder.topic_pages(&repo_dir, &repo_members, (Some(organization), Some(repository)));
                }
            }
        }
    }
    pages
}

/// One row of a report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub kind: IssueErrorKind,
    pub repository_name: String,
    pub number: u64,
    pub html_url: String,
    pub message: String,
}

/// Folds the collection into report rows per group: one row per (issue, error kind).
/// Groups without errors are absent from the result.
pub fn build_report_rows(issues: &[PlacedIssue]) -> BTreeMap<DocumentationGroup, Vec<ReportRow>> {
    issues.iter().fold(BTreeMap::new(), |mut acc, placed| {
        let issue = &placed.issue;
        for (kind, message) in &issue.errors {
            acc.entry(issue.group).or_insert_with(Vec::new).push(ReportRow {
                kind: *kind,
                repository_name: issue.repository_name().to_string(),
                number: issue.number,
                html_url: issue.html_url.clone(),
                message: message.clone(),
            });
        }
        acc
    })
}

pub fn report_table(rows: &[ReportRow]) -> String {
    let mut table = String::from("| Error type | Issue | Message |\n|------------|-------|---------|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | [{}#{}]({}) | {} |\n",
            row.kind,
            row.repository_name,
            row.number,
            row.html_url,
            table_cell(&row.message)
        ));
    }
    table
}
