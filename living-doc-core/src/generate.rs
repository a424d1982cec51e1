//! High-level pipeline: orchestrates fetch → consolidate → classify → render for all
//! configured repositories.
//!
//! Stages run strictly in order, each consuming the complete output of the previous one:
//!   - load every page template (a missing one aborts before anything is touched)
//!   - clean the output directory: remove the previous tree and recreate it empty
//!   - fetch the issues of every repository (concurrently, each repository is independent)
//!   - fetch project data, when project state mining is enabled
//!   - consolidate issues with project statuses on the identity key
//!   - classify every issue by its labels
//!   - render and write one page per issue, into every directory it belongs to
//!   - render and write the index pages of the layout
//!   - render and write the report pages, when enabled
//!
//! # Error Handling
//! Collaborator failures (fetch, filesystem, templates) abort the run with a
//! [`GeneratorError`]. Problems with single issues (labels, missing titles) are recorded in
//! the issue's error bag and end up on the report page. A page whose template cannot be fully
//! resolved is skipped and logged, and the run goes on.
//!
//! # Navigation
//! - Main entrypoint: [`generate`]
//! - Output: [`GenerationReport`]

use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::GeneratorConfig;
use crate::consolidate::{consolidate, RepositoryIssues};
use crate::contract::{DocumentWriter, IssueSource, ProjectSource, TemplateLoader};
use crate::error::GeneratorError;
use crate::index::{build_index_pages, build_report_rows, report_table, PlacedIssue, REPORT_PAGE_FILENAME};
use crate::issue::{ConsolidatedIssue, INDEX_PAGE_FILENAME};
use crate::layout::group_root;
use crate::page::{index_page_bindings, issue_page_bindings, report_page_bindings};
use crate::project::{ProjectStatus, RawProject};
use crate::render::render;
use crate::templates::{PageTemplates, TemplateKind};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub issues: usize,
    /// Issue page files written, counting every topic copy.
    pub pages_written: usize,
    pub index_pages_written: usize,
    pub report_pages_written: usize,
    /// Pages not written because their template had unresolved placeholders.
    pub skipped_pages: usize,
    /// Sum of recovered per-issue errors.
    pub recovered_errors: usize,
}

pub async fn generate<I, P, L, W>(
    config: &GeneratorConfig,
    issue_source: &I,
    project_source: &P,
    template_loader: &L,
    writer: &W,
) -> Result<GenerationReport, GeneratorError>
where
    I: IssueSource + ?Sized,
    P: ProjectSource + ?Sized,
    L: TemplateLoader + ?Sized,
    W: DocumentWriter + ?Sized,
{
    info!("[GEN] Starting Living Documentation generation");

    let templates = match PageTemplates::load(template_loader) {
        Ok(templates) => templates,
        Err(e) => {
            error!(error = %e, "[GEN][ERROR] Failed to load page templates");
            return Err(e.into());
        }
    };

    clean_output(writer, &config.output_dir)?;
    info!(output_dir = %config.output_dir.display(), "[GEN] Output directory prepared");

    let repositories = fetch_issues(config, issue_source).await?;

    let project_entries = if config.project_state_mining {
        fetch_project_data(config, project_source).await?
    } else {
        debug!("[GEN] Project state mining disabled, skipping project data");
        Vec::new()
    };

    let mut issues = consolidate(repositories, project_entries);

    let grouped_by_topic = config.layout.is_grouped_by_topic();
    for issue in &mut issues {
        let classification = config.labels.classify(&issue.labels, grouped_by_topic);
        issue.apply_classification(classification);
    }
    info!(issues = issues.len(), "[CLASSIFY] Classified issues");

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut report = GenerationReport {
        output_dir: config.output_dir.clone(),
        issues: issues.len(),
        ..GenerationReport::default()
    };

    let placed = render_issue_pages(config, &templates, writer, issues, &date, &mut report)?;
    render_index_pages(config, &templates, writer, &placed, &date, &mut report)?;
    if config.report_page {
        render_report_pages(config, &templates, writer, &placed, &date, &mut report)?;
    }

    report.recovered_errors = placed.iter().map(|p| p.issue.errors.len()).sum();
    info!(
        issues = report.issues,
        pages = report.pages_written,
        index_pages = report.index_pages_written,
        report_pages = report.report_pages_written,
        skipped_pages = report.skipped_pages,
        recovered_errors = report.recovered_errors,
        "[GEN] Generation complete"
    );
    Ok(report)
}

/// Removes the previous output and recreates the root. Both steps must succeed.
pub fn clean_output<W: DocumentWriter + ?Sized>(writer: &W, output_dir: &Path) -> Result<(), GeneratorError> {
    let to_error = |e: std::io::Error| {
        error!(error = ?e, path = %output_dir.display(), "[GEN][ERROR] Failed to prepare output directory");
        GeneratorError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source: e,
        }
    };
    writer.remove_tree(output_dir).map_err(to_error)?;
    writer.ensure_directory(output_dir).map_err(to_error)?;
    Ok(())
}

async fn fetch_issues<I: IssueSource + ?Sized>(
    config: &GeneratorConfig,
    issue_source: &I,
) -> Result<Vec<RepositoryIssues>, GeneratorError> {
    let fetches = config.repositories.iter().map(|repository| async move {
        let repository_id = repository.repository_id();
        info!(repository = %repository_id, labels = ?repository.query_labels, "[FETCH] Fetching issues");
        match issue_source
            .fetch_issues(&repository_id, &repository.query_labels)
            .await
        {
            Ok(issues) => {
                info!(repository = %repository_id, count = issues.len(), "[FETCH] Issues fetched");
                Ok(RepositoryIssues {
                    repository_id,
                    issues,
                })
            }
            Err(e) => {
                error!(repository = %repository_id, error = %e, "[FETCH][ERROR] Issue fetch failed");
                Err(GeneratorError::FetchIssues {
                    repository: repository_id,
                    source: e,
                })
            }
        }
    });
    try_join_all(fetches).await
}

/// Every `(identity key, status)` pair of every project linked to a configured repository.
///
/// A project linked to several configured repositories is read once.
async fn fetch_project_data<P: ProjectSource + ?Sized>(
    config: &GeneratorConfig,
    project_source: &P,
) -> Result<Vec<(String, ProjectStatus)>, GeneratorError> {
    let lookups = config.repositories.iter().map(|repository| async move {
        let repository_id = repository.repository_id();
        project_source
            .fetch_projects(&repository_id, &repository.projects_title_filter)
            .await
            .map_err(|e| {
                error!(repository = %repository_id, error = %e, "[FETCH][ERROR] Project fetch failed");
                GeneratorError::FetchProjects {
                    repository: repository_id.clone(),
                    source: e,
                }
            })
    });
    let per_repository = try_join_all(lookups).await?;

    let mut seen = HashSet::new();
    let projects: Vec<RawProject> = per_repository
        .into_iter()
        .flatten()
        .filter(|project| seen.insert(project.id.clone()))
        .collect();
    info!(projects = projects.len(), "[FETCH] Projects to mine");

    let item_fetches = projects.iter().map(|project| async move {
        project_source
            .fetch_project_issues(project)
            .await
            .map(|items| {
                debug!(project = %project.title, items = items.len(), "[FETCH] Project items fetched");
                items
                    .iter()
                    .map(|item| (item.key(), project.status_for(&item.field_values)))
                    .collect::<Vec<_>>()
            })
            .map_err(|e| {
                error!(project = %project.title, error = %e, "[FETCH][ERROR] Project item fetch failed");
                GeneratorError::FetchProjects {
                    repository: project.organization_name.clone(),
                    source: e,
                }
            })
    });
    let entries = try_join_all(item_fetches).await?;
    Ok(entries.into_iter().flatten().collect())
}

fn write_page<W: DocumentWriter + ?Sized>(
    writer: &W,
    directory: &Path,
    filename: &str,
    content: &str,
) -> Result<(), GeneratorError> {
    writer
        .ensure_directory(directory)
        .map_err(|e| {
            error!(error = ?e, path = %directory.display(), "[RENDER][ERROR] Failed to create page directory");
            GeneratorError::OutputDirectory {
                path: directory.to_path_buf(),
                source: e,
            }
        })?;
    let path = directory.join(filename);
    writer.write(&path, content).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[RENDER][ERROR] Failed to write page");
        GeneratorError::Write { path, source: e }
    })
}

fn render_issue_pages<W: DocumentWriter + ?Sized>(
    config: &GeneratorConfig,
    templates: &PageTemplates,
    writer: &W,
    issues: Vec<ConsolidatedIssue>,
    date: &str,
    report: &mut GenerationReport,
) -> Result<Vec<PlacedIssue>, GeneratorError> {
    let mut placed = Vec::with_capacity(issues.len());
    for mut issue in issues {
        let filename = issue.generate_page_filename();
        let directories = issue.generate_directory_path(&config.output_dir, config.layout);

        let bindings = issue_page_bindings(&issue, date, config.project_state_mining);
        match render(templates.get(TemplateKind::IssueDetail), &bindings) {
            Ok(content) => {
                for directory in &directories {
                    write_page(writer, directory, &filename, &content)?;
                    report.pages_written += 1;
                }
                debug!(issue = %issue.key(), copies = directories.len(), "[RENDER] Issue page written");
            }
            Err(e) => {
                error!(issue = %issue.key(), error = %e, "[RENDER][ERROR] Issue page not written");
                report.skipped_pages += 1;
            }
        }

        placed.push(PlacedIssue {
            issue,
            directories,
            filename,
        });
    }
    info!(pages = report.pages_written, "[RENDER] Issue pages written");
    Ok(placed)
}

fn render_index_pages<W: DocumentWriter + ?Sized>(
    config: &GeneratorConfig,
    templates: &PageTemplates,
    writer: &W,
    placed: &[PlacedIssue],
    date: &str,
    report: &mut GenerationReport,
) -> Result<(), GeneratorError> {
    let pages = build_index_pages(
        placed,
        config.layout,
        &config.output_dir,
        config.project_state_mining,
    );
    for page in &pages {
        let bindings = index_page_bindings(page, date);
        match render(templates.get(page.kind), &bindings) {
            Ok(content) => {
                write_page(writer, &page.directory, INDEX_PAGE_FILENAME, &content)?;
                report.index_pages_written += 1;
            }
            Err(e) => {
                error!(path = %page.directory.display(), kind = %page.kind, error = %e, "[RENDER][ERROR] Index page not written");
                report.skipped_pages += 1;
            }
        }
    }
    info!(index_pages = report.index_pages_written, "[RENDER] Index pages written");
    Ok(())
}

fn render_report_pages<W: DocumentWriter + ?Sized>(
    config: &GeneratorConfig,
    templates: &PageTemplates,
    writer: &W,
    placed: &[PlacedIssue],
    date: &str,
    report: &mut GenerationReport,
) -> Result<(), GeneratorError> {
    let rows = build_report_rows(placed);
    if rows.is_empty() {
        info!("[REPORT] No recovered errors, no report page written");
        return Ok(());
    }
    for (group, rows) in &rows {
        let bindings = report_page_bindings(*group, &report_table(rows), date);
        match render(templates.get(TemplateKind::ReportPage), &bindings) {
            Ok(content) => {
                let directory = group_root(&config.output_dir, *group);
                write_page(writer, &directory, REPORT_PAGE_FILENAME, &content)?;
                report.report_pages_written += 1;
                warn!(group = %group, errors = rows.len(), "[REPORT] Recovered errors reported");
            }
            Err(e) => {
                error!(group = %group, error = %e, "[RENDER][ERROR] Report page not written");
                report.skipped_pages += 1;
            }
        }
    }
    Ok(())
}
