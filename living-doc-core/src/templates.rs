//! Page templates: which ones exist and how they are loaded from disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::contract::TemplateLoader;
use crate::error::TemplateError;

/// Every page kind the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    IssueDetail,
    FlatIndex,
    RootIndex,
    OrganizationIndex,
    RepositoryIndex,
    DataLevelIndex,
    ReportPage,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 7] = [
        TemplateKind::IssueDetail,
        TemplateKind::FlatIndex,
        TemplateKind::RootIndex,
        TemplateKind::OrganizationIndex,
        TemplateKind::RepositoryIndex,
        TemplateKind::DataLevelIndex,
        TemplateKind::ReportPage,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::IssueDetail => "issue_detail_page_template.md",
            TemplateKind::FlatIndex => "_index_no_struct_page_template.md",
            TemplateKind::RootIndex => "_index_root_level_page_template.md",
            TemplateKind::OrganizationIndex => "_index_org_level_page_template.md",
            TemplateKind::RepositoryIndex => "_index_repo_level_page_template.md",
            TemplateKind::DataLevelIndex => "_index_data_level_page_template.md",
            TemplateKind::ReportPage => "report_page_template.md",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::IssueDetail => "issue detail page",
            TemplateKind::FlatIndex => "flat index page",
            TemplateKind::RootIndex => "root level index page",
            TemplateKind::OrganizationIndex => "organization level index page",
            TemplateKind::RepositoryIndex => "repository level index page",
            TemplateKind::DataLevelIndex => "data level index page",
            TemplateKind::ReportPage => "report page",
        };
        f.write_str(name)
    }
}

/// Reads `<dir>/<kind file name>`.
pub struct FsTemplateLoader {
    dir: PathBuf,
}

impl FsTemplateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateLoader for FsTemplateLoader {
    fn load_template(&self, kind: TemplateKind) -> Result<String, TemplateError> {
        let path = self.dir.join(kind.file_name());
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), %kind, "Template read");
                Ok(content)
            }
            Err(e) => {
                error!(error = ?e, path = %path.display(), %kind, "Failed to read template");
                Err(TemplateError::Load {
                    kind,
                    path,
                    source: e,
                })
            }
        }
    }
}

/// All templates of a run, loaded up front so a missing one stops the run before any output
/// is touched.
#[derive(Debug, Clone)]
pub struct PageTemplates {
    pub issue_detail: String,
    pub flat_index: String,
    pub root_index: String,
    pub organization_index: String,
    pub repository_index: String,
    pub data_level_index: String,
    pub report_page: String,
}

impl PageTemplates {
    pub fn load<L: TemplateLoader + ?Sized>(loader: &L) -> Result<Self, TemplateError> {
        let load = |kind: TemplateKind| -> Result<String, TemplateError> {
            let content = loader.load_template(kind)?;
            if content.trim().is_empty() {
                error!(%kind, "Template is empty");
                return Err(TemplateError::Empty(kind));
            }
            Ok(content)
        };
        let templates = Self {
            issue_detail: load(TemplateKind::IssueDetail)?,
            flat_index: load(TemplateKind::FlatIndex)?,
            root_index: load(TemplateKind::RootIndex)?,
            organization_index: load(TemplateKind::OrganizationIndex)?,
            repository_index: load(TemplateKind::RepositoryIndex)?,
            data_level_index: load(TemplateKind::DataLevelIndex)?,
            report_page: load(TemplateKind::ReportPage)?,
        };
        info!(count = TemplateKind::ALL.len(), "Loaded page templates");
        Ok(templates)
    }

    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::IssueDetail => &self.issue_detail,
            TemplateKind::FlatIndex => &self.flat_index,
            TemplateKind::RootIndex => &self.root_index,
            TemplateKind::OrganizationIndex => &self.organization_index,
            TemplateKind::RepositoryIndex => &self.repository_index,
            TemplateKind::DataLevelIndex => &self.data_level_index,
            TemplateKind::ReportPage => &self.report_page,
        }
    }
}
