use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::classify::ClassificationLabels;
use crate::layout::LayoutMode;

/// One repository to mine, as configured by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRepository {
    pub organization_name: String,
    pub repository_name: String,
    /// Empty means no label filter: every issue is fetched.
    #[serde(default)]
    pub query_labels: Vec<String>,
    /// Empty means every project linked to the repository is mined.
    #[serde(default)]
    pub projects_title_filter: Vec<String>,
}

impl ConfigRepository {
    pub fn new(organization_name: impl Into<String>, repository_name: impl Into<String>) -> Self {
        Self {
            organization_name: organization_name.into(),
            repository_name: repository_name.into(),
            query_labels: Vec::new(),
            projects_title_filter: Vec::new(),
        }
    }

    /// `"{organization}/{repository}"`.
    pub fn repository_id(&self) -> String {
        format!("{}/{}", self.organization_name, self.repository_name)
    }

    pub fn trace_loaded(&self) {
        info!(
            repository = %self.repository_id(),
            query_labels = ?self.query_labels,
            projects_title_filter = ?self.projects_title_filter,
            "Loaded repository"
        );
    }
}

/// Everything one generation run needs. Validated by the caller before the pipeline starts.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub repositories: Vec<ConfigRepository>,
    pub layout: LayoutMode,
    pub project_state_mining: bool,
    pub report_page: bool,
    pub labels: ClassificationLabels,
}

impl GeneratorConfig {
    pub fn trace_loaded(&self) {
        info!(
            output_dir = %self.output_dir.display(),
            repositories_count = self.repositories.len(),
            layout = ?self.layout,
            project_state_mining = self.project_state_mining,
            report_page = self.report_page,
            "Loaded GeneratorConfig"
        );
        for repository in &self.repositories {
            repository.trace_loaded();
        }
        debug!(?self, "GeneratorConfig loaded (full debug)");
    }
}
