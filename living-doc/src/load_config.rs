/// `load_config` module: turns user input (a YAML file, or GitHub Action `INPUT_*` variables)
/// into the validated [`GeneratorConfig`] the core pipeline expects.
///
/// This is the only place where untrusted configuration is parsed. The core does not
/// re-validate its inputs, so everything it assumes is checked here:
/// - at least one repository, each with an organization and a repository name
/// - booleans spelled `true` or `false` (any case)
/// - a repositories JSON document that parses
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
///
/// Secrets (the GitHub token) are never read from the YAML file, only from the environment.
use anyhow::{anyhow, bail, Context, Result};
use living_doc_core::classify::ClassificationLabels;
use living_doc_core::config::{ConfigRepository, GeneratorConfig};
use living_doc_core::layout::LayoutMode;
use serde::Deserialize;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_TEMPLATES_DIR: &str = "./templates";

/// YAML shape of the `generate` config file.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default)]
    pub structured_output: bool,
    #[serde(default)]
    pub group_output_by_topics: bool,
    #[serde(default)]
    pub project_state_mining: bool,
    #[serde(default = "default_report_page")]
    pub report_page: bool,
    #[serde(default)]
    pub labels: ClassificationLabels,
    #[serde(default)]
    pub repositories: Vec<ConfigRepository>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_DIR)
}

fn default_report_page() -> bool {
    true
}

/// Validated settings of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub templates_dir: PathBuf,
}

impl CliConfig {
    pub fn into_settings(self) -> Result<Settings> {
        validate_repositories(&self.repositories)?;
        let generator = GeneratorConfig {
            output_dir: self.output_dir,
            repositories: self.repositories,
            layout: LayoutMode::from_flags(self.structured_output, self.group_output_by_topics),
            project_state_mining: self.project_state_mining,
            report_page: self.report_page,
            labels: self.labels,
        };
        generator.trace_loaded();
        Ok(Settings {
            generator,
            templates_dir: self.templates_dir,
        })
    }
}

fn validate_repositories(repositories: &[ConfigRepository]) -> Result<()> {
    if repositories.is_empty() {
        error!("No repositories configured");
        bail!("At least one repository must be configured");
    }
    for repository in repositories {
        if repository.organization_name.trim().is_empty()
            || repository.repository_name.trim().is_empty()
        {
            error!(repository = ?repository, "Repository without organization or repository name");
            bail!(
                "Repository '{}' needs both an organization and a repository name",
                repository.repository_id()
            );
        }
    }
    Ok(())
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    let raw: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    raw.into_settings()
}

/// Repository entry of the `INPUT_REPOSITORIES` JSON document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ActionRepository {
    organization_name: String,
    repository_name: String,
    #[serde(default)]
    query_labels: Vec<String>,
    #[serde(default)]
    projects_title_filter: Vec<String>,
}

impl From<ActionRepository> for ConfigRepository {
    fn from(repository: ActionRepository) -> Self {
        ConfigRepository {
            organization_name: repository.organization_name,
            repository_name: repository.repository_name,
            query_labels: repository.query_labels,
            projects_title_filter: repository.projects_title_filter,
        }
    }
}

/// Everything a GitHub Action run needs.
#[derive(Debug, Clone)]
pub struct ActionInputs {
    pub settings: Settings,
    pub github_token: String,
}

/// Value of an action input, `None` when unset or blank.
pub fn action_input(name: &str) -> Option<String> {
    env::var(format!("INPUT_{name}"))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Boolean action input. Accepts `true`/`false` in any case.
pub fn bool_input(name: &str, default: bool) -> Result<bool> {
    match action_input(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => {
                error!(input = name, value = %value, "Invalid boolean action input");
                bail!("Action input {name} must be 'true' or 'false', got '{value}'")
            }
        },
    }
}

/// GitHub token from `GITHUB_TOKEN` or the `github-token` action input.
pub fn github_token_from_env() -> Result<String> {
    env::var("GITHUB_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| action_input("GITHUB_TOKEN"))
        .ok_or_else(|| {
            error!("No GitHub token found in GITHUB_TOKEN or INPUT_GITHUB_TOKEN");
            anyhow!("A GitHub token is required (GITHUB_TOKEN or INPUT_GITHUB_TOKEN)")
        })
}

/// Whether the action asked for verbose logging. Invalid values fall back to false.
pub fn verbose_requested() -> bool {
    bool_input("VERBOSE_LOGGING", false).unwrap_or(false)
}

/// Reads the GitHub Action inputs from the environment.
pub fn load_action_inputs() -> Result<ActionInputs> {
    info!("Loading configuration from action inputs");
    let github_token = github_token_from_env()?;

    let repositories_json = action_input("REPOSITORIES")
        .ok_or_else(|| anyhow!("Action input REPOSITORIES is required"))?;
    let repositories: Vec<ActionRepository> = serde_json::from_str(&repositories_json)
        .map_err(|e| {
            error!(error = ?e, "Failed to parse REPOSITORIES input");
            e
        })
        .context("Action input REPOSITORIES is not a valid JSON list of repositories")?;

    let templates_dir = match action_input("TEMPLATES_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => env::var("GITHUB_ACTION_PATH")
            .map(|action_path| Path::new(&action_path).join("templates"))
            .unwrap_or_else(|_| default_templates_dir()),
    };

    let config = CliConfig {
        output_dir: action_input("OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_output_dir),
        templates_dir,
        structured_output: bool_input("LIV_DOC_STRUCTURED_OUTPUT", false)?,
        group_output_by_topics: bool_input("LIV_DOC_GROUP_OUTPUT_BY_TOPICS", false)?,
        project_state_mining: bool_input("LIV_DOC_PROJECT_STATE_MINING", false)?,
        report_page: bool_input("REPORT_PAGE", true)?,
        labels: ClassificationLabels::default(),
        repositories: repositories.into_iter().map(ConfigRepository::from).collect(),
    };

    Ok(ActionInputs {
        settings: config.into_settings()?,
        github_token,
    })
}

/// Appends `output-path=<dir>` to the file named by `GITHUB_OUTPUT`, when set.
pub fn write_action_output(output_dir: &Path) -> Result<()> {
    let Ok(output_file) = env::var("GITHUB_OUTPUT") else {
        warn!("GITHUB_OUTPUT not set, action output not written");
        return Ok(());
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&output_file)
        .with_context(|| format!("Failed to open GITHUB_OUTPUT file {output_file}"))?;
    writeln!(file, "output-path={}", output_dir.display())
        .with_context(|| format!("Failed to write GITHUB_OUTPUT file {output_file}"))?;
    info!(output_path = %output_dir.display(), "Action output written");
    Ok(())
}
