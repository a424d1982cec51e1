use living_doc::load_config::{
    bool_input, load_action_inputs, load_config, verbose_requested, write_action_output,
    DEFAULT_OUTPUT_DIR,
};
use living_doc_core::layout::LayoutMode;
use serial_test::serial;
use std::env;
use std::fs::{read_to_string, write};
use std::path::PathBuf;
use tempfile::{tempdir, NamedTempFile};

const ACTION_VARIABLES: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_OUTPUT",
    "GITHUB_ACTION_PATH",
    "INPUT_GITHUB_TOKEN",
    "INPUT_REPOSITORIES",
    "INPUT_LIV_DOC_PROJECT_STATE_MINING",
    "INPUT_LIV_DOC_STRUCTURED_OUTPUT",
    "INPUT_LIV_DOC_GROUP_OUTPUT_BY_TOPICS",
    "INPUT_REPORT_PAGE",
    "INPUT_VERBOSE_LOGGING",
    "INPUT_OUTPUT_PATH",
    "INPUT_TEMPLATES_DIR",
];

fn clear_action_environment() {
    for name in ACTION_VARIABLES {
        env::remove_var(name);
    }
}

fn config_file(yaml: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), yaml).unwrap();
    config_file
}

/// A full config file maps onto the generator config and its layout mode.
#[test]
fn test_load_config_full_file() {
    let config_file = config_file(
        r#"
output_dir: ./tmp/liv-doc
templates_dir: ./my-templates
structured_output: true
group_output_by_topics: true
project_state_mining: true
report_page: false
labels:
  user_story: Story
  topic_suffix: Area
repositories:
  - organization_name: acme
    repository_name: widgets
    query_labels: [Story, DocumentedFeature]
    projects_title_filter: [Roadmap]
  - organization_name: acme
    repository_name: gadgets
"#,
    );

    let settings = load_config(config_file.path()).expect("Config should load");
    let generator = &settings.generator;

    assert_eq!(generator.output_dir, PathBuf::from("./tmp/liv-doc"));
    assert_eq!(settings.templates_dir, PathBuf::from("./my-templates"));
    assert_eq!(generator.layout, LayoutMode::StructuredAndTopicGrouped);
    assert!(generator.project_state_mining);
    assert!(!generator.report_page);
    assert_eq!(generator.labels.user_story, "Story");
    assert_eq!(generator.labels.feature, "DocumentedFeature");
    assert_eq!(generator.labels.topic_suffix.as_deref(), Some("Area"));

    assert_eq!(generator.repositories.len(), 2);
    assert_eq!(generator.repositories[0].repository_id(), "acme/widgets");
    assert_eq!(generator.repositories[0].query_labels, vec!["Story", "DocumentedFeature"]);
    assert_eq!(generator.repositories[0].projects_title_filter, vec!["Roadmap"]);
    assert!(generator.repositories[1].query_labels.is_empty());
}

/// Omitted keys take their defaults: flat layout, report page on, default labels.
#[test]
fn test_load_config_defaults() {
    let config_file = config_file(
        r#"
repositories:
  - organization_name: acme
    repository_name: widgets
"#,
    );

    let settings = load_config(config_file.path()).expect("Config should load");
    assert_eq!(settings.generator.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    assert_eq!(settings.generator.layout, LayoutMode::Flat);
    assert!(settings.generator.report_page);
    assert!(!settings.generator.project_state_mining);
    assert_eq!(settings.generator.labels.user_story, "DocumentedUserStory");
}

#[test]
fn test_load_config_rejects_empty_repository_list() {
    let config_file = config_file("output_dir: ./tmp\nrepositories: []\n");
    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("At least one repository"), "got: {err}");
}

#[test]
fn test_load_config_rejects_repository_without_name() {
    let config_file = config_file(
        "repositories:\n  - organization_name: acme\n    repository_name: \"\"\n",
    );
    assert!(load_config(config_file.path()).is_err());
}

#[test]
fn test_load_config_errors_for_invalid_file() {
    let config_file = config_file("not-yaml: [:::");
    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn test_load_config_errors_for_missing_file() {
    let err = load_config("definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_action_inputs_are_read_from_environment() {
    clear_action_environment();
    env::set_var("INPUT_GITHUB_TOKEN", "token-123");
    env::set_var(
        "INPUT_REPOSITORIES",
        r#"[{"organization-name": "acme", "repository-name": "widgets",
             "query-labels": ["DocumentedUserStory"], "projects-title-filter": []}]"#,
    );
    env::set_var("INPUT_LIV_DOC_STRUCTURED_OUTPUT", "TRUE");
    env::set_var("INPUT_LIV_DOC_PROJECT_STATE_MINING", "true");
    env::set_var("INPUT_REPORT_PAGE", "False");
    env::set_var("INPUT_VERBOSE_LOGGING", "true");
    env::set_var("INPUT_OUTPUT_PATH", "./docs/liv-doc");
    env::set_var("GITHUB_ACTION_PATH", "/opt/action");

    let inputs = load_action_inputs().expect("Action inputs should load");
    let generator = &inputs.settings.generator;

    assert_eq!(inputs.github_token, "token-123");
    assert!(verbose_requested());
    assert_eq!(generator.layout, LayoutMode::Structured);
    assert!(generator.project_state_mining);
    assert!(!generator.report_page);
    assert_eq!(generator.output_dir, PathBuf::from("./docs/liv-doc"));
    assert_eq!(inputs.settings.templates_dir, PathBuf::from("/opt/action/templates"));
    assert_eq!(generator.repositories[0].repository_id(), "acme/widgets");
    assert_eq!(generator.repositories[0].query_labels, vec!["DocumentedUserStory"]);

    clear_action_environment();
}

#[test]
#[serial]
fn test_action_inputs_defaults() {
    clear_action_environment();
    env::set_var("GITHUB_TOKEN", "token-abc");
    env::set_var(
        "INPUT_REPOSITORIES",
        r#"[{"organization-name": "acme", "repository-name": "widgets"}]"#,
    );

    let inputs = load_action_inputs().expect("Action inputs should load");
    assert_eq!(inputs.github_token, "token-abc");
    assert!(!verbose_requested());
    assert_eq!(inputs.settings.generator.layout, LayoutMode::Flat);
    assert!(inputs.settings.generator.report_page);
    assert!(!inputs.settings.generator.project_state_mining);
    assert_eq!(inputs.settings.generator.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));

    clear_action_environment();
}

#[test]
#[serial]
fn test_action_inputs_require_token() {
    clear_action_environment();
    env::set_var(
        "INPUT_REPOSITORIES",
        r#"[{"organization-name": "acme", "repository-name": "widgets"}]"#,
    );

    let err = load_action_inputs().unwrap_err();
    assert!(err.to_string().contains("GitHub token"), "got: {err}");

    clear_action_environment();
}

#[test]
#[serial]
fn test_action_inputs_reject_invalid_repositories_json() {
    clear_action_environment();
    env::set_var("INPUT_GITHUB_TOKEN", "token-123");
    env::set_var("INPUT_REPOSITORIES", "[{not json");

    let err = load_action_inputs().unwrap_err();
    assert!(err.to_string().contains("REPOSITORIES"), "got: {err}");

    clear_action_environment();
}

#[test]
#[serial]
fn test_bool_input_rejects_other_spellings() {
    clear_action_environment();
    env::set_var("INPUT_LIV_DOC_STRUCTURED_OUTPUT", "yes");
    assert!(bool_input("LIV_DOC_STRUCTURED_OUTPUT", false).is_err());

    env::set_var("INPUT_LIV_DOC_STRUCTURED_OUTPUT", "  ");
    assert!(!bool_input("LIV_DOC_STRUCTURED_OUTPUT", false).unwrap());
    assert!(bool_input("REPORT_PAGE", true).unwrap());

    clear_action_environment();
}

#[test]
#[serial]
fn test_action_output_is_appended() {
    clear_action_environment();
    let dir = tempdir().unwrap();
    let output_file = dir.path().join("github_output");
    write(&output_file, "previous=1\n").unwrap();
    env::set_var("GITHUB_OUTPUT", &output_file);

    write_action_output(&PathBuf::from("./output/liv-doc")).expect("output should be written");

    let content = read_to_string(&output_file).unwrap();
    assert_eq!(content, "previous=1\noutput-path=./output/liv-doc\n");

    clear_action_environment();
}

#[test]
#[serial]
fn test_action_output_without_github_output_is_noop() {
    clear_action_environment();
    assert!(write_action_output(&PathBuf::from("./output")).is_ok());
}

#[test]
#[serial]
fn test_invalid_verbose_input_falls_back_to_info() {
    clear_action_environment();
    env::set_var("INPUT_VERBOSE_LOGGING", "loud");
    assert!(!verbose_requested());

    env::set_var("INPUT_VERBOSE_LOGGING", "True");
    assert!(verbose_requested());

    clear_action_environment();
}
