use living_doc_core::classify::DocumentationGroup;
use living_doc_core::index::{
    build_index_pages, build_report_rows, issue_overview_table, report_table, PlacedIssue,
};
use living_doc_core::issue::{ConsolidatedIssue, IssueErrorKind};
use living_doc_core::layout::LayoutMode;
use living_doc_core::project::ProjectStatus;
use living_doc_core::templates::TemplateKind;
use std::path::{Path, PathBuf};

fn placed(repository_id: &str, number: u64, title: &str, group: DocumentationGroup, topics: &[&str]) -> PlacedIssue {
    let mut issue = ConsolidatedIssue::new(repository_id);
    issue.number = number;
    issue.title = Some(title.to_string());
    issue.state = "open".to_string();
    issue.group = group;
    issue.topics = topics.iter().map(|t| t.to_string()).collect();
    issue.html_url = format!("https://github.com/{repository_id}/issues/{number}");
    let filename = issue.generate_page_filename();
    let layout = if topics.is_empty() {
        LayoutMode::Flat
    } else {
        LayoutMode::TopicGrouped
    };
    let directories = issue.generate_directory_path(Path::new("/out"), layout);
    PlacedIssue {
        issue,
        directories,
        filename,
    }
}

#[test]
fn test_overview_table_without_mining_keeps_insertion_order() {
    let issues = vec![
        placed("acme/widgets", 9, "Nine", DocumentationGroup::UserStory, &[]),
        placed("acme/widgets", 2, "Two", DocumentationGroup::UserStory, &[]),
    ];
    let refs: Vec<&PlacedIssue> = issues.iter().collect();

    let table = issue_overview_table(&refs, Path::new("/out/user_stories"), false);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(
        lines[0],
        "| Organization name | Repository name | Issue 'Number - Title' | Issue state |"
    );
    assert_eq!(lines[2], "| acme | widgets | [#9 - Nine](9_nine.md) | open |");
    assert_eq!(lines[3], "| acme | widgets | [#2 - Two](2_two.md) | open |");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_overview_table_with_mining_aggregates_statuses() {
    let mut linked = placed("acme/widgets", 7, "Demo Issue", DocumentationGroup::UserStory, &[]);
    linked
        .issue
        .update_with_project_data(ProjectStatus::new("Roadmap").with_status("Todo"));
    linked
        .issue
        .update_with_project_data(ProjectStatus::new("Release").with_status("Done"));
    let unlinked = placed("acme/widgets", 8, "Other", DocumentationGroup::UserStory, &[]);
    let issues = [linked, unlinked];
    let refs: Vec<&PlacedIssue> = issues.iter().collect();

    let table = issue_overview_table(&refs, Path::new("/out/user_stories"), true);
    let lines: Vec<&str> = table.lines().collect();

    assert!(lines[0].contains("| Linked to project | Project status | Issue URL |"));
    assert!(lines[2].contains("| 🟢 | Todo, Done |"), "row: {}", lines[2]);
    assert!(lines[2].contains("https://github.com/acme/widgets/issues/7"));
    assert!(lines[3].contains("| 🔴 | --- |"), "row: {}", lines[3]);
}

#[test]
fn test_pipe_in_title_is_escaped() {
    let issues = [placed("acme/widgets", 1, "A | B", DocumentationGroup::UserStory, &[])];
    let refs: Vec<&PlacedIssue> = issues.iter().collect();
    let table = issue_overview_table(&refs, Path::new("/out/user_stories"), false);
    assert!(table.contains("[#1 - A \\| B]"));
}

#[test]
fn test_flat_layout_emits_one_index_per_non_empty_group() {
    let issues = vec![
        placed("acme/widgets", 1, "Story", DocumentationGroup::UserStory, &[]),
        placed("acme/widgets", 2, "Feature", DocumentationGroup::Feature, &[]),
    ];
    let pages = build_index_pages(&issues, LayoutMode::Flat, Path::new("/out"), false);

    let dirs: Vec<&PathBuf> = pages.iter().map(|p| &p.directory).collect();
    assert_eq!(
        dirs,
        vec![&PathBuf::from("/out/user_stories"), &PathBuf::from("/out/features")]
    );
    assert!(pages.iter().all(|p| p.kind == TemplateKind::FlatIndex));
    assert!(pages[1]
        .issue_overview_table
        .contains("[#2 - Feature](2_feature/_index.md)"));
}

#[test]
fn test_structured_layout_emits_root_org_and_repo_indexes() {
    let mut issues = vec![
        placed("acme/widgets", 1, "One", DocumentationGroup::UserStory, &[]),
        placed("acme/gadgets", 2, "Two", DocumentationGroup::UserStory, &[]),
        placed("other/tools", 3, "Three", DocumentationGroup::UserStory, &[]),
    ];
    for p in &mut issues {
        p.directories = p.issue.generate_directory_path(Path::new("/out"), LayoutMode::Structured);
    }

    let pages = build_index_pages(&issues, LayoutMode::Structured, Path::new("/out"), false);
    let summary: Vec<(TemplateKind, PathBuf)> =
        pages.iter().map(|p| (p.kind, p.directory.clone())).collect();

    assert_eq!(
        summary,
        vec![
            (TemplateKind::RootIndex, PathBuf::from("/out/user_stories")),
            (TemplateKind::OrganizationIndex, PathBuf::from("/out/user_stories/acme")),
            (TemplateKind::RepositoryIndex, PathBuf::from("/out/user_stories/acme/widgets")),
            (TemplateKind::RepositoryIndex, PathBuf::from("/out/user_stories/acme/gadgets")),
            (TemplateKind::OrganizationIndex, PathBuf::from("/out/user_stories/other")),
            (TemplateKind::RepositoryIndex, PathBuf::from("/out/user_stories/other/tools")),
        ]
    );
    assert!(pages[0].issue_overview_table.contains("(acme/widgets/1_one.md)"));
    assert_eq!(pages[2].organization_name.as_deref(), Some("acme"));
    assert_eq!(pages[2].repository_name.as_deref(), Some("widgets"));
    assert!(pages[2].issue_overview_table.contains("(1_one.md)"));
    assert!(!pages[2].issue_overview_table.contains("Two"));
}

#[test]
fn test_topic_layout_lists_issue_under_every_topic() {
    let issues = vec![placed(
        "acme/widgets",
        5,
        "Shared",
        DocumentationGroup::Functionality,
        &["BackendTopic", "FrontendTopic"],
    )];
    let pages = build_index_pages(&issues, LayoutMode::TopicGrouped, Path::new("/out"), false);

    let topic_pages: Vec<_> = pages
        .iter()
        .filter(|p| p.kind == TemplateKind::DataLevelIndex)
        .collect();
    assert_eq!(topic_pages.len(), 2);
    assert_eq!(topic_pages[0].data_level_name.as_deref(), Some("BackendTopic"));
    assert!(topic_pages[1]
        .issue_overview_table
        .contains("(5_shared.md)"));
}

#[test]
fn test_empty_collection_emits_no_index() {
    let pages = build_index_pages(&[], LayoutMode::StructuredAndTopicGrouped, Path::new("/out"), true);
    assert!(pages.is_empty());
}

#[test]
fn test_report_rows_one_per_issue_and_error_kind() {
    let mut first = placed("acme/widgets", 7, "Demo", DocumentationGroup::UserStory, &[]);
    first.issue.record_error(IssueErrorKind::Topic, "No Topic label found.");
    first
        .issue
        .record_error(IssueErrorKind::Documentation, "More than one Documentation label found.");
    let clean = placed("acme/widgets", 8, "Clean", DocumentationGroup::UserStory, &[]);
    let mut feature = placed("acme/widgets", 9, "Feat", DocumentationGroup::Feature, &[]);
    feature.issue.record_error(IssueErrorKind::Topic, "More than one Topic label found.");

    let rows = build_report_rows(&[first, clean, feature]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&DocumentationGroup::UserStory].len(), 2);
    assert_eq!(rows[&DocumentationGroup::Feature].len(), 1);
    assert!(!rows.contains_key(&DocumentationGroup::Functionality));

    let table = report_table(&rows[&DocumentationGroup::UserStory]);
    assert!(table.contains(
        "| DocumentationError | [widgets#7](https://github.com/acme/widgets/issues/7) | More than one Documentation label found. |"
    ));
    assert!(table.contains("| TopicError | [widgets#7]"));
}
