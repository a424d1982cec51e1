//! Placeholder bindings for each page kind.

use crate::classify::DocumentationGroup;
use crate::index::{table_cell, IndexPage, LINKED_GLYPH, UNLINKED_GLYPH};
use crate::issue::ConsolidatedIssue;
use crate::project::or_not_available;
use crate::render::Bindings;

/// Attribute/content table shown at the top of an issue page.
pub fn issue_summary_table(issue: &ConsolidatedIssue, mining: bool) -> String {
    let labels = issue.labels.join(", ");
    let mut rows: Vec<(String, String)> = vec![
        ("Organization name".into(), issue.organization_name().to_string()),
        ("Repository name".into(), issue.repository_name().to_string()),
        ("Issue number".into(), issue.number.to_string()),
        ("Title".into(), issue.display_title().to_string()),
        ("State".into(), issue.state.clone()),
        (
            "Issue URL".into(),
            format!("<a href='{}' target='_blank'>GitHub link</a>", issue.html_url),
        ),
        ("Created at".into(), issue.created_at.clone().unwrap_or_default()),
        ("Updated at".into(), issue.updated_at.clone().unwrap_or_default()),
        ("Closed at".into(), issue.closed_at.clone().unwrap_or_default()),
        ("Labels".into(), labels),
    ];

    if mining {
        let glyph = if issue.linked_to_project {
            LINKED_GLYPH
        } else {
            UNLINKED_GLYPH
        };
        rows.push(("Linked to project".into(), glyph.to_string()));
        for status in &issue.project_statuses {
            rows.push(("Project title".into(), status.project_title.clone()));
            rows.push(("Status".into(), or_not_available(&status.status).to_string()));
            rows.push(("Priority".into(), or_not_available(&status.priority).to_string()));
            rows.push(("Size".into(), or_not_available(&status.size).to_string()));
            rows.push(("MoSCoW".into(), or_not_available(&status.moscow).to_string()));
        }
    }

    let mut table = String::from("| Attribute | Content |\n|---|---|\n");
    for (attribute, content) in rows {
        table.push_str(&format!("| {} | {} |\n", attribute, table_cell(&content)));
    }
    table
}

pub fn issue_page_bindings(issue: &ConsolidatedIssue, date: &str, mining: bool) -> Bindings {
    let mut bindings = Bindings::new();
    bindings
        .set_optional("title", issue.title.as_deref())
        .set("date", date)
        .set("group", issue.group.title())
        .set("organization_name", issue.organization_name())
        .set("repository_name", issue.repository_name())
        .set("issue_summary_table", issue_summary_table(issue, mining))
        .set("issue_content", issue.body.as_str());
    bindings
}

pub fn index_page_bindings(page: &IndexPage, date: &str) -> Bindings {
    let mut bindings = Bindings::new();
    bindings
        .set("title", page.title.as_str())
        .set("date", date)
        .set("group", page.group.title())
        .set_optional("organization_name", page.organization_name.as_deref())
        .set_optional("repository_name", page.repository_name.as_deref())
        .set_optional("data_level_name", page.data_level_name.as_deref())
        .set("issue_overview_table", page.issue_overview_table.as_str());
    bindings
}

pub fn report_page_bindings(group: DocumentationGroup, content: &str, date: &str) -> Bindings {
    let mut bindings = Bindings::new();
    bindings
        .set("title", format!("{} Report", group.title()))
        .set("date", date)
        .set("group", group.title())
        .set("livdoc_report_page_content", content);
    bindings
}
