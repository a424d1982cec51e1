use living_doc_core::contract::TemplateLoader;
use living_doc_core::error::TemplateError;
use living_doc_core::render::{placeholders, render, Bindings};
use living_doc_core::templates::{FsTemplateLoader, PageTemplates, TemplateKind};
use std::path::PathBuf;

fn shipped_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../templates")
}

fn complete_bindings() -> Bindings {
    let mut bindings = Bindings::new();
    for name in [
        "title",
        "date",
        "group",
        "issue_content",
        "issue_summary_table",
        "issue_overview_table",
        "organization_name",
        "repository_name",
        "data_level_name",
        "livdoc_report_page_content",
    ] {
        bindings.set(name, format!("<{name}>"));
    }
    bindings
}

#[test]
fn test_render_substitutes_every_placeholder() {
    let mut bindings = Bindings::new();
    bindings.set("title", "Demo").set("date", "2024-01-01");

    let out = render("# {title}\n{date} {title}", &bindings).expect("render");
    assert_eq!(out, "# Demo\n2024-01-01 Demo");
}

#[test]
fn test_render_rejects_missing_bindings() {
    let mut bindings = Bindings::new();
    bindings.set("title", "Demo");

    let err = render("{title} {date} {group} {date}", &bindings).unwrap_err();
    match err {
        TemplateError::UnresolvedPlaceholders(names) => {
            assert_eq!(names, vec!["date".to_string(), "group".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_none_is_bound_as_empty_string() {
    let mut bindings = Bindings::new();
    bindings.set_optional("title", None);
    assert_eq!(render("[{title}]", &bindings).expect("render"), "[]");
}

#[test]
fn test_values_are_not_rescanned() {
    let mut bindings = Bindings::new();
    bindings.set("issue_content", "fn main() { let x = {y}; }");
    let out = render("{issue_content}", &bindings).expect("braces in values are fine");
    assert_eq!(out, "fn main() { let x = {y}; }");
}

#[test]
fn test_placeholder_names_are_unique_and_ordered() {
    assert_eq!(
        placeholders("{b} {a} {b} {{< shortcode >}} { spaced }"),
        vec!["b".to_string(), "a".to_string()]
    );
}

#[test]
fn test_shipped_templates_render_completely() {
    let loader = FsTemplateLoader::new(shipped_templates_dir());
    let bindings = complete_bindings();
    for kind in TemplateKind::ALL {
        let template = loader.load_template(kind).expect("shipped template loads");
        let out = render(&template, &bindings).expect("complete bindings render");
        assert!(
            placeholders(&out).is_empty(),
            "{kind} left placeholders in: {out}"
        );
    }
}

#[test]
fn test_missing_template_directory_fails_loading() {
    let dir = tempfile::tempdir().unwrap();
    let loader = FsTemplateLoader::new(dir.path());
    let err = PageTemplates::load(&loader).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::Load {
            kind: TemplateKind::IssueDetail,
            ..
        }
    ));
}

#[test]
fn test_empty_template_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for kind in TemplateKind::ALL {
        std::fs::write(dir.path().join(kind.file_name()), "{title}").unwrap();
    }
    std::fs::write(dir.path().join(TemplateKind::ReportPage.file_name()), "  \n").unwrap();

    let err = PageTemplates::load(&FsTemplateLoader::new(dir.path())).unwrap_err();
    assert!(matches!(err, TemplateError::Empty(TemplateKind::ReportPage)));
}

#[test]
fn test_render_rejects_malformed_placeholder_names() {
    let mut bindings = Bindings::new();
    bindings.set("title", "Demo");

    let err = render("{title} {issue-title}", &bindings).unwrap_err();
    match err {
        TemplateError::UnresolvedPlaceholders(names) => {
            assert_eq!(names, vec!["issue-title".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
