use living_doc_core::identity::{make_key, make_key_for_repository};
use living_doc_core::sanitize::sanitize_filename;
use std::collections::HashSet;

#[test]
fn test_make_key_format() {
    assert_eq!(make_key("acme", "widgets", 7), "acme/widgets/7");
    assert_eq!(make_key_for_repository("acme/widgets", 7), make_key("acme", "widgets", 7));
}

#[test]
fn test_make_key_is_injective_over_distinct_triples() {
    let organizations = ["acme", "acme-corp", "a", "ac"];
    let repositories = ["widgets", "me", "widgets-1", "1"];
    let numbers = [0u64, 1, 7, 11, 71, 117];

    let mut keys = HashSet::new();
    let mut triples = 0;
    for org in organizations {
        for repo in repositories {
            for number in numbers {
                keys.insert(make_key(org, repo, number));
                triples += 1;
            }
        }
    }
    assert_eq!(keys.len(), triples);
}

#[test]
fn test_sanitize_filename_cases() {
    let cases = [
        ("7_demo issue.md", "7_demo_issue.md"),
        ("1_what? <is> this: \"thing\"|*.md", "1_what_is_this_thing.md"),
        ("2_use `code` here.md", "2_use_code_here.md"),
        ("3_a/b/c.md", "3_abc.md"),
        ("4_wait....what...md", "4_wait.what.md"),
        ("5_too    many   spaces.md", "5_too_many_spaces.md"),
        ("6_a.?.b.md", "6_a.b.md"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(sanitize_filename(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_sanitize_filename_is_idempotent() {
    let inputs = [
        "Plain title",
        "  leading and trailing  ",
        "a . . b",
        "dots.. and ..spaces  mixed",
        "::??**``//",
        "emoji 🚀 title",
        "tabs\tand\nnewlines",
        "already_sanitized_name.md",
        "x.?.?.y",
    ];
    for input in inputs {
        let once = sanitize_filename(input);
        assert_eq!(sanitize_filename(&once), once, "input: {input:?}");
    }
}
