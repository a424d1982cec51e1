//! `{name}` placeholder substitution.
//!
//! A template is rendered only when every placeholder it contains has a binding. Partially
//! rendered pages are never produced.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use crate::error::TemplateError;

/// Any brace pair around a name without whitespace, so malformed names such as
/// `{issue-title}` are reported instead of left in the page.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}\s]+)\}").expect("valid placeholder regex"));

/// Values bound to placeholder names for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Binds `None` as an empty string; the placeholder still counts as resolved.
    pub fn set_optional(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.set(name, value.unwrap_or_default())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Names of every placeholder in `template`, in first-seen order.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitutes every placeholder of `template` in one pass.
///
/// Bound values are inserted verbatim and never scanned again, so issue bodies containing
/// braces are safe. Any placeholder without a binding fails the whole page.
pub fn render(template: &str, bindings: &Bindings) -> Result<String, TemplateError> {
    let missing: Vec<String> = placeholders(template)
        .into_iter()
        .filter(|name| !bindings.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::UnresolvedPlaceholders(missing));
    }

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        bindings.get(&caps[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}
