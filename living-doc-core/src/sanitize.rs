//! Filesystem-safe names derived from user supplied issue titles.

use once_cell::sync::Lazy;
use regex::Regex;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '|', '?', '*', '`'];

static PERIOD_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").expect("valid regex"));
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Makes a filename or directory segment safe to write.
///
/// Strips `< > : " / | ? *` and backticks, collapses runs of periods and runs of spaces
/// to a single character, then replaces the remaining spaces with underscores.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    let stripped: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let collapsed = PERIOD_RUNS.replace_all(&stripped, ".");
    let collapsed = SPACE_RUNS.replace_all(&collapsed, " ");
    collapsed.replace(' ', "_")
}
