//! Join key shared by repository issues and project items.

/// Builds the identity key `"{organization}/{repository}/{number}"`.
///
/// GitHub organization and repository names never contain `/`, so the key is unique per
/// triple. Issue data and project data are joined on this string only.
pub fn make_key(organization: &str, repository: &str, number: u64) -> String {
    format!("{organization}/{repository}/{number}")
}

/// Same as [`make_key`] for a `"{organization}/{repository}"` id.
pub fn make_key_for_repository(repository_id: &str, number: u64) -> String {
    format!("{repository_id}/{number}")
}
