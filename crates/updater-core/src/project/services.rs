//! Services list parsing and detail reconciliation.
//!
//! The operator edits services as one delimited text field. Committing it
//! produces the authoritative list, and the parallel detail list is resized to
//! match: details are carried over by position, never by name.

/// Splits raw services text on `delimiter`, trimming entries and dropping
/// empty ones. Order and duplicates are preserved.
pub fn parse_services(raw_text: &str, delimiter: char) -> Vec<String> {
    raw_text
        .split(delimiter)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Builds the detail list for `new_len` services from the previous details.
///
/// Index `i` keeps `previous[i]` when it existed, otherwise starts empty.
/// The result always has exactly `new_len` entries.
pub fn reconcile_details(previous: &[String], new_len: usize) -> Vec<String> {
    (0..new_len)
        .map(|i| previous.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Canonical text form of a committed list, e.g. `"a, b, c"`.
pub fn join_services(services: &[String], delimiter: char) -> String {
    services.join(&format!("{delimiter} "))
}
