//! String helpers used by the field derivation rules

/// Collapse embedded newlines to single spaces.
pub fn to_single_line(s: &str) -> String {
    s.replace('\n', " ")
}

/// Strip one pair of braces when they wrap the whole string.
///
/// This is deliberately rudimentary: `{A} and {B}` loses its outer braces
/// too.
pub fn remove_enclosing_braces(s: &str) -> &str {
    match s.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
        Some(inner) => inner,
        None => s,
    }
}

/// Split a comma-separated field into trimmed items.
///
/// Empty input yields no items rather than a single empty one.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Conference heuristic on the journal name.
pub fn is_conference(journal: &str) -> bool {
    let journal = journal.to_lowercase();
    journal.contains("conf") || journal == "pos"
}

/// Placeholder date for a year; BibTeX has no day precision.
pub fn dummy_date(year: &str) -> String {
    format!("{year}-01-01")
}

/// Rudimentary slug: lowercase, colons become hyphens. Nothing else is
/// stripped.
pub fn slugify(s: &str) -> String {
    s.to_lowercase().replace(':', "-")
}
