/// Collapse whitespace runs (including NBSP) to single ASCII spaces and trim.
///
/// Every title or line compared or stored anywhere in the pipeline goes
/// through this first, so equal-looking strings from different extraction
/// paths hash and compare equal.
pub fn normalize_line(input: &str) -> String {
    input
        .replace('\u{00a0}', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Derive a stable, URL-safe key from a section title.
///
/// Lowercases, spells out `&` as "and", collapses every run of characters
/// outside `[a-z0-9]` into one hyphen, and strips edge hyphens. Titles with
/// no usable characters map to the fixed fallback `"section"`. Uniqueness
/// across titles is the caller's problem.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");

    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        return "section".to_string();
    }

    trimmed.to_string()
}
