use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use crate::doc::DocumentSnapshot;
use crate::model::NumberingPrefix;
use crate::text::normalize_line;

const TOP_PREFIX_COUNT: usize = 50;
const EXAMPLE_MAX_CHARS: usize = 140;

/// Dotted numeric prefix at line start followed by actual content,
/// e.g. "3.2.1 Corrosion observations".
const SECTION_PREFIX_PATTERN: &str = r"^(?P<num>\d+(?:\.\d+)*)\s+\S";

/// Tally dotted section-number prefixes across sampled pages.
///
/// Structural sanity signal for operators, never an input to range
/// resolution: a numbering scheme that looks inconsistent (say `1.1` far
/// more frequent than `1`) says the outline should be trusted over any
/// numbering-based heuristic. Keeps the first line seen per prefix as a
/// truncated example and returns the top prefixes by descending count,
/// ties broken by prefix for deterministic output.
pub fn summarize_section_numbering(
    snapshot: &DocumentSnapshot,
    sample_pages: usize,
) -> Result<Vec<NumberingPrefix>> {
    let prefix_regex =
        Regex::new(SECTION_PREFIX_PATTERN).context("failed to compile section prefix regex")?;

    let limit = snapshot.scan_limit(sample_pages);
    let mut counts = HashMap::<String, usize>::new();
    let mut examples = HashMap::<String, String>::new();

    for page in 1..=limit {
        for raw_line in snapshot.page_text(page).lines() {
            let line = normalize_line(raw_line);
            if line.is_empty() {
                continue;
            }

            let Some(captures) = prefix_regex.captures(&line) else {
                continue;
            };
            let Some(prefix) = captures.name("num") else {
                continue;
            };

            let prefix = prefix.as_str().to_string();
            *counts.entry(prefix.clone()).or_insert(0) += 1;
            examples
                .entry(prefix)
                .or_insert_with(|| truncate_chars(&line, EXAMPLE_MAX_CHARS));
        }
    }

    let mut summary = counts
        .into_iter()
        .map(|(prefix, count)| NumberingPrefix {
            example: examples.get(&prefix).cloned().unwrap_or_default(),
            prefix,
            count,
        })
        .collect::<Vec<NumberingPrefix>>();

    summary.sort_by(|a, b| b.count.cmp(&a.count).then(a.prefix.cmp(&b.prefix)));
    summary.truncate(TOP_PREFIX_COUNT);

    Ok(summary)
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
