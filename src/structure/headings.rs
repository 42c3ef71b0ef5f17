use std::collections::HashSet;

use crate::doc::DocumentSnapshot;
use crate::model::HeadingCandidate;
use crate::text::normalize_line;

const HEADING_SIZE_MARGIN: f64 = 3.0;
const MIN_HEADING_TEXT_LEN: usize = 4;

/// Flag spans whose font size is an outlier on their own page.
///
/// The threshold is the page's median span size plus an absolute margin,
/// computed per page rather than globally: different sections may use
/// different body-text sizes, and a global threshold would bias against
/// pages with larger running text. Pages without spans are skipped.
/// Candidates are deduplicated by exact text within a page, first
/// occurrence wins, span order preserved.
pub fn detect_heading_candidates(
    snapshot: &DocumentSnapshot,
    sample_pages: usize,
) -> Vec<HeadingCandidate> {
    let limit = snapshot.scan_limit(sample_pages);
    let mut candidates = Vec::new();

    for page in 1..=limit {
        let Some(content) = snapshot.pages.get(page - 1) else {
            continue;
        };

        let mut sizes = Vec::new();
        let mut spans = Vec::new();
        for span in &content.spans {
            let text = normalize_line(&span.text);
            if text.is_empty() {
                continue;
            }
            sizes.push(span.size);
            spans.push((text, span.size));
        }

        if sizes.is_empty() {
            continue;
        }

        sizes.sort_by(|a, b| a.total_cmp(b));
        let median = sizes[sizes.len() / 2];
        let threshold = median + HEADING_SIZE_MARGIN;

        let mut seen = HashSet::new();
        for (text, size) in spans {
            if size < threshold || text.len() < MIN_HEADING_TEXT_LEN {
                continue;
            }
            if !seen.insert(text.clone()) {
                continue;
            }

            candidates.push(HeadingCandidate {
                page: page as i64,
                text,
                size,
            });
        }
    }

    candidates
}
