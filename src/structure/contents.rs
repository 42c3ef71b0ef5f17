use anyhow::{Context, Result};
use regex::Regex;

use crate::doc::DocumentSnapshot;
use crate::model::SectionEntry;
use crate::text::normalize_line;

const DEFAULT_KEYWORDS: &[&str] = &["table of contents", "contents"];
const MIN_CONTENTS_LINE_LEN: usize = 6;

/// Lines shaped like "Probable Cause ........ 118": title, whitespace, a
/// 1-to-4-digit page number at end of line.
const CONTENTS_LINE_PATTERN: &str = r"^(?P<title>.+?)\s+(?P<page>\d{1,4})$";

/// Keyword set and line pattern used to locate and parse human-readable
/// contents pages. Constructed explicitly so tests and callers can swap
/// keyword sets without touching global state.
#[derive(Debug, Clone)]
pub struct ContentsMatcher {
    keywords: Vec<String>,
    line_regex: Regex,
}

/// Fallback entries parsed from contents-page lines, plus the number of
/// superficially matching lines rejected by the stricter title checks.
#[derive(Debug, Clone, Default)]
pub struct ContentsLines {
    pub entries: Vec<SectionEntry>,
    pub rejected_lines: usize,
}

impl ContentsMatcher {
    pub fn new() -> Result<Self> {
        Self::with_keywords(DEFAULT_KEYWORDS.iter().map(|keyword| keyword.to_string()))
    }

    pub fn with_keywords(keywords: impl IntoIterator<Item = String>) -> Result<Self> {
        let line_regex =
            Regex::new(CONTENTS_LINE_PATTERN).context("failed to compile contents line regex")?;

        Ok(Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            line_regex,
        })
    }

    /// Whether an exact normalized title names the contents listing itself
    /// (used by the range resolver's disambiguation rule).
    pub fn is_contents_title(&self, title: &str) -> bool {
        let lowered = normalize_line(title).to_lowercase();
        self.keywords.iter().any(|keyword| lowered == *keyword)
    }

    /// Scan the first `search_max_pages` pages for contents keywords.
    ///
    /// Returns 1-based page numbers in document order. No match is a valid
    /// degraded state, not an error.
    pub fn find_contents_pages(
        &self,
        snapshot: &DocumentSnapshot,
        search_max_pages: usize,
    ) -> Vec<usize> {
        let limit = snapshot.scan_limit(search_max_pages);
        let mut found = Vec::new();

        for page in 1..=limit {
            let text = snapshot.page_text(page).to_lowercase();
            if self.keywords.iter().any(|keyword| text.contains(keyword)) {
                found.push(page);
            }
        }

        found
    }

    /// Parse "title … page-number" lines from one candidate page's text.
    ///
    /// Precision over recall: lines under the minimum length, bare numbers,
    /// and titles that are empty or purely numeric after stripping dot
    /// leaders are dropped rather than mis-captured. Surviving lines become
    /// level-1 fallback entries.
    pub fn parse_contents_lines(&self, text: &str) -> ContentsLines {
        let mut parsed = ContentsLines::default();

        for raw_line in text.lines() {
            let line = normalize_line(raw_line);
            if line.len() < MIN_CONTENTS_LINE_LEN {
                continue;
            }

            let Some(captures) = self.line_regex.captures(&line) else {
                continue;
            };

            let title = captures
                .name("title")
                .map(|value| normalize_line(value.as_str().trim_end_matches(['.', '·'])))
                .unwrap_or_default();
            let page = captures
                .name("page")
                .and_then(|value| value.as_str().parse::<i64>().ok());

            let Some(page) = page else {
                parsed.rejected_lines += 1;
                continue;
            };

            if title.is_empty() || title.chars().all(|ch| ch.is_ascii_digit()) {
                parsed.rejected_lines += 1;
                continue;
            }

            parsed.entries.push(SectionEntry {
                level: 1,
                title,
                page,
            });
        }

        parsed
    }

    /// Run the line parser over the first `max_candidate_pages` detected
    /// contents pages, accumulating in document order. The page bound keeps
    /// long keyword-match runs from going quadratic.
    pub fn parse_candidate_pages(
        &self,
        snapshot: &DocumentSnapshot,
        contents_pages: &[usize],
        max_candidate_pages: usize,
    ) -> ContentsLines {
        let mut combined = ContentsLines::default();

        for &page in contents_pages.iter().take(max_candidate_pages) {
            let parsed = self.parse_contents_lines(snapshot.page_text(page));
            combined.entries.extend(parsed.entries);
            combined.rejected_lines += parsed.rejected_lines;
        }

        combined
    }
}
