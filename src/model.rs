use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ordered section entry, either from the document outline
/// (authoritative) or from parsed contents-page lines (fallback, always
/// level 1). Immutable once created; titles are already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub level: i64,
    pub title: String,
    pub page: i64,
}

/// A span whose font size is a statistical outlier on its own page.
/// Diagnostic only; never drives range resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub page: i64,
    pub text: String,
    pub size: f64,
}

/// Frequency record for one dotted numeric section prefix (`3.2.1`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingPrefix {
    pub prefix: String,
    pub count: usize,
    pub example: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpan {
    pub start_page: i64,
    pub end_page: i64,
}

/// Inclusive page range attributed to one top-level section entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRange {
    #[serde(flatten)]
    pub entry: SectionEntry,
    pub start_page: i64,
    pub end_page: i64,
}

/// Full output of the `analyze` command: canonical structure, resolved
/// ranges, and the diagnostic payload for operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: String,
    pub source_sha256: String,
    pub page_count: usize,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub structure_source: String,
    pub outline_entries: Vec<SectionEntry>,
    pub contents_pages: Vec<usize>,
    pub contents_entries: Vec<SectionEntry>,
    pub rejected_contents_lines: usize,
    pub heading_candidates: Vec<HeadingCandidate>,
    pub section_numbering: Vec<NumberingPrefix>,
    pub section_ranges: Vec<SectionRange>,
    pub ranges_by_title: BTreeMap<String, PageSpan>,
    pub warnings: Vec<String>,
}

impl StructureManifest {
    /// The ordered entry list ranges were resolved from.
    pub fn canonical_entries(&self) -> &[SectionEntry] {
        if self.outline_entries.is_empty() {
            &self.contents_entries
        } else {
            &self.outline_entries
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionExportEntry {
    pub title: String,
    pub slug: String,
    pub start_page: i64,
    pub end_page: i64,
    pub file: String,
}

/// Manifest written next to per-section text exports by `sections`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionExportManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: String,
    pub page_count: usize,
    pub extracted_page_cap: usize,
    pub entries: Vec<SectionExportEntry>,
}
