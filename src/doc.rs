use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// One positioned text span as extracted from a page.
///
/// `bbox` is `[x0, y0, x1, y1]` in the document's native units; `size` is the
/// font size in the same units; `color` is a packed 0xRRGGBB value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub text: String,
    #[serde(default)]
    pub bbox: [f64; 4],
    pub size: f64,
    #[serde(default)]
    pub color: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

/// One outline (bookmark) item as supplied by the document's own metadata.
/// Pages are 1-based; out-of-range targets are tolerated here and clamped
/// later by the range resolver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineItem {
    pub level: i64,
    pub title: String,
    pub page: i64,
}

/// Frozen per-document input: page texts, page spans, and the optional
/// outline, produced by an external extraction tool as camelCase JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub source: Option<String>,
    pub page_count: usize,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub outline: Vec<OutlineItem>,
    #[serde(default)]
    pub pages: Vec<PageContent>,
}

impl DocumentSnapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: DocumentSnapshot = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

        if snapshot.page_count == 0 && snapshot.pages.is_empty() {
            bail!("snapshot {} contains no pages", path.display());
        }

        Ok(snapshot)
    }

    /// Number of pages actually usable for scanning: the declared page count
    /// and the materialized page list may disagree, the smaller wins.
    pub fn usable_pages(&self) -> usize {
        self.page_count.min(self.pages.len())
    }

    /// Scan ceiling for a caller-supplied window; `0` means unbounded.
    pub fn scan_limit(&self, window: usize) -> usize {
        if window == 0 {
            self.usable_pages()
        } else {
            window.min(self.usable_pages())
        }
    }

    /// Text of a 1-based page, empty for pages outside the snapshot.
    pub fn page_text(&self, page: usize) -> &str {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(|content| content.text.as_str())
            .unwrap_or_default()
    }
}
