use std::collections::BTreeMap;

use crate::model::{PageSpan, SectionEntry, SectionRange};

use super::contents::ContentsMatcher;

/// Where the canonical ordered entry list came from. The range resolver's
/// contract is identical for both variants; outline and fallback entries
/// are never mixed into one list.
#[derive(Debug, Clone)]
pub enum StructureSource {
    Authoritative(Vec<SectionEntry>),
    Heuristic(Vec<SectionEntry>),
}

impl StructureSource {
    /// Pick the canonical source: the outline when it yields entries,
    /// otherwise the heuristic fallback. `None` is the valid terminal
    /// "no structure found" state, with downstream consumers expected to
    /// degrade to a single undivided section.
    pub fn select(
        outline_entries: Vec<SectionEntry>,
        fallback_entries: Vec<SectionEntry>,
    ) -> Option<Self> {
        if !outline_entries.is_empty() {
            Some(Self::Authoritative(outline_entries))
        } else if !fallback_entries.is_empty() {
            Some(Self::Heuristic(fallback_entries))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[SectionEntry] {
        match self {
            Self::Authoritative(entries) | Self::Heuristic(entries) => entries,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Authoritative(_) => "outline",
            Self::Heuristic(_) => "heuristic",
        }
    }
}

/// Resolve ordered top-level entries into gap-free inclusive page ranges.
///
/// For entry `i`: `start = entry.page`, `end = max(entry.page, next_start - 1)`
/// where `next_start` is the following entry's page, or `page_count + 1` for
/// the last entry. Adjacent entries sharing a nominal page collapse the
/// earlier one to a single page; inverted orderings resolve the same way.
/// Both bounds are finally clamped to `[1, page_count]` with `start <= end`
/// kept by flooring `end` at `start`. Entries pointing past the document
/// clamp to the last page. An empty entry list yields an empty result.
///
/// Disambiguation: when the entry after `i` carries a recognized contents
/// title whose page is not page 1, and entry `i`'s nominal page lands on or
/// after that contents page, entry `i` is retargeted to the single page just
/// before the contents listing. Outline bookmarks sometimes point a
/// front-matter section at the same physical page as the contents listing,
/// and the plain adjacency math would make that section swallow the
/// contents page as its own content.
pub fn resolve_ranges(
    entries: &[SectionEntry],
    page_count: usize,
    matcher: &ContentsMatcher,
) -> Vec<SectionRange> {
    let last_page = page_count.max(1) as i64;
    let mut ranges = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let next_start = entries
            .get(index + 1)
            .map(|next| next.page)
            .unwrap_or(last_page + 1);

        let (start_page, end_page) = match contents_collision(entry, entries.get(index + 1), matcher)
        {
            Some(before_contents) => (before_contents, before_contents),
            None => (entry.page, entry.page.max(next_start - 1)),
        };

        let start_page = start_page.clamp(1, last_page);
        let end_page = end_page.clamp(1, last_page).max(start_page);

        ranges.push(SectionRange {
            entry: entry.clone(),
            start_page,
            end_page,
        });
    }

    ranges
}

/// The page just before the contents listing, when `entry` collides with a
/// contents-titled successor.
fn contents_collision(
    entry: &SectionEntry,
    next: Option<&SectionEntry>,
    matcher: &ContentsMatcher,
) -> Option<i64> {
    let next = next?;
    if !matcher.is_contents_title(&next.title) || matcher.is_contents_title(&entry.title) {
        return None;
    }
    if next.page <= 1 || entry.page < next.page {
        return None;
    }

    Some(next.page - 1)
}

/// Ranges keyed by entry title, the lookup shape downstream consumers use.
/// The first occurrence wins when titles repeat.
pub fn ranges_by_title(ranges: &[SectionRange]) -> BTreeMap<String, PageSpan> {
    let mut map = BTreeMap::new();

    for range in ranges {
        map.entry(range.entry.title.clone()).or_insert(PageSpan {
            start_page: range.start_page,
            end_page: range.end_page,
        });
    }

    map
}
