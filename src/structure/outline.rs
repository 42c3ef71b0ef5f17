use crate::doc::OutlineItem;
use crate::model::SectionEntry;
use crate::text::normalize_line;

/// Convert the document's own bookmark list into ordered section entries.
///
/// This is the authoritative structure source when it yields anything.
/// Titles are normalized; entries whose normalized title is empty are
/// dropped. Page targets are passed through untouched, including
/// out-of-range ones, which the range resolver clamps later. An empty
/// result simply means "no authoritative outline".
pub fn load_outline_entries(outline: &[OutlineItem]) -> Vec<SectionEntry> {
    let mut entries = Vec::with_capacity(outline.len());

    for item in outline {
        let title = normalize_line(&item.title);
        if title.is_empty() {
            continue;
        }

        entries.push(SectionEntry {
            level: item.level.max(1),
            title,
            page: item.page,
        });
    }

    entries
}

/// Level-1 entries in original order, the granularity ranges are resolved at.
pub fn level_one_entries(entries: &[SectionEntry]) -> Vec<SectionEntry> {
    entries
        .iter()
        .filter(|entry| entry.level == 1)
        .cloned()
        .collect()
}
