mod contents;
mod headings;
mod numbering;
mod outline;
mod ranges;

pub use contents::{ContentsLines, ContentsMatcher};
pub use headings::detect_heading_candidates;
pub use numbering::summarize_section_numbering;
pub use outline::{level_one_entries, load_outline_entries};
pub use ranges::{StructureSource, ranges_by_title, resolve_ranges};
