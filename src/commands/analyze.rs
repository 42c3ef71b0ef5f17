use anyhow::Result;
use tracing::{info, warn};

use crate::cli::AnalyzeArgs;
use crate::doc::DocumentSnapshot;
use crate::model::StructureManifest;
use crate::structure::{
    ContentsMatcher, StructureSource, detect_heading_candidates, level_one_entries,
    load_outline_entries, ranges_by_title, resolve_ranges, summarize_section_numbering,
};
use crate::util::{now_utc_string, sha256_file, write_json_pretty, write_text_file};

const MANIFEST_VERSION: u32 = 1;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let snapshot = DocumentSnapshot::load(&args.snapshot)?;
    let source_sha256 = sha256_file(&args.snapshot)?;

    info!(
        path = %args.snapshot.display(),
        pages = snapshot.page_count,
        outline_items = snapshot.outline.len(),
        "loaded document snapshot"
    );

    let manifest = build_manifest(
        &snapshot,
        &args,
        args.snapshot.display().to_string(),
        source_sha256,
    )?;

    for warning in &manifest.warnings {
        warn!(warning = %warning, "degraded analysis state");
    }

    write_json_pretty(&args.out_json, &manifest)?;
    info!(path = %args.out_json.display(), "wrote structure manifest");

    if let Some(out_md) = &args.out_md {
        write_text_file(out_md, &render_markdown_summary(&manifest))?;
        info!(path = %out_md.display(), "wrote markdown summary");
    }

    info!(
        structure_source = %manifest.structure_source,
        sections = manifest.section_ranges.len(),
        heading_candidates = manifest.heading_candidates.len(),
        "analysis completed"
    );

    Ok(())
}

fn build_manifest(
    snapshot: &DocumentSnapshot,
    args: &AnalyzeArgs,
    source: String,
    source_sha256: String,
) -> Result<StructureManifest> {
    let matcher = ContentsMatcher::new()?;

    let outline_entries = load_outline_entries(&snapshot.outline);
    let contents_pages = matcher.find_contents_pages(snapshot, args.search_max_pages);
    let contents_lines =
        matcher.parse_candidate_pages(snapshot, &contents_pages, args.max_contents_pages);
    let heading_candidates = detect_heading_candidates(snapshot, args.sample_pages);
    let section_numbering = summarize_section_numbering(snapshot, args.sample_pages)?;

    let mut warnings = Vec::new();
    if outline_entries.is_empty() {
        warnings.push(
            "no document outline found; contents-line entries are the fallback structure"
                .to_string(),
        );
    }
    if contents_pages.is_empty() {
        warnings.push(format!(
            "no contents page detected within the first {} pages",
            args.search_max_pages
        ));
    }
    if outline_entries.is_empty() && contents_lines.entries.is_empty() {
        warnings.push(
            "no structure found; consumers should degrade to a single undivided section"
                .to_string(),
        );
    }

    let page_count = snapshot.page_count;
    let range_page_count = if args.max_pages > 0 {
        page_count.min(args.max_pages)
    } else {
        page_count
    };

    let source_choice =
        StructureSource::select(outline_entries.clone(), contents_lines.entries.clone());
    let (structure_source, section_ranges) = match &source_choice {
        Some(choice) => {
            let level1 = level_one_entries(choice.entries());
            (
                choice.label().to_string(),
                resolve_ranges(&level1, range_page_count, &matcher),
            )
        }
        None => ("none".to_string(), Vec::new()),
    };

    Ok(StructureManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source,
        source_sha256,
        page_count,
        metadata: snapshot.metadata.clone(),
        structure_source,
        outline_entries,
        contents_pages,
        contents_entries: contents_lines.entries,
        rejected_contents_lines: contents_lines.rejected_lines,
        heading_candidates,
        section_numbering,
        ranges_by_title: ranges_by_title(&section_ranges),
        section_ranges,
        warnings,
    })
}

fn render_markdown_summary(manifest: &StructureManifest) -> String {
    let mut lines = Vec::<String>::new();

    lines.push("# Extracted structure summary".to_string());
    lines.push(String::new());
    lines.push(format!("- Source: {}", manifest.source));
    lines.push(format!("- Pages: {}", manifest.page_count));
    lines.push(format!("- Structure source: {}", manifest.structure_source));
    for (key, value) in &manifest.metadata {
        lines.push(format!("- Metadata {key}: {value}"));
    }

    lines.push("\n## Outline entries\n".to_string());
    if manifest.outline_entries.is_empty() {
        lines.push("- (no document outline found)".to_string());
    } else {
        for entry in manifest.outline_entries.iter().take(120) {
            let indent = "  ".repeat((entry.level.max(1) - 1) as usize);
            lines.push(format!("- {indent}p{}: {}", entry.page, entry.title));
        }
    }

    lines.push("\n## Contents pages detected by text\n".to_string());
    if manifest.contents_pages.is_empty() {
        lines.push("- (no contents page detected in the scan window)".to_string());
    } else {
        let shown = manifest
            .contents_pages
            .iter()
            .take(10)
            .map(|page| page.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        let suffix = if manifest.contents_pages.len() > 10 {
            " ..."
        } else {
            ""
        };
        lines.push(format!("- {shown}{suffix}"));
    }

    lines.push("\n## Contents-line entries parsed from detected pages\n".to_string());
    if manifest.contents_entries.is_empty() {
        lines.push("- (no contents-like lines parsed)".to_string());
    } else {
        for entry in manifest.contents_entries.iter().take(80) {
            lines.push(format!("- p{}: {}", entry.page, entry.title));
        }
    }

    lines.push("\n## Heading candidates (font-size heuristic)\n".to_string());
    if manifest.heading_candidates.is_empty() {
        lines.push("- (no heading candidates found)".to_string());
    } else {
        for candidate in manifest.heading_candidates.iter().take(80) {
            lines.push(format!(
                "- p{} (size {:.1}): {}",
                candidate.page, candidate.size, candidate.text
            ));
        }
    }

    lines.push("\n## Section numbering prefixes\n".to_string());
    if manifest.section_numbering.is_empty() {
        lines.push("- (no section numbering patterns detected)".to_string());
    } else {
        for item in manifest.section_numbering.iter().take(30) {
            lines.push(format!(
                "- {} (x{}): {}",
                item.prefix, item.count, item.example
            ));
        }
    }

    lines.push("\n## Resolved section ranges\n".to_string());
    if manifest.section_ranges.is_empty() {
        lines.push("- (no sections resolved)".to_string());
    } else {
        for range in &manifest.section_ranges {
            lines.push(format!(
                "- pages {}-{}: {}",
                range.start_page, range.end_page, range.entry.title
            ));
        }
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::doc::{OutlineItem, PageContent};

    fn analyze_args() -> AnalyzeArgs {
        AnalyzeArgs {
            snapshot: PathBuf::from("snapshot.json"),
            out_json: PathBuf::from("structure.json"),
            out_md: None,
            search_max_pages: 40,
            sample_pages: 60,
            max_contents_pages: 3,
            max_pages: 0,
        }
    }

    fn page(text: &str) -> PageContent {
        PageContent {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }

    fn outlined_snapshot() -> DocumentSnapshot {
        DocumentSnapshot {
            source: None,
            page_count: 6,
            metadata: BTreeMap::new(),
            outline: vec![
                OutlineItem {
                    level: 1,
                    title: "Executive Summary".to_string(),
                    page: 2,
                },
                OutlineItem {
                    level: 1,
                    title: "Table of Contents".to_string(),
                    page: 2,
                },
                OutlineItem {
                    level: 1,
                    title: "1 Introduction".to_string(),
                    page: 3,
                },
                OutlineItem {
                    level: 2,
                    title: "1.1 Background".to_string(),
                    page: 3,
                },
            ],
            pages: vec![
                page("Cover"),
                page("Table of Contents\n1 Introduction ....... 3"),
                page("1 Introduction\n1.1 Background context"),
                page("2.1 Observations"),
                page("2.1 More observations"),
                page("Closing"),
            ],
        }
    }

    #[test]
    fn outline_is_authoritative_and_heuristics_stay_supplementary() {
        let snapshot = outlined_snapshot();
        let manifest = build_manifest(
            &snapshot,
            &analyze_args(),
            "snapshot.json".to_string(),
            "deadbeef".to_string(),
        )
        .unwrap();

        assert_eq!(manifest.structure_source, "outline");
        assert_eq!(manifest.outline_entries.len(), 4);
        // Contents-line fallback still collected as a cross-check.
        assert_eq!(manifest.contents_pages, vec![2]);
        assert_eq!(manifest.contents_entries.len(), 1);

        // Ranges come from level-1 outline entries only, with the
        // contents-page collision retargeted.
        assert_eq!(manifest.section_ranges.len(), 3);
        assert_eq!(manifest.section_ranges[0].entry.title, "Executive Summary");
        assert_eq!(manifest.section_ranges[0].start_page, 1);
        assert_eq!(manifest.section_ranges[0].end_page, 1);
        assert_eq!(manifest.section_ranges[2].end_page, 6);
        assert_eq!(manifest.ranges_by_title["1 Introduction"].start_page, 3);
    }

    #[test]
    fn missing_outline_falls_back_to_contents_entries() {
        let mut snapshot = outlined_snapshot();
        snapshot.outline.clear();

        let manifest = build_manifest(
            &snapshot,
            &analyze_args(),
            "snapshot.json".to_string(),
            "deadbeef".to_string(),
        )
        .unwrap();

        assert_eq!(manifest.structure_source, "heuristic");
        assert_eq!(manifest.section_ranges.len(), 1);
        assert_eq!(manifest.section_ranges[0].entry.title, "1 Introduction");
        assert_eq!(manifest.section_ranges[0].start_page, 3);
        assert_eq!(manifest.section_ranges[0].end_page, 6);
        assert!(
            manifest
                .warnings
                .iter()
                .any(|warning| warning.contains("no document outline"))
        );
    }

    #[test]
    fn no_structure_at_all_is_a_valid_terminal_state() {
        let snapshot = DocumentSnapshot {
            source: None,
            page_count: 2,
            metadata: BTreeMap::new(),
            outline: Vec::new(),
            pages: vec![page("Body only"), page("More body")],
        };

        let manifest = build_manifest(
            &snapshot,
            &analyze_args(),
            "snapshot.json".to_string(),
            "deadbeef".to_string(),
        )
        .unwrap();

        assert_eq!(manifest.structure_source, "none");
        assert!(manifest.section_ranges.is_empty());
        assert!(manifest.ranges_by_title.is_empty());
        assert!(
            manifest
                .warnings
                .iter()
                .any(|warning| warning.contains("no structure found"))
        );
    }

    #[test]
    fn max_pages_caps_range_resolution() {
        let snapshot = outlined_snapshot();
        let mut args = analyze_args();
        args.max_pages = 4;

        let manifest = build_manifest(
            &snapshot,
            &args,
            "snapshot.json".to_string(),
            "deadbeef".to_string(),
        )
        .unwrap();

        assert_eq!(manifest.section_ranges.last().unwrap().end_page, 4);
        // The declared page count is reported unchanged.
        assert_eq!(manifest.page_count, 6);
    }

    #[test]
    fn markdown_summary_lists_every_section() {
        let snapshot = outlined_snapshot();
        let manifest = build_manifest(
            &snapshot,
            &analyze_args(),
            "snapshot.json".to_string(),
            "deadbeef".to_string(),
        )
        .unwrap();

        let markdown = render_markdown_summary(&manifest);
        assert!(markdown.starts_with("# Extracted structure summary"));
        assert!(markdown.contains("## Outline entries"));
        assert!(markdown.contains("## Resolved section ranges"));
        assert!(markdown.contains("- pages 3-6: 1 Introduction"));
    }
}
