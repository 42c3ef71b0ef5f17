use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SectionsArgs;
use crate::doc::DocumentSnapshot;
use crate::model::{SectionExportEntry, SectionExportManifest, StructureManifest};
use crate::structure::{ContentsMatcher, level_one_entries, resolve_ranges};
use crate::text::slugify;
use crate::util::{now_utc_string, write_json_pretty, write_text_file};

const MANIFEST_VERSION: u32 = 1;

/// Front-matter listing pages that never get their own export file.
const SKIPPED_LIST_TITLES: &[&str] = &["table of contents", "list of tables", "list of figures"];

struct SectionExport {
    entry: SectionExportEntry,
    body: String,
}

pub fn run(args: SectionsArgs) -> Result<()> {
    let snapshot = DocumentSnapshot::load(&args.snapshot)?;
    let structure = load_structure_manifest(&args.structure)?;

    info!(
        snapshot = %args.snapshot.display(),
        structure = %args.structure.display(),
        structure_source = %structure.structure_source,
        "exporting per-section text"
    );

    let page_cap = if args.max_pages > 0 {
        snapshot.page_count.min(args.max_pages)
    } else {
        snapshot.page_count
    };

    let exports = build_exports(&snapshot, &structure, page_cap)?;

    for export in &exports {
        write_text_file(&args.out.join(&export.entry.file), &export.body)?;
    }

    let manifest = SectionExportManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source: args.snapshot.display().to_string(),
        page_count: snapshot.page_count,
        extracted_page_cap: page_cap,
        entries: exports.into_iter().map(|export| export.entry).collect(),
    };

    let manifest_path = args.out.join("manifest.json");
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        path = %manifest_path.display(),
        sections = manifest.entries.len(),
        "wrote section export manifest"
    );

    Ok(())
}

fn load_structure_manifest(path: &Path) -> Result<StructureManifest> {
    let raw =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Build one text export per canonical level-1 section, skipping
/// front-matter listing pages and anything starting past the page cap.
/// Slug collisions between distinct titles get a numeric suffix so every
/// export lands in its own file.
fn build_exports(
    snapshot: &DocumentSnapshot,
    structure: &StructureManifest,
    page_cap: usize,
) -> Result<Vec<SectionExport>> {
    let matcher = ContentsMatcher::new()?;

    let level1 = level_one_entries(structure.canonical_entries());
    let ranges = resolve_ranges(&level1, page_cap, &matcher);

    let mut slug_uses = HashMap::<String, usize>::new();
    let mut exports = Vec::new();

    for range in ranges {
        let lowered = range.entry.title.to_lowercase();
        if SKIPPED_LIST_TITLES.contains(&lowered.as_str()) {
            continue;
        }
        // Skip by nominal page: the resolver clamps out-of-cap entries onto
        // the last page, which would otherwise produce a one-page stub.
        if range.entry.page > page_cap as i64 {
            continue;
        }

        let end_page = range.end_page.min(page_cap as i64);
        let slug = disambiguated_slug(&range.entry.title, &mut slug_uses);
        let file = format!("p{:03}-{}.txt", range.start_page, slug);

        let mut body = format!(
            "{}\nPAGES {}-{}\n\n",
            range.entry.title, range.start_page, end_page
        );
        for page in range.start_page..=end_page {
            let text = snapshot.page_text(page as usize).trim();
            if text.is_empty() {
                continue;
            }
            body.push_str(&format!("\n[PAGE {page}]\n{text}\n"));
        }

        exports.push(SectionExport {
            entry: SectionExportEntry {
                title: range.entry.title.clone(),
                slug,
                start_page: range.start_page,
                end_page,
                file,
            },
            body,
        });
    }

    Ok(exports)
}

fn disambiguated_slug(title: &str, slug_uses: &mut HashMap<String, usize>) -> String {
    let base = slugify(title);
    let uses = slug_uses.entry(base.clone()).or_insert(0);
    *uses += 1;

    if *uses == 1 {
        base
    } else {
        format!("{base}-{uses}")
    }
}
