use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "docstruct",
    version,
    about = "Document structure inference and section-range tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer section structure from a document snapshot and write manifests.
    Analyze(AnalyzeArgs),
    /// Export per-section text files from a previously analyzed snapshot.
    Sections(SectionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Document snapshot JSON (page texts, spans, optional outline).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Destination for the structure manifest JSON.
    #[arg(long)]
    pub out_json: PathBuf,

    /// Optional human-readable Markdown summary.
    #[arg(long)]
    pub out_md: Option<PathBuf>,

    /// Page window scanned for contents-page keywords.
    #[arg(long, default_value_t = 40)]
    pub search_max_pages: usize,

    /// Page ceiling for heading and numbering sampling.
    #[arg(long, default_value_t = 60)]
    pub sample_pages: usize,

    /// How many detected contents pages are actually line-parsed.
    #[arg(long, default_value_t = 3)]
    pub max_contents_pages: usize,

    /// Page-count cap for range resolution; 0 means the full document.
    #[arg(long, default_value_t = 0)]
    pub max_pages: usize,
}

#[derive(Args, Debug, Clone)]
pub struct SectionsArgs {
    /// Document snapshot JSON (page texts, spans, optional outline).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Structure manifest written by `analyze`.
    #[arg(long)]
    pub structure: PathBuf,

    /// Output directory for per-section text files and manifest.json.
    #[arg(long, default_value = "sections")]
    pub out: PathBuf,

    /// Page-count cap for extraction; 0 means the full document.
    #[arg(long, default_value_t = 0)]
    pub max_pages: usize,
}
