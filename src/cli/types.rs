use clap::Parser;
use std::path::PathBuf;

/// Main CLI parser structure
#[derive(Parser)]
#[command(name = "pagenav")]
#[command(about = "In-page navigation post-processor for HTML documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input HTML file
    pub input: PathBuf,

    /// Write the transformed document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Inject heading anchors
    #[arg(long, default_value_t = false)]
    pub anchors: bool,

    /// Anchor glyph
    #[arg(long, value_name = "GLYPH", default_value = "#")]
    pub icon: String,

    /// Place anchors before the heading content
    #[arg(long, default_value_t = false)]
    pub before: bool,

    /// Build a table of contents into the element carrying a data-toc attribute
    #[arg(long, default_value_t = false)]
    pub toc: bool,

    /// Nest the table of contents by heading hierarchy
    #[arg(short, long, default_value_t = false)]
    pub nested: bool,

    /// Heading ranks to include (e.g. "h2 h3")
    #[arg(short, long, value_name = "RANKS")]
    pub ranks: Option<String>,

    /// Table of contents caption text
    #[arg(short, long, value_name = "TEXT")]
    pub caption: Option<String>,

    /// Enable verbose debugging
    #[arg(short = 'g', long, default_value_t = false)]
    pub debug: bool,
}
