use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::splitter::DEFAULT_SUFFIX;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Split a PDF into one file per page range, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Display page count and PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Split page ranges into separate PDFs
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Page ranges, one output per range (e.g., "1-3, 4-5")
        #[arg(conflicts_with = "range")]
        pages: Option<String>,

        /// A single range given as two page numbers; defaults to the whole document
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        range: Option<Vec<u32>>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Text between the page numbers and the extension in output names
        #[arg(long, default_value = DEFAULT_SUFFIX)]
        suffix: String,

        /// Also write an HTML page with a download link per output
        #[arg(long)]
        html: Option<PathBuf>,
    },
}
