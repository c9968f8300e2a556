use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::page_range::{self, RangeSpec};
use crate::pdf::PdfDocument;
use crate::sink::{DirSink, OutputSink};
use crate::splitter;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Comma-separated page ranges, one output per range (e.g., '1-3, 4-5'). Takes precedence over start/end.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "First page of a single range (1-indexed)")]
    #[serde(default)]
    pub start: Option<u32>,
    #[schemars(description = "Last page of a single range (inclusive)")]
    #[serde(default)]
    pub end: Option<u32>,
    #[schemars(description = "Directory to write the split PDFs into")]
    pub output_dir: String,
    #[schemars(description = "Text between the page numbers and '.pdf' in output names (default: '페이지')")]
    #[serde(default)]
    pub suffix: Option<String>,
}

impl PdfSplitRequest {
    fn range_spec(&self, total_pages: u32) -> Result<RangeSpec, String> {
        if let Some(pages) = &self.pages {
            return Ok(RangeSpec::Text(pages.clone()));
        }

        let start = self.start.unwrap_or(1);
        let end = self.end.unwrap_or(total_pages);
        if start < 1 || end > total_pages || start > end {
            return Err(format!(
                "start {} and end {} must satisfy 1 <= start <= end <= {}",
                start, end, total_pages
            ));
        }
        Ok(RangeSpec::Single { start, end })
    }
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get PDF page count and metadata (title, author, creator, producer, dates)")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                    creation_date: info.creation_date,
                    mod_date: info.mod_date,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Split a PDF into one new PDF per page range. Out-of-range entries are skipped with a warning; a range that fails does not stop the others.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {:#}", e),
        };
        let total_pages = doc.page_count();

        let spec = match req.range_spec(total_pages) {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };
        let parsed = match page_range::parse(&spec, total_pages) {
            Ok(p) => p,
            Err(e) => return format!("Error: {}", e),
        };
        if parsed.ranges.is_empty() {
            let warnings: Vec<String> = parsed.warnings.iter().map(|w| w.to_string()).collect();
            return format!(
                "Error: {}{}",
                crate::error::SplitError::EmptySelection,
                if warnings.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", warnings.join("; "))
                }
            );
        }

        let base_name = doc.base_name();
        let report = match &req.suffix {
            Some(suffix) => splitter::split_with_suffix(&doc, &parsed.ranges, &base_name, suffix),
            None => splitter::split(&doc, &parsed.ranges, &base_name),
        };
        drop(doc);

        let mut sink = DirSink::new(&req.output_dir);
        let mut outputs = Vec::new();
        let mut failures: Vec<String> = report.failures.iter().map(|f| f.to_string()).collect();

        for output in &report.outputs {
            match sink.write(output) {
                Ok(()) => outputs.push(SplitOutputResult {
                    output_path: Path::new(&req.output_dir)
                        .join(&output.filename)
                        .display()
                        .to_string(),
                    filename: output.filename.clone(),
                    start: output.range.start,
                    end: output.range.end,
                    page_count: output.range.page_count(),
                }),
                Err(e) => failures.push(format!("{:#}", e)),
            }
        }
        info!(
            path = %req.path,
            written = outputs.len(),
            failed = failures.len(),
            complete = report.is_complete(),
            "pdf_split finished"
        );

        let result = SplitResult {
            total_pages,
            outputs,
            warnings: parsed.warnings.iter().map(|w| w.to_string()).collect(),
            failures,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitOutputResult {
    pub output_path: String,
    pub filename: String,
    pub start: u32,
    pub end: u32,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitResult {
    pub total_pages: u32,
    pub outputs: Vec<SplitOutputResult>,
    pub warnings: Vec<String>,
    pub failures: Vec<String>,
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_info to get the page count, then pdf_split with \
                 page ranges like '1-3, 4-5' (or a single start/end pair) to write one PDF per \
                 range into an output directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("starting MCP server on stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
