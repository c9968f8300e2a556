//! Delivery of split outputs.
//!
//! The splitter only produces named byte buffers; where they end up is up to
//! the sink the caller hands in.

use anyhow::{Context, Result};
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::splitter::SplitOutput;

pub trait OutputSink {
    fn write(&mut self, output: &SplitOutput) -> Result<()>;
}

/// Writes each output as a file in a directory, creating it on first use
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DirSink {
            dir: dir.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OutputSink for DirSink {
    fn write(&mut self, output: &SplitOutput) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.dir.join(&output.filename);
        std::fs::write(&path, &output.bytes)
            .with_context(|| format!("Failed to write PDF: {}", path.display()))?;
        info!(path = %path.display(), "wrote split PDF");

        self.written.push(path);
        Ok(())
    }
}

/// Collects outputs as inline `data:` download links
#[derive(Default)]
pub struct HtmlLinkSink {
    links: Vec<String>,
}

impl HtmlLinkSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Standalone HTML page listing every collected link
    pub fn render(&self, title: &str) -> String {
        let title = escape_html(title);
        let links: String = self
            .links
            .iter()
            .map(|link| format!("<p>{}</p>\n", link))
            .collect();
        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body>\n<h1>{title}</h1>\n{links}</body>\n</html>\n"
        )
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, title: &str) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render(title))
            .with_context(|| format!("Failed to write HTML: {}", path.display()))
    }
}

impl OutputSink for HtmlLinkSink {
    fn write(&mut self, output: &SplitOutput) -> Result<()> {
        self.links.push(download_link(output));
        Ok(())
    }
}

/// Anchor that downloads `output` under its own filename
pub fn download_link(output: &SplitOutput) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(&output.bytes);
    let name = escape_html(&output.filename);
    format!(
        "<a href=\"data:application/octet-stream;base64,{}\" download=\"{}\" \
         style=\"display:inline-block; padding:10px 20px; background-color:#4CAF50; \
         color:white; text-decoration:none; border-radius:5px;\">{}</a>",
        b64, name, name
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
