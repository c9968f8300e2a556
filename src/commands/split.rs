use crate::error::SplitError;
use crate::page_range::{self, RangeSpec};
use crate::pdf::PdfDocument;
use crate::sink::{DirSink, HtmlLinkSink, OutputSink};
use crate::splitter::{self, DEFAULT_SUFFIX};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct SplitOptions {
    /// Text placed between the page numbers and ".pdf"
    pub suffix: String,
    /// Also write an HTML page of download links here
    pub html: Option<PathBuf>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            suffix: DEFAULT_SUFFIX.to_string(),
            html: None,
        }
    }
}

/// Where the page selection came from on the command line
pub enum Selection {
    Text(String),
    Slider(u32, u32),
    Whole,
}

impl Selection {
    /// Resolve against the document. Slider values are bounded here, the way
    /// a slider widget would bound them, before being passed through.
    fn into_spec(self, total_pages: u32) -> Result<RangeSpec> {
        match self {
            Selection::Text(text) => Ok(RangeSpec::Text(text)),
            Selection::Slider(start, end) => {
                if start < 1 || end > total_pages || start > end {
                    anyhow::bail!(
                        "--range {} {} must satisfy 1 <= start <= end <= {}",
                        start,
                        end,
                        total_pages
                    );
                }
                Ok(RangeSpec::Single { start, end })
            }
            Selection::Whole => {
                if total_pages == 0 {
                    anyhow::bail!("Document has no pages");
                }
                Ok(RangeSpec::Single {
                    start: 1,
                    end: total_pages,
                })
            }
        }
    }
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    selection: Selection,
    output_dir: Q,
    options: &SplitOptions,
) -> Result<()> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();
    println!("Total pages: {}", total_pages);

    let spec = selection.into_spec(total_pages)?;
    let parsed = page_range::parse(&spec, total_pages)?;

    for warning in &parsed.warnings {
        println!("Warning: {}", warning);
    }

    if parsed.ranges.is_empty() {
        return Err(SplitError::EmptySelection.into());
    }

    let base_name = doc.base_name();
    let report = splitter::split_with_suffix(&doc, &parsed.ranges, &base_name, &options.suffix);
    drop(doc);

    let mut dir_sink = DirSink::new(&output_dir);
    let mut html_sink = HtmlLinkSink::new();
    let mut failed = report.failures.len();

    for output in &report.outputs {
        if let Err(e) = dir_sink.write(output) {
            warn!(filename = %output.filename, "{:#}", e);
            println!("Error: {:#}", e);
            failed += 1;
            continue;
        }
        println!("Wrote {} ({} page(s))", output.filename, output.range.page_count());

        if options.html.is_some() {
            html_sink.write(output)?;
        }
    }

    for failure in &report.failures {
        println!("Error: {}", failure);
    }

    if let Some(html_path) = &options.html {
        let title = input
            .as_ref()
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Split PDF");
        html_sink.save(html_path, title)?;
        println!(
            "Wrote {} download link(s) to {}",
            html_sink.link_count(),
            html_path.display()
        );
    }

    println!(
        "Split into {} file(s) in {}",
        dir_sink.written().len(),
        output_dir.as_ref().display()
    );

    if failed > 0 {
        anyhow::bail!("{} of {} range(s) failed", failed, parsed.ranges.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixture::create_test_pdf;

    fn write_source(dir: &Path, pages: u32) -> PathBuf {
        let path = dir.join("book.pdf");
        std::fs::write(&path, create_test_pdf(pages)).unwrap();
        path
    }

    #[test]
    fn test_text_selection_writes_files() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 5);
        let out = tmp.path().join("out");

        run(
            &source,
            Selection::Text("1-3,4-5".into()),
            &out,
            &SplitOptions::default(),
        )
        .unwrap();

        assert!(out.join("book_1-3페이지.pdf").exists());
        assert!(out.join("book_4-5페이지.pdf").exists());
    }

    #[test]
    fn test_out_of_bounds_ranges_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 5);
        let out = tmp.path().join("out");

        run(
            &source,
            Selection::Text("1-3,9-10".into()),
            &out,
            &SplitOptions::default(),
        )
        .unwrap();

        assert!(out.join("book_1-3페이지.pdf").exists());
        assert!(!out.join("book_9-10페이지.pdf").exists());
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 2);
        let out = tmp.path().join("out");

        let err = run(
            &source,
            Selection::Text("7-9".into()),
            &out,
            &SplitOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<SplitError>(),
            Some(&SplitError::EmptySelection)
        );
        assert!(!out.exists());
    }

    #[test]
    fn test_format_error_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 2);

        let err = run(
            &source,
            Selection::Text("one-two".into()),
            tmp.path().join("out"),
            &SplitOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SplitError>(),
            Some(SplitError::Format(_))
        ));
    }

    #[test]
    fn test_slider_selection_with_custom_suffix_and_html() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 4);
        let out = tmp.path().join("out");
        let html = tmp.path().join("links.html");

        let options = SplitOptions {
            suffix: "_pages".into(),
            html: Some(html.clone()),
        };
        run(&source, Selection::Slider(2, 3), &out, &options).unwrap();

        assert!(out.join("book_2-3_pages.pdf").exists());
        let page = std::fs::read_to_string(&html).unwrap();
        assert!(page.contains("download=\"book_2-3_pages.pdf\""));
    }

    #[test]
    fn test_slider_out_of_bounds_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 4);

        assert!(run(
            &source,
            Selection::Slider(3, 5),
            tmp.path().join("out"),
            &SplitOptions::default(),
        )
        .is_err());
    }

    #[test]
    fn test_whole_document_default() {
        let tmp = tempfile::tempdir().unwrap();
        let source = write_source(tmp.path(), 3);
        let out = tmp.path().join("out");

        run(&source, Selection::Whole, &out, &SplitOptions::default()).unwrap();

        let bytes = std::fs::read(out.join("book_1-3페이지.pdf")).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }
}
