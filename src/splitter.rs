use tracing::{info, warn};

use crate::error::SplitError;
use crate::page_range::PageRange;
use crate::pdf::PdfDocument;

/// Suffix appended after the page numbers in output filenames
pub const DEFAULT_SUFFIX: &str = "페이지";

/// One generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub range: PageRange,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Outputs and per-range failures, each in the order the ranges were given
#[derive(Debug, Default)]
pub struct SplitReport {
    pub outputs: Vec<SplitOutput>,
    pub failures: Vec<SplitError>,
}

impl SplitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// `{base_name}_{start}-{end}{suffix}.pdf`
pub fn output_filename(base_name: &str, range: PageRange, suffix: &str) -> String {
    format!("{}_{}-{}{}.pdf", base_name, range.start, range.end, suffix)
}

/// Split with the default filename suffix
pub fn split(doc: &PdfDocument, ranges: &[PageRange], base_name: &str) -> SplitReport {
    split_with_suffix(doc, ranges, base_name, DEFAULT_SUFFIX)
}

/// Produce one document per range. A range that fails is recorded and the
/// remaining ranges still run.
pub fn split_with_suffix(
    doc: &PdfDocument,
    ranges: &[PageRange],
    base_name: &str,
    suffix: &str,
) -> SplitReport {
    let mut report = SplitReport::default();

    for &range in ranges {
        match split_one(doc, range) {
            Ok(bytes) => {
                let filename = output_filename(base_name, range, suffix);
                info!(%range, %filename, size = bytes.len(), "split pages");
                report.outputs.push(SplitOutput {
                    range,
                    filename,
                    bytes,
                });
            }
            Err(e) => {
                warn!(%range, error = %format!("{:#}", e), "failed to split pages");
                report.failures.push(SplitError::SplitFailure {
                    range,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    report
}

fn split_one(doc: &PdfDocument, range: PageRange) -> anyhow::Result<Vec<u8>> {
    let mut new_doc = doc.extract_range(range)?;
    PdfDocument::to_bytes(&mut new_doc)
}
