use thiserror::Error;

use crate::page_range::PageRange;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Invalid page range format: {0:?} (expected e.g. \"1-3, 4-5\")")]
    Format(String),

    #[error("No page ranges selected")]
    EmptySelection,

    #[error("Failed to split pages {range}: {reason}")]
    SplitFailure { range: PageRange, reason: String },
}
