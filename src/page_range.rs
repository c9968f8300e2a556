use std::fmt;
use std::num::IntErrorKind;

use tracing::{debug, warn};

use crate::error::SplitError;

/// An inclusive, 1-indexed span of pages.
///
/// Ranges produced by [`parse`] always satisfy `1 <= start <= end <= total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        PageRange { start, end }
    }

    /// Number of pages covered by this range
    pub fn page_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_within(&self, total_pages: u32) -> bool {
        1 <= self.start && self.end <= total_pages && self.start <= self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// How the user selected pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    /// Comma-separated list, e.g. "1-3, 4-5"
    Text(String),
    /// A single pair already bounded by the caller (slider-style input)
    Single { start: u32, end: u32 },
}

/// A range that parsed but fell outside the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeWarning {
    pub start: u64,
    pub end: u64,
    pub total_pages: u32,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_pages == 0 {
            write!(
                f,
                "Invalid page range {}-{}: the document has no pages",
                self.start, self.end
            )
        } else {
            write!(
                f,
                "Invalid page range {}-{}: pages must be within 1-{} and start must not exceed end",
                self.start, self.end, self.total_pages
            )
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRanges {
    pub ranges: Vec<PageRange>,
    pub warnings: Vec<RangeWarning>,
}

/// Page numbers too large for u64 saturate; they are out of bounds either way.
fn parse_page_number(s: &str) -> Option<u64> {
    match s.trim().parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// Parse a single token like "1-5" or " 3 - 4 " into its raw bounds
fn parse_token(token: &str) -> Result<(u64, u64), SplitError> {
    let token = token.trim();
    let mut parts = token.split('-');

    let (start, end) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => (start, end),
        _ => return Err(SplitError::Format(token.to_string())),
    };

    let start = parse_page_number(start).ok_or_else(|| SplitError::Format(token.to_string()))?;
    let end = parse_page_number(end).ok_or_else(|| SplitError::Format(token.to_string()))?;

    Ok((start, end))
}

fn to_page_range(start: u64, end: u64) -> Option<PageRange> {
    Some(PageRange::new(
        u32::try_from(start).ok()?,
        u32::try_from(end).ok()?,
    ))
}

/// Parse a range spec against a document with `total_pages` pages.
///
/// Malformed text fails as a whole. Well-formed ranges outside the document
/// are skipped and reported in `warnings`.
pub fn parse(spec: &RangeSpec, total_pages: u32) -> Result<ParsedRanges, SplitError> {
    match spec {
        RangeSpec::Text(text) => parse_text(text, total_pages),
        RangeSpec::Single { start, end } => Ok(ParsedRanges {
            ranges: vec![PageRange::new(*start, *end)],
            warnings: Vec::new(),
        }),
    }
}

/// Parse a comma-separated list of ranges like "1-3,4-5"
pub fn parse_text(text: &str, total_pages: u32) -> Result<ParsedRanges, SplitError> {
    if text.trim().is_empty() {
        return Ok(ParsedRanges::default());
    }

    let candidates = text
        .split(',')
        .map(parse_token)
        .collect::<Result<Vec<_>, _>>()?;

    let mut parsed = ParsedRanges::default();
    for (start, end) in candidates {
        match to_page_range(start, end) {
            Some(range) if range.is_within(total_pages) => {
                debug!(%range, "accepted page range");
                parsed.ranges.push(range);
            }
            _ => {
                let warning = RangeWarning {
                    start,
                    end,
                    total_pages,
                };
                warn!("{}", warning);
                parsed.warnings.push(warning);
            }
        }
    }

    Ok(parsed)
}
