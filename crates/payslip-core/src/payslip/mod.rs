//! Payslip line-item extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, PayslipParser};

use crate::pdf::PdfPage;

/// Trait for payslip transaction extractors.
pub trait PayslipExtractor {
    /// Extract transactions from text lines in document order.
    fn extract_lines<'a, I>(&self, lines: I) -> ExtractionResult
    where
        I: IntoIterator<Item = &'a str>;

    /// Extract transactions from extracted PDF pages.
    fn extract_pages(&self, pages: &[PdfPage]) -> ExtractionResult {
        self.extract_lines(pages.iter().flat_map(|p| p.lines.iter().map(String::as_str)))
    }

    /// Extract transactions from a text blob, pages separated by form feeds.
    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.extract_lines(text.split('\x0c').flat_map(str::lines))
    }
}
