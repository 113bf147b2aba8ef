//! PDF text extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

/// Text lines from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Non-blank lines in reading order.
    pub lines: Vec<String>,
}

impl PdfPage {
    /// Build a page from raw page text, dropping blank lines.
    pub fn from_text(number: u32, text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self { number, lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Read and load a PDF file.
    pub fn open(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        Ok(extractor)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Payroll portals often encrypt with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_pages(&self) -> Result<Vec<PdfPage>> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let texts = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let pages: Vec<PdfPage> = texts
            .iter()
            .zip(1u32..)
            .map(|(text, number)| PdfPage::from_text(number, text))
            .collect();

        for page in &pages {
            trace!("Page {}: {} lines", page.number, page.lines.len());
        }

        debug!(
            "Extracted {} lines from {} pages",
            pages.iter().map(|p| p.lines.len()).sum::<usize>(),
            pages.len()
        );

        Ok(pages)
    }
}
