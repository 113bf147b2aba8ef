//! Payslip aggregation into budget transactions.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, trace};

use crate::models::config::{ParserConfig, default_skip_markers};
use crate::models::transaction::{PayslipTotals, TransactionRecord};

use super::rules::{CategoryMap, PayslipLine, extract_line_items};
use super::PayslipExtractor;

/// Result of payslip extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Itemized records followed by the gross-pay offsets.
    pub records: Vec<TransactionRecord>,
    /// Deduction and addition totals of the itemized records.
    pub totals: PayslipTotals,
    /// Lines run through the extraction passes.
    pub lines_scanned: usize,
    /// Summary lines skipped.
    pub lines_skipped: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Records excluding the synthetic offsets.
    pub fn itemized(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(|r| !r.is_offset())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keyword-driven payslip parser.
///
/// Holds no per-document state, so one parser can serve many documents.
#[derive(Debug, Clone)]
pub struct PayslipParser {
    categories: CategoryMap,
    payee: String,
    date: NaiveDate,
    skip_markers: Vec<String>,
}

impl PayslipParser {
    /// Create a parser dated today with the default payee and skip markers.
    pub fn new(categories: CategoryMap) -> Self {
        Self {
            categories,
            payee: "Employer".to_string(),
            date: chrono::Local::now().date_naive(),
            skip_markers: default_skip_markers(),
        }
    }

    /// Create a parser from configuration, loading its category file if any.
    pub fn from_config(config: &ParserConfig) -> Self {
        let categories = CategoryMap::load_or_default(config.categories_file.as_deref());

        Self::new(categories)
            .with_payee(config.payee.clone())
            .with_skip_markers(config.skip_markers.clone())
    }

    /// Set the payee written on every record.
    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = payee.into();
        self
    }

    /// Set the processing date written on every record.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Replace the category mapping.
    pub fn with_categories(mut self, categories: CategoryMap) -> Self {
        self.categories = categories;
        self
    }

    /// Set the summary-line markers.
    pub fn with_skip_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_markers = markers
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_summary_line(&self, line: &PayslipLine<'_>) -> bool {
        self.skip_markers.iter().any(|m| line.lower().contains(m.as_str()))
    }
}

impl PayslipExtractor for PayslipParser {
    fn extract_lines<'a, I>(&self, lines: I) -> ExtractionResult
    where
        I: IntoIterator<Item = &'a str>,
    {
        let start = Instant::now();

        info!(
            "Parsing payslip for {} with {} categories",
            self.payee,
            self.categories.len()
        );

        let mut records = Vec::new();
        let mut totals = PayslipTotals::default();
        let mut lines_scanned = 0;
        let mut lines_skipped = 0;

        for text in lines {
            let line = PayslipLine::new(text);

            if self.is_summary_line(&line) {
                trace!("Skipping summary line {:?}", line.text());
                lines_skipped += 1;
                continue;
            }
            lines_scanned += 1;

            for item in extract_line_items(&line, &self.categories) {
                let record = TransactionRecord::new(
                    self.date,
                    self.payee.as_str(),
                    item.category,
                    item.name.trim(),
                    item.amount,
                );
                totals.record(record.amount);
                records.push(record);
            }
        }

        let itemized = records.len();
        records.extend(totals.offsets(self.date, &self.payee));

        debug!(
            "Extracted {} items from {} lines ({} skipped); deductions {}, additions {}",
            itemized, lines_scanned, lines_skipped, totals.deductions, totals.additions
        );

        ExtractionResult {
            records,
            totals,
            lines_scanned,
            lines_skipped,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
