//! CLI subcommands.

pub mod batch;
pub mod categories;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use tracing::{debug, warn};

use payslip_core::models::config::PayslipConfig;
use payslip_core::pdf::{PdfExtractor, PdfPage, PdfProcessor};
use payslip_core::PayslipParser;

/// Parsing options shared by process and batch.
#[derive(Args, Clone, Debug, Default)]
pub struct ParseOptions {
    /// Custom categories JSON file ({"Category": ["keyword", ...]})
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Payee written on every transaction
    #[arg(long)]
    payee: Option<String>,

    /// Transaction date (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl ParseOptions {
    /// Build a parser from the config, with command-line overrides applied.
    pub fn parser(&self, config: &PayslipConfig) -> PayslipParser {
        let mut parser_config = config.parser.clone();
        if let Some(path) = &self.categories {
            parser_config.categories_file = Some(path.clone());
        }

        let mut parser = PayslipParser::from_config(&parser_config);
        if let Some(payee) = &self.payee {
            parser = parser.with_payee(payee.clone());
        }
        if let Some(date) = self.date {
            parser = parser.with_date(date);
        }

        parser
    }
}

/// Whether a file is an input this tool can read.
pub fn is_supported_input(path: &Path) -> bool {
    matches!(input_extension(path).as_str(), "pdf" | "txt")
}

fn input_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read a payslip as pages of text lines.
///
/// PDFs go through text extraction; `.txt` files are taken as already
/// extracted text with form feeds between pages.
pub fn read_pages(path: &Path) -> anyhow::Result<Vec<PdfPage>> {
    let extension = input_extension(path);

    let pages = match extension.as_str() {
        "pdf" => {
            let extractor = PdfExtractor::open(path)?;
            debug!("PDF has {} pages", extractor.page_count());
            extractor.extract_pages()?
        }
        "txt" => {
            let text = fs::read_to_string(path)?;
            text.split('\x0c')
                .zip(1u32..)
                .map(|(page, number)| PdfPage::from_text(number, page))
                .collect()
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    if pages.iter().all(PdfPage::is_empty) {
        warn!("No text could be extracted from {}", path.display());
    }

    Ok(pages)
}
