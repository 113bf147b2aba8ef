//! Core library for payslip line-item extraction.
//!
//! This crate provides:
//! - PDF text extraction into pages of lines
//! - Money-token parsing and keyword-based category classification
//! - Line segmentation with a keyword recovery pass
//! - Payslip aggregation into budget transactions with gross-pay offsets

pub mod error;
pub mod models;
pub mod pdf;
pub mod payslip;

pub use error::{ConfigError, PayslipError, PdfError, Result};
pub use models::config::PayslipConfig;
pub use models::transaction::{PayslipTotals, TransactionRecord};
pub use payslip::rules::categories::CategoryMap;
pub use payslip::{ExtractionResult, PayslipExtractor, PayslipParser};
pub use pdf::{PdfExtractor, PdfPage, PdfProcessor};
