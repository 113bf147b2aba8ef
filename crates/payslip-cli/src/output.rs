//! Renderers for budgeting-tool import formats.

use payslip_core::TransactionRecord;
use payslip_core::models::config::OutputConfig;
use clap::ValueEnum;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YNAB CSV import (Outflow/Inflow columns)
    Ynab,
    /// Mint CSV import (signed Amount column)
    Mint,
    /// JSON array of transactions
    Json,
}

impl OutputFormat {
    /// Command-line choice, else the configured default, else YNAB.
    pub fn resolve(choice: Option<Self>, config: &OutputConfig) -> Self {
        if let Some(format) = choice {
            return format;
        }

        <Self as ValueEnum>::from_str(&config.default_format, true).unwrap_or_else(|_| {
            warn!(
                "Unknown output format {:?} in config, using ynab",
                config.default_format
            );
            Self::Ynab
        })
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Ynab | Self::Mint => "csv",
            Self::Json => "json",
        }
    }
}

pub fn format_records(records: &[TransactionRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Ynab => format_ynab(records),
        OutputFormat::Mint => format_mint(records),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn format_ynab(records: &[TransactionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["Date", "Payee", "Category", "Memo", "Outflow", "Inflow"])?;

    for record in records {
        let amount = format!("{:.2}", record.amount.abs());
        let (outflow, inflow) = if record.is_deduction() {
            (amount, String::new())
        } else {
            (String::new(), amount)
        };

        wtr.write_record([
            &record.date_string(),
            &record.payee,
            &record.category,
            &record.memo,
            &outflow,
            &inflow,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_mint(records: &[TransactionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["Date", "Payee", "Category", "Memo", "Amount"])?;

    for record in records {
        wtr.write_record([
            &record.date_string(),
            &record.payee,
            &record.category,
            &record.memo,
            &record.amount_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn records() -> Vec<TransactionRecord> {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        vec![
            TransactionRecord::new(date, "Employer", "Insurance:Medical", "Medical, PPO", Decimal::from_str("-45.00").unwrap()),
            TransactionRecord::new(date, "Employer", "Income:Gross Pay Offset", "Offset for itemized paycheck deductions", Decimal::from_str("45").unwrap()),
        ]
    }

    #[test]
    fn test_ynab_splits_outflow_and_inflow() {
        let csv = format_records(&records(), OutputFormat::Ynab).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Payee,Category,Memo,Outflow,Inflow");
        assert_eq!(lines[1], "2025-05-01,Employer,Insurance:Medical,\"Medical, PPO\",45.00,");
        assert_eq!(lines[2], "2025-05-01,Employer,Income:Gross Pay Offset,Offset for itemized paycheck deductions,,45.00");
    }

    #[test]
    fn test_mint_keeps_signed_amount() {
        let csv = format_records(&records(), OutputFormat::Mint).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Date,Payee,Category,Memo,Amount");
        assert_eq!(lines[1], "2025-05-01,Employer,Insurance:Medical,\"Medical, PPO\",-45.00");
        assert_eq!(lines[2], "2025-05-01,Employer,Income:Gross Pay Offset,Offset for itemized paycheck deductions,45.00");
    }

    #[test]
    fn test_json_amounts_are_strings() {
        let json = format_records(&records(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["amount"], "-45.00");
        assert_eq!(value[1]["memo"], "Offset for itemized paycheck deductions");
    }

    #[test]
    fn test_empty_records_write_header_only() {
        let csv = format_records(&[], OutputFormat::Mint).unwrap();
        assert_eq!(csv.trim_end(), "Date,Payee,Category,Memo,Amount");
    }

    #[test]
    fn test_resolve_format() {
        let mut config = OutputConfig::default();
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Ynab);
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Json), &config), OutputFormat::Json);

        config.default_format = "MINT".to_string();
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Mint);

        config.default_format = "quicken".to_string();
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Ynab);
    }
}
