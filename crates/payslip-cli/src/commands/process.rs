//! Process command - convert a single payslip.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use payslip_core::PayslipExtractor;

use super::config::load_config;
use super::{ParseOptions, read_pages};
use crate::output::{OutputFormat, format_records};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input payslip (PDF or pre-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file, '-' for stdout (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config, else ynab)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    parse: ParseOptions,

    /// Print deduction and addition totals to stderr
    #[arg(long)]
    show_totals: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pages = read_pages(&args.input)?;
    let parser = args.parse.parser(&config);
    let result = parser.extract_pages(&pages);

    let format = OutputFormat::resolve(args.format, &config.output);
    let output = format_records(&result.records, format)?;

    match &args.output {
        Some(path) if path.as_os_str() != "-" => {
            fs::write(path, &output)?;
            eprintln!(
                "{} {} transactions written to {}",
                style("✓").green(),
                result.records.len(),
                path.display()
            );
        }
        _ => print!("{}", output),
    }

    if args.show_totals {
        eprintln!(
            "{} Deductions: {:.2}  Additions: {:.2}  ({} lines, {} skipped)",
            style("ℹ").blue(),
            result.totals.deductions,
            result.totals.additions,
            result.lines_scanned,
            result.lines_skipped
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
