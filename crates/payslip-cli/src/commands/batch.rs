//! Batch processing command for multiple payslip files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use payslip_core::{ExtractionResult, PayslipExtractor, PayslipParser};

use super::config::load_config;
use super::{ParseOptions, is_supported_input, read_pages};
use crate::output::{OutputFormat, format_records};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    parse: ParseOptions,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_input(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Documents are independent, so each parses on its own blocking worker
    let parser = Arc::new(args.parse.parser(&config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let parser = Arc::clone(&parser);
        let permits = Arc::clone(&permits);

        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let file_start = Instant::now();
            let worker_path = path.clone();
            let result = tokio::task::spawn_blocking(move || process_single_file(&worker_path, &parser)).await?;
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            anyhow::Ok((index, path, result, processing_time_ms))
        });
    }

    let mut slots: Vec<Option<ProcessResult>> = files.iter().map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let (index, path, result, processing_time_ms) = joined??;

        let entry = match result {
            Ok(extraction) => ProcessResult {
                path,
                extraction: Some(extraction),
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    ProcessResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    }
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        };

        slots[index] = Some(entry);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let results: Vec<ProcessResult> = slots.into_iter().flatten().collect();
    let format = OutputFormat::resolve(args.format, &config.output);

    let inputs: Vec<&Path> = results
        .iter()
        .filter(|r| r.extraction.is_some())
        .map(|r| r.path.as_path())
        .collect();
    let mut output_paths = unique_output_paths(&inputs, args.output_dir.as_deref(), format).into_iter();

    for result in &results {
        if let Some(extraction) = &result.extraction {
            let Some(output_path) = output_paths.next() else {
                break;
            };
            fs::write(&output_path, format_records(&extraction.records, format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    let successful = results.iter().filter(|r| r.extraction.is_some()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &PayslipParser) -> anyhow::Result<ExtractionResult> {
    let pages = read_pages(path)?;
    Ok(parser.extract_pages(&pages))
}

fn output_path_for(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let output_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("payslip");
    let file_name = format!("{}.{}", output_name, format.extension());

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Output paths for each input, numbering any that would collide.
fn unique_output_paths(inputs: &[&Path], output_dir: Option<&Path>, format: OutputFormat) -> Vec<PathBuf> {
    let mut taken = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let mut path = output_path_for(input, output_dir, format);
            if taken.contains(&path) {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("payslip")
                    .to_string();
                let renamed = (2..)
                    .map(|n| path.with_file_name(format!("{}-{}.{}", stem, n, format.extension())))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_else(|| path.clone());
                warn!(
                    "Output for {} would overwrite {}; writing {} instead",
                    input.display(),
                    path.display(),
                    renamed.display()
                );
                path = renamed;
            }
            taken.insert(path.clone());
            path
        })
        .collect()
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "transactions",
        "total_deductions",
        "total_additions",
        "lines_skipped",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            wtr.write_record([
                filename,
                "success",
                &extraction.records.len().to_string(),
                &format!("{:.2}", extraction.totals.deductions),
                &format!("{:.2}", extraction.totals.additions),
                &extraction.lines_skipped.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let input = Path::new("/payslips/2025-04.pdf");

        assert_eq!(
            output_path_for(input, None, OutputFormat::Ynab),
            PathBuf::from("/payslips/2025-04.csv")
        );
        assert_eq!(
            output_path_for(input, Some(Path::new("/out")), OutputFormat::Json),
            PathBuf::from("/out/2025-04.json")
        );
    }

    #[test]
    fn test_same_stem_outputs_do_not_collide() {
        let inputs = [
            Path::new("/payslips/a.pdf"),
            Path::new("/payslips/a.txt"),
            Path::new("/archive/a.pdf"),
            Path::new("/payslips/b.pdf"),
        ];

        assert_eq!(
            unique_output_paths(&inputs, Some(Path::new("/out")), OutputFormat::Mint),
            vec![
                PathBuf::from("/out/a.csv"),
                PathBuf::from("/out/a-2.csv"),
                PathBuf::from("/out/a-3.csv"),
                PathBuf::from("/out/b.csv"),
            ]
        );
        assert_eq!(
            unique_output_paths(&inputs, None, OutputFormat::Mint),
            vec![
                PathBuf::from("/payslips/a.csv"),
                PathBuf::from("/payslips/a-2.csv"),
                PathBuf::from("/archive/a.csv"),
                PathBuf::from("/payslips/b.csv"),
            ]
        );
    }
}
