// ==============================================================================
// main.rs - SNP Finder Entry Point
// ==============================================================================
// Description: Command line interface for SNP detection and FASTA combining
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snp_finder::combiner::{self, CombineOptions};
use snp_finder::config::{validate_frequency, RunConfig};
use snp_finder::processor::{ScanJob, ScanSummary, SnpProcessor};
use snp_finder::scanner::ScanOptions;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect SNP sites in an aligned FASTA file
    Scan(ScanArgs),

    /// Combine single-sequence files into one FASTA file
    Combine(CombineArgs),

    /// Run SNP detection from a JSON configuration file
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Aligned FASTA file (plain or gzip)
    fasta_file: PathBuf,

    /// Minimum minor allele frequency
    #[arg(long = "min-freq", default_value_t = 0.0, value_parser = parse_frequency)]
    min_freq: f64,

    /// Count gaps ('-') as alleles (default: ignored)
    #[arg(long)]
    include_gaps: bool,

    /// Also write the report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the SNP matrix as CSV
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Export SNP sites and run metadata as JSON
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Fail on sequence data before the first FASTA header
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Args, Debug)]
struct CombineArgs {
    /// Directory containing the single-sequence files
    #[arg(default_value = ".")]
    input_dir: PathBuf,

    /// Combined FASTA output file
    #[arg(short, long, default_value = combiner::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Extension of the single-sequence files
    #[arg(long, default_value = combiner::DEFAULT_EXTENSION)]
    extension: String,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// JSON run configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Start without asking for confirmation
    #[arg(short, long)]
    yes: bool,
}

impl ScanArgs {
    fn into_job(self) -> ScanJob {
        ScanJob {
            input: self.fasta_file,
            options: ScanOptions::new(self.min_freq, !self.include_gaps),
            strict: self.strict,
            report_path: self.output,
            csv_path: self.export_csv,
            json_path: self.export_json,
        }
    }
}

fn parse_frequency(value: &str) -> Result<f64, String> {
    let freq: f64 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    validate_frequency(freq).map_err(|e| e.to_string())?;
    Ok(freq)
}

/// Parse the command line; `None` when no arguments were given
fn parse_cli<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() <= 1 {
        return None;
    }
    Some(Cli::parse_from(args))
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so the report on stdout stays clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snp_finder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // No arguments: show usage and exit normally
    let Some(cli) = parse_cli(std::env::args_os()) else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match cli.command {
        Command::Scan(args) => run_scan(args.into_job()),
        Command::Combine(args) => run_combine(args),
        Command::Run(args) => run_from_config(args),
    }
}

fn run_scan(job: ScanJob) -> Result<()> {
    // A missing input is logged by the processor and is not a failure exit
    if let Some(summary) = SnpProcessor::new(job).process()?.into_summary() {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ScanSummary) {
    println!("{}", summary.report);
    for (format, path) in &summary.exports {
        info!("{} export written: {:?}", format.extension(), path);
    }
}

fn run_combine(args: CombineArgs) -> Result<()> {
    let options = CombineOptions {
        input_dir: args.input_dir,
        output_file: args.output,
        extension: args.extension,
    };

    match combiner::combine_to_fasta(&options)? {
        Some(summary) => println!(
            "Combined {} sequences into {}",
            summary.record_ids.len(),
            summary.output_file.display()
        ),
        None => println!(
            "No .{} files found in {}",
            options.extension,
            options.input_dir.display()
        ),
    }
    Ok(())
}

fn run_from_config(args: RunArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)?;
    let job = config.to_job();

    println!("{}", "=".repeat(60));
    println!("SNP detection run");
    println!("{}", "=".repeat(60));
    println!("Input file:    {}", job.input.display());
    println!("Report:        {}", display_optional(job.report_path.as_deref()));
    println!("CSV matrix:    {}", display_optional(job.csv_path.as_deref()));
    println!("JSON export:   {}", display_optional(job.json_path.as_deref()));
    println!("Min frequency: {}", job.options.min_frequency);
    println!("{}", "=".repeat(60));

    if !args.yes && !confirm_start(std::io::stdin().lock())? {
        println!("Cancelled");
        return Ok(());
    }

    run_scan(job)
}

fn display_optional(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Ask before starting; 'q' or end of input cancels
fn confirm_start<R: BufRead>(mut input: R) -> Result<bool> {
    print!("Press Enter to start, or 'q' to quit: ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        println!();
        return Ok(false);
    }
    Ok(!answer.trim().eq_ignore_ascii_case("q"))
}
