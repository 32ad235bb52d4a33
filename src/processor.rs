// ==============================================================================
// processor.rs - SNP Detection Pipeline
// ==============================================================================
// Description: Load an aligned FASTA file, detect SNP sites, write the report
//              and requested exports
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info};

use crate::models::{LengthMismatch, VariantSite};
use crate::output::{self, ExportFormat, OutputMetadata};
use crate::parsers::FastaParser;
use crate::report;
use crate::scanner::{ScanOptions, SnpScanner};

/// Everything needed for one SNP detection run
#[derive(Debug, Clone, PartialEq)]
pub struct ScanJob {
    pub input: PathBuf,
    pub options: ScanOptions,
    /// Reject sequence data before the first FASTA header
    pub strict: bool,
    pub report_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

impl ScanJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            options: ScanOptions::default(),
            strict: false,
            report_path: None,
            csv_path: None,
            json_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub sequence_count: usize,
    pub sites: Vec<VariantSite>,
    /// Rendered text report
    pub report: String,
    pub length_mismatch: Option<LengthMismatch>,
    /// Export files written during the run
    pub exports: Vec<(ExportFormat, PathBuf)>,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Completed(ScanSummary),
    /// The input file does not exist; nothing was read or written
    InputMissing(PathBuf),
}

impl ProcessOutcome {
    pub fn into_summary(self) -> Option<ScanSummary> {
        match self {
            ProcessOutcome::Completed(summary) => Some(summary),
            ProcessOutcome::InputMissing(_) => None,
        }
    }
}

pub struct SnpProcessor {
    job: ScanJob,
}

impl SnpProcessor {
    pub fn new(job: ScanJob) -> Self {
        Self { job }
    }

    /// Main processing pipeline
    ///
    /// A missing input file is logged and reported as
    /// `ProcessOutcome::InputMissing`, not as an error.
    pub fn process(&self) -> Result<ProcessOutcome> {
        let job = &self.job;

        // 1. Load alignment
        if !job.input.exists() {
            error!("File not found: {:?}", job.input);
            return Ok(ProcessOutcome::InputMissing(job.input.clone()));
        }
        info!("Reading FASTA file: {:?}", job.input);
        let parser = FastaParser { strict: job.strict };
        let sequences = parser
            .parse(&job.input)
            .with_context(|| format!("Failed to parse FASTA file {:?}", job.input))?;
        info!("Loaded {} sequences", sequences.len());

        // 2. Detect SNP sites
        info!(
            "Detecting SNP sites (min frequency {}, gaps {})",
            job.options.min_frequency,
            if job.options.ignore_gaps { "ignored" } else { "included" }
        );
        let outcome = SnpScanner::new(job.options).scan(&sequences);

        // 3. Text report
        let rendered = report::render_report(&outcome.sites, &sequences);
        if let Some(path) = &job.report_path {
            report::write_report(&rendered, path)?;
        }

        // 4. Exports
        let mut exports = Vec::new();

        if let Some(path) = &job.csv_path {
            if outcome.sites.is_empty() {
                info!("No SNP sites, skipping CSV export to {:?}", path);
            } else {
                output::export_csv(&outcome.sites, &sequences, path)?;
                exports.push((ExportFormat::Csv, path.clone()));
            }
        }

        if let Some(path) = &job.json_path {
            let metadata = OutputMetadata {
                input_file: job.input.clone(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                sequence_count: sequences.len(),
                site_count: outcome.sites.len(),
                min_frequency: job.options.min_frequency,
                include_gaps: !job.options.ignore_gaps,
                length_mismatch: outcome.length_mismatch,
            };
            output::export_json(&outcome.sites, metadata, path)?;
            exports.push((ExportFormat::Json, path.clone()));
        }

        info!("Processing complete: {} SNP sites", outcome.sites.len());

        Ok(ProcessOutcome::Completed(ScanSummary {
            sequence_count: sequences.len(),
            sites: outcome.sites,
            report: rendered,
            length_mismatch: outcome.length_mismatch,
            exports,
        }))
    }
}
