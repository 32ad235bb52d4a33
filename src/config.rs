// ==============================================================================
// config.rs - Run Configuration
// ==============================================================================
// Description: JSON run configuration for repeatable SNP detection runs
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Example:
//   {
//     "fasta_file": "HV1/combined.fasta",
//     "output_report": "HV1_snp_report.txt",
//     "output_csv": "HV1_snp_matrix.csv",
//     "min_frequency": 0.0
//   }
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::processor::ScanJob;
use crate::scanner::ScanOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("min_frequency must be between 0 and 1, got {0}")]
    InvalidFrequency(f64),
}

/// Parameters of one SNP detection run
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub fasta_file: PathBuf,

    #[serde(default)]
    pub output_report: Option<PathBuf>,

    #[serde(default)]
    pub output_csv: Option<PathBuf>,

    #[serde(default)]
    pub output_json: Option<PathBuf>,

    #[serde(default)]
    pub min_frequency: f64,

    /// Count gaps as alleles
    #[serde(default)]
    pub include_gaps: bool,

    /// Reject sequence data before the first FASTA header
    #[serde(default)]
    pub strict: bool,
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_relative(base_dir))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_frequency(self.min_frequency)
    }

    fn resolve_relative(mut self, base_dir: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base_dir.join(&*p);
            }
        };
        resolve(&mut self.fasta_file);
        for path in [
            &mut self.output_report,
            &mut self.output_csv,
            &mut self.output_json,
        ]
        .into_iter()
        .flatten()
        {
            resolve(path);
        }
        self
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.min_frequency, !self.include_gaps)
    }

    pub fn to_job(&self) -> ScanJob {
        ScanJob {
            input: self.fasta_file.clone(),
            options: self.scan_options(),
            strict: self.strict,
            report_path: self.output_report.clone(),
            csv_path: self.output_csv.clone(),
            json_path: self.output_json.clone(),
        }
    }
}

/// Minimum minor allele frequency must be a finite value in [0, 1]
pub fn validate_frequency(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFrequency(value))
    }
}
