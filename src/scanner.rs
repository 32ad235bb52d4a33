// ==============================================================================
// scanner.rs - SNP Site Detection
// ==============================================================================
// Description: Per-column base tally over an alignment, flagging polymorphic
//              positions that pass a minor allele frequency threshold
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use tracing::{debug, info, warn};

use crate::models::{BaseCounts, LengthMismatch, SequenceSet, VariantSite, GAP};

/// Scan parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    /// Minimum minor allele frequency for a site to be reported
    pub min_frequency: f64,

    /// Drop gap characters before tallying a column
    pub ignore_gaps: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_frequency: 0.0,
            ignore_gaps: true,
        }
    }
}

impl ScanOptions {
    pub fn new(min_frequency: f64, ignore_gaps: bool) -> Self {
        Self {
            min_frequency,
            ignore_gaps,
        }
    }
}

/// Result of scanning one alignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Variant sites in ascending position order
    pub sites: Vec<VariantSite>,

    /// Set when sequence lengths differ
    pub length_mismatch: Option<LengthMismatch>,

    /// Number of columns examined (longest sequence length)
    pub scanned_positions: usize,
}

/// Column-wise SNP scanner
#[derive(Debug, Clone, Default)]
pub struct SnpScanner {
    options: ScanOptions,
}

impl SnpScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan every alignment column for SNP sites
    ///
    /// # Algorithm
    /// 1. Scan length is the longest sequence; unequal lengths raise an
    ///    advisory but the scan continues
    /// 2. Each column collects the base of every record long enough to reach
    ///    it, minus gaps when `ignore_gaps` is set
    /// 3. Columns with fewer than two observations or a single distinct base
    ///    are skipped
    /// 4. MAF = second-highest count / observations; the site is kept when
    ///    MAF >= `min_frequency`
    pub fn scan(&self, sequences: &SequenceSet) -> ScanOutcome {
        let Some((shortest, longest)) = sequences.length_range() else {
            debug!("Empty sequence set, nothing to scan");
            return ScanOutcome::default();
        };

        let length_mismatch = if shortest != longest {
            warn!(
                "Sequence lengths differ ({} - {}); the input may not be aligned. \
                 Scanning {} positions",
                shortest, longest, longest
            );
            Some(LengthMismatch { shortest, longest })
        } else {
            None
        };

        let sites: Vec<VariantSite> = (0..longest)
            .filter_map(|pos| self.classify_column(sequences, pos))
            .collect();

        info!(
            "Scanned {} positions across {} sequences: {} SNP sites",
            longest,
            sequences.len(),
            sites.len()
        );

        ScanOutcome {
            sites,
            length_mismatch,
            scanned_positions: longest,
        }
    }

    /// Classify a single 0-based column
    fn classify_column(&self, sequences: &SequenceSet, pos: usize) -> Option<VariantSite> {
        let observed = sequences
            .iter()
            .filter_map(|(_, seq)| seq.get(pos).copied())
            .filter(|&base| !(self.options.ignore_gaps && base == GAP));
        let base_counts = BaseCounts::tally(observed);

        if base_counts.total() < 2 || base_counts.distinct() < 2 {
            return None;
        }

        let minor_allele_freq = base_counts.minor_allele_frequency();
        if minor_allele_freq < self.options.min_frequency {
            return None;
        }

        let record_bases = sequences
            .iter()
            .map(|(id, seq)| (id.to_string(), seq.get(pos).copied().unwrap_or(GAP)))
            .collect();

        Some(VariantSite {
            position: pos + 1,
            base_counts,
            record_bases,
            minor_allele_freq,
        })
    }
}

/// Scan with the given options and return only the sites
pub fn find_snps(sequences: &SequenceSet, options: ScanOptions) -> Vec<VariantSite> {
    SnpScanner::new(options).scan(sequences).sites
}
