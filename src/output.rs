// ==============================================================================
// output.rs - SNP Matrix Export
// ==============================================================================
// Description: Write SNP sites as a CSV matrix or a JSON document
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{LengthMismatch, SequenceSet, VariantSite, GAP};

/// Header of the first CSV column
pub const POSITION_COLUMN: &str = "Position";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Position x sequence base matrix (spreadsheets, R, pandas)
    Csv,
    /// Full site detail with run metadata (web APIs, scripting)
    Json,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Export the SNP matrix as CSV
///
/// Header: `Position,<id1>,<id2>,...` in record order, then one row per site
/// with the base of each record (gap-filled when absent).
pub fn export_csv(sites: &[VariantSite], sequences: &SequenceSet, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {:?}", path))?;

    let header = std::iter::once(POSITION_COLUMN).chain(sequences.ids().iter().map(String::as_str));
    writer.write_record(header)?;

    for site in sites {
        let mut row = Vec::with_capacity(sequences.len() + 1);
        row.push(site.position.to_string());
        row.extend(
            sequences
                .ids()
                .iter()
                .map(|id| site.base_for(id).unwrap_or(GAP).to_string()),
        );
        writer.write_record(&row)?;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    info!("SNP matrix exported to {:?}", path);
    Ok(())
}

/// One row of an exported SNP matrix
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub position: usize,
    pub bases: Vec<(String, char)>,
}

/// Read a CSV SNP matrix written by [`export_csv`]
pub fn read_csv_matrix(path: &Path) -> Result<Vec<MatrixRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;

    let headers = reader.headers()?.clone();
    match headers.get(0) {
        Some(POSITION_COLUMN) => {}
        other => anyhow::bail!("Expected first column '{}', found {:?}", POSITION_COLUMN, other),
    }
    let ids: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let position_str = record.get(0).unwrap_or_default();
        let position = position_str.parse::<usize>().with_context(|| {
            format!("Invalid position '{}' at row {}", position_str, row_idx + 1)
        })?;

        let bases = ids
            .iter()
            .zip(record.iter().skip(1))
            .map(|(id, cell)| {
                let base = cell.chars().next().unwrap_or(GAP);
                (id.clone(), base)
            })
            .collect();

        rows.push(MatrixRow { position, bases });
    }

    Ok(rows)
}

/// Complete JSON export
#[derive(Debug, Serialize, Deserialize)]
pub struct SnpAnalysisOutput {
    pub metadata: OutputMetadata,
    pub sites: Vec<VariantSiteOutput>,
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub input_file: PathBuf,
    pub generated_at: String,
    pub sequence_count: usize,
    pub site_count: usize,
    pub min_frequency: f64,
    pub include_gaps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_mismatch: Option<LengthMismatch>,
}

/// Variant site for output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSiteOutput {
    pub position: usize,
    pub base_counts: Vec<BaseCountOutput>,
    pub minor_allele_freq: f64,
    pub bases: Vec<RecordBaseOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseCountOutput {
    pub base: char,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordBaseOutput {
    pub id: String,
    pub base: char,
}

impl From<&VariantSite> for VariantSiteOutput {
    fn from(site: &VariantSite) -> Self {
        Self {
            position: site.position,
            base_counts: site
                .base_counts
                .sorted_desc()
                .into_iter()
                .map(|(base, count)| BaseCountOutput { base, count })
                .collect(),
            minor_allele_freq: site.minor_allele_freq,
            bases: site
                .record_bases
                .iter()
                .map(|(id, base)| RecordBaseOutput {
                    id: id.clone(),
                    base: *base,
                })
                .collect(),
        }
    }
}

/// Export sites and run metadata as pretty-printed JSON
pub fn export_json(sites: &[VariantSite], metadata: OutputMetadata, path: &Path) -> Result<()> {
    let output = SnpAnalysisOutput {
        metadata,
        sites: sites.iter().map(VariantSiteOutput::from).collect(),
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &output)
        .context("Failed to serialize SNP sites to JSON")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("SNP sites exported to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{find_snps, ScanOptions};
    use tempfile::tempdir;

    fn set_of(records: &[(&str, &str)]) -> SequenceSet {
        let mut set = SequenceSet::new();
        for (id, seq) in records {
            set.insert(*id, seq.chars());
        }
        set
    }

    fn metadata(sequences: &SequenceSet, sites: &[VariantSite]) -> OutputMetadata {
        OutputMetadata {
            input_file: PathBuf::from("aln.fasta"),
            generated_at: chrono::Utc::now().to_rfc3339(),
            sequence_count: sequences.len(),
            site_count: sites.len(),
            min_frequency: 0.0,
            include_gaps: false,
            length_mismatch: None,
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn test_csv_layout() {
        let set = set_of(&[("A", "ACGT"), ("B", "ACGA")]);
        let sites = find_snps(&set, ScanOptions::default());
        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        export_csv(&sites, &set, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Position,A,B\n4,T,A\n");
    }

    #[test]
    fn test_csv_round_trip() {
        let set = set_of(&[
            ("s1", "ACGTTA-C"),
            ("s2", "ACCTTAGC"),
            ("s3", "TCGTAAGC"),
            ("short", "ACGTT"),
        ]);
        let sites = find_snps(&set, ScanOptions::default());
        assert!(!sites.is_empty());

        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        export_csv(&sites, &set, &path).unwrap();

        let rows = read_csv_matrix(&path).unwrap();
        assert_eq!(rows.len(), sites.len());
        for (row, site) in rows.iter().zip(&sites) {
            assert_eq!(row.position, site.position);
            assert_eq!(row.bases, site.record_bases);
        }
    }

    #[test]
    fn test_csv_overwrites_existing_file() {
        let set = set_of(&[("A", "AC"), ("B", "AG")]);
        let sites = find_snps(&set, ScanOptions::default());
        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.csv");
        std::fs::write(&path, "stale contents that are much longer than the export\n").unwrap();

        export_csv(&sites, &set, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Position,A,B\n2,C,G\n");
    }

    #[test]
    fn test_read_rejects_foreign_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "ID,value\nx,1\n").unwrap();

        assert!(read_csv_matrix(&path).is_err());
    }

    #[test]
    fn test_json_export() {
        let set = set_of(&[("A", "ACGT"), ("B", "ACGA"), ("C", "ACGA")]);
        let sites = find_snps(&set, ScanOptions::default());
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.json");

        export_json(&sites, metadata(&set, &sites), &path).unwrap();

        let parsed: SnpAnalysisOutput =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.metadata.sequence_count, 3);
        assert_eq!(parsed.metadata.site_count, 1);
        assert!(parsed.metadata.length_mismatch.is_none());

        let site = &parsed.sites[0];
        assert_eq!(site.position, 4);
        assert_eq!(site.base_counts[0].base, 'A');
        assert_eq!(site.base_counts[0].count, 2);
        assert_eq!(site.bases.len(), 3);
        assert_eq!(site.bases[0].id, "A");
        assert_eq!(site.bases[0].base, 'T');
    }
}
