// ==============================================================================
// report.rs - Human-Readable SNP Report
// ==============================================================================
// Description: Plain-text summary and per-sequence tables of SNP sites
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::{SequenceSet, VariantSite, GAP};

const RULE_WIDTH: usize = 80;

/// Widest column for a record identifier in the per-sequence table
const ID_COLUMN_WIDTH: usize = 10;

/// Render the SNP report
///
/// The report has a summary header followed by two tables:
/// position -> base distribution -> MAF, and position -> base of each record.
/// With no sites the tables are replaced by a single message.
pub fn render_report(sites: &[VariantSite], sequences: &SequenceSet) -> String {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy_rule.clone(),
        "SNP Detection Report".to_string(),
        heavy_rule.clone(),
        format!("Sequences: {}", sequences.len()),
        format!("SNP sites: {}", sites.len()),
        heavy_rule.clone(),
        String::new(),
    ];

    if sites.is_empty() {
        lines.push("No SNP sites found".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "{:<8} {:<30} {}",
        "Position", "Base distribution", "Minor allele freq"
    ));
    lines.push("-".repeat(RULE_WIDTH));

    for site in sites {
        lines.push(format!(
            "{:<8} {:<30} {:.3}",
            site.position,
            format_distribution(site),
            site.minor_allele_freq
        ));
    }

    lines.push(String::new());
    lines.push(heavy_rule.clone());
    lines.push("Per-sequence bases at SNP sites".to_string());
    lines.push(heavy_rule);
    lines.push(String::new());

    let header = std::iter::once(format!("{:<8}", "Position"))
        .chain(sequences.ids().iter().map(|id| {
            let short: String = id.chars().take(ID_COLUMN_WIDTH).collect();
            format!("{:>width$}", short, width = ID_COLUMN_WIDTH)
        }))
        .collect::<Vec<_>>()
        .join(" ");
    let header_width = header.chars().count();
    lines.push(header);
    lines.push("-".repeat(header_width));

    for site in sites {
        let row = std::iter::once(format!("{:<8}", site.position))
            .chain(sequences.ids().iter().map(|id| {
                let base = site.base_for(id).unwrap_or(GAP);
                format!("{:>width$}", base, width = ID_COLUMN_WIDTH)
            }))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(row);
    }

    lines.join("\n")
}

/// "A:3, G:1" with the most frequent base first
fn format_distribution(site: &VariantSite) -> String {
    site.base_counts
        .sorted_desc()
        .iter()
        .map(|(base, count)| format!("{}:{}", base, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write a rendered report to disk, replacing any existing file
pub fn write_report(report: &str, path: &Path) -> Result<()> {
    std::fs::write(path, report)
        .with_context(|| format!("Failed to write report to {:?}", path))?;
    info!("Report saved to {:?}", path);
    Ok(())
}
