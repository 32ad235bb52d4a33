// ==============================================================================
// combiner.rs - Single-Sequence File Combiner
// ==============================================================================
// Description: Merge a directory of single-sequence files (.seq) into one
//              multi-record FASTA file
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_EXTENSION: &str = "seq";
pub const DEFAULT_OUTPUT: &str = "combined.fasta";

#[derive(Debug, Clone)]
pub struct CombineOptions {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    /// Extension of the single-sequence files, without the leading dot
    pub extension: String,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombineSummary {
    pub output_file: PathBuf,
    /// Record identifiers written, in output order
    pub record_ids: Vec<String>,
}

/// Find files directly inside `dir` with the given extension, sorted by name
pub fn find_sequence_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read directory {:?}", dir))?;
        // Follows symlinks, so linked sequence files are included
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Combine single-sequence files into one FASTA file
///
/// Each file becomes one record: the file stem is the identifier and the
/// trimmed file contents the sequence. Returns `None` without creating the
/// output file when no file matches.
pub fn combine_to_fasta(options: &CombineOptions) -> Result<Option<CombineSummary>> {
    let files = find_sequence_files(&options.input_dir, &options.extension)?;

    if files.is_empty() {
        warn!(
            "No .{} files found in {:?}",
            options.extension, options.input_dir
        );
        return Ok(None);
    }

    info!("Found {} .{} files", files.len(), options.extension);

    let output = File::create(&options.output_file)
        .with_context(|| format!("Failed to create {:?}", options.output_file))?;
    let mut writer = BufWriter::new(output);
    let mut record_ids = Vec::with_capacity(files.len());

    for path in &files {
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Processing {:?}", path);

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?;

        writeln!(writer, ">{}", id)?;
        writeln!(writer, "{}", contents.trim())?;
        record_ids.push(id);
    }

    writer.flush().context("Failed to flush combined FASTA")?;

    info!(
        "Wrote {} sequences to {:?}",
        record_ids.len(),
        options.output_file
    );

    Ok(Some(CombineSummary {
        output_file: options.output_file.clone(),
        record_ids,
    }))
}
