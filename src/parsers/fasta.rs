// ==============================================================================
// fasta.rs - Aligned FASTA Parser
// ==============================================================================
// Description: Parser for multi-record (optionally gzipped) FASTA alignments
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================
// Format: '>' header line followed by one or more sequence lines
// Example:
//   >sample_01
//   ACGT-ACGT
//   ACGT
//   >sample_02
//   ACGTTACGTACGA
// ==============================================================================

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SequenceSet;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors that can occur during FASTA parsing
#[derive(Error, Debug)]
pub enum FastaParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sequence data before the first '>' header at line {line}")]
    OrphanSequence { line: usize },
}

/// Parser for aligned FASTA files
#[derive(Debug, Clone, Default)]
pub struct FastaParser {
    /// Reject sequence lines that appear before any header.
    /// When false they are dropped with a warning.
    pub strict: bool,
}

impl FastaParser {
    /// Create a lenient parser
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Create a parser that rejects sequence data before the first header
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parse a FASTA file into a `SequenceSet`
    ///
    /// Gzip input is detected from its magic number, not the file extension.
    ///
    /// # Format
    /// - A line starting with '>' opens a record; the rest of the line
    ///   (trimmed) is its identifier
    /// - Following lines are trimmed, upper-cased (Unicode-aware) and concatenated
    /// - Blank lines are skipped
    /// - The sequence alphabet is not validated
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<SequenceSet, FastaParseError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
            debug!("Reading gzip-compressed FASTA: {:?}", path);
            self.parse_reader(BufReader::new(MultiGzDecoder::new(reader)))
        } else {
            self.parse_reader(reader)
        }
    }

    pub fn parse_str(&self, text: &str) -> Result<SequenceSet, FastaParseError> {
        self.parse_reader(text.as_bytes())
    }

    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<SequenceSet, FastaParseError> {
        let mut sequences = SequenceSet::new();
        let mut current: Option<(String, Vec<char>)> = None;
        let mut orphan_lines = 0usize;

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                if let Some((id, seq)) = current.take() {
                    Self::store(&mut sequences, id, seq);
                }
                current = Some((header.trim().to_string(), Vec::new()));
                continue;
            }

            match current.as_mut() {
                Some((_, seq)) => seq.extend(line.chars().flat_map(char::to_uppercase)),
                None if self.strict => {
                    return Err(FastaParseError::OrphanSequence { line: idx + 1 });
                }
                None => orphan_lines += 1,
            }
        }

        if let Some((id, seq)) = current.take() {
            Self::store(&mut sequences, id, seq);
        }

        if orphan_lines > 0 {
            warn!(
                "Dropped {} sequence line(s) found before the first FASTA header",
                orphan_lines
            );
        }

        Ok(sequences)
    }

    fn store(sequences: &mut SequenceSet, id: String, seq: Vec<char>) {
        if !sequences.insert(id.clone(), seq) {
            warn!("Duplicate FASTA identifier '{}', keeping the last sequence", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Create a temporary FASTA file
    fn create_test_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn sequence_of(sequences: &SequenceSet, id: &str) -> String {
        sequences.get(id).unwrap().iter().collect()
    }

    #[test]
    fn test_parse_multiline_records() {
        let contents = "\
>seq1
acgt
ACgt
>seq2
TTTT
GGGG
";
        let file = create_test_file(contents.as_bytes());
        let sequences = FastaParser::new().parse(file.path()).unwrap();

        assert_eq!(sequences.len(), 2);
        assert_eq!(sequence_of(&sequences, "seq1"), "ACGTACGT");
        assert_eq!(sequence_of(&sequences, "seq2"), "TTTTGGGG");
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let contents = ">zulu\nA\n>alpha\nC\n>mike\nG\n";
        let sequences = FastaParser::new().parse_str(contents).unwrap();
        assert_eq!(sequences.ids(), ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_whitespace_and_blank_lines() {
        let contents = "\n>  spaced id  \n  ac-gt  \n\n   \n  nn \n";
        let sequences = FastaParser::new().parse_str(contents).unwrap();

        assert_eq!(sequences.ids(), ["spaced id"]);
        assert_eq!(sequence_of(&sequences, "spaced id"), "AC-GTNN");
    }

    #[test]
    fn test_header_without_sequence() {
        let sequences = FastaParser::new().parse_str(">empty\n>full\nAC\n").unwrap();
        assert_eq!(sequence_of(&sequences, "empty"), "");
        assert_eq!(sequence_of(&sequences, "full"), "AC");
    }

    #[test]
    fn test_orphan_lines_dropped_by_default() {
        let contents = "ACGT\nTTTT\n>seq1\nAAAA\n";
        let sequences = FastaParser::new().parse_str(contents).unwrap();

        assert_eq!(sequences.len(), 1);
        assert_eq!(sequence_of(&sequences, "seq1"), "AAAA");
    }

    #[test]
    fn test_orphan_lines_rejected_in_strict_mode() {
        let contents = "\n\nACGT\n>seq1\nAAAA\n";
        let result = FastaParser::strict().parse_str(contents);

        match result.unwrap_err() {
            FastaParseError::OrphanSequence { line } => assert_eq!(line, 3),
            other => panic!("Expected OrphanSequence error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_identifier_keeps_last_sequence() {
        let contents = ">a\nAAAA\n>b\nCCCC\n>a\nGGGG\n";
        let sequences = FastaParser::new().parse_str(contents).unwrap();

        assert_eq!(sequences.ids(), ["a", "b"]);
        assert_eq!(sequence_of(&sequences, "a"), "GGGG");
    }

    #[test]
    fn test_non_ascii_sequence_characters() {
        let contents = ">a\naé-c\n>b\nAÈ-C\n";
        let sequences = FastaParser::new().parse_str(contents).unwrap();

        assert_eq!(sequences.get("a").unwrap().len(), 4);
        assert_eq!(sequence_of(&sequences, "a"), "AÉ-C");
        assert_eq!(sequence_of(&sequences, "b"), "AÈ-C");
    }

    #[test]
    fn test_empty_input() {
        let sequences = FastaParser::new().parse_str("").unwrap();
        assert!(sequences.is_empty());
    }

    #[test]
    fn test_gzip_input() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">gz1\nacgt\n>gz2\nACGA\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let file = create_test_file(&compressed);
        let sequences = FastaParser::new().parse(file.path()).unwrap();

        assert_eq!(sequences.ids(), ["gz1", "gz2"]);
        assert_eq!(sequence_of(&sequences, "gz1"), "ACGT");
    }

    #[test]
    fn test_missing_file() {
        let result = FastaParser::new().parse("/nonexistent/alignment.fasta");
        assert!(matches!(result, Err(FastaParseError::IoError(_))));
    }
}
