// ==============================================================================
// models.rs - Sequence and Variant Data Models
// ==============================================================================
// Description: Data structures for aligned sequence sets and SNP sites
// Author: Matt Barham
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Gap symbol used by aligners (MEGA, MUSCLE, Clustal)
pub const GAP: char = '-';

/// Aligned sequences keyed by record identifier
///
/// Record order is held explicitly in `ids` (first-seen order); `sequences`
/// is only a lookup table. Sequences are stored upper-cased, one `char` per
/// alignment column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSet {
    ids: Vec<String>,
    sequences: HashMap<String, Vec<char>>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning `false` if the id already existed.
    ///
    /// A repeated id replaces the stored sequence but keeps its original slot
    /// in the record order.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        sequence: impl IntoIterator<Item = char>,
    ) -> bool {
        let id = id.into();
        match self.sequences.insert(id.clone(), sequence.into_iter().collect()) {
            Some(_) => false,
            None => {
                self.ids.push(id);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Record identifiers in first-seen order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn get(&self, id: &str) -> Option<&[char]> {
        self.sequences.get(id).map(Vec::as_slice)
    }

    /// Iterate `(id, sequence)` pairs in record order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[char])> + '_ {
        self.ids
            .iter()
            .filter_map(move |id| self.get(id).map(|seq| (id.as_str(), seq)))
    }

    /// Shortest and longest sequence length, `None` for an empty set
    pub fn length_range(&self) -> Option<(usize, usize)> {
        let mut lengths = self.iter().map(|(_, seq)| seq.len());
        let first = lengths.next()?;
        Some(lengths.fold((first, first), |(min, max), len| {
            (min.min(len), max.max(len))
        }))
    }
}

/// Base occurrence counts at one alignment column, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseCounts {
    counts: Vec<(char, usize)>,
}

impl BaseCounts {
    pub fn tally(bases: impl IntoIterator<Item = char>) -> Self {
        let mut counts = Self::default();
        for base in bases {
            counts.add(base);
        }
        counts
    }

    pub fn add(&mut self, base: char) {
        match self.counts.iter_mut().find(|(b, _)| *b == base) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((base, 1)),
        }
    }

    pub fn get(&self, base: char) -> usize {
        self.counts
            .iter()
            .find(|(b, _)| *b == base)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Number of distinct bases observed
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of observations
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Counts sorted by descending count; ties keep first-seen order
    pub fn sorted_desc(&self) -> Vec<(char, usize)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Second-highest count (0 when fewer than two distinct bases)
    pub fn minor_count(&self) -> usize {
        self.sorted_desc().get(1).map(|(_, count)| *count).unwrap_or(0)
    }

    /// Minor allele frequency: second-highest count over all observations
    pub fn minor_allele_frequency(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.minor_count() as f64 / total as f64
    }
}

/// A polymorphic alignment column
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSite {
    /// 1-based alignment position
    pub position: usize,

    /// Counts of every observed base (gaps only when gaps are included)
    pub base_counts: BaseCounts,

    /// Base of every record at this position, in record order.
    /// Records shorter than the position carry a gap.
    pub record_bases: Vec<(String, char)>,

    /// Minor allele frequency at this position
    pub minor_allele_freq: f64,
}

impl VariantSite {
    pub fn base_for(&self, id: &str) -> Option<char> {
        self.record_bases
            .iter()
            .find(|(record_id, _)| record_id == id)
            .map(|(_, base)| *base)
    }
}

/// Advisory raised when aligned sequences are not all the same length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthMismatch {
    pub shortest: usize,
    pub longest: usize,
}
