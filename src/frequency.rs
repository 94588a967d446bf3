//! Relative codon frequencies per amino acid.
//!
//! A `FrequencyTable` holds one row per observed codon, grouped by amino acid
//! and ordered by (amino acid symbol, codon). The table is validated on
//! construction: within each amino acid the frequencies sum to 1 (within
//! `FREQUENCY_TOLERANCE`), and every frequency lies in (0, 1].

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use tracing::info;

use crate::counter::CodonUsage;
use crate::error::{CodonError, CodonResult};
use crate::genetic_code::{Codon, GeneticCode};

/// Allowed deviation of a per-amino-acid frequency sum from 1.0.
pub const FREQUENCY_TOLERANCE: f64 = 1e-6;

/// One codon's usage within its amino acid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRow {
    pub amino_acid: char,
    pub codon: Codon,
    pub count: u64,
    /// `count` divided by the total count of `amino_acid`
    pub frequency: f64,
}

/// Validated, ordered collection of frequency rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    /// Validates `rows` against the Standard code and builds a table.
    ///
    /// Rows may arrive in any order; they are stored in canonical
    /// (amino acid, codon) order.
    pub fn from_rows(rows: Vec<FrequencyRow>) -> CodonResult<Self> {
        Self::from_rows_with_code(rows, GeneticCode::standard())
    }

    /// Validates `rows` against `code` and builds a table.
    pub fn from_rows_with_code(mut rows: Vec<FrequencyRow>, code: &GeneticCode) -> CodonResult<Self> {
        if rows.is_empty() {
            return Err(CodonError::EmptyInput(
                "frequency table has no rows".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(rows.len());
        let mut sums: BTreeMap<char, f64> = BTreeMap::new();

        for row in &rows {
            let encoded = code.translate_codon(row.codon);
            if encoded != row.amino_acid {
                return Err(CodonError::MalformedTable(format!(
                    "codon {} encodes '{}', not '{}'",
                    row.codon, encoded, row.amino_acid
                )));
            }
            if !seen.insert(row.codon) {
                return Err(CodonError::MalformedTable(format!(
                    "codon {} appears more than once",
                    row.codon
                )));
            }
            if !row.frequency.is_finite() || row.frequency <= 0.0 || row.frequency > 1.0 {
                return Err(CodonError::MalformedTable(format!(
                    "frequency {} of codon {} is outside (0, 1]",
                    row.frequency, row.codon
                )));
            }
            *sums.entry(row.amino_acid).or_insert(0.0) += row.frequency;
        }

        for (aa, sum) in &sums {
            if (sum - 1.0).abs() > FREQUENCY_TOLERANCE {
                return Err(CodonError::MalformedTable(format!(
                    "frequencies of amino acid '{}' sum to {}, expected 1",
                    aa, sum
                )));
            }
        }

        rows.sort_by(|a, b| (a.amino_acid, a.codon).cmp(&(b.amino_acid, b.codon)));
        Ok(Self { rows })
    }

    /// All rows in canonical order.
    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    /// Rows of one amino acid (empty if it was never observed).
    pub fn rows_for(&self, amino_acid: char) -> &[FrequencyRow] {
        &self.rows[self.range_of(amino_acid)]
    }

    fn range_of(&self, amino_acid: char) -> Range<usize> {
        let start = self.rows.partition_point(|r| r.amino_acid < amino_acid);
        let end = self.rows.partition_point(|r| r.amino_acid <= amino_acid);
        start..end
    }

    /// Row of a single codon.
    pub fn get(&self, codon: &Codon) -> Option<&FrequencyRow> {
        self.rows.iter().find(|r| r.codon == *codon)
    }

    /// Amino acids present in the table, in table order.
    pub fn amino_acids(&self) -> Vec<char> {
        let mut amino_acids: Vec<char> = self.rows.iter().map(|r| r.amino_acid).collect();
        amino_acids.dedup();
        amino_acids
    }

    /// Returns true if `amino_acid` has at least one row.
    pub fn contains_amino_acid(&self, amino_acid: char) -> bool {
        !self.range_of(amino_acid).is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Converts codon tallies into a frequency table.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyAnalyzer<'a> {
    code: &'a GeneticCode,
}

impl Default for FrequencyAnalyzer<'static> {
    fn default() -> Self {
        Self::new(GeneticCode::standard())
    }
}

impl<'a> FrequencyAnalyzer<'a> {
    pub fn new(code: &'a GeneticCode) -> Self {
        Self { code }
    }

    /// Derives relative frequencies from `usage`.
    ///
    /// Only codons with a nonzero count produce rows; amino acids never
    /// observed are absent rather than present with zero frequency. Fails
    /// with `EmptyInput` when nothing was counted.
    pub fn analyze(&self, usage: &CodonUsage) -> CodonResult<FrequencyTable> {
        if usage.is_empty() {
            return Err(CodonError::EmptyInput(format!(
                "no valid codons found in {} sequence(s)",
                usage.sequences
            )));
        }

        let rows: Vec<FrequencyRow> = usage
            .codon_counts()
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&codon, &count)| {
                let amino_acid = self.code.translate_codon(codon);
                let total = usage.amino_acid_count(amino_acid);
                FrequencyRow {
                    amino_acid,
                    codon,
                    count,
                    frequency: count as f64 / total as f64,
                }
            })
            .collect();

        let table = FrequencyTable::from_rows_with_code(rows, self.code)?;
        info!(
            rows = table.len(),
            amino_acids = table.amino_acids().len(),
            "frequency table derived"
        );
        Ok(table)
    }
}

/// Derives a frequency table from `usage` with the Standard code.
pub fn analyze_codon_counts(usage: &CodonUsage) -> CodonResult<FrequencyTable> {
    FrequencyAnalyzer::default().analyze(usage)
}
