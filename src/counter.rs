//! Codon and amino acid counting over raw nucleotide sequences.
//!
//! Each sequence is read in frame +1: consecutive, non-overlapping codons
//! starting at offset 0. Trailing bases that do not complete a codon are
//! dropped. Codons containing anything other than A, C, G, T (after case
//! normalization, with `U` read as `T`) are skipped without failing the pass.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::genetic_code::{Codon, GeneticCode};

/// Codon and amino acid tallies gathered from one input source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodonUsage {
    codons: BTreeMap<Codon, u64>,
    amino_acids: BTreeMap<char, u64>,
    /// Number of sequences scanned
    pub sequences: usize,
    /// Codons skipped because they contained non-ACGT symbols
    pub skipped_codons: u64,
    /// Bases dropped at sequence ends (incomplete final codon)
    pub truncated_bases: u64,
}

impl CodonUsage {
    /// Creates empty tallies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrence count per observed codon.
    pub fn codon_counts(&self) -> &BTreeMap<Codon, u64> {
        &self.codons
    }

    /// Occurrence count per amino acid, derived from the codon counts.
    pub fn amino_acid_counts(&self) -> &BTreeMap<char, u64> {
        &self.amino_acids
    }

    /// Count for a single codon (0 if never observed).
    pub fn codon_count(&self, codon: &Codon) -> u64 {
        self.codons.get(codon).copied().unwrap_or(0)
    }

    /// Count for a single amino acid (0 if never observed).
    pub fn amino_acid_count(&self, amino_acid: char) -> u64 {
        self.amino_acids.get(&amino_acid).copied().unwrap_or(0)
    }

    /// Total number of counted codons.
    pub fn total_codons(&self) -> u64 {
        self.codons.values().sum()
    }

    /// Returns true if no codon was counted.
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// Adds the tallies of `other`, e.g. from an independently counted chunk.
    pub fn merge(&mut self, other: &CodonUsage) {
        for (&codon, &n) in &other.codons {
            *self.codons.entry(codon).or_insert(0) += n;
        }
        for (&aa, &n) in &other.amino_acids {
            *self.amino_acids.entry(aa).or_insert(0) += n;
        }
        self.sequences += other.sequences;
        self.skipped_codons += other.skipped_codons;
        self.truncated_bases += other.truncated_bases;
    }

    fn record(&mut self, codon: Codon, amino_acid: char) {
        *self.codons.entry(codon).or_insert(0) += 1;
        *self.amino_acids.entry(amino_acid).or_insert(0) += 1;
    }
}

/// Scans nucleotide sequences and tallies codon usage.
#[derive(Debug, Clone, Copy)]
pub struct CodonCounter<'a> {
    code: &'a GeneticCode,
}

impl Default for CodonCounter<'static> {
    fn default() -> Self {
        Self::new(GeneticCode::standard())
    }
}

impl<'a> CodonCounter<'a> {
    /// Creates a counter translating with `code`.
    pub fn new(code: &'a GeneticCode) -> Self {
        Self { code }
    }

    /// Counts codons over all `sequences`.
    ///
    /// An empty collection, or empty sequences, yield empty tallies.
    pub fn count<I, S>(&self, sequences: I) -> CodonUsage
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut usage = CodonUsage::new();
        for sequence in sequences {
            self.add_sequence(&mut usage, sequence.as_ref());
        }

        debug!(
            sequences = usage.sequences,
            codons = usage.total_codons(),
            skipped = usage.skipped_codons,
            truncated_bases = usage.truncated_bases,
            "codon counting finished"
        );
        usage
    }

    /// Adds the codons of one sequence to `usage`.
    pub fn add_sequence(&self, usage: &mut CodonUsage, sequence: &[u8]) {
        usage.sequences += 1;

        let chunks = sequence.chunks_exact(3);
        let remainder = chunks.remainder().len() as u64;
        let mut counted = 0u64;

        for chunk in chunks {
            match Codon::from_bytes(chunk) {
                Some(codon) => {
                    usage.record(codon, self.code.translate_codon(codon));
                    counted += 1;
                }
                None => usage.skipped_codons += 1,
            }
        }

        usage.truncated_bases += remainder;
        if counted == 0 && !sequence.is_empty() {
            warn!(
                length = sequence.len(),
                "sequence contributed no valid codon"
            );
        }
    }
}

/// Counts codons over `sequences` with the Standard code.
pub fn count_codons<I, S>(sequences: I) -> CodonUsage
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    CodonCounter::default().count(sequences)
}
