//! DNA synthesis from a protein sequence and a codon frequency table.
//!
//! Two codon selection policies are available:
//! - **preferred**: the most frequent codon of each amino acid, ties going to
//!   the lexicographically smallest codon. Deterministic.
//! - **weighted**: a categorical draw per residue with probabilities equal to
//!   the codon frequencies. The random source is always passed in by the
//!   caller, so a seeded generator reproduces the same sequences.
//!
//! Each residue is encoded independently of its neighbours.

use std::collections::BTreeMap;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use tracing::debug;

use crate::error::{CodonError, CodonResult};
use crate::frequency::FrequencyTable;
use crate::genetic_code::Codon;

/// Codon selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisMethod {
    /// Most frequent codon per amino acid
    Preferred,
    /// Codon drawn in proportion to its frequency
    #[default]
    Weighted,
}

/// Candidate codons of one amino acid.
#[derive(Debug, Clone)]
struct CodonChoice {
    preferred: Codon,
    candidates: Vec<Codon>,
    weights: WeightedIndex<f64>,
}

impl CodonChoice {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Codon {
        self.candidates[self.weights.sample(rng)]
    }
}

/// Builds DNA sequences for proteins from a frequency table.
///
/// The table is only read; one synthesizer can serve any number of calls.
#[derive(Debug, Clone)]
pub struct SequenceSynthesizer {
    choices: BTreeMap<char, CodonChoice>,
}

impl SequenceSynthesizer {
    /// Prepares per-amino-acid codon choices from `table`.
    pub fn new(table: &FrequencyTable) -> CodonResult<Self> {
        let mut choices = BTreeMap::new();

        for aa in table.amino_acids() {
            let rows = table.rows_for(aa);

            // Rows are sorted by codon, so keeping the first maximum breaks
            // ties towards the smallest codon.
            let mut best = &rows[0];
            for row in &rows[1..] {
                if row.frequency > best.frequency {
                    best = row;
                }
            }

            let weights = WeightedIndex::new(rows.iter().map(|r| r.frequency)).map_err(|e| {
                CodonError::MalformedTable(format!(
                    "unusable frequencies for amino acid '{}': {}",
                    aa, e
                ))
            })?;

            choices.insert(
                aa,
                CodonChoice {
                    preferred: best.codon,
                    candidates: rows.iter().map(|r| r.codon).collect(),
                    weights,
                },
            );
        }

        Ok(Self { choices })
    }

    /// Looks up the codon choice of every residue, failing on the first
    /// residue without usage data.
    fn resolve(&self, protein: &str) -> CodonResult<Vec<&CodonChoice>> {
        if protein.is_empty() {
            return Err(CodonError::EmptyInput("protein sequence is empty".to_string()));
        }

        protein
            .chars()
            .enumerate()
            .map(|(idx, symbol)| {
                let symbol = symbol.to_ascii_uppercase();
                self.choices
                    .get(&symbol)
                    .ok_or(CodonError::MissingAminoAcidFrequency {
                        symbol,
                        position: idx + 1,
                    })
            })
            .collect()
    }

    /// Encodes `protein` with the most frequent codon of each amino acid.
    pub fn preferred(&self, protein: &str) -> CodonResult<String> {
        let residues = self.resolve(protein)?;
        let mut dna = String::with_capacity(residues.len() * 3);
        for choice in residues {
            dna.push_str(choice.preferred.as_str());
        }
        Ok(dna)
    }

    /// Encodes `protein` drawing each codon in proportion to its frequency.
    pub fn weighted<R: Rng + ?Sized>(&self, protein: &str, rng: &mut R) -> CodonResult<String> {
        let residues = self.resolve(protein)?;
        Ok(Self::draw_sequence(&residues, rng))
    }

    /// Draws `n` independent weighted encodings of `protein`.
    ///
    /// Variants consume successive values of the same random stream, so the
    /// whole batch is reproducible from one seed.
    pub fn variants<R: Rng + ?Sized>(
        &self,
        protein: &str,
        n: usize,
        rng: &mut R,
    ) -> CodonResult<Vec<String>> {
        let residues = self.resolve(protein)?;
        let variants: Vec<String> = (0..n).map(|_| Self::draw_sequence(&residues, rng)).collect();
        debug!(variants = n, residues = residues.len(), "weighted variants drawn");
        Ok(variants)
    }

    fn draw_sequence<R: Rng + ?Sized>(residues: &[&CodonChoice], rng: &mut R) -> String {
        let mut dna = String::with_capacity(residues.len() * 3);
        for choice in residues {
            dna.push_str(choice.draw(rng).as_str());
        }
        dna
    }
}

/// Encodes `protein` with preferred codons from `table`.
pub fn synthesize_preferred(protein: &str, table: &FrequencyTable) -> CodonResult<String> {
    SequenceSynthesizer::new(table)?.preferred(protein)
}

/// Encodes `protein` with codons drawn from `table` using `rng`.
pub fn synthesize_weighted<R: Rng + ?Sized>(
    protein: &str,
    table: &FrequencyTable,
    rng: &mut R,
) -> CodonResult<String> {
    SequenceSynthesizer::new(table)?.weighted(protein, rng)
}

/// Draws `n` weighted encodings of `protein` from `table` using `rng`.
pub fn synthesize_variants<R: Rng + ?Sized>(
    protein: &str,
    table: &FrequencyTable,
    n: usize,
    rng: &mut R,
) -> CodonResult<Vec<String>> {
    SequenceSynthesizer::new(table)?.variants(protein, n, rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::counter::count_codons;
    use crate::frequency::{analyze_codon_counts, FrequencyRow};
    use crate::genetic_code::GeneticCode;

    fn scenario_table() -> FrequencyTable {
        analyze_codon_counts(&count_codons(["ATGGCTATGGCCATG"])).unwrap()
    }

    fn row(aa: char, c: &str, count: u64, frequency: f64) -> FrequencyRow {
        FrequencyRow {
            amino_acid: aa,
            codon: c.parse().unwrap(),
            count,
            frequency,
        }
    }

    /// Skewed usage for A, K and L plus a single Met codon.
    fn skewed_table() -> FrequencyTable {
        FrequencyTable::from_rows(vec![
            row('A', "GCC", 7, 0.7),
            row('A', "GCT", 3, 0.3),
            row('K', "AAA", 5, 0.5),
            row('K', "AAG", 5, 0.5),
            row('L', "CTG", 2, 0.2),
            row('L', "TTA", 8, 0.8),
            row('M', "ATG", 4, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_preferred_single_candidate() {
        let table = scenario_table();
        assert_eq!(synthesize_preferred("M", &table).unwrap(), "ATG");
    }

    #[test]
    fn test_preferred_tie_breaks_to_smallest_codon() {
        let table = scenario_table();
        // GCC and GCT both at 0.5
        assert_eq!(synthesize_preferred("MA", &table).unwrap(), "ATGGCC");

        let table = skewed_table();
        assert_eq!(synthesize_preferred("K", &table).unwrap(), "AAA");
    }

    #[test]
    fn test_preferred_picks_most_frequent() {
        let table = skewed_table();
        let dna = synthesize_preferred("MALK", &table).unwrap();
        assert_eq!(dna, "ATGGCCTTAAAA");
        assert_eq!(synthesize_preferred("MALK", &table).unwrap(), dna);
    }

    #[test]
    fn test_lowercase_protein_accepted() {
        let table = skewed_table();
        assert_eq!(synthesize_preferred("mak", &table).unwrap(), "ATGGCCAAA");
    }

    #[test]
    fn test_missing_amino_acid() {
        let table = scenario_table();

        let err = synthesize_preferred("MAW", &table).unwrap_err();
        assert_eq!(
            err,
            CodonError::MissingAminoAcidFrequency {
                symbol: 'W',
                position: 3
            }
        );

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            synthesize_weighted("MXA", &table, &mut rng),
            Err(CodonError::MissingAminoAcidFrequency { symbol: 'X', position: 2 })
        ));
        assert!(matches!(
            synthesize_variants("M*", &table, 3, &mut rng),
            Err(CodonError::MissingAminoAcidFrequency { symbol: '*', position: 2 })
        ));
    }

    #[test]
    fn test_stop_symbol_uses_observed_stop_codons() {
        let table = analyze_codon_counts(&count_codons(["ATGTAA"])).unwrap();
        assert_eq!(synthesize_preferred("M*", &table).unwrap(), "ATGTAA");
    }

    #[test]
    fn test_empty_protein() {
        let table = scenario_table();
        assert!(matches!(
            synthesize_preferred("", &table),
            Err(CodonError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_weighted_output_is_valid_encoding() {
        let table = skewed_table();
        let code = GeneticCode::standard();
        let protein = "MALKKLAM";
        let mut rng = StdRng::seed_from_u64(7);

        let dna = synthesize_weighted(protein, &table, &mut rng).unwrap();
        assert_eq!(dna.len(), protein.len() * 3);

        let translated: String = dna
            .as_bytes()
            .chunks(3)
            .map(|c| code.translate(std::str::from_utf8(c).unwrap()).unwrap())
            .collect();
        assert_eq!(translated, protein);
    }

    #[test]
    fn test_weighted_reproducible_with_seed() {
        let table = skewed_table();
        let protein = "MAKLAKLAKLAKLAKLAKLAKLAK";

        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(
            synthesize_weighted(protein, &table, &mut rng1).unwrap(),
            synthesize_weighted(protein, &table, &mut rng2).unwrap()
        );

        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(
            synthesize_variants(protein, &table, 5, &mut rng1).unwrap(),
            synthesize_variants(protein, &table, 5, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_weighted_differs_across_seeds() {
        let table = skewed_table();
        let protein = "AKLAKLAKLAKLAKLAKLAKLAKLAKLAKL";

        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);
        assert_ne!(
            synthesize_weighted(protein, &table, &mut rng1).unwrap(),
            synthesize_weighted(protein, &table, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_variants_advance_the_stream() {
        let table = skewed_table();
        let protein = "AKLAKLAKLAKLAKLAKLAKLAKLAKLAKL";
        let mut rng = StdRng::seed_from_u64(3);

        let variants = synthesize_variants(protein, &table, 4, &mut rng).unwrap();
        assert_eq!(variants.len(), 4);
        assert_ne!(variants[0], variants[1]);

        // The first variant equals a single weighted draw from the same seed
        let mut rng = StdRng::seed_from_u64(3);
        let single = synthesize_weighted(protein, &table, &mut rng).unwrap();
        assert_eq!(variants[0], single);
    }

    #[test]
    fn test_weighted_follows_frequencies() {
        let table = skewed_table();
        let synthesizer = SequenceSynthesizer::new(&table).unwrap();
        let protein = "A".repeat(10_000);
        let mut rng = StdRng::seed_from_u64(11);

        let dna = synthesizer.weighted(&protein, &mut rng).unwrap();
        let gcc = dna.as_bytes().chunks(3).filter(|c| *c == b"GCC").count();
        let share = gcc as f64 / 10_000.0;
        assert!((share - 0.7).abs() < 0.03, "GCC share {}", share);
    }

    #[test]
    fn test_zero_variants() {
        let table = skewed_table();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(synthesize_variants("MA", &table, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_synthesizer_does_not_mutate_table() {
        let table = skewed_table();
        let before = table.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let _ = synthesize_variants("MALK", &table, 10, &mut rng).unwrap();
        assert_eq!(table, before);
    }
}
