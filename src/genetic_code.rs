//! Standard genetic code and codon handling.
//!
//! This module provides:
//! - The `Codon` type (three nucleotides over A, C, G, T)
//! - Codon to amino acid translation (NCBI table 1)
//! - The inverse lookup from an amino acid to its synonymous codons

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{CodonError, CodonResult};

/// Symbol used for translational stop.
pub const STOP: char = '*';

/// Nucleotides in NCBI table order (Base1/Base2/Base3 cycle T, C, A, G).
const NCBI_BASES: [u8; 4] = *b"TCAG";

/// NCBI `ncbieaa` string for the Standard code (transl_table=1).
const STANDARD_NCBIEAA: &str = "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// A single codon: three nucleotides, each one of A, C, G or T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codon([u8; 3]);

impl Codon {
    /// Builds a codon from three bytes.
    ///
    /// Lowercase is accepted and `U` is read as `T`. Returns `None` for any
    /// other symbol (ambiguity codes, gaps) or a length other than 3.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 3 {
            return None;
        }

        let mut codon = [0u8; 3];
        for (slot, &b) in codon.iter_mut().zip(bytes) {
            *slot = match b.to_ascii_uppercase() {
                b'A' => b'A',
                b'C' => b'C',
                b'G' => b'G',
                b'T' | b'U' => b'T',
                _ => return None,
            };
        }
        Some(Self(codon))
    }

    /// Returns the codon as an uppercase string slice.
    pub fn as_str(&self) -> &str {
        // Only A/C/G/T are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("NNN")
    }

    /// Position of this codon in NCBI table order (0..64).
    fn ncbi_index(&self) -> usize {
        self.0.iter().fold(0, |acc, &b| {
            let rank = NCBI_BASES.iter().position(|&n| n == b).unwrap_or(0);
            acc * 4 + rank
        })
    }

    /// Iterates over all 64 codons in NCBI table order.
    pub fn all() -> impl Iterator<Item = Codon> {
        (0..64usize).map(|idx| {
            Codon([
                NCBI_BASES[idx / 16],
                NCBI_BASES[(idx / 4) % 4],
                NCBI_BASES[idx % 4],
            ])
        })
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codon {
    type Err = CodonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codon::from_bytes(s.as_bytes()).ok_or_else(|| CodonError::UnknownCodon(s.to_string()))
    }
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// Name of the genetic code
    pub name: &'static str,
    /// Amino acid per codon, indexed by NCBI order
    amino_acids: [char; 64],
    /// Synonymous codons per amino acid, sorted lexicographically
    synonyms: BTreeMap<char, Vec<Codon>>,
}

impl GeneticCode {
    /// Creates a genetic code from an NCBI `ncbieaa` string.
    fn from_ncbieaa(name: &'static str, ncbieaa: &str) -> Self {
        let mut amino_acids = ['X'; 64];
        for (slot, aa) in amino_acids.iter_mut().zip(ncbieaa.chars()) {
            *slot = aa;
        }

        let mut synonyms: BTreeMap<char, Vec<Codon>> = BTreeMap::new();
        for codon in Codon::all() {
            synonyms
                .entry(amino_acids[codon.ncbi_index()])
                .or_default()
                .push(codon);
        }
        for codons in synonyms.values_mut() {
            codons.sort();
        }

        Self {
            name,
            amino_acids,
            synonyms,
        }
    }

    /// The Standard code, built once per process.
    pub fn standard() -> &'static GeneticCode {
        static STANDARD: OnceLock<GeneticCode> = OnceLock::new();
        STANDARD.get_or_init(|| GeneticCode::from_ncbieaa("Standard", STANDARD_NCBIEAA))
    }

    /// Translates a codon string to its amino acid symbol.
    ///
    /// Fails with `UnknownCodon` for anything that is not one of the 64
    /// codons; there is no fallback symbol.
    pub fn translate(&self, codon: &str) -> CodonResult<char> {
        let codon: Codon = codon.parse()?;
        Ok(self.translate_codon(codon))
    }

    /// Translates an already validated codon.
    pub fn translate_codon(&self, codon: Codon) -> char {
        self.amino_acids[codon.ncbi_index()]
    }

    /// Returns the codons encoding `amino_acid`, lexicographically sorted.
    ///
    /// Symbols outside the code (e.g. `X`, `B`) yield an empty slice.
    pub fn codons_for(&self, amino_acid: char) -> &[Codon] {
        self.synonyms
            .get(&amino_acid.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All amino acid symbols of the code, stop included, in symbol order.
    pub fn amino_acids(&self) -> impl Iterator<Item = char> + '_ {
        self.synonyms.keys().copied()
    }
}

/// Three-letter abbreviation for an amino acid symbol.
pub fn three_letter(amino_acid: char) -> &'static str {
    match amino_acid {
        'A' => "Ala",
        'R' => "Arg",
        'N' => "Asn",
        'D' => "Asp",
        'C' => "Cys",
        'Q' => "Gln",
        'E' => "Glu",
        'G' => "Gly",
        'H' => "His",
        'I' => "Ile",
        'L' => "Leu",
        'K' => "Lys",
        'M' => "Met",
        'F' => "Phe",
        'P' => "Pro",
        'S' => "Ser",
        'T' => "Thr",
        'W' => "Trp",
        'Y' => "Tyr",
        'V' => "Val",
        STOP => "Stop",
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_standard_code_translation() {
        let code = GeneticCode::standard();

        assert_eq!(code.translate("ATG").unwrap(), 'M'); // Start codon
        assert_eq!(code.translate("TAA").unwrap(), STOP);
        assert_eq!(code.translate("TAG").unwrap(), STOP);
        assert_eq!(code.translate("TGA").unwrap(), STOP);
        assert_eq!(code.translate("TTT").unwrap(), 'F');
        assert_eq!(code.translate("GCT").unwrap(), 'A');
        assert_eq!(code.translate("GCC").unwrap(), 'A');
        assert_eq!(code.translate("GGG").unwrap(), 'G');
    }

    #[test]
    fn test_case_and_rna_normalization() {
        let code = GeneticCode::standard();

        assert_eq!(code.translate("atg").unwrap(), 'M');
        assert_eq!(code.translate("AUG").unwrap(), 'M');
        assert_eq!(code.translate("uuu").unwrap(), 'F');
    }

    #[test]
    fn test_unknown_codons_are_errors() {
        let code = GeneticCode::standard();

        assert_eq!(
            code.translate("ATN"),
            Err(CodonError::UnknownCodon("ATN".to_string()))
        );
        assert!(code.translate("---").is_err());
        assert!(code.translate("AT").is_err());
        assert!(code.translate("ATGC").is_err());
        assert!(code.translate("").is_err());
    }

    #[test]
    fn test_codon_partition() {
        let code = GeneticCode::standard();
        let mut seen = HashSet::new();

        for aa in code.amino_acids() {
            for &codon in code.codons_for(aa) {
                assert!(seen.insert(codon), "{} listed twice", codon);
                assert_eq!(code.translate_codon(codon), aa);
            }
        }

        assert_eq!(seen.len(), 64);
        assert_eq!(code.amino_acids().count(), 21);
    }

    #[test]
    fn test_codons_for() {
        let code = GeneticCode::standard();

        let codons: Vec<&str> = code.codons_for('A').iter().map(|c| c.as_str()).collect();
        assert_eq!(codons, vec!["GCA", "GCC", "GCG", "GCT"]);

        assert_eq!(code.codons_for('M').len(), 1);
        assert_eq!(code.codons_for('W').len(), 1);
        assert_eq!(code.codons_for(STOP).len(), 3);
        assert_eq!(code.codons_for('L').len(), 6);
        assert!(code.codons_for('X').is_empty());
        assert!(code.codons_for('B').is_empty());
    }

    #[test]
    fn test_codon_ordering_and_display() {
        let mut codons: Vec<Codon> = ["TTT", "AAA", "GCT", "ACG"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        codons.sort();
        let as_text: Vec<String> = codons.iter().map(|c| c.to_string()).collect();
        assert_eq!(as_text, vec!["AAA", "ACG", "GCT", "TTT"]);
    }

    #[test]
    fn test_all_codons_in_ncbi_order() {
        let all: Vec<Codon> = Codon::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0].as_str(), "TTT");
        assert_eq!(all[1].as_str(), "TTC");
        assert_eq!(all[63].as_str(), "GGG");
        for (idx, codon) in all.iter().enumerate() {
            assert_eq!(codon.ncbi_index(), idx);
        }
    }

    #[test]
    fn test_three_letter() {
        assert_eq!(three_letter('M'), "Met");
        assert_eq!(three_letter(STOP), "Stop");
        assert_eq!(three_letter('X'), "???");
    }
}
