//! Error kinds shared by the counting, analysis and synthesis passes.

use thiserror::Error;

/// Errors raised by the codon usage core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodonError {
    /// The string is not one of the 64 codons over {A, C, G, T}.
    #[error("Unknown codon: '{0}'")]
    UnknownCodon(String),

    /// A protein residue has no usage data in the frequency table.
    #[error("No codon frequencies for amino acid '{symbol}' (protein position {position})")]
    MissingAminoAcidFrequency { symbol: char, position: usize },

    #[error("Malformed frequency table: {0}")]
    MalformedTable(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),
}

/// Result type for core operations.
pub type CodonResult<T> = Result<T, CodonError>;
