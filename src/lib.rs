//! # codonkit - Codon usage analysis and DNA synthesis
//!
//! Derives codon usage frequencies from reference coding sequences and uses
//! them to encode proteins as DNA, either with each amino acid's preferred
//! codon or with codons sampled in proportion to their usage.
//!
//! ## Architecture
//!
//! Core (no I/O):
//! - `genetic_code`: Standard code, codon ↔ amino acid lookups
//! - `counter`: Codon and amino acid tallies from nucleotide sequences
//! - `frequency`: Per-amino-acid relative frequencies (`FrequencyTable`)
//! - `synthesis`: Preferred and weighted protein → DNA encoding
//! - `error`: Core error kinds
//!
//! Adapters:
//! - `fasta`: FASTA input
//! - `table`: CSV persistence of frequency tables
//! - `heatmap`: Amino acid × codon matrix export
//! - `model`, `event`, `ui`, `controller`: Terminal heatmap viewer
//!
//! ## Example
//!
//! ```
//! use codonkit::counter::count_codons;
//! use codonkit::frequency::analyze_codon_counts;
//! use codonkit::synthesis::synthesize_preferred;
//!
//! let usage = count_codons(["ATGGCTATGGCCATG"]);
//! let table = analyze_codon_counts(&usage).unwrap();
//! assert_eq!(synthesize_preferred("MA", &table).unwrap(), "ATGGCC");
//! ```

pub mod controller;
pub mod counter;
pub mod error;
pub mod event;
pub mod fasta;
pub mod frequency;
pub mod genetic_code;
pub mod heatmap;
pub mod model;
pub mod synthesis;
pub mod table;
pub mod ui;

pub use error::{CodonError, CodonResult};
pub use frequency::{FrequencyRow, FrequencyTable};
pub use synthesis::{SequenceSynthesizer, SynthesisMethod};
