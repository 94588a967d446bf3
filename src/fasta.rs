//! FASTA reader for reference coding sequences.
//!
//! Supports single-line and multi-line records:
//!
//! ```text
//! >sequence_identifier optional description
//! ATGGCTATGGCC...
//! >another_sequence
//! ATGAAACCC...
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read FASTA input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// One FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Identifier (first whitespace-delimited token of the header)
    pub id: String,
    /// Raw sequence bytes, case preserved
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    /// Returns the sequence as a string slice (lossy for non-UTF-8 input).
    pub fn sequence_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.sequence)
    }
}

impl AsRef<[u8]> for FastaRecord {
    fn as_ref(&self) -> &[u8] {
        &self.sequence
    }
}

/// Reads all records of a FASTA file.
///
/// # Examples
///
/// ```no_run
/// use codonkit::fasta::parse_fasta_file;
///
/// let records = parse_fasta_file("reference_cds.fasta").unwrap();
/// println!("Loaded {} sequences", records.len());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Vec<FastaRecord>> {
    let file = File::open(&path)?;
    let records = parse_fasta(BufReader::new(file))?;
    debug!(
        path = %path.as_ref().display(),
        records = records.len(),
        "FASTA file parsed"
    );
    Ok(records)
}

/// Parses FASTA content from a reader.
///
/// Records with an empty body are dropped.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Vec<FastaRecord>> {
    let mut records = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_seq: Vec<u8> = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = current_id.take() {
                if !current_seq.is_empty() {
                    records.push(FastaRecord::new(id, std::mem::take(&mut current_seq)));
                }
            }

            let id = header.split_whitespace().next().unwrap_or("");
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current_id = Some(id.to_string());
            current_seq.clear();
        } else {
            if current_id.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }
            current_seq.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }

    if let Some(id) = current_id {
        if !current_seq.is_empty() {
            records.push(FastaRecord::new(id, current_seq));
        }
    }

    if records.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    Ok(records)
}

/// Parses FASTA content from a string.
pub fn parse_fasta_str(content: &str) -> FastaResult<Vec<FastaRecord>> {
    parse_fasta(content.as_bytes())
}

/// Writes one FASTA record, wrapping the sequence at `width` columns.
///
/// A `width` of 0 writes the sequence on a single line.
pub fn write_fasta_record<W: Write>(
    writer: &mut W,
    id: &str,
    sequence: &str,
    width: usize,
) -> io::Result<()> {
    writeln!(writer, ">{}", id)?;
    if width == 0 {
        writeln!(writer, "{}", sequence)?;
    } else {
        for line in textwrap::wrap(sequence, width) {
            writeln!(writer, "{}", line)?;
        }
    }
    Ok(())
}
