//! Persisted frequency tables (CSV).
//!
//! ## Format
//!
//! ```text
//! amino_acid,codon,count,frequency
//! A,GCC,1,0.5
//! A,GCT,1,0.5
//! M,ATG,3,1.0
//! ```
//!
//! Rows are written in table order. Frequencies are written in their
//! shortest round-trip form, so a reloaded table is value-identical to the
//! one that was written. Loading validates every row and the per-amino-acid
//! sums before any row is handed to synthesis.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::CodonError;
use crate::frequency::{FrequencyRow, FrequencyTable};
use crate::genetic_code::Codon;

/// Column names of a persisted table, in write order.
pub const COLUMNS: [&str; 4] = ["amino_acid", "codon", "count", "frequency"];

/// Errors that can occur while reading or writing a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to access frequency table: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    Invalid(#[from] CodonError),
}

/// Result type for table persistence.
pub type TableResult<T> = Result<T, TableError>;

#[derive(Serialize)]
struct TableRecord<'a> {
    amino_acid: char,
    codon: &'a str,
    count: u64,
    frequency: f64,
}

/// Writes `table` as CSV to `writer`.
pub fn write_table<W: Write>(table: &FrequencyTable, writer: W) -> TableResult<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for row in table.rows() {
        csv_writer.serialize(TableRecord {
            amino_acid: row.amino_acid,
            codon: row.codon.as_str(),
            count: row.count,
            frequency: row.frequency,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `table` to a CSV file at `path`.
pub fn write_table_file<P: AsRef<Path>>(table: &FrequencyTable, path: P) -> TableResult<()> {
    let file = File::create(&path)?;
    write_table(table, BufWriter::new(file))?;
    info!(path = %path.as_ref().display(), rows = table.len(), "frequency table written");
    Ok(())
}

fn malformed(message: String) -> TableError {
    TableError::Invalid(CodonError::MalformedTable(message))
}

/// Positions of the required columns within the header.
struct ColumnIndex {
    amino_acid: usize,
    codon: usize,
    count: usize,
    frequency: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> TableResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| malformed(format!("missing column '{}'", name)))
        };

        Ok(Self {
            amino_acid: find(COLUMNS[0])?,
            codon: find(COLUMNS[1])?,
            count: find(COLUMNS[2])?,
            frequency: find(COLUMNS[3])?,
        })
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> TableResult<FrequencyRow> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| malformed(format!("row {}: empty '{}' field", row, name)))
        };

        let aa_field = field(self.amino_acid, COLUMNS[0])?;
        let mut symbols = aa_field.chars();
        let amino_acid = match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => symbol,
            _ => {
                return Err(malformed(format!(
                    "row {}: amino acid '{}' is not a single symbol",
                    row, aa_field
                )))
            }
        };

        let codon_field = field(self.codon, COLUMNS[1])?;
        let codon: Codon = codon_field.parse().map_err(|_| {
            malformed(format!("row {}: '{}' is not a valid codon", row, codon_field))
        })?;

        let count_field = field(self.count, COLUMNS[2])?;
        let count: u64 = count_field.parse().map_err(|_| {
            malformed(format!(
                "row {}: count '{}' is not a non-negative integer",
                row, count_field
            ))
        })?;

        let frequency_field = field(self.frequency, COLUMNS[3])?;
        let frequency: f64 = frequency_field.parse().map_err(|_| {
            malformed(format!(
                "row {}: frequency '{}' is not a number",
                row, frequency_field
            ))
        })?;

        Ok(FrequencyRow {
            amino_acid,
            codon,
            count,
            frequency,
        })
    }
}

/// Reads and validates a CSV frequency table from `reader`.
///
/// Columns may appear in any order and extra columns are ignored.
pub fn read_table<R: Read>(reader: R) -> TableResult<FrequencyTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(TableError::Invalid(CodonError::EmptyInput(
            "frequency table file is empty".to_string(),
        )));
    }
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| {
            if e.is_io_error() {
                TableError::CsvError(e)
            } else {
                malformed(format!("row {}: {}", row, e))
            }
        })?;
        rows.push(columns.parse_row(&record, row)?);
    }

    let table = FrequencyTable::from_rows(rows)?;
    debug!(rows = table.len(), "frequency table loaded");
    Ok(table)
}

/// Reads and validates a CSV frequency table from `path`.
pub fn read_table_file<P: AsRef<Path>>(path: P) -> TableResult<FrequencyTable> {
    let file = File::open(&path)?;
    read_table(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::counter::count_codons;
    use crate::frequency::analyze_codon_counts;
    use crate::synthesis::{synthesize_preferred, synthesize_variants};

    fn to_csv(table: &FrequencyTable) -> String {
        let mut buffer = Vec::new();
        write_table(table, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn assert_malformed(content: &str, needle: &str) {
        match read_table(content.as_bytes()) {
            Err(TableError::Invalid(CodonError::MalformedTable(msg))) => {
                assert!(msg.contains(needle), "'{}' does not mention '{}'", msg, needle)
            }
            other => panic!("expected MalformedTable, got {:?}", other),
        }
    }

    #[test]
    fn test_write_format() {
        let table = analyze_codon_counts(&count_codons(["ATGGCTATGGCCATG"])).unwrap();
        let csv = to_csv(&table);

        assert_eq!(
            csv,
            "amino_acid,codon,count,frequency\nA,GCC,1,0.5\nA,GCT,1,0.5\nM,ATG,3,1.0\n"
        );
    }

    #[test]
    fn test_round_trip_is_identical() {
        let usage = count_codons([
            "ATGGCTGCCGCAGCGGCTAAAAAGAAACTGCTGTTACTTCTCCTATTGTAA",
            "ATGTGGTGGCGTCGCAGAAGGGGCGGTTAG",
        ]);
        let table = analyze_codon_counts(&usage).unwrap();
        let reloaded = read_table(to_csv(&table).as_bytes()).unwrap();

        assert_eq!(reloaded, table);
        for (a, b) in reloaded.rows().iter().zip(table.rows()) {
            assert_eq!(a.frequency.to_bits(), b.frequency.to_bits());
        }

        let protein = "MAKLWRGLAK";
        assert_eq!(
            synthesize_preferred(protein, &reloaded).unwrap(),
            synthesize_preferred(protein, &table).unwrap()
        );

        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        assert_eq!(
            synthesize_variants(protein, &reloaded, 3, &mut rng1).unwrap(),
            synthesize_variants(protein, &table, 3, &mut rng2).unwrap()
        );
    }

    #[test]
    fn test_file_round_trip() {
        let table = analyze_codon_counts(&count_codons(["ATGGCTATGGCCATG"])).unwrap();
        let file = NamedTempFile::with_suffix(".csv").unwrap();

        write_table_file(&table, file.path()).unwrap();
        let reloaded = read_table_file(file.path()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let content = "codon,frequency,note,amino_acid,count\n\
                       ATG,1.0,start,M,3\n\
                       GCT,0.5,,A,1\n\
                       GCC,0.5,,A,1\n";
        let table = read_table(content.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].codon.as_str(), "GCC");
        assert_eq!(table.rows()[2].count, 3);
    }

    #[test]
    fn test_missing_column() {
        assert_malformed("amino_acid,codon,frequency\nM,ATG,1.0\n", "'count'");
    }

    #[test]
    fn test_non_numeric_fields() {
        assert_malformed(
            "amino_acid,codon,count,frequency\nM,ATG,three,1.0\n",
            "row 1: count 'three'",
        );
        assert_malformed(
            "amino_acid,codon,count,frequency\nM,ATG,3,1.0\nA,GCT,-1,1.0\n",
            "row 2",
        );
        assert_malformed(
            "amino_acid,codon,count,frequency\nM,ATG,3,high\n",
            "frequency 'high'",
        );
    }

    #[test]
    fn test_invalid_symbols() {
        assert_malformed(
            "amino_acid,codon,count,frequency\nMet,ATG,3,1.0\n",
            "not a single symbol",
        );
        assert_malformed(
            "amino_acid,codon,count,frequency\nM,ATN,3,1.0\n",
            "'ATN' is not a valid codon",
        );
        assert_malformed(
            "amino_acid,codon,count,frequency\nM,GCT,3,1.0\n",
            "encodes 'A'",
        );
    }

    #[test]
    fn test_frequencies_must_sum_to_one() {
        assert_malformed(
            "amino_acid,codon,count,frequency\nA,GCT,1,0.5\nA,GCC,1,0.6\n",
            "'A'",
        );
    }

    #[test]
    fn test_ragged_row() {
        assert_malformed("amino_acid,codon,count,frequency\nM,ATG,3\n", "row 1");
    }

    #[test]
    fn test_empty_tables() {
        assert!(matches!(
            read_table("".as_bytes()),
            Err(TableError::Invalid(CodonError::EmptyInput(_)))
        ));
        assert!(matches!(
            read_table("amino_acid,codon,count,frequency\n".as_bytes()),
            Err(TableError::Invalid(CodonError::EmptyInput(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_table_file("/nonexistent/table.csv");
        assert!(matches!(result, Err(TableError::IoError(_))));
    }
}
