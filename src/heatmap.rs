//! Amino acid × codon frequency matrix.
//!
//! Rows are the amino acids of a frequency table (table order), columns are
//! the codons present (lexicographic order). A cell holds the codon's
//! frequency when the codon encodes the row's amino acid, and is empty
//! otherwise. Used both for CSV export and by the terminal viewer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;

use crate::frequency::{FrequencyRow, FrequencyTable};
use crate::genetic_code::Codon;
use crate::table::TableResult;

/// Dense view of a frequency table for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMatrix {
    amino_acids: Vec<char>,
    codons: Vec<Codon>,
    /// Row-major cells, `amino_acids.len() * codons.len()`
    cells: Vec<Option<FrequencyRow>>,
}

impl FrequencyMatrix {
    /// Builds the matrix from `table`.
    pub fn from_table(table: &FrequencyTable) -> Self {
        let amino_acids = table.amino_acids();
        let mut codons: Vec<Codon> = table.rows().iter().map(|r| r.codon).collect();
        codons.sort();

        let mut cells = vec![None; amino_acids.len() * codons.len()];
        for (row_idx, &aa) in amino_acids.iter().enumerate() {
            for row in table.rows_for(aa) {
                if let Ok(col_idx) = codons.binary_search(&row.codon) {
                    cells[row_idx * codons.len() + col_idx] = Some(*row);
                }
            }
        }

        Self {
            amino_acids,
            codons,
            cells,
        }
    }

    /// Row labels.
    pub fn amino_acids(&self) -> &[char] {
        &self.amino_acids
    }

    /// Column labels.
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    pub fn row_count(&self) -> usize {
        self.amino_acids.len()
    }

    pub fn column_count(&self) -> usize {
        self.codons.len()
    }

    /// Table row at a cell, if the codon encodes that amino acid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&FrequencyRow> {
        if row >= self.row_count() || col >= self.column_count() {
            return None;
        }
        self.cells[row * self.codons.len() + col].as_ref()
    }

    /// Frequency at a cell.
    pub fn frequency(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).map(|r| r.frequency)
    }

    /// Column index of `codon`.
    pub fn column_of(&self, codon: &Codon) -> Option<usize> {
        self.codons.binary_search(codon).ok()
    }

    /// Row index of `amino_acid`.
    pub fn row_of(&self, amino_acid: char) -> Option<usize> {
        self.amino_acids.iter().position(|&aa| aa == amino_acid)
    }

    /// Writes the matrix as CSV: an `amino_acid` column followed by one
    /// column per codon, empty cells left blank.
    pub fn write_csv<W: Write>(&self, writer: W) -> TableResult<()> {
        let mut csv_writer = WriterBuilder::new().from_writer(writer);

        let mut header = vec!["amino_acid".to_string()];
        header.extend(self.codons.iter().map(|c| c.to_string()));
        csv_writer.write_record(&header)?;

        for (row_idx, aa) in self.amino_acids.iter().enumerate() {
            let mut record = vec![aa.to_string()];
            record.extend((0..self.column_count()).map(|col_idx| {
                self.frequency(row_idx, col_idx)
                    .map(|f| f.to_string())
                    .unwrap_or_default()
            }));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the matrix CSV to `path`.
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> TableResult<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count_codons;
    use crate::frequency::analyze_codon_counts;

    fn scenario_matrix() -> FrequencyMatrix {
        let table = analyze_codon_counts(&count_codons(["ATGGCTATGGCCATG"])).unwrap();
        FrequencyMatrix::from_table(&table)
    }

    #[test]
    fn test_matrix_shape() {
        let matrix = scenario_matrix();

        assert_eq!(matrix.amino_acids(), &['A', 'M']);
        let codons: Vec<&str> = matrix.codons().iter().map(|c| c.as_str()).collect();
        assert_eq!(codons, vec!["ATG", "GCC", "GCT"]);
    }

    #[test]
    fn test_matrix_cells() {
        let matrix = scenario_matrix();

        assert_eq!(matrix.frequency(0, 0), None); // A × ATG
        assert_eq!(matrix.frequency(0, 1), Some(0.5));
        assert_eq!(matrix.frequency(0, 2), Some(0.5));
        assert_eq!(matrix.frequency(1, 0), Some(1.0));
        assert_eq!(matrix.frequency(1, 1), None);
        assert_eq!(matrix.frequency(5, 0), None);
        assert_eq!(matrix.cell(1, 0).unwrap().count, 3);
    }

    #[test]
    fn test_lookup() {
        let matrix = scenario_matrix();

        assert_eq!(matrix.row_of('M'), Some(1));
        assert_eq!(matrix.row_of('W'), None);
        assert_eq!(matrix.column_of(&"GCT".parse().unwrap()), Some(2));
        assert_eq!(matrix.column_of(&"TTT".parse().unwrap()), None);
    }

    #[test]
    fn test_write_csv() {
        let matrix = scenario_matrix();
        let mut buffer = Vec::new();
        matrix.write_csv(&mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "amino_acid,ATG,GCC,GCT\nA,,0.5,0.5\nM,1,,\n"
        );
    }
}
