//! State of the frequency heatmap viewer.
//!
//! This module contains the data structures for:
//! - The viewport over the amino acid × codon matrix
//! - The cursor cell
//! - Application mode and state transitions

use std::ops::Range;

use crate::frequency::FrequencyRow;
use crate::genetic_code::Codon;
use crate::heatmap::FrequencyMatrix;
use crate::ui::glyphs::Glyphs;

/// The viewport defines what portion of the matrix is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible amino acid (row)
    pub first_row: usize,
    /// Index of the first visible codon (column)
    pub first_col: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Number of visible columns (cells, not characters)
    pub visible_cols: usize,
}

impl Viewport {
    pub fn new(visible_rows: usize, visible_cols: usize) -> Self {
        Self {
            first_row: 0,
            first_col: 0,
            visible_rows,
            visible_cols,
        }
    }

    pub fn resize(&mut self, visible_rows: usize, visible_cols: usize) {
        self.visible_rows = visible_rows;
        self.visible_cols = visible_cols;
    }

    pub fn row_range(&self) -> Range<usize> {
        self.first_row..self.first_row + self.visible_rows
    }

    pub fn col_range(&self) -> Range<usize> {
        self.first_col..self.first_col + self.visible_cols
    }
}

/// The cursor cell in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// The complete viewer state.
#[derive(Debug)]
pub struct AppState {
    /// The matrix being displayed
    pub matrix: FrequencyMatrix,
    /// Name of the table file, shown in the title
    pub source: String,
    pub viewport: Viewport,
    pub cursor: Cursor,
    pub mode: AppMode,
    pub glyphs: Glyphs,
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
}

impl AppState {
    /// Creates the viewer state, with the cursor on the first filled cell.
    pub fn new(matrix: FrequencyMatrix, source: String, glyphs: Glyphs) -> Self {
        let mut state = Self {
            matrix,
            source,
            viewport: Viewport::new(0, 0),
            cursor: Cursor::default(),
            mode: AppMode::Normal,
            glyphs,
            should_quit: false,
            status_message: None,
        };
        if let Some(col) = (0..state.matrix.column_count()).find(|&c| state.matrix.cell(0, c).is_some()) {
            state.cursor.col = col;
        }
        state
    }

    /// Table row under the cursor, if the cell is filled.
    pub fn current_cell(&self) -> Option<&FrequencyRow> {
        self.matrix.cell(self.cursor.row, self.cursor.col)
    }

    /// Updates the viewport size based on terminal dimensions.
    pub fn update_viewport_size(&mut self, rows: usize, cols: usize) {
        self.viewport.resize(rows, cols);
        self.ensure_cursor_visible();
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.row + 1 < self.matrix.row_count() {
            self.cursor.row += 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.col + 1 < self.matrix.column_count() {
            self.cursor.col += 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn goto_first_column(&mut self) {
        self.cursor.col = 0;
        self.ensure_cursor_visible();
    }

    pub fn goto_last_column(&mut self) {
        self.cursor.col = self.matrix.column_count().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Moves the cursor to the cell of `codon` (row of its amino acid).
    pub fn goto_codon(&mut self, codon: Codon) -> bool {
        let Some(col) = self.matrix.column_of(&codon) else {
            return false;
        };
        let row = (0..self.matrix.row_count())
            .find(|&r| self.matrix.cell(r, col).is_some())
            .unwrap_or(self.cursor.row);
        self.cursor = Cursor { row, col };
        self.ensure_cursor_visible();
        true
    }

    /// Keeps the cursor inside the viewport, scrolling as needed.
    fn ensure_cursor_visible(&mut self) {
        if self.cursor.row < self.viewport.first_row {
            self.viewport.first_row = self.cursor.row;
        } else if self.viewport.visible_rows > 0
            && self.cursor.row >= self.viewport.first_row + self.viewport.visible_rows
        {
            self.viewport.first_row = self.cursor.row + 1 - self.viewport.visible_rows;
        }

        if self.cursor.col < self.viewport.first_col {
            self.viewport.first_col = self.cursor.col;
        } else if self.viewport.visible_cols > 0
            && self.cursor.col >= self.viewport.first_col + self.viewport.visible_cols
        {
            self.viewport.first_col = self.cursor.col + 1 - self.viewport.visible_cols;
        }

        self.clamp_viewport();
    }

    /// Clamps the viewport and cursor to valid matrix bounds.
    fn clamp_viewport(&mut self) {
        let rows = self.matrix.row_count();
        let cols = self.matrix.column_count();

        if self.viewport.first_row + self.viewport.visible_rows > rows {
            self.viewport.first_row = rows.saturating_sub(self.viewport.visible_rows);
        }
        if self.viewport.first_col + self.viewport.visible_cols > cols {
            self.viewport.first_col = cols.saturating_sub(self.viewport.visible_cols);
        }

        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
        self.cursor.col = self.cursor.col.min(cols.saturating_sub(1));
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command (`q`, `quit`, or a codon to jump to).
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            let cmd = cmd.trim();
            match cmd {
                "q" | "quit" => self.should_quit = true,
                _ => match cmd.parse::<Codon>() {
                    Ok(codon) => {
                        if !self.goto_codon(codon) {
                            self.status_message = Some(format!("Codon {} not observed", codon));
                        }
                    }
                    Err(_) => {
                        self.status_message = Some(format!("Unknown command: {}", cmd));
                    }
                },
            }
        }
        self.mode = AppMode::Normal;
    }

    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}
