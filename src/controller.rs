//! Viewer controller.
//!
//! Orchestrates the heatmap viewer loop:
//! - Terminal initialization and cleanup
//! - Event polling and handling
//! - State updates and rendering

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::heatmap::FrequencyMatrix;
use crate::model::AppState;
use crate::table::read_table_file;
use crate::ui::{calculate_visible_dimensions, glyphs, render};

/// The viewer application.
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Takes over the terminal (raw mode, alternate screen).
    pub fn new(state: AppState) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        self.update_viewport_size()?;

        loop {
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, &self.state.mode);

                if let Action::Resize(_, _) = action {
                    self.update_viewport_size()?;
                }

                if !apply_action(&mut self.state, action) {
                    break;
                }
            }
        }

        Ok(())
    }

    fn update_viewport_size(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let (visible_rows, visible_cols) = calculate_visible_dimensions(size.width, size.height);
        self.state.update_viewport_size(visible_rows, visible_cols);
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Loads a persisted frequency table and opens the heatmap viewer on it.
///
/// The table is validated before the terminal is taken over, so load errors
/// are reported on a normal screen.
pub fn run_viewer<P: AsRef<Path>>(table_path: P, fancy_glyphs: bool) -> Result<()> {
    let path = table_path.as_ref();
    let table = read_table_file(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let state = AppState::new(
        FrequencyMatrix::from_table(&table),
        source,
        glyphs::select(fancy_glyphs),
    );
    let mut app = App::new(state)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_invalid_table_fails_before_terminal_setup() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "amino_acid,codon,count,frequency").unwrap();
        writeln!(file, "A,GCT,1,0.5").unwrap();
        file.flush().unwrap();

        let err = run_viewer(file.path(), false).unwrap_err();
        assert!(err.to_string().contains("Malformed frequency table"));
    }

    #[test]
    fn test_missing_table() {
        assert!(run_viewer("/nonexistent/table.csv", true).is_err());
    }
}
