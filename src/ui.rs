//! TUI rendering of the frequency heatmap.
//!
//! Layout:
//! - Sticky amino acid labels on the left
//! - Codon header and shaded frequency cells on the right
//! - Status bar with mode, cursor cell details and position

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::genetic_code::three_letter;
use crate::model::{AppMode, AppState};

/// Width reserved for amino acid labels (including borders).
const LABEL_PANEL_WIDTH: u16 = 11;
/// Minimum width for the matrix panel.
const MIN_MATRIX_PANEL_WIDTH: u16 = 10;
/// Characters per matrix cell.
const CELL_WIDTH: usize = 6;
/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Lines taken by the codon header inside the matrix panel.
const HEADER_HEIGHT: u16 = 1;

/// Background color for a frequency in [0, 1].
pub fn heat_color(frequency: f64) -> Color {
    match frequency {
        f if f < 0.2 => Color::Blue,
        f if f < 0.4 => Color::Cyan,
        f if f < 0.6 => Color::Green,
        f if f < 0.8 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LABEL_PANEL_WIDTH),
            Constraint::Min(MIN_MATRIX_PANEL_WIDTH),
        ])
        .split(main_layout[0]);

    render_labels_panel(frame, state, content_layout[0]);
    render_matrix_panel(frame, state, content_layout[1]);
    render_status_bar(frame, state, main_layout[1]);
}

/// Visible row indices, bounded by the matrix.
fn visible_rows(state: &AppState) -> std::ops::Range<usize> {
    let range = state.viewport.row_range();
    range.start..range.end.min(state.matrix.row_count())
}

/// Visible column indices, bounded by the matrix.
fn visible_cols(state: &AppState) -> std::ops::Range<usize> {
    let range = state.viewport.col_range();
    range.start..range.end.min(state.matrix.column_count())
}

/// Renders the amino acid labels (sticky, always visible).
fn render_labels_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = vec![Line::from("")];

    for row_idx in visible_rows(state) {
        let aa = state.matrix.amino_acids()[row_idx];
        let label = format!("{} {}", aa, three_letter(aa));
        let style = if row_idx == state.cursor.row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    let block = Block::default().borders(Borders::ALL).title("AA");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders the codon header and the frequency cells.
fn render_matrix_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let glyphs = &state.glyphs;
    let cols = visible_cols(state);

    let header: Vec<Span> = cols
        .clone()
        .map(|col_idx| {
            let codon = state.matrix.codons()[col_idx];
            let style = if col_idx == state.cursor.col {
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Span::styled(format!("{:^width$}", codon.as_str(), width = CELL_WIDTH), style)
        })
        .collect();

    let mut lines: Vec<Line> = vec![Line::from(header)];

    for row_idx in visible_rows(state) {
        let spans: Vec<Span> = cols
            .clone()
            .map(|col_idx| {
                let is_cursor = row_idx == state.cursor.row && col_idx == state.cursor.col;
                let (text, style) = match state.matrix.frequency(row_idx, col_idx) {
                    Some(f) => (
                        format!("{}{:.2} ", glyphs.shade(f), f),
                        Style::default().fg(Color::Black).bg(heat_color(f)),
                    ),
                    None => (
                        format!("{:^width$}", glyphs.empty_cell, width = CELL_WIDTH),
                        Style::default().fg(Color::DarkGray),
                    ),
                };
                let style = if is_cursor {
                    style.bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD)
                } else {
                    style
                };
                Span::styled(text, style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let left = if cols.start > 0 { glyphs.arrow_left } else { " " };
    let right = if cols.end < state.matrix.column_count() {
        glyphs.arrow_right
    } else {
        " "
    };
    let title = format!(
        "{} {} Codons {}-{}/{} {}",
        state.source,
        left,
        cols.start + 1,
        cols.end,
        state.matrix.column_count(),
        right
    );

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Describes the cursor cell for the status bar.
pub fn cell_summary(state: &AppState) -> String {
    match state.current_cell() {
        Some(row) => format!(
            "{} ({}) {} count {} freq {:.4}",
            row.amino_acid,
            three_letter(row.amino_acid),
            row.codon,
            row.count,
            row.frequency
        ),
        None => {
            let aa = state.matrix.amino_acids().get(state.cursor.row).copied();
            let codon = state.matrix.codons().get(state.cursor.col);
            match (aa, codon) {
                (Some(aa), Some(codon)) => format!("{} does not encode {}", codon, aa),
                _ => String::new(),
            }
        }
    }
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let left_content = match &state.mode {
        AppMode::Normal => {
            let message = state
                .status_message
                .clone()
                .unwrap_or_else(|| cell_summary(state));
            format!(" NORMAL | {} ", message)
        }
        AppMode::Command(cmd) => format!(" COMMAND | :{} ", cmd),
    };

    let position_info = format!(
        "AA {}/{} {} Codon {}/{} ",
        state.cursor.row + 1,
        state.matrix.row_count(),
        state.glyphs.h_separator,
        state.cursor.col + 1,
        state.matrix.column_count()
    );

    let used = left_content.chars().count() + position_info.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(used)),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Calculates how many matrix rows and cells fit in the terminal.
pub fn calculate_visible_dimensions(terminal_width: u16, terminal_height: u16) -> (usize, usize) {
    let inner_width = terminal_width.saturating_sub(LABEL_PANEL_WIDTH + 2) as usize;
    let visible_cols = inner_width / CELL_WIDTH;
    let visible_rows =
        terminal_height.saturating_sub(STATUS_BAR_HEIGHT + 2 + HEADER_HEIGHT) as usize;
    (visible_rows, visible_cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count_codons;
    use crate::frequency::analyze_codon_counts;
    use crate::heatmap::FrequencyMatrix;

    #[test]
    fn test_heat_colors() {
        assert_eq!(heat_color(0.05), Color::Blue);
        assert_eq!(heat_color(0.25), Color::Cyan);
        assert_eq!(heat_color(0.5), Color::Green);
        assert_eq!(heat_color(0.75), Color::Yellow);
        assert_eq!(heat_color(1.0), Color::Red);
    }

    #[test]
    fn test_visible_dimensions() {
        let (rows, cols) = calculate_visible_dimensions(100, 30);
        // (100 - 11 - 2) / 6 = 14 cells
        // 30 - 1 (status) - 2 (borders) - 1 (header) = 26 rows
        assert_eq!(cols, 14);
        assert_eq!(rows, 26);
        assert_eq!(calculate_visible_dimensions(5, 2), (0, 0));
    }

    #[test]
    fn test_cell_summary() {
        let table = analyze_codon_counts(&count_codons(["ATGGCTATGGCCATG"])).unwrap();
        let mut state = AppState::new(
            FrequencyMatrix::from_table(&table),
            "t.csv".to_string(),
            glyphs::select(false),
        );

        assert_eq!(cell_summary(&state), "A (Ala) GCC count 1 freq 0.5000");
        state.goto_first_column();
        assert_eq!(cell_summary(&state), "ATG does not encode A");
    }
}
