//! Keyboard event handling for the heatmap viewer.
//!
//! - `h/j/k/l` or arrow keys: move the cursor cell
//! - `0` or `Home`: first codon column
//! - `$` or `End`: last codon column
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit
//!   - `:<codon>`: jump to that codon's cell
//! - `q` or `Ctrl+C`: quit

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use crate::model::{AppMode, AppState};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GotoFirstColumn,
    GotoLastColumn,
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    ExecuteCommand,
    CancelCommand,
    CommandBackspace,
    /// Terminal resized
    Resize(u16, u16),
}

/// Polls for terminal events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on the current mode.
pub fn handle_event(event: Event, mode: &AppMode) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

fn handle_key_event(key: KeyEvent, mode: &AppMode) -> Action {
    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) => handle_command_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('l') | KeyCode::Right => Action::MoveRight,
        KeyCode::Char('h') | KeyCode::Left => Action::MoveLeft,
        KeyCode::Char('0') | KeyCode::Home => Action::GotoFirstColumn,
        KeyCode::Char('$') | KeyCode::End => Action::GotoLastColumn,
        KeyCode::Char(':') => Action::EnterCommandMode,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the viewer state.
///
/// Returns `true` if the viewer should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    // Status messages last until the next key
    if action != Action::None && !matches!(action, Action::Resize(_, _)) {
        state.status_message = None;
    }

    match action {
        Action::None => {}
        Action::Quit => state.should_quit = true,
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::MoveLeft => state.move_left(),
        Action::MoveRight => state.move_right(),
        Action::GotoFirstColumn => state.goto_first_column(),
        Action::GotoLastColumn => state.goto_last_column(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::CommandChar(c) => state.command_input(c),
        Action::ExecuteCommand => state.execute_command(),
        Action::CancelCommand => state.cancel_command(),
        Action::CommandBackspace => state.command_backspace(),
        Action::Resize(_, _) => {
            // Viewport is recomputed by the controller from the real terminal size
        }
    }

    !state.should_quit
}
