// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Routes between API-key entry, streaming, and normal chat modes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::{Mode, TuiState};

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User submitted a chat message.
    Send(String),
    /// User submitted an API key.
    SubmitKey(String),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    // PageUp/PageDown always scroll, regardless of mode.
    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    // Key entry gates everything else.
    if state.mode == Mode::ApiKeyEntry {
        return handle_key_entry(state, key);
    }

    // Up/Down scroll the chat during streaming; the input stays editable so
    // a follow-up can be typed and queued.
    if state.streaming {
        match key.code {
            KeyCode::Up => {
                state.scroll_offset = state.scroll_offset.saturating_add(1);
                return InputResult::None;
            }
            KeyCode::Down => {
                state.scroll_offset = state.scroll_offset.saturating_sub(1);
                return InputResult::None;
            }
            KeyCode::Enter if !key.modifiers.contains(KeyModifiers::SHIFT) => {
                if let Some(text) = state.submit_input() {
                    state.queued_message = Some(text);
                }
                return InputResult::None;
            }
            _ => return handle_edit_key(state, key),
        }
    }

    // Context-aware Up/Down in normal input mode: move cursor within multiline
    // input first, then fall back to chat scrolling.
    match key.code {
        KeyCode::Up => {
            if !state.move_cursor_up_in_input() {
                state.scroll_offset = state.scroll_offset.saturating_add(1);
            }
            return InputResult::None;
        }
        KeyCode::Down => {
            if !state.move_cursor_down_in_input() {
                state.scroll_offset = state.scroll_offset.saturating_sub(1);
            }
            return InputResult::None;
        }
        _ => {}
    }

    // Normal input mode
    match key.code {
        // Shift+Enter inserts a newline into the input buffer.
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Enter => {
            if let Some(text) = state.submit_input() {
                InputResult::Send(text)
            } else {
                InputResult::None
            }
        }
        KeyCode::Esc => InputResult::Quit,
        _ => handle_edit_key(state, key),
    }
}

/// Handle key events while the masked API-key prompt is active.
fn handle_key_entry(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Enter => {
            if let Some(key_text) = state.submit_input() {
                state.mode = Mode::Chat;
                InputResult::SubmitKey(key_text)
            } else {
                InputResult::None
            }
        }
        KeyCode::Esc => InputResult::Quit,
        _ => handle_edit_key(state, key),
    }
}

/// Shared character-level editing for both input modes.
fn handle_edit_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        _ => InputResult::None,
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            true
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            true
        }
        _ => false,
    }
}
