// ABOUTME: TUI state types — chat messages, agent/user events, input buffer, and key-entry mode.
// ABOUTME: Drives the TUI rendering and bridges the agent loop to the display.

use std::time::Instant;

/// The kind of a single chat message displayed in the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessageKind {
    User,
    Assistant,
    ToolCall {
        tool_name: String,
        status: ToolCallStatus,
    },
    ToolResult {
        is_error: bool,
    },
    System,
}

/// Status of a tool call as it executes.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallStatus {
    Running,
    Done,
    Failed,
}

/// A single message in the displayed chat history.
#[derive(Debug)]
pub struct ChatMessage {
    pub kind: ChatMessageKind,
    pub content: String,
}

/// Events sent from the agent loop to the TUI via an mpsc channel.
#[derive(Debug)]
pub enum AgentEvent {
    /// Streaming text delta from the model.
    TextDelta(String),
    /// Streaming text is complete.
    TextDone,
    /// A tool call has started execution.
    ToolCallStarted {
        tool_name: String,
        params_summary: String,
    },
    /// A tool call completed with a result.
    ToolResult {
        tool_name: String,
        content: String,
        is_error: bool,
    },
    /// Token usage update from a completed API response.
    Usage {
        prompt_tokens: u32,
        completion_tokens: u32,
    },
    /// The definitive assistant reply for the turn — the agent's answer, or
    /// the formatted error fallback when the turn failed.
    Reply { content: String, is_error: bool },
    /// A turn was attempted without an API key; interaction must be gated
    /// until one is supplied.
    KeyRequired,
    /// The agent loop finished processing the turn.
    Done,
}

/// Events sent from the TUI to the agent loop.
#[derive(Debug)]
pub enum UserEvent {
    /// User supplied (or replaced) the API key.
    ApiKey(String),
    /// User submitted a chat message.
    Message(String),
    /// User requested to quit.
    Quit,
}

/// What the input line is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Masked API-key entry; chat is gated until a non-empty key arrives.
    ApiKeyEntry,
    /// Normal chat input.
    Chat,
}

/// Full TUI application state.
pub struct TuiState {
    pub mode: Mode,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub streaming: bool,
    pub queued_message: Option<String>,
    pub model: String,
    pub tool_count: usize,
    pub total_tokens: u64,
    pub session_start: Instant,
}

impl TuiState {
    /// Create a new TUI state. Starts in key-entry mode when no ambient API
    /// key was found at startup.
    pub fn new(model: String, tool_count: usize, needs_key: bool) -> Self {
        Self {
            mode: if needs_key {
                Mode::ApiKeyEntry
            } else {
                Mode::Chat
            },
            messages: Vec::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            streaming: false,
            queued_message: None,
            model,
            tool_count,
            total_tokens: 0,
            session_start: Instant::now(),
        }
    }

    /// Add a message to the chat history and reset scroll to bottom.
    pub fn push_message(&mut self, kind: ChatMessageKind, content: String) {
        self.messages.push(ChatMessage { kind, content });
        self.scroll_offset = 0;
    }

    /// Append text to the last assistant message, or create a new one if needed.
    pub fn append_to_last_assistant(&mut self, text: &str) {
        if let Some(msg) = self.messages.last_mut()
            && msg.kind == ChatMessageKind::Assistant
        {
            msg.content.push_str(text);
            self.scroll_offset = 0;
            return;
        }
        self.push_message(ChatMessageKind::Assistant, text.to_string());
    }

    /// Settle the trailing assistant message to the turn's definitive reply.
    /// Streaming deltas may already have built it up; the reply from the
    /// agent loop is authoritative (and is the only content on error turns).
    pub fn finish_assistant(&mut self, content: String) {
        if let Some(msg) = self.messages.last_mut()
            && msg.kind == ChatMessageKind::Assistant
        {
            msg.content = content;
            self.scroll_offset = 0;
            return;
        }
        self.push_message(ChatMessageKind::Assistant, content);
    }

    /// Update the status of the most recent tool call message matching the
    /// given tool name.
    pub fn update_tool_status(&mut self, tool_name: &str, new_status: ToolCallStatus) {
        for msg in self.messages.iter_mut().rev() {
            if let ChatMessageKind::ToolCall {
                tool_name: ref name,
                ref mut status,
            } = msg.kind
                && name == tool_name
            {
                *status = new_status;
                return;
            }
        }
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to start of input.
    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to end of input.
    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }

    /// The input buffer split into logical lines.
    pub fn input_lines(&self) -> Vec<&str> {
        self.input.split('\n').collect()
    }

    /// Number of logical lines in the input buffer.
    pub fn input_line_count(&self) -> usize {
        self.input.split('\n').count()
    }

    /// The (line, column) of the cursor, both in characters.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for c in self.input.chars().take(self.cursor_pos) {
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Move the cursor up one logical input line, preserving the column where
    /// possible. Returns false when already on the first line.
    pub fn move_cursor_up_in_input(&mut self) -> bool {
        self.clamp_cursor();
        let (line, col) = self.cursor_line_col();
        if line == 0 {
            return false;
        }
        self.set_cursor_line_col(line - 1, col);
        true
    }

    /// Move the cursor down one logical input line, preserving the column
    /// where possible. Returns false when already on the last line.
    pub fn move_cursor_down_in_input(&mut self) -> bool {
        self.clamp_cursor();
        let (line, col) = self.cursor_line_col();
        if line + 1 >= self.input_line_count() {
            return false;
        }
        self.set_cursor_line_col(line + 1, col);
        true
    }

    /// Place the cursor at the given line, clamping the column to the line's
    /// character length.
    fn set_cursor_line_col(&mut self, target_line: usize, col: usize) {
        let mut char_pos = 0;
        for (i, text) in self.input.split('\n').enumerate() {
            let line_len = text.chars().count();
            if i == target_line {
                self.cursor_pos = char_pos + col.min(line_len);
                return;
            }
            char_pos += line_len + 1; // +1 for the newline
        }
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_state() -> TuiState {
        TuiState::new("test-model".to_string(), 3, false)
    }

    #[test]
    fn new_state_without_key_starts_in_key_entry() {
        let state = TuiState::new("m".to_string(), 3, true);
        assert_eq!(state.mode, Mode::ApiKeyEntry);
        assert!(state.messages.is_empty());
        assert!(!state.streaming);
    }

    #[test]
    fn new_state_with_key_starts_in_chat() {
        let state = chat_state();
        assert_eq!(state.mode, Mode::Chat);
        assert_eq!(state.model, "test-model");
        assert_eq!(state.tool_count, 3);
        assert_eq!(state.total_tokens, 0);
    }

    #[test]
    fn push_message_auto_scrolls() {
        let mut state = chat_state();
        state.scroll_offset = 10;
        state.push_message(ChatMessageKind::User, "hello".to_string());
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn append_to_streaming_message() {
        let mut state = chat_state();
        state.push_message(ChatMessageKind::Assistant, "Hello".to_string());
        state.append_to_last_assistant(" world");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "Hello world");
    }

    #[test]
    fn append_creates_new_if_no_assistant() {
        let mut state = chat_state();
        state.push_message(ChatMessageKind::User, "hi".to_string());
        state.append_to_last_assistant("response");
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].kind, ChatMessageKind::Assistant);
    }

    #[test]
    fn finish_assistant_replaces_streamed_content() {
        let mut state = chat_state();
        state.append_to_last_assistant("partial stre");
        state.finish_assistant("The full answer.".to_string());
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "The full answer.");
    }

    #[test]
    fn finish_assistant_creates_message_on_error_turn() {
        let mut state = chat_state();
        state.push_message(ChatMessageKind::User, "q".to_string());
        state.finish_assistant("❌ Error: boom".to_string());
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].kind, ChatMessageKind::Assistant);
        assert_eq!(state.messages[1].content, "❌ Error: boom");
    }

    #[test]
    fn update_tool_status_hits_most_recent() {
        let mut state = chat_state();
        state.push_message(
            ChatMessageKind::ToolCall {
                tool_name: "search".to_string(),
                status: ToolCallStatus::Running,
            },
            "query".to_string(),
        );
        state.update_tool_status("search", ToolCallStatus::Done);
        assert_eq!(
            state.messages[0].kind,
            ChatMessageKind::ToolCall {
                tool_name: "search".to_string(),
                status: ToolCallStatus::Done,
            }
        );
    }

    #[test]
    fn submit_input_clears_buffer() {
        let mut state = chat_state();
        state.input = "  hello world  ".to_string();
        state.cursor_pos = 10;
        let result = state.submit_input();
        assert_eq!(result, Some("hello world".to_string()));
        assert_eq!(state.input, "");
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn submit_empty_input_returns_none() {
        let mut state = chat_state();
        state.input = "   ".to_string();
        assert_eq!(state.submit_input(), None);
        // Input is NOT cleared when empty
        assert_eq!(state.input, "   ");
    }

    #[test]
    fn utf8_input_editing_is_safe() {
        let mut state = chat_state();
        state.insert_char_at_cursor('a');
        state.insert_char_at_cursor('🙂');
        state.insert_char_at_cursor('é');
        assert_eq!(state.input, "a🙂é");
        assert_eq!(state.cursor_pos, 3);

        state.move_cursor_left();
        state.backspace_char();
        assert_eq!(state.input, "aé");
        assert_eq!(state.cursor_pos, 1);

        state.delete_char_at_cursor();
        assert_eq!(state.input, "a");
        assert_eq!(state.cursor_pos, 1);
    }

    #[test]
    fn clamp_cursor_handles_out_of_range_positions() {
        let mut state = chat_state();
        state.input = "hi🙂".to_string();
        state.cursor_pos = 999;
        state.clamp_cursor();
        assert_eq!(state.cursor_pos, 3);
        assert_eq!(state.cursor_byte_index(), state.input.len());
    }

    #[test]
    fn cursor_line_col_tracks_newlines() {
        let mut state = chat_state();
        state.input = "abc\ndef".to_string();
        state.cursor_pos = 5; // on 'e'
        assert_eq!(state.cursor_line_col(), (1, 1));
    }

    #[test]
    fn cursor_moves_between_input_lines() {
        let mut state = chat_state();
        state.input = "abc\nlonger line".to_string();
        state.cursor_pos = 0;
        assert!(!state.move_cursor_up_in_input());

        state.cursor_pos = 9; // line 1, col 5
        assert!(state.move_cursor_up_in_input());
        assert_eq!(state.cursor_line_col(), (0, 3)); // clamped to line length

        assert!(state.move_cursor_down_in_input());
        assert_eq!(state.cursor_line_col(), (1, 3));

        assert!(!state.move_cursor_down_in_input());
    }
}
