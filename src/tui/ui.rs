// ABOUTME: Main TUI rendering function — assembles header, chat, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::{Mode, TuiState};
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::keyprompt::{key_prompt_lines, masked};
use crate::tui::widgets::status::status_line;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let key_entry = state.mode == Mode::ApiKeyEntry;

    // Maximum height the input area can grow to (in terminal rows).
    const MAX_INPUT_HEIGHT: u16 = 8;

    // Key entry is single-line; chat input grows with its line count.
    let input_height = if key_entry {
        3
    } else {
        // +2 accounts for top and bottom borders
        (state.input_line_count() as u16 + 2).clamp(3, MAX_INPUT_HEIGHT)
    };

    // Dynamic layout: insert a dedicated prompt area while the key is missing.
    let constraints = if key_entry {
        vec![
            Constraint::Length(1),            // Header
            Constraint::Min(3),               // Chat area
            Constraint::Length(2),            // Key prompt
            Constraint::Length(input_height), // Input area
            Constraint::Length(1),            // Status bar
        ]
    } else {
        vec![
            Constraint::Length(1),            // Header
            Constraint::Min(3),               // Chat area
            Constraint::Length(input_height), // Input area
            Constraint::Length(1),            // Status bar
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Header
    let header = Line::from(Span::styled(
        " 🔎 scout",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Chat area
    let chat_lines = render_chat_lines(&state.messages);

    let chat_chunk = chunks[1];
    let visible_height = chat_chunk.height;

    // Use ratatui's own line_count() to get an accurate wrapped line count
    // that exactly matches its internal rendering. This prevents scroll
    // miscalculations that could hide the bottom of chat content.
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(visible_height);

    // Cap scroll_offset so it can't go past the top of the content.
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);

    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Key prompt area (only while gated)
    let (input_chunk, status_chunk) = if key_entry {
        frame.render_widget(
            Paragraph::new(key_prompt_lines()).wrap(Wrap { trim: false }),
            chunks[2],
        );
        (chunks[3], chunks[4])
    } else {
        (chunks[2], chunks[3])
    };

    // Input area
    let border_style = if key_entry {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(border_style);

    // Show streaming/queued indicator in the input border title.
    if state.streaming {
        let title = if state.queued_message.is_some() {
            " message queued "
        } else {
            " thinking... "
        };
        input_block = input_block.title(Span::styled(title, Style::default().fg(Color::DarkGray)));
    }

    // The key is never echoed — only a bullet per character.
    let input_text = if key_entry {
        masked(&state.input)
    } else {
        state.input.clone()
    };

    let input = Paragraph::new(input_text).block(input_block);
    frame.render_widget(input, input_chunk);

    // Cursor position while editing.
    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();

        let (cursor_line, cursor_col) = if key_entry {
            (0, state.cursor_pos)
        } else {
            state.cursor_line_col()
        };

        // Compute the visual (display) width of the text before the cursor on its line.
        let visual_col = if key_entry {
            cursor_col // bullets are width 1 each
        } else {
            let lines = state.input_lines();
            let line_text = lines.get(cursor_line).copied().unwrap_or("");
            let prefix: String = line_text.chars().take(cursor_col).collect();
            UnicodeWidthStr::width(prefix.as_str())
        };

        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let clamped_visual_col = visual_col.min(max_visual_col);

        let cursor_x = input_chunk.x.saturating_add(clamped_visual_col as u16);
        // +1 for the top border, then offset by the cursor's line index.
        let cursor_y = input_chunk.y.saturating_add(1 + cursor_line as u16);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(
        &state.model,
        state.tool_count,
        state.total_tokens,
        state.streaming,
    );
    frame.render_widget(Paragraph::new(status), status_chunk);
}
