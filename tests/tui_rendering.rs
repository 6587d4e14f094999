// ABOUTME: E2E tests for TUI rendering using ratatui's TestBackend.
// ABOUTME: Verifies the TUI renders chat messages, status bar, and the masked key prompt.

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use scout::session::GREETING;
use scout::tui::state::{ChatMessageKind, TuiState};
use scout::tui::ui;

/// Extract a single row of text from the terminal buffer as a String.
fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    let width = buf.area.width;
    (0..width)
        .map(|x| {
            buf.cell((x, y))
                .map(|c| c.symbol().chars().next().unwrap_or(' '))
                .unwrap_or(' ')
        })
        .collect()
}

/// Extract all text from the terminal buffer as a single string (rows joined by newlines).
fn all_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let height = buf.area.height;
    (0..height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn chat_state() -> TuiState {
    TuiState::new("llama3-8b-8192".to_string(), 3, false)
}

/// Rendering an empty chat state should produce a header line containing
/// "scout", verifying the full rendering pipeline from state through layout
/// to buffer output.
#[test]
fn renders_header() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let header = row_text(&terminal, 0);
    assert!(
        header.contains("scout"),
        "header should contain 'scout', got: {:?}",
        header,
    );
}

/// The seeded greeting should be visible in the transcript area.
#[test]
fn renders_greeting() {
    let backend = TestBackend::new(100, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    state.push_message(ChatMessageKind::Assistant, GREETING.to_string());

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let text = all_text(&terminal);
    assert!(
        text.contains("search the web"),
        "greeting should be rendered, got:\n{}",
        text,
    );
}

/// After pushing a User message, the rendered buffer should contain the "❯"
/// prefix and the message text.
#[test]
fn renders_user_message() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    state.push_message(ChatMessageKind::User, "What is Rust?".to_string());

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let text = all_text(&terminal);
    assert!(text.contains("❯"), "missing user prefix, got:\n{}", text);
    assert!(
        text.contains("What is Rust?"),
        "missing user text, got:\n{}",
        text,
    );
}

/// An error-fallback assistant message renders like any other reply.
#[test]
fn renders_error_fallback_reply() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    state.push_message(ChatMessageKind::User, "q".to_string());
    state.push_message(ChatMessageKind::Assistant, "❌ Error: boom".to_string());

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let text = all_text(&terminal);
    assert!(text.contains("Error: boom"), "got:\n{}", text);
}

/// The status bar (last row) should display the model name, tool count, and
/// formatted token count.
#[test]
fn renders_status_bar() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    state.total_tokens = 1500;

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let status = row_text(&terminal, 23);
    assert!(status.contains("llama3-8b-8192"), "got: {:?}", status);
    assert!(status.contains("3 tools"), "got: {:?}", status);
    assert!(status.contains("1.5k"), "got: {:?}", status);
}

/// In key-entry mode the prompt is shown and the typed key is never echoed —
/// only mask bullets appear in the buffer.
#[test]
fn key_entry_mode_masks_the_key() {
    let backend = TestBackend::new(100, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = TuiState::new("llama3-8b-8192".to_string(), 3, true);
    state.input = "gsk_supersecret".to_string();
    state.cursor_pos = state.input.chars().count();

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let text = all_text(&terminal);
    assert!(text.contains("API KEY:"), "key prompt missing, got:\n{}", text);
    assert!(
        !text.contains("gsk_supersecret"),
        "the key must never be echoed, got:\n{}",
        text,
    );
    assert!(text.contains("•••"), "mask bullets missing, got:\n{}", text);
}

/// A narrow terminal must not panic the layout math.
#[test]
fn narrow_terminal_does_not_panic() {
    let backend = TestBackend::new(20, 10);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    state.push_message(
        ChatMessageKind::Assistant,
        "a fairly long answer that will certainly wrap at this width".to_string(),
    );

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();
}

/// Long transcripts stay pinned to the bottom: the most recent message is
/// visible without manual scrolling.
#[test]
fn long_transcript_shows_latest_message() {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();

    let mut state = chat_state();
    for i in 0..30 {
        state.push_message(ChatMessageKind::User, format!("question number {i}"));
        state.push_message(ChatMessageKind::Assistant, format!("answer number {i}"));
    }

    terminal
        .draw(|frame| ui::render(frame, &mut state))
        .unwrap();

    let text = all_text(&terminal);
    assert!(
        text.contains("answer number 29"),
        "latest message should be visible, got:\n{}",
        text,
    );
    assert!(!text.contains("question number 0"));
}
