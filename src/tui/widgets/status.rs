// ABOUTME: Status bar widget — renders model name, tool count, token usage, and streaming indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Render the status bar line with model, tools, tokens, and streaming state.
pub fn status_line(
    model: &str,
    tool_count: usize,
    total_tokens: u64,
    streaming: bool,
) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(format!(" {} ", model), Style::default().fg(Color::Cyan)),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} tools ", tool_count),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} tokens ", format_tokens(total_tokens)),
            Style::default().fg(Color::White),
        ),
    ];

    if streaming {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            "thinking... ",
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(spans)
}

/// Format a token count for display: small numbers as-is, thousands as X.Xk, millions as X.XM.
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}
