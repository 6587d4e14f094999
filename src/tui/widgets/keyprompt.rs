// ABOUTME: API-key prompt widget — inline TUI prompt shown while chat is gated.
// ABOUTME: The key itself is rendered masked; only its length is visible.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render the key prompt as two Lines: header and usage hint.
pub fn key_prompt_lines() -> Vec<Line<'static>> {
    let header = Line::from(vec![
        Span::styled(
            "API KEY: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Please enter your Groq API key to continue.",
            Style::default().fg(Color::White),
        ),
    ]);

    let hint = Line::from(Span::styled(
        "(Paste the key and press Enter. It is kept in memory for this session only.)",
        Style::default().fg(Color::DarkGray),
    ));

    vec![header, hint]
}

/// Mask an input buffer for display: one bullet per character.
pub fn masked(input: &str) -> String {
    "•".repeat(input.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_has_two_lines() {
        let lines = key_prompt_lines();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn header_mentions_the_key() {
        let lines = key_prompt_lines();
        let header_text: String = lines[0]
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(header_text.contains("API KEY:"));
        assert!(header_text.contains("Groq"));
    }

    #[test]
    fn hint_mentions_enter_and_memory() {
        let lines = key_prompt_lines();
        let hint_text: String = lines[1]
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(hint_text.contains("Enter"));
        assert!(hint_text.contains("memory"));
    }

    #[test]
    fn masked_hides_every_character() {
        assert_eq!(masked(""), "");
        assert_eq!(masked("abc"), "•••");
        assert_eq!(masked("gsk_🙂"), "•••••");
        assert!(!masked("secret").contains("secret"));
    }
}
