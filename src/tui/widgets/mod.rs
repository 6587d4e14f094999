// ABOUTME: TUI widget modules — chat transcript, status bar, and API-key prompt.

pub mod chat;
pub mod keyprompt;
pub mod status;
