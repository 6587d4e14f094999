// ABOUTME: TUI module — ratatui full-screen interface for scout.
// ABOUTME: Terminal lifecycle, chat display, input handling, and the API-key gate.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;

pub use state::*;

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal for the lifetime of the UI: raw mode plus the alternate
/// screen, restored on drop even if the event loop errors out.
pub struct Tui {
    terminal: Terminal,
}

impl Tui {
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = ratatui::Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn restore(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
