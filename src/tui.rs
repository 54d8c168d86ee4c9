//! Terminal implementation of [`Prompt`].
//!
//! Choices are drawn full screen with ratatui; the final yes/no question is
//! asked inline so the rename plan printed above it stays visible.

mod events;
mod models;
mod rendering;

use std::io::{self, Write};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::PromptError;
use crate::prompt::Prompt;
use events::{read_confirm, run_select};
use models::SelectState;

#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

/// Undoes whatever terminal setup has been done so far when dropped, so an
/// error halfway through setup never leaves the terminal in raw mode.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
    alternate_screen: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            raw_mode: false,
            alternate_screen: false,
        }
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw_mode = true;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen)?;
        self.alternate_screen = true;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Restore terminal
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen {
            let _ = execute!(self.out, LeaveAlternateScreen, Show);
        }
    }
}

impl Prompt for TerminalPrompt {
    fn select(&mut self, message: &str, labels: &[String], default: usize) -> Result<usize, PromptError> {
        if labels.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "nothing to choose from").into());
        }

        let mut state = SelectState::new(message, labels, default);

        let res = {
            let mut guard = TerminalGuard::new(io::stdout());
            guard.enable_raw_mode()?;
            guard.enter_alternate_screen()?;
            let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
            run_select(&mut terminal, &mut state)
        };

        let index = res?;
        println!("? {} {}", message, state.selected_label().unwrap_or_default());
        Ok(index)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        let mut stdout = io::stdout();
        write!(stdout, "? {} {} ", message, hint)?;
        stdout.flush()?;

        let res = {
            let mut guard = TerminalGuard::new(io::sink());
            guard.enable_raw_mode()?;
            read_confirm(default)
        };

        match res {
            Ok(answer) => {
                writeln!(stdout, "{}", if answer { "Yes" } else { "No" })?;
                Ok(answer)
            }
            Err(e) => {
                writeln!(stdout)?;
                Err(e)
            }
        }
    }
}
