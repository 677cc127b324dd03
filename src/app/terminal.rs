use std::{
    io::{self, Stdout},
    sync::Once,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

static RESTORE_ON_PANIC: Once = Once::new();

/// Terminal owned by one running form: raw mode, the alternate screen and
/// bracketed paste so pasted text reaches the focused field in one event.
/// The previous mode comes back on drop and on panic.
pub struct FormTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
}

impl FormTerminal {
    pub fn open(tick_rate: Duration) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            leave_form_screen();
            return Err(err).context("failed to enter alternate screen");
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                leave_form_screen();
                return Err(err).context("failed to initialize terminal");
            }
        };
        RESTORE_ON_PANIC.call_once(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                leave_form_screen();
                previous(info);
            }));
        });
        tracing::debug!(tick_ms = tick_rate.as_millis() as u64, "form terminal opened");
        Ok(Self {
            terminal,
            tick_rate,
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(render)
            .context("failed to draw the form")?;
        Ok(())
    }

    /// Waits at most one tick. `None` means the form should just redraw.
    pub fn next_event(&self) -> Result<Option<Event>> {
        if !event::poll(self.tick_rate).context("failed to poll terminal events")? {
            return Ok(None);
        }
        event::read()
            .map(Some)
            .context("failed to read terminal event")
    }
}

impl Drop for FormTerminal {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        leave_form_screen();
        tracing::debug!("form terminal closed");
    }
}

fn leave_form_screen() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show);
}
