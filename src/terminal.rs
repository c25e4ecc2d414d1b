use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::ResetColor,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::time::Duration;

/// Alternate screen plus raw mode for the lifetime of the animation.
pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;
        Ok(Self { out })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All), cursor::Show, LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

/// Non-blocking: true once any key has been pressed.
pub(crate) fn key_pressed() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
