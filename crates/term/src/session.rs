//! Terminal session lifecycle: raw mode, alternate screen, size queries.
//!
//! This is the thin collaborator around the renderer. It configures the real
//! terminal through crossterm and hands the usable grid size to the caller;
//! the renderer never calls into it.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::style::{Attribute, SetAttribute};
use crossterm::{cursor, terminal, QueueableCommand};
use tracing::{debug, warn};

/// Fallback when the terminal does not report a size.
pub const FALLBACK_SIZE: (u16, u16) = (24, 80);

pub struct Terminal {
    stdout: io::Stdout,
    buf: Vec<u8>,
    active: bool,
}

impl Terminal {
    /// Enter raw mode and the alternate screen.
    ///
    /// Returns the session and the grid size as (rows, cols).
    pub fn enter() -> Result<(Self, (u16, u16))> {
        let mut term = Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(256),
            active: false,
        };

        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        term.active = true;

        term.buf.clear();
        term.buf.queue(terminal::EnterAlternateScreen)?;
        term.buf.queue(cursor::Hide)?;
        term.buf.queue(terminal::DisableLineWrap)?;
        term.buf.queue(SetAttribute(Attribute::Reset))?;
        term.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        term.buf.queue(cursor::MoveTo(0, 0))?;
        term.flush_buf()?;

        let size = Self::size()?;
        debug!(rows = size.0, cols = size.1, "terminal session started");
        Ok((term, size))
    }

    /// Current grid size as (rows, cols).
    pub fn size() -> Result<(u16, u16)> {
        let (cols, rows) = terminal::size().context("failed to query terminal size")?;
        if rows == 0 || cols == 0 {
            return Ok(FALLBACK_SIZE);
        }
        Ok((rows, cols))
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        self.buf.clear();
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.buf.queue(cursor::MoveTo(0, 0))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        debug!("terminal session ended");
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}
