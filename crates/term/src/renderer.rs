//! Renderer: diffs the frame pair and flushes the changes to a terminal.
//!
//! One `Renderer` is one terminal session. The application draws into the
//! "next" grid, then calls [`Renderer::render_frame`] once per frame. Output
//! for a frame is accumulated in memory and written with a single
//! `write_all` + `flush`, so the terminal never sees half a frame.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use termgrid_core::{DrawError, FrameBuffer, FramePair};
use termgrid_types::{Cell, Style};

use crate::caps::Capabilities;
use crate::sgr::RenderState;

/// What one call to [`Renderer::render_frame`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Cells that differed and were rewritten.
    pub cells_written: usize,
    /// Bytes handed to the terminal.
    pub bytes_written: usize,
    /// The grid was reshaped (and the screen cleared) after this frame.
    pub resized: bool,
}

pub struct Renderer<W: Write> {
    out: W,
    buf: Vec<u8>,
    frames: FramePair,
    state: RenderState,
    requested: (u16, u16),
    pending_clear: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, rows: u16, cols: u16, caps: Capabilities) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(64 * 1024),
            frames: FramePair::allocate(rows, cols),
            state: RenderState::new(caps),
            requested: (rows, cols),
            pending_clear: false,
        }
    }

    pub fn rows(&self) -> u16 {
        self.frames.rows()
    }

    pub fn cols(&self) -> u16 {
        self.frames.cols()
    }

    pub fn frames(&self) -> &FramePair {
        &self.frames
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Record the latest known terminal size.
    ///
    /// Applied after the next frame has been diffed and swapped, so a size
    /// change never corrupts a diff in progress.
    pub fn request_resize(&mut self, rows: u16, cols: u16) {
        self.requested = (rows, cols);
    }

    /// Forget what the screen shows: both grids are blanked and the next
    /// frame starts with a physical clear.
    pub fn invalidate(&mut self) {
        debug!("invalidating screen");
        self.frames.clear_all();
        self.pending_clear = true;
    }

    pub fn write_cell(&mut self, x: u16, y: u16, cell: Cell) -> Result<(), DrawError> {
        self.frames.write_cell(x, y, cell)
    }

    pub fn draw_cell(
        &mut self,
        x: u16,
        y: u16,
        style: &Style,
        ch: char,
    ) -> Result<(), DrawError> {
        self.frames.draw_cell(x, y, style, ch)
    }

    pub fn draw_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: &Style,
    ) -> Result<usize, DrawError> {
        self.frames.draw_str(x, y, text, style)
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, cell: &Cell) {
        self.frames.fill_rect(x, y, w, h, cell);
    }

    /// Flush the difference between "previous" and "next" to the terminal.
    ///
    /// A write error is returned as-is; the terminal is assumed gone and the
    /// caller should stop its loop.
    pub fn render_frame(&mut self) -> Result<FrameStats> {
        self.buf.clear();

        if self.pending_clear {
            self.state.clear_screen(&mut self.buf)?;
            self.pending_clear = false;
        }

        let cells_written = encode_diff_into(&self.frames, &mut self.state, &mut self.buf)?;

        self.frames.clear_previous();
        self.frames.swap();

        let (rows, cols) = self.requested;
        let resized = self.frames.resize(rows, cols);
        if resized {
            self.state.clear_screen(&mut self.buf)?;
        }

        self.flush_buf()?;

        Ok(FrameStats {
            cells_written,
            bytes_written: self.buf.len(),
            resized,
        })
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out
            .write_all(&self.buf)
            .context("terminal write failed")?;
        self.out.flush().context("terminal flush failed")?;
        Ok(())
    }
}

/// Encode the cells of "next" that differ from "previous" into `out`.
///
/// Returns the number of cells written.
fn encode_diff_into(
    frames: &FramePair,
    state: &mut RenderState,
    out: &mut Vec<u8>,
) -> Result<usize> {
    let (prev, next) = (frames.previous(), frames.next());
    let cols = next.cols();
    let mut written = 0;

    for_each_changed_run(prev, next, |x, y, len| {
        state.move_to(out, x, y)?;
        for dx in 0..len {
            let Some(cell) = next.get(x + dx, y) else {
                break;
            };
            state.apply_style(out, &cell.style)?;
            out.extend_from_slice(cell.glyph.as_str().as_bytes());
            state.glyph_written(cols);
            written += 1;
        }
        Ok(())
    })?;

    Ok(written)
}

/// Call `f(x, y, len)` for every horizontal run of cells that differ.
///
/// Both grids have the same shape; `FramePair` reshapes them together.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    debug_assert_eq!(prev.shape(), next.shape());

    let w = next.cols();
    for y in 0..next.rows() {
        let (Some(a), Some(b)) = (prev.row(y), next.row(y)) else {
            continue;
        };
        let mut x = 0usize;
        while x < w as usize {
            if a[x] == b[x] {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w as usize && a[x] != b[x] {
                x += 1;
            }
            f(start as u16, y, (x - start) as u16)?;
        }
    }

    Ok(())
}
