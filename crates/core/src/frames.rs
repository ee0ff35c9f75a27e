//! Double buffer: what the terminal shows and what the next frame should show.
//!
//! Draw calls only ever touch "next". After a frame has been flushed the
//! renderer clears "previous" and swaps, so "next" becomes the baseline the
//! following frame is diffed against and the application starts from a blank
//! grid again.

use termgrid_types::{Cell, Glyph, Style};
use tracing::debug;

use crate::error::DrawError;
use crate::fb::FrameBuffer;

#[derive(Debug, Clone)]
pub struct FramePair {
    previous: FrameBuffer,
    next: FrameBuffer,
}

impl FramePair {
    /// Two blank grids of the same shape.
    pub fn allocate(rows: u16, cols: u16) -> Self {
        Self {
            previous: FrameBuffer::new(rows, cols),
            next: FrameBuffer::new(rows, cols),
        }
    }

    pub fn rows(&self) -> u16 {
        self.next.rows()
    }

    pub fn cols(&self) -> u16 {
        self.next.cols()
    }

    pub fn previous(&self) -> &FrameBuffer {
        &self.previous
    }

    pub fn next(&self) -> &FrameBuffer {
        &self.next
    }

    pub fn next_cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.next.get(x, y)
    }

    /// Reshape both grids together.
    ///
    /// No-op returning false when the shape is unchanged, so it is safe to
    /// call every frame. Otherwise both grids are blanked and true is
    /// returned; the screen no longer matches "previous" and the caller must
    /// clear it.
    pub fn resize(&mut self, rows: u16, cols: u16) -> bool {
        if self.next.shape() == (rows, cols) {
            return false;
        }
        debug!(
            from_rows = self.rows(),
            from_cols = self.cols(),
            rows,
            cols,
            "resizing frame buffers"
        );
        self.previous.resize(rows, cols);
        self.next.resize(rows, cols);
        true
    }

    /// Exchange the roles of the two grids without copying cells.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.next);
    }

    pub fn clear_previous(&mut self) {
        self.previous.clear();
    }

    pub fn clear_all(&mut self) {
        self.previous.clear();
        self.next.clear();
    }

    /// Write one cell into "next". Out-of-bounds writes are rejected.
    pub fn write_cell(&mut self, x: u16, y: u16, cell: Cell) -> Result<(), DrawError> {
        self.next.set(x, y, cell)
    }

    /// Draw one character into "next".
    ///
    /// Control characters are rejected like out-of-bounds cells and leave
    /// the grid untouched.
    pub fn draw_cell(&mut self, x: u16, y: u16, style: &Style, ch: char) -> Result<(), DrawError> {
        let glyph = Glyph::from_char(ch).ok_or(DrawError::InvalidGlyph { x, y, ch })?;
        self.write_cell(x, y, Cell::new(glyph, style.clone()))
    }

    /// Draw `text` left to right starting at (x, y), one cell per char.
    ///
    /// Stops at the first cell outside the grid or the first control
    /// character: the prefix before it stays drawn and the error is returned. On success returns the number of
    /// cells written.
    pub fn draw_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        style: &Style,
    ) -> Result<usize, DrawError> {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let cx = u16::try_from(i)
                .ok()
                .and_then(|dx| x.checked_add(dx))
                .ok_or(DrawError::OutOfBounds {
                    x: u16::MAX,
                    y,
                    cols: self.cols(),
                    rows: self.rows(),
                })?;
            self.draw_cell(cx, y, style, ch)?;
            written += 1;
        }
        Ok(written)
    }

    /// Fill the in-bounds part of a rectangle of "next".
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, cell: &Cell) {
        self.next.fill_rect(x, y, w, h, cell);
    }
}
