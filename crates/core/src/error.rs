//! Recoverable errors reported by the core.

use thiserror::Error;

/// A draw call that could not be applied to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("cell ({x}, {y}) is outside the {cols}x{rows} grid")]
    OutOfBounds { x: u16, y: u16, cols: u16, rows: u16 },
    #[error("cell ({x}, {y}): {ch:?} is not a printable character")]
    InvalidGlyph { x: u16, y: u16, ch: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameInfoError {
    #[error("frame info ring needs at least one slot")]
    ZeroCapacity,
}
