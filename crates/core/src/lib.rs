//! Core rendering model - pure, deterministic, and testable
//!
//! This crate owns the grids the renderer diffs and the frame timing window
//! the driver paces itself with. It does **no terminal I/O**, which makes it:
//!
//! - **Deterministic**: the same draw calls always produce the same grids
//! - **Testable**: every invariant is checked without a real terminal
//! - **Cheap per frame**: resize checks, clears and swaps do not allocate
//!
//! # Module Structure
//!
//! - [`fb`]: a single rows x cols grid of styled cells
//! - [`frames`]: the "previous"/"next" pair of grids with draw, swap and resize
//! - [`frame_info`]: fixed-size ring of frame start/end timestamps
//! - [`timing`]: clocks and frame pacing helpers
//! - [`error`]: recoverable draw errors
//!
//! # Example
//!
//! ```
//! use termgrid_core::FramePair;
//! use termgrid_types::{Cell, Style};
//!
//! let mut frames = FramePair::allocate(5, 10);
//! frames.draw_cell(3, 1, &Style::default(), '@').unwrap();
//! assert!(frames.draw_cell(4, 1, &Style::default(), '\x1b').is_err());
//! assert!(frames.write_cell(10, 0, Cell::blank()).is_err());
//!
//! frames.swap();
//! assert_eq!(frames.previous().get(3, 1).map(|c| c.glyph.to_string()), Some("@".to_string()));
//! ```

pub mod error;
pub mod fb;
pub mod frame_info;
pub mod frames;
pub mod timing;

pub use termgrid_types as types;

pub use error::{DrawError, FrameInfoError};
pub use fb::FrameBuffer;
pub use frame_info::{FrameInfo, FrameInfoBuffer};
pub use frames::FramePair;
pub use timing::{frame_time_ms, until_end_of_frame, wait, Clock, ManualClock, SystemClock};
