//! Terminal renderer.
//!
//! Turns the frame pair from `termgrid-core` into the smallest stream of
//! ANSI escape sequences that brings the screen up to date:
//!
//! - [`renderer`]: per-frame diff of "previous" vs "next", one flush per frame
//! - [`sgr`]: style and cursor state machine emitting only deltas
//! - [`caps`]: color capabilities passed in as configuration
//! - [`session`]: raw mode / alternate screen lifecycle for real terminals

pub mod caps;
pub mod renderer;
pub mod session;
pub mod sgr;

pub use termgrid_core as core;
pub use termgrid_types as types;

pub use caps::Capabilities;
pub use renderer::{FrameStats, Renderer};
pub use session::Terminal;
pub use sgr::RenderState;
