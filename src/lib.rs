//! termgrid (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and hosts the demo
//! application used by the `termgrid` binary.

pub use termgrid_core as core;
pub use termgrid_input as input;
pub use termgrid_term as term;
pub use termgrid_types as types;

pub mod demo;
