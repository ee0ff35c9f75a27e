//! Raw terminal input (driver-facing).
//!
//! The renderer consumes none of this. The driver reads whatever bytes are
//! available once per frame, in the same loop that renders, and never blocks.

pub mod raw;

pub use raw::{RawInput, INPUT_BUFFER_SIZE};

#[cfg(unix)]
pub use raw::NonBlocking;
