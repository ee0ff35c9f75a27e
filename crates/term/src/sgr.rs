//! Style and cursor state machine.
//!
//! [`RenderState`] remembers the style and cursor position the terminal
//! currently has, so each cell write only emits the escape codes needed to
//! get from there to the target:
//!
//! - nothing when the target style is already applied
//! - a color parameter only for the channel(s) that changed
//! - unset codes for dropped modes, then set codes for added modes
//! - a cursor move only when the cursor is not already on the target cell
//!
//! All parameters for one style change go out as a single `ESC[...m`.

use std::io::{self, Write};

use crossterm::style::{Attribute, SetAttribute};
use crossterm::{cursor, terminal, QueueableCommand};
use termgrid_types::{Color, Mode, Style};
use tracing::trace;

use crate::caps::Capabilities;

/// Control sequence introducer; only SGR is written by hand.
const CSI: &[u8] = b"\x1b[";

/// Style and cursor position the terminal is known to be in.
#[derive(Debug, Clone)]
pub struct RenderState {
    style: Style,
    /// `None` when the position is not known (start of session, after a
    /// clear, after writing into the last column).
    cursor: Option<(u16, u16)>,
    caps: Capabilities,
    /// Scratch space for SGR parameters, reused across calls.
    params: Vec<u8>,
}

impl RenderState {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            style: Style::default(),
            cursor: None,
            caps,
            params: Vec::with_capacity(64),
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Back to the state of a freshly reset terminal.
    pub fn reset(&mut self) {
        self.style = Style::default();
        self.cursor = None;
    }

    pub fn forget_cursor(&mut self) {
        self.cursor = None;
    }

    /// Move the cursor to the 0-based cell (x, y) unless it is already there.
    ///
    /// Returns whether anything was emitted.
    pub fn move_to(&mut self, out: &mut impl Write, x: u16, y: u16) -> io::Result<bool> {
        if self.cursor == Some((x, y)) {
            return Ok(false);
        }
        out.queue(cursor::MoveTo(x, y))?;
        self.cursor = Some((x, y));
        Ok(true)
    }

    /// Emit the minimal SGR sequence to switch to `target`.
    ///
    /// Returns whether anything was emitted.
    pub fn apply_style(&mut self, out: &mut impl Write, target: &Style) -> io::Result<bool> {
        if self.style == *target {
            return Ok(false);
        }
        self.params.clear();
        push_style_delta(&mut self.params, &self.style, target, self.caps);
        self.style.clone_from(target);
        if self.params.is_empty() {
            return Ok(false);
        }
        trace!(sgr = %String::from_utf8_lossy(&self.params), "style change");
        out.write_all(CSI)?;
        out.write_all(&self.params)?;
        out.write_all(b"m")?;
        Ok(true)
    }

    /// Record that one glyph was printed at the cursor.
    ///
    /// Writing into the last column leaves the cursor in a terminal-specific
    /// pending-wrap state, so its position is forgotten.
    pub fn glyph_written(&mut self, cols: u16) {
        self.cursor = match self.cursor {
            Some((x, y)) if x + 1 < cols => Some((x + 1, y)),
            _ => None,
        };
    }

    /// Reset attributes and clear the screen.
    pub fn clear_screen(&mut self, out: &mut impl Write) -> io::Result<()> {
        // Reset first: the clear paints with the current background.
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.reset();
        Ok(())
    }
}

/// Semicolon-separated SGR parameters (without `ESC[` and `m`) that turn
/// `current` into `target`. Empty when nothing needs to change.
pub fn push_style_delta(out: &mut Vec<u8>, current: &Style, target: &Style, caps: Capabilities) {
    let mut params = Params { out, first: true };

    if current.fg != target.fg {
        params.color(downgrade(target.fg, caps), false);
    }
    if current.bg != target.bg {
        params.color(downgrade(target.bg, caps), true);
    }

    if current.modes == target.modes {
        return;
    }

    // Bold and dim share the same unset code, so clearing one clears both.
    let mut intensity_cleared = false;
    for mode in current.modes.difference(&target.modes) {
        if matches!(mode, Mode::Bold | Mode::Dim) {
            if intensity_cleared {
                continue;
            }
            intensity_cleared = true;
        }
        params.code(mode.unset_code());
    }
    for mode in target.modes.iter() {
        let reapply = intensity_cleared && matches!(mode, Mode::Bold | Mode::Dim);
        if reapply || !current.modes.contains(mode) {
            params.code(mode.code());
        }
    }
}

/// The closest color the terminal can show.
pub fn downgrade(color: Color, caps: Capabilities) -> Color {
    match color {
        Color::TrueColor { r, g, b } if !caps.truecolor => {
            if caps.colors_256 {
                Color::quantize_rgb(r, g, b)
            } else {
                basic_of(color)
            }
        }
        Color::Indexed256(_) if !caps.colors_256 => basic_of(color),
        other => other,
    }
}

fn basic_of(color: Color) -> Color {
    color
        .nearest_basic()
        .map(Color::basic)
        .unwrap_or(Color::Default)
}

struct Params<'a> {
    out: &'a mut Vec<u8>,
    first: bool,
}

impl Params<'_> {
    fn sep(&mut self) {
        if !self.first {
            self.out.push(b';');
        }
        self.first = false;
    }

    fn code(&mut self, code: u8) {
        self.sep();
        push_u8(self.out, code);
    }

    fn color(&mut self, color: Color, background: bool) {
        self.sep();
        let out = &mut *self.out;
        match color {
            Color::Default => out.extend_from_slice(if background { b"49" } else { b"39" }),
            Color::Indexed8(n) => {
                let base = if background { 40 } else { 30 };
                push_u8(out, base + n.min(7));
            }
            Color::Indexed256(n) => {
                out.extend_from_slice(if background { b"48;5;" } else { b"38;5;" });
                push_u8(out, n);
            }
            Color::TrueColor { r, g, b } => {
                out.extend_from_slice(if background { b"48:2:" } else { b"38:2:" });
                push_u8(out, r);
                out.push(b':');
                push_u8(out, g);
                out.push(b':');
                push_u8(out, b);
            }
        }
    }
}

fn push_u8(out: &mut Vec<u8>, n: u8) {
    if n >= 100 {
        out.push(b'0' + n / 100);
    }
    if n >= 10 {
        out.push(b'0' + (n / 10) % 10);
    }
    out.push(b'0' + n % 10);
}
