//! Core types module - cell and style model shared by every crate
//!
//! This module defines the value types the renderer diffs. All types are pure
//! data with structural equality, so two cells compare equal exactly when the
//! terminal would show the same thing for them.
//!
//! # Color tiers
//!
//! | Variant | Range | Foreground SGR | Background SGR |
//! |---------|-------|----------------|----------------|
//! | `Default` | - | `39` | `49` |
//! | `Indexed8` | 0-7 | `30+n` | `40+n` |
//! | `Indexed256` | 0-255 | `38;5;n` | `48;5;n` |
//! | `TrueColor` | 0-255 per channel | `38:2:r:g:b` | `48:2:r:g:b` |
//!
//! # Text modes
//!
//! | Mode | Set | Unset |
//! |------|-----|-------|
//! | Bold | 1 | 22 |
//! | Dim | 2 | 22 |
//! | Italic | 3 | 23 |
//! | Underline | 4 | 24 |
//! | Blinking | 5 | 25 |
//! | Inverse | 7 | 27 |
//! | Hidden | 8 | 28 |
//! | Strikethrough | 9 | 29 |
//!
//! # Examples
//!
//! ```
//! use termgrid_types::{Cell, Color, Mode, ModesList, Style};
//!
//! // Mode lists are canonical: order and duplicates do not matter.
//! let a = ModesList::from_modes([Mode::Underline, Mode::Bold, Mode::Bold]);
//! let b = ModesList::from_modes([Mode::Bold, Mode::Underline]);
//! assert_eq!(a, b);
//!
//! let style = Style::new(Color::rgb(255, 23, 46), Color::Default).with_mode(Mode::Bold);
//! let cell = Cell::from_char('A', style.clone());
//! assert_eq!(cell, Cell::from_char('A', style));
//! assert_eq!(Cell::from_char('\x1b', Style::default()), None);
//! assert_ne!(Color::basic(2), Color::rgb(0, 255, 0));
//! ```

use std::fmt;

use arrayvec::{ArrayString, ArrayVec};

/// Target frame rate of the demo loop.
pub const DEFAULT_FPS: u16 = 30;

/// Default number of slots in the frame timing ring (one second at 30 fps).
pub const FRAME_INFO_CAPACITY: usize = DEFAULT_FPS as usize;

/// Maximum number of UTF-8 bytes a glyph may occupy.
pub const GLYPH_MAX_BYTES: usize = 4;

/// Number of distinct text modes; also the capacity of [`ModesList`].
pub const MODES_CAPACITY: usize = 8;

/// Basic 3-bit color indices, for use with [`Color::basic`].
pub const BLACK: u8 = 0;
pub const RED: u8 = 1;
pub const GREEN: u8 = 2;
pub const YELLOW: u8 = 3;
pub const BLUE: u8 = 4;
pub const MAGENTA: u8 = 5;
pub const CYAN: u8 = 6;
pub const WHITE: u8 = 7;

/// Terminal color in one of four tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own foreground/background.
    #[default]
    Default,
    /// One of the 8 basic colors (0-7).
    Indexed8(u8),
    /// An entry of the 256-color palette.
    Indexed256(u8),
    /// 24-bit color.
    TrueColor { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::TrueColor { r, g, b }
    }

    pub const fn indexed(n: u8) -> Self {
        Color::Indexed256(n)
    }

    /// Basic color; indices above 7 are clamped to 7.
    pub const fn basic(n: u8) -> Self {
        Color::Indexed8(if n > WHITE { WHITE } else { n })
    }

    /// Entry of the 6x6x6 color cube in the 256-color palette.
    ///
    /// Each channel is a level in 0..=5 (steps of 1/5); larger values clamp to 5.
    ///
    /// ```
    /// use termgrid_types::Color;
    ///
    /// assert_eq!(Color::cube(0, 0, 0), Color::Indexed256(16));
    /// assert_eq!(Color::cube(5, 5, 5), Color::Indexed256(231));
    /// assert_eq!(Color::cube(9, 0, 0), Color::cube(5, 0, 0));
    /// ```
    pub const fn cube(r: u8, g: u8, b: u8) -> Self {
        let r = if r > 5 { 5 } else { r };
        let g = if g > 5 { 5 } else { g };
        let b = if b > 5 { 5 } else { b };
        Color::Indexed256(16 + 36 * r + 6 * g + b)
    }

    /// Quantize a 24-bit color to the nearest color cube entry.
    pub const fn quantize_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::cube(cube_level(r), cube_level(g), cube_level(b))
    }

    /// Nearest of the 8 basic colors, used when the terminal has no palette.
    ///
    /// Returns `None` for [`Color::Default`].
    pub const fn nearest_basic(self) -> Option<u8> {
        match self {
            Color::Default => None,
            Color::Indexed8(n) => Some(n),
            Color::Indexed256(n) => Some(palette_to_basic(n)),
            Color::TrueColor { r, g, b } => Some(rgb_to_basic(r >= 128, g >= 128, b >= 128)),
        }
    }
}

const fn cube_level(v: u8) -> u8 {
    ((v as u16 * 5 + 127) / 255) as u8
}

const fn rgb_to_basic(r: bool, g: bool, b: bool) -> u8 {
    (r as u8) | ((g as u8) << 1) | ((b as u8) << 2)
}

const fn palette_to_basic(n: u8) -> u8 {
    match n {
        0..=7 => n,
        8..=15 => n - 8,
        16..=231 => {
            let i = n - 16;
            rgb_to_basic(i / 36 >= 3, (i / 6) % 6 >= 3, i % 6 >= 3)
        }
        _ => {
            if n - 232 < 12 {
                BLACK
            } else {
                WHITE
            }
        }
    }
}

/// Text attribute, tagged with its SGR set code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Mode {
    Bold = 1,
    Dim = 2,
    Italic = 3,
    Underline = 4,
    Blinking = 5,
    Inverse = 7,
    Hidden = 8,
    Strikethrough = 9,
}

impl Mode {
    pub const ALL: [Mode; MODES_CAPACITY] = [
        Mode::Bold,
        Mode::Dim,
        Mode::Italic,
        Mode::Underline,
        Mode::Blinking,
        Mode::Inverse,
        Mode::Hidden,
        Mode::Strikethrough,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// SGR code that turns this mode off.
    ///
    /// Bold is the odd one out: 21 is "double underline" on most terminals,
    /// so bold is cleared with 22 (normal intensity).
    pub const fn unset_code(self) -> u8 {
        match self {
            Mode::Bold => 22,
            other => other as u8 + 20,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Mode::Bold),
            2 => Some(Mode::Dim),
            3 => Some(Mode::Italic),
            4 => Some(Mode::Underline),
            5 => Some(Mode::Blinking),
            7 => Some(Mode::Inverse),
            8 => Some(Mode::Hidden),
            9 => Some(Mode::Strikethrough),
            _ => None,
        }
    }
}

/// Canonical set of text modes.
///
/// Always sorted by SGR code with no duplicates, so two lists holding the
/// same members compare and encode identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModesList {
    modes: ArrayVec<Mode, MODES_CAPACITY>,
}

impl ModesList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_modes<I: IntoIterator<Item = Mode>>(modes: I) -> Self {
        let mut list = Self::new();
        for mode in modes {
            list.insert(mode);
        }
        list
    }

    /// Insert a mode, keeping the list sorted. Returns false if already present.
    pub fn insert(&mut self, mode: Mode) -> bool {
        match self.modes.binary_search(&mode) {
            Ok(_) => false,
            Err(pos) => {
                // Every mode fits at most once, so capacity cannot be exceeded.
                self.modes.insert(pos, mode);
                true
            }
        }
    }

    pub fn remove(&mut self, mode: Mode) -> bool {
        match self.modes.binary_search(&mode) {
            Ok(pos) => {
                self.modes.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.modes.binary_search(&mode).is_ok()
    }

    /// Modes present in `self` but not in `other`, in ascending order.
    pub fn difference<'a>(&'a self, other: &'a ModesList) -> impl Iterator<Item = Mode> + 'a {
        self.iter().filter(move |m| !other.contains(*m))
    }

    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.iter().copied()
    }

    pub fn as_slice(&self) -> &[Mode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn clear(&mut self) {
        self.modes.clear();
    }
}

impl FromIterator<Mode> for ModesList {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        Self::from_modes(iter)
    }
}

/// Foreground, background and text modes of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub modes: ModesList,
}

impl Style {
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            modes: ModesList::new(),
        }
    }

    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.modes.insert(mode);
        self
    }

    /// Replace the mode set.
    pub fn with_modes<I: IntoIterator<Item = Mode>>(mut self, modes: I) -> Self {
        self.modes = ModesList::from_modes(modes);
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Style::default()
    }
}

/// A single printable character stored inline (at most 4 UTF-8 bytes).
///
/// Control characters are never accepted: the terminal would act on them
/// instead of drawing one cell, and the tracked cursor would drift.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph(ArrayString<GLYPH_MAX_BYTES>);

impl Glyph {
    /// Returns `None` unless `s` is exactly one printable char.
    pub fn new(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => None,
        }
    }

    /// Returns `None` for control characters.
    pub fn from_char(ch: char) -> Option<Self> {
        if ch.is_control() {
            return None;
        }
        let mut s = ArrayString::new();
        // A char is at most 4 bytes in UTF-8.
        s.push(ch);
        Some(Glyph(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Glyph {
    fn default() -> Self {
        let mut s = ArrayString::new();
        s.push(' ');
        Glyph(s)
    }
}

impl TryFrom<char> for Glyph {
    /// The rejected character.
    type Error = char;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        Self::from_char(ch).ok_or(ch)
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glyph({:?})", self.0.as_str())
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub glyph: Glyph,
    pub style: Style,
}

impl Cell {
    pub fn new(glyph: Glyph, style: Style) -> Self {
        Self { glyph, style }
    }

    /// `None` when `ch` is not printable.
    pub fn from_char(ch: char, style: Style) -> Option<Self> {
        Glyph::from_char(ch).map(|glyph| Self::new(glyph, style))
    }

    /// A space in the default style.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        *self == Cell::blank()
    }
}
