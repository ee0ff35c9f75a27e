//! Demo application driven by the `termgrid` binary.
//!
//! A player square moves around a small field centered on screen with
//! `h`/`j`/`k`/`l` (or the arrow keys), optionally prefixed with a count
//! (`3l`). `:` opens a command box where `q` quits, `r` repaints the whole
//! screen and `ESC` returns. The top-right corner shows the measured frame
//! rate and load.

use std::env;
use std::io::Write;

use termgrid_core::FrameInfoBuffer;
use termgrid_term::{Capabilities, Renderer};
use termgrid_types::{
    Cell, Color, Glyph, Mode, Style, BLACK, DEFAULT_FPS, FRAME_INFO_CAPACITY, WHITE,
};

/// Field size in cells.
pub const FIELD_WIDTH: i32 = 10;
pub const FIELD_HEIGHT: i32 = 5;

const KEY_ESC: u8 = 0x1b;
const PLAYER_GLYPH: char = '■';
const FIELD_GLYPH: char = '·';
const MAX_COUNT: u32 = 99_999;

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub fps: u16,
    pub ring_capacity: usize,
    pub caps: Capabilities,
    pub log_path: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            ring_capacity: FRAME_INFO_CAPACITY,
            caps: Capabilities::default(),
            log_path: None,
        }
    }
}

impl DemoConfig {
    /// Create from environment variables.
    ///
    /// - `TERMGRID_FPS`: target frame rate (1..=240, default 30)
    /// - `TERMGRID_LOG`: log file path; logging is off when unset
    /// - `COLORTERM` / `TERM`: color capabilities
    pub fn from_env() -> Self {
        let fps = env::var("TERMGRID_FPS")
            .ok()
            .and_then(|s| s.trim().parse::<u16>().ok())
            .filter(|fps| (1..=240).contains(fps))
            .unwrap_or(DEFAULT_FPS);

        let log_path = env::var("TERMGRID_LOG")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            fps,
            // One second of history.
            ring_capacity: usize::from(fps),
            caps: Capabilities::from_env(),
            log_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Demo {
    player: (i32, i32),
    count: Option<u32>,
    command_mode: bool,
    exited: bool,
    repaint: bool,
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo {
    pub fn new() -> Self {
        Self {
            player: (FIELD_WIDTH / 2, FIELD_HEIGHT / 2),
            count: None,
            command_mode: false,
            exited: false,
            repaint: false,
        }
    }

    pub fn player(&self) -> (i32, i32) {
        self.player
    }

    pub fn command_mode(&self) -> bool {
        self.command_mode
    }

    pub fn exited(&self) -> bool {
        self.exited
    }

    /// Returns true once after `r` was pressed in command mode.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    /// Move the player, staying inside the field. Returns false at the edge.
    pub fn try_move(&mut self, dir: Direction) -> bool {
        let (dx, dy) = dir.delta();
        let (x, y) = (self.player.0 + dx, self.player.1 + dy);
        if !(0..FIELD_WIDTH).contains(&x) || !(0..FIELD_HEIGHT).contains(&y) {
            return false;
        }
        self.player = (x, y);
        true
    }

    /// Apply one frame's worth of raw input bytes.
    pub fn process_input(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b == KEY_ESC {
                // ESC [ x is a CSI sequence; a lone ESC is the escape key.
                if bytes.get(i + 1) == Some(&b'[') {
                    if let Some(&final_byte) = bytes.get(i + 2) {
                        self.on_csi(final_byte);
                    }
                    i += 3;
                    continue;
                }
                self.on_escape();
                i += 1;
                continue;
            }
            if self.command_mode {
                self.on_command_key(b);
            } else {
                self.on_key(b);
            }
            i += 1;
        }
    }

    fn on_escape(&mut self) {
        if self.command_mode {
            self.command_mode = false;
        } else {
            self.count = None;
        }
    }

    fn on_csi(&mut self, final_byte: u8) {
        if self.command_mode {
            return;
        }
        let dir = match final_byte {
            b'A' => Direction::Up,
            b'B' => Direction::Down,
            b'C' => Direction::Right,
            b'D' => Direction::Left,
            _ => return,
        };
        self.move_repeated(dir);
    }

    fn on_key(&mut self, b: u8) {
        match b {
            b'0'..=b'9' => {
                let digit = u32::from(b - b'0');
                let count = self.count.unwrap_or(0) * 10 + digit;
                self.count = Some(count.min(MAX_COUNT));
            }
            b'h' => self.move_repeated(Direction::Left),
            b'j' => self.move_repeated(Direction::Down),
            b'k' => self.move_repeated(Direction::Up),
            b'l' => self.move_repeated(Direction::Right),
            b':' => {
                self.count = None;
                self.command_mode = true;
            }
            _ => {}
        }
    }

    fn on_command_key(&mut self, b: u8) {
        match b {
            b'q' => self.exited = true,
            b'r' => self.repaint = true,
            _ => {}
        }
    }

    fn move_repeated(&mut self, dir: Direction) {
        let times = self.count.take().unwrap_or(1).max(1);
        for _ in 0..times {
            if !self.try_move(dir) {
                break;
            }
        }
    }

    /// Top-left corner of the field on a rows x cols screen, or `None` when
    /// the field does not fit.
    pub fn field_origin(rows: u16, cols: u16) -> Option<(u16, u16)> {
        let (rows, cols) = (i32::from(rows), i32::from(cols));
        if FIELD_WIDTH > cols || FIELD_HEIGHT > rows {
            return None;
        }
        let x = cols / 2 - FIELD_WIDTH / 2;
        let y = rows / 2 - FIELD_HEIGHT / 2;
        Some((x as u16, y as u16))
    }

    /// Draw the whole scene into the renderer's next frame.
    ///
    /// Cells that fall off a small screen are skipped.
    pub fn draw<W: Write>(&self, r: &mut Renderer<W>, timings: &FrameInfoBuffer, frame_ms: i64) {
        let (rows, cols) = (r.rows(), r.cols());

        if let Some((ox, oy)) = Self::field_origin(rows, cols) {
            let field = Style::new(Color::basic(WHITE), Color::Default).with_mode(Mode::Dim);
            for y in 0..FIELD_HEIGHT as u16 {
                for x in 0..FIELD_WIDTH as u16 {
                    let _ = r.draw_cell(ox + x, oy + y, &field, FIELD_GLYPH);
                }
            }
            let player = Style::new(Color::rgb(255, 23, 46), Color::Default);
            let (px, py) = self.player;
            let _ = r.draw_cell(ox + px as u16, oy + py as u16, &player, PLAYER_GLYPH);
        } else {
            let _ = r.draw_str(0, 0, "screen too small", &Style::default().with_mode(Mode::Bold));
        }

        self.draw_frame_info(r, timings, frame_ms);

        if self.command_mode {
            Self::draw_command_box(r);
        }
    }

    fn draw_frame_info<W: Write>(&self, r: &mut Renderer<W>, timings: &FrameInfoBuffer, frame_ms: i64) {
        let cols = r.cols();
        let style = Style::default();
        let fps = match timings.average_fps() {
            Some(fps) => format!("FPS :{fps:4}"),
            None => "FPS :   -".to_string(),
        };
        let load = match timings.load_percent(frame_ms) {
            Some(load) => format!("Load:{load:3}%"),
            None => "Load:  -%".to_string(),
        };
        let x = cols.saturating_sub(9);
        let _ = r.draw_str(x, 0, &fps, &style);
        let _ = r.draw_str(x, 1, &load, &style);
    }

    fn draw_command_box<W: Write>(r: &mut Renderer<W>) {
        let (rows, cols) = (r.rows(), r.cols());
        let height = rows / 2;
        let width = cols / 2;
        let top = rows / 2 - height / 2;
        let left = cols / 2 - width / 2;

        let style = Style::new(Color::basic(BLACK), Color::basic(WHITE));
        r.fill_rect(left, top, width, height, &Cell::new(Glyph::default(), style.clone()));

        let title = style.clone().with_mode(Mode::Bold);
        let text_x = left + width.saturating_sub(14) / 2;
        let _ = r.draw_str(left + width.saturating_sub(6) / 2, top + 1, "PAUSED", &title);
        let _ = r.draw_str(text_x, top + 3, "  r:   repaint", &style);
        let _ = r.draw_str(text_x, top + 4, "  q:      quit", &style);
        let _ = r.draw_str(text_x, top + 5, "ESC:  continue", &style);
    }
}
