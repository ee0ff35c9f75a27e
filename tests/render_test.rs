//! End-to-end renderer behavior against an in-memory terminal.

use std::io::{self, Write};

use termgrid::core::DrawError;
use termgrid::term::{Capabilities, Renderer};
use termgrid::types::{Cell, Color, Mode, Style, RED};

fn renderer(rows: u16, cols: u16) -> Renderer<Vec<u8>> {
    Renderer::new(Vec::new(), rows, cols, Capabilities::default())
}

fn take_output(r: &mut Renderer<Vec<u8>>) -> String {
    let out = String::from_utf8(r.writer().clone()).unwrap();
    r.writer_mut().clear();
    out
}

fn bold_red() -> Style {
    Style::new(Color::basic(RED), Color::Default).with_mode(Mode::Bold)
}

#[test]
fn scenario_draw_ab_then_redraw_identically() {
    let mut r = renderer(5, 10);

    assert_eq!(r.draw_str(0, 0, "AB", &bold_red()), Ok(2));
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 2);
    // One cursor move, one combined style sequence, two glyphs.
    assert_eq!(take_output(&mut r), "\x1b[1;1H\x1b[31;1mAB");
    assert_eq!(r.state().cursor(), Some((2, 0)));

    // "next" starts blank again; drawing the same content matches what the
    // screen already shows.
    assert!(r.frames().next().cells().iter().all(Cell::is_blank));
    r.draw_str(0, 0, "AB", &bold_red()).unwrap();
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 0);
    assert_eq!(take_output(&mut r), "");
}

#[test]
fn scenario_draw_nothing_on_second_frame_blanks_previous_cells() {
    let mut r = renderer(5, 10);
    r.draw_str(0, 0, "AB", &bold_red()).unwrap();
    r.render_frame().unwrap();
    take_output(&mut r);

    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 2);
    // Cursor is still at (2, 0), so it moves back; bold and red are undone.
    assert_eq!(take_output(&mut r), "\x1b[1;1H\x1b[39;22m  ");

    // Now both frames are blank: nothing left to write.
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 0);
}

#[test]
fn diff_minimality_unchanged_next_emits_nothing() {
    let mut r = renderer(3, 6);
    let scene = |r: &mut Renderer<Vec<u8>>| {
        r.draw_str(1, 1, "hello", &Style::default().with_mode(Mode::Underline))
            .unwrap();
        r.draw_cell(0, 2, &Style::new(Color::rgb(1, 2, 3), Color::indexed(8)), '@')
            .unwrap();
    };

    scene(&mut r);
    r.render_frame().unwrap();
    take_output(&mut r);

    for _ in 0..3 {
        scene(&mut r);
        let stats = r.render_frame().unwrap();
        assert_eq!(stats.cells_written, 0);
        assert_eq!(stats.bytes_written, 0);
    }
    assert_eq!(take_output(&mut r), "");
}

#[test]
fn only_changed_cells_are_rewritten() {
    let mut r = renderer(2, 5);
    r.draw_str(0, 0, "abcde", &Style::default()).unwrap();
    r.render_frame().unwrap();
    take_output(&mut r);

    r.draw_str(0, 0, "abXde", &Style::default()).unwrap();
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 1);
    assert_eq!(take_output(&mut r), "\x1b[1;3HX");
}

#[test]
fn style_is_not_reemitted_across_cells() {
    let mut r = renderer(2, 4);
    let style = Style::new(Color::rgb(10, 20, 30), Color::Default);
    r.draw_str(0, 0, "ab", &style).unwrap();
    r.draw_str(0, 1, "cd", &style).unwrap();
    r.render_frame().unwrap();
    assert_eq!(
        take_output(&mut r),
        "\x1b[1;1H\x1b[38:2:10:20:30mab\x1b[2;1Hcd"
    );
}

#[test]
fn capabilities_downgrade_truecolor_on_the_wire_only() {
    let caps = Capabilities {
        truecolor: false,
        colors_256: true,
    };
    let mut r = Renderer::new(Vec::new(), 1, 2, caps);
    let style = Style::default().fg(Color::rgb(255, 0, 0));
    r.draw_cell(0, 0, &style, 'x').unwrap();
    r.render_frame().unwrap();
    assert_eq!(take_output(&mut r), "\x1b[1;1H\x1b[38;5;196mx");
    assert_eq!(r.frames().previous().get(0, 0).map(|c| c.style.fg), Some(Color::rgb(255, 0, 0)));
}

#[test]
fn out_of_bounds_write_is_rejected_and_buffer_unmodified() {
    let mut r = renderer(5, 10);
    let before = r.frames().next().clone();
    assert_eq!(
        r.write_cell(10, 0, Cell::from_char('X', bold_red()).unwrap()),
        Err(DrawError::OutOfBounds {
            x: 10,
            y: 0,
            cols: 10,
            rows: 5
        })
    );
    assert_eq!(r.frames().next(), &before);

    // The render cycle is unaffected.
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 0);
}

#[test]
fn partially_offscreen_string_draws_prefix() {
    let mut r = renderer(1, 10);
    let err = r.draw_str(7, 0, "overflow", &Style::default()).unwrap_err();
    assert_eq!(
        err,
        DrawError::OutOfBounds {
            x: 10,
            y: 0,
            cols: 10,
            rows: 1
        }
    );
    let stats = r.render_frame().unwrap();
    assert_eq!(stats.cells_written, 3);
    assert_eq!(take_output(&mut r), "\x1b[1;8Hove");
}

#[test]
fn resize_is_applied_after_the_frame_and_clears_the_screen() {
    let mut r = renderer(5, 10);
    r.draw_cell(4, 4, &bold_red(), 'Z').unwrap();
    r.request_resize(8, 20);

    // Size is still the old one while the application draws.
    assert_eq!((r.rows(), r.cols()), (5, 10));
    let stats = r.render_frame().unwrap();
    assert!(stats.resized);
    assert_eq!(stats.cells_written, 1);
    assert_eq!(
        take_output(&mut r),
        "\x1b[5;5H\x1b[31;1mZ\x1b[0m\x1b[2J"
    );

    assert_eq!((r.rows(), r.cols()), (8, 20));
    assert_eq!(r.frames().previous().shape(), (8, 20));
    assert_eq!(r.frames().next_cell(4, 4), Some(&Cell::blank()));
    assert!(r.frames().previous().cells().iter().all(Cell::is_blank));
    assert!(r.state().style().is_default());
    assert_eq!(r.state().cursor(), None);
}

#[test]
fn resize_to_same_shape_is_free() {
    let mut r = renderer(5, 10);
    r.draw_cell(1, 1, &Style::default(), 'k').unwrap();
    r.render_frame().unwrap();
    take_output(&mut r);

    r.request_resize(5, 10);
    r.draw_cell(1, 1, &Style::default(), 'k').unwrap();
    let stats = r.render_frame().unwrap();
    assert!(!stats.resized);
    assert_eq!(take_output(&mut r), "");
}

#[test]
fn shrinking_drops_offscreen_draws() {
    let mut r = renderer(5, 10);
    r.request_resize(2, 2);
    r.render_frame().unwrap();
    take_output(&mut r);

    assert!(r.draw_cell(5, 0, &Style::default(), 'x').is_err());
    r.draw_str(0, 1, "ok", &Style::default()).unwrap();
    r.render_frame().unwrap();
    assert_eq!(take_output(&mut r), "\x1b[2;1Hok");
}

#[test]
fn multibyte_glyphs_are_written_verbatim() {
    let mut r = renderer(1, 3);
    r.draw_cell(0, 0, &Style::default(), '■').unwrap();
    r.draw_cell(1, 0, &Style::default(), '☻').unwrap();
    r.render_frame().unwrap();
    assert_eq!(take_output(&mut r), "\x1b[1;1H■☻");
}

#[derive(Default)]
struct CountingWriter {
    writes: usize,
    flushes: usize,
    bytes: Vec<u8>,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn each_frame_is_one_write_and_one_flush() {
    let mut r = Renderer::new(CountingWriter::default(), 4, 8, Capabilities::default());
    r.draw_str(0, 0, "one", &bold_red()).unwrap();
    r.draw_str(2, 2, "two", &Style::default().with_mode(Mode::Underline))
        .unwrap();
    r.draw_cell(7, 3, &Style::default().bg(Color::indexed(99)), '#')
        .unwrap();
    r.request_resize(6, 12);

    let stats = r.render_frame().unwrap();
    assert!(stats.resized);
    assert_eq!(stats.cells_written, 7);
    assert_eq!(r.writer().writes, 1);
    assert_eq!(r.writer().flushes, 1);
    assert_eq!(r.writer().bytes.len(), stats.bytes_written);
    assert!(r.writer().bytes.ends_with(b"\x1b[0m\x1b[2J"));

    // An unchanged frame has nothing to write but still flushes once.
    r.render_frame().unwrap();
    assert_eq!(r.writer().flushes, 2);
    assert_eq!(r.writer().writes, 1);
}

#[test]
fn control_characters_never_reach_the_terminal() {
    let mut r = renderer(1, 10);
    assert_eq!(
        r.draw_str(0, 0, "\tb\x1b[2J", &Style::default()),
        Err(DrawError::InvalidGlyph {
            x: 0,
            y: 0,
            ch: '\t'
        })
    );
    assert_eq!(
        r.draw_cell(3, 0, &Style::default(), '\x1b'),
        Err(DrawError::InvalidGlyph {
            x: 3,
            y: 0,
            ch: '\x1b'
        })
    );
    r.draw_str(0, 0, "ok", &Style::default()).unwrap();
    r.render_frame().unwrap();
    assert_eq!(take_output(&mut r), "\x1b[1;1Hok");
    assert_eq!(r.state().cursor(), Some((2, 0)));
}
