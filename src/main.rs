//! termgrid demo runner (default binary).
//!
//! Drives the renderer the way an application would: read input, draw the
//! scene, render, then sleep until the end of the frame budget.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use termgrid::core::{frame_time_ms, until_end_of_frame, wait, Clock, FrameInfoBuffer, SystemClock};
use termgrid::demo::{Demo, DemoConfig};
use termgrid::input::RawInput;
use termgrid::term::{Renderer, Terminal};

fn main() -> Result<()> {
    let config = DemoConfig::from_env();
    init_logging(&config)?;

    let (mut term, (rows, cols)) = Terminal::enter()?;

    let result = run(&config, rows, cols);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(config: &DemoConfig) -> Result<()> {
    // Logging to stderr would scribble over the screen, so it goes to a file or nowhere.
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("failed to create log file {path}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(config: &DemoConfig, rows: u16, cols: u16) -> Result<()> {
    info!(rows, cols, fps = config.fps, caps = ?config.caps, "starting");

    let clock = SystemClock::new();
    let frame_ms = frame_time_ms(config.fps);
    let mut timings = FrameInfoBuffer::new(config.ring_capacity)?;
    let mut input = RawInput::stdin().context("failed to make stdin non-blocking")?;
    let mut renderer = Renderer::new(io::stdout(), rows, cols, config.caps);
    let mut demo = Demo::new();

    while !demo.exited() {
        timings.start_frame(clock.now_ms());

        demo.process_input(input.read_available());
        if demo.take_repaint() {
            renderer.invalidate();
        }

        // Re-check every frame; the renderer applies it after the next swap.
        let (rows, cols) = Terminal::size().unwrap_or((renderer.rows(), renderer.cols()));
        renderer.request_resize(rows, cols);

        demo.draw(&mut renderer, &timings, frame_ms);
        renderer.render_frame()?;

        timings.end_frame(clock.now_ms());
        wait(until_end_of_frame(timings.current().start, frame_ms, clock.now_ms()));
        timings.advance();
    }

    info!(
        avg_active_ms = ?timings.average_active_time(),
        avg_fps = ?timings.average_fps(),
        "exiting"
    );
    Ok(())
}
