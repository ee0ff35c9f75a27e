use std::alloc::{GlobalAlloc, Layout, System};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use termgrid::term::{Capabilities, Renderer};
use termgrid::types::{Color, Mode, Style};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

fn draw_scene(r: &mut Renderer<io::Sink>, frame: u16) {
    let styles = [
        Style::new(Color::rgb(200, 30, 30), Color::Default).with_mode(Mode::Bold),
        Style::new(Color::indexed(33), Color::basic(0)).with_modes([Mode::Dim, Mode::Italic]),
        Style::default(),
    ];
    for y in 0..r.rows() {
        for x in 0..r.cols() {
            let style = &styles[usize::from(x + y + frame % 3) % styles.len()];
            let _ = r.draw_cell(x, y, style, if (x + frame) % 2 == 0 { '#' } else { '.' });
        }
    }
}

// Both tests live in one function: the allocation counter is process-wide and
// the test harness runs tests on parallel threads.
#[test]
fn render_frame_is_allocation_free_after_warmup() {
    let mut r = Renderer::new(io::sink(), 24, 80, Capabilities::default());

    // Warm-up: output buffer and SGR scratch space reach their working size.
    for frame in 0..12 {
        draw_scene(&mut r, frame);
        r.render_frame().unwrap();
    }

    let allocs = with_alloc_counting(|| {
        for frame in 0..200 {
            draw_scene(&mut r, frame);
            r.render_frame().unwrap();
        }
    });
    assert!(allocs == 0, "changing frames allocated {allocs} times");

    let allocs = with_alloc_counting(|| {
        for _ in 0..200 {
            draw_scene(&mut r, 0);
            r.render_frame().unwrap();
        }
    });
    assert!(allocs == 0, "unchanged frames allocated {allocs} times");
}
