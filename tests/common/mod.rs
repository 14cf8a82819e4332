//! Shared helpers for integration tests.
//!
//! - `setup_test_logging`: route `tracing` output to the test writer once
//! - `font`: a shared [`MonoFont`] handle
//! - `display` / `small_display`: displays over in-memory panels
//! - `draw_calls`: strip windowing calls from a panel call log

#![allow(dead_code)] // Shared test helper; not every integration test uses every utility
#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry

use epaper_ui::display::Display;
use epaper_ui::font::{FontHandle, MonoFont};
use epaper_ui::panel::{MemoryPanel, MemoryPanelOptions, PanelCall};
use std::sync::{Arc, Once};

pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub fn font(advance: i32, ascent: i32, descent: i32) -> FontHandle {
    Arc::new(MonoFont::new(advance, ascent, descent))
}

/// Display over the default 128x296 panel with the construction calls
/// already drained.
pub fn display() -> Display<MemoryPanel> {
    setup_test_logging();
    drained(Display::new(MemoryPanel::new()))
}

/// Display over a panel of the given physical size.
pub fn small_display(width: u32, height: u32, page_height: u32) -> Display<MemoryPanel> {
    setup_test_logging();
    drained(Display::new(MemoryPanel::with_options(MemoryPanelOptions {
        width,
        height,
        page_height,
    })))
}

fn drained(display: Display<MemoryPanel>) -> Display<MemoryPanel> {
    display
        .with_panel(|p| p.take_calls())
        .expect("fresh display lock");
    display
}

/// Calls that put pixels into the page buffer.
pub fn draw_calls(calls: Vec<PanelCall>) -> Vec<PanelCall> {
    calls.into_iter().filter(PanelCall::is_draw).collect()
}

/// Take the call log of a display's panel.
pub fn take_calls(display: &Display<MemoryPanel>) -> Vec<PanelCall> {
    display
        .with_panel(|p| p.take_calls())
        .expect("display lock")
}
