//! Panel driver collaborator.
//!
//! [`PanelDriver`] is the surface the reconciler talks to: window selection,
//! the paged redraw cycle and primitive draws. Every redraw follows the same
//! shape, whatever the size of the window:
//!
//! ```text
//! set_full_window() | set_partial_window(rect)
//! first_page()
//! loop {
//!     fill_screen(WHITE)
//!     ...draw everything that intersects the window...
//!     if !next_page() { break }
//! }
//! ```
//!
//! Drivers with a page buffer smaller than the window need the whole window
//! redrawn once per page, so callers must replay the same draws every pass.
//!
//! Only the windowing calls and [`draw_pixel`](PanelDriver::draw_pixel) are
//! required. The other primitives have GFX-style default implementations on
//! top of `draw_pixel`; drivers with hardware or buffer fast paths override
//! them.

mod memory;
pub mod raster;

pub use memory::{MemoryPanel, MemoryPanelOptions, PanelCall, PanelStats};

use crate::color::Color;
use crate::font::TextMetrics;
use crate::geometry::Rect;

/// A paged, windowed monochrome panel.
///
/// Coordinates are logical: they follow the current rotation, and
/// [`width`](Self::width)/[`height`](Self::height) report the rotated size.
pub trait PanelDriver {
    /// Bring the controller up. Called once before the first refresh.
    fn init(&mut self);

    /// Logical width under the current rotation.
    fn width(&self) -> u32;

    /// Logical height under the current rotation.
    fn height(&self) -> u32;

    /// Select quarter-turn rotation. Out-of-range values are driver-defined.
    fn set_rotation(&mut self, rotation: u8);

    /// Target the whole panel for the next paged cycle (full refresh).
    fn set_full_window(&mut self);

    /// Target a rectangle for the next paged cycle (partial refresh).
    fn set_partial_window(&mut self, window: Rect);

    /// Start a paged cycle over the current window.
    fn first_page(&mut self);

    /// Flush the current page. Returns `true` while more pages remain.
    fn next_page(&mut self) -> bool;

    /// Set one pixel. Pixels outside the window or current page are dropped.
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    fn fill_screen(&mut self, color: Color) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w, h, color);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        raster::fill_rect(x, y, w, h, &mut |px, py| self.draw_pixel(px, py, color));
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        raster::rect_outline(x, y, w, h, &mut |px, py| self.draw_pixel(px, py, color));
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        raster::line(x0, y0, x1, y1, &mut |px, py| self.draw_pixel(px, py, color));
    }

    fn draw_circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        let r = r.min(i32::MAX as u32) as i32;
        raster::circle(x, y, r, &mut |px, py| self.draw_pixel(px, py, color));
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        let r = r.min(i32::MAX as u32) as i32;
        raster::fill_circle(x, y, r, &mut |px, py| self.draw_pixel(px, py, color));
    }

    fn draw_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        self.draw_line(p0.0, p0.1, p1.0, p1.1, color);
        self.draw_line(p1.0, p1.1, p2.0, p2.1, color);
        self.draw_line(p2.0, p2.1, p0.0, p0.1, color);
    }

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        raster::fill_triangle(p0, p1, p2, &mut |px, py| self.draw_pixel(px, py, color));
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_round_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, color: Color) {
        raster::round_rect(x, y, w, h, r, &mut |px, py| self.draw_pixel(px, py, color));
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_round_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, color: Color) {
        raster::fill_round_rect(x, y, w, h, r, &mut |px, py| self.draw_pixel(px, py, color));
    }

    /// Draw a packed 1-bit bitmap (MSB first, rows padded to bytes). Set
    /// bits take `fg`; clear bits take `bg` when given and are skipped
    /// otherwise.
    #[allow(clippy::too_many_arguments)]
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        w: u32,
        h: u32,
        fg: Color,
        bg: Option<Color>,
    ) {
        let row_len = (w as usize).div_ceil(8);
        for row in 0..h as usize {
            for col in 0..w as usize {
                let Some(&byte) = bitmap.get(row * row_len + col / 8) else {
                    return;
                };
                let (px, py) = (x + col as i32, y + row as i32);
                if byte & (0x80 >> (col % 8)) != 0 {
                    self.draw_pixel(px, py, fg);
                } else if let Some(bg) = bg {
                    self.draw_pixel(px, py, bg);
                }
            }
        }
    }

    /// Draw a string with its baseline at `baseline`.
    ///
    /// The default renders each visible codepoint as a solid block one
    /// advance wide (minus a one-pixel gap) spanning the font's extent.
    /// Drivers with real glyph tables override this.
    fn draw_text(&mut self, x: i32, baseline: i32, text: &str, font: &dyn TextMetrics, color: Color) {
        let top = baseline - font.ascent();
        let height = font.extent().max(0) as u32;
        let mut cursor = x;
        for (i, ch) in text.char_indices() {
            let advance = font.width(&text[i..i + ch.len_utf8()]);
            if !ch.is_whitespace() && advance > 1 {
                self.fill_rect(cursor, top, (advance - 1) as u32, height, color);
            }
            cursor += advance;
        }
    }
}
