//! In-memory paged panel.
//!
//! [`MemoryPanel`] behaves like a small-RAM e-paper controller: a 1-bit
//! framebuffer in physical orientation, GFX-style rotation, a refresh
//! window, and a page buffer only `page_height` physical rows tall. Draws
//! land only where the current window and the current page band overlap,
//! and draws issued outside a paged cycle never reach the panel. A redraw
//! that forgets to replay itself on every page therefore shows up as
//! missing pixels.
//!
//! Every driver call is appended to a log for inspection in tests.

use super::{PanelDriver, raster};
use crate::color::Color;
use crate::font::TextMetrics;
use crate::geometry::Rect;

/// Geometry of a [`MemoryPanel`].
#[derive(Clone, Copy, Debug)]
pub struct MemoryPanelOptions {
    /// Physical width in pixels.
    pub width: u32,
    /// Physical height in pixels.
    pub height: u32,
    /// Physical rows transmitted per page pass.
    pub page_height: u32,
}

impl Default for MemoryPanelOptions {
    /// The 2.9" 128x296 class with a half-screen page buffer.
    fn default() -> Self {
        Self {
            width: 128,
            height: 296,
            page_height: 148,
        }
    }
}

/// Refresh counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelStats {
    /// Completed cycles over the full window.
    pub full_refreshes: u64,
    /// Completed cycles over a partial window.
    pub partial_refreshes: u64,
    /// Page passes across all cycles.
    pub page_passes: u64,
    /// Draw calls issued outside a paged cycle.
    pub stray_draws: u64,
}

/// One recorded driver call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelCall {
    Init,
    SetRotation(u8),
    FullWindow,
    PartialWindow(Rect),
    FirstPage,
    NextPage,
    FillScreen(Color),
    Pixel {
        x: i32,
        y: i32,
        color: Color,
    },
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Color,
    },
    Rect {
        rect: Rect,
        filled: bool,
        color: Color,
    },
    RoundRect {
        rect: Rect,
        radius: u32,
        filled: bool,
        color: Color,
    },
    Circle {
        center: (i32, i32),
        radius: u32,
        filled: bool,
        color: Color,
    },
    Triangle {
        points: [(i32, i32); 3],
        filled: bool,
        color: Color,
    },
    Bitmap {
        rect: Rect,
        fg: Color,
        bg: Option<Color>,
    },
    Text {
        x: i32,
        baseline: i32,
        text: String,
        color: Color,
    },
}

impl PanelCall {
    /// Whether this call puts pixels into the page buffer.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        !matches!(
            self,
            Self::Init
                | Self::SetRotation(_)
                | Self::FullWindow
                | Self::PartialWindow(_)
                | Self::FirstPage
                | Self::NextPage
        )
    }
}

/// A software e-paper panel. See the module docs.
#[derive(Clone, Debug)]
pub struct MemoryPanel {
    options: MemoryPanelOptions,
    /// One byte per physical pixel, `true` = black.
    pixels: Vec<bool>,
    rotation: u8,
    /// Physical-space window.
    window: Rect,
    full_window: bool,
    /// Physical row range of the current page, while a cycle is running.
    band: Option<Rect>,
    stats: PanelStats,
    calls: Vec<PanelCall>,
}

impl MemoryPanel {
    /// Create a panel with default 128x296 geometry, all white.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(MemoryPanelOptions::default())
    }

    #[must_use]
    pub fn with_options(options: MemoryPanelOptions) -> Self {
        let options = MemoryPanelOptions {
            page_height: options.page_height.max(1),
            ..options
        };
        Self {
            pixels: vec![false; options.width as usize * options.height as usize],
            rotation: 0,
            window: Rect::new(0, 0, options.width, options.height),
            full_window: true,
            band: None,
            stats: PanelStats::default(),
            calls: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> MemoryPanelOptions {
        self.options
    }

    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub fn stats(&self) -> PanelStats {
        self.stats
    }

    /// Recorded calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[PanelCall] {
        &self.calls
    }

    /// Take and clear the call log.
    pub fn take_calls(&mut self) -> Vec<PanelCall> {
        std::mem::take(&mut self.calls)
    }

    /// Color of a logical pixel under the current rotation.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.to_physical(x, y)
            .map_or(Color::BACKGROUND, |(px, py)| Color::from_bit(self.pixels[self.index(px, py)]))
    }

    /// Count black pixels inside a logical rectangle.
    #[must_use]
    pub fn ink_in(&self, rect: Rect) -> usize {
        let mut count = 0;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if self.pixel(x, y).is_ink() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Count all black pixels.
    #[must_use]
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Every black logical pixel under the current rotation.
    #[must_use]
    pub fn ink_pixels(&self) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                if self.pixel(x, y).is_ink() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Render the logical view as text: `#` for black, `.` for white.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                out.push(if self.pixel(x, y).is_ink() { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, px: u32, py: u32) -> usize {
        py as usize * self.options.width as usize + px as usize
    }

    fn logical_size(&self) -> (u32, u32) {
        let (w, h) = (self.options.width, self.options.height);
        if self.rotation & 1 == 1 { (h, w) } else { (w, h) }
    }

    fn to_physical(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let (lw, lh) = self.logical_size();
        if x < 0 || y < 0 || x >= lw as i32 || y >= lh as i32 {
            return None;
        }
        let (w, h) = (self.options.width as i32, self.options.height as i32);
        let (px, py) = match self.rotation & 3 {
            0 => (x, y),
            1 => (w - 1 - y, x),
            2 => (w - 1 - x, h - 1 - y),
            _ => (y, h - 1 - x),
        };
        Some((px as u32, py as u32))
    }

    fn physical_rect(&self, rect: Rect) -> Option<Rect> {
        let (lw, lh) = self.logical_size();
        let clipped = rect.intersect(&Rect::new(0, 0, lw, lh))?;
        let (x0, y0) = self.to_physical(clipped.x, clipped.y)?;
        let (x1, y1) = self.to_physical(clipped.right() - 1, clipped.bottom() - 1)?;
        Some(Rect::from_corners(x0 as i32, y0 as i32, x1 as i32, y1 as i32))
    }

    fn band_for(&self, page: i32) -> Rect {
        let ph = self.options.page_height;
        Rect::new(0, page * ph as i32, self.options.width, ph)
    }

    fn record(&mut self, call: PanelCall) {
        if call.is_draw() && self.band.is_none() {
            self.stats.stray_draws += 1;
        }
        self.calls.push(call);
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        let Some(band) = self.band else {
            return;
        };
        let Some((px, py)) = self.to_physical(x, y) else {
            return;
        };
        let (px_i, py_i) = (px as i32, py as i32);
        if self.window.contains(px_i, py_i) && band.contains(px_i, py_i) {
            let idx = self.index(px, py);
            self.pixels[idx] = color.is_ink();
        }
    }
}

impl Default for MemoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelDriver for MemoryPanel {
    fn init(&mut self) {
        self.record(PanelCall::Init);
    }

    fn width(&self) -> u32 {
        self.logical_size().0
    }

    fn height(&self) -> u32 {
        self.logical_size().1
    }

    fn set_rotation(&mut self, rotation: u8) {
        self.record(PanelCall::SetRotation(rotation));
        self.rotation = rotation & 3;
    }

    fn set_full_window(&mut self) {
        self.record(PanelCall::FullWindow);
        self.window = Rect::new(0, 0, self.options.width, self.options.height);
        self.full_window = true;
    }

    fn set_partial_window(&mut self, window: Rect) {
        self.record(PanelCall::PartialWindow(window));
        self.window = self.physical_rect(window).unwrap_or_default();
        self.full_window = false;
    }

    fn first_page(&mut self) {
        self.record(PanelCall::FirstPage);
        let first = self.window.y.max(0) / self.options.page_height as i32;
        self.band = Some(self.band_for(first));
        self.stats.page_passes += 1;
    }

    fn next_page(&mut self) -> bool {
        self.record(PanelCall::NextPage);
        let Some(band) = self.band else {
            return false;
        };
        let next = band.y / self.options.page_height as i32 + 1;
        let next_band = self.band_for(next);
        if next_band.y < self.window.bottom() && next_band.y < self.options.height as i32 {
            self.band = Some(next_band);
            self.stats.page_passes += 1;
            true
        } else {
            self.band = None;
            if self.full_window {
                self.stats.full_refreshes += 1;
            } else {
                self.stats.partial_refreshes += 1;
            }
            false
        }
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.record(PanelCall::Pixel { x, y, color });
        self.plot(x, y, color);
    }

    fn fill_screen(&mut self, color: Color) {
        self.record(PanelCall::FillScreen(color));
        let (w, h) = self.logical_size();
        raster::fill_rect(0, 0, w, h, &mut |px, py| self.plot(px, py, color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        self.record(PanelCall::Rect {
            rect: Rect::new(x, y, w, h),
            filled: true,
            color,
        });
        raster::fill_rect(x, y, w, h, &mut |px, py| self.plot(px, py, color));
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        self.record(PanelCall::Rect {
            rect: Rect::new(x, y, w, h),
            filled: false,
            color,
        });
        raster::rect_outline(x, y, w, h, &mut |px, py| self.plot(px, py, color));
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.record(PanelCall::Line {
            from: (x0, y0),
            to: (x1, y1),
            color,
        });
        raster::line(x0, y0, x1, y1, &mut |px, py| self.plot(px, py, color));
    }

    fn draw_circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        self.record(PanelCall::Circle {
            center: (x, y),
            radius: r,
            filled: false,
            color,
        });
        let r = r.min(i32::MAX as u32) as i32;
        raster::circle(x, y, r, &mut |px, py| self.plot(px, py, color));
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        self.record(PanelCall::Circle {
            center: (x, y),
            radius: r,
            filled: true,
            color,
        });
        let r = r.min(i32::MAX as u32) as i32;
        raster::fill_circle(x, y, r, &mut |px, py| self.plot(px, py, color));
    }

    fn draw_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        self.record(PanelCall::Triangle {
            points: [p0, p1, p2],
            filled: false,
            color,
        });
        for (a, b) in [(p0, p1), (p1, p2), (p2, p0)] {
            raster::line(a.0, a.1, b.0, b.1, &mut |px, py| self.plot(px, py, color));
        }
    }

    fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        self.record(PanelCall::Triangle {
            points: [p0, p1, p2],
            filled: true,
            color,
        });
        raster::fill_triangle(p0, p1, p2, &mut |px, py| self.plot(px, py, color));
    }

    fn draw_round_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, color: Color) {
        self.record(PanelCall::RoundRect {
            rect: Rect::new(x, y, w, h),
            radius: r,
            filled: false,
            color,
        });
        raster::round_rect(x, y, w, h, r, &mut |px, py| self.plot(px, py, color));
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u32, color: Color) {
        self.record(PanelCall::RoundRect {
            rect: Rect::new(x, y, w, h),
            radius: r,
            filled: true,
            color,
        });
        raster::fill_round_rect(x, y, w, h, r, &mut |px, py| self.plot(px, py, color));
    }

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
        self.record(PanelCall::Bitmap {
            rect: Rect::new(x, y, w, h),
            fg,
            bg,
        });
        let row_len = (w as usize).div_ceil(8);
        for row in 0..h as usize {
            for col in 0..w as usize {
                let Some(&byte) = bitmap.get(row * row_len + col / 8) else {
                    return;
                };
                let (px, py) = (x + col as i32, y + row as i32);
                if byte & (0x80 >> (col % 8)) != 0 {
                    self.plot(px, py, fg);
                } else if let Some(bg) = bg {
                    self.plot(px, py, bg);
                }
            }
        }
    }

    fn draw_text(&mut self, x: i32, baseline: i32, text: &str, font: &dyn TextMetrics, color: Color) {
        self.record(PanelCall::Text {
            x,
            baseline,
            text: text.to_string(),
            color,
        });
        let top = baseline - font.ascent();
        let height = font.extent().max(0) as u32;
        let mut cursor = x;
        for (i, ch) in text.char_indices() {
            let advance = font.width(&text[i..i + ch.len_utf8()]);
            if !ch.is_whitespace() && advance > 1 {
                raster::fill_rect(cursor, top, (advance - 1) as u32, height, &mut |px, py| {
                    self.plot(px, py, color);
                });
            }
            cursor += advance;
        }
    }
}
