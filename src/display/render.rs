//! Label draw dispatch.
//!
//! [`render_label`] turns one label into panel primitive calls. It never
//! selects windows or runs page loops; the reconciler does that and calls
//! in here once per page pass.

use crate::bounds::layout_text;
use crate::color::Color;
use crate::label::{BitmapShape, ColorDepth, Label, LineShape, Shape, TextShape, mirror_bitmap};
use crate::panel::PanelDriver;
use tracing::{debug, warn};

/// Draw `label` in its current state.
///
/// An invisible label only clears the region it last drew and never
/// reaches the shape dispatch.
pub(crate) fn render_label<P: PanelDriver + ?Sized>(panel: &mut P, label: &Label, line_gap: i32) {
    if !label.visible {
        if let Some(region) = label.drawn_region() {
            panel.fill_rect(region.x, region.y, region.width, region.height, Color::BACKGROUND);
        }
        return;
    }

    let (x, y, color) = (label.x, label.y, label.color);
    match &label.shape {
        Shape::Text(text) => render_text(panel, label, text, line_gap),
        Shape::Rect(r) if r.filled => panel.fill_rect(x, y, r.width, r.height, color),
        Shape::Rect(r) => panel.draw_rect(x, y, r.width, r.height, color),
        Shape::RoundRect(r) if r.filled => {
            panel.fill_round_rect(x, y, r.width, r.height, r.radius, color);
        }
        Shape::RoundRect(r) => panel.draw_round_rect(x, y, r.width, r.height, r.radius, color),
        Shape::Line(line) => render_line(panel, x, y, line, color),
        Shape::Circle(c) if c.filled => panel.fill_circle(x, y, c.radius, color),
        Shape::Circle(c) => panel.draw_circle(x, y, c.radius, color),
        Shape::Triangle(t) if t.filled => {
            panel.fill_triangle((x, y), (t.x1, t.y1), (t.x2, t.y2), color);
        }
        Shape::Triangle(t) => panel.draw_triangle((x, y), (t.x1, t.y1), (t.x2, t.y2), color),
        Shape::Pixel => panel.draw_pixel(x, y, color),
        Shape::Bitmap(bitmap) => render_bitmap(panel, x, y, bitmap, color),
    }
}

fn render_text<P: PanelDriver + ?Sized>(
    panel: &mut P,
    label: &Label,
    text: &TextShape,
    line_gap: i32,
) {
    let (Some(font), Some(layout)) = (
        text.font.as_deref(),
        layout_text(label.x, label.y, text, line_gap),
    ) else {
        debug!(x = label.x, y = label.y, "text label has no font, nothing drawn");
        return;
    };

    let ink = if text.invert {
        let b = layout.bounds;
        panel.fill_rect(b.x, b.y, b.width, b.height, label.color);
        label.color.inverted()
    } else {
        label.color
    };

    for line in &layout.lines {
        panel.draw_text(line.x, line.baseline, &line.text, font, ink);
    }
}

/// Thick lines are drawn as parallel one-pixel lines offset across the
/// minor axis, `-(stroke-1)/2 ..= stroke/2`.
fn render_line<P: PanelDriver + ?Sized>(panel: &mut P, x: i32, y: i32, line: &LineShape, color: Color) {
    let stroke = line.stroke.clamp(1, i32::MAX as u32) as i32;
    let mostly_horizontal = (line.x1 - x).abs() >= (line.y1 - y).abs();
    for offset in -((stroke - 1) / 2)..=stroke / 2 {
        if mostly_horizontal {
            panel.draw_line(x, y + offset, line.x1, line.y1 + offset, color);
        } else {
            panel.draw_line(x + offset, y, line.x1 + offset, line.y1, color);
        }
    }
}

fn render_bitmap<P: PanelDriver + ?Sized>(
    panel: &mut P,
    x: i32,
    y: i32,
    bitmap: &BitmapShape,
    color: Color,
) {
    let Some(data) = bitmap.data.as_deref() else {
        warn!(x, y, "bitmap label has no pixel data, nothing drawn");
        return;
    };
    if bitmap.depth != ColorDepth::Mono {
        debug!(depth = ?bitmap.depth, "multi-color bitmaps are not drawn on a mono panel");
        return;
    }
    let needed = bitmap.row_bytes() * bitmap.height as usize;
    if data.len() < needed {
        warn!(have = data.len(), needed, "bitmap data shorter than its size, nothing drawn");
        return;
    }

    let scratch;
    let pixels = if bitmap.mirror.is_empty() {
        data
    } else {
        match mirror_bitmap(data, bitmap.width, bitmap.height, bitmap.mirror) {
            Some(buf) => {
                scratch = buf;
                scratch.as_slice()
            }
            None => {
                warn!(
                    width = bitmap.width,
                    height = bitmap.height,
                    "mirror scratch buffer unavailable, bitmap skipped"
                );
                return;
            }
        }
    };

    let (fg, bg) = if bitmap.invert {
        (color.inverted(), color)
    } else {
        (color, Color::BACKGROUND)
    };
    panel.draw_bitmap(x, y, pixels, bitmap.width, bitmap.height, fg, Some(bg));
}
