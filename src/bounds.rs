//! Covering rectangles and text layout.
//!
//! An undersized refresh window leaves stale ink on a bistable panel that
//! only a full repaint can remove, so every rectangle produced here must
//! contain every pixel the renderer can touch for the same label state.
//!
//! Text is laid out once by [`layout_text`]: the bounds and the per-line
//! cursor positions come out of the same call, and the renderer draws
//! exactly the [`PlacedLine`]s that the bounds were computed from.
//!
//! # Rules
//!
//! - Glyphs sit on a baseline and span `ascent` above and `|descent|` below.
//! - Without a wrap box (`max_width == 0`) the anchor is aligned left,
//!   centred (`x - w/2`) or right (`x - w`) against the measured width.
//! - With a wrap box and text that fits, the text is aligned inside
//!   `[x, x + max_width)` and the bounds are as tight as the text.
//! - With text that overflows the box, lines are wrapped per codepoint and
//!   each line is aligned inside the box. The bounds cover the whole box
//!   (`max_width` wide, starting at `x`) so a later, shorter text still
//!   clears everything the longer one drew; a single codepoint wider than
//!   the box widens the bounds to cover it.
//! - Line pitch is `ascent + |descent| + line_gap`.
//! - A declared height only ever grows a single-line box, never shrinks it
//!   below the glyph extent.

use crate::font::TextMetrics;
use crate::geometry::Rect;
use crate::label::{Align, Label, Shape, TextShape};
use crate::text::{decode_lossy, wrap_lines};

/// Default extra pixels between wrapped lines.
pub const DEFAULT_LINE_GAP: i32 = 2;

/// One line of text with its cursor position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLine {
    pub x: i32,
    pub baseline: i32,
    pub width: i32,
    pub text: String,
}

/// Lines to draw plus the rectangle that covers them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    pub bounds: Rect,
    pub wrapped: bool,
}

/// Distance between consecutive baselines of wrapped text.
#[must_use]
pub fn line_height(font: &dyn TextMetrics, line_gap: i32) -> i32 {
    font.extent() + line_gap.max(0)
}

/// Lay out a text shape anchored at baseline `(x, y)`.
///
/// Returns `None` when no font is bound: nothing can be measured and
/// nothing will be drawn.
#[must_use]
pub fn layout_text(x: i32, y: i32, shape: &TextShape, line_gap: i32) -> Option<TextLayout> {
    let font = shape.font.as_deref()?;
    let text = shape.text.resolve();
    Some(layout_bytes(x, y, text.as_bytes(), shape, font, line_gap))
}

/// Lay out raw bytes with an explicit font. See [`layout_text`].
#[must_use]
pub fn layout_bytes(
    x: i32,
    y: i32,
    bytes: &[u8],
    shape: &TextShape,
    font: &dyn TextMetrics,
    line_gap: i32,
) -> TextLayout {
    let ascent = font.ascent();
    let extent = font.extent();
    let top = y - ascent;
    let box_width = shape.max_width.min(i32::MAX as u32) as i32;

    let text = decode_lossy(bytes);
    let total_width = font.width(&text);

    if box_width == 0 || total_width <= box_width {
        let line_x = if box_width == 0 {
            match shape.align {
                Align::Left => x,
                Align::Center => x - total_width / 2,
                Align::Right => x - total_width,
            }
        } else {
            align_in_box(x, box_width, total_width, shape.align)
        };
        let height = extent.max(shape.height.min(i32::MAX as u32) as i32);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            vec![PlacedLine {
                x: line_x,
                baseline: y,
                width: total_width,
                text,
            }]
        };
        return TextLayout {
            lines,
            bounds: Rect::new(line_x, top, total_width.max(0) as u32, height.max(0) as u32),
            wrapped: false,
        };
    }

    let pitch = line_height(font, line_gap);
    let mut placed = Vec::new();
    for (row, line) in wrap_lines(bytes, box_width, font).into_iter().enumerate() {
        placed.push(PlacedLine {
            x: align_in_box(x, box_width, line.width, shape.align),
            baseline: y + row as i32 * pitch,
            width: line.width,
            text: line.text,
        });
    }

    let reserved = Rect::new(
        x,
        top,
        box_width as u32,
        (placed.len() as i32 * pitch).max(0) as u32,
    );
    let bounds = placed.iter().fold(reserved, |acc, line| {
        acc.union(&Rect::new(
            line.x,
            line.baseline - ascent,
            line.width.max(0) as u32,
            extent.max(0) as u32,
        ))
    });

    TextLayout {
        lines: placed,
        bounds,
        wrapped: true,
    }
}

fn align_in_box(x: i32, box_width: i32, width: i32, align: Align) -> i32 {
    match align {
        Align::Left => x,
        Align::Center => x + (box_width - width) / 2,
        Align::Right => x + box_width - width,
    }
}

/// Bounds of a text label, or `None` if it is not text or has no font.
#[must_use]
pub fn text_bounds(label: &Label, line_gap: i32) -> Option<Rect> {
    match &label.shape {
        Shape::Text(text) => layout_text(label.x, label.y, text, line_gap).map(|l| l.bounds),
        _ => None,
    }
}

/// Smallest rectangle covering everything `label` draws in its current state.
///
/// Returns `None` only for text without a bound font.
#[must_use]
pub fn covering_region(label: &Label, line_gap: i32) -> Option<Rect> {
    let (x, y) = (label.x, label.y);
    let region = match &label.shape {
        Shape::Text(_) => return text_bounds(label, line_gap),
        Shape::Rect(r) => Rect::new(x, y, r.width, r.height),
        Shape::RoundRect(r) => Rect::new(x, y, r.width, r.height),
        Shape::Bitmap(b) => Rect::new(x, y, b.width, b.height),
        Shape::Line(l) => Rect::from_corners(x, y, l.x1, l.y1).inflate(l.stroke / 2),
        Shape::Circle(c) => {
            let r = c.radius.min(i32::MAX as u32 / 2) as i32;
            Rect::new(x - r, y - r, 2 * r as u32 + 1, 2 * r as u32 + 1)
        }
        Shape::Triangle(t) => {
            let left = x.min(t.x1).min(t.x2);
            let right = x.max(t.x1).max(t.x2);
            let top = y.min(t.y1).min(t.y2);
            let bottom = y.max(t.y1).max(t.y2);
            Rect::from_corners(left, top, right, bottom)
        }
        Shape::Pixel => Rect::new(x, y, 1, 1),
    };
    Some(region)
}
