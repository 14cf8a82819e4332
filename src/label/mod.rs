//! Drawable labels.
//!
//! A [`Label`] is one retained UI primitive: common placement and style
//! attributes plus exactly one [`Shape`]. Labels are plain data; callers
//! obtain them mutably from the display and assign fields directly, then ask
//! the display to refresh.
//!
//! # Examples
//!
//! ```
//! use epaper_ui::label::{Align, Label, TextShape};
//! use epaper_ui::font::{FontHandle, MonoFont};
//! use std::sync::Arc;
//!
//! let font: FontHandle = Arc::new(MonoFont::default());
//! let clock = Label::text(98, 25, TextShape::new("05:20", Some(font)).align(Align::Center))
//!     .on_page(2);
//! assert_eq!(clock.page, 2);
//! ```

mod bitmap;

pub use bitmap::{BitmapShape, ColorDepth, Mirror, mirror_bitmap, reverse_byte};

use crate::color::Color;
use crate::font::FontHandle;
use crate::geometry::Rect;
use std::fmt;
use std::sync::Arc;

/// Rotation labels are created with: landscape on a portrait 128x296 panel.
pub const DEFAULT_ROTATION: u8 = 1;

/// Page labels belong to unless placed elsewhere.
pub const DEFAULT_PAGE: u16 = 1;

/// Horizontal text alignment relative to the anchor (or the wrap box).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Where a text label gets its string from.
///
/// Dynamic sources are evaluated every time the label is measured or
/// drawn; the result is never cached.
#[derive(Clone)]
pub enum TextSource {
    Static(String),
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl TextSource {
    /// A source that queries `f` at render time.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Produce the current string.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Static(s) => s.clone(),
            Self::Dynamic(f) => f(),
        }
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::Static(String::new())
    }
}

impl fmt::Debug for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for TextSource {
    fn from(s: &str) -> Self {
        Self::Static(s.to_string())
    }
}

impl From<String> for TextSource {
    fn from(s: String) -> Self {
        Self::Static(s)
    }
}

/// Text shape attributes.
#[derive(Clone, Debug, Default)]
pub struct TextShape {
    pub text: TextSource,
    /// `None` means the label measures and draws nothing.
    pub font: Option<FontHandle>,
    pub align: Align,
    /// Wrap box width in pixels; 0 disables wrapping.
    pub max_width: u32,
    /// Declared box height; 0 uses the font's extent.
    pub height: u32,
    /// Paint the bounds in the label color and draw glyphs in the opposite.
    pub invert: bool,
}

impl TextShape {
    #[must_use]
    pub fn new(text: impl Into<TextSource>, font: Option<FontHandle>) -> Self {
        Self {
            text: text.into(),
            font,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RectShape {
    pub width: u32,
    pub height: u32,
    pub filled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundRectShape {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub filled: bool,
}

/// Segment from the label anchor to `(x1, y1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineShape {
    pub x1: i32,
    pub y1: i32,
    pub stroke: u32,
}

/// Circle centred on the label anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CircleShape {
    pub radius: u32,
    pub filled: bool,
}

/// Triangle whose first vertex is the label anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleShape {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub filled: bool,
}

/// The kind-specific part of a label.
#[derive(Clone, Debug)]
pub enum Shape {
    Text(TextShape),
    Rect(RectShape),
    RoundRect(RoundRectShape),
    Line(LineShape),
    Circle(CircleShape),
    Triangle(TriangleShape),
    Pixel,
    Bitmap(BitmapShape),
}

impl Shape {
    /// Short kind name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Rect(_) => "rect",
            Self::RoundRect(_) => "round_rect",
            Self::Line(_) => "line",
            Self::Circle(_) => "circle",
            Self::Triangle(_) => "triangle",
            Self::Pixel => "pixel",
            Self::Bitmap(_) => "bitmap",
        }
    }
}

/// A drawable UI element.
///
/// For text, `(x, y)` is the baseline anchor. For circles it is the centre,
/// for lines and triangles the first vertex, and the top-left corner for
/// everything else.
#[derive(Clone, Debug)]
pub struct Label {
    pub x: i32,
    pub y: i32,
    /// Quarter turns, handed to the panel unchanged.
    pub rotation: u8,
    pub color: Color,
    pub visible: bool,
    pub page: u16,
    pub shape: Shape,
    /// Region this label last put on the panel, if it is still there, and
    /// the rotation that region is expressed in.
    pub(crate) drawn: Option<(Rect, u8)>,
}

impl Label {
    /// Wrap a shape with default placement attributes.
    #[must_use]
    pub fn new(x: i32, y: i32, shape: Shape) -> Self {
        Self {
            x,
            y,
            rotation: DEFAULT_ROTATION,
            color: Color::Black,
            visible: true,
            page: DEFAULT_PAGE,
            shape,
            drawn: None,
        }
    }

    /// Text anchored at baseline `(x, y)`.
    #[must_use]
    pub fn text(x: i32, y: i32, text: TextShape) -> Self {
        Self::new(x, y, Shape::Text(text))
    }

    #[must_use]
    pub fn rect(x: i32, y: i32, width: u32, height: u32, filled: bool) -> Self {
        Self::new(
            x,
            y,
            Shape::Rect(RectShape {
                width,
                height,
                filled,
            }),
        )
    }

    #[must_use]
    pub fn round_rect(x: i32, y: i32, width: u32, height: u32, radius: u32, filled: bool) -> Self {
        Self::new(
            x,
            y,
            Shape::RoundRect(RoundRectShape {
                width,
                height,
                radius,
                filled,
            }),
        )
    }

    #[must_use]
    pub fn line(x0: i32, y0: i32, x1: i32, y1: i32, stroke: u32) -> Self {
        Self::new(x0, y0, Shape::Line(LineShape { x1, y1, stroke }))
    }

    #[must_use]
    pub fn circle(x: i32, y: i32, radius: u32, filled: bool) -> Self {
        Self::new(x, y, Shape::Circle(CircleShape { radius, filled }))
    }

    #[must_use]
    pub fn triangle(p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), filled: bool) -> Self {
        Self::new(
            p0.0,
            p0.1,
            Shape::Triangle(TriangleShape {
                x1: p1.0,
                y1: p1.1,
                x2: p2.0,
                y2: p2.1,
                filled,
            }),
        )
    }

    #[must_use]
    pub fn pixel(x: i32, y: i32) -> Self {
        Self::new(x, y, Shape::Pixel)
    }

    #[must_use]
    pub fn bitmap(x: i32, y: i32, bitmap: BitmapShape) -> Self {
        Self::new(x, y, Shape::Bitmap(bitmap))
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn on_page(mut self, page: u16) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Text attributes, if this is a text label.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextShape> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Mutable text attributes, if this is a text label.
    pub fn as_text_mut(&mut self) -> Option<&mut TextShape> {
        match &mut self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Replace the text of a text label. Returns false for other kinds.
    pub fn set_text(&mut self, text: impl Into<TextSource>) -> bool {
        match self.as_text_mut() {
            Some(t) => {
                t.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Panel region covered by this label's last draw, if any.
    #[must_use]
    pub fn drawn_region(&self) -> Option<Rect> {
        self.drawn.map(|(region, _)| region)
    }

    /// Rotation the last draw happened in. Differs from `rotation` after a
    /// direct edit until the label is refreshed.
    #[must_use]
    pub fn drawn_rotation(&self) -> Option<u8> {
        self.drawn.map(|(_, rotation)| rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonoFont;

    #[test]
    fn test_constructor_defaults() {
        let label = Label::rect(1, 2, 3, 4, true);
        assert_eq!(label.rotation, DEFAULT_ROTATION);
        assert_eq!(label.page, DEFAULT_PAGE);
        assert_eq!(label.color, Color::Black);
        assert!(label.visible);
        assert!(label.drawn_region().is_none());
        assert!(matches!(
            label.shape,
            Shape::Rect(RectShape {
                width: 3,
                height: 4,
                filled: true
            })
        ));
    }

    #[test]
    fn test_triangle_anchor_is_first_vertex() {
        let label = Label::triangle((1, 2), (3, 4), (5, 6), false);
        assert_eq!((label.x, label.y), (1, 2));
        let Shape::Triangle(t) = label.shape else {
            panic!("expected triangle");
        };
        assert_eq!((t.x1, t.y1, t.x2, t.y2), (3, 4, 5, 6));
    }

    #[test]
    fn test_builder_chain() {
        let label = Label::pixel(0, 0)
            .with_color(Color::White)
            .with_rotation(3)
            .on_page(4)
            .hidden();
        assert_eq!(label.color, Color::White);
        assert_eq!(label.rotation, 3);
        assert_eq!(label.page, 4);
        assert!(!label.visible);
    }

    #[test]
    fn test_dynamic_text_is_reevaluated() {
        use std::sync::atomic::{AtomicU32, Ordering};
        let counter = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&counter);
        let source = TextSource::dynamic(move || c.fetch_add(1, Ordering::SeqCst).to_string());
        assert_eq!(source.resolve(), "0");
        assert_eq!(source.resolve(), "1");
        assert!(source.is_dynamic());
    }

    #[test]
    fn test_set_text_only_on_text_labels() {
        let font: FontHandle = Arc::new(MonoFont::default());
        let mut text = Label::text(0, 10, TextShape::new("a", Some(font)));
        assert!(text.set_text("b"));
        assert_eq!(text.as_text().unwrap().text.resolve(), "b");

        let mut rect = Label::rect(0, 0, 1, 1, false);
        assert!(!rect.set_text("b"));
    }

    #[test]
    fn test_text_source_debug_hides_closure() {
        let s = format!("{:?}", TextSource::dynamic(String::new));
        assert_eq!(s, "Dynamic(..)");
    }
}
