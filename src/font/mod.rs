//! Text metrics collaborator.
//!
//! The core never rasterises glyphs itself: it only asks a font for the
//! pixel width of a UTF-8 string and for its vertical extent around the
//! baseline. Panel drivers receive the same handle when drawing text.

mod mono;

pub use mono::MonoFont;

use std::fmt;
use std::sync::Arc;

/// Pixel metrics of a bound font.
///
/// Text is anchored at its baseline: glyphs extend `ascent` pixels above it
/// and `|descent|` pixels below it. Implementations usually report
/// `descent` as a non-positive number, but only its magnitude is used.
pub trait TextMetrics: Send + Sync + fmt::Debug {
    /// Rendered width of `text` in pixels.
    fn width(&self, text: &str) -> i32;

    /// Pixels above the baseline.
    fn ascent(&self) -> i32;

    /// Pixels below the baseline (sign is ignored).
    fn descent(&self) -> i32;

    /// Full glyph height: `ascent + |descent|`.
    fn extent(&self) -> i32 {
        self.ascent() + self.descent().abs()
    }
}

/// Shared reference to a font, stored on text labels.
pub type FontHandle = Arc<dyn TextMetrics>;
