//! Fixed-advance font metrics.

use super::TextMetrics;
use unicode_width::UnicodeWidthChar;

/// A monospace font whose advance scales with Unicode display width.
///
/// Narrow characters take one `advance`, East Asian wide characters take
/// two and zero-width characters take none, so `"你好"` measures the same
/// as four ASCII letters. Widths are additive over codepoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonoFont {
    pub advance: i32,
    pub ascent: i32,
    pub descent: i32,
}

impl MonoFont {
    #[must_use]
    pub const fn new(advance: i32, ascent: i32, descent: i32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }

    /// Width of a single codepoint.
    #[must_use]
    pub fn char_width(&self, c: char) -> i32 {
        let columns = if c < ' ' {
            0
        } else {
            UnicodeWidthChar::width(c).unwrap_or(0)
        };
        columns as i32 * self.advance
    }
}

impl Default for MonoFont {
    /// Roughly the 12px CJK bitmap fonts used on 2.9" panels.
    fn default() -> Self {
        Self::new(6, 10, -2)
    }
}

impl TextMetrics for MonoFont {
    fn width(&self, text: &str) -> i32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }

    fn ascent(&self) -> i32 {
        self.ascent
    }

    fn descent(&self) -> i32 {
        self.descent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let font = MonoFont::new(8, 12, -3);
        assert_eq!(font.width("05:20"), 40);
        assert_eq!(font.width(""), 0);
    }

    #[test]
    fn test_cjk_counts_double() {
        let font = MonoFont::new(8, 12, -3);
        assert_eq!(font.width("你好"), 32);
        assert_eq!(font.char_width('界'), 16);
    }

    #[test]
    fn test_zero_width_and_controls() {
        let font = MonoFont::new(8, 12, -3);
        assert_eq!(font.char_width('\u{0301}'), 0);
        assert_eq!(font.char_width('\n'), 0);
    }

    #[test]
    fn test_extent_uses_descent_magnitude() {
        assert_eq!(MonoFont::new(8, 12, -3).extent(), 15);
        assert_eq!(MonoFont::new(8, 12, 3).extent(), 15);
    }
}
