//! Binary panel colors.
//!
//! Black/white e-paper panels have exactly two inks. Paper white is the
//! background every refresh starts from.

/// A pixel color on a monochrome panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Black,
    White,
}

impl Color {
    /// The paper color every refresh window is cleared to.
    pub const BACKGROUND: Self = Self::White;

    /// The opposite ink.
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Whether this color puts ink on paper.
    #[must_use]
    pub const fn is_ink(self) -> bool {
        matches!(self, Self::Black)
    }

    /// Convert a framebuffer bit (1 = black) into a color.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Black } else { Self::White }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_is_involution() {
        assert_eq!(Color::Black.inverted(), Color::White);
        assert_eq!(Color::White.inverted().inverted(), Color::White);
    }

    #[test]
    fn test_background_is_white() {
        assert_eq!(Color::BACKGROUND, Color::White);
        assert!(!Color::BACKGROUND.is_ink());
        assert_eq!(Color::from_bit(true), Color::Black);
    }
}
