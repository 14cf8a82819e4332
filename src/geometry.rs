//! Panel-space rectangles.
//!
//! [`Rect`] is used for text bounds, label covering regions and partial
//! refresh windows. Origins are signed because labels may hang off the
//! panel edge; sizes are unsigned.

/// An axis-aligned rectangle in panel pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle covering two inclusive corner points, in any order.
    #[must_use]
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        Self {
            x: left,
            y: top,
            width: (i64::from(right) - i64::from(left) + 1) as u32,
            height: (i64::from(bottom) - i64::from(top) + 1) as u32,
        }
    }

    /// Exclusive right edge.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Check if a point is inside this rectangle.
    #[must_use]
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.right() && py < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Compute intersection with another rectangle.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect {
                x: x1,
                y: y1,
                width: (x2 - x1) as u32,
                height: (y2 - y1) as u32,
            })
        } else {
            None
        }
    }

    /// Smallest rectangle covering both. Empty rectangles are ignored.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect {
            x: x1,
            y: y1,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        }
    }

    /// Grow the rectangle by `amount` pixels on every side.
    #[must_use]
    pub fn inflate(&self, amount: u32) -> Rect {
        let pad = amount.min(i32::MAX as u32) as i32;
        Rect {
            x: self.x.saturating_sub(pad),
            y: self.y.saturating_sub(pad),
            width: self.width.saturating_add(amount.saturating_mul(2)),
            height: self.height.saturating_add(amount.saturating_mul(2)),
        }
    }

    /// Check if this rectangle is empty (zero area).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_is_inclusive() {
        let r = Rect::from_corners(20, 30, 10, 30);
        assert_eq!(r, Rect::new(10, 30, 11, 1));
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 29));
        assert!(!r.contains(30, 15));
        assert!(!r.contains(15, 30));
    }

    #[test]
    fn test_contains_negative_coordinates() {
        let r = Rect::new(-10, -10, 20, 20);
        assert!(r.contains(-10, -10));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 10));
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        let b = Rect::new(10, 10, 20, 20);
        assert_eq!(a.intersect(&b), Some(Rect::new(10, 10, 10, 10)));
    }

    #[test]
    fn test_intersect_touching_edges() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn test_intersect_commutative() {
        let a = Rect::new(0, 0, 20, 20);
        let b = Rect::new(5, -5, 25, 25);
        assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 5, 20);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0, 0, 25, 25));
        assert!(u.contains_rect(&a));
        assert!(u.contains_rect(&b));
    }

    #[test]
    fn test_union_ignores_empty() {
        let a = Rect::new(3, 4, 5, 6);
        assert_eq!(a.union(&Rect::new(100, 100, 0, 9)), a);
        assert_eq!(Rect::default().union(&a), a);
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(5, 5, 2, 2).inflate(1);
        assert_eq!(r, Rect::new(4, 4, 4, 4));
    }

    #[test]
    fn test_is_empty() {
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert!(Rect::new(0, 0, 10, 0).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
