//! Integer rasterisers for panel primitives.
//!
//! These are the classic GFX-library algorithms (Bresenham lines, midpoint
//! circles, scanline triangles). They emit pixels and spans through
//! callbacks so any driver can reuse them against its own page buffer.

/// Plot every pixel of a rectangle, row by row.
pub fn fill_rect(x: i32, y: i32, w: u32, h: u32, plot: &mut impl FnMut(i32, i32)) {
    let (w, h) = (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32);
    for py in y..y.saturating_add(h) {
        for px in x..x.saturating_add(w) {
            plot(px, py);
        }
    }
}

/// One-pixel outline of a rectangle.
pub fn rect_outline(x: i32, y: i32, w: u32, h: u32, plot: &mut impl FnMut(i32, i32)) {
    if w == 0 || h == 0 {
        return;
    }
    let (w, h) = (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32);
    let (right, bottom) = (x + w - 1, y + h - 1);
    for px in x..=right {
        plot(px, y);
        if bottom != y {
            plot(px, bottom);
        }
    }
    for py in (y + 1)..bottom {
        plot(x, py);
        if right != x {
            plot(right, py);
        }
    }
}

/// Bresenham line including both endpoints.
pub fn line(x0: i32, y0: i32, x1: i32, y1: i32, plot: &mut impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Midpoint circle outline.
pub fn circle(x0: i32, y0: i32, r: i32, plot: &mut impl FnMut(i32, i32)) {
    if r < 0 {
        return;
    }
    plot(x0, y0 + r);
    plot(x0, y0 - r);
    plot(x0 + r, y0);
    plot(x0 - r, y0);
    circle_quadrants(x0, y0, r, 0xF, plot);
}

/// Quarter arcs of a circle. `corners` bits: 1 = top-left, 2 = top-right,
/// 4 = bottom-right, 8 = bottom-left.
pub fn circle_quadrants(x0: i32, y0: i32, r: i32, corners: u8, plot: &mut impl FnMut(i32, i32)) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;
    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;
        if corners & 0x4 != 0 {
            plot(x0 + x, y0 + y);
            plot(x0 + y, y0 + x);
        }
        if corners & 0x2 != 0 {
            plot(x0 + x, y0 - y);
            plot(x0 + y, y0 - x);
        }
        if corners & 0x8 != 0 {
            plot(x0 - y, y0 + x);
            plot(x0 - x, y0 + y);
        }
        if corners & 0x1 != 0 {
            plot(x0 - y, y0 - x);
            plot(x0 - x, y0 - y);
        }
    }
}

/// Filled circle.
pub fn fill_circle(x0: i32, y0: i32, r: i32, plot: &mut impl FnMut(i32, i32)) {
    if r < 0 {
        return;
    }
    vline(x0, y0 - r, 2 * r + 1, plot);
    fill_circle_halves(x0, y0, r, 0x3, 0, plot);
}

/// Vertical spans of the right (`0x1`) and/or left (`0x2`) half of a
/// circle, stretched downward by `delta` rows.
pub fn fill_circle_halves(
    x0: i32,
    y0: i32,
    r: i32,
    halves: u8,
    delta: i32,
    plot: &mut impl FnMut(i32, i32),
) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;
    let mut px = x;
    let mut py = y;
    let delta = delta + 1;
    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;
        if x < y + 1 {
            if halves & 0x1 != 0 {
                vline(x0 + x, y0 - y, 2 * y + delta, plot);
            }
            if halves & 0x2 != 0 {
                vline(x0 - x, y0 - y, 2 * y + delta, plot);
            }
        }
        if y != py {
            if halves & 0x1 != 0 {
                vline(x0 + py, y0 - px, 2 * px + delta, plot);
            }
            if halves & 0x2 != 0 {
                vline(x0 - py, y0 - px, 2 * px + delta, plot);
            }
            py = y;
        }
        px = x;
    }
}

/// Rounded rectangle outline. The radius is clamped to half the short side.
pub fn round_rect(x: i32, y: i32, w: u32, h: u32, r: u32, plot: &mut impl FnMut(i32, i32)) {
    if w == 0 || h == 0 {
        return;
    }
    let (w, h) = (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32);
    let r = (r.min(i32::MAX as u32) as i32).min(w.min(h) / 2);
    hline(x + r, y, w - 2 * r, plot);
    hline(x + r, y + h - 1, w - 2 * r, plot);
    vline(x, y + r, h - 2 * r, plot);
    vline(x + w - 1, y + r, h - 2 * r, plot);
    circle_quadrants(x + r, y + r, r, 0x1, plot);
    circle_quadrants(x + w - r - 1, y + r, r, 0x2, plot);
    circle_quadrants(x + w - r - 1, y + h - r - 1, r, 0x4, plot);
    circle_quadrants(x + r, y + h - r - 1, r, 0x8, plot);
}

/// Filled rounded rectangle.
pub fn fill_round_rect(x: i32, y: i32, w: u32, h: u32, r: u32, plot: &mut impl FnMut(i32, i32)) {
    if w == 0 || h == 0 {
        return;
    }
    let (wi, hi) = (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32);
    let r = (r.min(i32::MAX as u32) as i32).min(wi.min(hi) / 2);
    fill_rect(x + r, y, (wi - 2 * r) as u32, h, plot);
    fill_circle_halves(x + wi - r - 1, y + r, r, 0x1, hi - 2 * r - 1, plot);
    fill_circle_halves(x + r, y + r, r, 0x2, hi - 2 * r - 1, plot);
}

/// Filled triangle by scanline intersection of its three edges.
pub fn fill_triangle(
    p0: (i32, i32),
    p1: (i32, i32),
    p2: (i32, i32),
    plot: &mut impl FnMut(i32, i32),
) {
    let top = p0.1.min(p1.1).min(p2.1);
    let bottom = p0.1.max(p1.1).max(p2.1);
    let edges = [(p0, p1), (p1, p2), (p2, p0)];
    for y in top..=bottom {
        let mut span: Option<(i32, i32)> = None;
        for ((xa, ya), (xb, yb)) in edges {
            if y < ya.min(yb) || y > ya.max(yb) {
                continue;
            }
            let xs = if ya == yb {
                [xa, xb]
            } else {
                let x = xa + (y - ya) * (xb - xa) / (yb - ya);
                [x, x]
            };
            for x in xs {
                span = Some(span.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
            }
        }
        if let Some((lo, hi)) = span {
            hline(lo, y, hi - lo + 1, plot);
        }
    }
}

fn hline(x: i32, y: i32, len: i32, plot: &mut impl FnMut(i32, i32)) {
    for px in x..x + len.max(0) {
        plot(px, y);
    }
}

fn vline(x: i32, y: i32, len: i32, plot: &mut impl FnMut(i32, i32)) {
    for py in y..y + len.max(0) {
        plot(x, py);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect(f: impl FnOnce(&mut dyn FnMut(i32, i32))) -> HashSet<(i32, i32)> {
        let mut points = HashSet::new();
        f(&mut |x, y| {
            points.insert((x, y));
        });
        points
    }

    #[test]
    fn test_line_endpoints_and_count() {
        let pts = collect(|p| line(0, 0, 5, 0, &mut |x, y| p(x, y)));
        assert_eq!(pts.len(), 6);
        assert!(pts.contains(&(0, 0)) && pts.contains(&(5, 0)));

        let pts = collect(|p| line(3, 3, 0, 0, &mut |x, y| p(x, y)));
        assert_eq!(pts.len(), 4);
    }

    #[test]
    fn test_rect_outline_has_hollow_center() {
        let pts = collect(|p| rect_outline(0, 0, 4, 3, &mut |x, y| p(x, y)));
        assert_eq!(pts.len(), 10);
        assert!(!pts.contains(&(1, 1)));
    }

    #[test]
    fn test_circle_stays_within_radius_box() {
        let pts = collect(|p| fill_circle(10, 10, 4, &mut |x, y| p(x, y)));
        assert!(pts.contains(&(10, 10)));
        assert!(pts.contains(&(6, 10)) && pts.contains(&(14, 10)));
        assert!(pts.iter().all(|&(x, y)| (6..=14).contains(&x) && (6..=14).contains(&y)));
    }

    #[test]
    fn test_round_rect_stays_within_box() {
        let pts = collect(|p| fill_round_rect(2, 3, 10, 6, 3, &mut |x, y| p(x, y)));
        assert!(pts.iter().all(|&(x, y)| (2..12).contains(&x) && (3..9).contains(&y)));
        assert!(!pts.contains(&(2, 3)), "corner should be rounded off");
        let outline = collect(|p| round_rect(2, 3, 10, 6, 3, &mut |x, y| p(x, y)));
        assert!(outline.iter().all(|&(x, y)| (2..12).contains(&x) && (3..9).contains(&y)));
    }

    #[test]
    fn test_fill_triangle_covers_vertices() {
        let pts = collect(|p| fill_triangle((5, 0), (0, 10), (10, 8), &mut |x, y| p(x, y)));
        for v in [(5, 0), (0, 10), (10, 8)] {
            assert!(pts.contains(&v), "missing vertex {v:?}");
        }
        assert!(pts.iter().all(|&(x, y)| (0..=10).contains(&x) && (0..=10).contains(&y)));
    }
}
