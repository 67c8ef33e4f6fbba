//! 2D primitives used by bone association.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Vec2::new(v[0], v[1])
    }
}

/// Axis-aligned rectangle anchored at its minimum corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Corner pairs forming the four edges, indexing into [`Rect::corners`].
    pub const EDGES: [(usize, usize); 4] = [(0, 1), (0, 2), (1, 3), (2, 3)];

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn x_min(&self) -> f32 {
        self.x.min(self.x + self.width)
    }

    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x.max(self.x + self.width)
    }

    #[inline]
    pub fn y_min(&self) -> f32 {
        self.y.min(self.y + self.height)
    }

    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y.max(self.y + self.height)
    }

    /// `[(xMin,yMin), (xMin,yMax), (xMax,yMin), (xMax,yMax)]`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x_min(), self.y_min()),
            Vec2::new(self.x_min(), self.y_max()),
            Vec2::new(self.x_max(), self.y_min()),
            Vec2::new(self.x_max(), self.y_max()),
        ]
    }

    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let c = self.corners();
        Self::EDGES.map(|(a, b)| (c[a], c[b]))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x_min() && p.x <= self.x_max() && p.y >= self.y_min() && p.y <= self.y_max()
    }
}

/// Squared distance from `p` to the closest point of segment `a`-`b`.
///
/// The projection of `p` onto the segment's line is clamped to the endpoints.
/// The result is left squared; it is only ever compared.
pub fn point_segment_distance_squared(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let n = b - a;
    let pa = a - p;

    let c = n.dot(pa);
    // Closest point is a.
    if c > 0.0 {
        return pa.length_squared();
    }

    let bp = p - b;
    // Closest point is b.
    if n.dot(bp) > 0.0 {
        return bp.length_squared();
    }

    let nn = n.length_squared();
    if nn == 0.0 {
        return pa.length_squared();
    }

    let e = pa - n * (c / nn);
    e.length_squared()
}

/// Whether segment `p1`-`p2` touches `rect` (boundaries inclusive).
///
/// The segment's x-range is clipped to the rect, the matching y-range is
/// read off the segment's line, and that range is clipped to the rect's
/// y-extent. Segments with `|dx| <= vertical_epsilon` keep their own y-range.
pub fn rect_intersects_segment(rect: &Rect, p1: Vec2, p2: Vec2, vertical_epsilon: f32) -> bool {
    let min_x = p1.x.min(p2.x).max(rect.x_min());
    let max_x = p1.x.max(p2.x).min(rect.x_max());
    if min_x > max_x {
        return false;
    }

    let mut min_y = p1.y.min(p2.y);
    let mut max_y = p1.y.max(p2.y);

    let dx = p2.x - p1.x;
    if dx.abs() > vertical_epsilon {
        let slope = (p2.y - p1.y) / dx;
        let intercept = p1.y - slope * p1.x;
        min_y = slope * min_x + intercept;
        max_y = slope * max_x + intercept;
    }

    if min_y > max_y {
        std::mem::swap(&mut min_y, &mut max_y);
    }

    let max_y = max_y.min(rect.y_max());
    let min_y = min_y.max(rect.y_min());
    min_y <= max_y
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn distance_at_endpoint_is_zero() {
        let (a, b) = (v(1.0, 2.0), v(7.0, -3.0));
        assert_eq!(point_segment_distance_squared(a, a, b), 0.0);
        assert_eq!(point_segment_distance_squared(b, a, b), 0.0);
    }

    #[test]
    fn distance_at_midpoint_offset_is_squared() {
        let d = 3.0;
        let got = point_segment_distance_squared(v(5.0, d), v(0.0, 0.0), v(10.0, 0.0));
        assert!((got - d * d).abs() < EPS, "got {got}");
    }

    #[test]
    fn distance_clamps_past_the_ends() {
        let (a, b) = (v(0.0, 0.0), v(10.0, 0.0));
        assert!((point_segment_distance_squared(v(-3.0, 4.0), a, b) - 25.0).abs() < EPS);
        assert!((point_segment_distance_squared(v(13.0, -4.0), a, b) - 25.0).abs() < EPS);
    }

    #[test]
    fn distance_to_degenerate_segment_is_point_distance() {
        let a = v(2.0, 2.0);
        let got = point_segment_distance_squared(v(5.0, 6.0), a, a);
        assert!((got - 25.0).abs() < EPS);
        assert!(got.is_finite());
    }

    #[test]
    fn rect_contains_segment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_intersects_segment(&r, v(2.0, 2.0), v(8.0, 8.0), f32::EPSILON));
    }

    #[test]
    fn segment_outside_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rect_intersects_segment(&r, v(20.0, 20.0), v(30.0, 30.0), f32::EPSILON));
        // Overlaps on x but passes above.
        assert!(!rect_intersects_segment(&r, v(-5.0, 20.0), v(15.0, 25.0), f32::EPSILON));
    }

    #[test]
    fn segment_crossing_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_intersects_segment(&r, v(-5.0, 5.0), v(15.0, 5.0), f32::EPSILON));
        assert!(rect_intersects_segment(&r, v(-5.0, -5.0), v(15.0, 15.0), f32::EPSILON));
    }

    #[test]
    fn diagonal_missing_the_corner() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Line y = x + 15 only reaches the x-range at y >= 15.
        assert!(!rect_intersects_segment(&r, v(-10.0, 5.0), v(0.0, 15.0), f32::EPSILON));
    }

    #[test]
    fn vertical_and_degenerate_segments() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_intersects_segment(&r, v(5.0, -5.0), v(5.0, 15.0), f32::EPSILON));
        assert!(!rect_intersects_segment(&r, v(5.0, 11.0), v(5.0, 15.0), f32::EPSILON));
        assert!(rect_intersects_segment(&r, v(3.0, 3.0), v(3.0, 3.0), f32::EPSILON));
        assert!(!rect_intersects_segment(&r, v(13.0, 3.0), v(13.0, 3.0), f32::EPSILON));
    }

    #[test]
    fn corners_and_edges_order() {
        let r = Rect::from_min_max(v(1.0, 2.0), v(4.0, 6.0));
        assert_eq!(
            r.corners(),
            [v(1.0, 2.0), v(1.0, 6.0), v(4.0, 2.0), v(4.0, 6.0)]
        );
        let edges = r.edges();
        assert_eq!(edges[0], (v(1.0, 2.0), v(1.0, 6.0)));
        assert_eq!(edges[3], (v(4.0, 2.0), v(4.0, 6.0)));
        assert!(r.contains(v(4.0, 6.0)));
        assert!(!r.contains(v(4.1, 6.0)));
    }

    #[test]
    fn negative_size_rect_normalizes_extents() {
        let r = Rect::new(10.0, 10.0, -10.0, -10.0);
        assert_eq!(r.x_min(), 0.0);
        assert_eq!(r.y_max(), 10.0);
    }
}
