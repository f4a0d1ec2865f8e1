#![forbid(unsafe_code)]

//! Geometric primitives in canvas pixels.
//!
//! Coordinates are `f64` CSS pixels with the origin at the top-left of the
//! canvas. Stored positions are unconstrained; [`clamp_position`] is what
//! makes them safe to render or persist.

use serde::{Deserialize, Serialize};

/// A point (or offset) in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The canvas origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a delta.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Replace non-finite coordinates with `0.0`.
    ///
    /// Positions loaded from storage can carry `NaN` or infinities; those
    /// would otherwise survive `f64::min`/`f64::max` in surprising ways.
    #[inline]
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.is_finite() {
            return self;
        }
        let fix = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self::new(fix(self.x), fix(self.y))
    }
}

/// A width/height pair in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if the size has no area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Centre point of a box of this size anchored at the origin.
    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Replace non-finite or negative extents with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(fix(self.width), fix(self.height))
    }
}

/// An axis-aligned rectangle used for overlap and containment tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle covering a viewport of the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }

    /// Whether `other` lies fully inside `self`.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Constrain a panel's top-left corner so the panel stays inside `boundary`.
///
/// `x' = max(0, min(x, boundary.width - dimensions.width))`, and the same for
/// `y`. When the panel is wider (or taller) than the boundary the result
/// floors at `0` and the panel overflows on the far side; that is accepted,
/// not an error.
///
/// The function is total: non-finite input coordinates are treated as `0`.
#[must_use]
pub fn clamp_position(position: Point, dimensions: Size, boundary: Size) -> Point {
    let position = position.sanitized();
    let max_x = boundary.width - dimensions.width;
    let max_y = boundary.height - dimensions.height;
    Point::new(clamp_axis(position.x, max_x), clamp_axis(position.y, max_y))
}

#[inline]
fn clamp_axis(value: f64, max: f64) -> f64 {
    // `f64::min` ignores a NaN `max`, so a degenerate boundary still yields a
    // value >= 0.
    value.min(max).max(0.0)
}

/// Round a position to the nearest multiple of `pitch` on both axes.
///
/// A non-positive or non-finite pitch leaves the position untouched.
#[must_use]
pub fn snap_to_grid(position: Point, pitch: f64) -> Point {
    if !(pitch.is_finite() && pitch > 0.0) {
        return position;
    }
    Point::new(
        (position.x / pitch).round() * pitch,
        (position.y / pitch).round() * pitch,
    )
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size, clamp_position, snap_to_grid};

    #[test]
    fn size_sanitized_zeroes_bad_extents() {
        assert_eq!(
            Size::new(f64::NAN, -3.0).sanitized(),
            Size::new(0.0, 0.0)
        );
        assert_eq!(Size::new(800.0, 600.0).sanitized(), Size::new(800.0, 600.0));
    }

    #[test]
    fn clamp_keeps_inside_positions() {
        let p = clamp_position(
            Point::new(100.0, 50.0),
            Size::new(450.0, 300.0),
            Size::new(1440.0, 900.0),
        );
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn clamp_pulls_back_far_edge() {
        let p = clamp_position(
            Point::new(5000.0, 5000.0),
            Size::new(450.0, 300.0),
            Size::new(1440.0, 900.0),
        );
        assert_eq!(p, Point::new(990.0, 600.0));
    }

    #[test]
    fn clamp_floors_negative_positions() {
        let p = clamp_position(
            Point::new(-20.0, -1.0),
            Size::new(450.0, 300.0),
            Size::new(1440.0, 900.0),
        );
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn narrow_boundary_floors_to_zero() {
        let p = clamp_position(
            Point::new(40.0, 10.0),
            Size::new(800.0, 500.0),
            Size::new(375.0, 667.0),
        );
        assert_eq!(p, Point::new(0.0, 10.0));
    }

    #[test]
    fn point_sanitized_keeps_finite_axis() {
        let p = Point::new(f64::NAN, 7.0);
        assert!(!p.is_finite());
        let fixed = p.sanitized();
        assert!(fixed.is_finite());
        assert_eq!(fixed, Point::new(0.0, 7.0));
    }

    #[test]
    fn clamp_sanitizes_non_finite() {
        let p = clamp_position(
            Point::new(f64::NAN, f64::INFINITY),
            Size::new(10.0, 10.0),
            Size::new(100.0, 100.0),
        );
        assert_eq!(p, Point::ORIGIN);
    }

    #[test]
    fn rect_edge_contact_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn rect_containment() {
        let outer = Rect::from_size(Size::new(100.0, 100.0));
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(!outer.contains_rect(&Rect::new(1.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn snap_rounds_to_pitch() {
        assert_eq!(
            snap_to_grid(Point::new(29.0, 31.0), 20.0),
            Point::new(20.0, 40.0)
        );
        assert_eq!(
            snap_to_grid(Point::new(29.0, 31.0), 0.0),
            Point::new(29.0, 31.0)
        );
    }

    #[test]
    fn point_serializes_as_xy_object() {
        let json = serde_json::to_string(&Point::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":2.0}"#);
    }
}
