//! Planar geometry for the layout engine.
//!
//! Coordinates are screen-space: `x` grows to the right and `y` grows
//! downward, so "below" a line means a larger `y`. Every operation that would
//! normalize a zero-length vector or project onto a zero-length segment is
//! guarded and reports the degenerate case through `Option` (or falls back to
//! the segment start) instead of producing `NaN`.

use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A 2D vector used for positions, velocities, and forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component (screen-space, grows downward).
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Squared Euclidean length.
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point.
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self / len)
        } else {
            None
        }
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalize_or_zero(self) -> Self {
        self.normalize().unwrap_or(Self::ZERO)
    }

    /// Rotate by +90 degrees: `(x, y) -> (-y, x)`.
    ///
    /// In screen space this turns a rightward vector into a downward one.
    /// Door and wall normals are derived with this rotation.
    pub const fn rotate_90(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Clamp the magnitude to at most `max`, preserving direction.
    pub fn clamp_length(self, max: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max * max {
            self.normalize().map_or(Self::ZERO, |unit| unit * max)
        } else {
            self
        }
    }

    /// `1.0` when `x >= 0`, otherwise `-1.0`.
    pub fn heading_sign_x(self) -> f32 {
        if self.x >= 0.0 { 1.0 } else { -1.0 }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Arithmetic mean of a set of points, or `None` when the set is empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Vec2> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec2::ZERO, 0_usize), |(sum, count), p| (sum + *p, count.saturating_add(1)));
    if count == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)] // point counts are far below 2^24
    let count = count as f32;
    Some(sum / count)
}

/// The simulation canvas. Agents wrap toroidally at its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Canvas {
    /// Canvas width in world units.
    pub width: f32,
    /// Canvas height in world units.
    pub height: f32,
}

impl Canvas {
    /// Construct a canvas of the given size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The canvas center point.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap a position toroidally, matching a point leaving one edge and
    /// re-entering at the opposite one.
    pub fn wrap(self, mut p: Vec2) -> Vec2 {
        if p.x > self.width {
            p.x = 0.0;
        }
        if p.x < 0.0 {
            p.x = self.width;
        }
        if p.y > self.height {
            p.y = 0.0;
        }
        if p.y < 0.0 {
            p.y = self.height;
        }
        p
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge x.
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Right edge x.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge y.
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge y.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Grow (or, with negative arguments, shrink) the rectangle about its
    /// center. `dw` and `dh` are the total change in width and height, so
    /// each side moves by half of it.
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self::new(self.x - dw / 2.0, self.y - dh / 2.0, self.w + dw, self.h + dh)
    }

    /// The four boundary segments in the fixed order top, bottom, left,
    /// right. Horizontal edges run left to right, vertical edges top to
    /// bottom.
    pub fn edges(&self) -> [Segment; 4] {
        let tl = Vec2::new(self.left(), self.top());
        let tr = Vec2::new(self.right(), self.top());
        let bl = Vec2::new(self.left(), self.bottom());
        let br = Vec2::new(self.right(), self.bottom());
        [
            Segment::new(tl, tr),
            Segment::new(bl, br),
            Segment::new(tl, bl),
            Segment::new(tr, br),
        ]
    }
}

/// Offset from the closest point of a segment to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDistance {
    /// Vector from the closest point on the segment to the query point.
    pub offset: Vec2,
    /// Length of `offset`.
    pub distance: f32,
}

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Segment {
    /// Start point.
    pub a: Vec2,
    /// End point.
    pub b: Vec2,
}

impl Segment {
    /// Construct a segment from `a` to `b`.
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// The vector `b - a`.
    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    /// Segment length.
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Midpoint.
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) / 2.0
    }

    /// Unit normal (the direction rotated by +90 degrees), or `None` for a
    /// zero-length segment.
    pub fn normal(&self) -> Option<Vec2> {
        self.direction().normalize().map(Vec2::rotate_90)
    }

    /// Point at parameter `t` along the segment (`0` = `a`, `1` = `b`).
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a + self.direction() * t
    }

    /// Unclamped projection parameter of `p` onto the segment's line, or
    /// `None` for a zero-length segment.
    pub fn project(&self, p: Vec2) -> Option<f32> {
        let ab = self.direction();
        let len_sq = ab.length_squared();
        if len_sq > 0.0 {
            Some((p - self.a).dot(ab) / len_sq)
        } else {
            None
        }
    }

    /// Closest point on the segment to `p`. A zero-length segment collapses
    /// to its start point.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        self.project(p)
            .map_or(self.a, |t| self.point_at(t.clamp(0.0, 1.0)))
    }

    /// Offset and distance from the segment to `p`.
    pub fn distance_to(&self, p: Vec2) -> SegmentDistance {
        let offset = p - self.closest_point(p);
        SegmentDistance {
            offset,
            distance: offset.length(),
        }
    }

    /// The segment translated by `by`.
    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(self.a + by, self.b + by)
    }

    /// Identity key built from the exact endpoint coordinates. Doors sharing
    /// a key sit on the same wall.
    pub fn endpoint_key(&self) -> (u32, u32, u32, u32) {
        (
            self.a.x.to_bits(),
            self.a.y.to_bits(),
            self.b.x.to_bits(),
            self.b.y.to_bits(),
        )
    }
}
