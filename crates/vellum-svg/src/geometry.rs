//! Points, bounding boxes and affine matrices.

use serde::Serialize;

/// A point in user space. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Build a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Direction from `self` to `other` in degrees, counter-clockwise from +x
    /// in a y-down space.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

impl Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

/// Axis-aligned box, `(x1, y1)` the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum x.
    pub x1: f64,
    /// Minimum y.
    pub y1: f64,
    /// Maximum x.
    pub x2: f64,
    /// Maximum y.
    pub y2: f64,
}

impl BoundingBox {
    /// Box of an origin and a size.
    #[must_use]
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Smallest box containing every point, `None` for no points.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            x1: first.x,
            y1: first.y,
            x2: first.x,
            y2: first.y,
        };
        for p in &points[1..] {
            bbox.x1 = bbox.x1.min(p.x);
            bbox.y1 = bbox.y1.min(p.y);
            bbox.x2 = bbox.x2.max(p.x);
            bbox.y2 = bbox.y2.max(p.y);
        }
        Some(bbox)
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Matrix taking the unit square onto this box.
    #[must_use]
    pub fn unit_matrix(&self) -> Matrix {
        Matrix::new(self.width(), 0.0, 0.0, self.height(), self.x1, self.y1)
    }
}

/// A 2D affine transform `[a b c d e f]`, mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`. Serialized as a six-element array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// x scale / rotation component.
    pub a: f64,
    /// y shear / rotation component.
    pub b: f64,
    /// x shear / rotation component.
    pub c: f64,
    /// y scale / rotation component.
    pub d: f64,
    /// x translation.
    pub e: f64,
    /// y translation.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Build a matrix from its six components.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Translation by `(tx, ty)`.
    #[must_use]
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Scale by `(sx, sy)`.
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `degrees`.
    #[must_use]
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Horizontal skew by `degrees`.
    #[must_use]
    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    /// Vertical skew by `degrees`.
    #[must_use]
    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// `self * other`: apply `other` first, then `self`.
    #[must_use]
    pub fn multiply(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// True if this is (within float noise) the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        let m = self.to_array();
        let id = Self::IDENTITY.to_array();
        m.iter().zip(id.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    /// Components as `[a, b, c, d, e, f]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Serialize for Matrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}
