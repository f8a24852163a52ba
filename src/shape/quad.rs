//! Definition of the quad shape.

use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::Triangle;

/// One of the two triangles a quad is split into for intersection purposes.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuadTriangle {
    /// The triangle `(v0, v1, v3)`.
    First,
    /// The triangle `(v2, v3, v1)`.
    Second,
}

impl QuadTriangle {
    /// Both halves of a quad, in the order they are tested.
    pub const ALL: [QuadTriangle; 2] = [QuadTriangle::First, QuadTriangle::Second];

    /// Converts the barycentric coordinates of a point on this triangle to the parametric
    /// coordinates of the same point on the quad.
    ///
    /// The barycentric coordinates `(u, v)` are the weights of the second and third vertex of
    /// the triangle. On the quad, `v0`, `v1`, `v2`, `v3` have the parametric coordinates
    /// `(0, 0)`, `(1, 0)`, `(1, 1)`, `(0, 1)`.
    #[inline]
    pub fn quad_uv(self, u: Real, v: Real) -> (Real, Real) {
        match self {
            QuadTriangle::First => (u, v),
            QuadTriangle::Second => (1.0 - u, 1.0 - v),
        }
    }
}

/// A quad shape, tested for intersection as two triangles.
///
/// The quad is split along its `v1`-`v3` diagonal. For non-planar quads, this choice of
/// diagonal determines the surface being hit.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Quad {
    /// The quad first point.
    pub v0: Point<Real>,
    /// The quad second point.
    pub v1: Point<Real>,
    /// The quad third point.
    pub v2: Point<Real>,
    /// The quad fourth point.
    pub v3: Point<Real>,
}

impl Quad {
    /// Creates a quad from four points, given in cyclic order.
    #[inline]
    pub fn new(v0: Point<Real>, v1: Point<Real>, v2: Point<Real>, v3: Point<Real>) -> Quad {
        Quad { v0, v1, v2, v3 }
    }

    /// The four vertices of this quad.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 4] {
        [self.v0, self.v1, self.v2, self.v3]
    }

    /// The two triangles this quad is split into: `(v0, v1, v3)` and `(v2, v3, v1)`.
    ///
    /// Both triangles have the same winding as the quad and share the edge `v1`-`v3`.
    #[inline]
    pub fn triangles(&self) -> [Triangle; 2] {
        [
            self.triangle(QuadTriangle::First),
            self.triangle(QuadTriangle::Second),
        ]
    }

    /// One of the two triangles this quad is split into.
    #[inline]
    pub fn triangle(&self, which: QuadTriangle) -> Triangle {
        match which {
            QuadTriangle::First => Triangle::new(self.v0, self.v1, self.v3),
            QuadTriangle::Second => Triangle::new(self.v2, self.v3, self.v1),
        }
    }

    /// The point of this quad with the given parametric coordinates.
    ///
    /// This interpolates the triangle containing `(u, v)`, so it is consistent with the
    /// coordinates reported by a hit.
    pub fn point_at(&self, u: Real, v: Real) -> Point<Real> {
        if u + v <= 1.0 {
            self.v0 + (self.v1 - self.v0) * u + (self.v3 - self.v0) * v
        } else {
            let (u, v) = QuadTriangle::Second.quad_uv(u, v);
            self.v2 + (self.v3 - self.v2) * u + (self.v1 - self.v2) * v
        }
    }

    /// The sum of the scaled normals of both triangles of this quad.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let [t1, t2] = self.triangles();
        t1.scaled_normal() + t2.scaled_normal()
    }

    /// Tests if both triangles of this quad are degenerate.
    ///
    /// A degenerate quad is never hit by a ray.
    pub fn is_degenerate(&self) -> bool {
        let [t1, t2] = self.triangles();
        t1.is_degenerate() && t2.is_degenerate()
    }

    /// Returns a new quad with vertices transformed by `m`.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Quad::new(m * self.v0, m * self.v1, m * self.v2, m * self.v3)
    }
}
