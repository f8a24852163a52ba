//! Definition of the triangle shape.

use crate::math::{Point, Real, SimdReal, Vector, DEFAULT_EPSILON};
use na::Unit;
use simba::simd::SimdValue;

/// A triangle shape.
///
/// The two halves of a quad are tested as triangles, see [`Quad::triangles`](crate::shape::Quad::triangles).
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point<Real>,
    /// The triangle second point.
    pub b: Point<Real>,
    /// The triangle third point.
    pub c: Point<Real>,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// Reference to an array containing the three vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 3] {
        [self.a, self.b, self.c]
    }

    /// The normal of this triangle assuming it is oriented ccw.
    ///
    /// The normal points such that it is collinear to `AB × AC` (where `×` denotes the cross
    /// product).
    #[inline]
    pub fn normal(&self) -> Option<Unit<Vector<Real>>> {
        Unit::try_new(self.scaled_normal(), DEFAULT_EPSILON)
    }

    /// A vector normal of this triangle.
    ///
    /// The vector points such that it is collinear to `AB × AC` (where `×` denotes the cross
    /// product). Its norm is twice the area of the triangle.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac)
    }

    /// The area of this triangle.
    #[inline]
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    /// Tests if this triangle has a zero area, relative to the length of its edges.
    ///
    /// A degenerate triangle is never hit by a ray.
    pub fn is_degenerate(&self) -> bool {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        ab.cross(&ac).norm() <= DEFAULT_EPSILON * ab.norm() * ac.norm()
    }
}

/// `SIMD_WIDTH` triangles represented as a single SoA triangle with SIMD components.
#[derive(Debug, Copy, Clone)]
pub struct SimdTriangle {
    /// The first point of each triangle.
    pub a: Point<SimdReal>,
    /// The second point of each triangle.
    pub b: Point<SimdReal>,
    /// The third point of each triangle.
    pub c: Point<SimdReal>,
}

impl SimdTriangle {
    /// Builds a SIMD triangle from three points with SIMD components.
    #[inline]
    pub fn new(a: Point<SimdReal>, b: Point<SimdReal>, c: Point<SimdReal>) -> Self {
        Self { a, b, c }
    }

    /// Builds a SIMD triangle composed of `SIMD_WIDTH` identical triangles.
    #[inline]
    pub fn splat(triangle: Triangle) -> Self {
        Self {
            a: Point::splat(triangle.a),
            b: Point::splat(triangle.b),
            c: Point::splat(triangle.c),
        }
    }

    /// The `i-th` triangle represented by `self`.
    #[inline]
    pub fn extract(&self, i: usize) -> Triangle {
        Triangle::new(self.a.extract(i), self.b.extract(i), self.c.extract(i))
    }

    /// Replace the `i-th` triangle represented by `self` by the given value.
    #[inline]
    pub fn replace(&mut self, i: usize, triangle: Triangle) {
        self.a.replace(i, triangle.a);
        self.b.replace(i, triangle.b);
        self.c.replace(i, triangle.c);
    }
}
