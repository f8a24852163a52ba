use crate::math::{Point, Real, SimdBool, Vector};
use crate::query::ray::QuadPrecalc1;
use crate::query::Ray;
use crate::shape::{SimdTriangle, Triangle};
use simba::simd::SimdValue;

/// The intersection of a ray with a single triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleHit {
    /// The distance along the ray, in multiples of the ray direction.
    pub t: Real,
    /// The barycentric coordinate of the hit relative to the second vertex of the triangle.
    pub u: Real,
    /// The barycentric coordinate of the hit relative to the third vertex of the triangle.
    pub v: Real,
    /// The unnormalized geometric normal `(b - a) × (c - a)` of the triangle.
    pub ng: Vector<Real>,
}

impl Triangle {
    /// Computes the intersection of this triangle with the given ray, in the ray interval
    /// `[tnear, tfar)`.
    ///
    /// The ray itself is left untouched.
    #[inline]
    pub fn intersect_local_ray(&self, ray: &Ray) -> Option<TriangleHit> {
        local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray)
    }
}

/// Computes the intersection between a triangle and a ray, with the watertight test used for
/// quads.
///
/// If an intersection is found in the ray interval `[tnear, tfar)`, the distance, the
/// barycentric coordinates and the geometric normal of the intersection are returned.
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
) -> Option<TriangleHit> {
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
    let tri = SimdTriangle::splat(Triangle::new(*a, *b, *c));
    let mut valid = SimdBool::splat(false);
    valid.replace(0, true);

    let hits = pre.hits(ray.tnear, ray.tfar, valid, &tri);

    if hits.valid.extract(0) {
        Some(TriangleHit {
            t: hits.t.extract(0),
            u: hits.u.extract(0),
            v: hits.v.extract(0),
            ng: hits.ng.extract(0),
        })
    } else {
        None
    }
}
