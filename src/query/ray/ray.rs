//! Rays and the hit records they carry.

use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::INVALID_ID;
use approx::{AbsDiffEq, RelativeEq};

/// The hit record of a [`Ray`].
///
/// It is only ever written by an epilog (see [`HitEpilog`](crate::query::HitEpilog)), when a
/// candidate hit closer than the current `tfar` of the ray is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct RayHit {
    /// The unnormalized geometric normal of the triangle that was hit.
    ///
    /// It is the cross product `e1 × e2` of the two edges of the triangle leaving its first
    /// vertex, so it follows the winding of the quad.
    pub ng: Vector<Real>,
    /// The first parametric coordinate of the hit on the quad.
    pub u: Real,
    /// The second parametric coordinate of the hit on the quad.
    pub v: Real,
    /// The geometry identifier of the quad that was hit, or [`INVALID_ID`].
    pub geom_id: u32,
    /// The primitive identifier of the quad that was hit, or [`INVALID_ID`].
    pub prim_id: u32,
    /// The instance identifier of the quad that was hit, or [`INVALID_ID`].
    pub inst_id: u32,
}

impl Default for RayHit {
    fn default() -> Self {
        Self::none()
    }
}

impl RayHit {
    /// A hit record representing the absence of a hit.
    pub fn none() -> Self {
        Self {
            ng: Vector::zeros(),
            u: 0.0,
            v: 0.0,
            geom_id: INVALID_ID,
            prim_id: INVALID_ID,
            inst_id: INVALID_ID,
        }
    }

    /// Does this record contain a hit?
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.geom_id != INVALID_ID
    }
}

impl AbsDiffEq for RayHit {
    type Epsilon = Real;

    fn default_epsilon() -> Real {
        Real::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Real) -> bool {
        self.geom_id == other.geom_id
            && self.prim_id == other.prim_id
            && self.inst_id == other.inst_id
            && self.ng.abs_diff_eq(&other.ng, epsilon)
            && self.u.abs_diff_eq(&other.u, epsilon)
            && self.v.abs_diff_eq(&other.v, epsilon)
    }
}

impl RelativeEq for RayHit {
    fn default_max_relative() -> Real {
        Real::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Real, max_relative: Real) -> bool {
        self.geom_id == other.geom_id
            && self.prim_id == other.prim_id
            && self.inst_id == other.inst_id
            && self.ng.relative_eq(&other.ng, epsilon, max_relative)
            && self.u.relative_eq(&other.u, epsilon, max_relative)
            && self.v.relative_eq(&other.v, epsilon, max_relative)
    }
}

/// A ray for closest-hit and occlusion queries.
///
/// A ray starts at `origin` and extends in the direction `dir`. Only the points
/// `origin + dir * t` with `t` in the half-open interval `[tnear, tfar)` can be hit.
///
/// Closest-hit queries shrink `tfar` to the distance of each accepted hit and record that hit
/// in `hit`, so `tfar` only ever decreases.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "f32")] {
/// use quadtrace3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
///
/// assert_eq!(ray.tnear, 0.0);
/// assert_eq!(ray.tfar, f32::INFINITY);
/// assert_eq!(ray.point_at(5.0), Point3::new(5.0, 0.0, 0.0));
/// assert!(!ray.has_hit());
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction vector of the ray.
    ///
    /// It does not need to be normalized, distances are then expressed in multiples of its
    /// length.
    pub dir: Vector<Real>,
    /// The smallest distance that can be hit (inclusive).
    pub tnear: Real,
    /// The distance beyond which nothing can be hit (exclusive).
    pub tfar: Real,
    /// The closest hit accepted so far.
    pub hit: RayHit,
}

impl Ray {
    /// Creates a new ray with the distance interval `[0, +inf)`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Self::with_interval(origin, dir, 0.0, Real::INFINITY)
    }

    /// Creates a new ray with the distance interval `[tnear, tfar)`.
    pub fn with_interval(origin: Point<Real>, dir: Vector<Real>, tnear: Real, tfar: Real) -> Ray {
        Ray {
            origin,
            dir,
            tnear,
            tfar,
            hit: RayHit::none(),
        }
    }

    /// Computes a point along the ray at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }

    /// Has a hit been recorded on this ray?
    #[inline]
    pub fn has_hit(&self) -> bool {
        self.hit.is_hit()
    }

    /// Transforms this ray by the given isometry.
    ///
    /// The distance interval and hit record are preserved.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Self {
            origin: m * self.origin,
            dir: m * self.dir,
            ..*self
        }
    }

    /// Transforms this ray by the inverse of the given isometry.
    ///
    /// This is how a ray is brought to the local space of an instance before testing its
    /// quads. The distance interval and hit record are preserved.
    #[inline]
    pub fn inverse_transform_by(&self, m: &Isometry<Real>) -> Self {
        Self {
            origin: m.inverse_transform_point(&self.origin),
            dir: m.inverse_transform_vector(&self.dir),
            ..*self
        }
    }
}
