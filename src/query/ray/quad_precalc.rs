//! Per-ray precomputations of the watertight ray/triangle test.
//!
//! The test follows "Watertight Ray/Triangle Intersection" (Woop, Benthin, Wald, 2013): the
//! triangle vertices are translated to the ray origin, permuted so the dominant axis of the ray
//! direction becomes the last one, then sheared so the ray becomes the `+z` axis. The hit is then
//! decided by the signs of three 2D edge functions. Because a shared edge yields exactly negated
//! edge function values in both triangles, no ray can slip between two adjacent triangles.

use crate::math::{Point, Real, SimdBool, SimdReal, Vector, DEFAULT_EPSILON};
use crate::query::RayPacket;
use crate::shape::SimdTriangle;
use crate::utils::BitIter;
use na::SimdComplexField;
use num::{One, Zero};
use simba::simd::{SimdBool as _, SimdPartialOrd, SimdValue};

/// The per-lane choice of one of the three coordinate axes.
#[derive(Copy, Clone, Debug)]
struct AxisSelect {
    is_x: SimdBool,
    is_y: SimdBool,
}

impl AxisSelect {
    #[inline]
    fn pick(&self, v: &Vector<SimdReal>) -> SimdReal {
        v.x.select(self.is_x, v.y.select(self.is_y, v.z))
    }

    /// Selects `a` on the lanes where `cond` is set, and `b` elsewhere.
    #[inline]
    fn blend(cond: SimdBool, a: Self, b: Self) -> Self {
        Self {
            is_x: (cond & a.is_x) | (!cond & b.is_x),
            is_y: (cond & a.is_y) | (!cond & b.is_y),
        }
    }

    #[inline]
    fn lane(&self, k: usize) -> Self {
        Self {
            is_x: SimdBool::splat(self.is_x.extract(k)),
            is_y: SimdBool::splat(self.is_y.extract(k)),
        }
    }
}

/// A triangle vertex expressed in the sheared space of a ray.
#[derive(Copy, Clone)]
struct ShearedVertex {
    x: SimdReal,
    y: SimdReal,
    /// The unsheared coordinate along the dominant axis.
    z: SimdReal,
}

impl ShearedVertex {
    /// Is the edge from `self` to `other` in the canonical orientation?
    ///
    /// Exactly one of the two orientations of a non-degenerate edge is canonical. An edge
    /// function that evaluates to zero only counts as inside for the canonical orientation.
    #[inline]
    fn is_canonical_edge_to(&self, other: &Self) -> SimdBool {
        self.x.simd_lt(other.x) | (self.x.simd_eq(other.x) & self.y.simd_lt(other.y))
    }
}

/// Twice the signed area of the 2D triangle `(origin, p, q)` in sheared space.
#[inline]
fn edge_function(p: &ShearedVertex, q: &ShearedVertex) -> SimdReal {
    q.x * p.y - q.y * p.x
}

/// The lane-wise coordinate permutation and shear mapping a ray to the `+z` axis.
#[derive(Copy, Clone, Debug)]
struct WatertightShear {
    org: Point<SimdReal>,
    kx: AxisSelect,
    ky: AxisSelect,
    kz: AxisSelect,
    sx: SimdReal,
    sy: SimdReal,
    sz: SimdReal,
    /// `|dir| / |dir[kz]|`, the bound of the sheared determinant for a unit normal.
    dir_scale: SimdReal,
}

impl WatertightShear {
    fn new(org: Point<SimdReal>, dir: Vector<SimdReal>) -> Self {
        let abs = dir.map(|e| e.simd_abs());
        let kz_x = abs.x.simd_ge(abs.y) & abs.x.simd_ge(abs.z);
        let kz_y = !kz_x & abs.y.simd_ge(abs.z);
        let kz_z = !kz_x & !kz_y;

        let kz = AxisSelect {
            is_x: kz_x,
            is_y: kz_y,
        };
        let kx = AxisSelect {
            is_x: kz_z,
            is_y: kz_x,
        };
        let ky = AxisSelect {
            is_x: kz_y,
            is_y: kz_z,
        };

        // Swap kx and ky to preserve the winding of the triangles.
        let dz = kz.pick(&dir);
        let flip = dz.simd_lt(SimdReal::zero());
        let (kx, ky) = (AxisSelect::blend(flip, ky, kx), AxisSelect::blend(flip, kx, ky));

        let sz = SimdReal::one() / dz;

        Self {
            org,
            kx,
            ky,
            kz,
            sx: kx.pick(&dir) / dz,
            sy: ky.pick(&dir) / dz,
            sz,
            dir_scale: dir.norm() * sz.simd_abs(),
        }
    }

    fn lane(&self, k: usize) -> Self {
        Self {
            org: Point::splat(self.org.extract(k)),
            kx: self.kx.lane(k),
            ky: self.ky.lane(k),
            kz: self.kz.lane(k),
            sx: SimdReal::splat(self.sx.extract(k)),
            sy: SimdReal::splat(self.sy.extract(k)),
            sz: SimdReal::splat(self.sz.extract(k)),
            dir_scale: SimdReal::splat(self.dir_scale.extract(k)),
        }
    }

    #[inline]
    fn shear(&self, p: &Point<SimdReal>) -> ShearedVertex {
        let d = p - self.org;
        let z = self.kz.pick(&d);
        ShearedVertex {
            x: self.kx.pick(&d) - self.sx * z,
            y: self.ky.pick(&d) - self.sy * z,
            z,
        }
    }

    fn test(
        &self,
        valid: SimdBool,
        tnear: SimdReal,
        tfar: SimdReal,
        tri: &SimdTriangle,
    ) -> LaneHits {
        let zero = SimdReal::zero();
        let a = self.shear(&tri.a);
        let b = self.shear(&tri.b);
        let c = self.shear(&tri.c);

        let u = edge_function(&b, &c);
        let v = edge_function(&c, &a);
        let w = edge_function(&a, &b);

        let tie_u = u.simd_eq(zero) & b.is_canonical_edge_to(&c);
        let tie_v = v.simd_eq(zero) & c.is_canonical_edge_to(&a);
        let tie_w = w.simd_eq(zero) & a.is_canonical_edge_to(&b);

        let front = (u.simd_gt(zero) | tie_u) & (v.simd_gt(zero) | tie_v) & (w.simd_gt(zero) | tie_w);
        let back = (u.simd_lt(zero) | tie_u) & (v.simd_lt(zero) | tie_v) & (w.simd_lt(zero) | tie_w);

        let ng = (tri.b - tri.a).cross(&(tri.c - tri.a));
        let det = u + v + w;
        let abs_det = det.simd_abs();
        let non_degenerate =
            abs_det.simd_gt(SimdReal::splat(DEFAULT_EPSILON) * ng.norm() * self.dir_scale);

        // Interval test before the division, scaled by |det|.
        let t_num = self.sz * (u * a.z + v * b.z + w * c.z);
        let t_scaled = t_num.select(det.simd_ge(zero), -t_num);
        let in_interval = t_scaled.simd_ge(abs_det * tnear) & t_scaled.simd_lt(abs_det * tfar);

        let valid = valid & (front | back) & non_degenerate & in_interval;

        let t = t_num / det;
        // Rounding of the division can still push `t` out of the interval.
        let valid = valid & t.simd_ge(tnear) & t.simd_lt(tfar);

        LaneHits {
            valid,
            t,
            u: v / det,
            v: w / det,
            ng,
        }
    }
}

/// The geometric candidates found by testing `SIMD_WIDTH` ray/triangle pairs.
///
/// Only the lanes set in `valid` hold a candidate, the other lanes hold arbitrary values.
#[derive(Copy, Clone, Debug)]
pub struct LaneHits {
    /// The lanes where a hit inside of the ray interval was found.
    pub valid: SimdBool,
    /// The hit distances.
    pub t: SimdReal,
    /// The barycentric coordinates of the hits relative to the second vertex of the triangle.
    pub u: SimdReal,
    /// The barycentric coordinates of the hits relative to the third vertex of the triangle.
    pub v: SimdReal,
    /// The unnormalized geometric normals `(b - a) × (c - a)` of the triangles.
    pub ng: Vector<SimdReal>,
}

impl LaneHits {
    /// The bitmask of the lanes holding a candidate.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.valid.bitmask()
    }

    /// Iterates through the lanes holding a candidate, in ascending order.
    #[inline]
    pub fn lanes(&self) -> BitIter {
        BitIter::new(self.bits())
    }

    /// Does any lane hold a candidate?
    #[inline]
    pub fn any(&self) -> bool {
        self.valid.any()
    }
}

/// The precomputed state of a single ray, tested against `SIMD_WIDTH` triangles at once.
#[derive(Copy, Clone, Debug)]
pub struct QuadPrecalc1 {
    shear: WatertightShear,
}

impl QuadPrecalc1 {
    /// Precomputes the watertight test of a ray with the given origin and direction.
    pub fn new(origin: &Point<Real>, dir: &Vector<Real>) -> Self {
        Self {
            shear: WatertightShear::new(Point::splat(*origin), Vector::splat(*dir)),
        }
    }

    /// Tests the ray against each lane of `tri` where `valid` is set.
    ///
    /// Candidates are kept only if their distance lies in `[tnear, tfar)`.
    #[inline]
    pub fn hits(&self, tnear: Real, tfar: Real, valid: SimdBool, tri: &SimdTriangle) -> LaneHits {
        self.shear
            .test(valid, SimdReal::splat(tnear), SimdReal::splat(tfar), tri)
    }

    /// Tests the ray against the lanes of `tri`, and gives the candidates to `epilog`.
    ///
    /// The epilog is called only if at least one candidate was found. Returns the epilog result,
    /// or `false` if it was not called.
    #[inline]
    pub fn intersect(
        &self,
        tnear: Real,
        tfar: Real,
        valid: SimdBool,
        tri: &SimdTriangle,
        epilog: impl FnOnce(&LaneHits) -> bool,
    ) -> bool {
        let hits = self.hits(tnear, tfar, valid, tri);
        hits.any() && epilog(&hits)
    }

    /// The lanes of `tri` hit by the ray within `[tnear, tfar)`, without any filtering.
    #[inline]
    pub fn occluded(&self, tnear: Real, tfar: Real, valid: SimdBool, tri: &SimdTriangle) -> SimdBool {
        self.hits(tnear, tfar, valid, tri).valid
    }
}

/// The precomputed state of a packet of `SIMD_WIDTH` rays.
#[derive(Copy, Clone, Debug)]
pub struct QuadPrecalcK {
    shear: WatertightShear,
}

impl QuadPrecalcK {
    /// Precomputes the watertight test of every lane of `packet`.
    pub fn new(packet: &RayPacket) -> Self {
        Self {
            shear: WatertightShear::new(packet.origin, packet.dir),
        }
    }

    /// The precomputed state of the `k-th` ray of the packet alone.
    #[inline]
    pub fn lane(&self, k: usize) -> QuadPrecalc1 {
        QuadPrecalc1 {
            shear: self.shear.lane(k),
        }
    }

    /// Tests each ray of the packet where `valid` is set against the triangle on the same lane
    /// of `tri`.
    ///
    /// To test a whole packet against one triangle, `tri` must hold that triangle on every
    /// lane, see [`QuadMv::broadcast_triangles`](crate::shape::QuadMv::broadcast_triangles).
    #[inline]
    pub fn hits_k(
        &self,
        valid: SimdBool,
        tnear: SimdReal,
        tfar: SimdReal,
        tri: &SimdTriangle,
    ) -> LaneHits {
        self.shear.test(valid, tnear, tfar, tri)
    }

    /// Same as [`Self::hits_k`], then gives the candidates to `epilog`.
    ///
    /// The epilog is called only if at least one lane has a candidate.
    #[inline]
    pub fn intersect_k(
        &self,
        valid: SimdBool,
        tnear: SimdReal,
        tfar: SimdReal,
        tri: &SimdTriangle,
        epilog: impl FnOnce(&LaneHits) -> bool,
    ) -> bool {
        let hits = self.hits_k(valid, tnear, tfar, tri);
        hits.any() && epilog(&hits)
    }

    /// The lanes of the packet hitting the triangle on the same lane of `tri`, without any
    /// filtering.
    #[inline]
    pub fn occluded_k(
        &self,
        valid: SimdBool,
        tnear: SimdReal,
        tfar: SimdReal,
        tri: &SimdTriangle,
    ) -> SimdBool {
        self.hits_k(valid, tnear, tfar, tri).valid
    }

    /// Tests the `k-th` ray of the packet against every lane of `tri`.
    #[inline]
    pub fn intersect1(
        &self,
        k: usize,
        tnear: Real,
        tfar: Real,
        valid: SimdBool,
        tri: &SimdTriangle,
        epilog: impl FnOnce(&LaneHits) -> bool,
    ) -> bool {
        self.lane(k).intersect(tnear, tfar, valid, tri, epilog)
    }

    /// The lanes of `tri` hit by the `k-th` ray of the packet, without any filtering.
    #[inline]
    pub fn occluded1(
        &self,
        k: usize,
        tnear: Real,
        tfar: Real,
        valid: SimdBool,
        tri: &SimdTriangle,
    ) -> SimdBool {
        self.lane(k).occluded(tnear, tfar, valid, tri)
    }
}
