use crate::math::{Point, SimdReal, Vector, SIMD_WIDTH};
use crate::query::{Ray, RayHit};
use simba::simd::SimdValue;

/// The hit records of a [`RayPacket`], one per lane.
#[derive(Debug, Copy, Clone)]
pub struct RayPacketHit {
    /// The unnormalized geometric normal of each hit.
    pub ng: Vector<SimdReal>,
    /// The first parametric coordinate of each hit.
    pub u: SimdReal,
    /// The second parametric coordinate of each hit.
    pub v: SimdReal,
    /// The geometry identifier of each hit.
    pub geom_id: [u32; SIMD_WIDTH],
    /// The primitive identifier of each hit.
    pub prim_id: [u32; SIMD_WIDTH],
    /// The instance identifier of each hit.
    pub inst_id: [u32; SIMD_WIDTH],
}

impl RayPacketHit {
    /// Hit records representing the absence of a hit on every lane.
    pub fn none() -> Self {
        Self::splat(RayHit::none())
    }

    /// The same hit record on every lane.
    pub fn splat(hit: RayHit) -> Self {
        Self {
            ng: Vector::splat(hit.ng),
            u: SimdReal::splat(hit.u),
            v: SimdReal::splat(hit.v),
            geom_id: [hit.geom_id; SIMD_WIDTH],
            prim_id: [hit.prim_id; SIMD_WIDTH],
            inst_id: [hit.inst_id; SIMD_WIDTH],
        }
    }

    /// The hit record of the `k-th` lane.
    #[inline]
    pub fn extract(&self, k: usize) -> RayHit {
        RayHit {
            ng: self.ng.extract(k),
            u: self.u.extract(k),
            v: self.v.extract(k),
            geom_id: self.geom_id[k],
            prim_id: self.prim_id[k],
            inst_id: self.inst_id[k],
        }
    }

    /// Replaces the hit record of the `k-th` lane.
    #[inline]
    pub fn replace(&mut self, k: usize, hit: RayHit) {
        self.ng.replace(k, hit.ng);
        self.u.replace(k, hit.u);
        self.v.replace(k, hit.v);
        self.geom_id[k] = hit.geom_id;
        self.prim_id[k] = hit.prim_id;
        self.inst_id[k] = hit.inst_id;
    }
}

/// A packet of `SIMD_WIDTH` rays traced together.
///
/// Each lane is an independent [`Ray`] with its own distance interval and hit record. Which
/// lanes take part in a query is given by a separate validity mask.
#[derive(Debug, Copy, Clone)]
pub struct RayPacket {
    /// The origin of each ray.
    pub origin: Point<SimdReal>,
    /// The direction of each ray.
    pub dir: Vector<SimdReal>,
    /// The smallest distance that can be hit by each ray (inclusive).
    pub tnear: SimdReal,
    /// The distance beyond which nothing can be hit by each ray (exclusive).
    pub tfar: SimdReal,
    /// The closest hit accepted so far by each ray.
    pub hit: RayPacketHit,
}

impl RayPacket {
    /// A packet with `ray` copied on every lane.
    pub fn splat(ray: Ray) -> Self {
        Self {
            origin: Point::splat(ray.origin),
            dir: Vector::splat(ray.dir),
            tnear: SimdReal::splat(ray.tnear),
            tfar: SimdReal::splat(ray.tfar),
            hit: RayPacketHit::splat(ray.hit),
        }
    }

    /// A packet with `rays[k]` on its `k-th` lane.
    pub fn from_rays(rays: &[Ray; SIMD_WIDTH]) -> Self {
        Self::from_fn(|k| rays[k])
    }

    /// A packet with `f(k)` on its `k-th` lane.
    pub fn from_fn(mut f: impl FnMut(usize) -> Ray) -> Self {
        let mut result = Self::splat(f(0));
        for k in 1..SIMD_WIDTH {
            result.set_ray(k, &f(k));
        }
        result
    }

    /// The ray on the `k-th` lane, including its hit record.
    #[inline]
    pub fn ray(&self, k: usize) -> Ray {
        Ray {
            origin: self.origin.extract(k),
            dir: self.dir.extract(k),
            tnear: self.tnear.extract(k),
            tfar: self.tfar.extract(k),
            hit: self.hit.extract(k),
        }
    }

    /// Replaces the ray on the `k-th` lane, including its hit record.
    #[inline]
    pub fn set_ray(&mut self, k: usize, ray: &Ray) {
        self.origin.replace(k, ray.origin);
        self.dir.replace(k, ray.dir);
        self.tnear.replace(k, ray.tnear);
        self.tfar.replace(k, ray.tfar);
        self.hit.replace(k, ray.hit);
    }

    /// The hit record of the `k-th` lane.
    #[inline]
    pub fn hit(&self, k: usize) -> RayHit {
        self.hit.extract(k)
    }

}
