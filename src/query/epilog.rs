//! What happens to the geometric candidates found by the intersectors.
//!
//! The intersectors never write to a ray directly. Each geometric candidate is handed to a
//! [`HitEpilog`] which decides whether it is an actual hit and, if so, records it.

use crate::math::{Real, Vector};
use crate::query::{IntersectContext, Ray, RayHit, RayPacket};
use crate::shape::QuadTriangle;
use simba::simd::SimdValue;

/// A geometric intersection between a ray and a quad, not yet accepted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CandidateHit {
    /// The lane of the ray inside of its packet, 0 for a single ray.
    pub lane: usize,
    /// The distance of the intersection along the ray.
    pub t: Real,
    /// The first parametric coordinate of the intersection on the quad.
    pub u: Real,
    /// The second parametric coordinate of the intersection on the quad.
    pub v: Real,
    /// The unnormalized geometric normal of the quad half that was hit.
    pub ng: Vector<Real>,
    /// The geometry identifier of the quad.
    pub geom_id: u32,
    /// The primitive identifier of the quad.
    pub prim_id: u32,
    /// The half of the quad that was hit.
    pub triangle: QuadTriangle,
}

impl CandidateHit {
    /// The hit record describing this candidate.
    #[inline]
    pub fn to_ray_hit(&self, inst_id: u32) -> RayHit {
        RayHit {
            ng: self.ng,
            u: self.u,
            v: self.v,
            geom_id: self.geom_id,
            prim_id: self.prim_id,
            inst_id,
        }
    }
}

/// The decision taken by an epilog on a candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitVerdict {
    /// The candidate is a hit.
    Accept,
    /// The candidate is ignored, as if the ray missed that quad half.
    Reject,
}

impl HitVerdict {
    /// Is this an [`HitVerdict::Accept`]?
    #[inline]
    pub fn is_accept(self) -> bool {
        self == HitVerdict::Accept
    }
}

impl From<bool> for HitVerdict {
    #[inline]
    fn from(accept: bool) -> Self {
        if accept {
            HitVerdict::Accept
        } else {
            HitVerdict::Reject
        }
    }
}

/// A user-defined predicate run on each geometric candidate, e.g. for alpha-testing.
///
/// This is implemented for every closure `Fn(&Ray, &CandidateHit) -> HitVerdict`.
pub trait HitFilter {
    /// Decides if `hit` is a hit for a closest-hit query of `ray`.
    fn intersection_filter(&self, ray: &Ray, hit: &CandidateHit) -> HitVerdict;

    /// Decides if `hit` is a hit for an occlusion query of `ray`.
    fn occlusion_filter(&self, ray: &Ray, hit: &CandidateHit) -> HitVerdict {
        self.intersection_filter(ray, hit)
    }
}

impl<F: Fn(&Ray, &CandidateHit) -> HitVerdict> HitFilter for F {
    fn intersection_filter(&self, ray: &Ray, hit: &CandidateHit) -> HitVerdict {
        self(ray, hit)
    }
}

/// Lane-wise access to the state of a [`Ray`] or of a [`RayPacket`].
pub trait RayLanes {
    /// The smallest distance that can be hit by the ray on `lane`.
    fn tnear(&self, lane: usize) -> Real;
    /// The distance beyond which nothing can be hit by the ray on `lane`.
    fn tfar(&self, lane: usize) -> Real;
    /// A copy of the ray on `lane`.
    fn lane_ray(&self, lane: usize) -> Ray;
    /// Shrinks the interval of the ray on `lane` to `hit` and records it.
    fn record_hit(&mut self, lane: usize, hit: &CandidateHit, inst_id: u32);
}

impl RayLanes for Ray {
    #[inline]
    fn tnear(&self, _: usize) -> Real {
        self.tnear
    }

    #[inline]
    fn tfar(&self, _: usize) -> Real {
        self.tfar
    }

    #[inline]
    fn lane_ray(&self, _: usize) -> Ray {
        *self
    }

    #[inline]
    fn record_hit(&mut self, _: usize, hit: &CandidateHit, inst_id: u32) {
        self.tfar = hit.t;
        self.hit = hit.to_ray_hit(inst_id);
    }
}

impl RayLanes for RayPacket {
    #[inline]
    fn tnear(&self, lane: usize) -> Real {
        self.tnear.extract(lane)
    }

    #[inline]
    fn tfar(&self, lane: usize) -> Real {
        self.tfar.extract(lane)
    }

    #[inline]
    fn lane_ray(&self, lane: usize) -> Ray {
        self.ray(lane)
    }

    #[inline]
    fn record_hit(&mut self, lane: usize, hit: &CandidateHit, inst_id: u32) {
        self.tfar.replace(lane, hit.t);
        self.hit.replace(lane, hit.to_ray_hit(inst_id));
    }
}

/// The strategy applied by an intersector to each geometric candidate.
///
/// Candidates given to an epilog always lie inside of the current interval of their ray.
pub trait HitEpilog<R: ?Sized> {
    /// Decides if `hit` is a hit, and records it into `rays` if needed.
    fn on_candidate_hit(&mut self, rays: &mut R, hit: &CandidateHit) -> HitVerdict;

    /// Called once the ray on `lane` is known to be occluded, during an occlusion query.
    fn on_occlusion_lane_resolved(&mut self, rays: &mut R, lane: usize) {
        let _ = (rays, lane);
    }
}

/// The epilog of closest-hit queries.
///
/// If `FILTER` is set and the context has a filter, candidates rejected by the filter are
/// ignored. Accepted candidates become the new closest hit of their ray, tagged with the
/// instance identifier of the context.
#[derive(Copy, Clone, Debug)]
pub struct ClosestHitEpilog<'a, const FILTER: bool> {
    ctx: IntersectContext<'a>,
}

impl<'a, const FILTER: bool> ClosestHitEpilog<'a, FILTER> {
    /// The closest-hit epilog for the given context.
    pub fn new(ctx: &IntersectContext<'a>) -> Self {
        Self { ctx: *ctx }
    }
}

impl<R: RayLanes + ?Sized, const FILTER: bool> HitEpilog<R> for ClosestHitEpilog<'_, FILTER> {
    fn on_candidate_hit(&mut self, rays: &mut R, hit: &CandidateHit) -> HitVerdict {
        if FILTER {
            if let Some(filter) = self.ctx.filter {
                if !filter
                    .intersection_filter(&rays.lane_ray(hit.lane), hit)
                    .is_accept()
                {
                    return HitVerdict::Reject;
                }
            }
        }

        rays.record_hit(hit.lane, hit, self.ctx.inst_id);
        HitVerdict::Accept
    }
}

/// The epilog of occlusion queries.
///
/// If `FILTER` is set and the context has a filter, candidates rejected by the occlusion filter
/// are ignored. Rays are never written to.
#[derive(Copy, Clone, Debug)]
pub struct OcclusionEpilog<'a, const FILTER: bool> {
    ctx: IntersectContext<'a>,
}

impl<'a, const FILTER: bool> OcclusionEpilog<'a, FILTER> {
    /// The occlusion epilog for the given context.
    pub fn new(ctx: &IntersectContext<'a>) -> Self {
        Self { ctx: *ctx }
    }
}

impl<R: RayLanes + ?Sized, const FILTER: bool> HitEpilog<R> for OcclusionEpilog<'_, FILTER> {
    fn on_candidate_hit(&mut self, rays: &mut R, hit: &CandidateHit) -> HitVerdict {
        match self.ctx.filter {
            Some(filter) if FILTER => filter.occlusion_filter(&rays.lane_ray(hit.lane), hit),
            _ => HitVerdict::Accept,
        }
    }
}
