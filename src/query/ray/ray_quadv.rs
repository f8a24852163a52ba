//! Intersection of rays with packed quad primitives.

use crate::math::{Real, SimdBool, SIMD_WIDTH};
use crate::query::ray::{LaneHits, QuadPrecalc1, QuadPrecalcK};
use crate::query::{
    CandidateHit, ClosestHitEpilog, HitEpilog, HitVerdict, IntersectContext, OcclusionEpilog,
    QueryKind, Ray, RayLanes, RayPacket,
};
use crate::shape::{QuadMv, QuadTriangle};
use crate::utils::{select_min_lane, BitIter};
use simba::simd::{SimdBool as _, SimdValue};

/// Intersection of a single ray with the quads of a [`QuadMv`].
///
/// With `FILTER` set, the filter of the [`IntersectContext`] (if any) is applied to every
/// geometric candidate. Without it, every geometric candidate is a hit.
///
/// Each quad is tested as the two triangles `(v0, v1, v3)` and `(v2, v3, v1)`.
#[derive(Copy, Clone, Debug, Default)]
pub struct QuadMvIntersector1<const FILTER: bool>;

/// Intersection of a packet of rays with the quads of a [`QuadMv`].
///
/// See [`QuadMvIntersector1`] for the meaning of `FILTER`.
#[derive(Copy, Clone, Debug, Default)]
pub struct QuadMvIntersectorK<const FILTER: bool>;

#[inline]
fn lane_bit(i: usize) -> u64 {
    if i < 64 {
        1 << i
    } else {
        0
    }
}

/// Clears the bits of `valid` beyond the first `len` ones.
#[inline]
fn array_mask(valid: u64, len: usize) -> u64 {
    if len >= 64 {
        valid
    } else {
        valid & ((1 << len) - 1)
    }
}

#[inline]
fn in_interval(t: Real, tnear: Real, tfar: Real) -> bool {
    t >= tnear && t < tfar
}

#[inline]
fn report_primitive(ctx: &IntersectContext, kind: QueryKind, active_rays: u32, width: u32) {
    if let Some(stats) = ctx.stats {
        stats.primitive_tested(kind, active_rays, width);
    }
}

#[inline]
fn report_candidate(ctx: &IntersectContext, kind: QueryKind, verdict: HitVerdict) {
    if let Some(stats) = ctx.stats {
        stats.candidate_found(kind, verdict);
    }
}

/// The candidate found on `hit_lane` of `hits`, for the quad on `quad_lane` of `prim`.
#[inline]
fn lane_candidate(
    prim: &QuadMv,
    which: QuadTriangle,
    quad_lane: usize,
    hits: &LaneHits,
    hit_lane: usize,
    ray_lane: usize,
) -> CandidateHit {
    let (u, v) = which.quad_uv(hits.u.extract(hit_lane), hits.v.extract(hit_lane));
    CandidateHit {
        lane: ray_lane,
        t: hits.t.extract(hit_lane),
        u,
        v,
        ng: hits.ng.extract(hit_lane),
        geom_id: prim.geom_ids[quad_lane],
        prim_id: prim.prim_ids[quad_lane],
        triangle: which,
    }
}

/// Closest-hit query of the ray on `lane` of `rays` against every quad of `prim`.
fn intersect_lane<R: RayLanes + ?Sized>(
    pre: &QuadPrecalc1,
    rays: &mut R,
    lane: usize,
    ctx: &IntersectContext,
    prim: &QuadMv,
    epilog: &mut impl HitEpilog<R>,
) {
    report_primitive(ctx, QueryKind::Intersect, 1, 1);
    let valid = prim.valid_mask();

    for which in QuadTriangle::ALL {
        let tri = prim.triangle(which);
        let hits = pre.hits(rays.tnear(lane), rays.tfar(lane), valid, &tri);
        let mut remaining = hits.bits();

        // Closest candidates first, so farther ones get culled by the shrunk interval.
        while let Some(i) = select_min_lane(remaining, &hits.t) {
            remaining &= !lane_bit(i);

            if !in_interval(hits.t.extract(i), rays.tnear(lane), rays.tfar(lane)) {
                continue;
            }

            let hit = lane_candidate(prim, which, i, &hits, i, lane);
            let verdict = epilog.on_candidate_hit(rays, &hit);
            report_candidate(ctx, QueryKind::Intersect, verdict);
        }
    }
}

/// Occlusion query of the ray on `lane` of `rays` against every quad of `prim`.
fn occluded_lane<R: RayLanes + ?Sized>(
    pre: &QuadPrecalc1,
    rays: &mut R,
    lane: usize,
    ctx: &IntersectContext,
    prim: &QuadMv,
    epilog: &mut impl HitEpilog<R>,
) -> bool {
    report_primitive(ctx, QueryKind::Occlusion, 1, 1);
    let valid = prim.valid_mask();

    for which in QuadTriangle::ALL {
        let tri = prim.triangle(which);
        let (tnear, tfar) = (rays.tnear(lane), rays.tfar(lane));

        let occluded = pre.intersect(tnear, tfar, valid, &tri, |hits| {
            for i in hits.lanes() {
                let hit = lane_candidate(prim, which, i, hits, i, lane);
                let verdict = epilog.on_candidate_hit(rays, &hit);
                report_candidate(ctx, QueryKind::Occlusion, verdict);

                if verdict.is_accept() {
                    epilog.on_occlusion_lane_resolved(rays, lane);
                    return true;
                }
            }

            false
        });

        if occluded {
            return true;
        }
    }

    false
}

/// Occlusion query where every geometric candidate is a hit.
fn occluded_lane_unfiltered(
    pre: &QuadPrecalc1,
    tnear: Real,
    tfar: Real,
    ctx: &IntersectContext,
    prim: &QuadMv,
) -> bool {
    report_primitive(ctx, QueryKind::Occlusion, 1, 1);
    let valid = prim.valid_mask();

    for which in QuadTriangle::ALL {
        if pre.occluded(tnear, tfar, valid, &prim.triangle(which)).any() {
            report_candidate(ctx, QueryKind::Occlusion, HitVerdict::Accept);
            return true;
        }
    }

    false
}

impl<const FILTER: bool> QuadMvIntersector1<FILTER> {
    #[inline]
    fn filter_applies(ctx: &IntersectContext) -> bool {
        FILTER && ctx.filter.is_some()
    }

    /// Finds the closest hit of `ray` with the quads of `prim`.
    ///
    /// If a hit closer than `ray.tfar` is accepted, `ray.tfar` and `ray.hit` are updated.
    #[inline]
    pub fn intersect(pre: &QuadPrecalc1, ray: &mut Ray, ctx: &IntersectContext, prim: &QuadMv) {
        Self::intersect_with_epilog(pre, ray, ctx, prim, &mut ClosestHitEpilog::<FILTER>::new(ctx))
    }

    /// Same as [`Self::intersect`], with a custom epilog.
    ///
    /// Candidates are given to the epilog in increasing distance for each half of the quads,
    /// and only if they are closer than the current `ray.tfar`.
    pub fn intersect_with_epilog<E: HitEpilog<Ray>>(
        pre: &QuadPrecalc1,
        ray: &mut Ray,
        ctx: &IntersectContext,
        prim: &QuadMv,
        epilog: &mut E,
    ) {
        intersect_lane(pre, ray, 0, ctx, prim, epilog)
    }

    /// Tests if `ray` hits any of the quads of `prim`.
    pub fn occluded(pre: &QuadPrecalc1, ray: &Ray, ctx: &IntersectContext, prim: &QuadMv) -> bool {
        if Self::filter_applies(ctx) {
            let mut ray = *ray;
            Self::occluded_with_epilog(pre, &mut ray, ctx, prim, &mut OcclusionEpilog::<FILTER>::new(ctx))
        } else {
            occluded_lane_unfiltered(pre, ray.tnear, ray.tfar, ctx, prim)
        }
    }

    /// Same as [`Self::occluded`], with a custom epilog.
    ///
    /// Stops at the first candidate accepted by the epilog.
    pub fn occluded_with_epilog<E: HitEpilog<Ray>>(
        pre: &QuadPrecalc1,
        ray: &mut Ray,
        ctx: &IntersectContext,
        prim: &QuadMv,
        epilog: &mut E,
    ) -> bool {
        occluded_lane(pre, ray, 0, ctx, prim, epilog)
    }

    /// Finds the closest hit of each ray of an array with the quads of `prim`.
    ///
    /// The `i-th` ray is tested iff the `i-th` bit of `valid` is set, using the precomputed
    /// state `pre[i]`. Only the first 64 rays can be addressed. Returns the bitmask of the rays
    /// whose `tfar` decreased.
    pub fn intersect_rays(
        pre: &[QuadPrecalc1],
        valid: u64,
        rays: &mut [Ray],
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) -> u64 {
        let mut result = 0;

        for i in BitIter::new(array_mask(valid, pre.len().min(rays.len()))) {
            let ray = &mut rays[i];
            let tfar = ray.tfar;
            Self::intersect(&pre[i], ray, ctx, prim);

            if ray.tfar < tfar {
                result |= lane_bit(i);
            }
        }

        result
    }

    /// Tests which rays of an array hit any of the quads of `prim`.
    ///
    /// Same addressing as [`Self::intersect_rays`]. Returns the bitmask of the occluded rays.
    pub fn occluded_rays(
        pre: &[QuadPrecalc1],
        valid: u64,
        rays: &[Ray],
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) -> u64 {
        BitIter::new(array_mask(valid, pre.len().min(rays.len())))
            .filter(|i| Self::occluded(&pre[*i], &rays[*i], ctx, prim))
            .fold(0, |bits, i| bits | lane_bit(i))
    }

    /// Same as [`Self::intersect_rays`], distributing the rays over the `rayon` thread pool.
    #[cfg(feature = "parallel")]
    pub fn intersect_rays_parallel(
        pre: &[QuadPrecalc1],
        valid: u64,
        rays: &mut [Ray],
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) -> u64 {
        use rayon::prelude::*;

        let valid = array_mask(valid, pre.len().min(rays.len()));

        rays.par_iter_mut()
            .zip(pre.par_iter())
            .enumerate()
            .filter(|(i, _)| valid & lane_bit(*i) != 0)
            .map(|(i, (ray, pre))| {
                let tfar = ray.tfar;
                Self::intersect(pre, ray, ctx, prim);

                if ray.tfar < tfar {
                    lane_bit(i)
                } else {
                    0
                }
            })
            .reduce(|| 0, |a, b| a | b)
    }
}

impl<const FILTER: bool> QuadMvIntersectorK<FILTER> {
    #[inline]
    fn filter_applies(ctx: &IntersectContext) -> bool {
        FILTER && ctx.filter.is_some()
    }

    /// Finds the closest hit of each ray of `packet` where `valid` is set with the quads of
    /// `prim`.
    ///
    /// Each quad is broadcast over the whole packet and tested by all the active rays at once.
    #[inline]
    pub fn intersect(
        valid: SimdBool,
        pre: &QuadPrecalcK,
        packet: &mut RayPacket,
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) {
        Self::intersect_with_epilog(
            valid,
            pre,
            packet,
            ctx,
            prim,
            &mut ClosestHitEpilog::<FILTER>::new(ctx),
        )
    }

    /// Same as [`Self::intersect`], with a custom epilog.
    pub fn intersect_with_epilog<E: HitEpilog<RayPacket>>(
        valid: SimdBool,
        pre: &QuadPrecalcK,
        packet: &mut RayPacket,
        ctx: &IntersectContext,
        prim: &QuadMv,
        epilog: &mut E,
    ) {
        report_primitive(
            ctx,
            QueryKind::Intersect,
            valid.bitmask().count_ones(),
            SIMD_WIDTH as u32,
        );

        for i in BitIter::new(prim.valid_bits()) {
            for (which, tri) in QuadTriangle::ALL
                .into_iter()
                .zip(prim.broadcast_triangles(i))
            {
                let hits = pre.hits_k(valid, packet.tnear, packet.tfar, &tri);

                for k in hits.lanes() {
                    let hit = lane_candidate(prim, which, i, &hits, k, k);
                    let verdict = epilog.on_candidate_hit(packet, &hit);
                    report_candidate(ctx, QueryKind::Intersect, verdict);
                }
            }
        }
    }

    /// Tests which rays of `packet` where `valid` is set hit any of the quads of `prim`.
    ///
    /// Returns the mask of the occluded rays, always a subset of `valid`.
    pub fn occluded(
        valid: SimdBool,
        pre: &QuadPrecalcK,
        packet: &RayPacket,
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) -> SimdBool {
        if Self::filter_applies(ctx) {
            let mut packet = *packet;
            return Self::occluded_with_epilog(
                valid,
                pre,
                &mut packet,
                ctx,
                prim,
                &mut OcclusionEpilog::<FILTER>::new(ctx),
            );
        }

        report_primitive(
            ctx,
            QueryKind::Occlusion,
            valid.bitmask().count_ones(),
            SIMD_WIDTH as u32,
        );
        let mut pending = valid;

        'quads: for i in BitIter::new(prim.valid_bits()) {
            for tri in prim.broadcast_triangles(i) {
                let resolved = pre.occluded_k(pending, packet.tnear, packet.tfar, &tri);

                for _ in BitIter::new(resolved.bitmask()) {
                    report_candidate(ctx, QueryKind::Occlusion, HitVerdict::Accept);
                }

                pending = pending & !resolved;

                if pending.none() {
                    break 'quads;
                }
            }
        }

        valid & !pending
    }

    /// Same as [`Self::occluded`], with a custom epilog.
    ///
    /// Once a ray is occluded, it is no longer tested against the remaining quads.
    pub fn occluded_with_epilog<E: HitEpilog<RayPacket>>(
        valid: SimdBool,
        pre: &QuadPrecalcK,
        packet: &mut RayPacket,
        ctx: &IntersectContext,
        prim: &QuadMv,
        epilog: &mut E,
    ) -> SimdBool {
        report_primitive(
            ctx,
            QueryKind::Occlusion,
            valid.bitmask().count_ones(),
            SIMD_WIDTH as u32,
        );
        let mut pending = valid;

        'quads: for i in BitIter::new(prim.valid_bits()) {
            for (which, tri) in QuadTriangle::ALL
                .into_iter()
                .zip(prim.broadcast_triangles(i))
            {
                let hits = pre.hits_k(pending, packet.tnear, packet.tfar, &tri);
                let mut resolved = SimdBool::splat(false);

                for k in hits.lanes() {
                    let hit = lane_candidate(prim, which, i, &hits, k, k);
                    let verdict = epilog.on_candidate_hit(packet, &hit);
                    report_candidate(ctx, QueryKind::Occlusion, verdict);

                    if verdict.is_accept() {
                        resolved.replace(k, true);
                        epilog.on_occlusion_lane_resolved(packet, k);
                    }
                }

                pending = pending & !resolved;

                if pending.none() {
                    break 'quads;
                }
            }
        }

        valid & !pending
    }

    /// Finds the closest hit of the `k-th` ray of `packet` with the quads of `prim`.
    pub fn intersect1(
        pre: &QuadPrecalcK,
        packet: &mut RayPacket,
        k: usize,
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) {
        let mut epilog = ClosestHitEpilog::<FILTER>::new(ctx);
        intersect_lane(&pre.lane(k), packet, k, ctx, prim, &mut epilog)
    }

    /// Tests if the `k-th` ray of `packet` hits any of the quads of `prim`.
    pub fn occluded1(
        pre: &QuadPrecalcK,
        packet: &RayPacket,
        k: usize,
        ctx: &IntersectContext,
        prim: &QuadMv,
    ) -> bool {
        let pre = pre.lane(k);

        if Self::filter_applies(ctx) {
            let mut packet = *packet;
            let mut epilog = OcclusionEpilog::<FILTER>::new(ctx);
            occluded_lane(&pre, &mut packet, k, ctx, prim, &mut epilog)
        } else {
            occluded_lane_unfiltered(&pre, packet.tnear(k), packet.tfar(k), ctx, prim)
        }
    }
}
