use quadtrace3d::math::{Point, SimdBool, Vector, SIMD_WIDTH};
use quadtrace3d::query::{
    CandidateHit, HitFilter, HitVerdict, IntersectContext, QuadMvIntersector1, QuadMvIntersectorK,
    QuadPrecalc1, QuadPrecalcK, QueryKind, Ray, RayPacket, TraversalStats,
};
use quadtrace3d::shape::QuadMv;
use quadtrace3d::simba::simd::{SimdBool as _, SimdValue};

use crate::helpers::{axis_aligned_quad, full_random_prim, random_ray};

struct RejectAll;

impl HitFilter for RejectAll {
    fn intersection_filter(&self, _: &Ray, _: &CandidateHit) -> HitVerdict {
        HitVerdict::Reject
    }
}

#[test]
fn rejecting_filter_leaves_rays_untouched() {
    let mut rng = oorandom::Rand32::new(21);
    let stats = TraversalStats::new();
    let ctx = IntersectContext::new()
        .with_filter(&RejectAll)
        .with_stats(&stats);

    for _ in 0..500 {
        let prim = full_random_prim(&mut rng);
        let mut ray = random_ray(&mut rng);
        let before = ray;
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

        QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
        assert_eq!(ray, before);
        assert!(!QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim));

        let mut packet = RayPacket::from_fn(|_| random_ray(&mut rng));
        let before = packet;
        let pre = QuadPrecalcK::new(&packet);
        let valid = SimdBool::splat(true);
        QuadMvIntersectorK::<true>::intersect(valid, &pre, &mut packet, &ctx, &prim);
        assert!(QuadMvIntersectorK::<true>::occluded(valid, &pre, &packet, &ctx, &prim).none());

        for k in 0..SIMD_WIDTH {
            assert_eq!(packet.ray(k), before.ray(k));
        }
    }

    // Rejected candidates are still candidates.
    let s = stats.snapshot(QueryKind::Intersect);
    assert!(s.rejected > 0);
    assert_eq!(s.accepted, 0);
    assert_eq!(s.candidates(), s.rejected);
    assert_eq!(stats.snapshot(QueryKind::Occlusion).accepted, 0);
}

#[test]
fn rejected_hits_let_the_search_continue() {
    let prim = QuadMv::new(
        &[
            axis_aligned_quad(0.0, 0.0, 1.0),
            axis_aligned_quad(0.0, 0.0, 2.0),
            axis_aligned_quad(0.0, 0.0, 3.0),
        ],
        &[0, 0, 0],
        &[0, 1, 2],
    )
    .unwrap();
    let skip_first = |_: &Ray, hit: &CandidateHit| HitVerdict::from(hit.prim_id != 0);
    let ctx = IntersectContext::new().with_filter(&skip_first);

    let mut ray = Ray::new(Point::new(0.5, 0.1, 0.0), Vector::z());
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
    QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
    assert_eq!(ray.tfar, 2.0);
    assert_eq!(ray.hit.prim_id, 1);

    // Without the filter flag, the filter of the context is ignored.
    let mut ray = Ray::new(Point::new(0.5, 0.1, 0.0), Vector::z());
    QuadMvIntersector1::<false>::intersect(&pre, &mut ray, &ctx, &prim);
    assert_eq!(ray.hit.prim_id, 0);

    let mut packet = RayPacket::splat(Ray::new(Point::new(0.5, 0.1, 0.0), Vector::z()));
    let pre = QuadPrecalcK::new(&packet);
    let mut valid = SimdBool::splat(false);
    valid.replace(1, true);
    QuadMvIntersectorK::<true>::intersect(valid, &pre, &mut packet, &ctx, &prim);
    assert_eq!(packet.hit(1).prim_id, 1);
    assert!(!packet.hit(0).is_hit());
}

#[test]
fn occlusion_filter_can_differ_from_intersection_filter() {
    // Glass: visible for closest-hit queries, transparent for shadow rays.
    struct Glass;

    impl HitFilter for Glass {
        fn intersection_filter(&self, _: &Ray, _: &CandidateHit) -> HitVerdict {
            HitVerdict::Accept
        }

        fn occlusion_filter(&self, _: &Ray, _: &CandidateHit) -> HitVerdict {
            HitVerdict::Reject
        }
    }

    let prim = QuadMv::new(&[axis_aligned_quad(0.0, 0.0, 1.0)], &[0], &[0]).unwrap();
    let ctx = IntersectContext::new().with_filter(&Glass);
    let mut ray = Ray::new(Point::new(0.5, 0.5, 0.0), Vector::z());
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

    assert!(!QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim));
    QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
    assert!(ray.has_hit());
}
