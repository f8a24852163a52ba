use quadtrace3d::math::{Point, Real, Vector, SIMD_WIDTH};
use quadtrace3d::query::{IntersectContext, QuadMvIntersector1, QuadPrecalc1, Ray};
use quadtrace3d::shape::QuadMv;

use crate::helpers::{axis_aligned_quad, brute_force_closest, full_random_prim, random_prim, random_ray};

#[test]
fn closest_of_stacked_quads_wins_regardless_of_lane() {
    let ctx = IntersectContext::new();

    // The closest quad is tried on every lane.
    for closest in 0..SIMD_WIDTH {
        let quads: Vec<_> = (0..SIMD_WIDTH)
            .map(|i| {
                let z = if i == closest { 1.0 } else { 2.0 + i as Real };
                axis_aligned_quad(0.0, 0.0, z)
            })
            .collect();
        let prim_ids: Vec<u32> = (0..SIMD_WIDTH as u32).collect();
        let prim = QuadMv::new(&quads, &vec![3; SIMD_WIDTH], &prim_ids).unwrap();

        let mut ray = Ray::new(Point::new(0.2, 0.7, 0.0), Vector::z());
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
        QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);

        assert_eq!(ray.tfar, 1.0);
        assert_eq!(ray.hit.prim_id, closest as u32);
        assert_eq!(ray.hit.geom_id, 3);
    }
}

#[test]
fn closest_hit_matches_brute_force() {
    let mut rng = oorandom::Rand32::new(42);
    let ctx = IntersectContext::new();
    let mut num_hits = 0;

    for i in 0..2000 {
        let prim = random_prim(&mut rng, 1 + i % SIMD_WIDTH);
        let mut ray = random_ray(&mut rng);
        let expected = brute_force_closest(&ray, &prim);
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

        QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);

        match expected {
            Some((t, prim_id)) => {
                num_hits += 1;
                assert_eq!(ray.tfar, t);
                assert_eq!(ray.hit.prim_id, prim_id);
                assert!(ray.hit.u >= 0.0 && ray.hit.u <= 1.0);
                assert!(ray.hit.v >= 0.0 && ray.hit.v <= 1.0);
            }
            None => {
                assert_eq!(ray.tfar, Real::INFINITY);
                assert!(!ray.has_hit());
            }
        }
    }

    // Make sure the random setup is meaningful.
    assert!(num_hits > 200, "only {} hits", num_hits);
}

#[test]
fn closest_hit_is_idempotent() {
    let mut rng = oorandom::Rand32::new(3);
    let ctx = IntersectContext::new();

    for _ in 0..500 {
        let prim = full_random_prim(&mut rng);
        let mut ray = random_ray(&mut rng);
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

        QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
        let first = ray;
        QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
        assert_eq!(ray, first);
    }
}

#[test]
fn empty_primitive_is_a_no_op() {
    let ctx = IntersectContext::new();
    let prim = QuadMv::new_empty();
    let mut ray = Ray::new(Point::origin(), Vector::z());
    let before = ray;
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

    QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
    assert_eq!(ray, before);
    assert!(!QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim));
}

#[test]
fn cleared_lanes_are_never_hit() {
    let ctx = IntersectContext::new();
    let mut prim = QuadMv::new(
        &[axis_aligned_quad(0.0, 0.0, 1.0), axis_aligned_quad(0.0, 0.0, 2.0)],
        &[0, 0],
        &[0, 1],
    )
    .unwrap();
    prim.clear(0);

    let mut ray = Ray::new(Point::new(0.5, 0.25, 0.0), Vector::z());
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
    QuadMvIntersector1::<false>::intersect(&pre, &mut ray, &ctx, &prim);
    assert_eq!(ray.tfar, 2.0);
    assert_eq!(ray.hit.prim_id, 1);
}
