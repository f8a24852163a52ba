use quadtrace3d::query::{
    CandidateHit, HitVerdict, IntersectContext, QuadMvIntersector1, QuadPrecalc1, Ray,
};

use crate::helpers::{full_random_prim, random_prim, random_ray};

#[test]
fn occlusion_agrees_with_closest_hit() {
    let mut rng = oorandom::Rand32::new(11);
    let ctx = IntersectContext::new();

    for i in 0..2000 {
        let prim = random_prim(&mut rng, 1 + i % 4);
        let ray = random_ray(&mut rng);
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

        let mut closest = ray;
        QuadMvIntersector1::<true>::intersect(&pre, &mut closest, &ctx, &prim);

        assert_eq!(
            QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim),
            closest.has_hit()
        );
        assert_eq!(
            QuadMvIntersector1::<false>::occluded(&pre, &ray, &ctx, &prim),
            closest.has_hit()
        );
    }
}

#[test]
fn filtered_occlusion_agrees_with_filtered_closest_hit() {
    let mut rng = oorandom::Rand32::new(12);
    // Only quads with an odd primitive id are solid.
    let odd_only = |_: &Ray, hit: &CandidateHit| HitVerdict::from(hit.prim_id % 2 == 1);
    let ctx = IntersectContext::new().with_filter(&odd_only);

    for _ in 0..2000 {
        let prim = full_random_prim(&mut rng);
        let ray = random_ray(&mut rng);
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);

        let mut closest = ray;
        QuadMvIntersector1::<true>::intersect(&pre, &mut closest, &ctx, &prim);
        let occluded = QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim);

        assert_eq!(occluded, closest.has_hit());
        if closest.has_hit() {
            assert_eq!(closest.hit.prim_id % 2, 1);
        }
    }
}

#[test]
fn occlusion_never_writes_the_ray() {
    let mut rng = oorandom::Rand32::new(13);
    let ctx = IntersectContext::new();

    for _ in 0..100 {
        let prim = full_random_prim(&mut rng);
        let mut ray = random_ray(&mut rng);
        let before = ray;
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
        let mut epilog = quadtrace3d::query::OcclusionEpilog::<true>::new(&ctx);

        let _ = QuadMvIntersector1::<true>::occluded_with_epilog(
            &pre, &mut ray, &ctx, &prim, &mut epilog,
        );
        assert_eq!(ray, before);
    }
}
