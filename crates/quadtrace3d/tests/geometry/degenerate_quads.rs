use quadtrace3d::math::{Point, Real, Vector};
use quadtrace3d::query::{IntersectContext, QuadMvIntersector1, QuadPrecalc1, Ray};
use quadtrace3d::shape::{Quad, QuadMv};

use crate::helpers::{rand_real, random_ray};

#[test]
fn collapsed_quads_are_never_hit() {
    let mut rng = oorandom::Rand32::new(5);
    let ctx = IntersectContext::new();

    for _ in 0..1000 {
        let p = Point::new(
            rand_real(&mut rng, -1.0, 1.0),
            rand_real(&mut rng, -1.0, 1.0),
            rand_real(&mut rng, 1.0, 3.0),
        );
        let prim = QuadMv::new(&[Quad::new(p, p, p, p)], &[0], &[0]).unwrap();

        // Aim exactly at the collapsed quad, and at random.
        for mut ray in [Ray::new(p - Vector::z(), Vector::z()), random_ray(&mut rng)] {
            let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
            assert!(!QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim));
            QuadMvIntersector1::<true>::intersect(&pre, &mut ray, &ctx, &prim);
            assert!(!ray.has_hit());
        }
    }
}

#[test]
fn collinear_quads_are_never_hit() {
    let ctx = IntersectContext::new();
    let quad = Quad::new(
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 1.0),
        Point::new(2.0, 0.0, 1.0),
        Point::new(3.0, 0.0, 1.0),
    );
    assert!(quad.is_degenerate());
    let prim = QuadMv::new(&[quad], &[0], &[0]).unwrap();

    for i in 0..=30 {
        let x = i as Real / 10.0;
        for dir in [Vector::z(), Vector::new(0.0, 1.0, 1.0), Vector::y()] {
            let ray = Ray::new(Point::new(x, 0.0, 1.0) - dir, dir);
            let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
            assert!(!QuadMvIntersector1::<false>::occluded(&pre, &ray, &ctx, &prim));
        }
    }
}

#[test]
fn nan_rays_are_never_hit() {
    let ctx = IntersectContext::new();
    let quad = Quad::new(
        Point::new(-1.0, -1.0, 1.0),
        Point::new(1.0, -1.0, 1.0),
        Point::new(1.0, 1.0, 1.0),
        Point::new(-1.0, 1.0, 1.0),
    );
    let prim = QuadMv::new(&[quad], &[0], &[0]).unwrap();

    for ray in [
        Ray::new(Point::new(Real::NAN, 0.0, 0.0), Vector::z()),
        Ray::new(Point::origin(), Vector::new(0.0, Real::NAN, 1.0)),
        Ray::new(Point::origin(), Vector::zeros()),
        Ray::with_interval(Point::origin(), Vector::z(), Real::NAN, Real::INFINITY),
    ] {
        let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
        let mut hit = ray;
        QuadMvIntersector1::<true>::intersect(&pre, &mut hit, &ctx, &prim);
        assert!(!hit.has_hit());
        assert!(!QuadMvIntersector1::<true>::occluded(&pre, &ray, &ctx, &prim));
    }
}
