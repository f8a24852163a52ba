use quadtrace3d::math::{Point, Real, Vector, SIMD_WIDTH};
use quadtrace3d::query::details::local_ray_intersection_with_triangle;
use quadtrace3d::query::Ray;
use quadtrace3d::shape::{Quad, QuadMv, QuadTriangle};

pub fn rand_real(rng: &mut oorandom::Rand32, min: Real, max: Real) -> Real {
    min + (max - min) * rng.rand_float() as Real
}

pub fn axis_aligned_quad(x: Real, y: Real, z: Real) -> Quad {
    Quad::new(
        Point::new(x, y, z),
        Point::new(x + 1.0, y, z),
        Point::new(x + 1.0, y + 1.0, z),
        Point::new(x, y + 1.0, z),
    )
}

/// A convex, slightly non-planar quad in front of the `z = 0` plane.
pub fn random_quad(rng: &mut oorandom::Rand32) -> Quad {
    let center = Point::new(
        rand_real(rng, -0.5, 0.5),
        rand_real(rng, -0.5, 0.5),
        rand_real(rng, 1.0, 5.0),
    );
    let a = rand_real(rng, 0.2, 1.0);
    let b = rand_real(rng, 0.2, 1.0);
    let mut jitter = || rand_real(rng, -0.1, 0.1);

    Quad::new(
        center + Vector::new(-a, -b, jitter()),
        center + Vector::new(a, -b, jitter()),
        center + Vector::new(a, b, jitter()),
        center + Vector::new(-a, b, jitter()),
    )
}

/// A primitive with `count` random quads, the `i-th` one having the primitive id `i`.
pub fn random_prim(rng: &mut oorandom::Rand32, count: usize) -> QuadMv {
    let quads: Vec<_> = (0..count).map(|_| random_quad(rng)).collect();
    let prim_ids: Vec<u32> = (0..count as u32).collect();
    QuadMv::new(&quads, &vec![1; count], &prim_ids).unwrap()
}

pub fn full_random_prim(rng: &mut oorandom::Rand32) -> QuadMv {
    random_prim(rng, SIMD_WIDTH)
}

/// A ray starting behind the `z = 0` plane and going roughly toward `+z`.
pub fn random_ray(rng: &mut oorandom::Rand32) -> Ray {
    let origin = Point::new(rand_real(rng, -1.0, 1.0), rand_real(rng, -1.0, 1.0), -1.0);
    let dir = Vector::new(rand_real(rng, -0.3, 0.3), rand_real(rng, -0.3, 0.3), 1.0);
    Ray::new(origin, dir)
}

/// The smallest distance at which `ray` hits a quad of `prim`, tested one triangle at a time,
/// with the primitive id of that quad.
pub fn brute_force_closest(ray: &Ray, prim: &QuadMv) -> Option<(Real, u32)> {
    let mut best: Option<(Real, u32)> = None;

    for (i, quad) in prim.quads() {
        for which in QuadTriangle::ALL {
            let tri = quad.triangle(which);
            if let Some(hit) = local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, ray) {
                if best.map(|(t, _)| hit.t < t).unwrap_or(true) {
                    best = Some((hit.t, prim.prim_ids[i]));
                }
            }
        }
    }

    best
}
