use approx::assert_relative_eq;
use quadtrace3d::math::{Isometry, Point, Real, Vector};
use quadtrace3d::query::{IntersectContext, QuadMvIntersector1, QuadPrecalc1, Ray};
use quadtrace3d::shape::{QuadMv, INVALID_ID};

use crate::helpers::axis_aligned_quad;

fn trace(ray: &mut Ray, ctx: &IntersectContext, prim: &QuadMv) {
    let pre = QuadPrecalc1::new(&ray.origin, &ray.dir);
    QuadMvIntersector1::<true>::intersect(&pre, ray, ctx, prim);
}

#[test]
fn hits_are_tagged_with_the_instance_id() {
    let prim = QuadMv::new(&[axis_aligned_quad(0.0, 0.0, 1.0)], &[2], &[9]).unwrap();
    let ray = Ray::new(Point::new(0.5, 0.5, 0.0), Vector::z());

    let mut outside = ray;
    trace(&mut outside, &IntersectContext::new(), &prim);
    assert_eq!(outside.hit.inst_id, INVALID_ID);
    assert_eq!((outside.hit.geom_id, outside.hit.prim_id), (2, 9));

    let mut inside = ray;
    trace(&mut inside, &IntersectContext::new().with_instance(5), &prim);
    assert_eq!(inside.hit.inst_id, 5);
    assert_eq!(inside.tfar, outside.tfar);
}

#[test]
fn instanced_quads_are_hit_in_local_space() {
    let local_quad = axis_aligned_quad(0.0, 0.0, 0.0);
    let prim = QuadMv::new(&[local_quad], &[0], &[0]).unwrap();
    let m = Isometry::new(Vector::new(3.0, -1.0, 2.0), Vector::new(0.3, -0.7, 1.1));
    let world_prim = QuadMv::new(&[local_quad.transformed(&m)], &[0], &[0]).unwrap();
    let ctx = IntersectContext::new().with_instance(1);

    let target = m * Point::new(0.25, 0.6, 0.0);
    let dir = m * Vector::new(0.1, -0.2, 1.0);
    let world_ray = Ray::new(target - dir * 2.0, dir);

    let mut local_ray = world_ray.inverse_transform_by(&m);
    trace(&mut local_ray, &ctx, &prim);
    assert!(local_ray.has_hit());
    assert_relative_eq!(local_ray.tfar, 2.0, epsilon = 1.0e-4);
    assert_relative_eq!(world_ray.point_at(local_ray.tfar), target, epsilon = 1.0e-4);

    // Tracing the transformed quads in world space gives the same hit.
    let mut world = world_ray;
    trace(&mut world, &IntersectContext::new(), &world_prim);
    assert_relative_eq!(world.tfar, local_ray.tfar, epsilon = 1.0e-4);
    assert_relative_eq!(world.hit.u, local_ray.hit.u, epsilon = 1.0e-4);
    assert_relative_eq!(world.hit.v, local_ray.hit.v, epsilon = 1.0e-4);
    assert_relative_eq!(
        world.hit.ng,
        m * local_ray.hit.ng,
        epsilon = 1.0e-4 as Real
    );
    assert_eq!(world.hit.inst_id, INVALID_ID);
}
