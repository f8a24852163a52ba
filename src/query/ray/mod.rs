//! Ray-casting related definitions and implementations.

#[doc(inline)]
pub use self::ray::{Ray, RayHit};
pub use self::quad_precalc::{LaneHits, QuadPrecalc1, QuadPrecalcK};
pub use self::ray_quadv::{QuadMvIntersector1, QuadMvIntersectorK};
pub use self::ray_triangle::{local_ray_intersection_with_triangle, TriangleHit};
pub use self::simd_ray::{RayPacket, RayPacketHit};

#[doc(hidden)]
pub mod ray;
mod quad_precalc;
mod ray_quadv;
mod ray_triangle;
mod simd_ray;
