//! Non-persistent ray/quad queries.
//!
//! A query tests one ray, a [`RayPacket`] or an array of rays against a [`QuadMv`](crate::shape::QuadMv):
//!
//! * [`QuadMvIntersector1`] for single rays and arrays of rays.
//! * [`QuadMvIntersectorK`] for packets of rays.
//!
//! Each ray (or packet) is first turned into a [`QuadPrecalc1`] (or a [`QuadPrecalcK`]) which
//! can be reused for every primitive tested by that ray. Geometric candidates go through a
//! [`HitEpilog`] before being recorded, and the [`IntersectContext`] carries the optional
//! [`HitFilter`] and [`StatsSink`] of the traversal.

pub use self::context::{IntersectContext, IntersectContextFlags};
pub use self::epilog::{
    CandidateHit, ClosestHitEpilog, HitEpilog, HitFilter, HitVerdict, OcclusionEpilog, RayLanes,
};
pub use self::ray::{
    LaneHits, QuadMvIntersector1, QuadMvIntersectorK, QuadPrecalc1, QuadPrecalcK, Ray, RayHit,
    RayPacket, RayPacketHit, TriangleHit,
};
pub use self::stats::{QueryKind, StatsSink, StatsSnapshot, TraversalStats};

mod context;
mod epilog;
mod ray;
pub mod stats;

/// Queries dedicated to specific shapes.
pub mod details {
    pub use super::ray::local_ray_intersection_with_triangle;
}
