/*!
quadtrace
=========

**quadtrace** is the ray/quad intersection step of a ray-tracing traversal,
written with the rust programming language.

Given a primitive packing up to [`SIMD_WIDTH`](math::SIMD_WIDTH) quads and either a single
ray, a packet of rays or an array of rays, it finds the closest accepted hit or answers an
occlusion query. Each quad is tested as two triangles with a watertight ray/triangle test and
every geometric candidate is routed through a user-replaceable epilog (filtering and hit
recording).

The acceleration structure selecting which primitives to test, the storage of the scene and
the scheduling of rays are outside of this crate.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Maybe revisit this one later.
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(
    feature = "simd-is-enabled",
    not(feature = "simd-stable"),
    not(feature = "simd-nightly")
))]
core::compile_error!("The `simd-is-enabled` feature should not be enabled explicitly. Please enable the `simd-stable` or the `simd-nightly` feature instead.");
#[cfg(all(feature = "simd-is-enabled", feature = "enhanced-determinism"))]
core::compile_error!(
    "SIMD cannot be enabled when the `enhanced-determinism` feature is also enabled."
);
#[cfg(all(feature = "simd-stable", feature = "simd-width-8", feature = "f64"))]
core::compile_error!(
    "The `simd-stable` backend has no 8-lane f64 type. Use `simd-nightly` or the default backend instead."
);

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[cfg(test)]
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;
pub extern crate simba;

pub mod query;
pub mod shape;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use super::simd::*;
    pub use na::{Isometry3, Point3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;
}

#[cfg(not(feature = "simd-is-enabled"))]
mod simd {
    #[cfg(not(feature = "simd-width-8"))]
    mod lanes {
        /// The number of lanes of a SIMD number.
        pub const SIMD_WIDTH: usize = 4;

        /// A SIMD float with SIMD_WIDTH lanes.
        #[cfg(feature = "f32")]
        pub type SimdReal = simba::simd::AutoF32x4;

        /// A SIMD float with SIMD_WIDTH lanes.
        #[cfg(feature = "f64")]
        pub type SimdReal = simba::simd::AutoF64x4;

        /// A SIMD bool with SIMD_WIDTH lanes.
        pub type SimdBool = simba::simd::AutoBoolx4;
    }

    #[cfg(feature = "simd-width-8")]
    mod lanes {
        /// The number of lanes of a SIMD number.
        pub const SIMD_WIDTH: usize = 8;

        /// A SIMD float with SIMD_WIDTH lanes.
        #[cfg(feature = "f32")]
        pub type SimdReal = simba::simd::AutoF32x8;

        /// A SIMD float with SIMD_WIDTH lanes.
        #[cfg(feature = "f64")]
        pub type SimdReal = simba::simd::AutoF64x8;

        /// A SIMD bool with SIMD_WIDTH lanes.
        pub type SimdBool = simba::simd::AutoBoolx8;
    }

    pub use lanes::*;
}

#[cfg(feature = "simd-is-enabled")]
mod simd {
    #[cfg(all(feature = "simd-nightly", feature = "f32", not(feature = "simd-width-8")))]
    pub use simba::simd::{f32x4 as SimdReal, mask32x4 as SimdBool};
    #[cfg(all(feature = "simd-stable", feature = "f32", not(feature = "simd-width-8")))]
    pub use simba::simd::{WideBoolF32x4 as SimdBool, WideF32x4 as SimdReal};

    #[cfg(all(feature = "simd-nightly", feature = "f64", not(feature = "simd-width-8")))]
    pub use simba::simd::{f64x4 as SimdReal, mask64x4 as SimdBool};
    #[cfg(all(feature = "simd-stable", feature = "f64", not(feature = "simd-width-8")))]
    pub use simba::simd::{WideBoolF64x4 as SimdBool, WideF64x4 as SimdReal};

    #[cfg(all(feature = "simd-nightly", feature = "f32", feature = "simd-width-8"))]
    pub use simba::simd::{f32x8 as SimdReal, mask32x8 as SimdBool};
    #[cfg(all(feature = "simd-stable", feature = "f32", feature = "simd-width-8"))]
    pub use simba::simd::{WideBoolF32x8 as SimdBool, WideF32x8 as SimdReal};

    #[cfg(all(feature = "simd-nightly", feature = "f64", feature = "simd-width-8"))]
    pub use simba::simd::{f64x8 as SimdReal, mask64x8 as SimdBool};

    /// The number of lanes of a SIMD number.
    #[cfg(not(feature = "simd-width-8"))]
    pub const SIMD_WIDTH: usize = 4;
    /// The number of lanes of a SIMD number.
    #[cfg(feature = "simd-width-8")]
    pub const SIMD_WIDTH: usize = 8;
}
