//! Shapes supported by quadtrace.

pub use self::quad::{Quad, QuadTriangle};
pub use self::quadv::{QuadMv, QuadMvError, INVALID_ID};
pub use self::triangle::{SimdTriangle, Triangle};

mod quad;
mod quadv;
mod triangle;
