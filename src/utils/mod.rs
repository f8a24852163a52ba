//! Various unsorted lane-manipulation helpers.

pub use self::lanes::{select_min_lane, BitIter};

mod lanes;
