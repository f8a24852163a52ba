//! Definition of the packed quad primitive.

use crate::math::{Point, Real, SimdBool, SimdReal, SIMD_WIDTH};
use crate::shape::{Quad, QuadTriangle, SimdTriangle};
use crate::utils::BitIter;
use arrayvec::ArrayVec;
use simba::simd::SimdValue;

/// The identifier marking an unused lane of a [`QuadMv`], or the absence of a hit.
pub const INVALID_ID: u32 = u32::MAX;

/// Error that can occur while packing quads into a [`QuadMv`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuadMvError {
    /// More quads than lanes were given.
    #[error("cannot pack {count} quads into a primitive with {capacity} lanes.")]
    TooManyQuads {
        /// The number of quads given.
        count: usize,
        /// The number of lanes of the primitive.
        capacity: usize,
    },
    /// A quad uses [`INVALID_ID`] as its geometry identifier.
    #[error("the quad at lane {lane} uses the reserved geometry identifier.")]
    ReservedGeometryId {
        /// The lane of the offending quad.
        lane: usize,
    },
    /// The quads and identifiers slices have different lengths.
    #[error("got {quads} quads but {geom_ids} geometry identifiers and {prim_ids} primitive identifiers.")]
    LengthMismatch {
        /// The number of quads given.
        quads: usize,
        /// The number of geometry identifiers given.
        geom_ids: usize,
        /// The number of primitive identifiers given.
        prim_ids: usize,
    },
}

/// Up to `SIMD_WIDTH` quads packed as a single SoA primitive with SIMD components.
///
/// Lane `i` holds the quad `(v0[i], v1[i], v2[i], v3[i])` together with the identifiers
/// reported when it is hit. A lane is active iff its geometry identifier is not
/// [`INVALID_ID`]; inactive lanes are never tested.
#[derive(Debug, Copy, Clone)]
pub struct QuadMv {
    /// The first vertex of each quad.
    pub v0: Point<SimdReal>,
    /// The second vertex of each quad.
    pub v1: Point<SimdReal>,
    /// The third vertex of each quad.
    pub v2: Point<SimdReal>,
    /// The fourth vertex of each quad.
    pub v3: Point<SimdReal>,
    /// The geometry identifier of each quad.
    pub geom_ids: [u32; SIMD_WIDTH],
    /// The primitive identifier of each quad.
    pub prim_ids: [u32; SIMD_WIDTH],
}

impl Default for QuadMv {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl QuadMv {
    /// The maximum number of quads a primitive can hold.
    #[inline]
    pub const fn max_size() -> usize {
        SIMD_WIDTH
    }

    /// A primitive with all its lanes inactive.
    pub fn new_empty() -> Self {
        let origin = Point::splat(Point::<Real>::origin());
        Self {
            v0: origin,
            v1: origin,
            v2: origin,
            v3: origin,
            geom_ids: [INVALID_ID; SIMD_WIDTH],
            prim_ids: [INVALID_ID; SIMD_WIDTH],
        }
    }

    /// Packs the given quads into the first lanes of a new primitive.
    ///
    /// The `i-th` quad is identified by `geom_ids[i]` and `prim_ids[i]`. The remaining lanes
    /// are left inactive.
    pub fn new(quads: &[Quad], geom_ids: &[u32], prim_ids: &[u32]) -> Result<Self, QuadMvError> {
        if quads.len() != geom_ids.len() || quads.len() != prim_ids.len() {
            return Err(QuadMvError::LengthMismatch {
                quads: quads.len(),
                geom_ids: geom_ids.len(),
                prim_ids: prim_ids.len(),
            });
        }

        if quads.len() > SIMD_WIDTH {
            return Err(QuadMvError::TooManyQuads {
                count: quads.len(),
                capacity: SIMD_WIDTH,
            });
        }

        let mut result = Self::new_empty();

        for (lane, ((quad, geom_id), prim_id)) in
            quads.iter().zip(geom_ids).zip(prim_ids).enumerate()
        {
            result.set(lane, *quad, *geom_id, *prim_id)?;
        }

        Ok(result)
    }

    /// Replaces the quad on the `i-th` lane, activating that lane.
    ///
    /// # Panics
    ///
    /// Panics if `i >= SIMD_WIDTH`.
    pub fn set(&mut self, i: usize, quad: Quad, geom_id: u32, prim_id: u32) -> Result<(), QuadMvError> {
        if geom_id == INVALID_ID {
            return Err(QuadMvError::ReservedGeometryId { lane: i });
        }

        if quad.is_degenerate() {
            log::debug!(
                "Quad {} of geometry {} is degenerate, it will never be hit.",
                prim_id,
                geom_id
            );
        }

        self.v0.replace(i, quad.v0);
        self.v1.replace(i, quad.v1);
        self.v2.replace(i, quad.v2);
        self.v3.replace(i, quad.v3);
        self.geom_ids[i] = geom_id;
        self.prim_ids[i] = prim_id;
        Ok(())
    }

    /// Deactivates the `i-th` lane.
    pub fn clear(&mut self, i: usize) {
        let origin = Point::origin();
        self.v0.replace(i, origin);
        self.v1.replace(i, origin);
        self.v2.replace(i, origin);
        self.v3.replace(i, origin);
        self.geom_ids[i] = INVALID_ID;
        self.prim_ids[i] = INVALID_ID;
    }

    /// Is the `i-th` lane active?
    #[inline]
    pub fn valid(&self, i: usize) -> bool {
        self.geom_ids[i] != INVALID_ID
    }

    /// The bitmask of active lanes.
    #[inline]
    pub fn valid_bits(&self) -> u64 {
        self.geom_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id != INVALID_ID)
            .fold(0, |bits, (i, _)| bits | (1 << i))
    }

    /// The mask of active lanes.
    #[inline]
    pub fn valid_mask(&self) -> SimdBool {
        let mut mask = SimdBool::splat(false);
        for i in BitIter::new(self.valid_bits()) {
            mask.replace(i, true);
        }
        mask
    }

    /// The number of active lanes.
    #[inline]
    pub fn len(&self) -> usize {
        self.valid_bits().count_ones() as usize
    }

    /// Does this primitive have no active lane?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid_bits() == 0
    }

    /// The quad stored on the `i-th` lane.
    #[inline]
    pub fn quad(&self, i: usize) -> Quad {
        Quad::new(
            self.v0.extract(i),
            self.v1.extract(i),
            self.v2.extract(i),
            self.v3.extract(i),
        )
    }

    /// The active quads, with their lane index.
    pub fn quads(&self) -> ArrayVec<(usize, Quad), SIMD_WIDTH> {
        BitIter::new(self.valid_bits())
            .map(|i| (i, self.quad(i)))
            .collect()
    }

    /// The given half of every quad of this primitive.
    #[inline]
    pub fn triangle(&self, which: QuadTriangle) -> SimdTriangle {
        match which {
            QuadTriangle::First => SimdTriangle::new(self.v0, self.v1, self.v3),
            QuadTriangle::Second => SimdTriangle::new(self.v2, self.v3, self.v1),
        }
    }

    /// Both halves of every quad of this primitive, see [`Quad::triangles`].
    #[inline]
    pub fn triangles(&self) -> [SimdTriangle; 2] {
        [
            self.triangle(QuadTriangle::First),
            self.triangle(QuadTriangle::Second),
        ]
    }

    /// Both halves of the `i-th` quad, broadcast on all the lanes.
    #[inline]
    pub fn broadcast_triangles(&self, i: usize) -> [SimdTriangle; 2] {
        let p0 = Point::splat(self.v0.extract(i));
        let p1 = Point::splat(self.v1.extract(i));
        let p2 = Point::splat(self.v2.extract(i));
        let p3 = Point::splat(self.v3.extract(i));
        [SimdTriangle::new(p0, p1, p3), SimdTriangle::new(p2, p3, p1)]
    }
}
