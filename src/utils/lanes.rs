use crate::math::{Real, SimdReal};
use simba::simd::SimdValue;

/// Iterator over the indices of the bits set on a lane mask.
///
/// The indices are yielded in ascending order, i.e., lane `0` first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct BitIter {
    bits: u64,
}

impl BitIter {
    /// Iterates on the set bits of `bits`.
    #[inline]
    pub fn new(bits: u64) -> Self {
        Self { bits }
    }
}

impl Iterator for BitIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }

        let i = self.bits.trailing_zeros() as usize;
        // Clear the lowest set bit.
        self.bits &= self.bits - 1;
        Some(i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitIter {}

/// Among the lanes set on `bits`, selects the one with the smallest value.
///
/// Ties are resolved toward the lowest lane index. Returns `None` if `bits` is zero.
pub fn select_min_lane(bits: u64, values: &SimdReal) -> Option<usize> {
    let mut best: Option<(usize, Real)> = None;

    for ii in BitIter::new(bits) {
        let value = values.extract(ii);
        let is_better = match best {
            Some((_, best_value)) => value < best_value,
            None => true,
        };

        if is_better {
            best = Some((ii, value));
        }
    }

    best.map(|(ii, _)| ii)
}
