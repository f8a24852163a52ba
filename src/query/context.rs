use crate::query::{HitFilter, StatsSink};
use crate::shape::INVALID_ID;

bitflags::bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
    /// Hints describing the rays traced with an [`IntersectContext`].
    pub struct IntersectContextFlags: u8 {
        /// The rays are coherent (e.g. primary rays of neighboring pixels).
        const COHERENT = 1 << 0;
        /// The rays are incoherent (e.g. secondary rays after a diffuse bounce).
        const INCOHERENT = 1 << 1;
    }
}

/// The state shared by every ray/quad test of one traversal.
///
/// The intersectors never branch on the context, they only forward it to the epilogs and
/// report their activity to its statistics sink.
#[derive(Copy, Clone)]
pub struct IntersectContext<'a> {
    /// Hints about the rays being traced.
    pub flags: IntersectContextFlags,
    /// The identifier of the instance being traversed, written into each recorded hit.
    ///
    /// Set to [`INVALID_ID`] outside of any instance.
    pub inst_id: u32,
    /// The filter deciding whether a geometric candidate is an actual hit.
    pub filter: Option<&'a (dyn HitFilter + Sync)>,
    /// The sink collecting traversal statistics.
    pub stats: Option<&'a (dyn StatsSink + Sync)>,
}

impl<'a> IntersectContext<'a> {
    /// A context without filter, statistics nor instance.
    pub fn new() -> Self {
        Self {
            flags: IntersectContextFlags::empty(),
            inst_id: INVALID_ID,
            filter: None,
            stats: None,
        }
    }

    /// A context for coherent rays.
    pub fn coherent() -> Self {
        Self {
            flags: IntersectContextFlags::COHERENT,
            ..Self::new()
        }
    }

    /// A context for incoherent rays.
    pub fn incoherent() -> Self {
        Self {
            flags: IntersectContextFlags::INCOHERENT,
            ..Self::new()
        }
    }

    /// Sets the filter applied to every geometric candidate.
    pub fn with_filter(mut self, filter: &'a (dyn HitFilter + Sync)) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the sink collecting traversal statistics.
    pub fn with_stats(mut self, stats: &'a (dyn StatsSink + Sync)) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Sets the identifier of the instance being traversed.
    pub fn with_instance(mut self, inst_id: u32) -> Self {
        self.inst_id = inst_id;
        self
    }
}

impl Default for IntersectContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for IntersectContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntersectContext")
            .field("flags", &self.flags)
            .field("inst_id", &self.inst_id)
            .field("filter", &self.filter.is_some())
            .field("stats", &self.stats.is_some())
            .finish()
    }
}
