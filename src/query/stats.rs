//! Optional accounting of the work done by the intersectors.

use crate::query::HitVerdict;
use core::sync::atomic::{AtomicU64, Ordering};

/// The kind of query being accounted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// A closest-hit query.
    Intersect,
    /// An occlusion query.
    Occlusion,
}

impl QueryKind {
    #[inline]
    fn index(self) -> usize {
        match self {
            QueryKind::Intersect => 0,
            QueryKind::Occlusion => 1,
        }
    }
}

/// An observer of the intersectors' activity.
///
/// A sink is attached to an [`IntersectContext`](crate::query::IntersectContext). It is shared
/// by every thread tracing with that context, hence the `&self` receivers.
pub trait StatsSink {
    /// A quad primitive was tested by `active_rays` rays out of a packet of `packet_width` lanes.
    ///
    /// A single ray is reported as a packet of width 1.
    fn primitive_tested(&self, kind: QueryKind, active_rays: u32, packet_width: u32);

    /// A geometric candidate was given to an epilog, which returned `verdict`.
    fn candidate_found(&self, kind: QueryKind, verdict: HitVerdict);
}

#[derive(Default, Debug)]
struct Counters {
    primitives: AtomicU64,
    active_lanes: AtomicU64,
    lane_slots: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

/// The values of the counters of a [`TraversalStats`] for one query kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// The number of quad primitives tested.
    pub primitives: u64,
    /// The number of active ray lanes summed over every primitive test.
    pub active_lanes: u64,
    /// The number of ray lanes summed over every primitive test, active or not.
    pub lane_slots: u64,
    /// The number of candidates accepted by an epilog.
    pub accepted: u64,
    /// The number of candidates rejected by an epilog.
    pub rejected: u64,
}

impl StatsSnapshot {
    /// The number of geometric candidates, whether they were accepted or not.
    pub fn candidates(&self) -> u64 {
        self.accepted + self.rejected
    }

    /// The ratio of active ray lanes to ray lanes, or 1 if nothing was tested.
    pub fn lane_utilization(&self) -> f64 {
        if self.lane_slots == 0 {
            1.0
        } else {
            self.active_lanes as f64 / self.lane_slots as f64
        }
    }
}

/// A [`StatsSink`] counting events with atomic counters.
#[derive(Default, Debug)]
pub struct TraversalStats {
    counters: [Counters; 2],
}

impl TraversalStats {
    /// Statistics with all counters set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current values of the counters of the given query kind.
    pub fn snapshot(&self, kind: QueryKind) -> StatsSnapshot {
        let c = &self.counters[kind.index()];
        StatsSnapshot {
            primitives: c.primitives.load(Ordering::Relaxed),
            active_lanes: c.active_lanes.load(Ordering::Relaxed),
            lane_slots: c.lane_slots.load(Ordering::Relaxed),
            accepted: c.accepted.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
        }
    }

    /// Sets all the counters to zero.
    pub fn reset(&self) {
        for c in &self.counters {
            c.primitives.store(0, Ordering::Relaxed);
            c.active_lanes.store(0, Ordering::Relaxed);
            c.lane_slots.store(0, Ordering::Relaxed);
            c.accepted.store(0, Ordering::Relaxed);
            c.rejected.store(0, Ordering::Relaxed);
        }
    }

    /// Logs the counters of both query kinds at the `debug` level.
    pub fn log_summary(&self) {
        for kind in [QueryKind::Intersect, QueryKind::Occlusion] {
            let s = self.snapshot(kind);
            log::debug!(
                "{:?}: {} primitives tested, lane utilization {:.2}, {} candidates ({} accepted, {} rejected).",
                kind,
                s.primitives,
                s.lane_utilization(),
                s.candidates(),
                s.accepted,
                s.rejected
            );
        }
    }
}

impl StatsSink for TraversalStats {
    fn primitive_tested(&self, kind: QueryKind, active_rays: u32, packet_width: u32) {
        let c = &self.counters[kind.index()];
        let _ = c.primitives.fetch_add(1, Ordering::Relaxed);
        let _ = c.active_lanes.fetch_add(active_rays as u64, Ordering::Relaxed);
        let _ = c.lane_slots.fetch_add(packet_width as u64, Ordering::Relaxed);
    }

    fn candidate_found(&self, kind: QueryKind, verdict: HitVerdict) {
        let c = &self.counters[kind.index()];
        let counter = match verdict {
            HitVerdict::Accept => &c.accepted,
            HitVerdict::Reject => &c.rejected,
        };
        let _ = counter.fetch_add(1, Ordering::Relaxed);
    }
}
