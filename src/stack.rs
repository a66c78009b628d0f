//! Multi-Resolution Ring Stack
//!
//! ## Overview
//!
//! One ring trades retention span against resolution: sixty one-second
//! buckets remember exactly one minute. A [`RingStack`] layers rings of
//! increasing bucket width and writes every sample to all of them, so the
//! recent past is retained finely and the distant past coarsely - at a
//! fixed, small memory cost.
//!
//! ```text
//! add_at(v, t) ──┬──▶ ring 0   width 1 s    retains ~minutes
//!                ├──▶ ring 1   width 1 min  retains ~a day
//!                └──▶ ring 2   width 1 day  retains ~a year
//!
//! query(t)  ─────▶ walk finest → coarsest, first ring whose horizon
//!                  covers t answers
//! ```
//!
//! Because the walk is finest-first, a hit is always the *tightest* retained
//! bucket for the requested instant, and the coarse rings only back-stop
//! queries that predate the finer horizons.

use heapless::Vec;

use crate::{
    errors::{RrdError, RrdResult},
    period::bucket_start,
    policy::Consolidate,
    ring::Ring,
    time::{TimeSource, Timestamp},
};

/// Fixed upper bound on rings per stack
///
/// Eight octaves of resolution span sub-second to multi-decade retention;
/// the bound keeps the stack itself allocation-free.
pub const MAX_RINGS: usize = 8;

/// Shape of one ring in a stack: bucket count and bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpec {
    /// Number of buckets.
    pub capacity: usize,
    /// Bucket width in milliseconds.
    pub width: Timestamp,
}

/// A successful point-in-time query
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a, V> {
    /// Consolidated payload of the covering bucket.
    pub value: &'a V,
    /// Bucket width of the ring that answered; the answer's resolution.
    pub width: Timestamp,
}

/// Ordered set of rings of increasing width, fed and queried as one store
///
/// All rings share the payload type and the consolidation policy; each ring
/// owns its own clone of the policy.
#[derive(Debug)]
pub struct RingStack<V, P> {
    name: &'static str,
    /// Finest resolution first; this is the query walk order.
    rings: Vec<Ring<V, P>, MAX_RINGS>,
}

impl<V: Copy + Default, P: Consolidate<V> + Clone> RingStack<V, P> {
    /// Build a stack from specs listed **coarsest first**
    ///
    /// The specs must strictly decrease in width; the stack reverses them so
    /// its internal order is finest-first. Construction of any ring can fail
    /// (zero shape or allocation); rings already built are dropped on the
    /// way out.
    pub fn new(name: &'static str, specs: &[RingSpec], policy: P) -> RrdResult<Self> {
        if specs.is_empty() {
            return Err(RrdError::EmptySpec);
        }
        if !specs.windows(2).all(|pair| pair[0].width > pair[1].width) {
            return Err(RrdError::UnorderedWidths);
        }

        let mut rings = Vec::new();
        for spec in specs.iter().rev() {
            let ring = Ring::new(name, spec.width, spec.capacity, policy.clone())?;
            rings
                .push(ring)
                .map_err(|_| RrdError::TooManyRings { max: MAX_RINGS })?;
        }

        Ok(Self { name, rings })
    }

    /// Record one sample in every ring
    ///
    /// The fan-out completes before this returns; no later operation can
    /// observe a partially applied sample. Rings individually ignore the
    /// sample if it is older than their last accepted one.
    pub fn add_at(&mut self, value: V, t: Timestamp) {
        for ring in self.rings.iter_mut() {
            ring.insert_at(value, t);
        }
    }

    /// Record one sample stamped with the source's current time
    pub fn add_now<C: TimeSource>(&mut self, value: V, clock: &C) {
        self.add_at(value, clock.now());
    }
}

impl<V, P> RingStack<V, P> {
    /// Look up the consolidated payload covering instant `t`
    ///
    /// Walks the rings finest to coarsest and answers from the first whose
    /// retained horizon covers `t`, so the result is the most precise bucket
    /// still held anywhere in the stack. Returns `None` for instants past
    /// the newest accepted sample and for instants older than the coarsest
    /// horizon.
    pub fn query(&self, t: Timestamp) -> Option<Hit<'_, V>> {
        let finest = self.rings.first()?;

        // The future has no history yet. Samples fan out to every ring, so
        // checking emptiness on the finest ring covers them all.
        if t > finest.last() || finest.is_empty() {
            return None;
        }

        for ring in self.rings.iter() {
            let t0 = bucket_start(t, ring.width());
            if let Some(horizon) = ring.horizon_start() {
                if t0 >= horizon {
                    let i = ((t0 - horizon) / ring.width()) as usize;
                    return ring.get(i).map(|value| Hit {
                        value,
                        width: ring.width(),
                    });
                }
            }
        }

        // Older than anything retained, even coarsely.
        None
    }

    /// Informational name given at construction
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member rings, finest resolution first
    pub fn rings(&self) -> &[Ring<V, P>] {
        &self.rings
    }

    /// Number of member rings
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{MINUTE_MS, SECOND_MS};
    use crate::policy::KeepLast;
    use crate::time::FixedTime;

    fn minute_second_stack() -> RingStack<u32, KeepLast> {
        let specs = [
            RingSpec { capacity: 10, width: MINUTE_MS },
            RingSpec { capacity: 10, width: SECOND_MS },
        ];
        RingStack::new("pair", &specs, KeepLast).unwrap()
    }

    #[test]
    fn construction_is_validated() {
        let err = RingStack::<u32, KeepLast>::new("none", &[], KeepLast).unwrap_err();
        assert_eq!(err, RrdError::EmptySpec);

        let unordered = [
            RingSpec { capacity: 10, width: SECOND_MS },
            RingSpec { capacity: 10, width: MINUTE_MS },
        ];
        let err = RingStack::<u32, KeepLast>::new("bad", &unordered, KeepLast).unwrap_err();
        assert_eq!(err, RrdError::UnorderedWidths);

        let equal = [
            RingSpec { capacity: 10, width: SECOND_MS },
            RingSpec { capacity: 10, width: SECOND_MS },
        ];
        let err = RingStack::<u32, KeepLast>::new("dup", &equal, KeepLast).unwrap_err();
        assert_eq!(err, RrdError::UnorderedWidths);

        let mut many = [RingSpec { capacity: 1, width: 0 }; MAX_RINGS + 1];
        for (i, spec) in many.iter_mut().enumerate() {
            spec.width = 1 << (MAX_RINGS + 1 - i);
        }
        let err = RingStack::<u32, KeepLast>::new("many", &many, KeepLast).unwrap_err();
        assert_eq!(err, RrdError::TooManyRings { max: MAX_RINGS });

        // A failing member ring unwinds the whole construction.
        let zero_cap = [
            RingSpec { capacity: 10, width: MINUTE_MS },
            RingSpec { capacity: 0, width: SECOND_MS },
        ];
        let err = RingStack::<u32, KeepLast>::new("broken", &zero_cap, KeepLast).unwrap_err();
        assert_eq!(err, RrdError::ZeroCapacity);
    }

    #[test]
    fn rings_are_held_finest_first() {
        let stack = minute_second_stack();
        assert_eq!(stack.ring_count(), 2);
        assert_eq!(stack.rings()[0].width(), SECOND_MS);
        assert_eq!(stack.rings()[1].width(), MINUTE_MS);
    }

    #[test]
    fn fan_out_reaches_every_ring() {
        let mut stack = minute_second_stack();
        stack.add_at(1, 5_500);

        for ring in stack.rings() {
            assert_eq!(ring.last(), 5_500);
            assert_eq!(ring.len(), 1);
        }

        // A backdated sample is ignored by every ring alike.
        stack.add_at(9, 5_499);
        for ring in stack.rings() {
            assert_eq!(ring.last(), 5_500);
            assert_eq!(*ring.get(0).unwrap(), 1);
        }
    }

    #[test]
    fn query_prefers_the_finest_covering_ring() {
        let mut stack = minute_second_stack();
        // 30 one-second samples: the second ring retains the last ten.
        for i in 0..30u32 {
            stack.add_at(i, i as Timestamp * SECOND_MS);
        }

        // Recent instant: answered at one-second resolution.
        let hit = stack.query(29 * SECOND_MS).unwrap();
        assert_eq!(hit.width, SECOND_MS);
        assert_eq!(*hit.value, 29);

        // Off the fine ring's horizon but inside the minute ring's.
        let hit = stack.query(5 * SECOND_MS).unwrap();
        assert_eq!(hit.width, MINUTE_MS);
    }

    #[test]
    fn future_and_prehistory_miss() {
        let mut stack = minute_second_stack();
        assert!(stack.query(0).is_none()); // empty

        for i in 600..630u32 {
            stack.add_at(i, i as Timestamp * SECOND_MS);
        }

        // Strictly after the newest sample.
        assert!(stack.query(629 * SECOND_MS + 1).is_none());
        // Before the coarsest horizon (minute ring holds ten minutes).
        assert!(stack.query(0).is_none());
        // The newest instant itself answers.
        assert!(stack.query(629 * SECOND_MS).is_some());
    }

    #[test]
    fn add_now_fans_out_with_one_clock_read() {
        let clock = FixedTime::new(90_000);
        let mut stack = minute_second_stack();
        stack.add_now(3, &clock);

        for ring in stack.rings() {
            assert_eq!(ring.last(), 90_000);
        }
    }
}
