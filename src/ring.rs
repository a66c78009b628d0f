//! Single-Resolution Round-Robin Ring
//!
//! ## Overview
//!
//! A [`Ring`] is a fixed-capacity circular buffer of equal-width time
//! buckets. Samples are inserted with explicit timestamps; each lands in the
//! bucket covering its instant. When a sample arrives past the active
//! bucket, the ring advances bucket by bucket - evicting the oldest bucket
//! once full - and lets its [`Consolidate`] policy seed every bucket the gap
//! skipped. Logical reads run oldest-first over the occupied span.
//!
//! ## Memory Layout
//!
//! ```text
//! Ring<V, P>
//! ├── bucket array: capacity × size_of::<V>()   (one Box<[V]> allocation)
//! └── header: name, width, span, start, last, policy
//! ```
//!
//! The bucket array is allocated exactly once at construction and freed at
//! drop. Insert and read never allocate.
//!
//! ## Invariants
//!
//! - `start` is always a multiple of `width` (the active bucket's lower edge)
//! - when non-empty, `start <= last < start + width`
//! - the occupied span runs from `head` (oldest) to `tail` (active),
//!   wrapping at `capacity`; its length never exceeds `capacity`
//! - bucket i (oldest first) covers
//!   `[start - width·(len-1-i), start - width·(len-1-i) + width)`
//!
//! ## Example
//!
//! ```rust
//! use rrdb::{Ring, KeepLast};
//!
//! let mut ring = Ring::new("cache-hits", 1_000, 4, KeepLast)?;
//! ring.insert_at(10u64, 0);
//! ring.insert_at(11u64, 1_500);   // next bucket
//! ring.insert_at(12u64, 1_900);   // same bucket, overwrites
//!
//! assert_eq!(ring.len(), 2);
//! assert_eq!(ring.get(0), Some(&10));
//! assert_eq!(ring.get(1), Some(&12));
//! # Ok::<(), rrdb::RrdError>(())
//! ```

use core::fmt;
use core::mem::size_of;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

#[cfg(feature = "std")]
use std::{boxed::Box, vec::Vec};

use crate::{
    errors::{RrdError, RrdResult},
    period::bucket_start,
    policy::Consolidate,
    time::{TimeSource, Timestamp},
};

/// Physical positions of the oldest (`head`) and active (`tail`) buckets.
/// The empty ring has no span at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    head: usize,
    tail: usize,
}

/// Fixed-capacity store of time-bucketed samples at one resolution
///
/// `V` is the per-bucket payload; the ring copies values in and never
/// interprets them. `P` is the [`Consolidate`] policy deciding in-bucket
/// merges and gap fills.
pub struct Ring<V, P> {
    name: &'static str,
    width: Timestamp,
    entries: Box<[V]>,
    span: Option<Span>,
    /// Lower edge of the active bucket; width-aligned.
    start: Timestamp,
    /// Most recent timestamp ever accepted.
    last: Timestamp,
    policy: P,
}

impl<V: Copy + Default, P: Consolidate<V>> Ring<V, P> {
    /// Create an empty ring of `capacity` buckets, each `width` ms wide
    ///
    /// The bucket array is reserved fallibly; this is the only allocation
    /// the ring ever makes.
    pub fn new(name: &'static str, width: Timestamp, capacity: usize, policy: P) -> RrdResult<Self> {
        if width == 0 {
            return Err(RrdError::ZeroWidth);
        }
        if capacity == 0 {
            return Err(RrdError::ZeroCapacity);
        }

        let bytes = capacity.saturating_mul(size_of::<V>());
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|_| RrdError::AllocationFailed { bytes })?;
        entries.resize(capacity, V::default());

        Ok(Self {
            name,
            width,
            entries: entries.into_boxed_slice(),
            span: None,
            start: 0,
            last: 0,
            policy,
        })
    }

    /// Insert a sample taken at time `t`
    ///
    /// Four cases, depending on where `t`'s bucket falls relative to the
    /// active one:
    ///
    /// - empty ring: the sample claims bucket zero directly
    /// - `t` older than the last accepted sample: silently ignored; the
    ///   state machine never regresses
    /// - same bucket: merged by the policy's `update`
    /// - later bucket: the ring advances once per bucket in between, the
    ///   policy's `fill` seeds each one, then the sample is stored raw
    ///
    /// Cost is proportional to the number of buckets skipped; at a steady
    /// ingestion rate that amortizes to O(1) per sample.
    pub fn insert_at(&mut self, value: V, t: Timestamp) {
        let t0 = bucket_start(t, self.width);

        // First sample: claim bucket zero, no policy involved.
        let Some(mut span) = self.span else {
            self.entries[0] = value;
            self.span = Some(Span { head: 0, tail: 0 });
            self.start = t0;
            self.last = t;
            return;
        };

        // Cannot go back in time.
        if t < self.last {
            return;
        }

        // Still inside the active bucket: merge under the policy.
        if t0 == self.start {
            self.last = t;
            let width = self.width;
            self.policy.update(&mut self.entries[span.tail], &value, width);
            return;
        }

        // One or more buckets in the future. Skip forward, seeding each
        // intermediate bucket, then store the sample raw.
        while self.start < t0 {
            self.advance(&mut span);
            let previous = self.entries[self.index_before(span.tail)];
            let width = self.width;
            self.policy.fill(&mut self.entries[span.tail], previous, &value, width);
        }
        self.entries[span.tail] = value;
        self.span = Some(span);
        self.start = t0;
        self.last = t;
    }

    /// Insert a sample stamped with the source's current time
    pub fn insert_now<C: TimeSource>(&mut self, value: V, clock: &C) {
        self.insert_at(value, clock.now());
    }

    /// Move the active bucket one position forward, evicting the oldest
    /// bucket on collision.
    fn advance(&mut self, span: &mut Span) {
        span.tail = (span.tail + 1) % self.entries.len();
        if span.tail == span.head {
            // Tail hit head: the oldest bucket is overwritten.
            span.head = (span.head + 1) % self.entries.len();
        }
        // Realign to the start of the next bucket. The +1 lands strictly
        // inside it, so the step can never be a no-op.
        self.start = bucket_start(self.start + self.width + 1, self.width);
    }

    fn index_before(&self, i: usize) -> usize {
        if i == 0 {
            self.entries.len() - 1
        } else {
            i - 1
        }
    }
}

impl<V, P> Ring<V, P> {
    /// Number of occupied buckets, in `[0, capacity]`
    pub fn len(&self) -> usize {
        match self.span {
            None => 0,
            Some(Span { head, tail }) => {
                if head <= tail {
                    tail - head + 1
                } else {
                    self.entries.len() - head + tail + 1
                }
            }
        }
    }

    /// Whether no sample has ever been accepted
    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    /// Number of buckets the ring can hold
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Bucket width in milliseconds
    pub fn width(&self) -> Timestamp {
        self.width
    }

    /// Informational name given at construction
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Lower edge of the active bucket; meaningful only when non-empty
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Most recent accepted timestamp; meaningful only when non-empty
    pub fn last(&self) -> Timestamp {
        self.last
    }

    /// Borrow the i-th logical bucket, oldest first
    ///
    /// Returns `None` when `i` is outside `[0, len)`.
    pub fn get(&self, i: usize) -> Option<&V> {
        let Span { head, .. } = self.span?;
        if i >= self.len() {
            return None;
        }
        Some(&self.entries[(head + i) % self.entries.len()])
    }

    /// Physical index of the active bucket, if any
    pub fn tail_index(&self) -> Option<usize> {
        self.span.map(|s| s.tail)
    }

    /// Borrow the bucket at physical index `i`, occupied or not
    ///
    /// Unlike [`get`](Self::get) this does not translate through the
    /// occupied span; it exists for policies and diagnostics that reason
    /// about raw positions.
    pub fn bucket(&self, i: usize) -> Option<&V> {
        self.entries.get(i)
    }

    /// Lower edge of the oldest retained bucket
    ///
    /// Together with `start() + width()` this bounds the retained horizon:
    /// the half-open interval the ring can answer queries for.
    pub fn horizon_start(&self) -> Option<Timestamp> {
        let len = self.len() as Timestamp;
        if len == 0 {
            return None;
        }
        Some(self.start - self.width * (len - 1))
    }

    /// Borrow the consolidation policy
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutably borrow the consolidation policy
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

impl<V, P> fmt::Debug for Ring<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("capacity", &self.entries.len())
            .field("head", &self.span.map(|s| s.head))
            .field("tail", &self.span.map(|s| s.tail))
            .field("start", &self.start)
            .field("last", &self.last)
            .field("len", &self.len())
            .finish()
    }
}
