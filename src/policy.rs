//! Bucket Consolidation Policies
//!
//! ## Overview
//!
//! The store copies opaque values into buckets and hands references back out;
//! it never looks inside them. Two situations need a decision it cannot make
//! on its own:
//!
//! 1. A sample lands in the bucket that is already active. Something must
//!    merge the new sample with what the bucket holds - average it in, widen
//!    an envelope, keep the first value, overwrite with the last.
//! 2. Time skipped one or more whole buckets between samples. Each bucket
//!    crossed by the gap must be given *some* value - the incoming sample
//!    smeared forward, the previous bucket carried forward, or a constant.
//!
//! Both decisions belong to the [`Consolidate`] policy a ring is built with.
//! The policy is a type parameter on [`Ring`](crate::ring::Ring), so the
//! calls are statically dispatched, and it is owned by the ring, so any state
//! the policy carries travels with the ring that uses it.
//!
//! ## Stock Policies
//!
//! | Policy | Payload | In-bucket merge | Gap fill |
//! |--------|---------|-----------------|----------|
//! | [`KeepFirst`] | any | keep existing | incoming |
//! | [`KeepLast`] | any | overwrite | incoming |
//! | [`RunningMean`] | `f32` | exponential mean | incoming |
//! | [`Envelope`] | [`Extent`] | widen min/max | carry previous forward |
//!
//! `Envelope` over `Extent` is the transaction-group shape: a bucket answers
//! "what sequence numbers were live during this interval", gaps inherit the
//! previous interval's value because a monotone counter did not change while
//! nothing was recorded, and averaging would be meaningless.

use crate::period::SECOND_MS;
use crate::time::Timestamp;

/// How samples merge into the buckets of one ring
///
/// Implementations may carry state; both methods take `&mut self` and the
/// instance lives inside the ring it serves.
pub trait Consolidate<V> {
    /// Merge a sample into the active bucket.
    ///
    /// Called when the sample's timestamp maps to the bucket already at the
    /// ring's tail. `active` is that bucket's current content; `width` is
    /// the ring's bucket width in milliseconds.
    fn update(&mut self, active: &mut V, incoming: &V, width: Timestamp);

    /// Seed a bucket the ring advanced over while crossing a gap.
    ///
    /// Called once per skipped bucket, oldest first. `bucket` is the freshly
    /// advanced bucket and holds stale data on entry; this method must give
    /// it a value. `previous` is a copy of the bucket one position behind it
    /// (for a ring of capacity one that is the value the bucket itself held
    /// before the advance, so carry-forward behaves the same there).
    fn fill(&mut self, bucket: &mut V, previous: V, incoming: &V, width: Timestamp);
}

/// Keep the first sample seen in each bucket; smear the incoming sample
/// across gaps
///
/// The merge is a no-op, which makes repeated inserts of the same sample
/// idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepFirst;

impl<V: Copy> Consolidate<V> for KeepFirst {
    fn update(&mut self, _active: &mut V, _incoming: &V, _width: Timestamp) {}

    fn fill(&mut self, bucket: &mut V, _previous: V, incoming: &V, _width: Timestamp) {
        *bucket = *incoming;
    }
}

/// Keep the most recent sample in each bucket; smear the incoming sample
/// across gaps
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLast;

impl<V: Copy> Consolidate<V> for KeepLast {
    fn update(&mut self, active: &mut V, incoming: &V, _width: Timestamp) {
        *active = *incoming;
    }

    fn fill(&mut self, bucket: &mut V, _previous: V, incoming: &V, _width: Timestamp) {
        *bucket = *incoming;
    }
}

/// Exponentially weighted running mean over `f32` samples
///
/// Weights by the bucket width in seconds: a sample entering a 30-second
/// bucket shifts the mean by 1/30th of its distance from it. Buckets skipped
/// by a gap take the incoming sample as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningMean;

impl Consolidate<f32> for RunningMean {
    fn update(&mut self, active: &mut f32, incoming: &f32, width: Timestamp) {
        let n = width as f32 / SECOND_MS as f32;
        let mut v = *active;
        v -= v / n;
        v += *incoming / n;
        *active = v;
    }

    fn fill(&mut self, bucket: &mut f32, _previous: f32, incoming: &f32, _width: Timestamp) {
        *bucket = *incoming;
    }
}

/// Closed range of `u64` sequence numbers observed in one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    /// Smallest value observed.
    pub low: u64,
    /// Largest value observed.
    pub high: u64,
}

impl Extent {
    /// A degenerate range holding a single value
    pub const fn point(v: u64) -> Self {
        Self { low: v, high: v }
    }
}

/// Min/max envelope over [`Extent`] payloads with carry-forward gap fill
///
/// Merging widens the active bucket to cover the incoming range. Buckets
/// skipped by a gap inherit the previous bucket's extent: for a monotone
/// sequence (transaction groups), an interval with no samples still had the
/// previous sequence number live, and erring toward the *earlier* value is
/// what historical queries want.
#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope;

impl Consolidate<Extent> for Envelope {
    fn update(&mut self, active: &mut Extent, incoming: &Extent, _width: Timestamp) {
        active.low = active.low.min(incoming.low);
        active.high = active.high.max(incoming.high);
    }

    fn fill(&mut self, bucket: &mut Extent, previous: Extent, _incoming: &Extent, _width: Timestamp) {
        *bucket = previous;
    }
}
