//! rrdb - Fixed-Memory Round-Robin Time-Series Storage
//!
//! ## Overview
//!
//! rrdb keeps a bounded history of timestamped samples inside a fixed memory
//! footprint. Samples land in equal-width time buckets held in a circular
//! buffer (a "ring"); several rings of increasing bucket width can be layered
//! into a stack that answers point-in-time queries at the finest resolution
//! still retained for the requested instant.
//!
//! The motivating deployment is inside a storage kernel: mapping a wall-clock
//! instant back to the copy-on-write filesystem transaction group that was
//! open at that time. The same shape fits any "what was the value around time
//! t" problem where memory is fixed and ingestion must never allocate.
//!
//! ## Architecture & Design Philosophy
//!
//! ### 1. One Layout, Both Access Paths
//! A single circular buffer per ring serves ingestion (amortized O(1) per
//! sample) and historical lookup (O(1) per ring). There is no index, no
//! compaction, no background work.
//!
//! ### 2. Opaque Payloads, Pluggable Aggregation
//! The store copies fixed-size values in and hands references out; it never
//! interprets them. How a sample merges into a bucket that already holds
//! data, and what a bucket skipped over by a time gap should contain, are
//! both decided by a [`Consolidate`] policy supplied at construction. The
//! policy is a type parameter, so the hot path is monomorphized with no
//! dynamic dispatch.
//!
//! ### 3. Retention by Layering
//! A [`RingStack`] writes every sample to all of its rings. A one-second
//! ring forgets quickly; a one-day ring behind it remembers for a year.
//! Queries walk finest-first, so the answer is always the tightest bucket
//! that still covers the instant.
//!
//! ## Memory Model
//!
//! Each ring performs exactly one allocation at creation (its bucket array)
//! and one deallocation when dropped. Insert and query never allocate. A
//! stack of six rings with 8-byte payloads and a few hundred buckets each
//! retains a decade of history in well under 10 KB.
//!
//! ## Usage Example
//!
//! ```rust
//! use rrdb::{RingSpec, RingStack, RunningMean};
//! use rrdb::period::{MINUTE_MS, SECOND_MS};
//!
//! // Coarsest ring first: a minute of per-second detail backed by an hour
//! // of per-minute averages.
//! let specs = [
//!     RingSpec { capacity: 60, width: MINUTE_MS },
//!     RingSpec { capacity: 60, width: SECOND_MS },
//! ];
//! let mut stack = RingStack::new("load", &specs, RunningMean)?;
//!
//! stack.add_at(0.42, 1_000);
//! stack.add_at(0.58, 2_000);
//!
//! let hit = stack.query(1_500).expect("instant is retained");
//! assert_eq!(hit.width, SECOND_MS);
//! assert_eq!(*hit.value, 0.42);
//! # Ok::<(), rrdb::RrdError>(())
//! ```
//!
//! ## Concurrency
//!
//! All operations are short, synchronous, and lock-free by omission: a ring
//! or stack must be externally serialized. Wrap it in whatever mutual
//! exclusion the host environment uses; the store itself takes no locks and
//! has no suspension points.
//!
//! ## Feature Flags
//!
//! - `std` (default): enables the wall-clock and monotonic time sources
//! - `defmt`: defmt::Format impls for error types on embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod errors;
pub mod period;
pub mod policy;
pub mod ring;
pub mod stack;
pub mod time;

// Public API
pub use errors::{RrdError, RrdResult};
pub use policy::{Consolidate, Envelope, Extent, KeepFirst, KeepLast, RunningMean};
pub use ring::Ring;
pub use stack::{Hit, RingSpec, RingStack, MAX_RINGS};
pub use time::{TimeSource, Timestamp};

/// Library version
///
/// Useful for runtime version checks and telemetry
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
