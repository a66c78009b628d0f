//! Time Scalar and Clock Abstraction
//!
//! ## Overview
//!
//! The store treats time as a monotone integer and nothing more. This module
//! fixes the unit (milliseconds, `u64`) and provides the [`TimeSource`]
//! boundary through which the `*_now` insert helpers obtain the current
//! instant. Everything else in the crate takes explicit timestamps, so the
//! clock stays a caller concern.
//!
//! ## Timestamp Format
//!
//! Milliseconds since an arbitrary epoch (Unix epoch for wall clocks, boot
//! for monotonic timers):
//! - Sufficient precision for bucket widths from one second to decades
//! - No overflow for 584 million years in a `u64`
//! - Every practical bucket width is exactly representable
//!
//! ## Choosing a Source
//!
//! A ring rejects any sample older than the last one it accepted, so a
//! source that can jump backwards (NTP-disciplined wall clock) will have
//! those regressed samples silently dropped rather than corrupting history.
//! Prefer a monotonic source when the application only ever queries relative
//! to "now"; use a wall clock when instants must correlate with external
//! records.

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the `*_now` insert helpers
///
/// Implementations might read hardware timers, RTC modules, or system calls
/// depending on the platform. The store only requires that consecutive calls
/// are non-decreasing often enough to be useful; regressions are tolerated
/// (the affected inserts become no-ops) but waste samples.
pub trait TimeSource: Send {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    ///
    /// The minimum time difference this source can resolve. A source coarser
    /// than the finest ring width will alias samples into fewer buckets.
    fn precision_ms(&self) -> u32;
}

/// Monotonic time source backed by a hardware or OS monotonic counter
///
/// Starts at zero when created and never goes backwards, which makes it the
/// safest feed for a store that drops regressed samples.
///
/// On bare metal this would read a timer peripheral; the `std` build uses
/// `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    #[cfg(feature = "std")]
    start_instant: std::time::Instant,
}

impl MonotonicTime {
    /// Create a source whose epoch is the moment of creation
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "std")]
            start_instant: std::time::Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        #[cfg(feature = "std")]
        {
            self.start_instant.elapsed().as_millis() as Timestamp
        }

        #[cfg(not(feature = "std"))]
        {
            // In no_std this would read from a hardware timer; there is no
            // portable default.
            0
        }
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Wall clock time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
///
/// Set or advance it by hand to drive a ring through its bucket transitions
/// deterministically.
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a source pinned at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Pin the source to a new instant
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the source forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}
