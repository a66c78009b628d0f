//! Period Arithmetic
//!
//! Maps absolute timestamps onto the equal-width bucket grid of a ring.
//! Every insert and every query funnels through [`bucket_start`]; it is the
//! only arithmetic the store performs on time.
//!
//! A timestamp that falls exactly on a grid line belongs to the bucket that
//! *starts* there: the bucket covering `[start, start + width)` is half-open
//! on the right.

use crate::time::Timestamp;

// ===== COMMON BUCKET WIDTHS =====

/// Milliseconds per second.
pub const SECOND_MS: Timestamp = 1000;

/// Milliseconds per minute.
pub const MINUTE_MS: Timestamp = 60 * SECOND_MS;

/// Milliseconds per hour.
pub const HOUR_MS: Timestamp = 60 * MINUTE_MS;

/// Milliseconds per day.
pub const DAY_MS: Timestamp = 24 * HOUR_MS;

/// Milliseconds per 365-day year.
///
/// Retention layering cares about spans, not calendars, so leap days are
/// deliberately ignored.
pub const YEAR_MS: Timestamp = 365 * DAY_MS;

/// Lower edge of the width-`width` bucket containing `t`
///
/// Returns the largest multiple of `width` that does not exceed `t`. Total
/// for every `t` as long as `width > 0`, which ring construction guarantees.
#[inline]
pub fn bucket_start(t: Timestamp, width: Timestamp) -> Timestamp {
    debug_assert!(width > 0, "bucket width must be positive");
    t - t % width
}
