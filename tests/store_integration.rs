//! End-to-End Scenarios for the Round-Robin Store
//!
//! These tests drive whole rings and stacks through realistic ingestion
//! runs and check the consolidated history they retain.
//!
//! ## Test Scope
//!
//! - Running-mean consolidation across gaps and evictions on one ring
//! - Finest-first query resolution across a four-ring stack
//! - Transaction-group tracking: envelope consolidation with carry-forward
//!   smearing over a decade of samples

use rrdb::period::{DAY_MS, HOUR_MS, MINUTE_MS, SECOND_MS, YEAR_MS};
use rrdb::{Envelope, Extent, Ring, RingSpec, RingStack, RunningMean, Timestamp};

// ===== SHARED CONSTANTS =====

/// 2024-01-01T00:00:00Z, the base instant for wall-clock scenarios.
const JAN_1_2024: Timestamp = 1_704_067_200 * SECOND_MS;

/// Tolerance for f32 comparisons after chained arithmetic.
const EPS: f32 = 1e-3;

fn hms(h: Timestamp, m: Timestamp, s: Timestamp) -> Timestamp {
    JAN_1_2024 + h * HOUR_MS + m * MINUTE_MS + s * SECOND_MS
}

/// Thirteen samples over five minutes, consolidated into 30-second buckets
/// by a capacity-ten running-mean ring.
///
/// Exercises every insert path: first sample, in-bucket merges, single- and
/// multi-bucket gaps (smeared forward), and one eviction.
#[test]
fn test_running_mean_consolidation() {
    let mut ring = Ring::new("complex", 30 * SECOND_MS, 10, RunningMean).unwrap();

    let samples: [(Timestamp, f32); 13] = [
        (hms(8, 10, 1), 5.0),
        (hms(8, 10, 30), 5.0),
        (hms(8, 10, 45), 5.0),
        (hms(8, 11, 0), 5.0),
        (hms(8, 11, 15), 10.0),
        (hms(8, 11, 35), 15.0),
        (hms(8, 11, 40), 8.0),
        (hms(8, 11, 42), 305.0),
        (hms(8, 12, 4), 10.0),
        (hms(8, 13, 34), 20.0),
        (hms(8, 14, 5), 30.0),
        (hms(8, 14, 35), 30.0),
        (hms(8, 15, 20), 20.0),
    ];
    for (t, v) in samples {
        ring.insert_at(v, t);
    }

    // Eleven buckets were opened; capacity ten evicted the first.
    assert_eq!(ring.len(), 10);

    let expected: [f32; 10] = [
        5.0,          // 08:10:30  two equal samples, mean is a fixed point
        5.166_666_9,  // 08:11:00  5.0 nudged toward 10.0 by 1/30
        24.441_113,   // 08:11:30  three merges, one of them an outlier
        10.0,         // 08:12:00
        20.0,         // 08:12:30  no samples: smeared from the 13:34 sample
        20.0,         // 08:13:00  likewise
        20.0,         // 08:13:30
        30.0,         // 08:14:00
        30.0,         // 08:14:30
        20.0,         // 08:15:00
    ];
    for (i, want) in expected.iter().enumerate() {
        let got = *ring.get(i).unwrap();
        assert!(
            (got - want).abs() < EPS,
            "bucket {i}: got {got}, want {want}"
        );
    }
}

/// Four rings spanning 1 s to 1000 s widths, one hundred buckets each, fed
/// one sample per second for 150 000 seconds. Probes walk each ring's
/// horizon edge and confirm the finest covering ring always answers.
#[test]
fn test_multi_ring_horizon_walk() {
    const LIMIT: Timestamp = 150_000;

    let specs = [
        RingSpec { capacity: 100, width: 1000 * SECOND_MS },
        RingSpec { capacity: 100, width: 100 * SECOND_MS },
        RingSpec { capacity: 100, width: 10 * SECOND_MS },
        RingSpec { capacity: 100, width: SECOND_MS },
    ];
    let mut stack = RingStack::new("horizon", &specs, RunningMean).unwrap();

    for i in 0..LIMIT {
        stack.add_at(5.0f32, i * SECOND_MS);
    }

    // (probe in seconds, expected answering width in seconds, hit expected)
    let probes: [(Timestamp, Timestamp, bool); 10] = [
        (150_001, 0, false), // the future
        (149_999, 1, true),  // newest instant, finest ring
        (149_900, 1, true),  // oldest second-resolution bucket
        (149_899, 10, true), // just off the finest ring
        (149_000, 10, true),
        (148_999, 100, true),
        (140_000, 100, true),
        (139_999, 1000, true),
        (50_000, 1000, true), // oldest bucket retained anywhere
        (49_999, 0, false),   // predates the coarsest horizon
    ];

    for (sec, want_width, want_hit) in probes {
        match stack.query(sec * SECOND_MS) {
            Some(hit) => {
                assert!(want_hit, "probe at {sec}s should have missed");
                assert_eq!(
                    hit.width,
                    want_width * SECOND_MS,
                    "probe at {sec}s answered at the wrong resolution"
                );
                // A constant feed consolidates to itself at every width.
                assert!((hit.value - 5.0).abs() < EPS);
            }
            None => assert!(!want_hit, "probe at {sec}s should have hit"),
        }
    }
}

/// Transaction-group layering: a day of minutes, a year of days, a decade
/// of years. Sequence numbers only ever grow; buckets hold the extent of
/// numbers live in their interval and gaps carry the previous extent
/// forward.
#[test]
fn test_txg_envelope_smearing() {
    let specs = [
        RingSpec { capacity: 10, width: YEAR_MS },
        RingSpec { capacity: 365, width: DAY_MS },
        RingSpec { capacity: 1440, width: MINUTE_MS },
    ];

    // Sixty per-second txgs inside one minute: the minute bucket's low end
    // is the earliest txg of that minute.
    let mut stack = RingStack::new("txg", &specs, Envelope).unwrap();
    for i in 0..60u64 {
        stack.add_at(Extent::point(i + 1), i * SECOND_MS);
    }
    let hit = stack.query(30 * SECOND_MS).unwrap();
    assert_eq!(hit.width, MINUTE_MS);
    assert_eq!(*hit.value, Extent { low: 1, high: 60 });

    // Eleven years of hourly txgs. The minute ring advances through every
    // minute of the gap, carrying extents forward.
    let mut stack = RingStack::new("txg-decade", &specs, Envelope).unwrap();
    const HOURS: u64 = 11 * 365 * 24;
    for h in 0..HOURS {
        stack.add_at(Extent::point(h + 1), h * HOUR_MS);
    }
    let newest = (HOURS - 1) * HOUR_MS;

    // Thirty seconds back: still minute resolution. No sample fell in that
    // minute, so it carries the previous hour's txg.
    let hit = stack.query(newest - 30 * SECOND_MS).unwrap();
    assert_eq!(hit.width, MINUTE_MS);
    assert_eq!(*hit.value, Extent::point(HOURS - 1));

    // Two days back: off the minute ring, onto the day ring. That day saw
    // txgs for each of its 24 hours.
    let hit = stack.query(newest - 2 * DAY_MS).unwrap();
    assert_eq!(hit.width, DAY_MS);
    let day = (newest - 2 * DAY_MS) / DAY_MS;
    assert_eq!(*hit.value, Extent { low: day * 24 + 1, high: day * 24 + 24 });

    // Two years back: only the year ring still remembers.
    let hit = stack.query(newest - 2 * YEAR_MS).unwrap();
    assert_eq!(hit.width, YEAR_MS);

    // Eleven years back is past even the year ring's horizon.
    assert!(stack.query(0).is_none());

    // The oldest year bucket's lower edge is the exact horizon boundary.
    assert!(stack.query(YEAR_MS).is_some());
    assert!(stack.query(YEAR_MS - 1).is_none());
}
