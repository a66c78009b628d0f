//! Error types for store construction
//!
//! Keep errors small - they only surface from constructors. Once a ring or
//! stack exists, every operation on it is total: backdated inserts and
//! out-of-horizon queries are ordinary outcomes, not errors.

use thiserror_no_std::Error;

/// Result type for construction operations
pub type RrdResult<T> = Result<T, RrdError>;

/// Construction errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrdError {
    /// Bucket width of zero cannot partition time
    #[error("bucket width must be greater than zero")]
    ZeroWidth,

    /// A ring needs at least one bucket
    #[error("ring capacity must be at least one bucket")]
    ZeroCapacity,

    /// The bucket array could not be reserved
    #[error("allocation of {bytes} bytes failed")]
    AllocationFailed {
        /// Size of the reservation that failed
        bytes: usize,
    },

    /// A stack needs at least one ring
    #[error("stack spec list is empty")]
    EmptySpec,

    /// Specs must run coarsest to finest so the query walk is finest-first
    #[error("stack spec widths must strictly decrease")]
    UnorderedWidths,

    /// The per-stack ring bound was exceeded
    #[error("a stack holds at most {max} rings")]
    TooManyRings {
        /// The fixed upper bound
        max: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for RrdError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ZeroWidth =>
                defmt::write!(fmt, "bucket width must be > 0"),
            Self::ZeroCapacity =>
                defmt::write!(fmt, "ring capacity must be >= 1"),
            Self::AllocationFailed { bytes } =>
                defmt::write!(fmt, "allocation of {} bytes failed", bytes),
            Self::EmptySpec =>
                defmt::write!(fmt, "stack spec list is empty"),
            Self::UnorderedWidths =>
                defmt::write!(fmt, "spec widths must strictly decrease"),
            Self::TooManyRings { max } =>
                defmt::write!(fmt, "a stack holds at most {} rings", max),
        }
    }
}
