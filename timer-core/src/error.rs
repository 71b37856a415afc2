//! Error types for duration entry

use std::num::ParseIntError;
use thiserror::Error;

/// Malformed duration text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty time")]
    Empty,

    #[error("expected SS, MM:SS, H:MM or H:MM:SS, got {count} fields")]
    FieldCount { count: usize },

    #[error("'{field}' is not a whole number")]
    InvalidField {
        field: String,
        #[source]
        source: ParseIntError,
    },

    #[error("duration is too large")]
    OutOfRange,
}

/// Well-formed duration that cannot arm a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("duration must be positive, got {seconds} seconds")]
    NonPositive { seconds: u64 },
}

/// Anything that can go wrong turning entry text into an armed countdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
