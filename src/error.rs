//! Error types for the week view layout engine.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Rejected input: malformed events or settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event {title:?} ends before it starts")]
    EndBeforeStart { title: String },

    #[error("hour_parts must be at least 1")]
    ZeroHourParts,

    #[error("starting_day_of_week must be in 0..=6, got {0}")]
    StartingDayOutOfRange(u8),

    #[error("invalid {field} format string: {format:?}")]
    InvalidFormat { field: &'static str, format: String },

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// Errors that abort a layout pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A local wall-clock time that maps to no instant, even after skipping
    /// past a DST gap.
    #[error("local time {0} does not exist in the display time zone")]
    TimeZone(NaiveDateTime),

    #[error("date arithmetic overflowed at {0}")]
    OutOfRange(NaiveDateTime),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
