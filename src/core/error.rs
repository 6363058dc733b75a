use chrono::NaiveDateTime;

use crate::core::range::RangeError;

#[derive(Debug, thiserror::Error)]
pub enum FreeTimeError {
    #[error("Unable to parse event time '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Event '{label}' ends before it starts: {source}")]
    InvalidEventInterval {
        label: String,
        #[source]
        source: RangeError,
    },

    #[error("Local time {0} does not exist in the configured time zone")]
    NonexistentLocalTime(NaiveDateTime),

    #[error("Invalid time zone string '{0}'")]
    InvalidTimeZone(String),

    #[error("Invalid workday hours: start {start}:00 must be before end {end}:00 (end at most 23)")]
    InvalidWorkdayHours { start: u32, end: u32 },

    #[error("Lookahead must cover at least one day, got {0}")]
    InvalidLookaheadDays(u32),

    #[error("Minimum slot duration must not be negative, got {0} minutes")]
    NegativeMinDuration(i64),

    #[error("OAuth token is not set; run the authorization flow first.")]
    TokenNotSet,
}
