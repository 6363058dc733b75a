use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::core::error::FreeTimeError;

/// Resolves `hour:00` on `date` in `tz` to an absolute instant.
pub fn local_hour_to_utc<Z: TimeZone>(
    tz: &Z,
    date: NaiveDate,
    hour: u32,
) -> Result<DateTime<Utc>, FreeTimeError> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .ok_or(FreeTimeError::InvalidWorkdayHours {
            start: hour,
            end: hour,
        })?;

    local_to_utc(tz, naive)
}

/// Resolves a wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous wall-clock times take the earliest instant; times inside a DST gap
/// move forward to the first instant after it.
pub fn local_to_utc<Z: TimeZone>(
    tz: &Z,
    naive: NaiveDateTime,
) -> Result<DateTime<Utc>, FreeTimeError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // gaps are at most an hour in every tz database zone we care about
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or(FreeTimeError::NonexistentLocalTime(naive))
        }
    }
}
