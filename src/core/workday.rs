use chrono::{DateTime, Datelike, Days, TimeZone, Utc, Weekday};

use crate::core::error::FreeTimeError;
use crate::core::range::TimeRange;
use crate::shared::utils::date::local_hour_to_utc;

/// Local wall-clock hours bounding a workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayHours {
    start_hour: u32,
    end_hour: u32,
}

impl WorkdayHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, FreeTimeError> {
        if start_hour >= end_hour || end_hour > 23 {
            return Err(FreeTimeError::InvalidWorkdayHours {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }
}

impl Default for WorkdayHours {
    fn default() -> Self {
        Self {
            start_hour: 10,
            end_hour: 18,
        }
    }
}

/// Returns the workday window for the next applicable weekday at or after
/// `reference`. A reference at or after the end hour rolls over to the next
/// day; Saturday and Sunday move forward to Monday.
pub fn next_work_day<Z: TimeZone>(
    reference: DateTime<Utc>,
    hours: WorkdayHours,
    tz: &Z,
) -> Result<TimeRange, FreeTimeError> {
    let today = reference.with_timezone(tz).date_naive();
    let end_of_today = local_hour_to_utc(tz, today, hours.end_hour)?;

    let mut day = if reference >= end_of_today {
        today + Days::new(1)
    } else {
        today
    };

    day = match day.weekday() {
        Weekday::Sat => day + Days::new(2),
        Weekday::Sun => day + Days::new(1),
        _ => day,
    };

    let start = local_hour_to_utc(tz, day, hours.start_hour)?;
    let end = local_hour_to_utc(tz, day, hours.end_hour)?;

    TimeRange::new(start, end).map_err(|_| FreeTimeError::InvalidWorkdayHours {
        start: hours.start_hour,
        end: hours.end_hour,
    })
}
