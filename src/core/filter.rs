use chrono::Duration;

use crate::core::range::TimeRange;

pub const DEFAULT_MIN_DURATION_MINUTES: i64 = 30;

/// Keeps ranges lasting at least `min_duration`, in input order.
/// Adjacent ranges are not merged.
pub fn retain_min_duration(ranges: Vec<TimeRange>, min_duration: Duration) -> Vec<TimeRange> {
    ranges
        .into_iter()
        .filter(|r| r.duration() >= min_duration)
        .collect()
}
