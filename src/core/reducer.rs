use chrono::{DateTime, Days, TimeZone, Utc};
use tracing::debug;

use crate::core::busy::{BusyEvent, EventSource};
use crate::core::error::FreeTimeError;
use crate::core::range::TimeRange;
use crate::core::workday::{next_work_day, WorkdayHours};
use crate::shared::utils::date::local_to_utc;

/// The workday windows for `lookahead_days` consecutive reference days
/// starting at `now`. Windows are not de-duplicated.
pub fn workday_windows<Z: TimeZone>(
    now: DateTime<Utc>,
    lookahead_days: u32,
    hours: WorkdayHours,
    tz: &Z,
) -> Result<Vec<TimeRange>, FreeTimeError> {
    let local_now = now.with_timezone(tz).naive_local();

    (0..lookahead_days)
        .map(|i| {
            // same wall-clock time i days later; DST gaps and overlaps resolve
            // like workday hours do
            let reference = local_to_utc(tz, local_now + Days::new(u64::from(i)))?;
            next_work_day(reference, hours, tz)
        })
        .collect()
}

/// Removes every concrete busy event from `free`. Each event replaces the whole
/// list by splitting every range against it; all-day events are skipped.
pub fn subtract_busy_events(
    free: Vec<TimeRange>,
    events: &[BusyEvent],
) -> Result<Vec<TimeRange>, FreeTimeError> {
    events.iter().try_fold(free, |ranges, event| {
        let Some(busy) = event.interval()? else {
            return Ok(ranges);
        };

        if ranges.iter().any(|r| r.overlaps(&busy)) {
            debug!(event = %event.label, start = %busy.start(), end = %busy.end(), "blocked by");
        }

        Ok(ranges
            .into_iter()
            .flat_map(|r| r.split(busy.start(), busy.end()))
            .collect())
    })
}

/// Free ranges over the next `lookahead_days` workdays: each window clipped to
/// `now`, minus every busy event from `calendar_ids`.
///
/// Any fetch or parse failure aborts the whole computation.
pub async fn compute_free_ranges<S, Z>(
    source: &S,
    lookahead_days: u32,
    now: DateTime<Utc>,
    calendar_ids: &[String],
    hours: WorkdayHours,
    tz: &Z,
) -> anyhow::Result<Vec<TimeRange>>
where
    S: EventSource + ?Sized,
    Z: TimeZone,
{
    let windows = workday_windows(now, lookahead_days, hours, tz)?;

    let mut free = Vec::with_capacity(windows.len());
    let mut busy_events = Vec::new();
    for window in &windows {
        debug!(start = %window.start(), end = %window.end(), "workday window");
        free.push(window.after(now));

        for calendar_id in calendar_ids {
            let mut events = source.fetch_events(calendar_id, window).await?;
            busy_events.append(&mut events);
        }
    }

    Ok(subtract_busy_events(free, &busy_events)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::busy::MockEventSource;
    use chrono::FixedOffset;
    use mockall::predicate::eq;

    fn cst() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    // March 2025: the 14th is a Friday, the 17th a Monday
    fn local(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        cst()
            .with_ymd_and_hms(2025, 3, d, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn range(d: u32, start: (u32, u32), end: (u32, u32)) -> TimeRange {
        TimeRange::new(local(d, start.0, start.1), local(d, end.0, end.1)).unwrap()
    }

    fn busy(label: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> BusyEvent {
        BusyEvent {
            label: label.to_string(),
            start: start.with_timezone(&cst()).to_rfc3339(),
            end: end.with_timezone(&cst()).to_rfc3339(),
        }
    }

    fn all_day(label: &str) -> BusyEvent {
        BusyEvent {
            label: label.to_string(),
            start: String::new(),
            end: String::new(),
        }
    }

    #[test]
    fn test_single_event_splits_workday() -> anyhow::Result<()> {
        let free = vec![range(17, (10, 0), (18, 0))];
        let events = vec![busy("Lunch", local(17, 12, 0), local(17, 13, 0))];

        let result = subtract_busy_events(free, &events)?;

        assert_eq!(
            result,
            vec![range(17, (10, 0), (12, 0)), range(17, (13, 0), (18, 0))]
        );

        Ok(())
    }

    #[test]
    fn test_event_covering_workday_consumes_it() -> anyhow::Result<()> {
        let free = vec![range(17, (10, 0), (18, 0))];
        let events = vec![busy("Offsite", local(17, 9, 0), local(17, 19, 0))];

        assert!(subtract_busy_events(free, &events)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_disjoint_event_leaves_free_list_unchanged() -> anyhow::Result<()> {
        let free = vec![range(17, (10, 0), (12, 0)), range(18, (13, 0), (18, 0))];
        let events = vec![busy("Early gym", local(18, 7, 0), local(18, 8, 0))];

        assert_eq!(subtract_busy_events(free.clone(), &events)?, free);

        Ok(())
    }

    #[test]
    fn test_overlapping_events_across_days() -> anyhow::Result<()> {
        let free = vec![range(17, (10, 0), (18, 0)), range(18, (10, 0), (18, 0))];
        let events = vec![
            busy("Review", local(17, 11, 0), local(17, 12, 30)),
            busy("Pairing", local(17, 12, 0), local(17, 14, 0)),
            all_day("Conference"),
            busy("Dentist", local(18, 16, 0), local(18, 19, 0)),
        ];

        let result = subtract_busy_events(free, &events)?;

        assert_eq!(
            result,
            vec![
                range(17, (10, 0), (11, 0)),
                range(17, (14, 0), (18, 0)),
                range(18, (10, 0), (16, 0)),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_malformed_event_aborts() {
        let free = vec![range(17, (10, 0), (18, 0))];
        let events = vec![BusyEvent {
            label: "Broken".to_string(),
            start: "tomorrow".to_string(),
            end: "2025-03-17T13:00:00-06:00".to_string(),
        }];

        let err = subtract_busy_events(free, &events).unwrap_err();

        assert!(matches!(err, FreeTimeError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_workday_windows_skip_weekend() -> anyhow::Result<()> {
        // Friday 15:00: Friday, then Saturday and Sunday both map to Monday
        let windows = workday_windows(local(14, 15, 0), 3, WorkdayHours::default(), &cst())?;

        assert_eq!(
            windows,
            vec![
                range(14, (10, 0), (18, 0)),
                range(17, (10, 0), (18, 0)),
                range(17, (10, 0), (18, 0)),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_workday_windows_across_dst_transitions() -> anyhow::Result<()> {
        let tz: chrono_tz::Tz = "America/New_York".parse().unwrap();
        let at = |y, mo, d, h, mi| {
            tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
                .unwrap()
                .with_timezone(&Utc)
        };
        let utc = |s: &str| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);

        // Saturday 02:30; Sunday 02:30 falls in the spring-forward gap
        let spring = workday_windows(at(2025, 3, 8, 2, 30), 3, WorkdayHours::default(), &tz)?;
        let monday = TimeRange::new(utc("2025-03-10T14:00:00Z"), utc("2025-03-10T22:00:00Z"))?;
        assert_eq!(spring, vec![monday, monday, monday]);

        // Friday 01:30; Sunday 01:30 happens twice when clocks fall back
        let autumn = workday_windows(at(2025, 10, 31, 1, 30), 3, WorkdayHours::default(), &tz)?;
        let friday = TimeRange::new(utc("2025-10-31T14:00:00Z"), utc("2025-10-31T22:00:00Z"))?;
        let monday = TimeRange::new(utc("2025-11-03T15:00:00Z"), utc("2025-11-03T23:00:00Z"))?;
        assert_eq!(autumn, vec![friday, monday, monday]);

        Ok(())
    }

    #[tokio::test]
    async fn test_compute_free_ranges_clips_to_now_and_subtracts() -> anyhow::Result<()> {
        let mut source = MockEventSource::new();
        source
            .expect_fetch_events()
            .with(eq("work"), eq(range(17, (10, 0), (18, 0))))
            .times(1)
            .returning(|_, _| {
                Ok(vec![busy("1:1", local(17, 14, 0), local(17, 15, 0))])
            });
        source
            .expect_fetch_events()
            .with(eq("work"), eq(range(18, (10, 0), (18, 0))))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    all_day("Out of office"),
                    busy("Planning", local(18, 10, 0), local(18, 11, 30)),
                ])
            });

        let result = compute_free_ranges(
            &source,
            2,
            local(17, 12, 0),
            &["work".to_string()],
            WorkdayHours::default(),
            &cst(),
        )
        .await?;

        assert_eq!(
            result,
            vec![
                range(17, (12, 0), (14, 0)),
                range(17, (15, 0), (18, 0)),
                range(18, (11, 30), (18, 0)),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_compute_free_ranges_after_hours_rolls_to_next_day() -> anyhow::Result<()> {
        let source = MockEventSource::new();

        // Monday 18:30 rolls over to Tuesday; no calendars means no fetches
        let result = compute_free_ranges(
            &source,
            1,
            local(17, 18, 30),
            &[],
            WorkdayHours::default(),
            &cst(),
        )
        .await?;

        assert_eq!(result, vec![range(18, (10, 0), (18, 0))]);

        Ok(())
    }

    #[tokio::test]
    async fn test_compute_free_ranges_fetch_failure_aborts() {
        let mut source = MockEventSource::new();
        source
            .expect_fetch_events()
            .returning(|_, _| Err(anyhow::anyhow!("503 Service Unavailable")));

        let result = compute_free_ranges(
            &source,
            3,
            local(17, 9, 0),
            &["work".to_string(), "personal".to_string()],
            WorkdayHours::default(),
            &cst(),
        )
        .await;

        assert!(result.is_err());
    }
}
