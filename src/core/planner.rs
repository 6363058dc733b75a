use chrono::{Duration, TimeZone};
use tracing::info;

use crate::config::Config;
use crate::core::busy::{resolve_busy_calendar_ids, EventSource};
use crate::core::clock::Clock;
use crate::core::error::FreeTimeError;
use crate::core::filter::retain_min_duration;
use crate::core::range::TimeRange;
use crate::core::reducer::compute_free_ranges;
use crate::core::workday::WorkdayHours;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSettings {
    pub hours: WorkdayHours,
    pub lookahead_days: u32,
    pub min_duration: Duration,
    pub busy_calendars: Vec<String>,
}

impl PlanSettings {
    pub fn from_config(config: &Config) -> Result<Self, FreeTimeError> {
        let workday = &config.workday;
        if workday.lookahead_days == 0 {
            return Err(FreeTimeError::InvalidLookaheadDays(workday.lookahead_days));
        }
        if workday.min_duration_minutes < 0 {
            return Err(FreeTimeError::NegativeMinDuration(
                workday.min_duration_minutes,
            ));
        }

        Ok(Self {
            hours: WorkdayHours::new(workday.start_hour, workday.end_hour)?,
            lookahead_days: workday.lookahead_days,
            min_duration: Duration::minutes(workday.min_duration_minutes),
            busy_calendars: config.source.google.calendar.busy_calendars.clone(),
        })
    }
}

pub struct FreeTimePlanner<C: Clock> {
    clock: C,
    settings: PlanSettings,
}

impl<C: Clock> FreeTimePlanner<C> {
    pub fn new(clock: C, settings: PlanSettings) -> Self {
        Self { clock, settings }
    }

    /// Resolves the busy calendars, subtracts their events from the upcoming
    /// workdays and drops slots shorter than the minimum duration.
    pub async fn plan<S, Z>(&self, source: &S, tz: &Z) -> anyhow::Result<Vec<TimeRange>>
    where
        S: EventSource + ?Sized,
        Z: TimeZone,
    {
        let calendar_ids = resolve_busy_calendar_ids(source, &self.settings.busy_calendars).await?;
        if calendar_ids.is_empty() {
            info!(
                names = ?self.settings.busy_calendars,
                "no busy calendars matched; every workday hour is free"
            );
        }

        let now = self.clock.now();
        let free = compute_free_ranges(
            source,
            self.settings.lookahead_days,
            now,
            &calendar_ids,
            self.settings.hours,
            tz,
        )
        .await?;

        let slots = retain_min_duration(free, self.settings.min_duration);
        info!(count = slots.len(), "free slots found");

        Ok(slots)
    }
}
