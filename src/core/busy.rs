use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::error::FreeTimeError;
use crate::core::range::TimeRange;

/// An event that blocks free time. An empty `start` marks an all-day event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyEvent {
    pub label: String,
    pub start: String,
    pub end: String,
}

impl BusyEvent {
    pub fn is_all_day(&self) -> bool {
        self.start.is_empty()
    }

    /// Parses the RFC 3339 endpoints. All-day events have no interval.
    pub fn interval(&self) -> Result<Option<TimeRange>, FreeTimeError> {
        if self.is_all_day() {
            return Ok(None);
        }

        let start = parse_rfc3339(&self.start)?;
        let end = parse_rfc3339(&self.end)?;

        TimeRange::new(start, end)
            .map(Some)
            .map_err(|source| FreeTimeError::InvalidEventInterval {
                label: self.label.clone(),
                source,
            })
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, FreeTimeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| FreeTimeError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSummary {
    pub id: String,
    pub name: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource {
    async fn list_calendars(&self) -> anyhow::Result<Vec<CalendarSummary>>;

    /// Events intersecting `window`, with deleted events excluded and recurring
    /// events expanded into single instances.
    async fn fetch_events(
        &self,
        calendar_id: &str,
        window: &TimeRange,
    ) -> anyhow::Result<Vec<BusyEvent>>;
}

/// Returns the IDs of calendars whose name is one of `busy_names`, compared
/// case-sensitively, in the order the source lists them.
pub async fn resolve_busy_calendar_ids<S: EventSource + ?Sized>(
    source: &S,
    busy_names: &[String],
) -> anyhow::Result<Vec<String>> {
    let calendars = source.list_calendars().await?;

    let ids = calendars
        .into_iter()
        .filter(|calendar| busy_names.contains(&calendar.name))
        .map(|calendar| {
            info!(calendar = %calendar.name, "blocking with calendar");
            calendar.id
        })
        .collect();

    Ok(ids)
}
