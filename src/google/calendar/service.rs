use async_trait::async_trait;
use tracing::debug;

use crate::core::busy::{BusyEvent, CalendarSummary, EventSource};
use crate::core::range::TimeRange;
use crate::google::calendar::client::GoogleCalendarClient;

/// Google Calendar as the source of busy events.
pub struct GoogleCalendarService {
    calendar_client: GoogleCalendarClient,
}

impl GoogleCalendarService {
    pub fn new(calendar_client: GoogleCalendarClient) -> Self {
        Self { calendar_client }
    }
}

#[async_trait]
impl EventSource for GoogleCalendarService {
    async fn list_calendars(&self) -> anyhow::Result<Vec<CalendarSummary>> {
        let entries = self.calendar_client.list_calendars().await?;
        Ok(entries.into_iter().map(CalendarSummary::from).collect())
    }

    async fn fetch_events(
        &self,
        calendar_id: &str,
        window: &TimeRange,
    ) -> anyhow::Result<Vec<BusyEvent>> {
        let items = self
            .calendar_client
            .fetch_calendar_events(
                calendar_id,
                &window.start().to_rfc3339(),
                &window.end().to_rfc3339(),
            )
            .await?;

        debug!(calendar_id, count = items.len(), "fetched events");

        Ok(items.into_iter().map(BusyEvent::from).collect())
    }
}
