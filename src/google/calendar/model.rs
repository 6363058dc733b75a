use serde::Deserialize;

use crate::core::busy::{BusyEvent, CalendarSummary};

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct CalendarListResponse {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "etag")]
    pub etag: Option<String>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "items", default)]
    pub items: Vec<CalendarListEntry>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct CalendarListEntry {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "summaryOverride")]
    pub summary_override: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "accessRole")]
    pub access_role: Option<String>,
    #[serde(rename = "primary")]
    pub primary: Option<bool>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct CalendarEventsResponse {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "items", default)]
    pub items: Vec<EventItem>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventItem {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "status")]
    pub status: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "recurringEventId")]
    pub recurring_event_id: Option<String>,
    #[serde(rename = "start")]
    pub start: Option<EventDateTime>,
    #[serde(rename = "end")]
    pub end: Option<EventDateTime>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "date")]
    pub date: Option<String>,
}

impl From<CalendarListEntry> for CalendarSummary {
    /// Calendars are named by their shared `summary`; a local
    /// `summaryOverride` does not rename them.
    fn from(entry: CalendarListEntry) -> Self {
        CalendarSummary {
            name: entry.summary.unwrap_or_default(),
            id: entry.id,
        }
    }
}

impl From<EventItem> for BusyEvent {
    /// Events carrying only a `date` are all-day and map to an empty start.
    fn from(item: EventItem) -> Self {
        let date_time = |dt: Option<EventDateTime>| dt.and_then(|d| d.date_time).unwrap_or_default();

        BusyEvent {
            label: item.summary.unwrap_or_else(|| "(no summary)".to_string()),
            start: date_time(item.start),
            end: date_time(item.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_response_to_busy_events() -> anyhow::Result<()> {
        let json_str = r#"
{
 "kind": "calendar#events",
 "etag": "\"p33sbfm5on6bom0o\"",
 "summary": "example@email.com",
 "updated": "2025-01-28T03:14:25.579Z",
 "timeZone": "America/Chicago",
 "accessRole": "owner",
 "items": [
  {
   "kind": "calendar#event",
   "id": "allday",
   "status": "confirmed",
   "summary": "Spring Break",
   "start": { "date": "2025-03-17" },
   "end": { "date": "2025-03-22" },
   "transparency": "transparent"
  },
  {
   "kind": "calendar#event",
   "id": "lecture_20250317",
   "status": "confirmed",
   "summary": "CS 225 Lecture",
   "recurringEventId": "lecture",
   "start": {
    "dateTime": "2025-03-17T11:00:00-05:00",
    "timeZone": "America/Chicago"
   },
   "end": {
    "dateTime": "2025-03-17T12:15:00-05:00",
    "timeZone": "America/Chicago"
   }
  },
  {
   "kind": "calendar#event",
   "id": "untitled",
   "status": "confirmed",
   "start": { "dateTime": "2025-03-18T09:00:00Z" },
   "end": { "dateTime": "2025-03-18T09:30:00Z" }
  }
 ]
}
"#;
        let response: CalendarEventsResponse = serde_json::from_str(json_str)?;
        let events: Vec<BusyEvent> = response.items.into_iter().map(BusyEvent::from).collect();

        assert_eq!(
            events,
            vec![
                BusyEvent {
                    label: "Spring Break".to_string(),
                    start: String::new(),
                    end: String::new(),
                },
                BusyEvent {
                    label: "CS 225 Lecture".to_string(),
                    start: "2025-03-17T11:00:00-05:00".to_string(),
                    end: "2025-03-17T12:15:00-05:00".to_string(),
                },
                BusyEvent {
                    label: "(no summary)".to_string(),
                    start: "2025-03-18T09:00:00Z".to_string(),
                    end: "2025-03-18T09:30:00Z".to_string(),
                },
            ]
        );
        assert!(events[0].is_all_day());

        Ok(())
    }

    #[test]
    fn test_calendar_list_names_by_summary() -> anyhow::Result<()> {
        let json_str = r#"
{
 "kind": "calendar#calendarList",
 "items": [
  { "id": "primary@example.com", "summary": "primary@example.com", "primary": true },
  { "id": "abc@group.calendar.google.com", "summary": "UIUC", "summaryOverride": "School" },
  { "id": "def@group.calendar.google.com", "summary": "YMCA" }
 ]
}
"#;
        let response: CalendarListResponse = serde_json::from_str(json_str)?;
        let calendars: Vec<CalendarSummary> =
            response.items.into_iter().map(CalendarSummary::from).collect();

        assert_eq!(response.next_page_token, None);
        assert_eq!(calendars[1].name, "UIUC");
        assert_eq!(calendars[1].id, "abc@group.calendar.google.com");
        assert_eq!(calendars[2].name, "YMCA");

        Ok(())
    }
}
