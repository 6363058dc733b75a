use reqwest::{Client, Url};
use thiserror::Error;

use super::model::{CalendarEventsResponse, CalendarListEntry, CalendarListResponse, EventItem};

const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Error, Debug)]
pub enum GoogleCalendarError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("invalid calendar API url '{0}'")]
    InvalidUrl(String),
}

pub struct GoogleCalendarClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new<T: Into<String>>(token: T) -> Self {
        Self::with_base_url(token, GOOGLE_CALENDAR_API)
    }

    pub fn with_base_url<T: Into<String>, U: Into<String>>(token: T, base_url: U) -> Self {
        GoogleCalendarClient {
            client: Client::new(),
            access_token: token.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GoogleCalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|_| GoogleCalendarError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| GoogleCalendarError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Every calendar on the user's calendar list, following pagination.
    pub async fn list_calendars(&self) -> Result<Vec<CalendarListEntry>, GoogleCalendarError> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;

        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.client.get(url.clone()).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let mut page = request
                .send()
                .await?
                .error_for_status()?
                .json::<CalendarListResponse>()
                .await?;
            entries.append(&mut page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }

    /// Non-deleted events between `since` and `until` (RFC 3339), with
    /// recurring events expanded into single instances.
    pub async fn fetch_calendar_events(
        &self,
        calendar_id: &str,
        since: &str,
        until: &str,
    ) -> Result<Vec<EventItem>, GoogleCalendarError> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(&self.access_token)
                .query(&[
                    ("timeMin", since),
                    ("timeMax", until),
                    ("showDeleted", "false"),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let mut page: CalendarEventsResponse = request
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            items.append(&mut page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }
}
