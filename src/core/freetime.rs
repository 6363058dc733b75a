use chrono::{Local, TimeZone};
use chrono_tz::Tz;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::core::busy::EventSource;
use crate::core::clock::RealClock;
use crate::core::error::FreeTimeError;
use crate::core::planner::{FreeTimePlanner, PlanSettings};
use crate::core::template::{generate, Slot};
use crate::google::calendar::client::GoogleCalendarClient;
use crate::google::calendar::service::GoogleCalendarService;
use crate::google::oauth::{OAuth2Client, Token};

pub struct FreeTime {
    config: Config,
    token: Option<Token>,
}

impl FreeTime {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            token: None,
        }
    }

    fn oauth2_client(&self) -> anyhow::Result<OAuth2Client> {
        let oauth2 = &self.config.source.google.oauth2;
        Ok(OAuth2Client::new(
            &oauth2.client_id,
            &oauth2.client_secret,
            &oauth2.redirect_url,
            &oauth2.scopes,
        )?)
    }

    /// Loads the cached token, refreshing it or running the browser flow when
    /// it is missing or expired.
    pub async fn oauth(&mut self) -> anyhow::Result<()> {
        let oauth2_client = self.oauth2_client()?;
        let token_path = Path::new(&self.config.settings.oauth_file_path);

        let token = match Token::load(token_path)? {
            Some(stored) if !stored.is_expired() => stored,
            Some(Token {
                refresh_token: Some(refresh),
                ..
            }) => {
                info!("refreshing expired OAuth token");
                let refreshed = oauth2_client.refresh_token(refresh).await?;
                refreshed.save(token_path)?;
                refreshed
            }
            _ => {
                let token = oauth2_client.oauth_flow().await?;
                token.save(token_path)?;
                token
            }
        };

        self.token = Some(token);

        Ok(())
    }

    /// Finds the free slots and renders them with the configured template.
    pub async fn find_free_time(&self) -> anyhow::Result<String> {
        let access_token = self
            .token
            .as_ref()
            .ok_or(FreeTimeError::TokenNotSet)?
            .access_token
            .clone();
        let source = GoogleCalendarService::new(GoogleCalendarClient::new(access_token));

        match &self.config.settings.tz {
            Some(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|_| FreeTimeError::InvalidTimeZone(name.clone()))?;
                self.render(&source, &tz).await
            }
            None => self.render(&source, &Local).await,
        }
    }

    async fn render<S, Z>(&self, source: &S, tz: &Z) -> anyhow::Result<String>
    where
        S: EventSource + ?Sized,
        Z: TimeZone,
        Z::Offset: Display,
    {
        let settings = PlanSettings::from_config(&self.config)?;
        let lookahead_days = settings.lookahead_days;

        let planner = FreeTimePlanner::new(RealClock, settings);
        let ranges = planner.plan(source, tz).await?;

        let slots = ranges.iter().map(|r| Slot::from_range(r, tz)).collect();
        generate(&self.config.output.template, slots, lookahead_days)
    }
}
