use anyhow::Result;
use log::info;

use crate::config::settings::ScraperSettings;
use crate::errors::ScrapeError;
use crate::http::RetryingClient;

/// Raw event page body plus the event id taken from the resolved URL
pub struct EventPage {
    pub event_id: i64,
    pub body: String,
}

/// Fetches the current voting gauntlet page.
///
/// The fixed gauntlet URL redirects to the page of the running event;
/// the event id is the trailing path segment of the resolved location.
pub struct EventPageFetcher {
    client: RetryingClient,
    gauntlet_url: String,
}

impl EventPageFetcher {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = RetryingClient::new(
            &settings.user_agent,
            settings.timeout_secs,
            settings.fetch_attempts,
            settings.retry_delay_secs,
        )?;

        Ok(Self {
            client,
            gauntlet_url: settings.gauntlet_url.clone(),
        })
    }

    pub async fn fetch_current(&self) -> Result<EventPage> {
        info!("Fetching event page: {}", self.gauntlet_url);

        let page = self.client.get_with_retry(&self.gauntlet_url).await?;
        let event_id = parse_event_id(&page.resolved_url)?;

        info!("  → Resolved to event {}", event_id);

        Ok(EventPage {
            event_id,
            body: page.body,
        })
    }
}

/// Parse the trailing path segment of the resolved URL as the event id
fn parse_event_id(resolved_url: &str) -> Result<i64, ScrapeError> {
    let segment = resolved_url.rsplit('/').next().unwrap_or_default();

    segment
        .parse()
        .map_err(|_| ScrapeError::MalformedEventId(segment.to_string()))
}
