use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use reqwest::Client;
use tokio::time::sleep;

use crate::errors::ScrapeError;

/// Response body together with the location the request resolved to
/// after redirects.
pub struct FetchedPage {
    pub body: String,
    pub resolved_url: String,
}

/// HTTP client with a bounded retry budget for transport failures
pub struct RetryingClient {
    client: Client,
    attempts: usize,
    retry_delay: Duration,
}

impl RetryingClient {
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        attempts: usize,
        retry_delay_secs: u64,
    ) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;

        Ok(Self {
            client,
            attempts,
            retry_delay: Duration::from_secs(retry_delay_secs),
        })
    }

    /// GET the URL, retrying on any transport failure (timeout,
    /// connection error) up to the attempt budget with a fixed delay
    /// between attempts. Exhaustion is fatal for the caller's cycle.
    pub async fn get_with_retry(&self, url: &str) -> Result<FetchedPage> {
        for attempt in 1..=self.attempts {
            match self.send_get_request(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    warn!("Attempt {}/{} failed: {}", attempt, self.attempts, e);
                    if attempt < self.attempts {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(ScrapeError::FetchTimeout {
            attempts: self.attempts,
        }
        .into())
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<FetchedPage, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let resolved_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchedPage { body, resolved_url })
    }
}
