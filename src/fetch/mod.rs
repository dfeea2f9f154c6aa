// src/fetch/mod.rs

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::scrape::ScrapeError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

/// The calendar host rejects the default reqwest User-Agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// HTTP collaborator that retrieves raw calendar pages. Cheap to clone; all
/// clones share one connection pool and cookie store.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET the page at `url` and return its body text, retrying failed
    /// attempts with exponential backoff.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let url = Url::parse(url)?;

        let mut attempts = 0;
        loop {
            match self.get_text(&url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempts - 1);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "Exhausted retries");
                    return Err(e.into());
                }
            }
        }
    }

    async fn get_text(&self, url: &Url) -> Result<String, reqwest::Error> {
        debug!("Fetching text from {}", url);
        self.client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_url_is_url_error() {
        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher.fetch_page("not a url").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Url(_)));
        assert!(err.to_string().starts_with("invalid url"));
    }
}
