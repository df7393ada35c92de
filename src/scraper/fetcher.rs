use crate::model::ScrapeError;
use crate::scraper::traits::Scraper;

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Bounded retry: 5 attempts total, exponential backoff, GET only.
const MAX_ATTEMPTS: u32 = 5;
const BACKOFF_FACTOR_SECS: f64 = 0.5;
const RETRY_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

pub struct HttpScraper {
    client: Client,
}

impl HttpScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("cs-CZ,cs;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Scraper for HttpScraper {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(ScrapeError::Http);
                    }
                    if !RETRY_STATUSES.contains(&status) || attempt >= MAX_ATTEMPTS {
                        return Err(ScrapeError::Status(status));
                    }
                    warn!("GET {} returned {}, attempt {}/{}", url, status, attempt, MAX_ATTEMPTS);
                }
                Err(e) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(ScrapeError::Http(e));
                    }
                    warn!("GET {} failed ({}), attempt {}/{}", url, e, attempt, MAX_ATTEMPTS);
                }
            }
            let backoff = BACKOFF_FACTOR_SECS * f64::from(1u32 << (attempt - 1));
            sleep(Duration::from_secs_f64(backoff)).await;
        }
    }
}

/// Sleeps for an exponentially distributed interval with rate `lambda`,
/// slowing the crawl so the remote site is not hammered.
pub async fn polite_delay(lambda: f64) {
    let secs = {
        let u: f64 = rand::rng().random();
        -(1.0 - u).ln() / lambda
    };
    // The exponential tail is unbounded; cap the nap.
    sleep(Duration::from_secs_f64(secs.min(10.0))).await;
}
