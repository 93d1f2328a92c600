use super::Fetcher;
use crate::config::default_user_agent;
use crate::error::ImportError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Plain HTTP fetcher with a browser-like identity and a hard deadline.
pub struct RequestFetcher {
    client: Client,
    timeout: Duration,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self, ImportError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let user_agent = user_agent
            .map(str::to_string)
            .unwrap_or_else(default_user_agent);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(HeaderValue::from_str(&user_agent)?)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn get(&self, url: &Url) -> Result<String, ImportError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, ImportError> {
        debug!("Fetching {} (timeout {:?})", url, self.timeout);
        // Dropping the future on expiry aborts the in-flight request.
        match tokio::time::timeout(self.timeout, self.get(url)).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(ImportError::Request(e))) if e.is_timeout() => {
                Err(ImportError::Timeout(self.timeout.as_secs()))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ImportError::Timeout(self.timeout.as_secs())),
        }
    }
}
