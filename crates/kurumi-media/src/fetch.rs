//! Bounded HTTP fetch: one GET, one time budget, no retries.

use async_trait::async_trait;
use kurumi_core::error::{FetchError, KurumiError};
use kurumi_core::traits::{Fetched, Fetcher};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// `reqwest`-backed fetcher. Redirects are followed.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, KurumiError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| KurumiError::Config(format!("http client init failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Fetched, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = resp.bytes().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!("fetched {} bytes from {url}", bytes.len());
        Ok(Fetched {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// GET `url`, giving up after `timeout`.
///
/// On timeout the in-flight request future is dropped, which aborts it.
pub async fn fetch_bounded(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<Fetched, FetchError> {
    match tokio::time::timeout(timeout, fetcher.get(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            after: timeout,
        }),
    }
}

/// GET `url` within `timeout` and decode the body as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    url: &str,
    timeout: Duration,
) -> Result<T, FetchError> {
    let fetched = fetch_bounded(fetcher, url, timeout).await?;
    serde_json::from_slice(&fetched.bytes).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Whether a media URL or its content type denotes a GIF.
pub fn is_gif(url: &str, content_type: Option<&str>) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".gif")
        || content_type
            .map(|ct| ct.to_ascii_lowercase().contains("image/gif"))
            .unwrap_or(false)
}
