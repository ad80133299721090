//! Page retrieval.
//!
//! [`PageFetcher`] is the seam between the crawler and the network. The
//! production implementation is [`HttpFetcher`]: a single GET with a timeout,
//! no retries, non-2xx treated as failure. Unit tests swap in an in-memory
//! fetcher.

use crate::error::FetchError;
use reqwest::Client;
#[cfg(test)]
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Anything that can turn a URL into page content.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the client cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching page");
        let http_err = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// In-memory fetcher serving fixed pages by exact URL. Unknown URLs get a 404.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<String, String>,
}

#[cfg(test)]
impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }
}

#[cfg(test)]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::UnexpectedStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}
