//! Remote quote source
//!
//! HTTP client for the placeholder posts endpoint.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// Anything that can produce a batch of server quotes
pub trait QuoteSource {
    /// Fetch the current server batch
    fn fetch_quotes(&self) -> impl Future<Output = QuoteResult<Vec<Quote>>> + Send;
}

/// A post as returned by the placeholder API
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePost {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl RemotePost {
    /// Map to a server quote: title, else body, else a placeholder
    pub fn into_quote(self) -> Quote {
        let text = [self.title.as_deref(), self.body.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Post #{}", self.id));
        Quote::from_server(self.id, text)
    }
}

/// Fetches server quotes over HTTP
pub struct HttpQuoteSource {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HttpQuoteSource {
    /// Create a source for `url`, requesting at most `limit` records
    pub fn new(url: &str, limit: usize, timeout: Duration) -> QuoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            limit,
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    async fn fetch_quotes(&self) -> QuoteResult<Vec<Quote>> {
        debug!("Fetching server quotes from {}", self.url);

        let posts: Vec<RemotePost> = self
            .client
            .get(&self.url)
            .query(&[("_limit", self.limit)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Fetched {} server posts", posts.len());
        Ok(posts
            .into_iter()
            .take(self.limit)
            .map(RemotePost::into_quote)
            .collect())
    }
}
