//! Quote provider client: one batched `GET /quotes` per category

use super::endpoint;
use crate::error::{DashError, FetchError, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;
use url::Url;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// One provider quote record; every numeric field may be absent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    /// Provider-supplied name; never displayed
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "last", deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub change: Option<f64>,
    #[serde(
        default,
        rename = "changePercent",
        alias = "change_percent",
        alias = "percent_change",
        deserialize_with = "lenient_number"
    )]
    pub change_percent: Option<f64>,
}

/// Accept numbers, numeric strings and null; anything else becomes `None`
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite()))
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    data: Option<Vec<RawQuote>>,
}

/// Decode a provider body; a missing or null `data` field is an error
pub fn parse_quote_body(body: &str) -> std::result::Result<Vec<RawQuote>, FetchError> {
    let envelope: QuoteEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    envelope.data.ok_or(FetchError::MissingData)
}

/// Source of raw quotes for a batch of symbols
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch quotes for all `symbols` in a single call
    ///
    /// The result may omit symbols the provider has no data for.
    async fn fetch_quotes(&self, symbols: &[String])
    -> std::result::Result<Vec<RawQuote>, FetchError>;
}

/// HTTP quote provider client with rate limiting
#[derive(Debug, Clone)]
pub struct HttpQuoteProvider {
    client: Client,
    quotes_url: Url,
    api_key: Option<String>,
    rate_limiter: SharedRateLimiter,
}

impl HttpQuoteProvider {
    /// Create a new provider client
    ///
    /// # Arguments
    /// * `base_url` - Provider base URL; requests go to `{base_url}/quotes`
    /// * `api_key` - Optional access key sent as `access_key`
    /// * `rate_limit` - Maximum requests per minute (free tier: 5)
    pub fn new(base_url: &str, api_key: Option<String>, rate_limit: u32) -> Result<Self> {
        let quotes_url = endpoint(base_url, "quotes").map_err(|e| {
            DashError::ConfigError(format!("Invalid quote base URL {base_url}: {e}"))
        })?;

        let per_minute = NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client: Client::builder().build()?,
            quotes_url,
            api_key,
            rate_limiter,
        })
    }

    /// URL for a batched request
    pub fn request_url(&self, symbols: &[String]) -> Url {
        let mut url = self.quotes_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("symbols", &symbols.join(","));
            if let Some(key) = &self.api_key {
                query.append_pair("access_key", key);
            }
        }
        url
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn fetch_quotes(
        &self,
        symbols: &[String],
    ) -> std::result::Result<Vec<RawQuote>, FetchError> {
        self.rate_limiter.until_ready().await;

        debug!(count = symbols.len(), "Fetching quotes");

        let response = self
            .client
            .get(self.request_url(symbols))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_quote_body(&body)
    }
}
