//! Market data fetcher: category key → ordered, normalized stocks

use super::normalizer::normalize_category;
use crate::api::{HttpQuoteProvider, QuoteProvider};
use crate::cache::QuoteCache;
use crate::catalog::{self, CATEGORIES, Category};
use crate::config::DashboardConfig;
use crate::error::{FetchError, Result};
use crate::model::Stock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of loading a category for display
///
/// Always carries a stock list; on failure it is empty and `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLoad {
    pub category: String,
    pub stocks: Vec<Stock>,
    pub error: Option<FetchError>,
}

impl CategoryLoad {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetches quote lists per category through a [`QuoteProvider`]
pub struct MarketDataFetcher {
    provider: Arc<dyn QuoteProvider>,
    cache: QuoteCache,
}

impl MarketDataFetcher {
    /// Create a fetcher with the given provider and cache TTL
    pub fn new(provider: Arc<dyn QuoteProvider>, cache_ttl: Duration) -> Self {
        Self {
            provider,
            cache: QuoteCache::new(cache_ttl),
        }
    }

    /// Create a fetcher backed by the HTTP provider from `config`
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let provider = HttpQuoteProvider::new(
            &config.quote_base_url,
            config.quote_api_key.clone(),
            config.quote_rate_limit,
        )?;
        Ok(Self::new(Arc::new(provider), config.cache_ttl_realtime))
    }

    /// All categories in display order
    pub fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    /// Stocks for every symbol in the category, in catalog order
    ///
    /// Served from cache while fresh.
    pub async fn fetch_category(&self, key: &str) -> std::result::Result<Vec<Stock>, FetchError> {
        let category = lookup(key)?;
        self.cache
            .get_or_fetch(category.key, || self.fetch_uncached(category))
            .await
    }

    /// Like [`fetch_category`](Self::fetch_category) but always hits the provider
    pub async fn refresh_category(
        &self,
        key: &str,
    ) -> std::result::Result<Vec<Stock>, FetchError> {
        let category = lookup(key)?;
        self.cache.invalidate(category.key).await;
        self.fetch_category(category.key).await
    }

    /// Presentation-facing load that never fails
    pub async fn load_category(&self, key: &str) -> CategoryLoad {
        self.finish_load(key, self.fetch_category(key).await)
    }

    /// Presentation-facing refresh that never fails
    pub async fn reload_category(&self, key: &str) -> CategoryLoad {
        self.finish_load(key, self.refresh_category(key).await)
    }

    fn finish_load(
        &self,
        key: &str,
        result: std::result::Result<Vec<Stock>, FetchError>,
    ) -> CategoryLoad {
        match result {
            Ok(stocks) => CategoryLoad {
                category: key.to_string(),
                stocks,
                error: None,
            },
            Err(error) => {
                warn!(category = key, %error, "Failed to load category");
                CategoryLoad {
                    category: key.to_string(),
                    stocks: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    async fn fetch_uncached(
        &self,
        category: &Category,
    ) -> std::result::Result<Vec<Stock>, FetchError> {
        let symbols: Vec<String> = category.symbols().map(str::to_string).collect();
        let quotes = self.provider.fetch_quotes(&symbols).await?;

        let stocks = normalize_category(category, &quotes);
        let missing = stocks.iter().filter(|s| s.is_unquoted()).count();
        if missing > 0 {
            warn!(category = category.key, missing, "Provider omitted some quotes");
        }
        info!(category = category.key, count = stocks.len(), "Loaded category");

        Ok(stocks)
    }
}

fn lookup(key: &str) -> std::result::Result<&'static Category, FetchError> {
    catalog::find(key).ok_or_else(|| FetchError::UnknownCategory(key.trim().to_string()))
}
