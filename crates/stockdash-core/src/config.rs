//! Configuration for the dashboard client

use crate::error::{DashError, Result};
use crate::model::{AnalysisParams, Interval};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const ENV_ANALYSIS_URL: &str = "STOCKDASH_ANALYSIS_URL";
pub const ENV_QUOTE_URL: &str = "STOCKDASH_QUOTE_URL";
pub const ENV_QUOTE_API_KEY: &str = "STOCKDASH_QUOTE_API_KEY";
pub const ENV_ANALYSIS_TIMEOUT_SECS: &str = "STOCKDASH_ANALYSIS_TIMEOUT_SECS";

/// Configuration for the dashboard client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the analysis service (`/analyze`, `/health`)
    pub analysis_base_url: String,

    /// Base URL of the quote provider (`/quotes`)
    pub quote_base_url: String,

    /// Quote provider access key (optional)
    pub quote_api_key: Option<String>,

    /// Client-side deadline for one analysis request
    pub analysis_timeout: Duration,

    /// Parameters sent with every analysis request
    pub analysis_params: AnalysisParams,

    /// Cache TTL for category quote lists
    pub cache_ttl_realtime: Duration,

    /// Maximum quote provider requests per minute
    pub quote_rate_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            analysis_base_url: "http://localhost:8000".to_string(),
            quote_base_url: "http://localhost:8001".to_string(),
            quote_api_key: None,
            analysis_timeout: Duration::from_secs(30),
            analysis_params: AnalysisParams::default(),
            cache_ttl_realtime: Duration::from_secs(60), // 1 minute
            quote_rate_limit: 5,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Overlay values from `STOCKDASH_*` environment variables
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(ENV_ANALYSIS_URL) {
            self.analysis_base_url = url;
        }
        if let Ok(url) = std::env::var(ENV_QUOTE_URL) {
            self.quote_base_url = url;
        }
        if let Ok(key) = std::env::var(ENV_QUOTE_API_KEY) {
            self.quote_api_key = Some(key);
        }
        if let Ok(secs) = std::env::var(ENV_ANALYSIS_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DashError::ConfigError(format!(
                    "{ENV_ANALYSIS_TIMEOUT_SECS} must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            self.analysis_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        parse_base_url("analysis_base_url", &self.analysis_base_url)?;
        parse_base_url("quote_base_url", &self.quote_base_url)?;

        if self.analysis_timeout.is_zero() {
            return Err(DashError::ConfigError(
                "analysis_timeout must be greater than 0".to_string(),
            ));
        }

        if self.analysis_params.days_back == 0 {
            return Err(DashError::ConfigError(
                "days_back must be greater than 0".to_string(),
            ));
        }

        if self.analysis_params.technical_limit == 0 {
            return Err(DashError::ConfigError(
                "technical_limit must be greater than 0".to_string(),
            ));
        }

        if self.quote_rate_limit == 0 {
            return Err(DashError::ConfigError(
                "quote_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_base_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| DashError::ConfigError(format!("{field} is not a valid URL ({raw}): {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashError::ConfigError(format!(
            "{field} must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    analysis_base_url: Option<String>,
    quote_base_url: Option<String>,
    quote_api_key: Option<String>,
    analysis_timeout: Option<Duration>,
    days_back: Option<u32>,
    technical_interval: Option<Interval>,
    technical_limit: Option<u32>,
    cache_ttl_realtime: Option<Duration>,
    quote_rate_limit: Option<u32>,
}

impl DashboardConfigBuilder {
    /// Set the analysis service base URL
    pub fn analysis_base_url(mut self, url: impl Into<String>) -> Self {
        self.analysis_base_url = Some(url.into());
        self
    }

    /// Set the quote provider base URL
    pub fn quote_base_url(mut self, url: impl Into<String>) -> Self {
        self.quote_base_url = Some(url.into());
        self
    }

    /// Set the quote provider access key
    pub fn quote_api_key(mut self, key: impl Into<String>) -> Self {
        self.quote_api_key = Some(key.into());
        self
    }

    /// Set the analysis deadline
    pub fn analysis_timeout(mut self, duration: Duration) -> Self {
        self.analysis_timeout = Some(duration);
        self
    }

    pub fn days_back(mut self, days: u32) -> Self {
        self.days_back = Some(days);
        self
    }

    pub fn technical_interval(mut self, interval: Interval) -> Self {
        self.technical_interval = Some(interval);
        self
    }

    pub fn technical_limit(mut self, limit: u32) -> Self {
        self.technical_limit = Some(limit);
        self
    }

    /// Set cache TTL for category quote lists
    pub fn cache_ttl_realtime(mut self, duration: Duration) -> Self {
        self.cache_ttl_realtime = Some(duration);
        self
    }

    /// Set quote provider requests per minute
    pub fn quote_rate_limit(mut self, per_minute: u32) -> Self {
        self.quote_rate_limit = Some(per_minute);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();
        let params = defaults.analysis_params;

        let config = DashboardConfig {
            analysis_base_url: self.analysis_base_url.unwrap_or(defaults.analysis_base_url),
            quote_base_url: self.quote_base_url.unwrap_or(defaults.quote_base_url),
            quote_api_key: self.quote_api_key,
            analysis_timeout: self.analysis_timeout.unwrap_or(defaults.analysis_timeout),
            analysis_params: AnalysisParams {
                days_back: self.days_back.unwrap_or(params.days_back),
                technical_interval: self.technical_interval.unwrap_or(params.technical_interval),
                technical_limit: self.technical_limit.unwrap_or(params.technical_limit),
            },
            cache_ttl_realtime: self.cache_ttl_realtime.unwrap_or(defaults.cache_ttl_realtime),
            quote_rate_limit: self.quote_rate_limit.unwrap_or(defaults.quote_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}
