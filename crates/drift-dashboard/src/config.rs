//! Configuration for the dashboard

use crate::error::{DashboardError, Result};
use crate::ticker::Ticker;
use drift_utils::{env_parse, env_string};
use std::time::Duration;
use url::Url;

/// Default address of the analytics service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

/// Ticker shown when the dashboard first mounts
pub const DEFAULT_TICKER: &str = "NVDA";

/// Environment variable overriding the service address
pub const BASE_URL_ENV: &str = "DRIFT_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "DRIFT_REQUEST_TIMEOUT_SECS";

/// Environment variable overriding the initial ticker
pub const TICKER_ENV: &str = "DRIFT_TICKER";

/// Configuration for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base address every signal path is appended to
    pub base_url: Url,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Ticker requested on mount
    pub initial_ticker: Ticker,
}

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl DashboardConfig {
    /// Built-in defaults: local service, 30 second timeout, `NVDA`
    pub fn defaults() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Defaults overridden by `DRIFT_API_URL`, `DRIFT_REQUEST_TIMEOUT_SECS` and `DRIFT_TICKER`
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(DashboardError::ConfigError(format!(
                "base URL must be http or https, got {}",
                self.base_url
            )));
        }

        if self.base_url.cannot_be_a_base() {
            return Err(DashboardError::ConfigError(format!(
                "base URL {} cannot carry a path",
                self.base_url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(DashboardError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    initial_ticker: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set the service base address
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the ticker requested on mount
    pub fn initial_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.initial_ticker = Some(ticker.into());
        self
    }

    /// Fill unset fields from the environment
    pub fn with_env(mut self) -> Result<Self> {
        if self.base_url.is_none() {
            self.base_url = env_string(BASE_URL_ENV);
        }
        if self.request_timeout.is_none() {
            self.request_timeout = env_parse::<u64>(TIMEOUT_ENV)?.map(Duration::from_secs);
        }
        if self.initial_ticker.is_none() {
            self.initial_ticker = env_string(TICKER_ENV);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|e| {
            DashboardError::ConfigError(format!("invalid base URL {raw_url:?}: {e}"))
        })?;

        let initial_ticker = self.initial_ticker.as_deref().unwrap_or(DEFAULT_TICKER);
        let config = DashboardConfig {
            base_url,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_TIMEOUT),
            initial_ticker: Ticker::parse(initial_ticker)?,
        };

        config.validate()?;
        Ok(config)
    }
}
