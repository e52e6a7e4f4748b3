//! HTTP client for the drift analytics service

use super::{
    DriftSignal, FinancialSignal, NarrativeSignal, SignalError, SignalKind, SignalResult,
    SignalSource,
};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::ticker::Ticker;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Stateless client mapping a ticker to one of the three signal payloads
#[derive(Debug, Clone)]
pub struct HttpSignalClient {
    client: Client,
    base_url: Url,
}

impl HttpSignalClient {
    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| DashboardError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `kind` for `ticker`, e.g. `{base}/financials/MSFT`
    pub fn endpoint(&self, kind: SignalKind, ticker: &Ticker) -> SignalResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SignalError::network(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push(kind.path())
            .push(ticker.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        kind: SignalKind,
        ticker: &Ticker,
    ) -> SignalResult<T> {
        let url = self.endpoint(kind, ticker)?;
        debug!(%url, signal = %kind, "Requesting signal");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SignalError::Network {
                status: Some(status.as_u16()),
                message: error_message(status, &body),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SignalError::Decode(format!("{kind} payload: {e}")))
    }
}

/// Prefer the service's `detail` field over the bare status reason
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}

/// A payload echoing another ticker is treated as a shape mismatch
fn check_ticker(kind: SignalKind, requested: &Ticker, found: &str) -> SignalResult<()> {
    if found.is_empty() || found.eq_ignore_ascii_case(requested.as_str()) {
        Ok(())
    } else {
        Err(SignalError::Decode(format!(
            "{kind} payload is for {found}, requested {requested}"
        )))
    }
}

#[async_trait]
impl SignalSource for HttpSignalClient {
    async fn financials(&self, ticker: &Ticker) -> SignalResult<FinancialSignal> {
        let signal: FinancialSignal = self.get_json(SignalKind::Financial, ticker).await?;
        check_ticker(SignalKind::Financial, ticker, &signal.ticker)?;
        signal.validate()?;
        Ok(signal)
    }

    async fn narrative(&self, ticker: &Ticker) -> SignalResult<NarrativeSignal> {
        let signal: NarrativeSignal = self.get_json(SignalKind::Narrative, ticker).await?;
        check_ticker(SignalKind::Narrative, ticker, &signal.ticker)?;
        signal.validate()?;
        Ok(signal)
    }

    async fn drift(&self, ticker: &Ticker) -> SignalResult<DriftSignal> {
        let signal: DriftSignal = self.get_json(SignalKind::Drift, ticker).await?;
        check_ticker(SignalKind::Drift, ticker, &signal.ticker)?;
        Ok(signal)
    }
}
