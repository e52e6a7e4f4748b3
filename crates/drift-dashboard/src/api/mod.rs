//! Signal client for the drift analytics service
//!
//! Each signal is fetched with a single `GET` and either decodes into its
//! typed payload or fails with a [`SignalError`]. Nothing here retries or keeps
//! state between calls.

pub mod client;
pub mod types;

pub use client::HttpSignalClient;
pub use types::{
    DriftSignal, FinancialPoint, FinancialSignal, NarrativePoint, NarrativeSignal, ShapeError,
    SignalKind,
};

use crate::ticker::Ticker;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Failure of a single signal request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Transport failure or non-success HTTP status
    #[error(
        "network error{}: {message}",
        .status.map_or_else(String::new, |code| format!(" (HTTP {code})"))
    )]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// Response did not match the expected payload shape
    #[error("decode error: {0}")]
    Decode(String),
}

/// Short user-facing classification of a [`SignalError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Format,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Network => f.write_str("network"),
            ErrorCategory::Format => f.write_str("format"),
        }
    }
}

impl SignalError {
    pub fn network(message: impl Into<String>) -> Self {
        SignalError::Network {
            status: None,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SignalError::Network { .. } => ErrorCategory::Network,
            SignalError::Decode(_) => ErrorCategory::Format,
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SignalError::Network { status, .. } => *status,
            SignalError::Decode(_) => None,
        }
    }

    /// One-line summary suitable for display, e.g. `network (HTTP 503)`
    pub fn summary(&self) -> String {
        match self.status() {
            Some(code) => format!("{} (HTTP {code})", self.category()),
            None => self.category().to_string(),
        }
    }
}

/// Outcome of a single signal request
pub type SignalResult<T> = std::result::Result<T, SignalError>;

impl From<reqwest::Error> for SignalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SignalError::Decode(err.to_string())
        } else {
            SignalError::Network {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<ShapeError> for SignalError {
    fn from(err: ShapeError) -> Self {
        SignalError::Decode(err.to_string())
    }
}

/// Source of the three dashboard signals
///
/// The HTTP client is the production implementation; the orchestrator only
/// sees this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Quarterly financial quality metrics
    async fn financials(&self, ticker: &Ticker) -> SignalResult<FinancialSignal>;

    /// Quarterly narrative metrics
    async fn narrative(&self, ticker: &Ticker) -> SignalResult<NarrativeSignal>;

    /// Latest drift snapshot
    async fn drift(&self, ticker: &Ticker) -> SignalResult<DriftSignal>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignalError::Network {
            status: Some(503),
            message: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "network error (HTTP 503): service unavailable");
        assert_eq!(err.summary(), "network (HTTP 503)");

        let err = SignalError::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");
        assert_eq!(err.summary(), "network");
    }

    #[test]
    fn test_error_category() {
        let err = SignalError::Decode("missing field `drift_score`".to_string());
        assert_eq!(err.category(), ErrorCategory::Format);
        assert_eq!(err.status(), None);
        assert_eq!(err.summary(), "format");
    }

    #[test]
    fn test_shape_error_becomes_decode() {
        let shape = ShapeError {
            signal: SignalKind::Financial,
            field: "ocf_growth",
            expected: 4,
            found: 3,
        };
        let err: SignalError = shape.into();
        assert_eq!(err.category(), ErrorCategory::Format);
        assert!(err.to_string().contains("ocf_growth"));
    }
}
