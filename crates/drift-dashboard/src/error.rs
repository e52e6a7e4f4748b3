//! Error types for dashboard operations

use crate::align::AlignmentError;
use crate::api::{SignalError, SignalKind};
use crate::engine::Generation;
use thiserror::Error;

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Ticker input was empty or contained unsupported characters
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A signal request failed
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// Financial and narrative signals could not be aligned
    #[error("Alignment precondition violated: {0}")]
    Alignment(#[from] AlignmentError),

    /// A settlement arrived for a superseded generation and was discarded
    #[error("Stale result from generation {generation} (current {current})")]
    StaleResult {
        generation: Generation,
        current: Generation,
    },

    /// A slot of the current generation received a second settlement
    #[error("{signal} already settled for generation {generation}")]
    AlreadySettled {
        signal: SignalKind,
        generation: Generation,
    },

    /// The orchestrator task is no longer running
    #[error("Dashboard orchestrator has shut down")]
    Closed,
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<drift_utils::ConfigError> for DashboardError {
    fn from(err: drift_utils::ConfigError) -> Self {
        DashboardError::ConfigError(err.to_string())
    }
}

impl DashboardError {
    /// Whether this error is the internal stale-result discard signal
    pub fn is_stale(&self) -> bool {
        matches!(self, DashboardError::StaleResult { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::InvalidTicker("BRK/B".to_string());
        assert_eq!(err.to_string(), "Invalid ticker: \"BRK/B\"");

        let err = DashboardError::StaleResult {
            generation: Generation::new(2),
            current: Generation::new(3),
        };
        assert_eq!(err.to_string(), "Stale result from generation 2 (current 3)");
        assert!(err.is_stale());
    }

    #[test]
    fn test_signal_error_is_transparent() {
        let err: DashboardError = SignalError::Decode("missing field `quarter`".to_string()).into();
        assert_eq!(err.to_string(), "decode error: missing field `quarter`");
        assert!(!err.is_stale());
    }
}
