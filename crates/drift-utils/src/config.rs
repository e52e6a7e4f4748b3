//! Configuration management utilities
//!
//! Thin typed wrappers over environment variables. Unset and empty variables
//! are treated the same way so a blank line in a `.env` file does not
//! override a default.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Error raised while reading configuration from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read a non-empty, trimmed environment variable
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse an environment variable
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_string(key)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable() {
        assert_eq!(env_string("DRIFT_UTILS_TEST_SURELY_UNSET"), None);
        let parsed: Option<u64> = env_parse("DRIFT_UTILS_TEST_SURELY_UNSET").unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            key: "DRIFT_REQUEST_TIMEOUT_SECS".to_string(),
            value: "soon".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for DRIFT_REQUEST_TIMEOUT_SECS: \"soon\" (invalid digit found in string)"
        );
    }
}
