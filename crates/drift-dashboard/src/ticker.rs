//! Normalized stock ticker

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest symbol accepted, leaving room for class and exchange suffixes
pub const MAX_TICKER_LEN: usize = 12;

/// A trimmed, uppercase ASCII ticker symbol such as `MSFT` or `BRK.B`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw user input into a ticker
    pub fn parse(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_ascii_uppercase();

        let valid = !symbol.is_empty()
            && symbol.len() <= MAX_TICKER_LEN
            && symbol.chars().any(|c| c.is_ascii_alphanumeric())
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        if valid {
            Ok(Self(symbol))
        } else {
            Err(DashboardError::InvalidTicker(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(Ticker::parse("  nvda ").unwrap().as_str(), "NVDA");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::parse("nvda").unwrap(), Ticker::parse("NVDA").unwrap());
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("AA PL").is_err());
        assert!(Ticker::parse("../etc").is_err());
        assert!(Ticker::parse("ABCDEFGHIJKLM").is_err());
        // must name a path segment of its own
        assert!(Ticker::parse(".").is_err());
        assert!(Ticker::parse("..").is_err());
        assert!(Ticker::parse("-").is_err());
        assert!(Ticker::parse("BF-B").is_ok());
    }

    #[test]
    fn test_serde_round_trip_normalizes() {
        let ticker: Ticker = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(ticker.to_string(), "MSFT");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"MSFT\"");
    }
}
