//! Signal payloads returned by the analytics service

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies one of the three signals fetched per ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Financial,
    Narrative,
    Drift,
}

impl SignalKind {
    /// All kinds, in display order
    pub const ALL: [SignalKind; 3] = [
        SignalKind::Financial,
        SignalKind::Narrative,
        SignalKind::Drift,
    ];

    /// Path segment of the endpoint serving this signal
    pub fn path(self) -> &'static str {
        match self {
            SignalKind::Financial => "financials",
            SignalKind::Narrative => "narrative",
            SignalKind::Drift => "drift",
        }
    }

    /// Whether the dashboard can reach `Ready` without this signal
    pub fn is_supplementary(self) -> bool {
        matches!(self, SignalKind::Drift)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}

/// A per-quarter array whose length disagrees with its signal's coverage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{signal} field `{field}` has {found} entries, expected {expected}")]
pub struct ShapeError {
    pub signal: SignalKind,
    pub field: &'static str,
    pub expected: usize,
    pub found: usize,
}

fn check_len(
    signal: SignalKind,
    field: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), ShapeError> {
    if expected == found {
        Ok(())
    } else {
        Err(ShapeError {
            signal,
            field,
            expected,
            found,
        })
    }
}

/// Quarterly financial quality and growth metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSignal {
    #[serde(default)]
    pub ticker: String,
    pub quarterly_index: Vec<String>,
    pub revenue_growth: Vec<f64>,
    pub ocf_growth: Vec<f64>,
    pub accrual_ratio: Vec<f64>,
    pub free_cash_flow: Vec<f64>,
}

/// Financial metrics of a single quarter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialPoint {
    pub revenue_growth: f64,
    pub ocf_growth: f64,
    pub accrual_ratio: f64,
    pub free_cash_flow: f64,
}

impl FinancialSignal {
    /// Check that every metric array covers every quarter
    pub fn validate(&self) -> Result<(), ShapeError> {
        let expected = self.quarterly_index.len();
        let kind = SignalKind::Financial;
        check_len(kind, "revenue_growth", expected, self.revenue_growth.len())?;
        check_len(kind, "ocf_growth", expected, self.ocf_growth.len())?;
        check_len(kind, "accrual_ratio", expected, self.accrual_ratio.len())?;
        check_len(kind, "free_cash_flow", expected, self.free_cash_flow.len())
    }

    pub fn len(&self) -> usize {
        self.quarterly_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quarterly_index.is_empty()
    }

    /// Metrics at position `index`, if every array reaches it
    pub fn point(&self, index: usize) -> Option<FinancialPoint> {
        Some(FinancialPoint {
            revenue_growth: *self.revenue_growth.get(index)?,
            ocf_growth: *self.ocf_growth.get(index)?,
            accrual_ratio: *self.accrual_ratio.get(index)?,
            free_cash_flow: *self.free_cash_flow.get(index)?,
        })
    }
}

/// Quarterly narrative metrics extracted from earnings call transcripts
///
/// The service does not always say which quarters the arrays describe. When
/// `quarterly_index` is absent the coverage is resolved against the financial
/// signal during alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSignal {
    #[serde(default)]
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarterly_index: Option<Vec<String>>,
    pub optimism_score: Vec<f64>,
    pub risk_mentions: Vec<u32>,
    pub forward_looking_density: Vec<f64>,
    pub narrative_momentum: Vec<f64>,
}

/// Narrative metrics of a single quarter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativePoint {
    pub optimism_score: f64,
    pub risk_mentions: u32,
    pub forward_looking_density: f64,
    pub narrative_momentum: f64,
}

impl NarrativeSignal {
    /// Check that every metric array has the same length, and matches the
    /// embedded quarter labels when present
    pub fn validate(&self) -> Result<(), ShapeError> {
        let kind = SignalKind::Narrative;
        let expected = match &self.quarterly_index {
            Some(quarters) => {
                check_len(kind, "optimism_score", quarters.len(), self.optimism_score.len())?;
                quarters.len()
            }
            None => self.optimism_score.len(),
        };
        check_len(kind, "risk_mentions", expected, self.risk_mentions.len())?;
        check_len(
            kind,
            "forward_looking_density",
            expected,
            self.forward_looking_density.len(),
        )?;
        check_len(kind, "narrative_momentum", expected, self.narrative_momentum.len())
    }

    pub fn len(&self) -> usize {
        self.optimism_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.optimism_score.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<NarrativePoint> {
        Some(NarrativePoint {
            optimism_score: *self.optimism_score.get(index)?,
            risk_mentions: *self.risk_mentions.get(index)?,
            forward_looking_density: *self.forward_looking_density.get(index)?,
            narrative_momentum: *self.narrative_momentum.get(index)?,
        })
    }
}

/// Latest drift between financial and narrative momentum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSignal {
    #[serde(default)]
    pub ticker: String,
    pub quarter: String,
    pub financial_momentum: f64,
    pub narrative_momentum: f64,
    pub drift_score: f64,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_financials() {
        let json = serde_json::json!({
            "ticker": "AAPL",
            "quarterly_index": ["2024Q1", "2024Q2"],
            "revenue_growth": [0.05, 0.07],
            "ocf_growth": [0.04, 0.09],
            "accrual_ratio": [0.01, -0.02],
            "free_cash_flow": [21.5e9, 23.0e9]
        });
        let signal: FinancialSignal = serde_json::from_value(json).unwrap();
        assert!(signal.validate().is_ok());
        assert_eq!(signal.len(), 2);
        assert_eq!(signal.point(1).unwrap().revenue_growth, 0.07);
        assert!(signal.point(2).is_none());
    }

    #[test]
    fn test_financial_length_mismatch() {
        let signal = FinancialSignal {
            ticker: "AAPL".to_string(),
            quarterly_index: vec!["2024Q1".to_string(), "2024Q2".to_string()],
            revenue_growth: vec![0.05, 0.07],
            ocf_growth: vec![0.04],
            accrual_ratio: vec![0.01, 0.02],
            free_cash_flow: vec![1.0, 2.0],
        };
        let err = signal.validate().unwrap_err();
        assert_eq!(err.field, "ocf_growth");
        assert_eq!((err.expected, err.found), (2, 1));
    }

    #[test]
    fn test_decode_narrative_without_quarters() {
        let json = serde_json::json!({
            "ticker": "AAPL",
            "optimism_score": [0.2, 0.4, 0.35],
            "risk_mentions": [5, 8, 7],
            "forward_looking_density": [0.12, 0.15, 0.14],
            "narrative_momentum": [0.1, 0.25, 0.15]
        });
        let signal: NarrativeSignal = serde_json::from_value(json).unwrap();
        assert!(signal.quarterly_index.is_none());
        assert!(signal.validate().is_ok());
        assert_eq!(signal.point(1).unwrap().risk_mentions, 8);
    }

    #[test]
    fn test_narrative_quarter_mismatch() {
        let signal = NarrativeSignal {
            ticker: "AAPL".to_string(),
            quarterly_index: Some(vec!["2024Q1".to_string()]),
            optimism_score: vec![0.2, 0.4],
            risk_mentions: vec![5, 8],
            forward_looking_density: vec![0.1, 0.2],
            narrative_momentum: vec![0.0, 0.1],
        };
        let err = signal.validate().unwrap_err();
        assert_eq!(err.signal, SignalKind::Narrative);
        assert_eq!(err.field, "optimism_score");
    }

    #[test]
    fn test_signal_kind_paths() {
        let paths: Vec<_> = SignalKind::ALL.iter().map(|kind| kind.path()).collect();
        assert_eq!(paths, vec!["financials", "narrative", "drift"]);
        assert!(SignalKind::Drift.is_supplementary());
        assert!(!SignalKind::Financial.is_supplementary());
    }
}
