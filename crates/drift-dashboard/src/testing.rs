//! Fixtures shared by unit tests

use crate::api::{DriftSignal, FinancialSignal, NarrativeSignal, SignalError};
use crate::ticker::Ticker;

pub fn ticker(symbol: &str) -> Ticker {
    Ticker::parse(symbol).unwrap()
}

fn labels(quarters: &[&str]) -> Vec<String> {
    quarters.iter().map(|q| (*q).to_string()).collect()
}

pub fn financials_for(symbol: &str, quarters: &[&str], revenue: &[f64]) -> FinancialSignal {
    let n = quarters.len();
    FinancialSignal {
        ticker: symbol.to_string(),
        quarterly_index: labels(quarters),
        revenue_growth: revenue.to_vec(),
        ocf_growth: vec![0.04; n],
        accrual_ratio: vec![0.01; n],
        free_cash_flow: vec![1.2e9; n],
    }
}

pub fn narrative_for(symbol: &str, quarters: &[&str], optimism: &[f64]) -> NarrativeSignal {
    let n = optimism.len();
    NarrativeSignal {
        ticker: symbol.to_string(),
        quarterly_index: Some(labels(quarters)),
        optimism_score: optimism.to_vec(),
        risk_mentions: vec![4; n],
        forward_looking_density: vec![0.12; n],
        narrative_momentum: vec![0.05; n],
    }
}

/// Two quarters of financials, revenue growth 5% and 7%
pub fn financials(symbol: &str) -> FinancialSignal {
    financials_for(symbol, &["2024Q1", "2024Q2"], &[0.05, 0.07])
}

/// Narrative for the same two quarters, optimism 0.6 and 0.65
pub fn narrative(symbol: &str) -> NarrativeSignal {
    narrative_for(symbol, &["2024Q1", "2024Q2"], &[0.6, 0.65])
}

pub fn drift(symbol: &str) -> DriftSignal {
    DriftSignal {
        ticker: symbol.to_string(),
        quarter: "2024-Q2".to_string(),
        financial_momentum: 0.4,
        narrative_momentum: 0.7,
        drift_score: 0.3,
        explanation: "Narrative optimism is running ahead of financial momentum.".to_string(),
    }
}

pub fn outage() -> SignalError {
    SignalError::Network {
        status: Some(503),
        message: "Service Unavailable".to_string(),
    }
}
