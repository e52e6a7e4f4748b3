//! Quarter alignment of financial and narrative signals
//!
//! The two signals are produced independently and rarely cover the same
//! quarters. [`align`] merges them into one chronologically ordered series in
//! which a quarter missing from either side is an explicit `None`, never a
//! zero.

use crate::api::{
    FinancialPoint, FinancialSignal, NarrativePoint, NarrativeSignal, ShapeError, SignalKind,
};
use crate::quarter::{QuarterKey, same_quarter};
use std::collections::BTreeMap;
use thiserror::Error;

/// Precondition violations detected while aligning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// Arrays within one signal disagree in length
    #[error("malformed signal: {0}")]
    Shape(#[from] ShapeError),

    /// A signal lists the same quarter twice
    #[error("{signal} lists quarter {quarter} more than once")]
    DuplicateQuarter { signal: SignalKind, quarter: String },

    /// Narrative arrays carry no quarter labels and cannot be placed
    #[error("{narrative} unlabelled narrative quarters exceed {financial} financial quarters")]
    UnresolvedCoverage { narrative: usize, financial: usize },
}

/// One quarter of the aligned series
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRecord {
    pub quarter: String,
    pub financial: Option<FinancialPoint>,
    pub narrative: Option<NarrativePoint>,
}

impl AlignedRecord {
    /// Revenue growth in percent
    pub fn revenue_growth_pct(&self) -> Option<f64> {
        self.financial.map(|f| f.revenue_growth * 100.0)
    }

    /// Operating cash flow growth in percent
    pub fn ocf_growth_pct(&self) -> Option<f64> {
        self.financial.map(|f| f.ocf_growth * 100.0)
    }

    pub fn optimism(&self) -> Option<f64> {
        self.narrative.map(|n| n.optimism_score)
    }

    pub fn risk_mentions(&self) -> Option<u32> {
        self.narrative.map(|n| n.risk_mentions)
    }

    pub fn is_complete(&self) -> bool {
        self.financial.is_some() && self.narrative.is_some()
    }
}

/// Point of the financial momentum chart
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumPoint {
    pub quarter: String,
    pub revenue_pct: Option<f64>,
    pub ocf_pct: Option<f64>,
}

/// Point of the narrative sentiment chart
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentPoint {
    pub quarter: String,
    pub optimism: Option<f64>,
    pub risk_mentions: Option<u32>,
}

/// Chronologically ordered per-quarter records without duplicate quarters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    records: Vec<AlignedRecord>,
}

impl AlignedSeries {
    pub fn records(&self) -> &[AlignedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn quarters(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.quarter.as_str())
    }

    /// Record for `quarter`, matching either label spelling
    pub fn get(&self, quarter: &str) -> Option<&AlignedRecord> {
        self.records.iter().find(|r| same_quarter(&r.quarter, quarter))
    }

    /// Revenue and OCF growth, in percent
    pub fn momentum_chart(&self) -> Vec<MomentumPoint> {
        self.records
            .iter()
            .map(|r| MomentumPoint {
                quarter: r.quarter.clone(),
                revenue_pct: r.revenue_growth_pct(),
                ocf_pct: r.ocf_growth_pct(),
            })
            .collect()
    }

    /// Optimism score and risk mentions
    pub fn sentiment_chart(&self) -> Vec<SentimentPoint> {
        self.records
            .iter()
            .map(|r| SentimentPoint {
                quarter: r.quarter.clone(),
                optimism: r.optimism(),
                risk_mentions: r.risk_mentions(),
            })
            .collect()
    }
}

/// Quarter labels the narrative arrays describe
///
/// Embedded labels win. Without them the narrative is taken to cover the last
/// quarters of the financial index, by position in the order the service sent
/// them.
fn narrative_coverage(
    financial: &FinancialSignal,
    narrative: &NarrativeSignal,
) -> Result<Vec<String>, AlignmentError> {
    if let Some(quarters) = &narrative.quarterly_index {
        return Ok(quarters.clone());
    }

    let known = financial.quarterly_index.len();
    let needed = narrative.len();
    let Some(start) = known.checked_sub(needed) else {
        return Err(AlignmentError::UnresolvedCoverage {
            narrative: needed,
            financial: known,
        });
    };

    Ok(financial.quarterly_index[start..].to_vec())
}

fn index_by_quarter(
    signal: SignalKind,
    quarters: &[String],
) -> Result<BTreeMap<QuarterKey, usize>, AlignmentError> {
    let mut index = BTreeMap::new();
    for (position, label) in quarters.iter().enumerate() {
        if index.insert(QuarterKey::parse(label), position).is_some() {
            return Err(AlignmentError::DuplicateQuarter {
                signal,
                quarter: label.clone(),
            });
        }
    }
    Ok(index)
}

/// Merge financial and narrative signals over the union of their quarters
///
/// Output order is chronological regardless of the order quarters appear in
/// either input. Where both signals name a quarter with different spellings,
/// the financial label is kept.
pub fn align(
    financial: &FinancialSignal,
    narrative: &NarrativeSignal,
) -> Result<AlignedSeries, AlignmentError> {
    financial.validate()?;
    narrative.validate()?;

    let narrative_quarters = narrative_coverage(financial, narrative)?;
    let financial_index = index_by_quarter(SignalKind::Financial, &financial.quarterly_index)?;
    let narrative_index = index_by_quarter(SignalKind::Narrative, &narrative_quarters)?;

    let mut merged: BTreeMap<&QuarterKey, (&str, Option<usize>, Option<usize>)> = BTreeMap::new();
    for (key, &i) in &financial_index {
        merged.insert(key, (financial.quarterly_index[i].as_str(), Some(i), None));
    }
    for (key, &j) in &narrative_index {
        merged
            .entry(key)
            .or_insert((narrative_quarters[j].as_str(), None, None))
            .2 = Some(j);
    }

    let records = merged
        .into_values()
        .map(|(quarter, fin, nar)| AlignedRecord {
            quarter: quarter.to_string(),
            financial: fin.and_then(|i| financial.point(i)),
            narrative: nar.and_then(|j| narrative.point(j)),
        })
        .collect();

    Ok(AlignedSeries { records })
}
