//! Dashboard state and its transition functions

use crate::align::{AlignedSeries, AlignmentError, align};
use crate::api::{
    DriftSignal, FinancialSignal, NarrativeSignal, SignalError, SignalKind, SignalResult,
    SignalSource,
};
use crate::error::{DashboardError, Result};
use crate::ticker::Ticker;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{error, info, warn};

/// Tag distinguishing successive fetch cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of the current generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// No ticker selected yet
    Idle,
    /// Requests in flight, none settled
    Loading,
    /// Some, but not all, requests settled
    PartiallyLoaded,
    /// All settled; financials and narrative available
    Ready,
    /// All settled; financials or narrative missing
    Failed,
}

impl Status {
    /// Whether the current generation has nothing left in flight
    pub fn is_settled(self) -> bool {
        matches!(self, Status::Ready | Status::Failed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::PartiallyLoaded => "partially loaded",
            Status::Ready => "ready",
            Status::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Result slot of one signal within a generation
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Pending,
    Loaded(T),
    Failed(SignalError),
}

impl<T> Slot<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Slot::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Slot::Loaded(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SignalError> {
        match self {
            Slot::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<SignalResult<T>> for Slot<T> {
    fn from(result: SignalResult<T>) -> Self {
        match result {
            Ok(value) => Slot::Loaded(value),
            Err(err) => Slot::Failed(err),
        }
    }
}

/// Outcome of one signal request
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    Financial(SignalResult<FinancialSignal>),
    Narrative(SignalResult<NarrativeSignal>),
    Drift(SignalResult<DriftSignal>),
}

impl SignalOutcome {
    /// Run the request for `kind` against `source`
    pub async fn fetch(source: &dyn SignalSource, kind: SignalKind, ticker: &Ticker) -> Self {
        match kind {
            SignalKind::Financial => SignalOutcome::Financial(source.financials(ticker).await),
            SignalKind::Narrative => SignalOutcome::Narrative(source.narrative(ticker).await),
            SignalKind::Drift => SignalOutcome::Drift(source.drift(ticker).await),
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalOutcome::Financial(_) => SignalKind::Financial,
            SignalOutcome::Narrative(_) => SignalKind::Narrative,
            SignalOutcome::Drift(_) => SignalKind::Drift,
        }
    }

    pub fn error(&self) -> Option<&SignalError> {
        match self {
            SignalOutcome::Financial(r) => r.as_ref().err(),
            SignalOutcome::Narrative(r) => r.as_ref().err(),
            SignalOutcome::Drift(r) => r.as_ref().err(),
        }
    }
}

/// A settled request tagged with the generation that issued it
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub generation: Generation,
    pub outcome: SignalOutcome,
}

/// Everything the presentation layer may show
///
/// Only the transition methods below mutate it, and each settlement is
/// compared against the current generation before anything is written.
#[derive(Debug, Clone)]
pub struct DashboardState {
    ticker: Option<Ticker>,
    generation: Generation,
    status: Status,
    financial: Slot<FinancialSignal>,
    narrative: Slot<NarrativeSignal>,
    drift: Slot<DriftSignal>,
    series: Option<AlignedSeries>,
    alignment_error: Option<AlignmentError>,
    stale_discarded: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            ticker: None,
            generation: Generation::default(),
            status: Status::Idle,
            financial: Slot::Pending,
            narrative: Slot::Pending,
            drift: Slot::Pending,
            series: None,
            alignment_error: None,
            stale_discarded: 0,
            updated_at: None,
        }
    }

    pub fn ticker(&self) -> Option<&Ticker> {
        self.ticker.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn financial(&self) -> &Slot<FinancialSignal> {
        &self.financial
    }

    pub fn narrative(&self) -> &Slot<NarrativeSignal> {
        &self.narrative
    }

    pub fn drift(&self) -> &Slot<DriftSignal> {
        &self.drift
    }

    /// Aligned series of the current generation, once both sides loaded
    pub fn series(&self) -> Option<&AlignedSeries> {
        self.series.as_ref()
    }

    pub fn alignment_error(&self) -> Option<&AlignmentError> {
        self.alignment_error.as_ref()
    }

    /// Number of settlements rejected because their generation was superseded
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn slot_settled(&self, kind: SignalKind) -> bool {
        match kind {
            SignalKind::Financial => self.financial.is_settled(),
            SignalKind::Narrative => self.narrative.is_settled(),
            SignalKind::Drift => self.drift.is_settled(),
        }
    }

    fn slot_loaded(&self, kind: SignalKind) -> bool {
        match kind {
            SignalKind::Financial => self.financial.is_loaded(),
            SignalKind::Narrative => self.narrative.is_loaded(),
            SignalKind::Drift => self.drift.is_loaded(),
        }
    }

    fn slot_error(&self, kind: SignalKind) -> Option<&SignalError> {
        match kind {
            SignalKind::Financial => self.financial.error(),
            SignalKind::Narrative => self.narrative.error(),
            SignalKind::Drift => self.drift.error(),
        }
    }

    /// Number of the three slots that have settled
    pub fn settled_count(&self) -> usize {
        SignalKind::ALL
            .into_iter()
            .filter(|kind| self.slot_settled(*kind))
            .count()
    }

    pub fn all_settled(&self) -> bool {
        self.settled_count() == SignalKind::ALL.len()
    }

    /// Every non-supplementary signal loaded, and financials aligned with narrative
    pub fn required_loaded(&self) -> bool {
        SignalKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_supplementary())
            .all(|kind| self.slot_loaded(kind))
            && self.alignment_error.is_none()
    }

    /// Signals without a payload, with the error when one was reported
    pub fn missing(&self) -> Vec<(SignalKind, Option<&SignalError>)> {
        SignalKind::ALL
            .into_iter()
            .filter(|kind| !self.slot_loaded(*kind))
            .map(|kind| (kind, self.slot_error(kind)))
            .collect()
    }

    /// Select a ticker, starting a new generation if it changed
    ///
    /// Returns `None` when the ticker equals the current one.
    pub fn set_ticker(&mut self, ticker: Ticker) -> Option<Generation> {
        if self.ticker.as_ref() == Some(&ticker) {
            return None;
        }
        Some(self.begin(ticker))
    }

    /// Start a new generation for the current ticker
    pub fn retry(&mut self) -> Option<(Ticker, Generation)> {
        let ticker = self.ticker.clone()?;
        let generation = self.begin(ticker.clone());
        Some((ticker, generation))
    }

    fn begin(&mut self, ticker: Ticker) -> Generation {
        self.generation = self.generation.next();
        info!(%ticker, generation = %self.generation, "Starting fetch generation");

        self.ticker = Some(ticker);
        self.status = Status::Loading;
        self.financial = Slot::Pending;
        self.narrative = Slot::Pending;
        self.drift = Slot::Pending;
        self.series = None;
        self.alignment_error = None;
        self.updated_at = Some(Utc::now());
        self.generation
    }

    /// Admit a settled request
    ///
    /// Settlements from any generation other than the current one are
    /// rejected with [`DashboardError::StaleResult`] and leave the payload
    /// slots untouched. Each slot settles at most once per generation; a
    /// second settlement is rejected with [`DashboardError::AlreadySettled`].
    pub fn settle(&mut self, settlement: Settlement) -> Result<Status> {
        if settlement.generation != self.generation {
            self.stale_discarded += 1;
            return Err(DashboardError::StaleResult {
                generation: settlement.generation,
                current: self.generation,
            });
        }

        let kind = settlement.outcome.kind();
        if self.slot_settled(kind) {
            return Err(DashboardError::AlreadySettled {
                signal: kind,
                generation: self.generation,
            });
        }

        if let Some(err) = settlement.outcome.error() {
            warn!(
                signal = %kind,
                generation = %self.generation,
                error = %err,
                "Signal request failed"
            );
        }

        match settlement.outcome {
            SignalOutcome::Financial(result) => self.financial = result.into(),
            SignalOutcome::Narrative(result) => self.narrative = result.into(),
            SignalOutcome::Drift(result) => self.drift = result.into(),
        }

        if kind != SignalKind::Drift {
            self.realign();
        }

        self.status = self.derive_status();
        self.updated_at = Some(Utc::now());
        Ok(self.status)
    }

    fn realign(&mut self) {
        let (Slot::Loaded(financial), Slot::Loaded(narrative)) = (&self.financial, &self.narrative)
        else {
            self.series = None;
            return;
        };

        match align(financial, narrative) {
            Ok(series) => {
                self.series = Some(series);
                self.alignment_error = None;
            }
            Err(err) => {
                error!(
                    generation = %self.generation,
                    error = %err,
                    "Financial and narrative signals cannot be aligned"
                );
                self.series = None;
                self.alignment_error = Some(err);
            }
        }
    }

    fn derive_status(&self) -> Status {
        match self.settled_count() {
            0 => Status::Loading,
            n if n < SignalKind::ALL.len() => Status::PartiallyLoaded,
            _ if self.required_loaded() => Status::Ready,
            _ => Status::Failed,
        }
    }
}
