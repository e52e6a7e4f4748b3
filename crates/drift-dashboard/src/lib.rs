//! Narrative drift dashboard core
//!
//! This crate retrieves three independently produced signal sets for a stock
//! ticker and keeps them consistent for display:
//!
//! - Quarterly financial quality metrics (revenue / OCF growth, accruals, FCF)
//! - Quarterly narrative metrics extracted from earnings call transcripts
//! - The latest drift snapshot comparing financial and narrative momentum
//!
//! # Architecture
//!
//! - [`api`]: the stateless signal client behind the [`SignalSource`] trait
//! - [`align`]: merges financial and narrative quarters into one series
//! - [`engine`]: the generation-guarded state reducer and the orchestrator
//!   task that fires the three requests concurrently
//! - [`interface`]: renders orchestrator snapshots for a terminal
//!
//! # Example
//!
//! ```rust,ignore
//! use drift_dashboard::{DashboardConfig, Orchestrator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::from_env()?;
//!     let (handle, _task) = Orchestrator::from_config(&config)?.spawn();
//!
//!     handle.set_ticker("msft").await?;
//!     let state = handle.settled().await?;
//!     println!("{:?}", state.status());
//!     Ok(())
//! }
//! ```

pub mod align;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod quarter;
pub mod ticker;

#[cfg(test)]
mod testing;

pub use align::{AlignedRecord, AlignedSeries, AlignmentError, align};
pub use api::{
    DriftSignal, ErrorCategory, FinancialSignal, HttpSignalClient, NarrativeSignal, SignalError,
    SignalKind, SignalResult, SignalSource,
};
pub use config::DashboardConfig;
pub use engine::{
    DashboardHandle, DashboardState, Generation, Orchestrator, Settlement, SignalOutcome, Slot,
    Status,
};
pub use error::{DashboardError, Result};
pub use interface::{CompactFormatter, Formatter, FormatterFactory, Layout, TerminalFormatter};
pub use quarter::QuarterKey;
pub use ticker::Ticker;
