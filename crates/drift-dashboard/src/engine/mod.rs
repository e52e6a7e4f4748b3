//! Fetch orchestration
//!
//! [`DashboardState`] is the reducer: every change goes through
//! `set_ticker`, `retry` or `settle`, which is where stale generations are
//! rejected. [`Orchestrator`] owns one state value, fires requests and feeds
//! their settlements back into it.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{Command, DashboardHandle, Orchestrator};
pub use state::{DashboardState, Generation, Settlement, SignalOutcome, Slot, Status};
