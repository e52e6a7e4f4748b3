//! Ticker-keyed concurrent fetch orchestrator

use super::state::{DashboardState, Generation, Settlement, SignalOutcome, Status};
use crate::api::{HttpSignalClient, SignalKind, SignalSource};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::ticker::Ticker;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, info};

/// Capacity of the command queue feeding a spawned orchestrator
const COMMAND_BUFFER: usize = 32;

/// Request sent to a spawned orchestrator
#[derive(Debug)]
pub enum Command {
    SetTicker {
        raw: String,
        reply: oneshot::Sender<Result<Option<Generation>>>,
    },
    Retry {
        reply: oneshot::Sender<Option<Generation>>,
    },
    Shutdown,
}

/// Owner of the dashboard state
///
/// Each generation fires the three signal requests as independent tasks.
/// Their settlements come back over a channel and are applied one at a time,
/// so the generation check and the slot write can never interleave with a
/// ticker change.
pub struct Orchestrator {
    source: Arc<dyn SignalSource>,
    state: DashboardState,
    settlements_tx: mpsc::UnboundedSender<Settlement>,
    settlements_rx: mpsc::UnboundedReceiver<Settlement>,
    snapshots: watch::Sender<DashboardState>,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn SignalSource>) -> Self {
        let (settlements_tx, settlements_rx) = mpsc::unbounded_channel();
        let state = DashboardState::new();
        let (snapshots, _) = watch::channel(state.clone());

        Self {
            source,
            state,
            settlements_tx,
            settlements_rx,
            snapshots,
        }
    }

    /// Orchestrator backed by the HTTP signal client
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let client = HttpSignalClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Receiver notified with a fresh snapshot after every transition
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.snapshots.subscribe()
    }

    /// Normalize `raw` and, if it names a different ticker, start fetching it
    ///
    /// Must be called within a tokio runtime. Returns the new generation, or
    /// `None` when the ticker is unchanged.
    pub fn set_ticker(&mut self, raw: &str) -> Result<Option<Generation>> {
        let ticker = Ticker::parse(raw)?;
        let Some(generation) = self.state.set_ticker(ticker.clone()) else {
            debug!(%ticker, "Ticker unchanged, keeping current generation");
            return Ok(None);
        };

        self.dispatch(&ticker, generation);
        self.publish();
        Ok(Some(generation))
    }

    /// Refetch the current ticker under a new generation
    pub fn retry(&mut self) -> Option<Generation> {
        let (ticker, generation) = self.state.retry()?;
        self.dispatch(&ticker, generation);
        self.publish();
        Some(generation)
    }

    /// Apply one settlement and publish the resulting snapshot
    pub fn apply(&mut self, settlement: Settlement) -> Result<Status> {
        let kind = settlement.outcome.kind();
        let result = self.state.settle(settlement);

        match &result {
            Ok(status) => info!(
                signal = %kind,
                generation = %self.state.generation(),
                %status,
                "Signal settled"
            ),
            Err(err) => debug!(signal = %kind, error = %err, "Discarding settlement"),
        }

        self.publish();
        result
    }

    /// Wait for the next request to settle and apply it
    pub async fn next_settlement(&mut self) -> Result<Status> {
        let settlement = self
            .settlements_rx
            .recv()
            .await
            .ok_or(DashboardError::Closed)?;
        self.apply(settlement)
    }

    fn dispatch(&self, ticker: &Ticker, generation: Generation) {
        for kind in SignalKind::ALL {
            let source = Arc::clone(&self.source);
            let ticker = ticker.clone();
            let settlements = self.settlements_tx.clone();
            let span = debug_span!("signal_fetch", %ticker, %generation, signal = %kind);

            tokio::spawn(
                async move {
                    let outcome = SignalOutcome::fetch(source.as_ref(), kind, &ticker).await;
                    debug!(ok = outcome.error().is_none(), "Signal request completed");
                    if settlements.send(Settlement { generation, outcome }).is_err() {
                        debug!("Orchestrator dropped, settlement discarded");
                    }
                }
                .instrument(span),
            );
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.clone());
    }

    /// Serve commands and settlements until shut down
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SetTicker { raw, reply }) => {
                        let _ = reply.send(self.set_ticker(&raw));
                    }
                    Some(Command::Retry { reply }) => {
                        let _ = reply.send(self.retry());
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(settlement) = self.settlements_rx.recv() => {
                    let _ = self.apply(settlement);
                }
            }
        }
        info!("Dashboard orchestrator stopped");
    }

    /// Move the orchestrator onto its own task
    pub fn spawn(self) -> (DashboardHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let handle = DashboardHandle {
            commands,
            snapshots: self.subscribe(),
        };
        let task = tokio::spawn(self.run(receiver));
        (handle, task)
    }
}

/// Cloneable access to a spawned orchestrator
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<DashboardState>,
}

impl DashboardHandle {
    pub async fn set_ticker(&self, raw: impl Into<String>) -> Result<Option<Generation>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::SetTicker {
            raw: raw.into(),
            reply,
        })
        .await?;
        response.await.map_err(|_| DashboardError::Closed)?
    }

    pub async fn retry(&self) -> Result<Option<Generation>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Retry { reply }).await?;
        response.await.map_err(|_| DashboardError::Closed)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DashboardError::Closed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DashboardState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&DashboardState) -> bool,
    ) -> Result<DashboardState> {
        let mut snapshots = self.snapshots.clone();
        let state = snapshots
            .wait_for(|state| predicate(state))
            .await
            .map_err(|_| DashboardError::Closed)?;
        Ok(state.clone())
    }

    /// Wait until the current generation is `Ready` or `Failed`
    pub async fn settled(&self) -> Result<DashboardState> {
        self.wait_for(|state| state.status().is_settled()).await
    }
}
