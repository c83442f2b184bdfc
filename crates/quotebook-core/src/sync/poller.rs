//! Periodic background sync
//!
//! A tokio task ticks on the configured interval (45 seconds by default)
//! and reports each result as an event.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::client::QuoteSource;
use super::syncer::{SyncOutcome, Syncer};
use crate::merge::MergeOutcome;
use crate::storage::KeyValueStore;
use crate::store::QuoteStore;

/// Commands sent to the sync task
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a sync now instead of waiting for the next tick
    SyncNow,
    /// Shutdown the sync task
    Shutdown,
}

/// Events from the sync task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Server quotes were added or updated
    Merged(MergeOutcome),
    /// Sync completed with nothing to change
    UpToDate,
    /// A previous sync was still running
    Skipped,
    /// Sync failed; `transient` is set for network failures the next tick
    /// retries, and clear when the merge could not be saved
    Failed { message: String, transient: bool },
}

/// Handle for controlling the background sync task
pub struct SyncHandle {
    pub command_tx: mpsc::Sender<SyncCommand>,
    pub event_rx: mpsc::Receiver<SyncEvent>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Request an immediate sync
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    /// Stop ticking and wait for the poller task to exit
    ///
    /// A sync already in flight is not cancelled; it finishes on its own.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn a background task that syncs every `interval`
///
/// The first sync happens one interval after spawning (or on `SyncNow`).
pub fn spawn_sync_poller<Src, S>(
    syncer: Arc<Syncer<Src>>,
    store: Arc<Mutex<QuoteStore<S>>>,
    interval: Duration,
) -> SyncHandle
where
    Src: QuoteSource + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    let task = tokio::spawn(sync_poller_task(
        syncer, store, interval, command_rx, event_tx,
    ));

    SyncHandle {
        command_tx,
        event_rx,
        task,
    }
}

async fn sync_poller_task<Src, S>(
    syncer: Arc<Syncer<Src>>,
    store: Arc<Mutex<QuoteStore<S>>>,
    interval: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<SyncEvent>,
) where
    Src: QuoteSource + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                spawn_tick(syncer.clone(), store.clone(), event_tx.clone());
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => {
                        spawn_tick(syncer.clone(), store.clone(), event_tx.clone());
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    debug!("Sync poller stopped");
}

/// Run one sync in its own task so a slow fetch never stalls the timer
fn spawn_tick<Src, S>(
    syncer: Arc<Syncer<Src>>,
    store: Arc<Mutex<QuoteStore<S>>>,
    event_tx: mpsc::Sender<SyncEvent>,
) where
    Src: QuoteSource + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
{
    tokio::spawn(async move {
        let event = match syncer.sync_once(&store).await {
            Ok(SyncOutcome::Merged(outcome)) if outcome.changed() => SyncEvent::Merged(outcome),
            Ok(SyncOutcome::Merged(_)) => SyncEvent::UpToDate,
            Ok(SyncOutcome::Skipped) => SyncEvent::Skipped,
            Err(e) => SyncEvent::Failed {
                transient: e.is_transient(),
                message: e.to_string(),
            },
        };
        let _ = event_tx.send(event).await;
    });
}
