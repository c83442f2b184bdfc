//! One-shot sync against the live store

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::client::QuoteSource;
use crate::error::{QuoteError, QuoteResult};
use crate::merge::MergeOutcome;
use crate::storage::KeyValueStore;
use crate::store::QuoteStore;

/// Result of a sync attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The batch was merged (possibly with no changes)
    Merged(MergeOutcome),
    /// Another sync was already in flight
    Skipped,
}

/// Runs syncs one at a time with a bounded fetch timeout
pub struct Syncer<Src> {
    source: Src,
    timeout: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when dropped
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<Src: QuoteSource> Syncer<Src> {
    pub fn new(source: Src, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a sync is currently running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch the server batch and merge it into `store`
    ///
    /// The store lock is only taken after the fetch completes, and the
    /// snapshot is re-read under it, so changes made while waiting on the
    /// network (here or through another handle on the same storage) are
    /// part of the merge. On a transport failure or timeout the store is
    /// not touched.
    pub async fn sync_once<S: KeyValueStore>(
        &self,
        store: &Mutex<QuoteStore<S>>,
    ) -> QuoteResult<SyncOutcome> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Sync already in flight, skipping");
            return Ok(SyncOutcome::Skipped);
        };

        let batch = match tokio::time::timeout(self.timeout, self.source.fetch_quotes()).await {
            Ok(Ok(batch)) => batch,
            Ok(Err(e)) => {
                warn!("Sync fetch failed: {}", e);
                return Err(e);
            }
            Err(_) => {
                warn!("Sync fetch timed out after {:?}", self.timeout);
                return Err(QuoteError::Transport(format!(
                    "no response within {} seconds",
                    self.timeout.as_secs_f32()
                )));
            }
        };

        let mut store = store.lock().await;
        // Other processes may have written the snapshot since we loaded it
        store.reload();
        let outcome = store.merge(batch)?;
        info!(
            "Sync complete: added={}, updated={}",
            outcome.added, outcome.updated
        );
        Ok(SyncOutcome::Merged(outcome))
    }
}
