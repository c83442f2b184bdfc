//! Sync command handlers

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::Mutex;

use quotebook_core::sync::{spawn_sync_poller, HttpQuoteSource, SyncEvent, SyncOutcome, Syncer};
use quotebook_core::Config;

use super::CliStore;
use crate::output::Output;

/// Fetch the server batch once and merge it
pub async fn sync(store: CliStore, config: &Config, output: &Output) -> Result<()> {
    let syncer = build_syncer(config)?;
    let store = Mutex::new(store);

    output.message(&format!("Syncing with {}...", config.sync_url));

    match syncer.sync_once(&store).await {
        Ok(SyncOutcome::Merged(outcome)) => output.print_merge(&outcome),
        // Nothing else in this process can be syncing
        Ok(SyncOutcome::Skipped) => output.message("Sync already in progress."),
        Err(e) => {
            output.warn("Failed to sync with server.");
            return Err(e).context("Sync failed");
        }
    }

    Ok(())
}

/// Sync periodically until interrupted
pub async fn watch(
    store: CliStore,
    config: &Config,
    interval: Option<u64>,
    output: &Output,
) -> Result<()> {
    let syncer = Arc::new(build_syncer(config)?);
    let store = Arc::new(Mutex::new(store));
    let interval = interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.sync_interval());

    output.message(&format!(
        "Syncing with {} every {}s. Press Ctrl-C to stop.",
        config.sync_url,
        interval.as_secs()
    ));

    let mut handle = spawn_sync_poller(syncer, store.clone(), interval);
    handle.sync_now().await;

    loop {
        tokio::select! {
            event = handle.event_rx.recv() => {
                let Some(event) = event else { break };
                report(&event, output);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    handle.shutdown().await;

    let store = store.lock().await;
    output.message(&format!("Stopped. {} quotes stored.", store.len()));
    Ok(())
}

fn build_syncer(config: &Config) -> Result<Syncer<HttpQuoteSource>> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebook config set sync_enabled true"
        );
    }

    let source = HttpQuoteSource::new(&config.sync_url, config.sync_limit, config.sync_timeout())
        .context("Failed to create sync client")?;

    Ok(Syncer::new(source, config.sync_timeout()))
}

fn report(event: &SyncEvent, output: &Output) {
    match event {
        SyncEvent::Merged(outcome) => output.print_merge(outcome),
        SyncEvent::UpToDate => output.message("Sync complete. No changes."),
        SyncEvent::Skipped => output.message("Previous sync still running, skipped."),
        SyncEvent::Failed {
            message,
            transient: true,
        } => output.warn(&format!(
            "Failed to sync with server, retrying next tick: {}",
            message
        )),
        SyncEvent::Failed { message, .. } => {
            output.warn(&format!("Could not save synced quotes: {}", message))
        }
    }
}
