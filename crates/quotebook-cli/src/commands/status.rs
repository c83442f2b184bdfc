//! Status command handler

use anyhow::Result;

use quotebook_core::{Config, FileStorage, Origin, Session};

use super::CliStore;
use crate::output::{Output, OutputFormat};

/// Show store, filter and sync status
pub fn show(
    store: &CliStore,
    session: &Session<FileStorage>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let stats = store.storage().stats();
    let server = store
        .quotes()
        .iter()
        .filter(|q| q.origin == Origin::Server)
        .count();
    let local = store.len() - server;
    let selection = store.effective_selection();
    let last = session.last();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "sync_enabled": config.sync_enabled,
                    "sync_url": config.sync_url,
                    "sync_interval_secs": config.sync_interval().as_secs(),
                    "filter": selection,
                    "last_viewed": last.as_ref().map(|l| &l.id),
                    "storage": {
                        "location": store.storage().dir(),
                        "entries": stats.entries,
                        "total_size": stats.total_size
                    },
                    "counts": {
                        "quotes": store.len(),
                        "local": local,
                        "server": server,
                        "categories": store.categories().len()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quotebook Status");
            println!("================");
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Server:   {}", config.sync_url);
            println!("  Interval: {}s", config.sync_interval().as_secs());
            println!();
            println!("Storage:");
            println!("  Location: {}", store.storage().dir().display());
            println!("  Size:     {}", stats.total_size_human());
            println!();
            println!("Contents:");
            println!("  Quotes:     {} ({} local, {} server)", store.len(), local, server);
            println!("  Categories: {}", store.categories().len());
            println!("  Filter:     {}", selection);
            if let Some(last) = last {
                println!("  Last viewed: {}", last.id);
            }
        }
    }

    Ok(())
}
