//! Server quote sync
//!
//! Pulls a small page of posts from a placeholder HTTP API, maps them to
//! server-origin quotes and merges them into the live store.
//!
//! ## Flow
//!
//! 1. Fetch the batch without holding the store lock
//! 2. Lock the live store and merge (server wins on conflict)
//! 3. Persist only if something changed
//!
//! At most one sync runs at a time; a tick that fires while one is in
//! flight is skipped.
//!
//! ## Usage
//!
//! ```ignore
//! let source = HttpQuoteSource::new(&config.sync_url, config.sync_limit, config.sync_timeout())?;
//! let syncer = Arc::new(Syncer::new(source, config.sync_timeout()));
//! let handle = spawn_sync_poller(syncer, store, config.sync_interval());
//! ```

mod client;
mod poller;
mod syncer;

pub use client::{HttpQuoteSource, QuoteSource, RemotePost};
pub use poller::{spawn_sync_poller, SyncCommand, SyncEvent, SyncHandle};
pub use syncer::{SyncOutcome, Syncer};
