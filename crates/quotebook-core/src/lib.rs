//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a local-first
//! quote collection that periodically merges quotes from a remote server.
//!
//! # Architecture
//!
//! - **QuoteStore**: Ordered list of quotes, the single source of truth,
//!   persisted through an injected key-value storage collaborator
//! - **Merge**: Server batches are reconciled by id, server wins on conflict
//!
//! # Quick Start
//!
//! ```text
//! let storage = FileStorage::new(config.data_dir.clone());
//! let mut store = QuoteStore::load(storage);
//!
//! // Add a quote
//! store.add("Talk is cheap. Show me the code.", "Programming")?;
//!
//! // Query quotes
//! let categories = store.categories();
//! let programming = store.filtered("Programming");
//! ```
//!
//! # Modules
//!
//! - `store`: Quote store and persistence (main entry point)
//! - `models`: Quote and origin types
//! - `category`: Category index derivation
//! - `filter`: Category filter selection
//! - `merge`: Server batch reconciliation
//! - `serialization`: JSON export/import
//! - `session`: Session-scoped last-viewed pointer
//! - `storage`: Key-value storage collaborators
//! - `sync`: Remote quote source and periodic poller
//! - `config`: Application configuration

pub mod category;
pub mod config;
pub mod error;
pub mod filter;
pub mod merge;
pub mod models;
pub mod serialization;
pub mod session;
pub mod storage;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::{QuoteError, QuoteResult};
pub use merge::MergeOutcome;
pub use models::{Origin, Quote};
pub use session::{LastViewed, Session};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError, StorageStats};
pub use store::QuoteStore;
