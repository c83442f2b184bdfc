//! Command handlers

pub mod category;
pub mod config;
pub mod quote;
pub mod status;
pub mod sync;
pub mod transfer;

use quotebook_core::{Config, FileStorage, QuoteStore, Session};

/// Store backed by the configured data directory
pub type CliStore = QuoteStore<FileStorage>;

/// Open the quote store for `config`
pub fn open_store(config: &Config) -> CliStore {
    QuoteStore::load(FileStorage::new(&config.data_dir))
}

/// Open the session pointer for `config`
pub fn open_session(config: &Config) -> Session<FileStorage> {
    Session::new(FileStorage::new(&config.session_dir))
}
