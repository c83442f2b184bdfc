//! Storage layer
//!
//! Quote snapshots, the filter selection and the session pointer all live
//! behind a minimal key-value capability, so the store never touches the
//! filesystem directly.
//!
//! ## Collaborators
//!
//! - **FileStorage**: one file per key inside a directory, atomic writes
//! - **MemoryStorage**: in-process map, used for tests and scratch sessions

mod error;
mod file;
mod memory;

pub use error::{StorageError, StorageResult};
pub use file::{FileStorage, StorageStats};
pub use memory::MemoryStorage;

/// Minimal key-value capability injected into the quote store
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
