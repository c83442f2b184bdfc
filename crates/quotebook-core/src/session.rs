//! Session-scoped last-viewed pointer
//!
//! Kept in its own short-lived storage so it never becomes part of the
//! durable quote snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{now_millis, Quote};
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key for the last-viewed pointer
pub const LAST_VIEWED_KEY: &str = "last_viewed.json";

/// Reference to the most recently displayed quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastViewed {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub when: DateTime<Utc>,
}

/// Session state over a short-lived key-value storage
pub struct Session<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Remember `quote` as the last one shown
    pub fn record(&mut self, quote: &Quote) -> StorageResult<()> {
        let pointer = LastViewed {
            id: quote.id.clone(),
            when: now_millis(),
        };
        // Serializing a string and a timestamp cannot fail
        let json = serde_json::to_string(&pointer).unwrap_or_default();
        self.storage.set(LAST_VIEWED_KEY, &json)
    }

    /// The last-viewed pointer, if one is recorded and readable
    pub fn last(&self) -> Option<LastViewed> {
        let raw = match self.storage.get(LAST_VIEWED_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read session pointer: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }

    /// Forget the last-viewed pointer
    pub fn clear(&mut self) -> StorageResult<()> {
        self.storage.remove(LAST_VIEWED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_record_and_last() {
        let mut session = Session::new(MemoryStorage::new());
        assert!(session.last().is_none());

        let quote = Quote::new("Talk is cheap.", "Programming");
        session.record(&quote).unwrap();

        let last = session.last().unwrap();
        assert_eq!(last.id, quote.id);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new(MemoryStorage::new());
        session.record(&Quote::new("A", "X")).unwrap();
        session.clear().unwrap();
        assert!(session.last().is_none());
    }

    #[test]
    fn test_unparseable_pointer_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage.set(LAST_VIEWED_KEY, "{broken").unwrap();
        let session = Session::new(storage);
        assert!(session.last().is_none());
    }
}
