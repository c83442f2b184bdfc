//! Data models for Quotebook
//!
//! Defines the core data structures: Quote and its Origin.
//! The serialized shape is the `quotes.json` export format: camelCase
//! fields with `updatedAt` in epoch milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned when a quote is created without one
pub const DEFAULT_CATEGORY: &str = "General";

/// Category assigned to every quote merged from the server
pub const SERVER_CATEGORY: &str = "Server";

/// Where a quote came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Authored on this machine (or imported)
    #[default]
    Local,
    /// Merged from the remote server
    Server,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Local => write!(f, "local"),
            Origin::Server => write!(f, "server"),
        }
    }
}

/// A quote with its category and provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Unique, stable identifier
    pub id: String,
    /// The quote itself
    pub text: String,
    /// Category label
    pub category: String,
    /// When this quote was created or last overwritten
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    /// Provenance
    #[serde(alias = "source")]
    pub origin: Origin,
}

impl Quote {
    /// Create a locally authored quote with a fresh id
    ///
    /// An empty category falls back to [`DEFAULT_CATEGORY`].
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: generate_local_id(),
            text: text.into(),
            category: normalize_category(category.into()),
            updated_at: now_millis(),
            origin: Origin::Local,
        }
    }

    /// Create a server-origin quote from a remote record id
    pub fn from_server(remote_id: u64, text: impl Into<String>) -> Self {
        Self {
            id: server_id(remote_id),
            text: text.into(),
            category: SERVER_CATEGORY.to_string(),
            updated_at: now_millis(),
            origin: Origin::Server,
        }
    }

    /// Case-insensitive text+category comparison used for local dedup
    pub fn same_content_ignoring_case(&self, text: &str, category: &str) -> bool {
        self.text.to_lowercase() == text.to_lowercase()
            && self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Generate a fresh id for a locally authored quote
pub fn generate_local_id() -> String {
    format!("local-{}", Uuid::new_v4().simple())
}

/// Deterministic id for a quote derived from a remote record
pub fn server_id(remote_id: u64) -> String {
    format!("server-{}", remote_id)
}

/// Trim a category, falling back to the default when empty
pub fn normalize_category(category: String) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Current time truncated to millisecond precision
///
/// The interchange format stores Unix milliseconds, so timestamps are
/// kept at that precision to survive export/import unchanged.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("Simplicity is the soul of efficiency.", "Programming");
        assert!(quote.id.starts_with("local-"));
        assert_eq!(quote.category, "Programming");
        assert_eq!(quote.origin, Origin::Local);
    }

    #[test]
    fn test_quote_new_defaults_category() {
        let quote = Quote::new("Hello", "   ");
        assert_eq!(quote.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_local_ids_are_unique() {
        let a = Quote::new("A", "X");
        let b = Quote::new("A", "X");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_from_server() {
        let quote = Quote::from_server(7, "sunt aut facere");
        assert_eq!(quote.id, "server-7");
        assert_eq!(quote.category, SERVER_CATEGORY);
        assert_eq!(quote.origin, Origin::Server);
    }

    #[test]
    fn test_same_content_ignoring_case() {
        let quote = Quote::new("Talk is cheap", "Programming");
        assert!(quote.same_content_ignoring_case("TALK IS CHEAP", "programming"));
        assert!(!quote.same_content_ignoring_case("Talk is cheap", "Mindset"));
    }

    #[test]
    fn test_serialized_shape() {
        let quote = Quote::new("A", "X");
        let value = serde_json::to_value(&quote).unwrap();
        assert!(value.get("updatedAt").unwrap().is_i64());
        assert_eq!(value.get("origin").unwrap(), "local");
    }

    #[test]
    fn test_accepts_source_alias() {
        let json = r#"{"id":"server-1","text":"B","category":"Server","updatedAt":1700000000000,"source":"server"}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.origin, Origin::Server);
        assert_eq!(quote.updated_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_quote_serialization() {
        let quote = Quote::new("Small steps every day add up.", "Inspiration");
        let json = serde_json::to_string(&quote).unwrap();
        let deserialized: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(quote, deserialized);
    }
}
