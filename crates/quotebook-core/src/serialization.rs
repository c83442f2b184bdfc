//! JSON export and import
//!
//! Export writes the full ordered list as a pretty-printed JSON array.
//! Import accepts the same format, plus the looser records older files
//! carry: only `text` is required, everything else gets a default.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::{QuoteError, QuoteResult};
use crate::models::{generate_local_id, normalize_category, now_millis, Origin, Quote};

/// Default file name for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// A quote-shaped record as found in an import file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "source")]
    origin: Option<Origin>,
}

/// Render quotes as a pretty-printed JSON array
pub fn export_all(quotes: &[Quote]) -> QuoteResult<String> {
    serde_json::to_string_pretty(quotes).map_err(|e| QuoteError::Format(e.to_string()))
}

/// Parse an import payload into quotes
///
/// Fails as a whole if any record is malformed. Ids already used by
/// `existing`, or by an earlier record in the same payload, are replaced
/// with fresh ones.
pub fn parse_import(text: &str, existing: &[Quote]) -> QuoteResult<Vec<Quote>> {
    let records: Vec<ImportRecord> = serde_json::from_str(text)
        .map_err(|e| QuoteError::Format(format!("expected a JSON array of quotes ({})", e)))?;

    let mut taken: HashSet<String> = existing.iter().map(|q| q.id.clone()).collect();
    let mut quotes = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let text = record.text.trim();
        if text.is_empty() {
            return Err(QuoteError::Format(format!(
                "record {} has an empty text field",
                index
            )));
        }

        let id = match record.id {
            Some(id) if !id.trim().is_empty() && !taken.contains(&id) => id,
            Some(id) if !id.trim().is_empty() => {
                let fresh = generate_local_id();
                debug!("Import: id {} already in use, assigned {}", id, fresh);
                fresh
            }
            _ => generate_local_id(),
        };
        taken.insert(id.clone());

        quotes.push(Quote {
            id,
            text: text.to_string(),
            category: normalize_category(record.category.unwrap_or_default()),
            updated_at: record.updated_at.unwrap_or_else(now_millis),
            origin: record.origin.unwrap_or_default(),
        });
    }

    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_CATEGORY;

    #[test]
    fn test_export_is_pretty_json_array() {
        let quotes = vec![Quote::new("A", "X"), Quote::new("B", "Y")];
        let text = export_all(&quotes).unwrap();

        assert!(text.starts_with('['));
        assert!(text.contains("\n  "));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_export_then_parse_round_trips() {
        let mut server = Quote::from_server(1, "sunt aut facere");
        server.category = "Server".to_string();
        let quotes = vec![Quote::new("A", "X"), server, Quote::new("C", "")];

        let text = export_all(&quotes).unwrap();
        let parsed = parse_import(&text, &[]).unwrap();

        assert_eq!(parsed, quotes);
    }

    #[test]
    fn test_parse_fills_defaults() {
        let parsed = parse_import(r#"[{"text":"Hello"}]"#, &[]).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "Hello");
        assert_eq!(parsed[0].category, DEFAULT_CATEGORY);
        assert!(parsed[0].id.starts_with("local-"));
        assert_eq!(parsed[0].origin, Origin::Local);
    }

    #[test]
    fn test_parse_legacy_export() {
        let text = r#"[
            {"id":"local-1700000000000-abc123","text":"Talk is cheap.","category":"Programming","updatedAt":1700000000000,"source":"local"}
        ]"#;
        let parsed = parse_import(text, &[]).unwrap();
        assert_eq!(parsed[0].id, "local-1700000000000-abc123");
        assert_eq!(parsed[0].updated_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_import("not json", &[]).unwrap_err();
        assert!(matches!(err, QuoteError::Format(_)));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_import(r#"{"text":"Hello"}"#, &[]).unwrap_err();
        assert!(matches!(err, QuoteError::Format(_)));
    }

    #[test]
    fn test_parse_rejects_missing_text() {
        let err = parse_import(r#"[{"text":"ok"},{"category":"X"}]"#, &[]).unwrap_err();
        assert!(matches!(err, QuoteError::Format(_)));
    }

    #[test]
    fn test_parse_rejects_blank_text() {
        let err = parse_import(r#"[{"text":"   "}]"#, &[]).unwrap_err();
        assert!(matches!(err, QuoteError::Format(_)));
    }

    #[test]
    fn test_parse_reassigns_colliding_ids() {
        let existing = vec![Quote::from_server(1, "B")];
        let text = r#"[{"id":"server-1","text":"B"},{"id":"x","text":"C"},{"id":"x","text":"D"}]"#;

        let parsed = parse_import(text, &existing).unwrap();

        assert_ne!(parsed[0].id, "server-1");
        assert_eq!(parsed[1].id, "x");
        assert_ne!(parsed[2].id, "x");
        assert_ne!(parsed[0].id, parsed[2].id);
    }

    #[test]
    fn test_parse_trims_text() {
        let parsed = parse_import(r#"[{"text":"  Hello \n"}]"#, &[]).unwrap();
        assert_eq!(parsed[0].text, "Hello");
    }
}
