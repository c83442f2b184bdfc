//! Merge engine
//!
//! Reconciles a batch of server quotes into the local list by id. The
//! server is authoritative: on a content conflict its text and category
//! overwrite the local record in place, regardless of timestamps.

use serde::Serialize;
use tracing::debug;

use crate::models::{now_millis, Origin, Quote};

/// Counts produced by a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Records appended because their id was unknown
    pub added: usize,
    /// Existing records overwritten with server content
    pub updated: usize,
}

impl MergeOutcome {
    /// Whether the merge changed the list
    pub fn changed(&self) -> bool {
        self.added + self.updated > 0
    }
}

/// Merge `incoming` into `quotes`
///
/// Applying the same batch twice in a row yields a zero outcome the second
/// time.
pub fn merge(quotes: &mut Vec<Quote>, incoming: Vec<Quote>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for record in incoming {
        match quotes.iter_mut().find(|q| q.id == record.id) {
            None => {
                debug!("Merge: adding {}", record.id);
                quotes.push(record);
                outcome.added += 1;
            }
            Some(existing) => {
                if existing.text != record.text || existing.category != record.category {
                    debug!("Merge: server wins for {}", record.id);
                    existing.text = record.text;
                    existing.category = record.category;
                    existing.origin = Origin::Server;
                    existing.updated_at = now_millis();
                    outcome.updated += 1;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_quote(id: u64, text: &str) -> Quote {
        Quote::from_server(id, text)
    }

    #[test]
    fn test_merge_adds_unknown_ids() {
        let mut quotes = vec![Quote::new("A", "X")];
        let outcome = merge(&mut quotes, vec![server_quote(1, "B")]);

        assert_eq!(outcome, MergeOutcome { added: 1, updated: 0 });
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].id, "server-1");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut quotes = vec![Quote::new("A", "X")];
        let batch = vec![server_quote(1, "B"), server_quote(2, "C")];

        let first = merge(&mut quotes, batch.clone());
        assert_eq!(first, MergeOutcome { added: 2, updated: 0 });

        let second = merge(&mut quotes, batch);
        assert_eq!(second, MergeOutcome::default());
        assert!(!second.changed());
        assert_eq!(quotes.len(), 3);
    }

    #[test]
    fn test_merge_server_wins_in_place() {
        let mut local = Quote::new("Old text", "Notes");
        local.id = "server-3".to_string();
        let mut quotes = vec![Quote::new("A", "X"), local, Quote::new("C", "Y")];

        let outcome = merge(&mut quotes, vec![server_quote(3, "New text")]);

        assert_eq!(outcome, MergeOutcome { added: 0, updated: 1 });
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[1].id, "server-3");
        assert_eq!(quotes[1].text, "New text");
        assert_eq!(quotes[1].category, "Server");
        assert_eq!(quotes[1].origin, Origin::Server);
    }

    #[test]
    fn test_merge_category_change_counts_as_update() {
        let mut quotes = vec![server_quote(4, "Same")];
        let mut incoming = server_quote(4, "Same");
        incoming.category = "Archive".to_string();

        let outcome = merge(&mut quotes, vec![incoming]);
        assert_eq!(outcome.updated, 1);
        assert_eq!(quotes[0].category, "Archive");
    }

    #[test]
    fn test_merge_empty_batch() {
        let mut quotes = vec![Quote::new("A", "X")];
        let outcome = merge(&mut quotes, Vec::new());
        assert!(!outcome.changed());
        assert_eq!(quotes.len(), 1);
    }
}
