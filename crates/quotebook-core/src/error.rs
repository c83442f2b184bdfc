//! Quote operation errors
//!
//! Every failure leaves the quote store in its last-known-good state.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by quote store, import and sync operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Empty required field or duplicate local quote
    #[error("{0}")]
    Validation(String),

    /// Import payload could not be parsed into quote records
    #[error("Invalid quote data: {0}")]
    Format(String),

    /// Remote fetch failed or timed out
    #[error("Sync failed: {0}")]
    Transport(String),

    /// Durable storage could not be read or written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuoteError {
    /// Transient failures that the periodic sync simply retries
    pub fn is_transient(&self) -> bool {
        matches!(self, QuoteError::Transport(_))
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            QuoteError::Transport(format!("request timed out: {}", error))
        } else if error.is_decode() {
            QuoteError::Transport(format!("unexpected response body: {}", error))
        } else {
            QuoteError::Transport(error.to_string())
        }
    }
}

/// Result type for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(QuoteError::Transport("offline".into()).is_transient());
        assert!(!QuoteError::Format("not json".into()).is_transient());
        assert!(!QuoteError::Validation("empty".into()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = QuoteError::Format("expected an array".into());
        assert_eq!(err.to_string(), "Invalid quote data: expected an array");

        let err = QuoteError::Validation("Please enter a quote.".into());
        assert_eq!(err.to_string(), "Please enter a quote.");
    }
}
