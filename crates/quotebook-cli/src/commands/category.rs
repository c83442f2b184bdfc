//! Category and filter command handlers

use anyhow::Result;

use quotebook_core::category::derive_with_counts;
use quotebook_core::{FileStorage, Session};

use super::CliStore;
use crate::output::Output;

/// List all categories with usage counts
pub fn list(store: &CliStore, output: &Output) -> Result<()> {
    let categories = derive_with_counts(store.quotes());
    output.print_categories(&categories, &store.effective_selection());
    Ok(())
}

/// Show or change the persisted category filter
///
/// Changing the filter shows a random quote from the new selection.
pub fn filter(
    store: &mut CliStore,
    session: &mut Session<FileStorage>,
    selection: Option<String>,
    output: &Output,
) -> Result<()> {
    let Some(selection) = selection else {
        let stored = store.restore_selection();
        let effective = store.effective_selection();
        if stored == effective {
            output.message(&format!("Filter: {}", effective));
        } else {
            output.message(&format!(
                "Filter: {} (saved '{}' no longer exists)",
                effective, stored
            ));
        }
        return Ok(());
    };

    store.persist_selection(&selection)?;
    output.success(&format!("Filter set to {}", selection));

    super::quote::random(store, session, None, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quotebook_core::QuoteStore;
    use tempfile::TempDir;

    #[test]
    fn test_filter_persists_selection() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let mut store = QuoteStore::load(FileStorage::new(temp_dir.path().join("data")));
        let mut session = Session::new(FileStorage::new(temp_dir.path().join("session")));

        filter(
            &mut store,
            &mut session,
            Some("Programming".to_string()),
            &output,
        )
        .unwrap();

        assert_eq!(store.restore_selection(), "Programming");
        let shown = session.last().unwrap();
        assert_eq!(store.get(&shown.id).unwrap().category, "Programming");
    }

    #[test]
    fn test_filter_rejects_unknown_category() {
        let temp_dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Quiet);
        let mut store = QuoteStore::load(FileStorage::new(temp_dir.path().join("data")));
        let mut session = Session::new(FileStorage::new(temp_dir.path().join("session")));

        let result = filter(&mut store, &mut session, Some("Nope".to_string()), &output);

        assert!(result.is_err());
        assert_eq!(store.restore_selection(), "all");
    }
}
