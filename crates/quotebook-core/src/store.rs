//! Quote store
//!
//! The `QuoteStore` owns the ordered quote list and writes a full snapshot
//! to its storage collaborator after every mutation. Each mutation builds
//! the next list, persists it, and only then swaps it in, so a failed
//! write leaves memory and disk at the last-known-good state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::load(FileStorage::new(&config.data_dir));
//!
//! store.add("Talk is cheap. Show me the code.", "Programming")?;
//!
//! let selection = store.effective_selection();
//! let quote = store.random(&selection);
//! ```

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::category;
use crate::error::{QuoteError, QuoteResult};
use crate::filter;
use crate::merge::{self, MergeOutcome};
use crate::models::{normalize_category, Quote};
use crate::serialization;
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Storage key for the durable quote snapshot
pub const QUOTES_KEY: &str = "quotes.json";

/// Storage key for the persisted filter selection
pub const FILTER_KEY: &str = "last_filter";

/// Quotes a fresh store starts with
const SEED_QUOTES: &[(&str, &str)] = &[
    (
        "The only way to do great work is to love what you do.",
        "Inspiration",
    ),
    ("Simplicity is the soul of efficiency.", "Programming"),
    (
        "Whether you think you can, or you think you can't, you're right.",
        "Mindset",
    ),
    ("Talk is cheap. Show me the code.", "Programming"),
    ("Small steps every day add up to big results.", "Inspiration"),
];

/// Build the seed set with fresh ids
pub fn seed_quotes() -> Vec<Quote> {
    SEED_QUOTES
        .iter()
        .map(|(text, category)| Quote::new(*text, *category))
        .collect()
}

/// Ordered quote list backed by a key-value storage
pub struct QuoteStore<S: KeyValueStore> {
    quotes: Vec<Quote>,
    storage: S,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Load the store from its durable snapshot
    ///
    /// A missing or unparseable snapshot is replaced by the seed set, which
    /// is written back. Never fails; problems are logged.
    pub fn load(storage: S) -> Self {
        let mut store = Self {
            quotes: Vec::new(),
            storage,
        };

        if let Some(quotes) = store.read_snapshot() {
            debug!("Loaded {} quotes from snapshot", quotes.len());
            store.quotes = quotes;
            return store;
        }

        info!("Initializing quote store with seed quotes");
        store.quotes = seed_quotes();
        if let Err(e) = store.save() {
            warn!("Failed to write seed snapshot: {}", e);
        }
        store
    }

    fn read_snapshot(&self) -> Option<Vec<Quote>> {
        let raw = match self.storage.get(QUOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read saved quotes; falling back to defaults: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(quotes) => Some(quotes),
            Err(e) => {
                warn!("Failed to parse saved quotes; falling back to defaults: {}", e);
                None
            }
        }
    }

    /// Re-read the durable snapshot, picking up writes made by other handles
    ///
    /// Keeps the in-memory list when the snapshot is missing or unreadable.
    /// Returns whether the list was replaced.
    pub fn reload(&mut self) -> bool {
        match self.read_snapshot() {
            Some(quotes) => {
                debug!("Reloaded {} quotes from snapshot", quotes.len());
                self.quotes = quotes;
                true
            }
            None => false,
        }
    }

    /// Overwrite the durable snapshot with the current list
    pub fn save(&mut self) -> StorageResult<()> {
        write_snapshot(&mut self.storage, &self.quotes)
    }

    /// Persist `next` and make it the current list
    fn commit(&mut self, next: Vec<Quote>) -> QuoteResult<()> {
        write_snapshot(&mut self.storage, &next)?;
        self.quotes = next;
        Ok(())
    }

    // ==================== Authoring ====================

    /// Add a locally authored quote
    ///
    /// `text` is trimmed and must not be empty; an empty `category` becomes
    /// "General". A quote with the same text and category (ignoring case)
    /// is rejected.
    pub fn add(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::Validation("Please enter a quote.".to_string()));
        }
        let category = normalize_category(category.to_string());

        if self
            .quotes
            .iter()
            .any(|q| q.same_content_ignoring_case(text, &category))
        {
            return Err(QuoteError::Validation(
                "That quote already exists in this category.".to_string(),
            ));
        }

        let quote = Quote::new(text, category);
        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next)?;

        info!("Added quote {}", quote.id);
        Ok(quote)
    }

    /// Clear the snapshot and filter selection, then reseed
    pub fn reset(&mut self) -> QuoteResult<()> {
        self.storage.remove(QUOTES_KEY)?;
        self.storage.remove(FILTER_KEY)?;
        self.commit(seed_quotes())?;
        info!("Quote store reset to defaults");
        Ok(())
    }

    // ==================== Queries ====================

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Find a quote by id
    pub fn get(&self, id: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Current category index
    pub fn categories(&self) -> Vec<String> {
        category::derive(&self.quotes)
    }

    /// Quotes matching `selection`
    pub fn filtered(&self, selection: &str) -> Vec<&Quote> {
        filter::apply(&self.quotes, selection)
    }

    /// A uniformly random quote matching `selection`
    pub fn random(&self, selection: &str) -> Option<&Quote> {
        self.filtered(selection)
            .choose(&mut rand::thread_rng())
            .copied()
    }

    // ==================== Filter selection ====================

    /// Persist the chosen category
    ///
    /// Only "all" or a current category may be chosen.
    pub fn persist_selection(&mut self, selection: &str) -> QuoteResult<()> {
        if !filter::is_selectable(selection, &self.categories()) {
            return Err(QuoteError::Validation(format!(
                "Unknown category: {}",
                selection
            )));
        }
        self.storage.set(FILTER_KEY, selection)?;
        Ok(())
    }

    /// The stored selection exactly as persisted, "all" when none is stored
    pub fn restore_selection(&self) -> String {
        match self.storage.get(FILTER_KEY) {
            Ok(Some(selection)) if !selection.is_empty() => selection,
            Ok(_) => filter::ALL.to_string(),
            Err(e) => {
                warn!("Failed to read filter selection: {}", e);
                filter::ALL.to_string()
            }
        }
    }

    /// The selection to filter with
    ///
    /// A stored category that no longer exists yields "all"; the stored
    /// value itself is left alone.
    pub fn effective_selection(&self) -> String {
        let stored = self.restore_selection();
        filter::effective(&stored, &self.categories()).to_string()
    }

    // ==================== Merge / Import / Export ====================

    /// Merge a server batch; persists only when something changed
    pub fn merge(&mut self, incoming: Vec<Quote>) -> QuoteResult<MergeOutcome> {
        let mut next = self.quotes.clone();
        let outcome = merge::merge(&mut next, incoming);

        if outcome.changed() {
            self.commit(next)?;
            info!(
                "Merged server quotes: added={}, updated={}",
                outcome.added, outcome.updated
            );
        }

        Ok(outcome)
    }

    /// Pretty-printed JSON of the whole list
    pub fn export_all(&self) -> QuoteResult<String> {
        serialization::export_all(&self.quotes)
    }

    /// Append every record in `text`; nothing is applied if parsing fails
    pub fn import_append(&mut self, text: &str) -> QuoteResult<usize> {
        let imported = serialization::parse_import(text, &self.quotes)?;
        let count = imported.len();

        let mut next = self.quotes.clone();
        next.extend(imported);
        self.commit(next)?;

        info!("Imported {} quotes (append)", count);
        Ok(count)
    }

    /// Replace the whole list with the records in `text`
    pub fn import_replace(&mut self, text: &str) -> QuoteResult<usize> {
        let imported = serialization::parse_import(text, &[])?;
        let count = imported.len();
        self.commit(imported)?;

        info!("Imported {} quotes (replace)", count);
        Ok(count)
    }

    // ==================== Advanced ====================

    /// The storage collaborator
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn write_snapshot<S: KeyValueStore>(storage: &mut S, quotes: &[Quote]) -> StorageResult<()> {
    let json = serde_json::to_string(quotes).map_err(|e| StorageError::Serialize {
        key: QUOTES_KEY.to_string(),
        details: e.to_string(),
    })?;
    storage.set(QUOTES_KEY, &json)
}
