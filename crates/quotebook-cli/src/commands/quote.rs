//! Quote command handlers

use anyhow::{Context, Result};
use tracing::warn;

use quotebook_core::filter::ALL;
use quotebook_core::{FileStorage, Quote, Session};

use super::CliStore;
use crate::output::Output;
use crate::prompt::confirm;

/// Show a random quote from the current (or given) category
pub fn random(
    store: &CliStore,
    session: &mut Session<FileStorage>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let selection = category.unwrap_or_else(|| store.effective_selection());

    let Some(quote) = store.random(&selection) else {
        output.warn("No quotes found for this category.");
        return Ok(());
    };

    output.print_quote(quote);
    remember(session, quote);
    Ok(())
}

/// Add a new quote
pub fn add(
    store: &mut CliStore,
    session: &mut Session<FileStorage>,
    text: String,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let quote = store.add(&text, category.as_deref().unwrap_or(""))?;

    output.success("Quote added.");

    // Show the new quote if it is visible under the current filter
    let selection = store.effective_selection();
    if selection == ALL || selection == quote.category {
        output.print_quote(&quote);
        remember(session, &quote);
    }

    Ok(())
}

/// List quotes, optionally filtered by category
pub fn list(store: &CliStore, category: Option<String>, output: &Output) -> Result<()> {
    let selection = category.unwrap_or_else(|| store.effective_selection());
    output.print_quotes(&store.filtered(&selection));
    Ok(())
}

/// Show the quote viewed last in this session
pub fn last(store: &CliStore, session: &Session<FileStorage>, output: &Output) -> Result<()> {
    match session.last().and_then(|pointer| store.get(&pointer.id)) {
        Some(quote) => output.print_quote_details(quote),
        None => output.message("No quote viewed yet in this session."),
    }
    Ok(())
}

/// Clear stored quotes, filter and session, then restore the defaults
pub fn reset(
    store: &mut CliStore,
    session: &mut Session<FileStorage>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if !yes && output.should_prompt() {
        println!("This removes all {} stored quotes and restores the defaults.", store.len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.reset().context("Failed to reset quote store")?;
    session.clear().context("Failed to clear session")?;

    output.success("Local storage cleared.");
    Ok(())
}

/// Record the shown quote; failing to do so is not worth aborting over
fn remember(session: &mut Session<FileStorage>, quote: &Quote) {
    if let Err(e) = session.record(quote) {
        warn!("Failed to record last viewed quote: {}", e);
    }
}
