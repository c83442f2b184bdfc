//! Export and import command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quotebook_core::serialization::EXPORT_FILE_NAME;

use super::CliStore;
use crate::output::Output;

/// Export all quotes as pretty-printed JSON
///
/// Writes to `quotes.json` in the current directory unless a path is given;
/// `-` writes to stdout.
pub fn export(store: &CliStore, path: Option<PathBuf>, output: &Output) -> Result<()> {
    if store.is_empty() {
        bail!("No quotes available to export!");
    }

    let json = store.export_all()?;
    let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));

    if path.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }

    std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
    output.success(&format!(
        "Exported {} quotes to {}",
        store.len(),
        path.display()
    ));
    Ok(())
}

/// Import quotes from a JSON file
pub fn import(store: &mut CliStore, path: PathBuf, replace: bool, output: &Output) -> Result<()> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;

    let count = if replace {
        store.import_replace(&text)?
    } else {
        store.import_append(&text)?
    };

    output.success(&format!("Imported {} quotes.", count));
    Ok(())
}
