//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use quotebook_core::{MergeOutcome, Quote};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single quote the way the page displayed it
    pub fn print_quote(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => {
                println!("\"{}\"", quote.text);
                println!("  - {}", quote.category);
            }
            OutputFormat::Json => {
                println!("{}", to_json(quote));
            }
            OutputFormat::Quiet => {
                println!("{}", quote.text);
            }
        }
    }

    /// Print a single quote with all its fields
    pub fn print_quote_details(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", quote.id);
                println!("Text:     {}", quote.text);
                println!("Category: {}", quote.category);
                println!("Origin:   {}", quote.origin);
                println!("Updated:  {}", quote.updated_at.format("%Y-%m-%d %H:%M"));
            }
            _ => self.print_quote(quote),
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[&Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found for this category.");
                    return;
                }
                for quote in quotes {
                    println!(
                        "{} | {} | {}",
                        short_id(&quote.id),
                        truncate(&quote.category, 14),
                        truncate(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(&quotes));
            }
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.id);
                }
            }
        }
    }

    /// Print categories with counts, marking the active selection
    pub fn print_categories(&self, categories: &[(String, usize)], selection: &str) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for (name, count) in categories {
                    let marker = if name == selection { "*" } else { " " };
                    println!("{} {} ({})", marker, name, count);
                }
                println!("\n{} categories, filter: {}", categories.len(), selection);
            }
            OutputFormat::Json => {
                let json_categories: Vec<_> = categories
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({"selection": selection, "categories": json_categories})
                );
            }
            OutputFormat::Quiet => {
                for (name, _) in categories {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the result of a merge
    pub fn print_merge(&self, outcome: &MergeOutcome) {
        match self.format {
            OutputFormat::Human => {
                if outcome.changed() {
                    println!(
                        "✓ Synced with server. Added {}, updated {}.",
                        outcome.added, outcome.updated
                    );
                } else {
                    println!("Sync complete. No changes.");
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "added": outcome.added, "updated": outcome.updated})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a transient notice to stderr
    pub fn warn(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "error", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// First segment of an id that is still distinctive
fn short_id(id: &str) -> String {
    truncate(id, 14)
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("can’t stop won’t stop", 8), "can’t...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("server-1"), "server-1");
        assert_eq!(
            short_id("local-0123456789abcdef0123456789abcdef"),
            "local-01234..."
        );
    }
}
