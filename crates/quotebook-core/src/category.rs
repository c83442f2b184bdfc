//! Category index
//!
//! Categories are derived from the quotes every time they are needed and
//! never cached, so the index can't drift from the store after a mutation.

use std::collections::BTreeSet;

use crate::models::Quote;

/// Distinct, trimmed, non-empty categories, sorted lexicographically
pub fn derive(quotes: &[Quote]) -> Vec<String> {
    quotes
        .iter()
        .map(|q| q.category.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Categories with the number of quotes in each
pub fn derive_with_counts(quotes: &[Quote]) -> Vec<(String, usize)> {
    derive(quotes)
        .into_iter()
        .map(|category| {
            let count = quotes
                .iter()
                .filter(|q| q.category.trim() == category)
                .count();
            (category, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(category: &str) -> Quote {
        let mut q = Quote::new("text", "placeholder");
        q.category = category.to_string();
        q
    }

    #[test]
    fn test_derive_sorted_and_distinct() {
        let quotes = vec![
            quote("Programming"),
            quote("Inspiration"),
            quote("Programming"),
            quote("Mindset"),
        ];
        assert_eq!(derive(&quotes), vec!["Inspiration", "Mindset", "Programming"]);
    }

    #[test]
    fn test_derive_trims_and_skips_empty() {
        let quotes = vec![quote("  Server "), quote(""), quote("   "), quote("Server")];
        assert_eq!(derive(&quotes), vec!["Server"]);
    }

    #[test]
    fn test_derive_empty_store() {
        assert!(derive(&[]).is_empty());
    }

    #[test]
    fn test_derive_with_counts() {
        let quotes = vec![quote("A"), quote("B"), quote("A")];
        assert_eq!(
            derive_with_counts(&quotes),
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }
}
