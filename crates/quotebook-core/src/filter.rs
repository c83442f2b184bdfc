//! Category filter
//!
//! The selection is either the sentinel [`ALL`] or a category label. It is
//! persisted on its own key, separately from the quote snapshot.

use crate::models::Quote;

/// Sentinel selection that matches every quote
pub const ALL: &str = "all";

/// Quotes whose category equals `selection`, or every quote for [`ALL`]
///
/// An unknown category yields an empty view.
pub fn apply<'a>(quotes: &'a [Quote], selection: &str) -> Vec<&'a Quote> {
    if selection == ALL {
        return quotes.iter().collect();
    }
    quotes.iter().filter(|q| q.category == selection).collect()
}

/// The selection actually used for filtering
///
/// Falls back to [`ALL`] when `stored` is not among `categories`.
pub fn effective<'a>(stored: &'a str, categories: &[String]) -> &'a str {
    if stored == ALL || categories.iter().any(|c| c == stored) {
        stored
    } else {
        ALL
    }
}

/// Whether `selection` may be persisted given the current categories
pub fn is_selectable(selection: &str, categories: &[String]) -> bool {
    selection == ALL || categories.iter().any(|c| c == selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes() -> Vec<Quote> {
        vec![
            Quote::new("Talk is cheap. Show me the code.", "Programming"),
            Quote::new("Small steps every day add up to big results.", "Inspiration"),
            Quote::new("Simplicity is the soul of efficiency.", "Programming"),
        ]
    }

    #[test]
    fn test_apply_all() {
        let quotes = quotes();
        assert_eq!(apply(&quotes, ALL).len(), 3);
    }

    #[test]
    fn test_apply_category_keeps_order() {
        let quotes = quotes();
        let view = apply(&quotes, "Programming");
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].id, quotes[0].id);
        assert_eq!(view[1].id, quotes[2].id);
    }

    #[test]
    fn test_apply_unknown_category_is_empty() {
        let quotes = quotes();
        assert!(apply(&quotes, "NonexistentCategory").is_empty());
    }

    #[test]
    fn test_effective_selection() {
        let categories = vec!["Inspiration".to_string(), "Programming".to_string()];
        assert_eq!(effective("Programming", &categories), "Programming");
        assert_eq!(effective(ALL, &categories), ALL);
        assert_eq!(effective("Gone", &categories), ALL);
    }

    #[test]
    fn test_is_selectable() {
        let categories = vec!["Mindset".to_string()];
        assert!(is_selectable(ALL, &categories));
        assert!(is_selectable("Mindset", &categories));
        assert!(!is_selectable("mindset", &categories));
    }
}
