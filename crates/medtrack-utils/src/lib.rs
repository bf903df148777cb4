//! Utility functions and helpers

use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;

thread_local! {
    static ROOT_COLLATOR: Option<Collator> = root_collator();
}

fn root_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            log::warn!("Root collator unavailable, comparing by code point: {}", err);
            None
        }
    }
}

/// Compare two display strings with root-locale Unicode collation.
///
/// Base letters decide first, so "Émile" sorts before "Frank". Accents and
/// then case only break ties, with lowercase before uppercase. Identical
/// strings are `Ordering::Equal` so stable sorts keep input order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    ROOT_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// English ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("alice", "Bob"), Ordering::Less);
        assert_eq!(locale_compare("Bob", "alice"), Ordering::Greater);
        assert_eq!(locale_compare("Zeta", "omega"), Ordering::Greater);
    }

    #[test]
    fn test_locale_compare_case_tiebreak() {
        assert_eq!(locale_compare("alice", "Alice"), Ordering::Less);
        assert_eq!(locale_compare("Alice", "alice"), Ordering::Greater);
        assert_eq!(locale_compare("Alice", "Alice"), Ordering::Equal);
    }

    #[test]
    fn test_locale_compare_accents_follow_base_letter() {
        assert_eq!(locale_compare("Émile", "Frank"), Ordering::Less);
        assert_eq!(locale_compare("Zack", "Émile"), Ordering::Greater);
        assert_eq!(locale_compare("Emile", "Émile"), Ordering::Less);
        assert_eq!(locale_compare("Ørsted", "Zeta"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare_prefix() {
        assert_eq!(locale_compare("Ann", "Anna"), Ordering::Less);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Carol Danvers", "dan"));
        assert!(contains_ignore_case("Carol Danvers", "CAROL"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Carol", "bob"));
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(31), "st");
    }
}
