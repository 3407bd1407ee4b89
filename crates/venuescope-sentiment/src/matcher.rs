//! Venue and menu-term detection on normalized text.

use std::collections::BTreeSet;

use venuescope_core::VenueCatalog;

use crate::normalize::normalize;

/// Food vocabulary matched by substring on normalized text.
pub(crate) const FOOD_TERMS: &[&str] = &[
    "wings",
    "nachos",
    "burger",
    "pizza",
    "fries",
    "poutine",
    "fish and chips",
    "tacos",
    "appetizers",
    "menu",
    "food",
    "dinner",
    "lunch",
    "brunch",
    "snacks",
    "platter",
];

/// Drink vocabulary matched by substring on normalized text.
pub(crate) const DRINK_TERMS: &[&str] = &[
    "beer",
    "craft beer",
    "wine",
    "cocktail",
    "drinks",
    "draft",
    "ale",
    "lager",
    "stout",
    "ipa",
    "cider",
    "happy hour",
];

#[derive(Debug, Clone)]
struct VenuePattern {
    display: String,
    full: String,
    /// Short form casual text tends to use. Only set for multi-word names.
    distinctive: Option<String>,
}

impl VenuePattern {
    fn new(display: &str) -> Self {
        let full = normalize(display);
        let parts: Vec<&str> = full.split(' ').collect();
        let distinctive = if parts.len() > 1 {
            let first = parts[0];
            let pick = if first.chars().count() > 3 {
                first
            } else {
                parts[parts.len() - 1]
            };
            Some(pick.to_string())
        } else {
            None
        };
        Self {
            display: display.to_string(),
            full,
            distinctive,
        }
    }

    fn matches(&self, normalized_text: &str) -> bool {
        if self.full.is_empty() {
            return false;
        }
        if normalized_text.contains(&self.full) {
            return true;
        }
        self.distinctive
            .as_deref()
            .is_some_and(|part| !part.is_empty() && normalized_text.contains(part))
    }
}

/// Pre-normalized venue patterns for one catalog.
///
/// Matching is deliberately recall-heavy: a multi-word name also matches on
/// its first token when that token is longer than three characters, else on
/// its last token. "Durty" finds "Durty Nelly's"; "End" finds "The Bitter
/// End" and, as a known cost, "weekend".
#[derive(Debug, Clone)]
pub struct VenueMatcher {
    patterns: Vec<VenuePattern>,
}

impl VenueMatcher {
    #[must_use]
    pub fn new(catalog: &VenueCatalog) -> Self {
        let patterns = catalog
            .names()
            .iter()
            .map(|name| VenuePattern::new(name))
            .collect();
        Self { patterns }
    }

    /// Venues mentioned in raw `text`.
    #[must_use]
    pub fn match_venues(&self, text: &str) -> BTreeSet<String> {
        self.match_normalized(&normalize(text))
    }

    /// Venues mentioned in text that has already been through [`normalize`].
    #[must_use]
    pub fn match_normalized(&self, normalized_text: &str) -> BTreeSet<String> {
        self.patterns
            .iter()
            .filter(|p| p.matches(normalized_text))
            .map(|p| p.display.clone())
            .collect()
    }
}

/// Venues from `known_venues` mentioned in `text`.
#[must_use]
pub fn match_venues(text: &str, known_venues: &VenueCatalog) -> BTreeSet<String> {
    VenueMatcher::new(known_venues).match_venues(text)
}

/// Food and drink terms mentioned in `text`, lower-cased and deduplicated.
#[must_use]
pub fn match_food_terms(text: &str) -> BTreeSet<String> {
    match_food_terms_normalized(&normalize(text))
}

pub(crate) fn match_food_terms_normalized(normalized_text: &str) -> BTreeSet<String> {
    FOOD_TERMS
        .iter()
        .chain(DRINK_TERMS)
        .filter(|term| normalized_text.contains(*term))
        .map(|term| (*term).to_string())
        .collect()
}
