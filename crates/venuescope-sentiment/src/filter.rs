//! Spam, length, and relevance gate applied before any matching or scoring.

use std::collections::BTreeSet;

use venuescope_core::VenueCatalog;

/// Words that mark text as being about eating and drinking out.
const HOSPITALITY_KEYWORDS: &[&str] = &[
    "restaurant",
    "bar",
    "pub",
    "brewery",
    "cafe",
    "food",
    "drink",
    "beer",
    "wine",
    "cocktail",
    "menu",
    "service",
    "server",
    "waiter",
    "dinner",
    "lunch",
    "brunch",
    "eat",
    "ate",
    "meal",
    "taste",
    "flavor",
    "atmosphere",
    "ambiance",
    "patio",
    "reservation",
    "kitchen",
];

const DEFAULT_SPAM_KEYWORDS: &[&str] = &[
    "spam",
    "bot",
    "advertisement",
    "promo code",
    "discount code",
    "click here",
    "visit our",
    "buy now",
    "limited time",
];

/// Minimum distinct spam keywords for a keyword-based spam verdict.
const SPAM_KEYWORD_HITS: usize = 2;
/// Texts up to this many characters are never judged on capitalization.
const CAPS_CHECK_MIN_CHARS: usize = 10;
const MAX_UPPERCASE_RATIO: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub min_text_length: usize,
    pub max_text_length: usize,
    pub spam_keywords: BTreeSet<String>,
    pub min_relevance: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_text_length: 10,
            max_text_length: 10_000,
            spam_keywords: DEFAULT_SPAM_KEYWORDS
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            min_relevance: 0.1,
        }
    }
}

impl FilterConfig {
    /// Defaults with the length and relevance knobs taken from app config.
    #[must_use]
    pub fn from_app_config(config: &venuescope_core::AppConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            max_text_length: config.max_text_length,
            min_relevance: config.min_relevance,
            ..Self::default()
        }
    }
}

/// Why a text unit was turned away.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    Length,
    Spam,
    LowRelevance(f64),
}

impl RejectReason {
    /// Stable key for counting rejections by kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RejectReason::Length => "length",
            RejectReason::Spam => "spam",
            RejectReason::LowRelevance(_) => "low_relevance",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Length => write!(f, "Text length outside acceptable range"),
            RejectReason::Spam => write!(f, "Detected as spam content"),
            RejectReason::LowRelevance(score) => write!(f, "Low relevance score: {score:.2}"),
        }
    }
}

/// Outcome of [`ContentFilter::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterVerdict {
    pub reason: Option<RejectReason>,
}

impl FilterVerdict {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.reason.is_none()
    }

    /// The reason string, empty when the text passed.
    #[must_use]
    pub fn reason_text(&self) -> String {
        self.reason
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    config: FilterConfig,
}

impl ContentFilter {
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Two or more distinct spam keywords, or mostly upper-case text.
    #[must_use]
    pub fn is_spam(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let keyword_hits = self
            .config
            .spam_keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .count();
        if keyword_hits >= SPAM_KEYWORD_HITS {
            return true;
        }

        let total = text.chars().count();
        if total > CAPS_CHECK_MIN_CHARS {
            let upper = text.chars().filter(|c| c.is_uppercase()).count();
            #[allow(clippy::cast_precision_loss)]
            let ratio = upper as f64 / total as f64;
            if ratio > MAX_UPPERCASE_RATIO {
                return true;
            }
        }

        false
    }

    #[must_use]
    pub fn is_valid_length(&self, text: &str) -> bool {
        let len = text.chars().count();
        self.config.min_text_length <= len && len <= self.config.max_text_length
    }

    /// Share of words that point at eating and drinking out, in `[0, 1]`.
    ///
    /// Keyword hits count once each, venue-name hits count double. Both are
    /// substring checks on lower-cased text.
    #[must_use]
    pub fn calculate_relevance(&self, text: &str, venues: &VenueCatalog) -> f64 {
        calculate_relevance(text, venues)
    }

    /// Length, then spam, then relevance. The first failing check wins.
    #[must_use]
    pub fn evaluate(&self, text: &str, venues: &VenueCatalog) -> FilterVerdict {
        if !self.is_valid_length(text) {
            return FilterVerdict {
                reason: Some(RejectReason::Length),
            };
        }

        if self.is_spam(text) {
            return FilterVerdict {
                reason: Some(RejectReason::Spam),
            };
        }

        let relevance = self.calculate_relevance(text, venues);
        if relevance < self.config.min_relevance {
            return FilterVerdict {
                reason: Some(RejectReason::LowRelevance(relevance)),
            };
        }

        FilterVerdict { reason: None }
    }
}

/// See [`ContentFilter::calculate_relevance`].
#[must_use]
pub fn calculate_relevance(text: &str, venues: &VenueCatalog) -> f64 {
    let lower = text.to_lowercase();

    let total_words = lower.split_whitespace().count();
    if total_words == 0 {
        return 0.0;
    }

    let keyword_hits = HOSPITALITY_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count();
    let venue_hits = venues
        .names()
        .iter()
        .filter(|name| lower.contains(&name.to_lowercase()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let relevance = (keyword_hits + venue_hits * 2) as f64 / total_words as f64;
    relevance.min(1.0)
}
