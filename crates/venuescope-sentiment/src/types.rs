//! Sentiment results and the mention records the pipeline emits.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores above this are positive, below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Derive the label from a fused score using the ±0.1 thresholds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Positive
        } else if score < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

/// The independent scorers that feed the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    Lexicon,
    Polarity,
    Classifier,
}

impl ScorerKind {
    /// Fixed fusion weight before renormalization over present scorers.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            ScorerKind::Lexicon => 0.3,
            ScorerKind::Polarity => 0.2,
            ScorerKind::Classifier => 0.5,
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerKind::Lexicon => write!(f, "lexicon"),
            ScorerKind::Polarity => write!(f, "polarity"),
            ScorerKind::Classifier => write!(f, "classifier"),
        }
    }
}

/// Fused sentiment for one text unit.
///
/// Built once by the ensemble and never mutated; domain adjustment returns a
/// fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// In `[-1.0, 1.0]`.
    pub score: f64,
    /// In `[0.0, 1.0]`.
    pub confidence: f64,
    pub label: SentimentLabel,
    /// Raw score per scorer that produced a value. Absent scorers are omitted.
    pub scorer_scores: BTreeMap<ScorerKind, f64>,
    /// Emotion label to probability, `None` when no emotion model ran.
    pub emotions: Option<BTreeMap<String, f64>>,
}

impl SentimentResult {
    /// The result for text with nothing to score.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            confidence: 0.0,
            label: SentimentLabel::Neutral,
            scorer_scores: BTreeMap::new(),
            emotions: None,
        }
    }
}

/// A (venue, text unit) pair ready for the persistence side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionRecord {
    pub venue: String,
    pub source_id: String,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub sentiment_label: SentimentLabel,
    pub scorer_scores: BTreeMap<ScorerKind, f64>,
    pub emotion_scores: Option<BTreeMap<String, f64>>,
    pub food_mentions: BTreeSet<String>,
    pub url: String,
    pub is_comment: bool,
}
