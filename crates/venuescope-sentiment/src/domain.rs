//! Hospitality-specific nudges on top of the generic ensemble score.

use crate::types::{SentimentLabel, SentimentResult};

const POSITIVE_CUES: &[&str] = &[
    "amazing",
    "excellent",
    "outstanding",
    "delicious",
    "fantastic",
    "love",
    "perfect",
    "incredible",
    "awesome",
    "best",
    "great",
    "wonderful",
    "impressive",
    "tasty",
    "fresh",
    "friendly",
    "attentive",
    "quick",
    "fast",
    "clean",
    "cozy",
    "atmosphere",
];

const NEGATIVE_CUES: &[&str] = &[
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "worst",
    "hate",
    "slow",
    "rude",
    "dirty",
    "expensive",
    "overpriced",
    "cold",
    "burnt",
    "stale",
    "soggy",
    "bland",
    "salty",
    "dry",
    "greasy",
    "waiting",
    "wait",
    "delayed",
    "mistake",
    "wrong",
    "poor",
];

/// Score shift per net cue.
const CUE_STEP: f64 = 0.1;
/// The label is only re-derived when adjustment moves the score further than
/// this.
const RELABEL_DELTA: f64 = 0.15;

/// Stateless recalibration using hospitality cue words.
///
/// Cues are case-insensitive substrings and each counts once, so "waiting"
/// hits both `wait` and `waiting`. Adjustment is not idempotent: feeding a
/// result back in shifts it again unless the cues cancel out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainAdjuster;

impl DomainAdjuster {
    /// Positive cue hits minus negative cue hits.
    #[must_use]
    pub fn net_cues(text: &str) -> i32 {
        let lower = text.to_lowercase();
        let count = |cues: &[&str]| -> i32 {
            let hits = cues.iter().filter(|cue| lower.contains(**cue)).count();
            i32::try_from(hits).unwrap_or(i32::MAX)
        };
        count(POSITIVE_CUES) - count(NEGATIVE_CUES)
    }

    /// `base_score + net * 0.1`, clamped to `[-1.0, 1.0]`.
    #[must_use]
    pub fn adjust(&self, text: &str, base_score: f64) -> f64 {
        let net = Self::net_cues(text);
        (base_score + f64::from(net) * CUE_STEP).clamp(-1.0, 1.0)
    }

    /// A new result with the adjusted score.
    ///
    /// Confidence, scorer scores and emotions carry over. The label is kept
    /// unless the score moved by more than `0.15`.
    #[must_use]
    pub fn adjust_result(&self, text: &str, result: &SentimentResult) -> SentimentResult {
        let score = self.adjust(text, result.score);
        let label = if (score - result.score).abs() > RELABEL_DELTA {
            SentimentLabel::from_score(score)
        } else {
            result.label
        };
        SentimentResult {
            score,
            label,
            ..result.clone()
        }
    }
}
