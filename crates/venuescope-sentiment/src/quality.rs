//! Running data-quality counters for one pipeline run (or one shard).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::filter::RejectReason;

const VALIDITY_WEIGHT: f64 = 0.7;
const CONFIDENCE_WEIGHT: f64 = 0.3;

/// Why one unit was turned away.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rejection {
    /// `None` for batch entries that could not be decoded at all.
    pub source_id: Option<String>,
    pub kind: String,
    pub reason: String,
}

/// Accumulator owned by a single run.
///
/// Two reports built over disjoint inputs combine with [`QualityReport::merge`]
/// into the report a single run over both inputs would have produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityReport {
    total_processed: u64,
    valid: u64,
    invalid: u64,
    spam_filtered: u64,
    duplicate_filtered: u64,
    mentions_found: u64,
    absent_content: u64,
    venues_seen: BTreeSet<String>,
    confidences: Vec<f64>,
    rejections: Vec<Rejection>,
}

impl QualityReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    #[must_use]
    pub fn valid(&self) -> u64 {
        self.valid
    }

    #[must_use]
    pub fn invalid(&self) -> u64 {
        self.invalid
    }

    #[must_use]
    pub fn mentions_found(&self) -> u64 {
        self.mentions_found
    }

    /// Every unit seen, whatever happens to it afterwards.
    pub fn record_unit(&mut self) {
        self.total_processed += 1;
    }

    /// A unit that passed validation and the content filter.
    pub fn record_valid(&mut self) {
        self.valid += 1;
    }

    /// A unit whose source id already appeared in this run.
    pub fn record_duplicate(&mut self) {
        self.duplicate_filtered += 1;
    }

    /// A deleted, removed or blank comment. Not a unit, not an error.
    pub fn record_absent(&mut self) {
        self.absent_content += 1;
    }

    pub fn record_confidence(&mut self, confidence: f64) {
        self.confidences.push(confidence);
    }

    pub fn record_mention(&mut self, venue: &str) {
        self.mentions_found += 1;
        self.venues_seen.insert(venue.to_string());
    }

    /// A unit rejected by the content filter. Spam is also counted
    /// separately.
    pub fn record_filtered(&mut self, source_id: &str, reason: &RejectReason) {
        if matches!(reason, RejectReason::Spam) {
            self.spam_filtered += 1;
        }
        self.reject(Some(source_id), reason.kind(), reason.to_string());
    }

    /// A unit that failed structural validation.
    pub fn record_invalid(&mut self, source_id: &str, error: &ValidationError) {
        self.reject(Some(source_id), "validation", error.to_string());
    }

    /// A batch element that could not be decoded into a post. Counts as a
    /// processed, invalid unit.
    pub fn record_malformed(&mut self, reason: &str) {
        self.total_processed += 1;
        self.reject(None, "malformed", reason.to_string());
    }

    fn reject(&mut self, source_id: Option<&str>, kind: &str, reason: String) {
        self.invalid += 1;
        self.rejections.push(Rejection {
            source_id: source_id.map(str::to_string),
            kind: kind.to_string(),
            reason,
        });
    }

    /// Fold `other` into `self`. Associative and commutative once finalized.
    pub fn merge(&mut self, other: QualityReport) {
        self.total_processed += other.total_processed;
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.spam_filtered += other.spam_filtered;
        self.duplicate_filtered += other.duplicate_filtered;
        self.mentions_found += other.mentions_found;
        self.absent_content += other.absent_content;
        self.venues_seen.extend(other.venues_seen);
        self.confidences.extend(other.confidences);
        self.rejections.extend(other.rejections);
    }

    /// Derive the summary figures.
    ///
    /// Confidences are summed in sorted order and rejections are sorted, so
    /// the result does not depend on the order units or merges happened in.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn finalize(mut self) -> FinalizedQualityReport {
        self.confidences.sort_by(f64::total_cmp);
        let average_confidence = if self.confidences.is_empty() {
            0.0
        } else {
            self.confidences.iter().sum::<f64>() / self.confidences.len() as f64
        };

        let data_quality_score = if self.total_processed == 0 {
            0.0
        } else {
            let validity = self.valid as f64 / self.total_processed as f64;
            VALIDITY_WEIGHT * validity + CONFIDENCE_WEIGHT * average_confidence
        };

        self.rejections.sort();
        let mut rejection_counts = BTreeMap::new();
        for r in &self.rejections {
            *rejection_counts.entry(r.kind.clone()).or_insert(0_u64) += 1;
        }

        FinalizedQualityReport {
            total_processed: self.total_processed,
            valid: self.valid,
            invalid: self.invalid,
            spam_filtered: self.spam_filtered,
            duplicate_filtered: self.duplicate_filtered,
            mentions_found: self.mentions_found,
            absent_content: self.absent_content,
            unique_venues: self.venues_seen.len() as u64,
            average_confidence,
            data_quality_score,
            rejection_counts,
            rejections: self.rejections,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedQualityReport {
    pub total_processed: u64,
    pub valid: u64,
    pub invalid: u64,
    pub spam_filtered: u64,
    pub duplicate_filtered: u64,
    pub mentions_found: u64,
    /// Comments skipped because their content was deleted or removed.
    pub absent_content: u64,
    pub unique_venues: u64,
    pub average_confidence: f64,
    /// `0.7 * valid / total + 0.3 * average_confidence`, `0.0` for an empty run.
    pub data_quality_score: f64,
    /// Rejection kind (`length`, `spam`, `low_relevance`, `validation`,
    /// `malformed`) to count.
    pub rejection_counts: BTreeMap<String, u64>,
    pub rejections: Vec<Rejection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(prefix: &str, confidences: &[f64]) -> QualityReport {
        let mut r = QualityReport::new();
        for (i, c) in confidences.iter().enumerate() {
            r.record_unit();
            r.record_valid();
            r.record_confidence(*c);
            r.record_mention(&format!("{prefix}{i}"));
        }
        r.record_unit();
        r.record_filtered(&format!("{prefix}spam"), &RejectReason::Spam);
        r
    }

    #[test]
    fn empty_report_scores_zero() {
        let f = QualityReport::new().finalize();
        assert_eq!(f.total_processed, 0);
        assert_eq!(f.average_confidence, 0.0);
        assert_eq!(f.data_quality_score, 0.0);
        assert!(f.rejections.is_empty());
    }

    #[test]
    fn quality_score_blends_validity_and_confidence() {
        let f = sample("v", &[0.8, 0.6]).finalize();
        assert_eq!(f.total_processed, 3);
        assert_eq!(f.valid, 2);
        assert_eq!(f.invalid, 1);
        assert_eq!(f.spam_filtered, 1);
        assert_eq!(f.unique_venues, 2);
        assert!((f.average_confidence - 0.7).abs() < 1e-12);
        let expected = 0.7 * (2.0 / 3.0) + 0.3 * 0.7;
        assert!((f.data_quality_score - expected).abs() < 1e-12);
        assert_eq!(f.rejection_counts.get("spam"), Some(&1));
    }

    #[test]
    fn filtered_reasons_are_recorded_by_kind() {
        let mut r = QualityReport::new();
        r.record_filtered("a1", &RejectReason::Length);
        r.record_filtered("a2", &RejectReason::LowRelevance(0.05));
        r.record_invalid("BAD", &ValidationError::InvalidId("BAD".to_string()));
        r.record_malformed("missing field `id`");
        let f = r.finalize();
        assert_eq!(f.invalid, 4);
        assert_eq!(f.total_processed, 1);
        assert_eq!(f.spam_filtered, 0);
        assert_eq!(
            f.rejection_counts.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["length", "low_relevance", "malformed", "validation"]
        );
        // None sorts first
        assert_eq!(f.rejections[0].kind, "malformed");
        assert_eq!(f.rejections[0].source_id, None);
    }

    #[test]
    fn absent_content_is_not_a_unit() {
        let mut r = QualityReport::new();
        r.record_absent();
        r.record_absent();
        let f = r.finalize();
        assert_eq!(f.absent_content, 2);
        assert_eq!(f.total_processed, 0);
        assert_eq!(f.invalid, 0);
    }

    #[test]
    fn duplicate_venues_counted_once() {
        let mut r = QualityReport::new();
        r.record_mention("Good Robot");
        r.record_mention("Good Robot");
        let f = r.finalize();
        assert_eq!(f.mentions_found, 2);
        assert_eq!(f.unique_venues, 1);
    }

    #[test]
    fn merge_is_order_independent() {
        let a = sample("a", &[0.91, 0.13, 0.57]);
        let b = sample("b", &[0.33]);
        let c = sample("c", &[0.71, 0.29]);

        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut right = c;
        let mut bc = b;
        bc.merge(a);
        right.merge(bc);

        assert_eq!(left.finalize(), right.finalize());
    }
}
