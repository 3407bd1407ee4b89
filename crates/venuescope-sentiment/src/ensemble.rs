//! Fusion of independent scorers into one score, confidence and label.

use std::collections::BTreeMap;

use crate::models::ModelProvider;
use crate::polarity::polarity_score;
use crate::scorer::lexicon_score;
use crate::types::{ScorerKind, SentimentLabel, SentimentResult};

/// Confidence assigned when only one scorer produced a value.
pub const SINGLE_SCORER_CONFIDENCE: f64 = 0.7;

/// Runs the lexicon and polarity scorers, plus whatever optional models the
/// provider can supply, and fuses their outputs.
#[derive(Debug, Default)]
pub struct SentimentEnsemble {
    models: ModelProvider,
}

impl SentimentEnsemble {
    #[must_use]
    pub fn new(models: ModelProvider) -> Self {
        Self { models }
    }

    #[must_use]
    pub fn models(&self) -> &ModelProvider {
        &self.models
    }

    /// Score one text unit.
    ///
    /// Empty or whitespace-only text returns [`SentimentResult::empty`]
    /// without running any scorer, and without triggering model loading.
    #[must_use]
    pub fn analyze(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::empty();
        }

        let mut scorer_scores = BTreeMap::new();
        scorer_scores.insert(ScorerKind::Lexicon, lexicon_score(text));
        scorer_scores.insert(ScorerKind::Polarity, polarity_score(text));

        if let Some(classifier) = self.models.classifier() {
            match classifier.classify(text) {
                Some(probs) => {
                    scorer_scores.insert(ScorerKind::Classifier, probs.to_polarity());
                }
                None => tracing::debug!("classifier produced no prediction; fusing without it"),
            }
        }

        let emotions = self.models.emotion().and_then(|m| m.emotions(text));

        let (score, confidence) = fuse(&scorer_scores);
        SentimentResult {
            score,
            confidence,
            label: SentimentLabel::from_score(score),
            scorer_scores,
            emotions,
        }
    }

    #[must_use]
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentResult> {
        texts.iter().map(|t| self.analyze(t.as_ref())).collect()
    }
}

/// Weighted mean of the present scores and their agreement.
///
/// Weights of the present scorers are renormalized to sum to one before
/// averaging. Confidence is [`SINGLE_SCORER_CONFIDENCE`] for one scorer and
/// `max(0, 1 - stddev / 2)` (population stddev) for more. No scores gives
/// `(0.0, 0.0)`.
#[must_use]
pub fn fuse(scores: &BTreeMap<ScorerKind, f64>) -> (f64, f64) {
    if scores.is_empty() {
        return (0.0, 0.0);
    }

    let total_weight: f64 = scores.keys().map(|k| k.weight()).sum();
    let score = scores
        .iter()
        .map(|(kind, s)| (kind.weight() / total_weight) * s)
        .sum::<f64>()
        .clamp(-1.0, 1.0);

    let confidence = if scores.len() == 1 {
        SINGLE_SCORER_CONFIDENCE
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = scores.len() as f64;
        let mean = scores.values().sum::<f64>() / n;
        let variance = scores.values().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        (1.0 - variance.sqrt() / 2.0).clamp(0.0, 1.0)
    };

    (score, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelLoadError;
    use crate::models::{
        EmotionClassifier, ModelLoader, SentimentClassifier, SentimentProbabilities,
    };

    struct StubLoader;

    struct Cheerful;

    impl SentimentClassifier for Cheerful {
        fn classify(&self, _text: &str) -> Option<SentimentProbabilities> {
            Some(SentimentProbabilities {
                positive: 0.9,
                negative: 0.05,
                neutral: 0.05,
            })
        }
    }

    struct Joyful;

    impl EmotionClassifier for Joyful {
        fn emotions(&self, _text: &str) -> Option<BTreeMap<String, f64>> {
            Some(BTreeMap::from([
                ("joy".to_string(), 0.75),
                ("anger".to_string(), 0.25),
            ]))
        }
    }

    impl ModelLoader for StubLoader {
        fn load_classifier(&self) -> Result<Box<dyn SentimentClassifier>, ModelLoadError> {
            Ok(Box::new(Cheerful))
        }

        fn load_emotion(&self) -> Result<Box<dyn EmotionClassifier>, ModelLoadError> {
            Ok(Box::new(Joyful))
        }
    }

    #[test]
    fn fuse_of_nothing_is_zero() {
        assert_eq!(fuse(&BTreeMap::new()), (0.0, 0.0));
    }

    #[test]
    fn fuse_single_scorer_passes_score_through() {
        for kind in [ScorerKind::Lexicon, ScorerKind::Polarity, ScorerKind::Classifier] {
            let (score, confidence) = fuse(&BTreeMap::from([(kind, -0.42)]));
            assert_eq!(score, -0.42);
            assert_eq!(confidence, SINGLE_SCORER_CONFIDENCE);
        }
    }

    #[test]
    fn fuse_identical_scores_is_fully_confident() {
        let scores = BTreeMap::from([(ScorerKind::Lexicon, 0.6), (ScorerKind::Polarity, 0.6)]);
        let (score, confidence) = fuse(&scores);
        assert!((score - 0.6).abs() < 1e-12);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn fuse_renormalizes_weights_of_present_scorers() {
        // lexicon 0.3 and polarity 0.2 renormalize to 0.6 and 0.4
        let scores = BTreeMap::from([(ScorerKind::Lexicon, 1.0), (ScorerKind::Polarity, 0.0)]);
        let (score, confidence) = fuse(&scores);
        assert!((score - 0.6).abs() < 1e-12, "got {score}");
        // population stddev of [1, 0] is 0.5
        assert!((confidence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn fuse_full_disagreement_stays_in_bounds() {
        let scores = BTreeMap::from([
            (ScorerKind::Lexicon, 1.0),
            (ScorerKind::Polarity, -1.0),
            (ScorerKind::Classifier, 1.0),
        ]);
        let (score, confidence) = fuse(&scores);
        assert!((-1.0..=1.0).contains(&score));
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[test]
    fn empty_text_short_circuits_without_loading_models() {
        let ensemble = SentimentEnsemble::new(ModelProvider::new(StubLoader));
        for text in ["", "   ", "\n\t"] {
            assert_eq!(ensemble.analyze(text), SentimentResult::empty());
        }
        assert!(!ensemble.models().is_loaded());
    }

    #[test]
    fn lightweight_ensemble_uses_two_scorers() {
        let ensemble = SentimentEnsemble::default();
        let result = ensemble.analyze("The food was amazing and the service was excellent!");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(
            result.scorer_scores.keys().copied().collect::<Vec<_>>(),
            vec![ScorerKind::Lexicon, ScorerKind::Polarity]
        );
        assert!(result.emotions.is_none());
        assert!(result.score > 0.0 && result.score <= 1.0);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn negative_text_is_labelled_negative() {
        let result = SentimentEnsemble::default().analyze("Terrible food and slow service");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < 0.0);
    }

    #[test]
    fn optional_models_join_the_fusion() {
        let ensemble = SentimentEnsemble::new(ModelProvider::new(StubLoader));
        let result = ensemble.analyze("Lovely pints on the patio");
        let classifier = result.scorer_scores[&ScorerKind::Classifier];
        assert!((classifier - 0.8075).abs() < 1e-12, "got {classifier}");
        let emotions = result.emotions.unwrap();
        assert_eq!(emotions["joy"], 0.75);
        assert!(ensemble.models().is_loaded());
    }

    #[test]
    fn batch_matches_individual_calls() {
        let ensemble = SentimentEnsemble::default();
        let texts = ["great wings", "", "rude staff"];
        let batch = ensemble.analyze_batch(&texts);
        assert_eq!(batch.len(), 3);
        for (text, result) in texts.iter().zip(&batch) {
            assert_eq!(&ensemble.analyze(text), result);
        }
    }
}
