use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

const SENTIMENT_MODEL: &str = r#"{
    "labels": ["positive", "negative", "neutral"],
    "priors": { "positive": -1.0986, "negative": -1.0986, "neutral": -1.0986 },
    "tokens": {
        "great": { "positive": -1.0, "negative": -5.0, "neutral": -4.0 },
        "awful": { "positive": -5.0, "negative": -1.0, "neutral": -4.0 }
    },
    "unknown": -6.0
}"#;

struct CountingLoader {
    calls: Arc<AtomicUsize>,
    fail_classifier: bool,
}

struct FixedClassifier(SentimentProbabilities);

impl SentimentClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Option<SentimentProbabilities> {
        Some(self.0)
    }
}

impl ModelLoader for CountingLoader {
    fn load_classifier(&self) -> Result<Box<dyn SentimentClassifier>, ModelLoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_classifier {
            return Err(ModelLoadError::Invalid("corrupt".to_string()));
        }
        Ok(Box::new(FixedClassifier(SentimentProbabilities {
            positive: 0.8,
            negative: 0.1,
            neutral: 0.1,
        })))
    }

    fn load_emotion(&self) -> Result<Box<dyn EmotionClassifier>, ModelLoadError> {
        Err(ModelLoadError::NotConfigured)
    }
}

#[test]
fn polarity_from_probabilities() {
    let p = SentimentProbabilities {
        positive: 0.8,
        negative: 0.1,
        neutral: 0.1,
    };
    assert!((p.to_polarity() - 0.63).abs() < 1e-12);

    let all_neutral = SentimentProbabilities {
        positive: 0.0,
        negative: 0.0,
        neutral: 1.0,
    };
    assert_eq!(all_neutral.to_polarity(), 0.0);
}

#[test]
fn disabled_provider_has_no_models() {
    let provider = ModelProvider::disabled();
    assert!(!provider.is_loaded());
    assert!(provider.classifier().is_none());
    assert!(provider.emotion().is_none());
    assert!(provider.is_loaded());
}

#[test]
fn provider_loads_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ModelProvider::new(CountingLoader {
        calls: Arc::clone(&calls),
        fail_classifier: false,
    });
    assert!(!provider.is_loaded());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(provider.classifier().is_some());
    assert!(provider.classifier().is_some());
    assert!(provider.emotion().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_load_degrades_and_is_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = ModelProvider::new(CountingLoader {
        calls: Arc::clone(&calls),
        fail_classifier: true,
    });
    assert!(provider.classifier().is_none());
    assert!(provider.classifier().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn naive_bayes_prefers_matching_class() {
    let model = NaiveBayesModel::from_json("inline", SENTIMENT_MODEL).unwrap();
    let classifier = NaiveBayesSentiment::try_from(model).unwrap();

    let good = classifier.classify("Great pints").unwrap();
    assert!(good.positive > good.negative);
    assert!((good.positive + good.negative + good.neutral - 1.0).abs() < 1e-9);

    let bad = classifier.classify("awful!").unwrap();
    assert!(bad.negative > bad.positive);
    assert!(bad.to_polarity() < 0.0);
}

#[test]
fn unknown_tokens_leave_priors_unchanged() {
    let model = NaiveBayesModel::from_json("inline", SENTIMENT_MODEL).unwrap();
    let probs = model.predict("zzz qqq");
    for p in probs.values() {
        assert!((p - 1.0 / 3.0).abs() < 1e-9, "got {p}");
    }
}

#[test]
fn sentiment_model_requires_three_labels() {
    let json = r#"{
        "labels": ["joy", "anger"],
        "priors": { "joy": -0.7, "anger": -0.7 },
        "tokens": {},
        "unknown": -5.0
    }"#;
    let model = NaiveBayesModel::from_json("inline", json).unwrap();
    assert_eq!(model.labels().len(), 2);
    let err = NaiveBayesSentiment::try_from(model.clone()).unwrap_err();
    assert!(matches!(err, ModelLoadError::Invalid(_)));

    let emotions = NaiveBayesEmotion::from(model).emotions("so happy").unwrap();
    assert_eq!(emotions.len(), 2);
    assert!(emotions.contains_key("joy"));
}

#[test]
fn invalid_models_are_rejected() {
    let missing_prior = r#"{ "labels": ["a"], "priors": {}, "tokens": {}, "unknown": -1.0 }"#;
    assert!(matches!(
        NaiveBayesModel::from_json("inline", missing_prior),
        Err(ModelLoadError::Invalid(_))
    ));

    let duplicate = r#"{ "labels": ["a", "a"], "priors": { "a": -1.0 }, "tokens": {}, "unknown": -1.0 }"#;
    assert!(matches!(
        NaiveBayesModel::from_json("inline", duplicate),
        Err(ModelLoadError::Invalid(_))
    ));

    assert!(matches!(
        NaiveBayesModel::from_json("inline", "[1, 2]"),
        Err(ModelLoadError::Parse { .. })
    ));
}

#[test]
fn file_loader_without_paths_is_not_configured() {
    let loader = FileModelLoader::default();
    assert!(matches!(
        loader.load_classifier(),
        Err(ModelLoadError::NotConfigured)
    ));
    assert!(matches!(
        loader.load_emotion(),
        Err(ModelLoadError::NotConfigured)
    ));
}

#[test]
fn file_loader_reports_missing_file() {
    let loader = FileModelLoader {
        classifier_path: Some(PathBuf::from("/nonexistent/venuescope/model.json")),
        emotion_path: None,
    };
    assert!(matches!(
        loader.load_classifier(),
        Err(ModelLoadError::Io { .. })
    ));
}

#[test]
fn file_loader_reads_model_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "venuescope-classifier-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, SENTIMENT_MODEL).unwrap();

    let provider = ModelProvider::new(FileModelLoader {
        classifier_path: Some(path.clone()),
        emotion_path: None,
    });
    let probs = provider
        .classifier()
        .and_then(|c| c.classify("great"))
        .unwrap();
    assert!(probs.positive > 0.5);
    assert!(provider.emotion().is_none());

    std::fs::remove_file(&path).unwrap();
}
