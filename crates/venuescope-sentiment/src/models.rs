//! Optional heavyweight scorers and their one-shot lazy loading.
//!
//! The ensemble never depends on these being present. A [`ModelProvider`]
//! asks its [`ModelLoader`] for models at most once, the first time a
//! non-empty text needs them; anything that fails to load is logged and
//! treated as absent for the rest of the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::ModelLoadError;
use crate::normalize::normalize;

/// Class probabilities from a three-way sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentProbabilities {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentProbabilities {
    /// `(P+ - P-) * (1 - Pneutral)`, clamped to `[-1.0, 1.0]`.
    #[must_use]
    pub fn to_polarity(self) -> f64 {
        ((self.positive - self.negative) * (1.0 - self.neutral)).clamp(-1.0, 1.0)
    }
}

pub trait SentimentClassifier: Send + Sync {
    /// `None` when the model cannot produce a prediction for `text`.
    fn classify(&self, text: &str) -> Option<SentimentProbabilities>;
}

pub trait EmotionClassifier: Send + Sync {
    /// Emotion label to probability. `None` on failure.
    fn emotions(&self, text: &str) -> Option<BTreeMap<String, f64>>;
}

pub trait ModelLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ModelLoadError::NotConfigured`] when no classifier is set up,
    /// or another variant when loading fails.
    fn load_classifier(&self) -> Result<Box<dyn SentimentClassifier>, ModelLoadError>;

    /// # Errors
    ///
    /// Same contract as [`ModelLoader::load_classifier`].
    fn load_emotion(&self) -> Result<Box<dyn EmotionClassifier>, ModelLoadError>;
}

#[derive(Default)]
struct LoadedModels {
    classifier: Option<Box<dyn SentimentClassifier>>,
    emotion: Option<Box<dyn EmotionClassifier>>,
}

/// Owns the optional models for one process (or one test).
pub struct ModelProvider {
    loader: Option<Box<dyn ModelLoader>>,
    models: OnceLock<LoadedModels>,
}

impl std::fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded = self.models.get();
        f.debug_struct("ModelProvider")
            .field("has_loader", &self.loader.is_some())
            .field("loaded", &loaded.is_some())
            .field(
                "classifier",
                &loaded.is_some_and(|m| m.classifier.is_some()),
            )
            .field("emotion", &loaded.is_some_and(|m| m.emotion.is_some()))
            .finish()
    }
}

impl Default for ModelProvider {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ModelProvider {
    #[must_use]
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            models: OnceLock::new(),
        }
    }

    /// A provider that never loads anything; the ensemble runs on its
    /// lightweight scorers only.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            loader: None,
            models: OnceLock::new(),
        }
    }

    /// Whether the one-shot load has already happened.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.models.get().is_some()
    }

    #[must_use]
    pub fn classifier(&self) -> Option<&dyn SentimentClassifier> {
        self.models().classifier.as_deref()
    }

    #[must_use]
    pub fn emotion(&self) -> Option<&dyn EmotionClassifier> {
        self.models().emotion.as_deref()
    }

    fn models(&self) -> &LoadedModels {
        self.models.get_or_init(|| {
            let Some(loader) = self.loader.as_deref() else {
                return LoadedModels::default();
            };
            LoadedModels {
                classifier: settle("classifier", loader.load_classifier()),
                emotion: settle("emotion", loader.load_emotion()),
            }
        })
    }
}

fn settle<T>(model: &'static str, result: Result<T, ModelLoadError>) -> Option<T> {
    match result {
        Ok(m) => {
            tracing::info!(model, "optional model loaded");
            Some(m)
        }
        Err(ModelLoadError::NotConfigured) => {
            tracing::debug!(model, "optional model not configured");
            None
        }
        Err(e) => {
            tracing::warn!(model, error = %e, "optional model failed to load; continuing without it");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File-backed naive-Bayes models
// ---------------------------------------------------------------------------

/// Token-weight model stored as JSON.
///
/// ```json
/// { "labels": ["positive", "negative", "neutral"],
///   "priors": { "positive": -1.1, "negative": -1.1, "neutral": -1.1 },
///   "tokens": { "great": { "positive": -2.0, "negative": -6.0, "neutral": -5.0 } },
///   "unknown": -8.0 }
/// ```
///
/// Every value is a natural-log probability. A label missing from a token's
/// map falls back to `unknown`.
#[derive(Debug, Clone, Deserialize)]
pub struct NaiveBayesModel {
    labels: Vec<String>,
    priors: BTreeMap<String, f64>,
    tokens: BTreeMap<String, BTreeMap<String, f64>>,
    unknown: f64,
}

impl NaiveBayesModel {
    /// # Errors
    ///
    /// Returns [`ModelLoadError::Parse`] for undecodable JSON and
    /// [`ModelLoadError::Invalid`] for a structurally unusable model.
    pub fn from_json(source: &str, json: &str) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ModelLoadError::Parse {
            path: source.to_string(),
            source: e,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// # Errors
    ///
    /// Returns [`ModelLoadError::Io`] if the file cannot be read, otherwise
    /// the errors of [`NaiveBayesModel::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, ModelLoadError> {
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| ModelLoadError::Io {
            path: display.clone(),
            source: e,
        })?;
        Self::from_json(&display, &json)
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.labels.is_empty() {
            return Err(ModelLoadError::Invalid("model declares no labels".to_string()));
        }
        let mut seen = std::collections::BTreeSet::new();
        for label in &self.labels {
            if !seen.insert(label.as_str()) {
                return Err(ModelLoadError::Invalid(format!("duplicate label {label:?}")));
            }
            match self.priors.get(label) {
                Some(p) if p.is_finite() => {}
                _ => {
                    return Err(ModelLoadError::Invalid(format!(
                        "missing or non-finite prior for {label:?}"
                    )))
                }
            }
        }
        if !self.unknown.is_finite() {
            return Err(ModelLoadError::Invalid("non-finite unknown weight".to_string()));
        }
        if let Some((token, _)) = self
            .tokens
            .iter()
            .find(|(_, weights)| weights.values().any(|w| !w.is_finite()))
        {
            return Err(ModelLoadError::Invalid(format!(
                "non-finite weight for token {token:?}"
            )));
        }
        Ok(())
    }

    /// Softmax over per-label log scores for the normalized tokens of `text`.
    #[must_use]
    pub fn predict(&self, text: &str) -> BTreeMap<String, f64> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let log_scores: Vec<f64> = self
            .labels
            .iter()
            .map(|label| {
                let prior = self.priors.get(label).copied().unwrap_or(self.unknown);
                tokens.iter().fold(prior, |acc, token| {
                    acc + self
                        .tokens
                        .get(*token)
                        .and_then(|w| w.get(label))
                        .copied()
                        .unwrap_or(self.unknown)
                })
            })
            .collect();

        let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        self.labels
            .iter()
            .zip(exps)
            .map(|(label, e)| (label.clone(), e / total))
            .collect()
    }
}

/// Three-way sentiment classifier over a [`NaiveBayesModel`].
#[derive(Debug, Clone)]
pub struct NaiveBayesSentiment {
    model: NaiveBayesModel,
}

const SENTIMENT_LABELS: [&str; 3] = ["positive", "negative", "neutral"];

impl TryFrom<NaiveBayesModel> for NaiveBayesSentiment {
    type Error = ModelLoadError;

    fn try_from(model: NaiveBayesModel) -> Result<Self, Self::Error> {
        for required in SENTIMENT_LABELS {
            if !model.labels.iter().any(|l| l == required) {
                return Err(ModelLoadError::Invalid(format!(
                    "sentiment model is missing the {required:?} label"
                )));
            }
        }
        Ok(Self { model })
    }
}

impl SentimentClassifier for NaiveBayesSentiment {
    fn classify(&self, text: &str) -> Option<SentimentProbabilities> {
        let probs = self.model.predict(text);
        let get = |label: &str| probs.get(label).copied().filter(|p| p.is_finite());
        Some(SentimentProbabilities {
            positive: get("positive")?,
            negative: get("negative")?,
            neutral: get("neutral")?,
        })
    }
}

/// Emotion classifier over a [`NaiveBayesModel`] with arbitrary labels.
#[derive(Debug, Clone)]
pub struct NaiveBayesEmotion {
    model: NaiveBayesModel,
}

impl From<NaiveBayesModel> for NaiveBayesEmotion {
    fn from(model: NaiveBayesModel) -> Self {
        Self { model }
    }
}

impl EmotionClassifier for NaiveBayesEmotion {
    fn emotions(&self, text: &str) -> Option<BTreeMap<String, f64>> {
        let probs = self.model.predict(text);
        probs.values().all(|p| p.is_finite()).then_some(probs)
    }
}

/// Loads naive-Bayes models from configured JSON files.
#[derive(Debug, Clone, Default)]
pub struct FileModelLoader {
    pub classifier_path: Option<PathBuf>,
    pub emotion_path: Option<PathBuf>,
}

impl FileModelLoader {
    #[must_use]
    pub fn from_app_config(config: &venuescope_core::AppConfig) -> Self {
        Self {
            classifier_path: config.classifier_model_path.clone(),
            emotion_path: config.emotion_model_path.clone(),
        }
    }
}

impl ModelLoader for FileModelLoader {
    fn load_classifier(&self) -> Result<Box<dyn SentimentClassifier>, ModelLoadError> {
        let path = self
            .classifier_path
            .as_deref()
            .ok_or(ModelLoadError::NotConfigured)?;
        let model = NaiveBayesModel::from_path(path)?;
        Ok(Box::new(NaiveBayesSentiment::try_from(model)?))
    }

    fn load_emotion(&self) -> Result<Box<dyn EmotionClassifier>, ModelLoadError> {
        let path = self
            .emotion_path
            .as_deref()
            .ok_or(ModelLoadError::NotConfigured)?;
        let model = NaiveBayesModel::from_path(path)?;
        Ok(Box::new(NaiveBayesEmotion::from(model)))
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
