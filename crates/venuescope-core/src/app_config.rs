use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for a venuescope process.
///
/// Content-filter tuning lives here so operators can loosen or tighten the
/// relevance gate without a rebuild. Model paths are optional: when unset the
/// sentiment ensemble runs with its built-in scorers only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub venues_path: PathBuf,
    pub min_text_length: usize,
    pub max_text_length: usize,
    pub min_relevance: f64,
    pub max_concurrent_shards: usize,
    pub classifier_model_path: Option<PathBuf>,
    pub emotion_model_path: Option<PathBuf>,
}
