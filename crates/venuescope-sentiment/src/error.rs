use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller contract violations. Nothing a single bad record does ends up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline run has not started; call begin() before processing or reporting")]
    NotStarted,

    #[error("pipeline run is already finalized")]
    AlreadyFinalized,

    #[error("batch could not be decoded: {0}")]
    Batch(String),
}

/// Structural problems with a single post, comment, or outgoing mention.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid id format: {0:?}")]
    InvalidId(String),

    #[error("timestamp {0} outside platform range")]
    TimestampOutOfRange(f64),

    #[error("url must start with http:// or https://: {0:?}")]
    InvalidUrl(String),

    #[error("{field} length {len} outside {min}..={max}")]
    FieldLength {
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("{field} value {value} out of range")]
    OutOfRange { field: String, value: f64 },

    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("no model path configured")]
    NotConfigured,

    #[error("failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    Invalid(String),
}
