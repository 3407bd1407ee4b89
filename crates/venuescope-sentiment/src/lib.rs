//! Venue mention detection and ensemble sentiment scoring.
//!
//! Takes already-fetched posts and comments, finds which known venues and
//! menu items they talk about, scores each mention with several independent
//! sentiment scorers fused into one calibrated value, and filters spam and
//! off-topic content. Every run yields serializable mention records and a
//! data-quality report.

pub mod batch;
pub mod domain;
pub mod ensemble;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod polarity;
pub mod quality;
pub mod scorer;
pub mod types;
pub mod validation;

pub use batch::{decode_batch, shard_entries, BatchEntry};
pub use domain::DomainAdjuster;
pub use ensemble::{fuse, SentimentEnsemble};
pub use error::{ModelLoadError, PipelineError, SentimentError, ValidationError};
pub use filter::{ContentFilter, FilterConfig, FilterVerdict, RejectReason};
pub use matcher::{match_food_terms, match_venues, VenueMatcher};
pub use models::{FileModelLoader, ModelProvider};
pub use normalize::normalize;
pub use pipeline::{MentionPipeline, PipelineRun, RunOutput, RunState, ShardOutput};
pub use polarity::polarity_score;
pub use quality::{FinalizedQualityReport, QualityReport};
pub use scorer::{lexicon_score, lexicon_scores};
pub use types::{MentionRecord, ScorerKind, SentimentLabel, SentimentResult};
