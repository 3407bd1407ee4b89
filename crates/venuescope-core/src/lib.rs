//! Shared types and configuration for venuescope.
//!
//! Holds the raw post/comment shapes handed over by the acquisition side,
//! the known-venue catalog, and environment-driven application config.

pub mod app_config;
pub mod config;
pub mod posts;
pub mod venues;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{MalformedComment, RawComment, RawPost};
pub use venues::{load_venues, parse_venues, VenueCatalog, VenueConfig, VenueKind, VenuesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read venues file {path}: {source}")]
    VenuesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse venues file: {0}")]
    VenuesFileParse(#[from] serde_yaml::Error),

    #[error("venue validation failed: {0}")]
    Validation(String),
}
