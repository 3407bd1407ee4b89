use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so only malformed values fail. Kept separate
/// from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_fraction = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is outside [0, 1]"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("VENUESCOPE_ENV", "development"));
    let log_level = or_default("VENUESCOPE_LOG_LEVEL", "info");
    let venues_path = PathBuf::from(or_default(
        "VENUESCOPE_VENUES_PATH",
        "./config/venues.yaml",
    ));

    let min_text_length = parse_usize("VENUESCOPE_MIN_TEXT_LENGTH", "10")?;
    let max_text_length = parse_usize("VENUESCOPE_MAX_TEXT_LENGTH", "10000")?;
    if min_text_length == 0 || min_text_length > max_text_length {
        return Err(ConfigError::InvalidEnvVar {
            var: "VENUESCOPE_MIN_TEXT_LENGTH".to_string(),
            reason: format!(
                "must be between 1 and VENUESCOPE_MAX_TEXT_LENGTH ({max_text_length}), got {min_text_length}"
            ),
        });
    }

    let min_relevance = parse_fraction("VENUESCOPE_MIN_RELEVANCE", "0.1")?;
    let max_concurrent_shards = parse_usize("VENUESCOPE_MAX_CONCURRENT_SHARDS", "1")?.max(1);

    Ok(AppConfig {
        env,
        log_level,
        venues_path,
        min_text_length,
        max_text_length,
        min_relevance,
        max_concurrent_shards,
        classifier_model_path: optional_path("VENUESCOPE_CLASSIFIER_MODEL_PATH"),
        emotion_model_path: optional_path("VENUESCOPE_EMOTION_MODEL_PATH"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
