use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Bar,
    Pub,
    Brewery,
    Restaurant,
    Cafe,
}

impl std::fmt::Display for VenueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueKind::Bar => write!(f, "bar"),
            VenueKind::Pub => write!(f, "pub"),
            VenueKind::Brewery => write!(f, "brewery"),
            VenueKind::Restaurant => write!(f, "restaurant"),
            VenueKind::Cafe => write!(f, "cafe"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    pub kind: VenueKind,
    pub neighbourhood: Option<String>,
    pub notes: Option<String>,
}

impl VenueConfig {
    /// Generate a URL-safe slug from the venue name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct VenuesFile {
    pub venues: Vec<VenueConfig>,
}

/// The fixed set of venue names the matcher is allowed to report.
///
/// Names keep their display form ("Durty Nelly's"); matching code normalizes
/// on its own. Iteration order is lexicographic so downstream output is
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueCatalog {
    names: BTreeSet<String>,
}

impl VenueCatalog {
    /// Build a catalog from display names. Blank names are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    #[must_use]
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<&VenuesFile> for VenueCatalog {
    fn from(file: &VenuesFile) -> Self {
        Self::from_names(file.venues.iter().map(|v| v.name.clone()))
    }
}

/// Load and validate the venue catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_venues(path: &Path) -> Result<VenuesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VenuesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_venues(&content)
}

/// Parse and validate venue YAML that is already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_venues(content: &str) -> Result<VenuesFile, ConfigError> {
    let venues_file: VenuesFile = serde_yaml::from_str(content)?;
    validate_venues(&venues_file)?;
    Ok(venues_file)
}

fn validate_venues(venues_file: &VenuesFile) -> Result<(), ConfigError> {
    if venues_file.venues.is_empty() {
        return Err(ConfigError::Validation(
            "venues file must list at least one venue".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for venue in &venues_file.venues {
        let trimmed = venue.name.trim();
        if trimmed.chars().count() < 2 {
            return Err(ConfigError::Validation(format!(
                "venue name '{}' must be at least 2 characters",
                venue.name
            )));
        }

        if !seen_names.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue name: '{}'",
                venue.name
            )));
        }

        let slug = venue.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has no ASCII characters to build a slug from",
                venue.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue slug: '{}' (from venue '{}')",
                slug, venue.name
            )));
        }
    }

    Ok(())
}
