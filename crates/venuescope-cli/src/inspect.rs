//! Read-only commands: `analyze` and `venues`.

use venuescope_core::{AppConfig, VenueCatalog};
use venuescope_sentiment::{
    match_food_terms, DomainAdjuster, FileModelLoader, ModelProvider, SentimentEnsemble,
    VenueMatcher,
};

/// Score `text` with the full ensemble and print the base result, the
/// domain-adjusted result, and any venues and food terms it mentions.
///
/// # Errors
///
/// Returns an error if the venues file cannot be loaded or the result
/// cannot be serialized.
pub(crate) fn run_analyze(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let venues = venuescope_core::load_venues(&config.venues_path)?;
    let catalog = VenueCatalog::from(&venues);

    let ensemble = SentimentEnsemble::new(ModelProvider::new(FileModelLoader::from_app_config(
        config,
    )));
    let base = ensemble.analyze(text);
    let adjusted = DomainAdjuster.adjust_result(text, &base);

    let report = serde_json::json!({
        "text": text,
        "sentiment": base,
        "adjusted": adjusted,
        "venues": VenueMatcher::new(&catalog).match_venues(text),
        "food_mentions": match_food_terms(text),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print one line per configured venue: slug, kind, name, neighbourhood.
///
/// # Errors
///
/// Returns an error if the venues file cannot be loaded.
pub(crate) fn run_venues(config: &AppConfig) -> anyhow::Result<()> {
    let file = venuescope_core::load_venues(&config.venues_path)?;
    for venue in &file.venues {
        println!(
            "{:<28} {:<10} {:<32} {}",
            venue.slug(),
            venue.kind.to_string(),
            venue.name,
            venue.neighbourhood.as_deref().unwrap_or("-")
        );
    }
    println!("{} venues", file.venues.len());
    Ok(())
}
