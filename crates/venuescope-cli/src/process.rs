//! The `process` command: decode a batch, run it through the pipeline
//! (optionally split into shards on blocking worker threads), and write the
//! result.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use venuescope_core::{AppConfig, VenueCatalog};
use venuescope_sentiment::{
    decode_batch, shard_entries, BatchEntry, ContentFilter, FileModelLoader, FilterConfig,
    MentionPipeline, ModelProvider, RunOutput, SentimentEnsemble,
};

/// Pipeline wired from app config: venue catalog from the venues file,
/// filter thresholds from env, optional model files.
///
/// # Errors
///
/// Returns an error if the venues file cannot be loaded.
pub(crate) fn build_pipeline(config: &AppConfig) -> anyhow::Result<MentionPipeline> {
    let venues = venuescope_core::load_venues(&config.venues_path)?;
    let catalog = VenueCatalog::from(&venues);
    tracing::debug!(venues = catalog.len(), "venue catalog loaded");

    let ensemble = SentimentEnsemble::new(ModelProvider::new(FileModelLoader::from_app_config(
        config,
    )));
    let filter = ContentFilter::new(FilterConfig::from_app_config(config));
    Ok(MentionPipeline::new(catalog, filter, ensemble))
}

/// Split `entries` into `shards`, run each shard on a blocking thread with at
/// most `max_concurrent` in flight, and combine the outputs in shard order.
///
/// # Errors
///
/// Returns an error if a shard task panics or a run is misused.
pub(crate) async fn run_shards(
    pipeline: Arc<MentionPipeline>,
    entries: Vec<BatchEntry>,
    shards: usize,
    max_concurrent: usize,
    now: DateTime<Utc>,
) -> anyhow::Result<RunOutput> {
    let parts = shard_entries(entries, shards);

    let mut results = stream::iter(parts.into_iter().enumerate())
        .map(|(index, part)| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let joined =
                    tokio::task::spawn_blocking(move || pipeline.run_shard(part, now)).await;
                (index, joined)
            }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect::<Vec<_>>()
        .await;
    results.sort_by_key(|(index, _)| *index);

    let mut outputs = Vec::with_capacity(results.len());
    for (index, joined) in results {
        let shard = joined.map_err(|e| anyhow::anyhow!("shard {index} task failed: {e}"))??;
        tracing::debug!(
            shard = index,
            mentions = shard.mentions.len(),
            units = shard.report.total_processed(),
            "shard finished"
        );
        outputs.push(shard);
    }

    Ok(RunOutput::combine(outputs))
}

/// Shard count and concurrency limit for a run. Concurrency always comes
/// from `VENUESCOPE_MAX_CONCURRENT_SHARDS`; without `--shards` the batch is
/// split into that many shards.
pub(crate) fn shard_plan(config: &AppConfig, shards: Option<usize>) -> (usize, usize) {
    let max_concurrent = config.max_concurrent_shards.max(1);
    (shards.unwrap_or(max_concurrent).max(1), max_concurrent)
}

/// # Errors
///
/// Returns an error if the input cannot be read or decoded, the venues file
/// is unusable, or the output cannot be written.
pub(crate) async fn run_process(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
    shards: Option<usize>,
) -> anyhow::Result<()> {
    let pipeline = Arc::new(build_pipeline(config)?);

    let json = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", input.display()))?;
    let entries = decode_batch(&json)?;

    let (shards, max_concurrent) = shard_plan(config, shards);
    tracing::info!(
        input = %input.display(),
        entries = entries.len(),
        shards,
        max_concurrent,
        "processing batch"
    );

    let result = run_shards(pipeline, entries, shards, max_concurrent, Utc::now()).await?;
    let rendered = result.to_json()?;

    match output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            let q = &result.quality;
            println!(
                "processed {} units: {} valid, {} invalid ({} spam), {} duplicates, \
                 {} mentions across {} venues, quality {:.3} -> {}",
                q.total_processed,
                q.valid,
                q.invalid,
                q.spam_filtered,
                q.duplicate_filtered,
                q.mentions_found,
                q.unique_venues,
                q.data_quality_score,
                path.display()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn pipeline() -> Arc<MentionPipeline> {
        Arc::new(MentionPipeline::new(
            VenueCatalog::from_names(["Good Robot", "The Bitter End"]),
            ContentFilter::default(),
            SentimentEnsemble::default(),
        ))
    }

    fn batch() -> Vec<BatchEntry> {
        let posts = json!([
            {
                "id": "pos001",
                "title": "Good Robot has great craft beer",
                "selftext": "Love their selection of local brews.",
                "created_utc": 1_686_830_400.0,
                "url": "https://reddit.com/r/halifax/comments/pos001",
                "comments": [
                    { "id": "c1", "body": "The Bitter End has rude service and cold fries",
                      "created_utc": 1_686_832_200.0 }
                ]
            },
            {
                "id": "neg001",
                "title": "Terrible experience at The Bitter End",
                "selftext": "The service was slow and the food was cold.",
                "created_utc": 1_686_834_000.0,
                "url": "https://reddit.com/r/halifax/comments/neg001"
            },
            { "id": 7 }
        ]);
        decode_batch(&posts.to_string()).unwrap()
    }

    #[tokio::test]
    async fn sharded_run_matches_single_run() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let single = pipeline().run_at(batch(), now).unwrap();
        let sharded = run_shards(pipeline(), batch(), 4, 2, now).await.unwrap();

        assert_eq!(sharded.quality, single.quality);
        let key = |m: &venuescope_sentiment::MentionRecord| (m.source_id.clone(), m.venue.clone());
        let mut a: Vec<_> = sharded.mentions.iter().map(key).collect();
        let mut b: Vec<_> = single.mentions.iter().map(key).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(sharded.quality.total_processed, 4);
    }

    fn config_with_concurrency(max_concurrent_shards: usize) -> AppConfig {
        AppConfig {
            env: venuescope_core::Environment::Test,
            log_level: "info".to_string(),
            venues_path: "./config/venues.yaml".into(),
            min_text_length: 10,
            max_text_length: 10_000,
            min_relevance: 0.1,
            max_concurrent_shards,
            classifier_model_path: None,
            emotion_model_path: None,
        }
    }

    #[test]
    fn explicit_shards_keep_configured_concurrency() {
        let config = config_with_concurrency(2);
        assert_eq!(shard_plan(&config, Some(8)), (8, 2));
    }

    #[test]
    fn shards_default_to_configured_concurrency() {
        let config = config_with_concurrency(3);
        assert_eq!(shard_plan(&config, None), (3, 3));
        assert_eq!(shard_plan(&config_with_concurrency(0), Some(0)), (1, 1));
    }

    #[tokio::test]
    async fn zero_shards_and_concurrency_fall_back_to_one() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let out = run_shards(pipeline(), batch(), 0, 0, now).await.unwrap();
        assert_eq!(out.quality.total_processed, 4);
        assert_eq!(out.mentions.len(), 3);
    }
}
