//! Mention pipeline orchestration.
//!
//! For each post, then each of its comments:
//!
//! 1. Skip repeats of a source id already seen in this run.
//! 2. Validate structure.
//! 3. Run the content filter on the raw unit text.
//! 4. Match known venues on the normalized text.
//! 5. Score with the ensemble and apply the domain adjustment.
//! 6. Emit one mention per matched venue, all sharing the unit's sentiment
//!    and food terms.
//!
//! Every step feeds the run's [`QualityReport`]. A bad unit never stops the
//! run; only misuse of the run itself returns an error.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use venuescope_core::{RawComment, RawPost, VenueCatalog};

use crate::batch::BatchEntry;
use crate::domain::DomainAdjuster;
use crate::ensemble::SentimentEnsemble;
use crate::error::{PipelineError, SentimentError};
use crate::filter::ContentFilter;
use crate::matcher::{match_food_terms_normalized, VenueMatcher};
use crate::normalize::normalize;
use crate::quality::{FinalizedQualityReport, QualityReport};
use crate::types::MentionRecord;
use crate::validation::{validate_comment, validate_mention, validate_post};

const COMMENT_TITLE_PREFIX: &str = "Comment on: ";

/// Stateless configuration shared by every run.
#[derive(Debug)]
pub struct MentionPipeline {
    catalog: VenueCatalog,
    matcher: VenueMatcher,
    filter: ContentFilter,
    ensemble: SentimentEnsemble,
    adjuster: DomainAdjuster,
}

impl MentionPipeline {
    #[must_use]
    pub fn new(catalog: VenueCatalog, filter: ContentFilter, ensemble: SentimentEnsemble) -> Self {
        let matcher = VenueMatcher::new(&catalog);
        Self {
            catalog,
            matcher,
            filter,
            ensemble,
            adjuster: DomainAdjuster,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &VenueCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn ensemble(&self) -> &SentimentEnsemble {
        &self.ensemble
    }

    /// A new idle run that validates timestamps against the current time.
    #[must_use]
    pub fn start_run(&self) -> PipelineRun<'_> {
        self.start_run_at(Utc::now())
    }

    /// A new idle run with a fixed notion of "now".
    #[must_use]
    pub fn start_run_at(&self, now: DateTime<Utc>) -> PipelineRun<'_> {
        PipelineRun {
            pipeline: self,
            state: RunState::Idle,
            now,
            seen: BTreeSet::new(),
            report: QualityReport::new(),
            mentions: Vec::new(),
        }
    }

    /// Process `entries` in one run and finalize it.
    ///
    /// # Errors
    ///
    /// Only on internal state misuse, which a fresh run cannot hit.
    pub fn run(&self, entries: Vec<BatchEntry>) -> Result<RunOutput, PipelineError> {
        self.run_at(entries, Utc::now())
    }

    /// [`MentionPipeline::run`] with a fixed notion of "now".
    ///
    /// # Errors
    ///
    /// Only on internal state misuse, which a fresh run cannot hit.
    pub fn run_at(
        &self,
        entries: Vec<BatchEntry>,
        now: DateTime<Utc>,
    ) -> Result<RunOutput, PipelineError> {
        Ok(RunOutput::combine([self.run_shard(entries, now)?]))
    }

    /// Process one shard and return its unfinalized output, ready to be
    /// combined with other shards.
    ///
    /// # Errors
    ///
    /// Only on internal state misuse, which a fresh run cannot hit.
    pub fn run_shard(
        &self,
        entries: Vec<BatchEntry>,
        now: DateTime<Utc>,
    ) -> Result<ShardOutput, PipelineError> {
        let mut run = self.start_run_at(now);
        run.begin()?;
        for entry in entries {
            run.process_entry(entry)?;
        }
        run.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Processing,
    Finalized,
}

/// One text unit on its way through the pipeline.
struct Unit<'a> {
    source_id: &'a str,
    title: String,
    /// What the filter, matcher and scorers read.
    analysis_text: String,
    /// What the mention record stores.
    record_text: &'a str,
    created_at: DateTime<Utc>,
    url: &'a str,
    is_comment: bool,
}

/// A single pass over a batch (or shard). Single writer; not shared.
#[derive(Debug)]
pub struct PipelineRun<'p> {
    pipeline: &'p MentionPipeline,
    state: RunState,
    now: DateTime<Utc>,
    seen: BTreeSet<String>,
    report: QualityReport,
    mentions: Vec<MentionRecord>,
}

impl PipelineRun<'_> {
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Move from `Idle` to `Processing`. Calling it again while processing is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// [`PipelineError::AlreadyFinalized`] once the run has finished.
    pub fn begin(&mut self) -> Result<(), PipelineError> {
        match self.state {
            RunState::Idle => {
                self.state = RunState::Processing;
                Ok(())
            }
            RunState::Processing => Ok(()),
            RunState::Finalized => Err(PipelineError::AlreadyFinalized),
        }
    }

    fn ensure_processing(&self) -> Result<(), PipelineError> {
        match self.state {
            RunState::Idle => Err(PipelineError::NotStarted),
            RunState::Processing => Ok(()),
            RunState::Finalized => Err(PipelineError::AlreadyFinalized),
        }
    }

    /// Counters so far.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotStarted`] before [`PipelineRun::begin`].
    pub fn report(&self) -> Result<&QualityReport, PipelineError> {
        match self.state {
            RunState::Idle => Err(PipelineError::NotStarted),
            RunState::Processing | RunState::Finalized => Ok(&self.report),
        }
    }

    /// Mentions emitted so far.
    #[must_use]
    pub fn mentions(&self) -> &[MentionRecord] {
        &self.mentions
    }

    /// # Errors
    ///
    /// [`PipelineError::NotStarted`] or [`PipelineError::AlreadyFinalized`]
    /// when the run is not processing.
    pub fn process_entry(&mut self, entry: BatchEntry) -> Result<(), PipelineError> {
        match entry {
            BatchEntry::Post(post) => self.process_post(&post),
            BatchEntry::Malformed { index, reason } => {
                self.ensure_processing()?;
                tracing::debug!(index, reason = %reason, "malformed batch entry");
                self.report.record_malformed(&reason);
                Ok(())
            }
        }
    }

    /// Process a post and then its comments.
    ///
    /// A post that is a repeat or fails validation is counted once and its
    /// comments are skipped. Comments that did not decode count as one
    /// invalid unit each.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotStarted`] or [`PipelineError::AlreadyFinalized`]
    /// when the run is not processing.
    pub fn process_post(&mut self, post: &RawPost) -> Result<(), PipelineError> {
        self.ensure_processing()?;

        self.report.record_unit();
        if !self.seen.insert(post.id.clone()) {
            tracing::debug!(source_id = %post.id, "duplicate post skipped");
            self.report.record_duplicate();
            return Ok(());
        }

        let created_at = match validate_post(post, self.now) {
            Ok(ts) => ts,
            Err(e) => {
                tracing::debug!(source_id = %post.id, error = %e, "post failed validation");
                self.report.record_invalid(&post.id, &e);
                return Ok(());
            }
        };

        self.process_unit(&Unit {
            source_id: &post.id,
            title: post.title.clone(),
            analysis_text: post.full_text(),
            record_text: &post.body,
            created_at,
            url: &post.url,
            is_comment: false,
        });

        for comment in &post.comments {
            self.process_comment(post, comment);
        }
        for malformed in &post.malformed_comments {
            tracing::debug!(
                post_id = %post.id,
                index = malformed.index,
                reason = %malformed.reason,
                "malformed comment"
            );
            self.report.record_malformed(&format!(
                "comment {} of {}: {}",
                malformed.index, post.id, malformed.reason
            ));
        }
        Ok(())
    }

    fn process_comment(&mut self, post: &RawPost, comment: &RawComment) {
        if comment.is_absent() {
            self.report.record_absent();
            return;
        }

        self.report.record_unit();
        if !self.seen.insert(comment.id.clone()) {
            tracing::debug!(source_id = %comment.id, "duplicate comment skipped");
            self.report.record_duplicate();
            return;
        }

        let created_at = match validate_comment(comment, self.now) {
            Ok(ts) => ts,
            Err(e) => {
                tracing::debug!(source_id = %comment.id, error = %e, "comment failed validation");
                self.report.record_invalid(&comment.id, &e);
                return;
            }
        };

        self.process_unit(&Unit {
            source_id: &comment.id,
            title: format!("{COMMENT_TITLE_PREFIX}{}", post.title.trim()),
            analysis_text: comment.body.trim().to_string(),
            record_text: &comment.body,
            created_at,
            url: &post.url,
            is_comment: true,
        });
    }

    fn process_unit(&mut self, unit: &Unit<'_>) {
        let pipeline = self.pipeline;

        let verdict = pipeline
            .filter
            .evaluate(&unit.analysis_text, &pipeline.catalog);
        if let Some(reason) = &verdict.reason {
            tracing::debug!(source_id = %unit.source_id, reason = %reason, "unit rejected");
            self.report.record_filtered(unit.source_id, reason);
            return;
        }

        let normalized = normalize(&unit.analysis_text);
        let venues = pipeline.matcher.match_normalized(&normalized);
        if venues.is_empty() {
            self.report.record_valid();
            return;
        }

        let base = pipeline.ensemble.analyze(&unit.analysis_text);
        let sentiment = pipeline.adjuster.adjust_result(&unit.analysis_text, &base);
        self.report.record_confidence(sentiment.confidence);
        let food_mentions = match_food_terms_normalized(&normalized);

        let records: Vec<MentionRecord> = venues
            .into_iter()
            .map(|venue| MentionRecord {
                venue,
                source_id: unit.source_id.to_string(),
                title: unit.title.clone(),
                text: unit.record_text.to_string(),
                created_at: unit.created_at,
                sentiment_score: sentiment.score,
                sentiment_confidence: sentiment.confidence,
                sentiment_label: sentiment.label,
                scorer_scores: sentiment.scorer_scores.clone(),
                emotion_scores: sentiment.emotions.clone(),
                food_mentions: food_mentions.clone(),
                url: unit.url.to_string(),
                is_comment: unit.is_comment,
            })
            .collect();

        if let Some(e) = records.iter().find_map(|r| validate_mention(r).err()) {
            tracing::debug!(source_id = %unit.source_id, error = %e, "mention failed validation");
            self.report.record_invalid(unit.source_id, &e);
            return;
        }

        self.report.record_valid();
        for record in records {
            tracing::debug!(
                source_id = %record.source_id,
                venue = %record.venue,
                label = %record.sentiment_label,
                score = record.sentiment_score,
                "mention emitted"
            );
            self.report.record_mention(&record.venue);
            self.mentions.push(record);
        }
    }

    /// Close the run and hand back its mentions and counters.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NotStarted`] before [`PipelineRun::begin`],
    /// [`PipelineError::AlreadyFinalized`] on a second call.
    pub fn finish(&mut self) -> Result<ShardOutput, PipelineError> {
        self.ensure_processing()?;
        self.state = RunState::Finalized;
        tracing::debug!(
            total_processed = self.report.total_processed(),
            mentions = self.mentions.len(),
            "pipeline run finished"
        );
        Ok(ShardOutput {
            mentions: std::mem::take(&mut self.mentions),
            report: self.report.clone(),
        })
    }
}

/// Output of one run before its report is finalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardOutput {
    pub mentions: Vec<MentionRecord>,
    pub report: QualityReport,
}

/// Mentions and the finalized quality report of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub mentions: Vec<MentionRecord>,
    pub quality: FinalizedQualityReport,
}

impl RunOutput {
    /// Concatenate shard mentions in iteration order, merge the reports and
    /// finalize.
    #[must_use]
    pub fn combine(shards: impl IntoIterator<Item = ShardOutput>) -> Self {
        let mut mentions = Vec::new();
        let mut report = QualityReport::new();
        for shard in shards {
            mentions.extend(shard.mentions);
            report.merge(shard.report);
        }
        let quality = report.finalize();
        tracing::info!(
            total_processed = quality.total_processed,
            valid = quality.valid,
            invalid = quality.invalid,
            spam_filtered = quality.spam_filtered,
            duplicate_filtered = quality.duplicate_filtered,
            mentions_found = quality.mentions_found,
            unique_venues = quality.unique_venues,
            data_quality_score = quality.data_quality_score,
            "pipeline run finalized"
        );
        Self { mentions, quality }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SentimentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
