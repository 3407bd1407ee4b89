//! Structural checks on incoming posts and comments and outgoing mentions.
//!
//! Each check returns the first problem found. The pipeline records the
//! error against the unit and moves on; nothing here aborts a run.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use venuescope_core::posts::epoch_to_utc;
use venuescope_core::{RawComment, RawPost};

use crate::error::ValidationError;
use crate::types::MentionRecord;

static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("valid id regex"));

pub const MAX_ID_LEN: usize = 10;
pub const MAX_TITLE_LEN: usize = 500;
pub const MAX_POST_BODY_LEN: usize = 40_000;
pub const MAX_COMMENT_BODY_LEN: usize = 10_000;
/// Room for the `"Comment on: "` prefix on comment mention titles.
pub const MAX_MENTION_TITLE_LEN: usize = MAX_TITLE_LEN + 12;
pub const MIN_VENUE_NAME_LEN: usize = 2;
pub const MAX_VENUE_NAME_LEN: usize = 255;

/// Earliest plausible creation time: 2005-06-23T00:00:00Z.
pub const PLATFORM_LAUNCH_EPOCH: f64 = 1_119_484_800.0;

fn check_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_ID_LEN || !ID_RE.is_match(id) {
        return Err(ValidationError::InvalidId(id.to_string()));
    }
    Ok(())
}

fn check_len(
    field: &'static str,
    text: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len < min || len > max {
        return Err(ValidationError::FieldLength {
            field,
            len,
            min,
            max,
        });
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn check_timestamp(created_at: f64, now: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    let upper = now.timestamp() as f64;
    if !created_at.is_finite() || created_at < PLATFORM_LAUNCH_EPOCH || created_at > upper {
        return Err(ValidationError::TimestampOutOfRange(created_at));
    }
    epoch_to_utc(created_at).ok_or(ValidationError::TimestampOutOfRange(created_at))
}

fn check_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl(url.to_string()))
    }
}

fn check_range(
    field: impl Into<String>,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.into(),
            value,
        })
    }
}

/// Post shape: id, title, body, url and creation time. Returns the
/// validated creation time.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_post(post: &RawPost, now: DateTime<Utc>) -> Result<DateTime<Utc>, ValidationError> {
    check_id(&post.id)?;
    if post.title.trim().is_empty() {
        return Err(ValidationError::FieldLength {
            field: "title",
            len: 0,
            min: 1,
            max: MAX_TITLE_LEN,
        });
    }
    check_len("title", &post.title, 1, MAX_TITLE_LEN)?;
    check_len("body", &post.body, 0, MAX_POST_BODY_LEN)?;
    check_url(&post.url)?;
    check_timestamp(post.created_at, now)
}

/// Comment shape. Absent (deleted or removed) comments are filtered out
/// before this runs. Returns the validated creation time.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_comment(
    comment: &RawComment,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    check_id(&comment.id)?;
    check_len("comment body", &comment.body, 1, MAX_COMMENT_BODY_LEN)?;
    check_timestamp(comment.created_at, now)
}

/// Final gate on an outgoing record.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_mention(mention: &MentionRecord) -> Result<(), ValidationError> {
    let venue = mention.venue.split_whitespace().collect::<Vec<_>>().join(" ");
    check_len("venue", &venue, MIN_VENUE_NAME_LEN, MAX_VENUE_NAME_LEN)?;
    check_id(&mention.source_id)?;
    check_len("title", &mention.title, 1, MAX_MENTION_TITLE_LEN)?;
    check_len("text", &mention.text, 0, MAX_POST_BODY_LEN)?;
    check_url(&mention.url)?;

    check_range("sentiment_score", mention.sentiment_score, -1.0, 1.0)?;
    check_range("sentiment_confidence", mention.sentiment_confidence, 0.0, 1.0)?;
    for (kind, score) in &mention.scorer_scores {
        check_range(format!("scorer_scores.{kind}"), *score, -1.0, 1.0)?;
    }
    if let Some(emotions) = &mention.emotion_scores {
        for (emotion, p) in emotions {
            check_range(format!("emotion_scores.{emotion}"), *p, 0.0, 1.0)?;
        }
    }
    if mention.food_mentions.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::Malformed("empty food mention".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
