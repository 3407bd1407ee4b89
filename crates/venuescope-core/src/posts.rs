//! Raw posts and comments as delivered by the acquisition side.
//!
//! Field names follow the platform's listing JSON (`selftext`,
//! `created_utc`) through serde aliases, so a fetched dump can be decoded
//! without a mapping step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Comment bodies the platform substitutes when content is gone.
const ABSENT_BODIES: &[&str] = &["[deleted]", "[removed]"];

/// A top-level post with its comment thread.
///
/// Comments are decoded one at a time: an element of `comments` that does
/// not decode lands in `malformed_comments` instead of failing the post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPostWire")]
pub struct RawPost {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Epoch seconds.
    pub created_at: f64,
    pub score: f64,
    pub url: String,
    pub comments: Vec<RawComment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub malformed_comments: Vec<MalformedComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(alias = "created_utc")]
    pub created_at: f64,
    #[serde(default)]
    pub score: f64,
}

/// A `comments` element that did not decode as a [`RawComment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedComment {
    /// Position in the post's `comments` array.
    pub index: usize,
    pub reason: String,
}

#[derive(Deserialize)]
struct RawPostWire {
    id: String,
    title: String,
    #[serde(default, alias = "selftext", deserialize_with = "null_as_default")]
    body: String,
    #[serde(alias = "created_utc")]
    created_at: f64,
    #[serde(default)]
    score: f64,
    url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<serde_json::Value>,
    #[serde(default)]
    malformed_comments: Vec<MalformedComment>,
}

impl From<RawPostWire> for RawPost {
    fn from(wire: RawPostWire) -> Self {
        let mut comments = Vec::with_capacity(wire.comments.len());
        let mut malformed_comments = wire.malformed_comments;
        for (index, value) in wire.comments.into_iter().enumerate() {
            match serde_json::from_value::<RawComment>(value) {
                Ok(comment) => comments.push(comment),
                Err(e) => malformed_comments.push(MalformedComment {
                    index,
                    reason: e.to_string(),
                }),
            }
        }
        Self {
            id: wire.id,
            title: wire.title,
            body: wire.body,
            created_at: wire.created_at,
            score: wire.score,
            url: wire.url,
            comments,
            malformed_comments,
        }
    }
}

/// `null` decodes as the type's default (empty body, no comments).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawPost {
    /// Title and body joined the way the post is read for analysis.
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title.trim(), self.body.trim())
            .trim()
            .to_string()
    }

    /// `created_at` as a UTC timestamp, `None` if it is not representable.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.created_at)
    }
}

impl RawComment {
    /// True when the body carries no content (`[deleted]`, `[removed]`, blank).
    #[must_use]
    pub fn is_absent(&self) -> bool {
        let body = self.body.trim().to_lowercase();
        body.is_empty() || ABSENT_BODIES.contains(&body.as_str())
    }

    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch_to_utc(self.created_at)
    }
}

/// Epoch seconds (fractional allowed) to UTC. `None` for non-finite or
/// unrepresentable values.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}
