use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeZone;

use super::*;
use crate::types::{ScorerKind, SentimentLabel};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn post() -> RawPost {
    RawPost {
        id: "abc123".to_string(),
        title: "Best wings in Halifax?".to_string(),
        body: "Looking for recommendations.".to_string(),
        created_at: 1_686_830_400.0,
        score: 25.0,
        url: "https://reddit.com/r/halifax/comments/abc123".to_string(),
        comments: vec![],
        malformed_comments: vec![],
    }
}

fn comment() -> RawComment {
    RawComment {
        id: "def456".to_string(),
        body: "Durty Nelly's has the best wings!".to_string(),
        created_at: 1_686_832_200.0,
        score: 5.0,
    }
}

fn mention() -> MentionRecord {
    MentionRecord {
        venue: "Durty Nelly's".to_string(),
        source_id: "abc123".to_string(),
        title: "Best wings in Halifax?".to_string(),
        text: "Durty Nelly's has the best wings!".to_string(),
        created_at: now(),
        sentiment_score: 0.8,
        sentiment_confidence: 0.9,
        sentiment_label: SentimentLabel::Positive,
        scorer_scores: BTreeMap::from([(ScorerKind::Lexicon, 0.85), (ScorerKind::Polarity, 0.7)]),
        emotion_scores: None,
        food_mentions: BTreeSet::from(["wings".to_string()]),
        url: "https://reddit.com/r/halifax/comments/abc123".to_string(),
        is_comment: false,
    }
}

#[test]
fn valid_post_passes_and_returns_timestamp() {
    let created = validate_post(&post(), now()).unwrap();
    assert_eq!(created.timestamp(), 1_686_830_400);
}

#[test]
fn post_id_must_be_short_lowercase_alphanumeric() {
    for bad in ["", "ABC123", "abc-123", "abcdefghijk", "abc 12"] {
        let p = RawPost {
            id: bad.to_string(),
            ..post()
        };
        assert_eq!(
            validate_post(&p, now()),
            Err(ValidationError::InvalidId(bad.to_string())),
            "id {bad:?}"
        );
    }
    let ten = RawPost {
        id: "abcdefghij".to_string(),
        ..post()
    };
    assert!(validate_post(&ten, now()).is_ok());
}

#[test]
fn post_title_bounds() {
    let blank = RawPost {
        title: "   ".to_string(),
        ..post()
    };
    assert!(matches!(
        validate_post(&blank, now()),
        Err(ValidationError::FieldLength { field: "title", .. })
    ));

    let long = RawPost {
        title: "a".repeat(501),
        ..post()
    };
    assert!(matches!(
        validate_post(&long, now()),
        Err(ValidationError::FieldLength { field: "title", len: 501, .. })
    ));
}

#[test]
fn post_body_may_be_empty_but_not_huge() {
    let empty = RawPost {
        body: String::new(),
        ..post()
    };
    assert!(validate_post(&empty, now()).is_ok());

    let huge = RawPost {
        body: "x".repeat(40_001),
        ..post()
    };
    assert!(matches!(
        validate_post(&huge, now()),
        Err(ValidationError::FieldLength { field: "body", .. })
    ));
}

#[test]
fn post_url_scheme_is_checked() {
    let p = RawPost {
        url: "ftp://example.com".to_string(),
        ..post()
    };
    assert_eq!(
        validate_post(&p, now()),
        Err(ValidationError::InvalidUrl("ftp://example.com".to_string()))
    );
}

#[test]
fn timestamps_before_launch_or_after_now_are_rejected() {
    let early = RawPost {
        created_at: PLATFORM_LAUNCH_EPOCH - 1.0,
        ..post()
    };
    assert!(matches!(
        validate_post(&early, now()),
        Err(ValidationError::TimestampOutOfRange(_))
    ));

    let future = RawPost {
        created_at: 1_800_000_000.0,
        ..post()
    };
    assert!(matches!(
        validate_post(&future, now()),
        Err(ValidationError::TimestampOutOfRange(_))
    ));

    let launch = RawPost {
        created_at: PLATFORM_LAUNCH_EPOCH,
        ..post()
    };
    assert!(validate_post(&launch, now()).is_ok());

    let nan = RawPost {
        created_at: f64::NAN,
        ..post()
    };
    assert!(validate_post(&nan, now()).is_err());
}

#[test]
fn valid_comment_passes() {
    assert!(validate_comment(&comment(), now()).is_ok());
}

#[test]
fn comment_body_bounds() {
    let empty = RawComment {
        body: String::new(),
        ..comment()
    };
    assert!(matches!(
        validate_comment(&empty, now()),
        Err(ValidationError::FieldLength { field: "comment body", .. })
    ));

    let huge = RawComment {
        body: "y".repeat(10_001),
        ..comment()
    };
    assert!(validate_comment(&huge, now()).is_err());
}

#[test]
fn valid_mention_passes() {
    assert_eq!(validate_mention(&mention()), Ok(()));
}

#[test]
fn mention_venue_needs_two_visible_characters() {
    let m = MentionRecord {
        venue: " X ".to_string(),
        ..mention()
    };
    assert!(matches!(
        validate_mention(&m),
        Err(ValidationError::FieldLength { field: "venue", .. })
    ));
}

#[test]
fn comment_mention_title_fits_prefix() {
    let m = MentionRecord {
        title: format!("Comment on: {}", "t".repeat(500)),
        is_comment: true,
        ..mention()
    };
    assert!(validate_mention(&m).is_ok());
}

#[test]
fn mention_scores_must_be_in_range() {
    let m = MentionRecord {
        sentiment_confidence: 1.2,
        ..mention()
    };
    assert!(matches!(
        validate_mention(&m),
        Err(ValidationError::OutOfRange { ref field, .. }) if field == "sentiment_confidence"
    ));

    let mut scores = mention().scorer_scores;
    scores.insert(ScorerKind::Classifier, -1.5);
    let m = MentionRecord {
        scorer_scores: scores,
        ..mention()
    };
    assert!(matches!(
        validate_mention(&m),
        Err(ValidationError::OutOfRange { ref field, .. }) if field == "scorer_scores.classifier"
    ));

    let m = MentionRecord {
        emotion_scores: Some(BTreeMap::from([("joy".to_string(), f64::NAN)])),
        ..mention()
    };
    assert!(validate_mention(&m).is_err());
}
