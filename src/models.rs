//! Data models for the spaced repetition engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SM-2 starting ease factor for a newly learned item
pub const DEFAULT_EASE_FACTOR: f32 = 2.5;

/// Scheduling state for one memorizable fact (a vocabulary word or a
/// flashcard front/back pair).
///
/// The domain payload (word text, translation, card faces) stays with the
/// owning collection; the engine only sees the `identity` key it is joined
/// back by after a session commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Stable key, unique within the owning collection.
    /// Must not change across reviews.
    pub identity: String,
    /// Current interval in days
    #[serde(default)]
    pub interval: i32,
    /// SM-2 ease factor (default 2.5, never below 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f32,
    /// When the item becomes eligible for review
    pub due_at: DateTime<Utc>,
    /// Total number of reviews
    #[serde(default)]
    pub review_count: i32,
    /// Number of correct responses
    #[serde(default)]
    pub correct_count: i32,
}

fn default_ease_factor() -> f32 {
    DEFAULT_EASE_FACTOR
}

impl ReviewItem {
    /// A freshly learned item: interval 0, default ease, due immediately.
    pub fn new(identity: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            identity: identity.into(),
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            due_at: now,
            review_count: 0,
            correct_count: 0,
        }
    }

    /// Check if the item is due for review at the given instant
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.due_at <= as_of
    }
}

/// Learner-reported recall outcome for one reviewed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Grade {
    /// No recall; the item is re-tested within the session and its
    /// interval collapses to one day
    Forgot,
    /// Correct recall with normal effort
    Good,
    /// Correct recall with no hesitation
    Easy,
}

impl Grade {
    /// SM-2 quality value for this grade
    pub fn quality(self) -> i32 {
        match self {
            Grade::Forgot => 0,
            Grade::Good => 3,
            Grade::Easy => 5,
        }
    }
}

/// Snapshot statistics over a collection of review items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    /// Items never reviewed
    pub new_items: usize,
    /// Items due at the snapshot instant
    pub due_items: usize,
    pub average_ease_factor: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_item_is_immediately_due() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let item = ReviewItem::new("hola", now);

        assert_eq!(item.identity, "hola");
        assert_eq!(item.interval, 0);
        assert_eq!(item.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(item.review_count, 0);
        assert!(item.is_due(now));
        assert!(item.is_due(now + Duration::hours(1)));
    }

    #[test]
    fn test_item_not_due_before_due_date() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let mut item = ReviewItem::new("hola", now);
        item.due_at = now + Duration::days(3);

        assert!(!item.is_due(now));
        assert!(item.is_due(now + Duration::days(3)));
    }

    #[test]
    fn test_grade_quality_mapping() {
        assert_eq!(Grade::Forgot.quality(), 0);
        assert_eq!(Grade::Good.quality(), 3);
        assert_eq!(Grade::Easy.quality(), 5);
    }

    #[test]
    fn test_item_deserializes_with_missing_counters() {
        // Items persisted before the counters existed must still load
        let json = r#"{"identity":"gato","dueAt":"2026-01-05T09:00:00Z"}"#;
        let item: ReviewItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.interval, 0);
        assert_eq!(item.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(item.review_count, 0);
        assert_eq!(item.correct_count, 0);
    }
}
