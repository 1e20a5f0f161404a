//! SM-2 Spaced Repetition Algorithm
//!
//! Pure scheduling math over `ReviewItem`: selecting the due subset of a
//! collection and computing an item's next state from a grade.
//!
//! Quality values (SM-2 scale) used by the three grades:
//! - 0: `Forgot` — no recall
//! - 3: `Good` — correct with normal effort
//! - 5: `Easy` — perfect response
//!
//! Every function takes the current instant as a parameter instead of
//! reading the wall clock, so scheduling is deterministic and testable.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Grade, ReviewItem, ReviewStats};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Select every item due at `as_of`, never-reviewed items included.
///
/// This is exactly the `due_at <= as_of` filter; presentation order is the
/// session's concern, not this function's. The input is not mutated.
pub fn select_due(items: &[ReviewItem], as_of: DateTime<Utc>) -> Vec<ReviewItem> {
    items
        .iter()
        .filter(|item| item.is_due(as_of))
        .cloned()
        .collect()
}

/// Compute an item's next scheduling state from a grade.
///
/// Returns a new `ReviewItem`; the input is untouched and the caller
/// replaces (not patches) the stored item. The next due date is always
/// computed from `now`, never from the old due date, so late reviews do
/// not compound scheduling drift.
pub fn grade(item: &ReviewItem, grade: Grade, now: DateTime<Utc>) -> ReviewItem {
    let quality = grade.quality();

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3,
    // always computed from the pre-review ease factor
    let q_gap = (5 - quality) as f32;
    let ease_factor =
        (item.ease_factor + (0.1 - q_gap * (0.08 + q_gap * 0.02))).max(MIN_EASE_FACTOR);

    let interval = if quality < 3 {
        // Forgetting collapses the interval to the shortest re-test
        // horizon, no matter how long it had grown
        1
    } else {
        match item.interval {
            // First successful review: next-day check
            0 => 1,
            // Second successful review: six-day horizon
            1 => 6,
            // After that, growth compounds by the new ease factor
            n => (n as f32 * ease_factor).round() as i32,
        }
    };

    let correct = if quality >= 3 { 1 } else { 0 };

    ReviewItem {
        identity: item.identity.clone(),
        interval,
        ease_factor,
        due_at: now + Duration::days(interval as i64),
        review_count: item.review_count + 1,
        correct_count: item.correct_count + correct,
    }
}

/// Interval in days each grade would produce for this item, in
/// `[Forgot, Good, Easy]` order. Used to label grading buttons.
pub fn preview_intervals(item: &ReviewItem, now: DateTime<Utc>) -> [i32; 3] {
    [
        grade(item, Grade::Forgot, now).interval,
        grade(item, Grade::Good, now).interval,
        grade(item, Grade::Easy, now).interval,
    ]
}

/// Snapshot statistics for a collection at the given instant
pub fn review_stats(items: &[ReviewItem], as_of: DateTime<Utc>) -> ReviewStats {
    let mut stats = ReviewStats::default();
    stats.total_items = items.len();

    for item in items {
        if item.review_count == 0 {
            stats.new_items += 1;
        }
        if item.is_due(as_of) {
            stats.due_items += 1;
        }
    }

    if !items.is_empty() {
        let sum: f32 = items.iter().map(|i| i.ease_factor).sum();
        stats.average_ease_factor = sum / items.len() as f32;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    fn item_with(interval: i32, ease_factor: f32) -> ReviewItem {
        ReviewItem {
            interval,
            ease_factor,
            ..ReviewItem::new("hola", t0())
        }
    }

    #[test]
    fn test_first_review_good() {
        let result = grade(&ReviewItem::new("hola", t0()), Grade::Good, t0());

        assert_eq!(result.interval, 1);
        assert_eq!(result.due_at, t0() + Duration::days(1));
        assert_eq!(result.review_count, 1);
        assert_eq!(result.correct_count, 1);
    }

    #[test]
    fn test_second_review_jumps_to_six_days() {
        let result = grade(&item_with(1, 2.5), Grade::Good, t0());

        assert_eq!(result.interval, 6);
        assert_eq!(result.due_at, t0() + Duration::days(6));
    }

    #[test]
    fn test_subsequent_review_compounds_by_ease() {
        // New ease is applied to the interval: 10 * 2.36 rounds to 24
        let result = grade(&item_with(10, 2.5), Grade::Good, t0());
        assert_eq!(result.interval, 24);

        // 10 * 2.6 = 26
        let result = grade(&item_with(10, 2.5), Grade::Easy, t0());
        assert_eq!(result.interval, 26);
    }

    #[test]
    fn test_golden_ease_values() {
        // From the SM-2 formula starting at 2.5:
        //   quality 3 -> 2.5 + (0.1 - 2*(0.08 + 2*0.02)) = 2.36
        //   quality 5 -> 2.5 + 0.1                       = 2.6
        let good = grade(&item_with(0, 2.5), Grade::Good, t0());
        assert!((good.ease_factor - 2.36).abs() < 1e-3);

        let easy = grade(&item_with(0, 2.5), Grade::Easy, t0());
        assert!((easy.ease_factor - 2.6).abs() < 1e-3);
    }

    #[test]
    fn test_forgot_resets_interval() {
        // Forgetting always collapses to one day, even from a long horizon
        let result = grade(&item_with(400, 2.5), Grade::Forgot, t0());

        assert_eq!(result.interval, 1);
        assert_eq!(result.due_at, t0() + Duration::days(1));
        assert_eq!(result.correct_count, 0);
    }

    #[test]
    fn test_ease_factor_never_below_floor() {
        // quality 0 drops ease by 0.8 each time; the floor holds
        let mut item = item_with(10, 2.5);
        for _ in 0..5 {
            item = grade(&item, Grade::Forgot, t0());
            assert!(item.ease_factor >= MIN_EASE_FACTOR);
        }
        assert_eq!(item.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_due_date_computed_from_now_not_old_due() {
        let mut item = item_with(6, 2.5);
        // Reviewed nine days late
        item.due_at = t0() - Duration::days(9);

        let result = grade(&item, Grade::Good, t0());

        assert!(result.due_at > t0());
        assert_eq!(result.due_at, t0() + Duration::days(result.interval as i64));
    }

    #[test]
    fn test_successful_grade_keeps_interval_at_least_one() {
        for g in [Grade::Forgot, Grade::Good, Grade::Easy] {
            for interval in [0, 1, 6, 50] {
                let result = grade(&item_with(interval, 1.3), g, t0());
                assert!(result.interval >= 1);
            }
        }
    }

    #[test]
    fn test_select_due_is_the_filter() {
        let mut overdue = ReviewItem::new("a", t0());
        overdue.due_at = t0() - Duration::days(2);
        let due_now = ReviewItem::new("b", t0());
        let mut future = ReviewItem::new("c", t0());
        future.due_at = t0() + Duration::days(1);

        // Collection order must not matter
        let items = vec![future.clone(), due_now.clone(), overdue.clone()];
        let due = select_due(&items, t0());

        let ids: Vec<&str> = due.iter().map(|i| i.identity.as_str()).collect();
        assert_eq!(due.len(), 2);
        assert!(ids.contains(&"a"));
        assert!(ids.contains(&"b"));
        assert!(!ids.contains(&"c"));
        // Input untouched
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_preview_intervals() {
        let previews = preview_intervals(&item_with(10, 2.5), t0());
        assert_eq!(previews, [1, 24, 26]);
    }

    #[test]
    fn test_review_stats() {
        let fresh = ReviewItem::new("a", t0());
        let mut scheduled = grade(&ReviewItem::new("b", t0()), Grade::Good, t0());
        scheduled.due_at = t0() + Duration::days(1);

        let stats = review_stats(&[fresh, scheduled], t0());

        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.new_items, 1);
        assert_eq!(stats.due_items, 1);
        assert!(stats.average_ease_factor > 2.4);
    }
}
