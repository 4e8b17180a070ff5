//! # Scoring
//!
//! Maps a usage record to an integer rank key. Lower scores rank closer to the
//! front of the index.
//!
//! | Record | Score |
//! |--------|-------|
//! | absent | [`UNSEEN_SCORE`] |
//! | last used ≥ W hours ago | `UNSEEN_SCORE - count` |
//! | last used < W hours ago | `UNSEEN_SCORE - count - count × (W - age) × boost` |
//!
//! Scores of seen records are clamped to `[0, UNSEEN_SCORE - 1]`, so every
//! score fits in [`SCORE_WIDTH`] decimal digits and the sentinel stays
//! reserved for files with no history.

use chrono::{DateTime, Utc};

use super::store::UsageRecord;

/// Number of decimal digits a score occupies when zero-padded
pub const SCORE_WIDTH: usize = 10;

/// Score given to files that have never been used
pub const UNSEEN_SCORE: u64 = 9_999_999_999;

/// Constants behind score and prune decisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    /// Window (hours) in which recent use is boosted
    pub recency_window_hours: f64,
    /// Multiplier applied to the recency boost
    pub boost_factor: f64,
    /// Records younger than this are never pruned
    pub prune_min_age_hours: f64,
    /// Records older than the minimum age are pruned below this uses-per-hour rate
    pub prune_min_ratio: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            recency_window_hours: 48.0,
            boost_factor: 10.0,
            prune_min_age_hours: 1.0,
            prune_min_ratio: 0.1,
        }
    }
}

impl ScoringPolicy {
    /// Score a record (or its absence) at `now`
    pub fn score(&self, record: Option<&UsageRecord>, now: DateTime<Utc>) -> u64 {
        let Some(record) = record else {
            return UNSEEN_SCORE;
        };

        let age = age_hours(record, now);
        let mut credit = record.count as f64;
        if age < self.recency_window_hours {
            credit += record.count as f64 * (self.recency_window_hours - age) * self.boost_factor;
        }

        // `as` saturates on overflow, which is the clamp we want
        let credit = credit.floor() as u64;
        UNSEEN_SCORE.saturating_sub(credit).min(UNSEEN_SCORE - 1)
    }

    /// Display metric derived from the score; higher is more prominent
    pub fn points(&self, record: Option<&UsageRecord>, now: DateTime<Utc>) -> u64 {
        UNSEEN_SCORE - self.score(record, now)
    }

    /// Whether a record is old and rarely used enough to drop
    pub fn is_stale(&self, record: &UsageRecord, now: DateTime<Utc>) -> bool {
        let age = age_hours(record, now);
        age > self.prune_min_age_hours && use_rate(record, now) < self.prune_min_ratio
    }
}

/// Hours since the record was last used, never negative
pub fn age_hours(record: &UsageRecord, now: DateTime<Utc>) -> f64 {
    let millis = (now - record.last_used).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

/// Uses per hour since the last use, treating anything under an hour as one
pub fn use_rate(record: &UsageRecord, now: DateTime<Utc>) -> f64 {
    record.count as f64 / age_hours(record, now).max(1.0)
}

/// Format a score as a fixed-width, zero-padded decimal
pub fn format_score(score: u64) -> String {
    format!("{:0width$}", score, width = SCORE_WIDTH)
}
