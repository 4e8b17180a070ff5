//! # Usage Tracking Module
//!
//! This module records how often and how recently files are used, and turns
//! those observations into the scores the index is ranked by.
//!
//! ## Overview
//!
//! - [`UsageStore`] keeps one [`UsageRecord`] per absolute file path and
//!   prunes stale records after every update.
//! - [`ScoringPolicy`] maps a record (or its absence) to an integer score,
//!   lower ranking first, and decides which records are stale.
//!
//! ## Data Format
//!
//! ```json
//! {
//!   "entries": {
//!     "/home/user/src/app/main.go": {
//!       "count": 42,
//!       "last_used": "2025-02-05T10:30:00Z"
//!     }
//!   }
//! }
//! ```

mod score;
mod store;

pub use score::{
    age_hours, format_score, use_rate, ScoringPolicy, SCORE_WIDTH, UNSEEN_SCORE,
};
pub use store::{UsageLog, UsageRecord, UsageStore};
