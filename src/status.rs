//! # Status Table
//!
//! Human-readable dump of the usage store, most prominent files first.
//!
//! ```text
//!    42x    0.5h   42.0x/h      20202pts /home/user/src/app/main.go
//!     3x   70.2h    0.0x/h          3pts /home/user/src/app/util.go
//! ```

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::usage::{age_hours, use_rate, UsageStore};

/// One line of the status table
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    pub path: PathBuf,
    pub count: u64,
    pub age_hours: f64,
    pub uses_per_hour: f64,
    pub points: u64,
}

/// Rows for every record, sorted by points descending then path
pub fn rows(store: &UsageStore, now: DateTime<Utc>) -> Vec<StatusRow> {
    let policy = store.policy();
    let mut rows: Vec<StatusRow> = store
        .entries()
        .map(|(path, record)| StatusRow {
            path: path.clone(),
            count: record.count,
            age_hours: age_hours(record, now),
            uses_per_hour: use_rate(record, now),
            points: policy.points(Some(record), now),
        })
        .collect();

    rows.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.path.cmp(&b.path)));
    rows
}

/// Render the status table as of `now`
pub fn render(store: &UsageStore, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for row in rows(store, now) {
        let _ = writeln!(
            out,
            "{:>5}x {:>6.1}h {:>6.1}x/h {:>10}pts {}",
            row.count,
            row.age_hours,
            row.uses_per_hour,
            row.points,
            row.path.display()
        );
    }
    out
}
