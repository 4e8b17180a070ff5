//! # Usage Store
//!
//! Persistent record of how often, and how recently, each file was used.
//!
//! The store is loaded once per invocation, mutated in memory, and written
//! back with a single atomic replace. There is no locking: two invocations
//! racing on the same store file lose updates, last writer wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::score::ScoringPolicy;
use crate::error::{IndexError, Result};
use crate::persist::write_atomic;

/// Usage observations for a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Number of recorded uses
    pub count: u64,
    /// When the file was last used
    pub last_used: DateTime<Utc>,
}

/// Serialized form of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageLog {
    /// Map of absolute file path -> usage record
    #[serde(default)]
    pub entries: BTreeMap<PathBuf, UsageRecord>,
}

/// Usage records backed by a file on disk
#[derive(Debug)]
pub struct UsageStore {
    path: PathBuf,
    policy: ScoringPolicy,
    log: UsageLog,
}

impl UsageStore {
    /// Load the store from `path`. A missing file yields an empty store.
    pub fn load(path: &Path, policy: ScoringPolicy) -> Result<Self> {
        let log = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| IndexError::Decode {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no usage store yet, starting empty");
                UsageLog::default()
            }
            Err(err) => return Err(IndexError::io(path, err)),
        };

        debug!(path = %path.display(), entries = log.entries.len(), "loaded usage store");
        Ok(Self {
            path: path.to_path_buf(),
            policy,
            log,
        })
    }

    /// Record a use of `path` now, then prune stale records
    pub fn record_use(&mut self, path: &Path) -> Result<()> {
        self.record_use_at(path, Utc::now())
    }

    /// Record a use of `path` at `now`, then prune stale records.
    ///
    /// The path is canonicalized before it is used as a key. Directories are
    /// rejected with [`IndexError::InvalidTarget`] and leave the store
    /// untouched.
    pub fn record_use_at(&mut self, path: &Path, now: DateTime<Utc>) -> Result<()> {
        let absolute = path.canonicalize().map_err(|e| IndexError::io(path, e))?;
        let metadata = fs::metadata(&absolute).map_err(|e| IndexError::io(&absolute, e))?;
        if metadata.is_dir() {
            return Err(IndexError::InvalidTarget { path: absolute });
        }

        let record = self
            .log
            .entries
            .entry(absolute.clone())
            .or_insert(UsageRecord {
                count: 0,
                last_used: now,
            });
        record.count += 1;
        record.last_used = now;
        debug!(path = %absolute.display(), count = record.count, "recorded use");

        self.prune_at(now);
        Ok(())
    }

    /// Drop stale records as of now
    pub fn prune(&mut self) -> usize {
        self.prune_at(Utc::now())
    }

    /// Drop records that are old and rarely used. Returns how many were removed.
    pub fn prune_at(&mut self, now: DateTime<Utc>) -> usize {
        let policy = self.policy;
        let before = self.log.entries.len();
        self.log.entries.retain(|path, record| {
            let stale = policy.is_stale(record, now);
            if stale {
                debug!(path = %path.display(), count = record.count, "pruning stale record");
            }
            !stale
        });
        before - self.log.entries.len()
    }

    /// Write the store back to disk as a single atomic replace.
    ///
    /// The payload goes to a sibling temp file which is renamed over the
    /// store only after the full byte count has been written.
    pub fn persist(&self) -> Result<()> {
        let payload = serde_json::to_vec_pretty(&self.log).map_err(|source| IndexError::Encode {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, &payload, false)?;
        info!(path = %self.path.display(), entries = self.log.entries.len(), "saved usage store");
        Ok(())
    }

    /// Look up the record for an absolute path
    pub fn get(&self, path: &Path) -> Option<&UsageRecord> {
        self.log.entries.get(path)
    }

    /// Iterate over all records in path order
    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &UsageRecord)> {
        self.log.entries.iter()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.log.entries.len()
    }

    /// Check if there are any recorded usages
    pub fn is_empty(&self) -> bool {
        self.log.entries.is_empty()
    }

    /// The scoring policy this store prunes with
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// The file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a record directly, bypassing path resolution
    pub fn insert(&mut self, path: PathBuf, record: UsageRecord) {
        self.log.entries.insert(path, record);
    }
}
