//! # Ranked Index Builder
//!
//! Walks a directory tree, scores every file whose name ends with the
//! requested suffix against the usage store, and sorts the result into a
//! total order:
//!
//! 1. score, ascending
//! 2. directory relative to the root, compared as a plain byte string
//! 3. file name, compared as raw bytes
//!
//! Byte-wise directory comparison puts the root first, a directory ahead of
//! its own subdirectories, and `a-b` ahead of `a/b`. Two candidates can never
//! tie on all three keys because directory plus file name is a unique path.
//!
//! File names are kept as raw OS strings, so names that are not valid UTF-8
//! are indexed like any other; they are only converted lossily for display.
//!
//! Any walk failure aborts the build; a partial index is never returned.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{IndexError, Result};
use crate::usage::{UsageStore, UNSEEN_SCORE};

/// A file selected for the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// File name without directory
    pub filename: OsString,
    /// Directory relative to the walk root; empty for files at the root
    pub relative_dir: PathBuf,
    /// Rank key from the scoring policy, lower first
    pub score: u64,
}

impl Candidate {
    /// Path relative to the walk root
    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir.join(&self.filename)
    }

    /// File name for display, with invalid UTF-8 replaced
    pub fn display_name(&self) -> String {
        self.filename.to_string_lossy().into_owned()
    }

    /// Whether the file has any usage history
    pub fn is_seen(&self) -> bool {
        self.score < UNSEEN_SCORE
    }

    fn dir_key(&self) -> &[u8] {
        self.relative_dir.as_os_str().as_encoded_bytes()
    }

    fn name_key(&self) -> &[u8] {
        self.filename.as_encoded_bytes()
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.dir_key().cmp(other.dir_key()))
            .then_with(|| self.name_key().cmp(other.name_key()))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Candidates in rank order, together with the root they were found under
#[derive(Debug, Clone)]
pub struct RankedList {
    root: PathBuf,
    candidates: Vec<Candidate>,
}

impl RankedList {
    /// Sort `candidates` into rank order
    pub fn new(root: PathBuf, mut candidates: Vec<Candidate>) -> Self {
        candidates.sort();
        Self { root, candidates }
    }

    /// Absolute root of the walk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidates in rank order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Absolute path of a candidate
    pub fn absolute_path(&self, candidate: &Candidate) -> PathBuf {
        self.root.join(candidate.relative_path())
    }

    /// Index of the first never-used file, if any used file precedes it
    pub fn unseen_boundary(&self) -> Option<usize> {
        let first_unseen = self.candidates.iter().position(|c| !c.is_seen())?;
        (first_unseen > 0).then_some(first_unseen)
    }
}

/// Builds a [`RankedList`] from a directory walk and a usage store
#[derive(Debug)]
pub struct RankedIndexBuilder<'a> {
    store: &'a UsageStore,
    now: DateTime<Utc>,
}

impl<'a> RankedIndexBuilder<'a> {
    /// Score against `store` as of the current time
    pub fn new(store: &'a UsageStore) -> Self {
        Self {
            store,
            now: Utc::now(),
        }
    }

    /// Score as of `now` instead of the current time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Walk `root` and rank every file whose name ends with `suffix`
    pub fn build(&self, root: &Path, suffix: &str) -> Result<RankedList> {
        let root = root.canonicalize().map_err(|e| IndexError::io(root, e))?;
        if !root.is_dir() {
            return Err(IndexError::io(
                &root,
                io::Error::other("index root is not a directory"),
            ));
        }

        debug!(root = %root.display(), suffix, "walking directory tree");
        let policy = self.store.policy();
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&root).min_depth(1) {
            let entry = entry.map_err(|err| walk_error(&root, err))?;
            if entry.file_type().is_dir() {
                continue;
            }

            let filename = entry.file_name();
            if !filename.as_encoded_bytes().ends_with(suffix.as_bytes()) {
                continue;
            }

            let relative_dir = entry
                .path()
                .parent()
                .and_then(|parent| parent.strip_prefix(&root).ok())
                .map(Path::to_path_buf)
                .unwrap_or_default();

            candidates.push(Candidate {
                filename: filename.to_os_string(),
                relative_dir,
                score: policy.score(self.store.get(entry.path()), self.now),
            });
        }

        let list = RankedList::new(root, candidates);
        debug!(
            files = list.len(),
            seen = list.candidates().iter().filter(|c| c.is_seen()).count(),
            "ranked index built"
        );
        Ok(list)
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> IndexError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    IndexError::Io { path, source }
}
