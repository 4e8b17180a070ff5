//! # Errors
//!
//! Error type shared by the usage store, the index builder and the renderers.
//! Every filesystem failure carries the path it happened on.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by the indexing core
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("short write to {}: wrote {written} of {expected} bytes", path.display())]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("will not record usage for a directory: {}", path.display())]
    InvalidTarget { path: PathBuf },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl IndexError {
    /// Wrap an I/O error together with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias for indexing operations
pub type Result<T> = std::result::Result<T, IndexError>;
