//! codeindex - keeps a usage-ranked index of source files
//!
//! This library records which files are used and how recently, scores them,
//! and writes an ordered index of a directory tree with the most relevant
//! files first.

pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod status;
pub mod usage;

pub use error::{IndexError, Result};
