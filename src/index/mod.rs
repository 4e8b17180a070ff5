//! # Index Module
//!
//! Builds the ranked index of files under a directory tree and renders it.
//!
//! ## Pipeline
//!
//! ```text
//! directory walk -> suffix filter -> score lookup -> sort -> render
//! ```
//!
//! - [`RankedIndexBuilder`] - walk, score and order candidates
//! - [`FlatListing`] / [`SymlinkFarm`] - interchangeable [`Renderer`]s

pub mod builder;
pub mod render;

pub use builder::{Candidate, RankedIndexBuilder, RankedList};
pub use render::{FlatListing, Renderer, SymlinkFarm, ESCAPED_SEPARATOR};
