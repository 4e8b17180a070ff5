//! # codeindex CLI Entry Point
//!
//! Keeps a ranked index of the source files under a directory, most used and
//! most recently used files first.
//!
//! ## Usage
//!
//! ```bash
//! # Record that a file was opened
//! codeindex use ./pkg/server/server.go
//!
//! # Rebuild the ranked listing for a tree
//! codeindex index ~/src/myproject
//!
//! # Same, as a directory of symlinks instead of a listing
//! codeindex index --links ~/src/myproject
//!
//! # Index Rust files instead of Go files
//! codeindex -s .rs index ~/src/myproject
//!
//! # Show the usage table
//! codeindex status
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`,
//! or `debug` with `--verbose`).

use codeindex::config::Config;
use codeindex::index::{FlatListing, RankedIndexBuilder, Renderer, SymlinkFarm};
use codeindex::status;
use codeindex::usage::UsageStore;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// codeindex - rank source files by how often and how recently you use them
#[derive(Parser, Debug)]
#[command(name = "codeindex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keeps a usage-ranked index of source files", long_about = None)]
struct Args {
    /// File-name suffix to index (defaults to the configured suffix, ".go")
    #[arg(short, long, value_name = "SUFFIX", global = true)]
    suffix: Option<String>,

    /// Path to a config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the ranked index of DIR and write it out
    Index {
        /// Directory to index
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Write a directory of symlinks instead of a flat listing
        #[arg(long)]
        links: bool,
    },
    /// Record a use of PATH
    Use {
        /// File that was used
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print usage statistics for every tracked file
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load_with_override(path)?,
        None => Config::load()?,
    };
    if let Some(suffix) = args.suffix {
        config.suffix = suffix;
    }
    debug!(?config, "resolved configuration");

    match args.command {
        Command::Index { dir, links } => run_index(&config, &dir, links),
        Command::Use { path } => run_use(&config, &path),
        Command::Status => run_status(&config),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_store(config: &Config) -> Result<UsageStore> {
    UsageStore::load(&config.store_path, config.policy).with_context(|| {
        format!(
            "Failed to load usage store: {}",
            config.store_path.display()
        )
    })
}

fn run_index(config: &Config, dir: &Path, links: bool) -> Result<()> {
    let mut store = load_store(config)?;
    let now = Utc::now();

    // Refresh the store so long-dead entries do not linger between uses
    if store.prune_at(now) > 0 {
        store.persist().context("Failed to save usage store")?;
    }

    let list = RankedIndexBuilder::new(&store)
        .at(now)
        .build(dir, &config.suffix)
        .with_context(|| format!("Failed to index directory: {}", dir.display()))?;

    let renderer: Box<dyn Renderer> = if links {
        Box::new(SymlinkFarm::new(
            config.links_dir.clone(),
            config.link_name_width,
        ))
    } else {
        Box::new(FlatListing::new(
            config.listing_path.clone(),
            config.listing_separator,
        ))
    };
    renderer
        .render(&list)
        .context("Failed to write ranked index")?;

    Ok(())
}

fn run_use(config: &Config, path: &Path) -> Result<()> {
    let mut store = load_store(config)?;
    store
        .record_use(path)
        .with_context(|| format!("Failed to record use of: {}", path.display()))?;
    store.persist().context("Failed to save usage store")?;
    Ok(())
}

fn run_status(config: &Config) -> Result<()> {
    let store = load_store(config)?;
    print!("{}", status::render(&store, Utc::now()));
    Ok(())
}
