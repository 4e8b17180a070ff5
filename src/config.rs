//! # Configuration
//!
//! Settings are resolved once at startup and handed to the store, the scoring
//! policy and the renderers. Nothing else in the crate looks at the
//! environment.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/codeindex/config.json
//! ```
//!
//! Every field is optional. Paths that are left out fall back to the
//! platform data directory resolved through the `directories` crate:
//!
//! ```text
//! ~/.local/share/codeindex/
//! ├── usage.json   # usage store
//! ├── index.txt    # flat ranked listing
//! └── links/       # symlink farm
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::usage::ScoringPolicy;

const APP_NAME: &str = "codeindex";

/// Default suffix used to select files when `-s` is not given
pub const DEFAULT_SUFFIX: &str = ".go";

/// Default total byte width of a symlink name in the link farm
pub const DEFAULT_LINK_NAME_WIDTH: usize = 233;

/// On-disk configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    listing_path: Option<PathBuf>,
    links_dir: Option<PathBuf>,
    suffix: Option<String>,
    recency_window_hours: Option<f64>,
    boost_factor: Option<f64>,
    prune_min_age_hours: Option<f64>,
    prune_min_ratio: Option<f64>,
    listing_separator: Option<bool>,
    link_name_width: Option<usize>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the usage store is persisted
    pub store_path: PathBuf,
    /// Where the flat ranked listing is written
    pub listing_path: PathBuf,
    /// Directory recreated for the symlink farm
    pub links_dir: PathBuf,
    /// File-name suffix selecting which files are indexed
    pub suffix: String,
    /// Constants driving score and prune decisions
    pub policy: ScoringPolicy,
    /// Insert a blank line between used and never-used files in the listing
    pub listing_separator: bool,
    /// Total byte width link names are padded to
    pub link_name_width: usize,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let dirs = project_dirs()?;
        let path = dirs.config_dir().join("config.json");
        Self::load_from(&path, dirs.data_dir())
    }

    /// Load configuration from a specific file. A missing file yields the
    /// defaults, with data files placed under `data_dir`.
    pub fn load_from(path: &Path, data_dir: &Path) -> Result<Self> {
        let file = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            ConfigFile::default()
        };
        Ok(Self::resolve(file, data_dir))
    }

    /// Load a config file given on the command line, using the platform data
    /// directory for any path it leaves out.
    pub fn load_with_override(path: &Path) -> Result<Self> {
        let dirs = project_dirs()?;
        Self::load_required(path, dirs.data_dir())
    }

    /// Like [`Config::load_from`], but a missing file is an error. Used for
    /// paths the user named explicitly.
    pub fn load_required(path: &Path, data_dir: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        Self::load_from(path, data_dir)
    }

    /// Defaults with every data file placed under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self::resolve(ConfigFile::default(), data_dir)
    }

    fn resolve(file: ConfigFile, data_dir: &Path) -> Self {
        let defaults = ScoringPolicy::default();
        Self {
            store_path: file
                .store_path
                .unwrap_or_else(|| data_dir.join("usage.json")),
            listing_path: file
                .listing_path
                .unwrap_or_else(|| data_dir.join("index.txt")),
            links_dir: file.links_dir.unwrap_or_else(|| data_dir.join("links")),
            suffix: file.suffix.unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
            policy: ScoringPolicy {
                recency_window_hours: file
                    .recency_window_hours
                    .unwrap_or(defaults.recency_window_hours),
                boost_factor: file.boost_factor.unwrap_or(defaults.boost_factor),
                prune_min_age_hours: file
                    .prune_min_age_hours
                    .unwrap_or(defaults.prune_min_age_hours),
                prune_min_ratio: file.prune_min_ratio.unwrap_or(defaults.prune_min_ratio),
            },
            listing_separator: file.listing_separator.unwrap_or(true),
            link_name_width: file.link_name_width.unwrap_or(DEFAULT_LINK_NAME_WIDTH),
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .context("Could not determine application directories")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = Config::load_from(&temp_dir.path().join("nope.json"), temp_dir.path())
            .expect("load_from");

        assert_eq!(config.store_path, temp_dir.path().join("usage.json"));
        assert_eq!(config.listing_path, temp_dir.path().join("index.txt"));
        assert_eq!(config.links_dir, temp_dir.path().join("links"));
        assert_eq!(config.suffix, ".go");
        assert!(config.listing_separator);
        assert_eq!(config.link_name_width, DEFAULT_LINK_NAME_WIDTH);
        assert_eq!(config.policy, ScoringPolicy::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"suffix": ".rs", "recency_window_hours": 72.0, "store_path": "/tmp/x.json"}"#,
        )
        .expect("write");

        let config = Config::load_from(&path, temp_dir.path()).expect("load_from");
        assert_eq!(config.suffix, ".rs");
        assert_eq!(config.store_path, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.listing_path, temp_dir.path().join("index.txt"));
        assert!((config.policy.recency_window_hours - 72.0).abs() < f64::EPSILON);
        let default_boost = ScoringPolicy::default().boost_factor;
        assert!((config.policy.boost_factor - default_boost).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"suffix": ".rs", "colour": "blue"}"#).expect("write");

        assert!(Config::load_from(&path, temp_dir.path()).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").expect("write");

        let err = Config::load_from(&path, temp_dir.path()).expect_err("should fail");
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_with_data_dir_matches_missing_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let from_dir = Config::with_data_dir(temp_dir.path());
        let from_file = Config::load_from(&temp_dir.path().join("nope.json"), temp_dir.path())
            .expect("load_from");

        assert_eq!(from_dir.store_path, from_file.store_path);
        assert_eq!(from_dir.listing_path, from_file.listing_path);
        assert_eq!(from_dir.links_dir, from_file.links_dir);
        assert_eq!(from_dir.suffix, from_file.suffix);
        assert_eq!(from_dir.policy, from_file.policy);
    }

    #[test]
    fn test_load_required_rejects_missing_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let missing = temp_dir.path().join("nope.json");

        let err = Config::load_required(&missing, temp_dir.path()).expect_err("missing");
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_required_reads_existing_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"suffix": ".py"}"#).expect("write");

        let config = Config::load_required(&path, temp_dir.path()).expect("load_required");
        assert_eq!(config.suffix, ".py");
    }
}
