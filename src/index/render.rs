//! # Renderers
//!
//! Turn a [`RankedList`] into something on disk. Ranking never depends on the
//! output format, so renderers are interchangeable behind [`Renderer`].
//!
//! | Renderer | Output |
//! |----------|--------|
//! | [`FlatListing`] | one `dir/file` per line, written atomically and set read-only |
//! | [`SymlinkFarm`] | a directory of symlinks whose names sort in rank order |

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::builder::RankedList;
use crate::error::{IndexError, Result};
use crate::persist::write_atomic;

/// Full-width solidus used in place of `/` inside link names
pub const ESCAPED_SEPARATOR: char = '\u{FF0F}';

/// Writes a ranked list to its target
pub trait Renderer {
    fn render(&self, list: &RankedList) -> Result<()>;
}

/// Newline-delimited listing of relative paths in rank order
#[derive(Debug, Clone)]
pub struct FlatListing {
    path: PathBuf,
    separator: bool,
}

impl FlatListing {
    /// Listing written to `path`. With `separator`, a blank line marks where
    /// never-used files start.
    pub fn new(path: PathBuf, separator: bool) -> Self {
        Self { path, separator }
    }

    /// The listing contents for `list`
    pub fn format(&self, list: &RankedList) -> String {
        let boundary = if self.separator {
            list.unseen_boundary()
        } else {
            None
        };

        let mut out = String::new();
        for (i, candidate) in list.candidates().iter().enumerate() {
            if boundary == Some(i) {
                out.push('\n');
            }
            // Writing to a String cannot fail
            let _ = writeln!(out, "{}", candidate.relative_path().display());
        }
        out
    }
}

impl Renderer for FlatListing {
    fn render(&self, list: &RankedList) -> Result<()> {
        write_atomic(&self.path, self.format(list).as_bytes(), true)?;
        info!(path = %self.path.display(), files = list.len(), "wrote ranked listing");
        Ok(())
    }
}

/// Directory of symlinks named so that sorting by name reproduces the ranking
#[derive(Debug, Clone)]
pub struct SymlinkFarm {
    dir: PathBuf,
    name_width: usize,
}

impl SymlinkFarm {
    /// Farm rebuilt inside `dir`, link names padded to `name_width` bytes
    pub fn new(dir: PathBuf, name_width: usize) -> Self {
        Self { dir, name_width }
    }

    /// Link names for `list`, in rank order.
    ///
    /// Each name is the 1-based rank, the file name padded to a shared column,
    /// and the relative directory with separators escaped, padded with spaces
    /// to the configured width. Names longer than the width are kept whole.
    pub fn link_names(&self, list: &RankedList) -> Vec<String> {
        let column = list
            .candidates()
            .iter()
            .map(|c| c.display_name().chars().count())
            .max()
            .unwrap_or(0)
            + 3;

        list.candidates()
            .iter()
            .enumerate()
            .map(|(i, candidate)| {
                let dir = escape_dir(&candidate.relative_dir);
                let mut name = format!(
                    "{:04}   {:<column$} {}",
                    i + 1,
                    candidate.display_name(),
                    dir,
                    column = column
                );
                if name.len() < self.name_width {
                    name.push_str(&" ".repeat(self.name_width - name.len()));
                }
                name
            })
            .collect()
    }
}

impl Renderer for SymlinkFarm {
    fn render(&self, list: &RankedList) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(IndexError::io(&self.dir, err)),
        }
        fs::create_dir_all(&self.dir).map_err(|e| IndexError::io(&self.dir, e))?;

        for (candidate, name) in list.candidates().iter().zip(self.link_names(list)) {
            let link = self.dir.join(name);
            create_symlink(&list.absolute_path(candidate), &link)?;
        }

        info!(dir = %self.dir.display(), links = list.len(), "rebuilt symlink farm");
        Ok(())
    }
}

fn escape_dir(dir: &Path) -> String {
    dir.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, &ESCAPED_SEPARATOR.to_string())
        .replace('/', &ESCAPED_SEPARATOR.to_string())
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| IndexError::io(link, e))
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> Result<()> {
    Err(IndexError::Unsupported("symlink farm"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::Candidate;
    use crate::usage::UNSEEN_SCORE;
    use tempfile::TempDir;

    fn sample_list(root: &Path) -> RankedList {
        RankedList::new(
            root.to_path_buf(),
            vec![
                Candidate {
                    filename: "main.go".into(),
                    relative_dir: PathBuf::new(),
                    score: UNSEEN_SCORE,
                },
                Candidate {
                    filename: "server.go".into(),
                    relative_dir: PathBuf::from("cmd/api"),
                    score: 12,
                },
                Candidate {
                    filename: "util.go".into(),
                    relative_dir: PathBuf::from("pkg"),
                    score: UNSEEN_SCORE,
                },
            ],
        )
    }

    #[test]
    fn test_flat_listing_with_separator() {
        let listing = FlatListing::new(PathBuf::from("/unused"), true);
        let text = listing.format(&sample_list(Path::new("/src")));
        assert_eq!(text, "cmd/api/server.go\n\nmain.go\npkg/util.go\n");
    }

    #[test]
    fn test_flat_listing_without_separator() {
        let listing = FlatListing::new(PathBuf::from("/unused"), false);
        let text = listing.format(&sample_list(Path::new("/src")));
        assert_eq!(text, "cmd/api/server.go\nmain.go\npkg/util.go\n");
    }

    #[test]
    fn test_flat_listing_render_is_read_only() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("out").join("index.txt");
        let listing = FlatListing::new(path.clone(), true);

        listing
            .render(&sample_list(temp_dir.path()))
            .expect("render");
        // Second run must replace the read-only file
        listing
            .render(&sample_list(temp_dir.path()))
            .expect("render again");

        let text = fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("cmd/api/server.go\n"));
        assert!(fs::metadata(&path).expect("metadata").permissions().readonly());
    }

    #[test]
    fn test_link_names_layout() {
        let farm = SymlinkFarm::new(PathBuf::from("/unused"), 40);
        let names = farm.link_names(&sample_list(Path::new("/src")));

        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.len() >= 40));
        assert_eq!(names[0].trim_end(), "0001   server.go    cmd\u{FF0F}api");
        assert_eq!(names[1].trim_end(), "0002   main.go");
        assert_eq!(names[2].trim_end(), "0003   util.go      pkg");
        assert!(names.iter().all(|n| !n.contains('/')));
    }

    #[test]
    fn test_link_names_never_truncated() {
        let farm = SymlinkFarm::new(PathBuf::from("/unused"), 5);
        let names = farm.link_names(&sample_list(Path::new("/src")));
        assert!(names[0].starts_with("0001   server.go"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_farm_render() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("src");
        fs::create_dir_all(root.join("cmd/api")).expect("mkdir");
        fs::create_dir_all(root.join("pkg")).expect("mkdir");
        fs::write(root.join("main.go"), "").expect("write");
        fs::write(root.join("cmd/api/server.go"), "").expect("write");
        fs::write(root.join("pkg/util.go"), "").expect("write");

        let links = temp_dir.path().join("links");
        fs::create_dir_all(&links).expect("mkdir");
        fs::write(links.join("stale-link"), "").expect("write");

        let farm = SymlinkFarm::new(links.clone(), 64);
        let list = sample_list(&root);
        farm.render(&list).expect("render");

        let mut entries: Vec<_> = fs::read_dir(&links)
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, farm.link_names(&list));

        let first = links.join(&entries[0]);
        assert_eq!(
            fs::read_link(&first).expect("read_link"),
            root.join("cmd/api/server.go")
        );
    }
}
