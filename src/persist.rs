//! # Atomic Writes
//!
//! Generated files (the usage store, the ranked listing) are replaced in one
//! step: the payload is written to a sibling `*.tmp` file, checked for a full
//! write, synced, and renamed over the target.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};

/// Replace `target` with `payload` via a temp file and rename.
///
/// A write that stores fewer bytes than the payload aborts with
/// [`IndexError::ShortWrite`] and leaves `target` untouched.
pub fn write_atomic(target: &Path, payload: &[u8], read_only: bool) -> Result<()> {
    replace_file(target, read_only, |file, temp_path| {
        write_payload(file, temp_path, payload)
    })
}

/// Write `payload` with a single `write` call and check the byte count
pub fn write_payload<W: Write>(writer: &mut W, path: &Path, payload: &[u8]) -> Result<()> {
    let written = writer.write(payload).map_err(|e| IndexError::io(path, e))?;
    if written != payload.len() {
        return Err(IndexError::ShortWrite {
            path: path.to_path_buf(),
            written,
            expected: payload.len(),
        });
    }
    Ok(())
}

/// Fill a sibling temp file with `fill`, then rename it over `target`.
/// On any failure the temp file is removed and `target` is not touched.
fn replace_file<F>(target: &Path, read_only: bool, fill: F) -> Result<()>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = write_temp(&temp_path, read_only, fill)
        .and_then(|()| fs::rename(&temp_path, target).map_err(|e| IndexError::io(target, e)));
    if result.is_err() {
        // Best effort; the original error is what matters
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp<F>(temp_path: &Path, read_only: bool, fill: F) -> Result<()>
where
    F: FnOnce(&mut File, &Path) -> Result<()>,
{
    let mut file = File::create(temp_path).map_err(|e| IndexError::io(temp_path, e))?;
    fill(&mut file, temp_path)?;
    file.sync_all().map_err(|e| IndexError::io(temp_path, e))?;

    if read_only {
        let mut perms = file
            .metadata()
            .map_err(|e| IndexError::io(temp_path, e))?
            .permissions();
        perms.set_readonly(true);
        fs::set_permissions(temp_path, perms).map_err(|e| IndexError::io(temp_path, e))?;
    }
    Ok(())
}
