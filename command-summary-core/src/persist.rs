//! Small filesystem helpers shared by the store, the recorder and the aggregator.
//!
//! Every write goes to a temp file in the destination directory first and is
//! then renamed over the target, so readers only ever see the old or the new
//! content.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, SummaryError};

/// Replaces `path` with `contents`, creating parent directories as needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| SummaryError::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| SummaryError::io(parent, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| SummaryError::io(tmp.path(), e))?;
    // On failure the temp file is dropped and removed.
    tmp.persist(path)
        .map_err(|e| SummaryError::io(path, e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

/// Serializes `value` as two-space indented JSON and writes it atomically.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| SummaryError::corrupt(path, e))?;
    write_atomic(path, &bytes)
}

/// Reads a file, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SummaryError::io(path, e)),
    }
}

/// Reads and deserializes one JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| SummaryError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| SummaryError::corrupt(path, e))
}

/// Removes a file; a missing file is not an error.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SummaryError::io(path, e)),
    }
}

/// True when `dir` exists and holds at least one entry.
pub fn dir_has_entries(dir: &Path) -> Result<bool> {
    match fs::read_dir(dir) {
        Ok(mut entries) => Ok(entries.next().is_some()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SummaryError::io(dir, e)),
    }
}

/// Lists the `*.json` files directly inside `dir`, sorted by file name.
/// A missing directory yields an empty list.
pub fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SummaryError::io(dir, e)),
    };
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SummaryError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
