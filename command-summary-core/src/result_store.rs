//! # result_store: append-only log of transfer results
//!
//! Each command invocation runs in its own process and leaves its results in
//! one or more fragment files. The store folds those fragments into a single
//! cumulative `{"results": [...]}` document at a fixed path, which the upload
//! section later turns into a path tree.
//!
//! Appends are a full read-modify-write cycle: the whole wrapper is loaded,
//! extended and written back through a temp file that is renamed over the
//! store, so a failed write never leaves a half-written log behind.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::{Result, SummaryError};
use crate::persist;

/// One transferred artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub source_path: String,
    pub target_path: String,
    #[serde(rename = "rtUrl", default)]
    pub remote_url: String,
}

impl TransferResult {
    pub fn new(
        source_path: impl Into<String>,
        target_path: impl Into<String>,
        remote_url: impl Into<String>,
    ) -> Self {
        TransferResult {
            source_path: source_path.into(),
            target_path: target_path.into(),
            remote_url: remote_url.into(),
        }
    }
}

/// The persisted unit, shared by fragment files and the store itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsWrapper {
    #[serde(default)]
    pub results: Vec<TransferResult>,
}

impl ResultsWrapper {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Cumulative result log stored at a fixed path.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ResultStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current log. A missing or empty file is the empty wrapper.
    pub fn load(&self) -> Result<ResultsWrapper> {
        let bytes = match persist::read_optional(&self.path)? {
            Some(bytes) => bytes,
            None => return Ok(ResultsWrapper::default()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            warn!(path = %self.path.display(), "Empty result store file");
            return Ok(ResultsWrapper::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Result store is corrupt");
            SummaryError::corrupt(&self.path, e)
        })
    }

    /// Appends `new_results` to the tail of the log. Appending nothing does
    /// not touch the file.
    pub fn append(&self, new_results: &[TransferResult]) -> Result<()> {
        if new_results.is_empty() {
            return Ok(());
        }
        let mut wrapper = self.load()?;
        let previous = wrapper.results.len();
        wrapper.results.extend_from_slice(new_results);
        persist::write_json(&self.path, &wrapper)?;
        info!(
            path = %self.path.display(),
            appended = new_results.len(),
            total = previous + new_results.len(),
            "Appended results to store"
        );
        Ok(())
    }

    /// Reads every fragment before touching the store; a single unreadable
    /// or malformed fragment aborts the whole append.
    pub fn append_fragments<P: AsRef<Path>>(&self, fragments: &[P]) -> Result<usize> {
        let mut collected = Vec::new();
        for fragment in fragments {
            let wrapper = read_fragment(fragment.as_ref())?;
            collected.extend(wrapper.results);
        }
        self.append(&collected)?;
        Ok(collected.len())
    }

    /// Deletes the log, starting a new logical run.
    pub fn reset(&self) -> Result<()> {
        if persist::remove_if_exists(&self.path)? {
            info!(path = %self.path.display(), "Removed result store");
        }
        Ok(())
    }
}

/// Reads one fragment file produced by a command execution.
pub fn read_fragment(path: &Path) -> Result<ResultsWrapper> {
    persist::read_json(path).inspect_err(|e| {
        error!(fragment = %path.display(), error = %e, "Failed to read result fragment");
    })
}
