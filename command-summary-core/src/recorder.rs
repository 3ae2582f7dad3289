//! Entry points used by individual commands to leave their output behind.
//!
//! Every function validates its input against the expected schema before
//! anything is written, then stores it under the owning section directory.
//! Recorded data files get a random name so repeated commands never clobber
//! each other.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::SummaryConfig;
use crate::error::{Result, SummaryError};
use crate::persist;
use crate::result_store::ResultStore;
use crate::scan::{IndexedScanFile, ScanKind, ScanResult};
use crate::sections::build_info::BuildInfoRecord;
use crate::sections::security::SecurityRecord;
use crate::sections::Section;

/// Appends the results of every fragment file to the result store.
/// Returns the number of results appended.
pub fn record_upload<P: AsRef<Path>>(config: &SummaryConfig, fragments: &[P]) -> Result<usize> {
    let store = ResultStore::new(config.result_store_path());
    let appended = store.append_fragments(fragments)?;
    info!(fragments = fragments.len(), appended, "Recorded upload results");
    Ok(appended)
}

/// Stores a published build-info record.
pub fn record_build_info(config: &SummaryConfig, file: &Path) -> Result<PathBuf> {
    let record: BuildInfoRecord = persist::read_json(file)?;
    let path = store_data_file(&config.section_dir(Section::BuildInfo), &record)?;
    info!(build = %record.name, number = %record.number, path = %path.display(), "Recorded build info");
    Ok(path)
}

/// Stores the outcome of a security command.
pub fn record_security(config: &SummaryConfig, file: &Path) -> Result<PathBuf> {
    let record: SecurityRecord = persist::read_json(file)?;
    let path = store_data_file(&config.section_dir(Section::Security), &record)?;
    info!(command = %record.command, target = %record.target, path = %path.display(), "Recorded security result");
    Ok(path)
}

/// Indexes a scan outcome under `name` for the build-info section to look up.
pub fn record_scan(config: &SummaryConfig, kind: ScanKind, name: &str, file: &Path) -> Result<PathBuf> {
    if name.trim().is_empty() {
        return Err(SummaryError::Configuration(
            "a scan must be recorded under a non-empty name".to_string(),
        ));
    }
    let result: ScanResult = persist::read_json(file)?;
    let indexed = IndexedScanFile {
        name: name.to_string(),
        result,
    };
    let path = store_data_file(&config.scan_index_dir().join(kind.dir_name()), &indexed)?;
    info!(%kind, name, path = %path.display(), "Indexed scan result");
    Ok(path)
}

/// Removes every recorded artifact, starting a new logical run.
pub fn reset(config: &SummaryConfig) -> Result<()> {
    let dir = config.summary_dir();
    match fs::remove_dir_all(&dir) {
        Ok(()) => {
            info!(dir = %dir.display(), "Cleared command summary directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SummaryError::io(dir, e)),
    }
}

fn store_data_file<T: Serialize>(dir: &Path, value: &T) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", Uuid::new_v4()));
    persist::write_json(&path, value)?;
    Ok(path)
}
