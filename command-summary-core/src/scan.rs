//! Indexed scan files and the per-finalize scan lookup.
//!
//! Scan commands record one small JSON file per scanned entity under
//! `scan-index/<kind>/`. The build-info section resolves those files into a
//! [`ScanLookup`] keyed by scan kind and the entity's declared name and consults it while
//! rendering; the lookup lives only as long as that one render.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::contract::{IndexedFileSource, ScanResolver};
use crate::error::{BoxError, SummaryError};
use crate::persist;

/// Value shown for entries without a scan.
pub const NOT_SCANNED: &str = "not scanned";

/// Kind of scan an indexed file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    Docker,
    Build,
    Binaries,
}

impl ScanKind {
    pub const ALL: [ScanKind; 3] = [ScanKind::Docker, ScanKind::Build, ScanKind::Binaries];

    /// Directory name under `scan-index/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ScanKind::Docker => "docker-scan",
            ScanKind::Build => "build-scan",
            ScanKind::Binaries => "binaries-scan",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<ScanKind> {
        ScanKind::ALL.into_iter().find(|kind| kind.dir_name() == name)
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ScanKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker" | "docker-scan" => Ok(ScanKind::Docker),
            "build" | "build-scan" => Ok(ScanKind::Build),
            "binaries" | "binaries-scan" | "binary" => Ok(ScanKind::Binaries),
            other => Err(format!(
                "unknown scan kind '{other}', expected one of: docker, build, binaries"
            )),
        }
    }
}

/// Outcome of one scan, as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub violations: String,
    pub vulnerabilities: String,
}

impl ScanResult {
    pub fn new(violations: impl Into<String>, vulnerabilities: impl Into<String>) -> Self {
        ScanResult {
            violations: violations.into(),
            vulnerabilities: vulnerabilities.into(),
        }
    }

    pub fn not_scanned() -> Self {
        ScanResult::new(NOT_SCANNED, NOT_SCANNED)
    }
}

/// On-disk shape of an indexed scan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedScanFile {
    pub name: String,
    #[serde(flatten)]
    pub result: ScanResult,
}

/// One indexed file together with the kind and declared name it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry {
    pub kind: ScanKind,
    pub name: String,
    pub path: PathBuf,
}

/// Scan kind and declared name to scan outcome, plus the fallback for
/// unscanned entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLookup {
    results: HashMap<(ScanKind, String), ScanResult>,
    fallback: ScanResult,
}

impl ScanLookup {
    pub fn new(fallback: ScanResult) -> Self {
        ScanLookup {
            results: HashMap::new(),
            fallback,
        }
    }

    /// Resolves every entry; an entry that fails to resolve is logged and
    /// left to the fallback.
    pub fn build(entries: &[IndexedEntry], resolver: &dyn ScanResolver) -> Self {
        let mut lookup = ScanLookup::new(resolver.fallback());
        for entry in entries {
            match resolver.resolve(entry.kind, &entry.path) {
                Ok(result) => lookup.insert(entry.kind, &entry.name, result),
                Err(e) => warn!(
                    name = %entry.name,
                    kind = %entry.kind,
                    file = %entry.path.display(),
                    error = %e,
                    "Failed to resolve scan result"
                ),
            }
        }
        lookup
    }

    pub fn insert(&mut self, kind: ScanKind, name: &str, result: ScanResult) {
        if self
            .results
            .insert((kind, name.to_string()), result)
            .is_some()
        {
            debug!(%kind, name, "Scan result replaced by a later entry with the same name");
        }
    }

    /// Outcome of the `kind` scan for `name`, or the fallback when it was not scanned.
    pub fn get(&self, kind: ScanKind, name: &str) -> &ScanResult {
        self.results
            .get(&(kind, name.to_string()))
            .unwrap_or(&self.fallback)
    }

    pub fn is_scanned(&self, kind: ScanKind, name: &str) -> bool {
        self.results.contains_key(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Enumerates `scan-index/<kind>/*.json` files.
#[derive(Debug, Clone)]
pub struct ScanIndexDirectory {
    root: PathBuf,
}

impl ScanIndexDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ScanIndexDirectory { root: root.into() }
    }

    fn entries_for(&self, kind: ScanKind, dir: &Path) -> Result<Vec<IndexedEntry>, SummaryError> {
        let mut entries = Vec::new();
        for path in persist::json_files(dir)? {
            match persist::read_json::<IndexedScanFile>(&path) {
                Ok(file) => entries.push(IndexedEntry {
                    kind,
                    name: file.name,
                    path,
                }),
                Err(e) => warn!(
                    %kind,
                    file = %path.display(),
                    error = %e,
                    "Skipping unreadable indexed scan file"
                ),
            }
        }
        Ok(entries)
    }
}

impl IndexedFileSource for ScanIndexDirectory {
    fn indexed_files(&self) -> Result<Vec<IndexedEntry>, BoxError> {
        let dirs = match fs::read_dir(&self.root) {
            Ok(dirs) => dirs,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Box::new(SummaryError::io(&self.root, e))),
        };
        let mut kind_dirs = Vec::new();
        for dir in dirs {
            let path = dir.map_err(|e| SummaryError::io(&self.root, e))?.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            match ScanKind::from_dir_name(dir_name) {
                Some(kind) => kind_dirs.push((kind, path)),
                None => debug!(dir = %path.display(), "Skipping unknown scan index directory"),
            }
        }
        // Keep enumeration stable regardless of directory iteration order.
        kind_dirs.sort_by_key(|(kind, _)| ScanKind::ALL.iter().position(|k| k == kind));

        let mut entries = Vec::new();
        for (kind, path) in kind_dirs {
            entries.extend(self.entries_for(kind, &path)?);
        }
        Ok(entries)
    }
}

/// Reads the outcome straight out of the indexed file.
#[derive(Debug, Clone, Default)]
pub struct IndexedFileResolver;

impl ScanResolver for IndexedFileResolver {
    fn resolve(&self, _kind: ScanKind, file: &Path) -> Result<ScanResult, BoxError> {
        let indexed: IndexedScanFile = persist::read_json(file)?;
        Ok(indexed.result)
    }

    fn fallback(&self) -> ScanResult {
        ScanResult::not_scanned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockScanResolver;
    use tempfile::tempdir;

    fn write_indexed(root: &Path, kind: ScanKind, file: &str, name: &str, violations: &str) {
        let dir = root.join(kind.dir_name());
        fs::create_dir_all(&dir).unwrap();
        let indexed = IndexedScanFile {
            name: name.to_string(),
            result: ScanResult::new(violations, "0"),
        };
        fs::write(dir.join(file), serde_json::to_vec(&indexed).unwrap()).unwrap();
    }

    #[test]
    fn scan_kind_parses_short_and_directory_names() {
        assert_eq!("docker".parse::<ScanKind>().unwrap(), ScanKind::Docker);
        assert_eq!("build-scan".parse::<ScanKind>().unwrap(), ScanKind::Build);
        assert_eq!("binaries".parse::<ScanKind>().unwrap(), ScanKind::Binaries);
        assert!("sbom".parse::<ScanKind>().is_err());
    }

    #[test]
    fn index_directory_enumerates_known_kinds_in_fixed_order() {
        let dir = tempdir().unwrap();
        write_indexed(dir.path(), ScanKind::Binaries, "1.json", "bin-module", "1");
        write_indexed(dir.path(), ScanKind::Docker, "1.json", "nginx:1.25", "2");
        fs::create_dir_all(dir.path().join("sarif-reports")).unwrap();
        fs::write(dir.path().join("sarif-reports/x.json"), "{}").unwrap();

        let entries = ScanIndexDirectory::new(dir.path()).indexed_files().unwrap();
        let kinds: Vec<_> = entries.iter().map(|e| (e.kind, e.name.as_str())).collect();
        assert_eq!(
            kinds,
            vec![(ScanKind::Docker, "nginx:1.25"), (ScanKind::Binaries, "bin-module")]
        );
    }

    #[test]
    fn missing_index_directory_has_no_entries() {
        let dir = tempdir().unwrap();
        let source = ScanIndexDirectory::new(dir.path().join("scan-index"));
        assert!(source.indexed_files().unwrap().is_empty());
    }

    #[test]
    fn lookup_falls_back_for_failed_and_unknown_entries() {
        let mut resolver = MockScanResolver::new();
        resolver
            .expect_fallback()
            .returning(ScanResult::not_scanned);
        resolver.expect_resolve().returning(|kind, _| match kind {
            ScanKind::Build => Ok(ScanResult::new("3", "7")),
            _ => Err("backend unavailable".into()),
        });

        let entries = vec![
            IndexedEntry {
                kind: ScanKind::Build,
                name: "my-build".into(),
                path: PathBuf::from("build.json"),
            },
            IndexedEntry {
                kind: ScanKind::Docker,
                name: "nginx".into(),
                path: PathBuf::from("docker.json"),
            },
        ];
        let lookup = ScanLookup::build(&entries, &resolver);

        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get(ScanKind::Build, "my-build"), &ScanResult::new("3", "7"));
        assert!(!lookup.is_scanned(ScanKind::Docker, "nginx"));
        assert_eq!(lookup.get(ScanKind::Docker, "nginx"), &ScanResult::not_scanned());
        assert_eq!(lookup.get(ScanKind::Build, "never-indexed"), &ScanResult::not_scanned());
    }

    #[test]
    fn lookup_keeps_kinds_apart_for_the_same_name() {
        let mut lookup = ScanLookup::new(ScanResult::not_scanned());
        lookup.insert(ScanKind::Build, "shop", ScanResult::new("1", "2"));
        lookup.insert(ScanKind::Binaries, "shop", ScanResult::new("3", "4"));

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get(ScanKind::Build, "shop"), &ScanResult::new("1", "2"));
        assert_eq!(lookup.get(ScanKind::Binaries, "shop"), &ScanResult::new("3", "4"));
        assert_eq!(lookup.get(ScanKind::Docker, "shop"), &ScanResult::not_scanned());
    }

    #[test]
    fn malformed_indexed_file_is_skipped() {
        let dir = tempdir().unwrap();
        write_indexed(dir.path(), ScanKind::Docker, "good.json", "nginx:1.25", "2");
        fs::write(dir.path().join("docker-scan/bad.json"), "{").unwrap();

        let entries = ScanIndexDirectory::new(dir.path()).indexed_files().unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["nginx:1.25"]);
    }

    #[test]
    fn file_resolver_reads_the_recorded_outcome() {
        let dir = tempdir().unwrap();
        write_indexed(dir.path(), ScanKind::Docker, "a.json", "img", "5");
        let path = dir.path().join("docker-scan/a.json");
        let result = IndexedFileResolver.resolve(ScanKind::Docker, &path).unwrap();
        assert_eq!(result, ScanResult::new("5", "0"));
    }
}
