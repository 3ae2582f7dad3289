//! # contract: collaborator interfaces consumed by the aggregator
//!
//! The aggregator does not talk to the platform or to a scan backend itself.
//! Everything it needs from the outside world comes through the traits below,
//! each consulted once per finalize cycle, in section order.
//!
//! ## Interface & Extensibility
//! - [`PlatformClient`] resolves the platform base URL and major version used for links.
//! - [`ScanCollector`] turns the security section's data into markdown.
//! - [`IndexedFileSource`] enumerates the indexed scan files the build-info section cross-references.
//! - [`ScanResolver`] resolves one indexed entry into a [`ScanResult`], plus the fallback shown for unscanned entries.
//!
//! File-backed defaults live in [`crate::sections`] and [`crate::scan`]; the CLI crate
//! supplies the platform clients.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall` so tests can script every collaborator.

use std::path::Path;

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::BoxError;
use crate::links::PlatformDetails;
use crate::scan::{IndexedEntry, ScanKind, ScanResult};

/// Source of the platform details every rendered link depends on.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Returns the platform base URL and major version.
    async fn platform_details(&self) -> Result<PlatformDetails, BoxError>;
}

/// Produces the security section markdown from the files under `section_dir`.
///
/// `Ok(None)` means there was nothing to report this run.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ScanCollector: Send + Sync {
    fn collect_markdown(
        &self,
        section_dir: &Path,
        platform: &PlatformDetails,
    ) -> Result<Option<String>, BoxError>;
}

/// Enumerates indexed scan files emitted next to build-info publication.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait IndexedFileSource: Send + Sync {
    fn indexed_files(&self) -> Result<Vec<IndexedEntry>, BoxError>;
}

/// Resolves scan outcomes for indexed entries.
///
/// Keyed by opaque scan kinds so no particular scan backend has to be
/// compiled in.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ScanResolver: Send + Sync {
    /// Resolves the outcome recorded in `file` for a scan of `kind`.
    fn resolve(&self, kind: ScanKind, file: &Path) -> Result<ScanResult, BoxError>;

    /// Outcome shown for entries that were not scanned.
    fn fallback(&self) -> ScanResult;
}
