//! # aggregator: combines the report sections into one document
//!
//! [`Aggregator::finalize`] is the explicit trigger at the end of a pipeline:
//!   - resolves platform details once; every link depends on them, so a failure aborts before any section runs
//!   - generates the sections strictly in [`Section::ORDER`]
//!   - isolates section failures: a failing section is logged and left out, the rest still render
//!   - keeps each section's `markdown.md` in step with what was rendered, removing stale ones
//!   - writes the combined report only when at least one section produced markdown
//!
//! The combined file is replaced in full on every finalize that produces content.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::SummaryConfig;
use crate::contract::{IndexedFileSource, PlatformClient, ScanCollector, ScanResolver};
use crate::error::{Result, SummaryError};
use crate::persist;
use crate::scan::{IndexedFileResolver, ScanIndexDirectory};
use crate::sections::{
    BuildInfoSection, RenderContext, Section, SectionRenderer, SecurityDataCollector,
    SecuritySection, UploadSection,
};

pub use crate::config::should_run;

/// Heading of the combined report.
pub const REPORT_TITLE: &str = "# 🐸 JFrog Platform Job Summary 🐸\n\n";

/// How one section fared during finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Rendered,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    pub section: Section,
    pub status: SectionStatus,
}

/// Result of one finalize call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    pub sections: Vec<SectionOutcome>,
    /// Path of the combined report, if one was written.
    pub report_path: Option<PathBuf>,
}

impl FinalizeReport {
    pub fn status(&self, section: Section) -> Option<&SectionStatus> {
        self.sections
            .iter()
            .find(|outcome| outcome.section == section)
            .map(|outcome| &outcome.status)
    }

    pub fn rendered(&self) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|outcome| outcome.status == SectionStatus::Rendered)
            .map(|outcome| outcome.section)
            .collect()
    }
}

pub struct Aggregator {
    config: SummaryConfig,
    platform: Box<dyn PlatformClient>,
    collector: Box<dyn ScanCollector>,
    index: Box<dyn IndexedFileSource>,
    resolver: Box<dyn ScanResolver>,
}

impl Aggregator {
    /// Aggregator with the file-backed collaborators for the given output root.
    pub fn new(config: SummaryConfig, platform: Box<dyn PlatformClient>) -> Self {
        let index = ScanIndexDirectory::new(config.scan_index_dir());
        Aggregator {
            config,
            platform,
            collector: Box::new(SecurityDataCollector),
            index: Box::new(index),
            resolver: Box::new(IndexedFileResolver),
        }
    }

    pub fn with_scan_collector(mut self, collector: Box<dyn ScanCollector>) -> Self {
        self.collector = collector;
        self
    }

    pub fn with_indexed_files(mut self, index: Box<dyn IndexedFileSource>) -> Self {
        self.index = index;
        self
    }

    pub fn with_scan_resolver(mut self, resolver: Box<dyn ScanResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    fn renderers(&self) -> [SectionRenderer<'_>; 3] {
        [
            SectionRenderer::Security(SecuritySection::new(self.collector.as_ref())),
            SectionRenderer::BuildInfo(BuildInfoSection::new(
                self.index.as_ref(),
                self.resolver.as_ref(),
            )),
            SectionRenderer::Upload(UploadSection::new()),
        ]
    }

    /// Generates every section and writes the combined report.
    pub async fn finalize(&self) -> Result<FinalizeReport> {
        self.config.trace_loaded();

        let platform = self.platform.platform_details().await.map_err(|e| {
            error!(error = %e, "Failed to get platform URL or major version");
            SummaryError::Remote(e.to_string())
        })?;
        info!(
            url = %platform.url,
            major_version = platform.major_version,
            "Resolved platform details"
        );
        let ctx = RenderContext {
            config: &self.config,
            platform: &platform,
        };

        let mut report = FinalizeReport::default();
        let mut body = String::new();
        for renderer in self.renderers() {
            let section = renderer.section();
            let status = match renderer.generate(&ctx) {
                Ok(Some(markdown)) => self.keep_section(section, &markdown, &mut body),
                Ok(None) => {
                    debug!(%section, "Section produced no markdown");
                    self.clear_stale(section);
                    SectionStatus::Skipped
                }
                Err(e) => {
                    warn!(%section, error = %e, "Failed to generate markdown for section");
                    self.clear_stale(section);
                    SectionStatus::Failed(e.to_string())
                }
            };
            report.sections.push(SectionOutcome { section, status });
        }

        if body.is_empty() {
            info!("No section produced markdown, skipping the combined report");
            return Ok(report);
        }

        let path = self.config.final_report_path();
        let document = format!("{REPORT_TITLE}{body}");
        persist::write_atomic(&path, document.as_bytes()).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to write the combined report");
        })?;
        info!(
            path = %path.display(),
            sections = ?report.rendered(),
            "Combined report written"
        );
        report.report_path = Some(path);
        Ok(report)
    }

    fn keep_section(&self, section: Section, markdown: &str, body: &mut String) -> SectionStatus {
        let path = self.config.section_markdown_path(section);
        if let Err(e) = persist::write_atomic(&path, markdown.as_bytes()) {
            warn!(%section, error = %e, "Failed to save section markdown");
            return SectionStatus::Failed(e.to_string());
        }
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(markdown);
        if !markdown.ends_with('\n') {
            body.push('\n');
        }
        SectionStatus::Rendered
    }

    fn clear_stale(&self, section: Section) {
        let path = self.config.section_markdown_path(section);
        match persist::remove_if_exists(&path) {
            Ok(true) => debug!(%section, "Removed stale section markdown"),
            Ok(false) => {}
            Err(e) => warn!(%section, error = %e, "Failed to remove stale section markdown"),
        }
    }
}
