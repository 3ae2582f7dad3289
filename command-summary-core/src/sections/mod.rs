//! Report sections and their closed dispatch.
//!
//! Each section renders only from its own artifacts under
//! `jfrog-command-summary/<section>/`. A section that finds none of its inputs
//! returns `Ok(None)`: it simply did not run this time.

pub mod build_info;
pub mod security;
pub mod upload;

use std::fmt;

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::links::PlatformDetails;

pub use build_info::BuildInfoSection;
pub use security::{SecurityDataCollector, SecuritySection};
pub use upload::UploadSection;

/// Section kinds, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Security,
    BuildInfo,
    Upload,
}

impl Section {
    /// Fixed order of sections in the combined report.
    pub const ORDER: [Section; 3] = [Section::Security, Section::BuildInfo, Section::Upload];

    /// Directory name of the section under the summary directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Security => "security",
            Section::BuildInfo => "build-info",
            Section::Upload => "upload",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every section gets to render with during one finalize call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a SummaryConfig,
    pub platform: &'a PlatformDetails,
}

/// One renderer per section kind.
pub enum SectionRenderer<'a> {
    Security(SecuritySection<'a>),
    BuildInfo(BuildInfoSection<'a>),
    Upload(UploadSection),
}

impl SectionRenderer<'_> {
    pub fn section(&self) -> Section {
        match self {
            SectionRenderer::Security(_) => Section::Security,
            SectionRenderer::BuildInfo(_) => Section::BuildInfo,
            SectionRenderer::Upload(_) => Section::Upload,
        }
    }

    /// Renders the section; `Ok(None)` when its inputs are absent.
    pub fn generate(&self, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        match self {
            SectionRenderer::Security(section) => section.generate(ctx),
            SectionRenderer::BuildInfo(section) => section.generate(ctx),
            SectionRenderer::Upload(section) => section.generate(ctx),
        }
    }
}

/// Escapes a value for use inside a markdown table cell.
pub(crate) fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_security_build_info_upload() {
        let names: Vec<_> = Section::ORDER.iter().map(Section::as_str).collect();
        assert_eq!(names, vec!["security", "build-info", "upload"]);
    }

    #[test]
    fn cell_escapes_pipes_and_newlines() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }
}
