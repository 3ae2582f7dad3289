use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{Result, SummaryError};
use crate::sections::Section;

/// Environment variable that holds the root output directory.
pub const OUTPUT_DIR_ENV: &str = "JFROG_CLI_COMMAND_SUMMARY_OUTPUT_DIR";
/// Directory under the output root that holds every summary artifact.
pub const SUMMARY_DIR: &str = "jfrog-command-summary";
/// File name used for section markdown and for the combined report.
pub const MARKDOWN_FILE: &str = "markdown.md";
/// Cumulative result log inside the upload section directory.
pub const RESULT_STORE_FILE: &str = "data.json";
/// Directory holding indexed scan files, one subdirectory per scan kind.
pub const SCAN_INDEX_DIR: &str = "scan-index";

/// Location of all on-disk summary state for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryConfig {
    pub output_dir: PathBuf,
}

impl SummaryConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        SummaryConfig {
            output_dir: output_dir.into(),
        }
    }

    /// Reads the output directory from the environment. `None` means the
    /// summary subsystem is disabled for this process.
    pub fn from_env() -> Option<Self> {
        match std::env::var(OUTPUT_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Some(SummaryConfig::new(dir)),
            _ => {
                debug!(var = OUTPUT_DIR_ENV, "Summary output directory not set");
                None
            }
        }
    }

    /// Like [`SummaryConfig::from_env`], for commands that cannot run without it.
    pub fn require_from_env() -> Result<Self> {
        Self::from_env().ok_or_else(|| {
            SummaryError::Configuration(format!(
                "unable to generate the command summary because the output directory is not specified. \
                 Please ensure that the environment variable '{OUTPUT_DIR_ENV}' is set before running your commands"
            ))
        })
    }

    pub fn summary_dir(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_DIR)
    }

    pub fn section_dir(&self, section: Section) -> PathBuf {
        self.summary_dir().join(section.as_str())
    }

    pub fn section_markdown_path(&self, section: Section) -> PathBuf {
        self.section_dir(section).join(MARKDOWN_FILE)
    }

    pub fn final_report_path(&self) -> PathBuf {
        self.summary_dir().join(MARKDOWN_FILE)
    }

    pub fn result_store_path(&self) -> PathBuf {
        self.section_dir(Section::Upload).join(RESULT_STORE_FILE)
    }

    pub fn scan_index_dir(&self) -> PathBuf {
        self.summary_dir().join(SCAN_INDEX_DIR)
    }

    pub fn trace_loaded(&self) {
        info!(
            output_dir = %self.output_dir.display(),
            "Loaded summary config"
        );
        debug!(?self, "Summary config loaded (full debug)");
    }
}

/// Summary generation only happens when the output directory is defined.
pub fn should_run() -> bool {
    SummaryConfig::from_env().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_under_the_summary_dir() {
        let config = SummaryConfig::new("/out");
        assert_eq!(
            config.final_report_path(),
            PathBuf::from("/out/jfrog-command-summary/markdown.md")
        );
        assert_eq!(
            config.section_markdown_path(Section::BuildInfo),
            PathBuf::from("/out/jfrog-command-summary/build-info/markdown.md")
        );
        assert_eq!(
            config.result_store_path(),
            PathBuf::from("/out/jfrog-command-summary/upload/data.json")
        );
        assert_eq!(
            config.scan_index_dir(),
            PathBuf::from("/out/jfrog-command-summary/scan-index")
        );
    }
}
