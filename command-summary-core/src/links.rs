//! Builds platform UI links for rendered markdown.
//!
//! The link shape changed with platform major version 7, so every section gets
//! the resolved [`PlatformDetails`] for the current finalize call.

use serde::{Deserialize, Serialize};

/// First major version that serves the unified platform UI.
const UNIFIED_UI_MAJOR_VERSION: u32 = 7;

/// Base URL and major version of the platform the commands ran against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDetails {
    pub url: String,
    pub major_version: u32,
}

impl PlatformDetails {
    pub fn new(url: impl Into<String>, major_version: u32) -> Self {
        PlatformDetails {
            url: url.into(),
            major_version,
        }
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    fn unified_ui(&self) -> bool {
        self.major_version >= UNIFIED_UI_MAJOR_VERSION
    }

    /// Link to a repository path in the artifact browser.
    pub fn artifact_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if self.unified_ui() {
            format!("{}/ui/repos/tree/General/{path}?clearFilter=true", self.base())
        } else {
            format!(
                "{}/artifactory/webapp/#/artifacts/browse/tree/General/{path}",
                self.base()
            )
        }
    }

    /// Link to a published build.
    pub fn build_url(&self, name: &str, number: &str) -> String {
        if self.unified_ui() {
            format!("{}/ui/builds/{name}/{number}/published", self.base())
        } else {
            format!("{}/artifactory/webapp/#/builds/{name}/{number}", self.base())
        }
    }
}
