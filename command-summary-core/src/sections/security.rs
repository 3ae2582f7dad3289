//! Security section: delegates to the injected [`ScanCollector`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{cell, RenderContext, Section};
use crate::contract::ScanCollector;
use crate::error::{BoxError, Result, SummaryError};
use crate::links::PlatformDetails;
use crate::persist;

/// One recorded security command (audit, scan, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRecord {
    pub command: String,
    pub target: String,
    #[serde(default)]
    pub violations: u64,
    #[serde(default)]
    pub vulnerabilities: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
}

pub struct SecuritySection<'a> {
    collector: &'a dyn ScanCollector,
}

impl<'a> SecuritySection<'a> {
    pub fn new(collector: &'a dyn ScanCollector) -> Self {
        SecuritySection { collector }
    }

    pub fn generate(&self, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        let dir = ctx.config.section_dir(Section::Security);
        let markdown = self
            .collector
            .collect_markdown(&dir, ctx.platform)
            .map_err(|e| SummaryError::section(Section::Security, e))?;
        match &markdown {
            Some(md) => info!(bytes = md.len(), "Security markdown collected"),
            None => debug!(dir = %dir.display(), "No security data this run"),
        }
        Ok(markdown.filter(|md| !md.trim().is_empty()))
    }
}

/// Default collector: renders every [`SecurityRecord`] under the section directory.
#[derive(Debug, Clone, Default)]
pub struct SecurityDataCollector;

impl ScanCollector for SecurityDataCollector {
    fn collect_markdown(
        &self,
        section_dir: &Path,
        _platform: &PlatformDetails,
    ) -> std::result::Result<Option<String>, BoxError> {
        let mut records = Vec::new();
        for path in persist::json_files(section_dir)? {
            let record: SecurityRecord = persist::read_json(&path)?;
            records.push(record);
        }
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(render_records(&records)))
    }
}

fn render_records(records: &[SecurityRecord]) -> String {
    let mut md = String::from("## 🛡️ Security Scans\n\n");
    md.push_str("| Command | Target | Violations | Vulnerabilities |\n");
    md.push_str("|:---|:---|---:|---:|\n");
    for record in records {
        let target = match &record.details_url {
            Some(url) => format!("[{}]({url})", cell(&record.target)),
            None => format!("`{}`", cell(&record.target)),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&record.command),
            target,
            record.violations,
            record.vulnerabilities
        ));
    }
    md
}
