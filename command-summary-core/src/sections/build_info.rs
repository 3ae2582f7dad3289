//! Build-info section.
//!
//! Renders every published build recorded under `build-info/`, cross-referenced
//! with the indexed scan files: builds are looked up through the build scan,
//! docker modules through the docker scan and every other module through the
//! binaries scan. Entries that were never scanned show the resolver's fallback.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{cell, RenderContext, Section};
use crate::contract::{IndexedFileSource, ScanResolver};
use crate::error::{Result, SummaryError};
use crate::links::PlatformDetails;
use crate::path_tree::PathTree;
use crate::persist;
use crate::scan::{ScanKind, ScanLookup};

const DOCKER_MODULE_TYPE: &str = "docker";

/// A published build, as recorded by the build-info publish command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfoRecord {
    pub name: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub module_type: String,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}

impl ModuleRecord {
    fn is_docker(&self) -> bool {
        self.module_type.eq_ignore_ascii_case(DOCKER_MODULE_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    /// Repository path of the deployed artifact, e.g. `libs-local/app/1.0/app.jar`.
    pub path: String,
}

/// Reads every build-info record in `dir`. A missing directory yields none.
pub fn load_records(dir: &Path) -> Result<Vec<BuildInfoRecord>> {
    persist::json_files(dir)?
        .iter()
        .map(|path| persist::read_json(path))
        .collect()
}

pub struct BuildInfoSection<'a> {
    index: &'a dyn IndexedFileSource,
    resolver: &'a dyn ScanResolver,
}

impl<'a> BuildInfoSection<'a> {
    pub fn new(index: &'a dyn IndexedFileSource, resolver: &'a dyn ScanResolver) -> Self {
        BuildInfoSection { index, resolver }
    }

    pub fn generate(&self, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        let dir = ctx.config.section_dir(Section::BuildInfo);
        let records = load_records(&dir)?;
        if records.is_empty() {
            debug!(dir = %dir.display(), "No build-info data this run");
            return Ok(None);
        }

        let entries = self
            .index
            .indexed_files()
            .map_err(|e| SummaryError::section(Section::BuildInfo, e))?;
        let lookup = ScanLookup::build(&entries, self.resolver);
        info!(
            builds = records.len(),
            indexed = entries.len(),
            scanned = lookup.len(),
            "Rendering build-info section"
        );
        Ok(Some(render(&records, &lookup, ctx.platform)))
    }
}

fn render(records: &[BuildInfoRecord], lookup: &ScanLookup, platform: &PlatformDetails) -> String {
    let mut md = String::from("## 🏗️ Published Build Infos\n\n");
    md.push_str("| Build | Security Violations | Security Vulnerabilities |\n");
    md.push_str("|:---|:---|:---|\n");
    for record in records {
        let url = record
            .url
            .clone()
            .unwrap_or_else(|| platform.build_url(&record.name, &record.number));
        let scan = lookup.get(ScanKind::Build, &record.name);
        md.push_str(&format!(
            "| [{} {}]({url}) | {} | {} |\n",
            cell(&record.name),
            cell(&record.number),
            cell(&scan.violations),
            cell(&scan.vulnerabilities)
        ));
    }

    let modules: Vec<&ModuleRecord> = records.iter().flat_map(|r| &r.modules).collect();
    if modules.is_empty() {
        return md;
    }

    md.push_str("\n### 📦 Build Modules\n\n");
    md.push_str("| Module | Type | Artifacts | Security Violations | Security Vulnerabilities |\n");
    md.push_str("|:---|:---|---:|:---|:---|\n");
    let mut tree = PathTree::new();
    for module in &modules {
        let kind = if module.is_docker() {
            ScanKind::Docker
        } else {
            ScanKind::Binaries
        };
        let scan = lookup.get(kind, &module.id);
        let module_type = if module.module_type.is_empty() {
            "generic"
        } else {
            module.module_type.as_str()
        };
        md.push_str(&format!(
            "| {}{} | {} | {} | {} | {} |\n",
            if module.is_docker() { "🐳 " } else { "" },
            cell(&module.id),
            cell(module_type),
            module.artifacts.len(),
            cell(&scan.violations),
            cell(&scan.vulnerabilities)
        ));
        for artifact in &module.artifacts {
            tree.add_path(&artifact.path);
        }
    }

    if !tree.is_empty() {
        md.push_str("\n```text\n");
        md.push_str(&tree.render());
        md.push_str("```\n");
    }
    md
}
