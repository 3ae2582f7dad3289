//! Upload section: the path tree of everything in the result store.
//!
//! Build-info output already lists deployed artifacts, so the section stays
//! silent whenever the build-info directory holds anything.

use tracing::debug;

use super::{RenderContext, Section};
use crate::error::Result;
use crate::links::PlatformDetails;
use crate::path_tree::PathTree;
use crate::persist;
use crate::result_store::ResultStore;

#[derive(Debug, Clone, Default)]
pub struct UploadSection;

impl UploadSection {
    pub fn new() -> Self {
        UploadSection
    }

    pub fn generate(&self, ctx: &RenderContext<'_>) -> Result<Option<String>> {
        let build_info_dir = ctx.config.section_dir(Section::BuildInfo);
        if persist::dir_has_entries(&build_info_dir)? {
            debug!("Skipping upload summary generation due to build-info data to avoid duplications");
            return Ok(None);
        }

        let store = ResultStore::new(ctx.config.result_store_path());
        let wrapper = store.load()?;
        if wrapper.is_empty() {
            debug!(store = %store.path().display(), "No upload results this run");
            return Ok(None);
        }

        let tree = PathTree::from_results(&wrapper.results);
        Ok(Some(render(&tree, ctx.platform)))
    }
}

fn render(tree: &PathTree, platform: &PlatformDetails) -> String {
    let mut md = String::from("## 📦 Uploaded Artifacts\n\n```text\n");
    md.push_str(&tree.render());
    md.push_str("```\n");

    let mut repos = tree.root().child_names().peekable();
    if repos.peek().is_some() {
        md.push('\n');
        for repo in repos {
            md.push_str(&format!("- 🔗 [{repo}]({})\n", platform.artifact_url(repo)));
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tree_and_one_link_per_repository() {
        let mut tree = PathTree::new();
        tree.add_path("libs-local/app/app.jar");
        tree.add_path("generic-local/notes.txt");
        let platform = PlatformDetails::new("https://acme.jfrog.io", 7);

        let md = render(&tree, &platform);

        assert_eq!(
            md,
            "## 📦 Uploaded Artifacts\n\n```text\n\
             libs-local\n└── app\n    └── app.jar\n\
             generic-local\n└── notes.txt\n\
             ```\n\n\
             - 🔗 [libs-local](https://acme.jfrog.io/ui/repos/tree/General/libs-local?clearFilter=true)\n\
             - 🔗 [generic-local](https://acme.jfrog.io/ui/repos/tree/General/generic-local?clearFilter=true)\n"
        );
    }
}
