//! Groups flat artifact paths by segment for compact display.

use crate::result_store::TransferResult;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// One path segment. Children keep their insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathTreeNode {
    children: Vec<(String, PathTreeNode)>,
}

impl PathTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&PathTreeNode> {
        self.children
            .iter()
            .find(|(segment, _)| segment == name)
            .map(|(_, node)| node)
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(segment, _)| segment.as_str())
    }

    fn child_or_insert(&mut self, name: &str) -> &mut PathTreeNode {
        let index = match self.children.iter().position(|(segment, _)| segment == name) {
            Some(index) => index,
            None => {
                self.children.push((name.to_string(), PathTreeNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// Tree of `/`-separated paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathTree {
    root: PathTreeNode,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: &[TransferResult]) -> Self {
        let mut tree = PathTree::new();
        for result in results {
            tree.add_path(&result.target_path);
        }
        tree
    }

    /// Adds `path`, creating only the segments that do not exist yet.
    /// Empty segments (leading, trailing or doubled separators) are ignored.
    pub fn add_path(&mut self, path: &str) {
        let mut node = &mut self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.child_or_insert(segment);
        }
    }

    pub fn root(&self) -> &PathTreeNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    /// Renders one line per node, depth first, in insertion order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, node) in &self.root.children {
            out.push_str(name);
            out.push('\n');
            render_children(node, "", &mut out);
        }
        out
    }
}

fn render_children(node: &PathTreeNode, prefix: &str, out: &mut String) {
    let last = node.children.len().saturating_sub(1);
    for (i, (name, child)) in node.children.iter().enumerate() {
        let (connector, continuation) = if i == last {
            (LAST_BRANCH, SPACE)
        } else {
            (BRANCH, PIPE)
        };
        out.push_str(&format!("{prefix}{connector}{name}\n"));
        render_children(child, &format!("{prefix}{continuation}"), out);
    }
}

impl std::fmt::Display for PathTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
