//! Directory tree built from a flat scan result.
//!
//! The [`Hierarchy`] is an arena of [`Node`]s addressed by [`NodeId`]. It
//! owns the [`ScannedFile`]s of the scan it was built from; file nodes
//! point into that list.
//!
//! Building walks the files in scan order and keeps a cursor on the path of
//! the directory the previous file was in. When the next file's directory
//! differs, the cursor climbs back to the longest common prefix and then
//! descends, reusing child directories with a matching label and creating
//! the rest. Files from several roots with the same relative directory end
//! up in the same directory node.

use std::fmt::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use sbz_core::{FxHashMap, ScannedFile, fx_hash_map};

/// Label of the root node.
pub const ROOT_LABEL: &str = "Sounds";

/// Index of a node in its [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node of every hierarchy.
    pub const ROOT: Self = Self(0);

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a node is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory. Its children are listed in insertion order.
    Directory,
    /// An audio file, holding its index in [`Hierarchy::files`].
    File(usize),
}

/// One entry of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display label: a directory name or a file name.
    pub label: String,
    /// Directory or file.
    pub kind: NodeKind,
    /// Parent node, `None` only for the root.
    pub parent: Option<NodeId>,
    /// Child nodes in insertion order.
    pub children: Vec<NodeId>,
    /// Result of the last filter evaluation.
    pub visible: bool,
}

impl Node {
    /// Returns `true` for directory nodes.
    #[inline]
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    /// Returns the file index for file nodes.
    #[inline]
    #[must_use]
    pub const fn file_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::File(index) => Some(index),
            NodeKind::Directory => None,
        }
    }
}

/// A row of the flattened tree, as shown by a tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// The node shown on this row.
    pub id: NodeId,
    /// Nesting depth, the root is 0.
    pub depth: usize,
}

/// Tree of directories and audio files.
///
/// Every node starts visible; [`TagFilter::apply`](crate::TagFilter::apply)
/// recomputes visibility.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use sbz_core::ScannedFile;
/// use sbz_scanner::Hierarchy;
///
/// let root = Utf8Path::new("/s");
/// let tree = Hierarchy::build(vec![
///     ScannedFile::new(root, "/s/x/y/1.wav".into()),
///     ScannedFile::new(root, "/s/x/z/2.wav".into()),
/// ]);
///
/// assert_eq!(tree.render_text(false), "Sounds/\n  x/\n    y/\n      1.wav\n    z/\n      2.wav\n");
/// ```
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<Node>,
    files: Vec<ScannedFile>,
    file_nodes: Vec<NodeId>,
    by_path: FxHashMap<Utf8PathBuf, usize>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    /// Creates a hierarchy holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                label: ROOT_LABEL.to_owned(),
                kind: NodeKind::Directory,
                parent: None,
                children: Vec::new(),
                visible: true,
            }],
            files: Vec::new(),
            file_nodes: Vec::new(),
            by_path: fx_hash_map(),
        }
    }

    /// Builds the tree from files in scan order.
    ///
    /// Files are expected grouped by directory with parents before
    /// children, which is the order the scan produces. Other orders still
    /// build a correct tree, only with more cursor movement.
    #[must_use]
    pub fn build(files: Vec<ScannedFile>) -> Self {
        let mut tree = Self::new();
        tree.files.reserve(files.len());
        tree.file_nodes.reserve(files.len());

        // Node path from the root to the current directory, and the
        // directory segments it stands for.
        let mut cursor: Vec<NodeId> = vec![NodeId::ROOT];
        let mut current: Vec<String> = Vec::new();

        for file in files {
            let segments: Vec<String> = file.segments().map(str::to_owned).collect();

            if segments != current {
                let common = current
                    .iter()
                    .zip(&segments)
                    .take_while(|(a, b)| a == b)
                    .count();
                cursor.truncate(common + 1);
                current.truncate(common);

                for segment in &segments[common..] {
                    let parent = cursor.last().copied().unwrap_or(NodeId::ROOT);
                    let child = tree
                        .find_child_directory(parent, segment)
                        .unwrap_or_else(|| tree.push_node(parent, segment, NodeKind::Directory));
                    cursor.push(child);
                    current.push(segment.clone());
                }
            }

            let parent = cursor.last().copied().unwrap_or(NodeId::ROOT);
            let index = tree.files.len();
            let node = tree.push_node(parent, &file.name, NodeKind::File(index));
            tree.by_path.insert(file.full_path.clone(), index);
            tree.file_nodes.push(node);
            tree.files.push(file);
        }

        tree
    }

    /// Returns the root node id.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns a node. Ids from another hierarchy may return `None`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if the last filter evaluation left the node visible.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.visible)
    }

    /// Returns the number of nodes, the root included.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns every scanned file, in scan order.
    #[inline]
    #[must_use]
    pub fn files(&self) -> &[ScannedFile] {
        &self.files
    }

    /// Returns the file behind a file node.
    #[must_use]
    pub fn file(&self, id: NodeId) -> Option<&ScannedFile> {
        self.get(id)
            .and_then(Node::file_index)
            .and_then(|index| self.files.get(index))
    }

    /// Looks up a file by its full path.
    #[must_use]
    pub fn file_by_path(&self, path: &Utf8Path) -> Option<&ScannedFile> {
        self.by_path.get(path).and_then(|i| self.files.get(*i))
    }

    /// Looks up a file by its full path, mutably.
    pub fn file_by_path_mut(&mut self, path: &Utf8Path) -> Option<&mut ScannedFile> {
        let index = *self.by_path.get(path)?;
        self.files.get_mut(index)
    }

    /// Returns the node showing the file at `path`.
    #[must_use]
    pub fn node_for_path(&self, path: &Utf8Path) -> Option<NodeId> {
        self.by_path
            .get(path)
            .and_then(|i| self.file_nodes.get(*i))
            .copied()
    }

    /// Returns the number of files that passed the last filter evaluation.
    #[must_use]
    pub fn visible_file_count(&self) -> usize {
        self.file_nodes
            .iter()
            .filter(|id| self.is_visible(**id))
            .count()
    }

    /// Returns the labels from the root down to `id`, joined with `/`.
    #[must_use]
    pub fn display_path(&self, id: NodeId) -> String {
        let mut labels = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            let Some(node) = self.get(current) else {
                break;
            };
            labels.push(node.label.as_str());
            next = node.parent;
        }
        labels.reverse();
        labels.join("/")
    }

    /// Flattens the visible part of the tree into display rows.
    ///
    /// The root is always the first row. Children of a directory are only
    /// listed if `expanded` returns `true` for it; hidden nodes are skipped
    /// together with their subtrees.
    pub fn visible_rows(&self, expanded: impl Fn(NodeId) -> bool) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack = vec![(NodeId::ROOT, 0_usize)];

        while let Some((id, depth)) = stack.pop() {
            rows.push(Row { id, depth });
            let Some(node) = self.get(id) else {
                continue;
            };
            if !node.is_directory() || !expanded(id) {
                continue;
            }
            for child in node.children.iter().rev() {
                if self.is_visible(*child) {
                    stack.push((*child, depth + 1));
                }
            }
        }

        rows
    }

    /// Renders the tree as indented text, two spaces per level, with a
    /// trailing `/` on directories.
    ///
    /// With `visible_only`, nodes hidden by the filter are left out; the
    /// root line is always present.
    #[must_use]
    pub fn render_text(&self, visible_only: bool) -> String {
        let mut out = String::new();
        let mut stack = vec![(NodeId::ROOT, 0_usize)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let suffix = if node.is_directory() { "/" } else { "" };
            let _ = writeln!(out, "{:indent$}{}{suffix}", "", node.label, indent = depth * 2);

            for child in node.children.iter().rev() {
                if !visible_only || self.is_visible(*child) {
                    stack.push((*child, depth + 1));
                }
            }
        }

        out
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn find_child_directory(&self, parent: NodeId, label: &str) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|child| {
            self.get(*child)
                .is_some_and(|n| n.is_directory() && n.label == label)
        })
    }

    fn push_node(&mut self, parent: NodeId, label: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node {
            label: label.to_owned(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            visible: true,
        });
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(root: &str, paths: &[&str]) -> Vec<ScannedFile> {
        let root = Utf8Path::new(root);
        paths
            .iter()
            .map(|p| ScannedFile::new(root, root.join(p)))
            .collect()
    }

    #[test]
    fn test_empty_has_root_only() {
        let tree = Hierarchy::build(Vec::new());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.get(tree.root()).unwrap().label, ROOT_LABEL);
        assert_eq!(tree.render_text(false), "Sounds/\n");
    }

    #[test]
    fn test_prefix_diff_reuses_directories() {
        let tree = Hierarchy::build(files(
            "/s",
            &["top.wav", "x/a.wav", "x/y/b.wav", "x/y/c.wav", "x/z/d.wav", "w/e.wav"],
        ));

        assert_eq!(
            tree.render_text(false),
            "Sounds/\n  top.wav\n  x/\n    a.wav\n    y/\n      b.wav\n      c.wav\n    z/\n      d.wav\n  w/\n    e.wav\n"
        );
        // root, top, x, a, y, b, c, z, d, w, e
        assert_eq!(tree.node_count(), 11);
    }

    #[test]
    fn test_revisited_directory_is_not_duplicated() {
        let tree = Hierarchy::build(files("/s", &["x/1.wav", "y/2.wav", "x/3.wav"]));
        let root_children = tree.children(tree.root());
        assert_eq!(root_children.len(), 2);
        let x = root_children[0];
        assert_eq!(tree.children(x).len(), 2);
    }

    #[test]
    fn test_multiple_roots_merge() {
        let mut all = files("/a", &["drums/kick.wav"]);
        all.extend(files("/b", &["drums/snare.wav"]));
        let tree = Hierarchy::build(all);

        assert_eq!(
            tree.render_text(false),
            "Sounds/\n  drums/\n    kick.wav\n    snare.wav\n"
        );
    }

    #[test]
    fn test_file_lookup() {
        let tree = Hierarchy::build(files("/s", &["x/1.wav"]));
        let path = Utf8Path::new("/s/x/1.wav");

        let node = tree.node_for_path(path).unwrap();
        assert_eq!(tree.file(node).unwrap().name, "1.wav");
        assert_eq!(tree.file_by_path(path).unwrap().relative_path, "x");
        assert_eq!(tree.display_path(node), "Sounds/x/1.wav");
        assert!(tree.file_by_path(Utf8Path::new("/s/x/2.wav")).is_none());
    }

    #[test]
    fn test_visible_rows_respects_expansion() {
        let tree = Hierarchy::build(files("/s", &["x/1.wav", "y/2.wav"]));
        let x = tree.children(tree.root())[0];

        let collapsed = tree.visible_rows(|id| id == NodeId::ROOT);
        assert_eq!(collapsed.len(), 3);

        let expanded = tree.visible_rows(|id| id == NodeId::ROOT || id == x);
        let depths: Vec<_> = expanded.iter().map(|r| r.depth).collect();
        assert_eq!(depths, [0, 1, 2, 1]);
    }
}
