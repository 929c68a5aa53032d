//! Include/exclude tag filtering over a [`Hierarchy`].
//!
//! A file passes when it carries every included tag and none of the
//! excluded ones. An empty include set places no requirement. A directory
//! is visible when at least one of its children is, so empty directories
//! are hidden whatever the filter.

use sbz_core::TagId;
use smallvec::SmallVec;

use crate::hierarchy::{Hierarchy, NodeId, NodeKind};

type TagList = SmallVec<[TagId; 4]>;

/// A pair of tag sets deciding file visibility.
///
/// # Examples
///
/// ```
/// use sbz_core::TagId;
/// use sbz_scanner::TagFilter;
///
/// let drum = TagId::new(0);
/// let only_drums = TagFilter::new([drum], []);
/// assert!(only_drums.matches(&[drum]));
/// assert!(!only_drums.matches(&[]));
/// assert!(TagFilter::default().matches(&[]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    include: TagList,
    exclude: TagList,
}

impl TagFilter {
    /// Creates a filter. Repeated tags collapse.
    #[must_use]
    pub fn new(
        include: impl IntoIterator<Item = TagId>,
        exclude: impl IntoIterator<Item = TagId>,
    ) -> Self {
        let mut filter = Self::default();
        for tag in include {
            filter.include(tag);
        }
        for tag in exclude {
            filter.exclude(tag);
        }
        filter
    }

    /// Returns the tags a file must carry.
    #[inline]
    #[must_use]
    pub fn included(&self) -> &[TagId] {
        &self.include
    }

    /// Returns the tags a file must not carry.
    #[inline]
    #[must_use]
    pub fn excluded(&self) -> &[TagId] {
        &self.exclude
    }

    /// Returns `true` if the filter lets every file through.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Adds a required tag. Returns `false` if it was already required.
    pub fn include(&mut self, tag: TagId) -> bool {
        push_unique(&mut self.include, tag)
    }

    /// Adds a forbidden tag. Returns `false` if it was already forbidden.
    pub fn exclude(&mut self, tag: TagId) -> bool {
        push_unique(&mut self.exclude, tag)
    }

    /// Removes `tag` from both sets. Returns `true` if it was in either.
    pub fn remove(&mut self, tag: TagId) -> bool {
        let before = self.include.len() + self.exclude.len();
        self.include.retain(|t| *t != tag);
        self.exclude.retain(|t| *t != tag);
        before != self.include.len() + self.exclude.len()
    }

    /// Empties both sets.
    pub fn clear(&mut self) {
        self.include.clear();
        self.exclude.clear();
    }

    /// Returns `true` if a file carrying `tags` passes.
    #[must_use]
    pub fn matches(&self, tags: &[TagId]) -> bool {
        self.include.iter().all(|t| tags.contains(t))
            && !self.exclude.iter().any(|t| tags.contains(t))
    }

    /// Re-evaluates the visibility of every node of `tree`.
    ///
    /// Returns the number of visible files.
    pub fn apply(&self, tree: &mut Hierarchy) -> usize {
        let mut visible_files = 0;
        let root = tree.root();
        self.evaluate(tree, root, &mut visible_files);
        visible_files
    }

    /// Evaluates `id` and its subtree, children first, storing each
    /// result on its node. Returns the visibility of `id`.
    pub fn evaluate(&self, tree: &mut Hierarchy, id: NodeId, visible_files: &mut usize) -> bool {
        let (kind, children) = match tree.get(id) {
            Some(node) => (node.kind, node.children.clone()),
            None => return false,
        };

        let visible = match kind {
            NodeKind::File(_) => {
                let passes = tree.file(id).is_some_and(|f| self.matches(f.metadata.tags()));
                if passes {
                    *visible_files += 1;
                }
                passes
            }
            NodeKind::Directory => {
                let mut any = false;
                // Every child is evaluated so that each one gets its flag.
                for child in children {
                    any |= self.evaluate(tree, child, visible_files);
                }
                any
            }
        };

        if let Some(node) = tree.node_mut(id) {
            node.visible = visible;
        }
        visible
    }
}

fn push_unique(list: &mut TagList, tag: TagId) -> bool {
    if list.contains(&tag) {
        return false;
    }
    list.push(tag);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use sbz_core::{ScannedFile, TagCatalog};

    struct Fixture {
        tree: Hierarchy,
        drum: TagId,
        looped: TagId,
    }

    /// `/s/a.wav {drum}`, `/s/b.wav {}`, `/s/c.wav {drum, loop}`, plus an
    /// untagged file in a subdirectory.
    fn fixture() -> Fixture {
        let mut catalog = TagCatalog::new();
        let drum = catalog.get_or_create("drum");
        let looped = catalog.get_or_create("loop");

        let root = Utf8Path::new("/s");
        let mut a = ScannedFile::new(root, "/s/a.wav".into());
        a.metadata.set_tags([drum]);
        let b = ScannedFile::new(root, "/s/b.wav".into());
        let mut c = ScannedFile::new(root, "/s/c.wav".into());
        c.metadata.set_tags([drum, looped]);
        let d = ScannedFile::new(root, "/s/sub/d.wav".into());

        Fixture {
            tree: Hierarchy::build(vec![a, b, c, d]),
            drum,
            looped,
        }
    }

    fn visible_names(tree: &Hierarchy) -> Vec<String> {
        tree.files()
            .iter()
            .filter(|f| {
                tree.node_for_path(&f.full_path)
                    .is_some_and(|id| tree.is_visible(id))
            })
            .map(|f| f.name.clone())
            .collect()
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let mut fx = fixture();
        assert_eq!(TagFilter::default().apply(&mut fx.tree), 4);
        assert!(fx.tree.is_visible(fx.tree.root()));
    }

    #[test]
    fn test_include_drum() {
        let mut fx = fixture();
        let count = TagFilter::new([fx.drum], []).apply(&mut fx.tree);
        assert_eq!(count, 2);
        assert_eq!(visible_names(&fx.tree), ["a.wav", "c.wav"]);
    }

    #[test]
    fn test_include_drum_exclude_loop() {
        let mut fx = fixture();
        TagFilter::new([fx.drum], [fx.looped]).apply(&mut fx.tree);
        assert_eq!(visible_names(&fx.tree), ["a.wav"]);
    }

    #[test]
    fn test_exclude_drum() {
        let mut fx = fixture();
        TagFilter::new([], [fx.drum]).apply(&mut fx.tree);
        assert_eq!(visible_names(&fx.tree), ["b.wav", "d.wav"]);
    }

    #[test]
    fn test_directory_hidden_when_no_file_passes() {
        let mut fx = fixture();
        TagFilter::new([fx.drum], []).apply(&mut fx.tree);
        let sub = fx.tree.node_for_path(Utf8Path::new("/s/sub/d.wav")).unwrap();
        let sub_dir = fx.tree.get(sub).unwrap().parent.unwrap();
        assert!(!fx.tree.is_visible(sub_dir));
        assert_eq!(fx.tree.render_text(true), "Sounds/\n  a.wav\n  c.wav\n");
    }

    #[test]
    fn test_nothing_matches_hides_root() {
        let mut fx = fixture();
        let count = TagFilter::new([fx.drum], [fx.drum]).apply(&mut fx.tree);
        assert_eq!(count, 0);
        assert!(!fx.tree.is_visible(fx.tree.root()));
    }

    #[test]
    fn test_filter_edits() {
        let mut filter = TagFilter::default();
        assert!(filter.include(TagId(1)));
        assert!(!filter.include(TagId(1)));
        assert!(filter.exclude(TagId(2)));
        assert!(!filter.is_empty());

        assert!(filter.remove(TagId(1)));
        assert!(!filter.remove(TagId(1)));
        assert_eq!(filter.excluded(), &[TagId(2)]);

        filter.clear();
        assert!(filter.is_empty());
    }
}
