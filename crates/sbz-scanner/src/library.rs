//! The library facade.
//!
//! [`Library`] is the one object front ends talk to. It owns the tag
//! catalog, the scan processor, the published hierarchy, and the current
//! filter. The hierarchy is only ever replaced by a fully drained scan;
//! while a rescan runs, the previous tree stays published and usable.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use sbz_core::{CatalogError, Config, ScanConfig, ScannedFile, TagCatalog, TagDefinition, TagId};
use tracing::{debug, info, warn};

use crate::error::LibraryError;
use crate::filter::TagFilter;
use crate::hierarchy::Hierarchy;
use crate::processor::{ScanProcessor, StepResult};
use crate::stats::StatsSnapshot;

/// Progress report of [`Library::step_scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// `true` while directories remain queued.
    pub in_progress: bool,
    /// `true` if this step drained the queue and published a new tree.
    pub completed: bool,
    /// Counters of the current scan.
    pub stats: StatsSnapshot,
}

/// Scanned sounds, their tags, and the active filter.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use sbz_core::Config;
/// use sbz_scanner::{Library, TagFilter};
///
/// let config = Config::load_or_default(Utf8Path::new("config.json"))?;
/// let mut library = Library::open(&config)?;
/// library.scan_to_completion();
///
/// if let Some(drum) = library.catalog().find_by_name("drum") {
///     library.set_filter(TagFilter::new([drum], []));
/// }
/// println!("{} sounds match", library.visible_file_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Library {
    scan: ScanConfig,
    catalog: TagCatalog,
    catalog_path: Option<Utf8PathBuf>,
    processor: ScanProcessor,
    tree: Hierarchy,
    filter: TagFilter,
    visible_files: usize,
    issued_before_scan: usize,
}

impl Library {
    /// Creates a library with an empty tree.
    ///
    /// `catalog_path` is where catalog changes are saved; `None` keeps them
    /// in memory only.
    #[must_use]
    pub fn new(scan: ScanConfig, catalog: TagCatalog, catalog_path: Option<Utf8PathBuf>) -> Self {
        let processor = ScanProcessor::new(&scan);
        Self {
            scan,
            catalog,
            catalog_path,
            processor,
            tree: Hierarchy::new(),
            filter: TagFilter::default(),
            visible_files: 0,
            issued_before_scan: 0,
        }
    }

    /// Creates a library from the configuration, loading the tag catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] if the catalog file exists but
    /// cannot be loaded.
    pub fn open(config: &Config) -> Result<Self, LibraryError> {
        let catalog_path = config.library.resolve_catalog_path();
        let catalog = match &catalog_path {
            Some(path) => TagCatalog::load(path)?,
            None => {
                warn!("No data directory available, tag catalog will not be saved");
                TagCatalog::new()
            }
        };
        Ok(Self::new(config.scan.clone(), catalog, catalog_path))
    }

    /// Returns the scan settings, including the search roots.
    #[inline]
    #[must_use]
    pub const fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Returns the configured search roots.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.scan.roots
    }

    /// Replaces the search roots. Takes effect on the next scan.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if any path is missing, not a
    /// directory, or listed twice. The roots are unchanged on error.
    pub fn configure_roots(&mut self, paths: &[Utf8PathBuf]) -> Result<(), LibraryError> {
        self.scan.set_roots(paths.iter().map(Utf8PathBuf::as_path))?;
        info!(roots = self.scan.roots.len(), "Configured search roots");
        Ok(())
    }

    /// Overrides the per-step time budget. A running scan keeps going
    /// with the new budget.
    pub fn set_budget(&mut self, budget: Duration) {
        self.scan.budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        self.processor.set_budget(budget);
    }

    /// Starts a scan of the configured roots, abandoning any scan already
    /// running. The published tree is kept until the new scan completes.
    pub fn start_scan(&mut self) {
        self.issued_before_scan = self.catalog.issued();
        self.processor.start(&self.scan.roots);
    }

    /// Abandons the running scan, keeping the published tree.
    pub fn cancel_scan(&mut self) {
        self.processor.cancel();
    }

    /// Returns `true` while a scan is running.
    #[inline]
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        self.processor.is_in_progress()
    }

    /// Runs one time-boxed scan step.
    ///
    /// When the step drains the queue, the new tree is built, the current
    /// filter is applied to it, and tags registered from sidecars during
    /// the scan are saved to the catalog.
    pub fn step_scan(&mut self) -> StepOutcome {
        let result = self.processor.step(&mut self.catalog);
        let completed = matches!(result, StepResult::Finished(_));

        if let StepResult::Finished(files) = result {
            self.publish(files);
            if self.catalog.issued() > self.issued_before_scan {
                if let Err(e) = self.save_catalog() {
                    warn!(error = %e, "Failed to save tags found during scan");
                }
            }
        }

        StepOutcome {
            in_progress: self.processor.is_in_progress(),
            completed,
            stats: self.processor.stats(),
        }
    }

    /// Starts a scan and steps it until it completes.
    pub fn scan_to_completion(&mut self) -> StatsSnapshot {
        self.start_scan();
        loop {
            let outcome = self.step_scan();
            if !outcome.in_progress {
                return outcome.stats;
            }
        }
    }

    /// Returns the counters of the current (or last) scan.
    #[must_use]
    pub const fn stats(&self) -> StatsSnapshot {
        self.processor.stats()
    }

    /// Returns the published tree.
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> &Hierarchy {
        &self.tree
    }

    /// Returns the tag catalog.
    #[inline]
    #[must_use]
    pub const fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    /// Returns the active filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// Replaces the filter and re-evaluates visibility over the published
    /// tree. Returns the number of visible files.
    pub fn set_filter(&mut self, filter: TagFilter) -> usize {
        self.filter = filter;
        self.refilter()
    }

    /// Returns the number of files that pass the active filter.
    #[inline]
    #[must_use]
    pub const fn visible_file_count(&self) -> usize {
        self.visible_files
    }

    /// Returns the tags of a scanned file.
    #[must_use]
    pub fn tags_for(&self, path: &Utf8Path) -> Option<&[TagId]> {
        self.tree.file_by_path(path).map(|f| f.metadata.tags())
    }

    /// Replaces the tags of a scanned file and saves its sidecar.
    ///
    /// The filter is re-evaluated afterwards.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::UnknownFile`] if the file is not in the tree
    /// - [`LibraryError::Catalog`] if a tag is not registered
    /// - [`LibraryError::Metadata`] if the sidecar cannot be written; the
    ///   file keeps its previous tags
    pub fn assign_tags(&mut self, path: &Utf8Path, tags: &[TagId]) -> Result<(), LibraryError> {
        if let Some(unknown) = tags.iter().find(|t| self.catalog.get(**t).is_none()) {
            return Err(CatalogError::UnknownTag(*unknown).into());
        }

        let file = self
            .tree
            .file_by_path_mut(path)
            .ok_or_else(|| LibraryError::UnknownFile(path.to_path_buf()))?;

        let previous: Vec<TagId> = file.metadata.tags().to_vec();
        file.metadata.set_tags(tags.iter().copied());
        if let Err(e) = file.metadata.save(&self.catalog) {
            file.metadata.set_tags(previous);
            return Err(e.into());
        }

        info!(path = %path, tags = tags.len(), "Assigned tags");
        self.refilter();
        Ok(())
    }

    /// Adds one tag to a scanned file. Returns `false` if it was already
    /// assigned, in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Same as [`assign_tags`](Self::assign_tags).
    pub fn add_tag_to_file(&mut self, path: &Utf8Path, tag: TagId) -> Result<bool, LibraryError> {
        let mut tags = self.current_tags(path)?;
        if tags.contains(&tag) {
            return Ok(false);
        }
        tags.push(tag);
        self.assign_tags(path, &tags)?;
        Ok(true)
    }

    /// Removes one tag from a scanned file. Returns `false` if it was not
    /// assigned, in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Same as [`assign_tags`](Self::assign_tags).
    pub fn remove_tag_from_file(
        &mut self,
        path: &Utf8Path,
        tag: TagId,
    ) -> Result<bool, LibraryError> {
        let mut tags = self.current_tags(path)?;
        let before = tags.len();
        tags.retain(|t| *t != tag);
        if tags.len() == before {
            return Ok(false);
        }
        self.assign_tags(path, &tags)?;
        Ok(true)
    }

    /// Registers a new tag and saves the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] if the name is taken or invalid,
    /// or if the catalog cannot be saved. A failed save keeps the new tag
    /// in memory.
    pub fn create_tag(&mut self, tag: TagDefinition) -> Result<TagId, LibraryError> {
        let id = self.catalog.add(tag)?;
        self.save_catalog()?;
        Ok(id)
    }

    /// Commits an edited working copy of a tag and saves the catalog.
    ///
    /// A rename rewrites the sidecar of every known file carrying the tag,
    /// both in the published tree and among the files of a running scan,
    /// so the next scan resolves the new name.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Catalog`] if the tag is unknown, the name is taken
    ///   or invalid, or the catalog cannot be saved
    /// - [`LibraryError::Metadata`] if a sidecar cannot be rewritten; the
    ///   other sidecars and the catalog are still written
    pub fn edit_tag(&mut self, id: TagId, edited: &TagDefinition) -> Result<(), LibraryError> {
        let old_name = self
            .catalog
            .name(id)
            .map(str::to_owned)
            .ok_or(CatalogError::UnknownTag(id))?;
        self.catalog.apply_edit(id, edited)?;

        let rewritten = if self.catalog.name(id) == Some(old_name.as_str()) {
            Ok(())
        } else {
            self.rewrite_sidecars(id)
        };
        self.save_catalog()?;
        rewritten
    }

    /// Removes a tag that no scanned file carries, and saves the catalog.
    ///
    /// The tag is also dropped from the filter.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] with
    /// [`CatalogError::InUse`](sbz_core::CatalogError::InUse) while files
    /// still carry the tag.
    pub fn delete_tag(&mut self, id: TagId) -> Result<TagDefinition, LibraryError> {
        let removed = self.catalog.remove(id, self.tag_usage(id))?;
        if self.filter.remove(id) {
            self.refilter();
        }
        self.save_catalog()?;
        Ok(removed)
    }

    /// Returns how many scanned files carry `tag`.
    #[must_use]
    pub fn tag_usage(&self, tag: TagId) -> usize {
        self.tree
            .files()
            .iter()
            .filter(|f| f.metadata.has_tag(tag))
            .count()
    }

    /// Writes the catalog file, if the library has one.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Catalog`] if the file cannot be written.
    pub fn save_catalog(&self) -> Result<(), LibraryError> {
        if let Some(path) = &self.catalog_path {
            self.catalog.save(path)?;
        }
        Ok(())
    }

    fn rewrite_sidecars(&self, tag: TagId) -> Result<(), LibraryError> {
        let mut rewritten = 0;
        let mut first_error = None;
        let files = self.tree.files().iter().chain(self.processor.scanned());
        for file in files.filter(|f| f.metadata.has_tag(tag)) {
            match file.metadata.save(&self.catalog) {
                Ok(()) => rewritten += 1,
                Err(e) => {
                    warn!(path = %file.full_path, error = %e, "Failed to rewrite sidecar");
                    first_error.get_or_insert(e);
                }
            }
        }
        info!(tag = %self.catalog.name(tag).unwrap_or_default(), rewritten, "Rewrote sidecars");
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    fn current_tags(&self, path: &Utf8Path) -> Result<Vec<TagId>, LibraryError> {
        self.tags_for(path)
            .map(<[TagId]>::to_vec)
            .ok_or_else(|| LibraryError::UnknownFile(path.to_path_buf()))
    }

    fn publish(&mut self, files: Vec<ScannedFile>) {
        self.tree = Hierarchy::build(files);
        let visible = self.refilter();
        info!(
            files = self.tree.files().len(),
            nodes = self.tree.node_count(),
            visible,
            "Published sound tree"
        );
    }

    fn refilter(&mut self) -> usize {
        self.visible_files = self.filter.apply(&mut self.tree);
        debug!(visible = self.visible_files, "Applied tag filter");
        self.visible_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct Setup {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
        library: Library,
    }

    fn setup(files: &[&str]) -> Setup {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().canonicalize().unwrap()).unwrap();
        let samples = root.join("samples");
        for file in files {
            let path = samples.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"").unwrap();
        }
        fs::create_dir_all(&samples).unwrap();

        let mut library = Library::new(
            ScanConfig::default(),
            TagCatalog::new(),
            Some(root.join("tags.json")),
        );
        library.configure_roots(&[samples.clone()]).unwrap();
        Setup {
            _dir: dir,
            root: samples,
            library,
        }
    }

    #[test]
    fn test_configure_roots_rejects_missing() {
        let mut s = setup(&[]);
        let missing = s.root.join("missing");
        assert!(matches!(
            s.library.configure_roots(&[missing]),
            Err(LibraryError::Config(_))
        ));
        assert_eq!(s.library.roots(), &[s.root.clone()]);
    }

    #[test]
    fn test_scan_publishes_tree() {
        let mut s = setup(&["x/y/1.wav", "x/z/2.wav"]);
        let stats = s.library.scan_to_completion();
        assert_eq!(stats.files_found, 2);
        assert_eq!(s.library.visible_file_count(), 2);
        assert_eq!(
            s.library.tree().render_text(false),
            "Sounds/\n  x/\n    y/\n      1.wav\n    z/\n      2.wav\n"
        );
    }

    #[test]
    fn test_tree_unchanged_until_scan_completes() {
        let mut s = setup(&["a/1.wav", "b/2.wav"]);
        s.library.scan_to_completion();
        fs::write(s.root.join("a").join("3.wav"), b"").unwrap();

        s.library.set_budget(Duration::ZERO);
        s.library.start_scan();
        let outcome = s.library.step_scan();
        assert!(outcome.in_progress);
        assert!(!outcome.completed);
        assert_eq!(s.library.tree().files().len(), 2);

        while s.library.step_scan().in_progress {}
        assert_eq!(s.library.tree().files().len(), 3);
    }

    #[test]
    fn test_assign_tags_persists_and_refilters() {
        let mut s = setup(&["kick.wav", "pad.ogg"]);
        s.library.scan_to_completion();
        let drum = s.library.create_tag(TagDefinition::new("drum", Default::default())).unwrap();
        s.library.set_filter(TagFilter::new([drum], []));
        assert_eq!(s.library.visible_file_count(), 0);

        let kick = s.root.join("kick.wav");
        s.library.assign_tags(&kick, &[drum, drum]).unwrap();
        assert_eq!(s.library.tags_for(&kick), Some(&[drum][..]));
        assert_eq!(s.library.visible_file_count(), 1);
        assert_eq!(fs::read_to_string(s.root.join("kick.wav.sbzm")).unwrap(), "drum\n");

        s.library.scan_to_completion();
        assert_eq!(s.library.tags_for(&kick), Some(&[drum][..]));
        assert_eq!(s.library.visible_file_count(), 1);
    }

    #[test]
    fn test_assign_to_unknown_file_or_tag() {
        let mut s = setup(&["kick.wav"]);
        s.library.scan_to_completion();

        let err = s
            .library
            .assign_tags(&s.root.join("nope.wav"), &[])
            .unwrap_err();
        assert!(matches!(err, LibraryError::UnknownFile(_)));

        let err = s
            .library
            .assign_tags(&s.root.join("kick.wav"), &[TagId::new(42)])
            .unwrap_err();
        assert!(matches!(err, LibraryError::Catalog(_)));
    }

    #[test]
    fn test_add_and_remove_tag_on_file() {
        let mut s = setup(&["kick.wav"]);
        s.library.scan_to_completion();
        let kick = s.root.join("kick.wav");
        let drum = s.library.create_tag(TagDefinition::new("drum", Default::default())).unwrap();

        assert!(s.library.add_tag_to_file(&kick, drum).unwrap());
        assert!(!s.library.add_tag_to_file(&kick, drum).unwrap());
        assert_eq!(s.library.tag_usage(drum), 1);

        assert!(matches!(
            s.library.delete_tag(drum),
            Err(LibraryError::Catalog(CatalogError::InUse { .. }))
        ));

        assert!(s.library.remove_tag_from_file(&kick, drum).unwrap());
        assert!(!s.library.remove_tag_from_file(&kick, drum).unwrap());
        assert_eq!(s.library.delete_tag(drum).unwrap().name, "drum");
        assert!(s.library.catalog().is_empty());
    }

    #[test]
    fn test_tags_from_sidecars_are_saved_to_catalog() {
        let s = setup(&["kick.wav"]);
        fs::write(s.root.join("kick.wav.sbzm"), "Drum,Dry\n").unwrap();
        let Setup { _dir, root, mut library } = s;
        library.scan_to_completion();

        let catalog_path = root.parent().unwrap().join("tags.json");
        let saved = TagCatalog::load(&catalog_path).unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.find_by_name("dry").is_some());
    }

    #[test]
    fn test_edit_tag_renames_everywhere() {
        let mut s = setup(&["kick.wav"]);
        s.library.scan_to_completion();
        let kick = s.root.join("kick.wav");
        let drum = s.library.create_tag(TagDefinition::new("drum", Default::default())).unwrap();
        s.library.assign_tags(&kick, &[drum]).unwrap();

        let mut working = s.library.catalog().get(drum).unwrap().clone();
        working.name = "Drums".to_owned();
        s.library.edit_tag(drum, &working).unwrap();
        assert_eq!(fs::read_to_string(s.root.join("kick.wav.sbzm")).unwrap(), "Drums\n");

        s.library.scan_to_completion();
        assert_eq!(s.library.tags_for(&kick), Some(&[drum][..]));
        assert_eq!(s.library.catalog().len(), 1);
        assert_eq!(s.library.catalog().name(drum), Some("Drums"));
    }

    #[test]
    fn test_rename_during_scan_rewrites_pending_results() {
        let mut s = setup(&["a/kick.wav", "b/snare.wav"]);
        fs::write(s.root.join("a").join("kick.wav.sbzm"), "drum\n").unwrap();

        s.library.set_budget(Duration::ZERO);
        s.library.start_scan();
        while s.library.catalog().is_empty() {
            assert!(s.library.step_scan().in_progress);
        }
        let drum = s.library.catalog().find_by_name("drum").unwrap();

        let mut working = s.library.catalog().get(drum).unwrap().clone();
        working.name = "Drums".to_owned();
        s.library.edit_tag(drum, &working).unwrap();
        while s.library.step_scan().in_progress {}

        let kick = s.root.join("a").join("kick.wav");
        assert_eq!(s.library.tags_for(&kick), Some(&[drum][..]));
        assert_eq!(
            fs::read_to_string(s.root.join("a").join("kick.wav.sbzm")).unwrap(),
            "Drums\n"
        );

        s.library.scan_to_completion();
        assert_eq!(s.library.tags_for(&kick), Some(&[drum][..]));
    }

    #[test]
    fn test_color_edit_leaves_sidecars_alone() {
        let mut s = setup(&["kick.wav"]);
        let sidecar = s.root.join("kick.wav.sbzm");
        fs::write(&sidecar, "drum").unwrap();
        s.library.scan_to_completion();
        let drum = s.library.catalog().find_by_name("drum").unwrap();

        let mut working = s.library.catalog().get(drum).unwrap().clone();
        working.color = sbz_core::TagColor::rgb(1, 2, 3);
        s.library.edit_tag(drum, &working).unwrap();
        assert_eq!(fs::read_to_string(&sidecar).unwrap(), "drum");
    }

    #[test]
    fn test_tags_created_after_a_removal_are_saved() {
        let mut s = setup(&["a/kick.wav", "b/pad.wav"]);
        fs::write(s.root.join("b").join("pad.wav.sbzm"), "warm\n").unwrap();
        let old = s.library.create_tag(TagDefinition::new("old", Default::default())).unwrap();

        s.library.set_budget(Duration::ZERO);
        s.library.start_scan();
        assert!(s.library.step_scan().in_progress);
        s.library.delete_tag(old).unwrap();
        while s.library.step_scan().in_progress {}

        let catalog_path = s.root.parent().unwrap().join("tags.json");
        let saved = TagCatalog::load(&catalog_path).unwrap();
        assert!(saved.find_by_name("old").is_none());
        assert!(saved.find_by_name("warm").is_some());
    }
}
