//! End-to-end scan behavior against real directory trees.

use std::fs;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use sbz_core::{ScanConfig, TagCatalog, TagDefinition};
use sbz_scanner::{Library, ScanProcessor, StepResult, TagFilter};

struct Fixture {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().canonicalize().unwrap()).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"").unwrap();
        }
        Self { _dir: dir, root }
    }

    fn sidecar(&self, file: &str, record: &str) {
        fs::write(self.root.join(format!("{file}.sbzm")), record).unwrap();
    }

    fn library(&self, budget: Duration) -> Library {
        let mut library = Library::new(ScanConfig::default(), TagCatalog::new(), None);
        library.configure_roots(&[self.root.clone()]).unwrap();
        library.set_budget(budget);
        library
    }
}

fn scan_with_budget(fixture: &Fixture, budget: Duration) -> (Library, u64) {
    let mut library = fixture.library(budget);
    let stats = library.scan_to_completion();
    (library, stats.steps)
}

#[test]
fn hierarchy_is_identical_for_one_or_many_steps() {
    let fixture = Fixture::new(&["x/y/1.wav", "x/z/2.wav"]);

    let (single, single_steps) = scan_with_budget(&fixture, Duration::from_secs(60));
    let (many, many_steps) = scan_with_budget(&fixture, Duration::ZERO);

    assert_eq!(single_steps, 1);
    // root, x, x/y, x/z
    assert_eq!(many_steps, 4);
    assert_eq!(single.tree().render_text(false), many.tree().render_text(false));
    insta::assert_snapshot!(many.tree().render_text(false), @r"
    Sounds/
      x/
        y/
          1.wav
        z/
          2.wav
    ");
}

#[test]
fn step_stops_at_first_directory_boundary_after_budget() {
    let fixture = Fixture::new(&["a/1.wav", "b/2.wav", "c/3.wav"]);
    let mut processor = ScanProcessor::new(&ScanConfig::default()).with_budget(Duration::ZERO);
    let mut catalog = TagCatalog::new();
    processor.start(&[fixture.root.clone()]);

    let mut steps = 0;
    loop {
        let before = processor.pending();
        let result = processor.step(&mut catalog);
        steps += 1;
        match result {
            StepResult::Pending => assert_eq!(processor.pending(), before - 1),
            StepResult::Finished(files) => {
                assert_eq!(files.len(), 3);
                break;
            }
            StepResult::Idle => panic!("processor went idle mid-scan"),
        }
    }
    assert_eq!(steps, 4);
}

#[test]
fn vanished_directory_does_not_affect_the_rest() {
    let fixture = Fixture::new(&["keep/1.wav", "gone/2.wav", "later/3.wav", "top.mp3"]);
    let mut library = fixture.library(Duration::ZERO);

    library.start_scan();
    fs::remove_dir_all(fixture.root.join("gone")).unwrap();
    while library.step_scan().in_progress {}

    let names: Vec<_> = library.tree().files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["top.mp3", "1.wav", "3.wav"]);
    assert_eq!(library.stats().directories_failed, 1);
    assert_eq!(library.stats().directories_scanned, 3);
}

#[test]
fn filter_matches_include_and_exclude_sets() {
    let fixture = Fixture::new(&["a.wav", "b.wav", "c.wav"]);
    fixture.sidecar("a.wav", "drum\n");
    fixture.sidecar("c.wav", "drum,loop\n");

    let mut library = fixture.library(Duration::from_millis(100));
    library.scan_to_completion();

    let drum = library.catalog().find_by_name("drum").unwrap();
    let looped = library.catalog().find_by_name("loop").unwrap();

    let visible = |library: &Library| -> Vec<String> {
        library
            .tree()
            .render_text(true)
            .lines()
            .skip(1)
            .map(|l| l.trim().to_owned())
            .collect()
    };

    library.set_filter(TagFilter::new([drum], []));
    assert_eq!(visible(&library), ["a.wav", "c.wav"]);

    library.set_filter(TagFilter::new([drum], [looped]));
    assert_eq!(visible(&library), ["a.wav"]);

    library.set_filter(TagFilter::new([], [drum]));
    assert_eq!(visible(&library), ["b.wav"]);

    library.set_filter(TagFilter::default());
    assert_eq!(library.visible_file_count(), 3);
}

#[test]
fn assigned_tags_survive_a_rescan() {
    let fixture = Fixture::new(&["snare.ogg"]);
    let mut library = fixture.library(Duration::from_millis(100));
    library.scan_to_completion();

    let crisp = library
        .create_tag(TagDefinition::new("Crisp", Default::default()))
        .unwrap();
    let dry = library
        .create_tag(TagDefinition::new("Dry", Default::default()))
        .unwrap();
    let snare = fixture.root.join("snare.ogg");
    library.assign_tags(&snare, &[dry, crisp]).unwrap();

    library.scan_to_completion();
    assert_eq!(library.tags_for(&snare), Some(&[dry, crisp][..]));

    library.assign_tags(&snare, &[]).unwrap();
    library.scan_to_completion();
    assert_eq!(library.tags_for(&snare), Some(&[][..]));
}

#[test]
fn uppercase_extensions_and_sidecars_are_not_sounds() {
    let fixture = Fixture::new(&["LOUD.WAV", "quiet.wav", "notes.txt"]);
    fixture.sidecar("quiet.wav", "soft\n");

    let mut library = fixture.library(Duration::from_millis(100));
    library.scan_to_completion();

    let files: Vec<_> = library.tree().files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(files, ["quiet.wav"]);
    assert!(library.tags_for(Utf8Path::new("/nowhere/quiet.wav")).is_none());
}
