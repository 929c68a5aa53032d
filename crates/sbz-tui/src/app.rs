//! Application state and lifecycle management.
//!
//! ```text
//! App
//!  ├── library: Library          # Catalog, scan processor, tree, filter
//!  ├── mode: AppMode             # Normal, help, or a text input
//!  ├── focus: Focus              # Tree → Tags → Include → Exclude → Assigned
//!  ├── rows: Vec<TreeRow>        # Flattened visible tree
//!  ├── tag_results: Vec<TagId>   # Tag list after search
//!  └── status: Option<StatusMessage>
//! ```
//!
//! Every tick runs one scan step while a scan is active. The tree shown is
//! the last published one until the scan completes.

use std::time::Instant;

use camino::Utf8PathBuf;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use rustc_hash::FxHashSet;
use sbz_core::{Config, ScannedFile, TagColor, TagDefinition, TagId};
use sbz_scanner::{Library, NodeId, NodeKind, StatsSnapshot, TagFilter};
use tracing::{debug, info, warn};

use crate::action::{Action, InputPurpose};
use crate::error::TuiError;
use crate::launcher::Launcher;

/// The current mode of the application UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal browsing mode.
    #[default]
    Normal,

    /// Help panel is displayed.
    Help,

    /// A text input overlay is displayed.
    Input(InputPurpose),
}

/// Which panel has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The sound tree.
    #[default]
    Tree,
    /// All tags matching the search.
    Tags,
    /// Tags a sound must carry.
    Include,
    /// Tags a sound must not carry.
    Exclude,
    /// Tags of the selected sound.
    Assigned,
}

impl Focus {
    /// Returns the next panel in focus order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Tree => Self::Tags,
            Self::Tags => Self::Include,
            Self::Include => Self::Exclude,
            Self::Exclude => Self::Assigned,
            Self::Assigned => Self::Tree,
        }
    }

    /// Returns the previous panel in focus order.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::Tree => Self::Assigned,
            Self::Tags => Self::Tree,
            Self::Include => Self::Tags,
            Self::Exclude => Self::Include,
            Self::Assigned => Self::Exclude,
        }
    }
}

/// Selection and scroll state of one list panel.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index (if any).
    pub selected: Option<usize>,

    /// Index of the first row shown.
    pub scroll_offset: usize,

    /// Height of the visible area (for page navigation).
    pub visible_height: usize,
}

impl ListState {
    /// Moves selection to the next item, wrapping to the start.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            Some(_) | None => 0,
        });
    }

    /// Moves selection to the previous item, wrapping to the end.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Moves selection to the first item.
    pub fn select_first(&mut self, len: usize) {
        self.selected = (len > 0).then_some(0);
        self.scroll_offset = 0;
    }

    /// Moves selection to the last item.
    pub fn select_last(&mut self, len: usize) {
        self.selected = len.checked_sub(1);
    }

    /// Moves selection down by one page.
    pub fn page_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| (i + page).min(len - 1)));
    }

    /// Moves selection up by one page.
    pub fn page_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let page = self.visible_height.max(1);
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(page)));
    }

    /// Keeps the selection inside a list of `len` items. An empty
    /// selection on a non-empty list selects the first item.
    pub fn clamp(&mut self, len: usize) {
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        if self.scroll_offset >= len {
            self.scroll_offset = 0;
        }
    }
}

/// One row of the flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    /// Node shown on this row.
    pub id: NodeId,
    /// Nesting depth, the root is 0.
    pub depth: usize,
    /// `true` for directories.
    pub is_directory: bool,
    /// `true` for directories whose children are listed.
    pub expanded: bool,
}

/// Status message to display in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,

    /// When the message was created.
    pub timestamp: Instant,

    /// Whether this is an error message.
    pub is_error: bool,
}

impl StatusMessage {
    /// Creates a new info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: false,
        }
    }

    /// Creates a new error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: true,
        }
    }

    /// Returns `true` once the message is older than five seconds.
    #[must_use]
    pub fn should_hide(&self) -> bool {
        self.timestamp.elapsed().as_secs() > 5
    }
}

/// The main application state.
pub struct App {
    /// The configuration.
    pub config: Config,

    pub(crate) library: Library,

    launcher: Option<Launcher>,

    /// Current UI mode.
    pub mode: AppMode,

    /// Which panel has focus.
    pub focus: Focus,

    /// Tree panel state.
    pub tree_state: ListState,

    pub(crate) rows: Vec<TreeRow>,

    /// Display paths of expanded directories. Survives rescans.
    expanded: FxHashSet<String>,

    /// Current tag search text.
    pub tag_search: String,

    pub(crate) tag_results: Vec<TagId>,

    /// Tag list panel state.
    pub tags_state: ListState,

    /// Include panel state.
    pub include_state: ListState,

    /// Exclude panel state.
    pub exclude_state: ListState,

    /// Assigned tags panel state.
    pub assigned_state: ListState,

    /// Text of the open input overlay.
    pub input: String,

    /// Tag being renamed by the input overlay.
    input_target: Option<TagId>,

    /// Status message to display.
    pub status: Option<StatusMessage>,

    /// Whether the application should quit.
    pub should_quit: bool,

    /// Counters of the current or last scan.
    pub stats: StatsSnapshot,
}

impl App {
    /// Creates the application around an opened library.
    #[must_use]
    pub fn new(config: Config, library: Library) -> Self {
        let launcher = Launcher::from_config(&config.open);
        let tag_results = library.catalog().search("");
        let status = library.roots().is_empty().then(|| {
            StatusMessage::info("No search roots configured. Add one with `sbz roots add <dir>`")
        });

        let mut app = Self {
            config,
            library,
            launcher,
            mode: AppMode::Normal,
            focus: Focus::Tree,
            tree_state: ListState::default(),
            rows: Vec::new(),
            expanded: FxHashSet::default(),
            tag_search: String::new(),
            tag_results,
            tags_state: ListState::default(),
            include_state: ListState::default(),
            exclude_state: ListState::default(),
            assigned_state: ListState::default(),
            input: String::new(),
            input_target: None,
            status,
            should_quit: false,
            stats: StatsSnapshot::default(),
        };
        app.refresh_rows();
        app.clamp_selections();
        app
    }

    /// Starts the first scan, if any roots are configured.
    pub fn start(&mut self) {
        if !self.library.roots().is_empty() {
            self.library.start_scan();
            self.stats = self.library.stats();
        }
    }

    /// Returns the library.
    #[must_use]
    pub const fn library(&self) -> &Library {
        &self.library
    }

    /// Returns `true` while a scan is running.
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        self.library.is_scanning()
    }

    /// Handles a key event and returns the resulting action.
    #[must_use]
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_key(key),
            AppMode::Help => Self::handle_help_key(key),
            AppMode::Input(purpose) => self.handle_input_key(purpose, key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('j') | KeyCode::Down => Action::NextItem,
            KeyCode::Char('k') | KeyCode::Up => Action::PreviousItem,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstItem,
            KeyCode::Char('G') | KeyCode::End => Action::LastItem,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('l') | KeyCode::Right => Action::Expand,
            KeyCode::Char('h') | KeyCode::Left => Action::Collapse,
            KeyCode::Tab => Action::FocusNext,
            KeyCode::BackTab => Action::FocusPrevious,
            KeyCode::Enter => Action::Activate,
            KeyCode::Char('i') => Action::IncludeTag,
            KeyCode::Char('x') => Action::ExcludeTag,
            KeyCode::Char('a') => Action::AssignTag,
            KeyCode::Char('d') | KeyCode::Delete => Action::RemoveSelected,
            KeyCode::Char('n') => Action::BeginInput(InputPurpose::NewTag),
            KeyCode::Char('e') => Action::BeginInput(InputPurpose::RenameTag),
            KeyCode::Char('/') => Action::BeginInput(InputPurpose::Search),
            KeyCode::Char('R') => Action::ResetFilter,
            KeyCode::Char('r') => Action::Rescan,
            KeyCode::Char('o') => Action::OpenSelected,
            KeyCode::Esc if !self.tag_search.is_empty() => {
                self.set_search(String::new());
                Action::Render
            }
            _ => Action::None,
        }
    }

    const fn handle_help_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | '?') => Action::HideHelp,
            _ => Action::None,
        }
    }

    fn handle_input_key(&mut self, purpose: InputPurpose, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelInput,
            KeyCode::Enter => Action::SubmitInput,
            KeyCode::Backspace => {
                self.input.pop();
                self.input_changed(purpose);
                Action::Render
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.input_changed(purpose);
                Action::Render
            }
            _ => Action::None,
        }
    }

    /// Handles pasted text. Only text inputs accept it.
    pub fn handle_paste(&mut self, text: &str) -> Action {
        let AppMode::Input(purpose) = self.mode else {
            return Action::None;
        };
        self.input.extend(text.chars().filter(|c| !c.is_control()));
        self.input_changed(purpose);
        Action::Render
    }

    /// Handles a mouse event. The wheel moves the selection.
    #[must_use]
    pub const fn handle_mouse(&self, event: MouseEvent) -> Action {
        match event.kind {
            MouseEventKind::ScrollDown => Action::NextItem,
            MouseEventKind::ScrollUp => Action::PreviousItem,
            _ => Action::None,
        }
    }

    fn input_changed(&mut self, purpose: InputPurpose) {
        if purpose == InputPurpose::Search {
            self.set_search(self.input.clone());
        }
    }

    /// Updates the application state based on an action.
    #[allow(clippy::match_same_arms)]
    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,

            Action::NextItem => {
                let len = self.panel_len(self.focus);
                self.focused_state().select_next(len);
            }
            Action::PreviousItem => {
                let len = self.panel_len(self.focus);
                self.focused_state().select_previous(len);
            }
            Action::FirstItem => {
                let len = self.panel_len(self.focus);
                self.focused_state().select_first(len);
            }
            Action::LastItem => {
                let len = self.panel_len(self.focus);
                self.focused_state().select_last(len);
            }
            Action::PageDown => {
                let len = self.panel_len(self.focus);
                self.focused_state().page_down(len);
            }
            Action::PageUp => {
                let len = self.panel_len(self.focus);
                self.focused_state().page_up(len);
            }
            Action::Expand => self.expand_selected(),
            Action::Collapse => self.collapse_selected(),

            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrevious => self.focus = self.focus.previous(),

            Action::IncludeTag => self.change_filter(|filter, tag| filter.include(tag)),
            Action::ExcludeTag => self.change_filter(|filter, tag| filter.exclude(tag)),
            Action::ResetFilter => {
                self.library.set_filter(TagFilter::default());
                self.after_filter_change();
                self.status = Some(StatusMessage::info("Filter reset"));
            }

            Action::AssignTag => self.assign_selected_tag(),
            Action::Activate => self.activate(),
            Action::RemoveSelected => self.remove_selected(),

            Action::BeginInput(purpose) => self.begin_input(purpose),
            Action::SubmitInput => self.submit_input(),
            Action::CancelInput => {
                self.mode = AppMode::Normal;
                self.input.clear();
                self.input_target = None;
            }

            Action::Rescan => self.rescan(),
            Action::OpenSelected => self.open_selected(),

            Action::ToggleHelp => {
                self.mode = if self.mode == AppMode::Help {
                    AppMode::Normal
                } else {
                    AppMode::Help
                };
            }
            Action::HideHelp => self.mode = AppMode::Normal,

            Action::ShowStatus(text) => self.status = Some(StatusMessage::info(text)),
            Action::ClearStatus => self.status = None,

            Action::Render | Action::Tick | Action::None => {}
        }
    }

    /// Handles a tick: runs one scan step and expires old status messages.
    pub fn tick(&mut self) {
        if self.library.is_scanning() {
            let outcome = self.library.step_scan();
            self.stats = outcome.stats;
            if outcome.completed {
                self.scan_completed();
            }
        }

        if self.status.as_ref().is_some_and(StatusMessage::should_hide) {
            self.status = None;
        }
    }

    fn scan_completed(&mut self) {
        self.refresh_tag_results();
        self.refresh_rows();
        self.clamp_selections();

        let files = self.library.tree().files().len();
        let failed = self.stats.directories_failed;
        let message = if failed > 0 {
            StatusMessage::error(format!(
                "Scanned {files} sounds, {failed} directories could not be read"
            ))
        } else {
            StatusMessage::info(format!(
                "Scanned {files} sounds in {} directories",
                self.stats.directories_scanned
            ))
        };
        self.status = Some(message);
    }

    fn rescan(&mut self) {
        if self.library.roots().is_empty() {
            self.status = Some(StatusMessage::error("No search roots configured"));
            return;
        }
        info!(roots = self.library.roots().len(), "Rescan requested");
        self.library.start_scan();
        self.stats = self.library.stats();
        self.status = Some(StatusMessage::info("Scanning..."));
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the selected tree row.
    #[must_use]
    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.tree_state.selected.and_then(|i| self.rows.get(i))
    }

    /// Returns the sound on the selected tree row.
    #[must_use]
    pub fn selected_file(&self) -> Option<&ScannedFile> {
        self.selected_row()
            .and_then(|row| self.library.tree().file(row.id))
    }

    /// Returns the tags of the selected sound.
    #[must_use]
    pub fn assigned_tags(&self) -> &[TagId] {
        self.selected_file().map_or(&[][..], |f| f.metadata.tags())
    }

    /// Returns the tags matching the search, in registration order.
    #[must_use]
    pub fn tag_results(&self) -> &[TagId] {
        &self.tag_results
    }

    /// Returns the selected tag of the focused tag panel. With the tree
    /// focused, the tag list selection is used.
    #[must_use]
    pub fn selected_tag(&self) -> Option<TagId> {
        let filter = self.library.filter();
        match self.focus {
            Focus::Tree | Focus::Tags => pick(&self.tag_results, &self.tags_state),
            Focus::Include => pick(filter.included(), &self.include_state),
            Focus::Exclude => pick(filter.excluded(), &self.exclude_state),
            Focus::Assigned => pick(self.assigned_tags(), &self.assigned_state),
        }
    }

    fn panel_len(&self, focus: Focus) -> usize {
        match focus {
            Focus::Tree => self.rows.len(),
            Focus::Tags => self.tag_results.len(),
            Focus::Include => self.library.filter().included().len(),
            Focus::Exclude => self.library.filter().excluded().len(),
            Focus::Assigned => self.assigned_tags().len(),
        }
    }

    fn focused_state(&mut self) -> &mut ListState {
        match self.focus {
            Focus::Tree => &mut self.tree_state,
            Focus::Tags => &mut self.tags_state,
            Focus::Include => &mut self.include_state,
            Focus::Exclude => &mut self.exclude_state,
            Focus::Assigned => &mut self.assigned_state,
        }
    }

    fn clamp_selections(&mut self) {
        let tree = self.panel_len(Focus::Tree);
        let tags = self.panel_len(Focus::Tags);
        let include = self.panel_len(Focus::Include);
        let exclude = self.panel_len(Focus::Exclude);
        let assigned = self.panel_len(Focus::Assigned);
        self.tree_state.clamp(tree);
        self.tags_state.clamp(tags);
        self.include_state.clamp(include);
        self.exclude_state.clamp(exclude);
        self.assigned_state.clamp(assigned);
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Recomputes the visible rows, keeping the selection on the same node
    /// when it is still shown.
    fn refresh_rows(&mut self) {
        let tree = self.library.tree();
        let selected_key = self.selected_row().map(|row| tree.display_path(row.id));

        let expanded = &self.expanded;
        let is_expanded =
            |id: NodeId| id == tree.root() || expanded.contains(&tree.display_path(id));
        self.rows = tree
            .visible_rows(is_expanded)
            .into_iter()
            .map(|row| {
                let is_directory = tree.get(row.id).is_some_and(|n| n.is_directory());
                TreeRow {
                    id: row.id,
                    depth: row.depth,
                    is_directory,
                    expanded: is_directory && is_expanded(row.id),
                }
            })
            .collect();

        if let Some(key) = selected_key {
            if let Some(index) = self
                .rows
                .iter()
                .position(|row| tree.display_path(row.id) == key)
            {
                self.tree_state.selected = Some(index);
            }
        }
        self.tree_state.clamp(self.rows.len());
        debug!(rows = self.rows.len(), "Refreshed tree rows");
    }

    fn expand_selected(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let Some(row) = self.selected_row().copied() else {
            return;
        };
        if row.is_directory && !row.expanded {
            self.expanded
                .insert(self.library.tree().display_path(row.id));
            self.refresh_rows();
        }
    }

    fn collapse_selected(&mut self) {
        if self.focus != Focus::Tree {
            return;
        }
        let Some(row) = self.selected_row().copied() else {
            return;
        };
        let tree = self.library.tree();
        if row.is_directory && row.expanded && row.id != tree.root() {
            let key = tree.display_path(row.id);
            self.expanded.remove(&key);
            self.refresh_rows();
            return;
        }
        // Otherwise jump to the parent row.
        let parent = tree.get(row.id).and_then(|n| n.parent);
        if let Some(index) = parent.and_then(|p| self.rows.iter().position(|r| r.id == p)) {
            self.tree_state.selected = Some(index);
        }
    }

    /// Paths of the sounds under the selected row that pass the filter.
    fn selected_paths(&self) -> Vec<Utf8PathBuf> {
        let Some(row) = self.selected_row() else {
            return Vec::new();
        };
        let tree = self.library.tree();
        let mut paths = Vec::new();
        let mut stack = vec![row.id];
        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else {
                continue;
            };
            match node.kind {
                NodeKind::File(_) => {
                    if let Some(file) = tree.file(id) {
                        paths.push(file.full_path.clone());
                    }
                }
                NodeKind::Directory => {
                    stack.extend(
                        node.children
                            .iter()
                            .rev()
                            .copied()
                            .filter(|child| tree.is_visible(*child)),
                    );
                }
            }
        }
        paths
    }

    // =========================================================================
    // Tags and filter
    // =========================================================================

    fn set_search(&mut self, text: String) {
        self.tag_search = text;
        self.refresh_tag_results();
        self.tags_state.select_first(self.tag_results.len());
    }

    fn refresh_tag_results(&mut self) {
        self.tag_results = self.library.catalog().search(&self.tag_search);
        self.tags_state.clamp(self.tag_results.len());
    }

    fn tag_name(&self, tag: TagId) -> String {
        self.library
            .catalog()
            .name(tag)
            .unwrap_or_default()
            .to_owned()
    }

    fn change_filter(&mut self, edit: impl FnOnce(&mut TagFilter, TagId) -> bool) {
        let Some(tag) = self.selected_tag() else {
            self.status = Some(StatusMessage::error("No tag selected"));
            return;
        };
        let mut filter = self.library.filter().clone();
        if edit(&mut filter, tag) {
            let visible = self.library.set_filter(filter);
            self.after_filter_change();
            self.status = Some(StatusMessage::info(format!(
                "Filter on '{}': {visible} sounds",
                self.tag_name(tag)
            )));
        }
    }

    fn remove_from_filter(&mut self, tag: TagId) {
        let mut filter = self.library.filter().clone();
        if filter.remove(tag) {
            self.library.set_filter(filter);
            self.after_filter_change();
        }
    }

    fn after_filter_change(&mut self) {
        self.refresh_rows();
        self.clamp_selections();
    }

    fn assign_selected_tag(&mut self) {
        let Some(tag) = self.selected_tag() else {
            self.status = Some(StatusMessage::error("No tag selected"));
            return;
        };
        let Some(path) = self.selected_file().map(|f| f.full_path.clone()) else {
            self.status = Some(StatusMessage::error("Select a sound first"));
            return;
        };
        match self.library.add_tag_to_file(&path, tag) {
            Ok(true) => {
                self.status = Some(StatusMessage::info(format!(
                    "Tagged '{}'",
                    self.tag_name(tag)
                )));
                self.after_filter_change();
            }
            Ok(false) => {}
            Err(e) => self.report(e.into()),
        }
    }

    fn unassign_tag(&mut self, tag: TagId) {
        let Some(path) = self.selected_file().map(|f| f.full_path.clone()) else {
            return;
        };
        match self.library.remove_tag_from_file(&path, tag) {
            Ok(_) => self.after_filter_change(),
            Err(e) => self.report(e.into()),
        }
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Tree => match self.selected_row().copied() {
                Some(row) if row.is_directory && row.expanded => self.collapse_selected(),
                Some(row) if row.is_directory => self.expand_selected(),
                Some(_) => self.open_selected(),
                None => {}
            },
            Focus::Tags => {
                let Some(tag) = self.selected_tag() else {
                    return;
                };
                if self.assigned_tags().contains(&tag) {
                    self.unassign_tag(tag);
                } else {
                    self.assign_selected_tag();
                }
            }
            Focus::Include | Focus::Exclude => {
                if let Some(tag) = self.selected_tag() {
                    self.remove_from_filter(tag);
                }
            }
            Focus::Assigned => {
                if let Some(tag) = self.selected_tag() {
                    self.unassign_tag(tag);
                }
            }
        }
    }

    fn remove_selected(&mut self) {
        let Some(tag) = self.selected_tag() else {
            return;
        };
        match self.focus {
            Focus::Tree => {}
            Focus::Tags => match self.library.delete_tag(tag) {
                Ok(removed) => {
                    self.refresh_tag_results();
                    self.after_filter_change();
                    self.status = Some(StatusMessage::info(format!(
                        "Deleted tag '{}'",
                        removed.name
                    )));
                }
                Err(e) => self.report(e.into()),
            },
            Focus::Include | Focus::Exclude => self.remove_from_filter(tag),
            Focus::Assigned => self.unassign_tag(tag),
        }
    }

    // =========================================================================
    // Text input
    // =========================================================================

    fn begin_input(&mut self, purpose: InputPurpose) {
        self.input_target = None;
        self.input = match purpose {
            InputPurpose::Search => self.tag_search.clone(),
            InputPurpose::NewTag => String::new(),
            InputPurpose::RenameTag => {
                let Some(tag) = self.selected_tag() else {
                    self.status = Some(StatusMessage::error("No tag selected"));
                    return;
                };
                self.input_target = Some(tag);
                self.tag_name(tag)
            }
        };
        self.mode = AppMode::Input(purpose);
    }

    fn submit_input(&mut self) {
        let AppMode::Input(purpose) = self.mode else {
            return;
        };
        self.mode = AppMode::Normal;
        let text = std::mem::take(&mut self.input);

        match purpose {
            InputPurpose::Search => self.set_search(text),
            InputPurpose::NewTag => {
                match self
                    .library
                    .create_tag(TagDefinition::new(&text, TagColor::default()))
                {
                    Ok(id) => {
                        self.refresh_tag_results();
                        if let Some(index) = self.tag_results.iter().position(|t| *t == id) {
                            self.tags_state.selected = Some(index);
                        }
                        self.status = Some(StatusMessage::info(format!(
                            "Created tag '{}'",
                            self.tag_name(id)
                        )));
                    }
                    Err(e) => self.report(e.into()),
                }
            }
            InputPurpose::RenameTag => {
                let Some(tag) = self.input_target.take() else {
                    return;
                };
                let Some(mut working) = self.library.catalog().get(tag).cloned() else {
                    return;
                };
                working.name = text;
                match self.library.edit_tag(tag, &working) {
                    Ok(()) => {
                        self.refresh_tag_results();
                        self.status = Some(StatusMessage::info(format!(
                            "Renamed tag to '{}'",
                            self.tag_name(tag)
                        )));
                    }
                    Err(e) => self.report(e.into()),
                }
            }
        }
    }

    // =========================================================================
    // Open
    // =========================================================================

    fn open_selected(&mut self) {
        let Some(launcher) = &self.launcher else {
            self.status = Some(StatusMessage::error("No open command configured"));
            return;
        };
        let paths = self.selected_paths();
        if paths.is_empty() {
            return;
        }
        let result = launcher.open(&paths);
        match result {
            Ok(_) => {
                self.status = Some(StatusMessage::info(format!("Opened {} sounds", paths.len())));
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: TuiError) {
        warn!(error = %error, "Action failed");
        self.status = Some(StatusMessage::error(error.to_string()));
    }
}

fn pick(tags: &[TagId], state: &ListState) -> Option<TagId> {
    state.selected.and_then(|i| tags.get(i)).copied()
}
