//! Main UI layout and rendering orchestration.
//!
//! # Layout Structure
//!
//! ```text
//! +------------------------------------------------------------------+
//! | sbz | /samples (+1) | 120/480 sounds | ? for help                 |
//! +--------------------------------+---------------------------------+
//! | Sounds (120/480)               | Tags (12)                       |
//! | ▸ ▾ Sounds/                    |  +  ■ drum                      |
//! |     ▾ loops/                   |   * ■ loop                      |
//! |         beat.wav ●●            +----------------+----------------+
//! |     ▸ pads/                    | Include (1)    | Exclude (0)    |
//! |                                +----------------+----------------+
//! |                                | Assigned (1)                    |
//! |                                +---------------------------------+
//! |                                | Details                         |
//! +--------------------------------+---------------------------------+
//! | TREE  Tagged 'loop' │ Filter: +drum │                            |
//! +------------------------------------------------------------------+
//! ```
//!
//! Rendering takes the app mutably so list widgets can record their page
//! height and scroll offset.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use sbz_core::ScannedFile;
use sbz_scanner::Library;

use crate::app::{App, AppMode, Focus, ListState, TreeRow};
use crate::components::{
    DetailPane, HeaderBar, HelpPanel, ScanOverlay, StatusBar, TagList, TagMarks, TextInput,
    TreeView,
};
use crate::theme::Theme;

/// Renders the entire UI based on the current application state.
pub fn render(app: &mut App, frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let library = &app.library;
    let header = HeaderBar::new(
        library.roots(),
        library.visible_file_count(),
        library.tree().files().len(),
        theme,
    );
    frame.render_widget(&header, main_chunks[0]);

    render_main_content(app, frame, main_chunks[1], theme);

    let status_bar = StatusBar::new(app, theme);
    frame.render_widget(&status_bar, main_chunks[2]);

    match app.mode {
        AppMode::Input(purpose) => {
            let input = TextInput::new(purpose.title(), &app.input, theme);
            frame.render_widget(&input, centered_box(50, 3, area));
        }
        AppMode::Help => {
            let help_panel = HelpPanel::new(theme);
            frame.render_widget(&help_panel, centered_rect(60, 80, area));
        }
        AppMode::Normal if app.is_scanning() => {
            let overlay = ScanOverlay::new(&app.stats, theme);
            frame.render_widget(&overlay, centered_box(50, 4, area));
        }
        AppMode::Normal => {}
    }
}

/// Renders the tree on the left and the tag panels on the right.
fn render_main_content(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Tags
            Constraint::Length(6), // Include | Exclude
            Constraint::Length(6), // Assigned
            Constraint::Length(6), // Details
        ])
        .split(columns[1]);

    let filter_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);

    let library = &app.library;
    let catalog = library.catalog();
    let focus = app.focus;

    let tree_view = TreeView::new(
        library.tree(),
        &app.rows,
        catalog,
        library.visible_file_count(),
        focus == Focus::Tree,
        theme,
    );
    frame.render_stateful_widget(&tree_view, columns[0], &mut app.tree_state);

    let file = selected_file(library, &app.rows, &app.tree_state);
    let assigned = file.map_or(&[][..], |f| f.metadata.tags());
    let marks = TagMarks {
        included: library.filter().included(),
        excluded: library.filter().excluded(),
        assigned,
    };

    let tags_title = if app.tag_search.is_empty() {
        "Tags".to_owned()
    } else {
        format!("Tags /{}", app.tag_search)
    };
    let panels = [
        (
            tags_title.as_str(),
            &app.tag_results[..],
            Focus::Tags,
            right[0],
            &mut app.tags_state,
        ),
        (
            "Include",
            marks.included,
            Focus::Include,
            filter_row[0],
            &mut app.include_state,
        ),
        (
            "Exclude",
            marks.excluded,
            Focus::Exclude,
            filter_row[1],
            &mut app.exclude_state,
        ),
        (
            "Assigned",
            assigned,
            Focus::Assigned,
            right[2],
            &mut app.assigned_state,
        ),
    ];
    for (title, tags, panel, rect, state) in panels {
        let list = TagList::new(title, tags, catalog, marks, focus == panel, theme);
        frame.render_stateful_widget(&list, rect, state);
    }

    let details = DetailPane::new(file, catalog, theme);
    frame.render_widget(&details, right[3]);
}

fn selected_file<'a>(
    library: &'a Library,
    rows: &[TreeRow],
    state: &ListState,
) -> Option<&'a ScannedFile> {
    let row = state.selected.and_then(|i| rows.get(i))?;
    library.tree().file(row.id)
}

/// Creates a centered rectangle with the given percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Creates a centered rectangle with a percentage width and a fixed
/// height in lines.
fn centered_box(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let popup = Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    };
    centered_rect(percent_x, 100, popup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use sbz_core::{Config, ScanConfig, TagCatalog};

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 50, area);

        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_centered_box_has_fixed_height() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_box(50, 3, area);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.y, 10);
        assert_eq!(popup.width, 40);

        assert_eq!(centered_box(50, 10, Rect::new(0, 0, 80, 4)).height, 4);
    }

    #[test]
    fn test_render_every_mode() {
        let library = Library::new(ScanConfig::default(), TagCatalog::new(), None);
        let mut app = App::new(Config::default(), library);
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        for action in [
            crate::Action::None,
            crate::Action::ToggleHelp,
            crate::Action::HideHelp,
            crate::Action::BeginInput(crate::action::InputPurpose::Search),
        ] {
            app.update(action);
            terminal
                .draw(|frame| render(&mut app, frame, &theme))
                .unwrap();
        }
        assert_eq!(app.tree_state.visible_height, 25);
    }
}
