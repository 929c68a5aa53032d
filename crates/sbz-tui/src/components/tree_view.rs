//! Sound tree component.
//!
//! Shows the visible part of the hierarchy as an indented, selectable list.
//! File rows carry one colored swatch per assigned tag.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, HighlightSpacing, List, ListItem, ListState as WidgetListState,
    StatefulWidget,
};
use sbz_core::TagCatalog;
use sbz_scanner::Hierarchy;

use crate::app::{ListState, TreeRow};
use crate::theme::Theme;

/// A stateful tree widget.
pub struct TreeView<'a> {
    tree: &'a Hierarchy,
    rows: &'a [TreeRow],
    catalog: &'a TagCatalog,
    visible_files: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TreeView<'a> {
    /// Creates a new tree view.
    #[must_use]
    pub const fn new(
        tree: &'a Hierarchy,
        rows: &'a [TreeRow],
        catalog: &'a TagCatalog,
        visible_files: usize,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            tree,
            rows,
            catalog,
            visible_files,
            focused,
            theme,
        }
    }

    fn build_item(&self, row: &TreeRow) -> ListItem<'a> {
        let style = if row.is_directory {
            Style::default().fg(self.theme.directory_fg)
        } else {
            Style::default().fg(self.theme.sound_fg)
        };
        let mut spans = vec![Span::styled(row_text(self.tree, row), style)];

        if let Some(file) = self.tree.file(row.id) {
            if !file.metadata.is_empty() {
                spans.push(Span::raw(" "));
            }
            for tag in file.metadata.tags() {
                if let Some(def) = self.catalog.get(*tag) {
                    spans.push(Span::styled("●", self.theme.tag_style(def.color)));
                }
            }
        }

        ListItem::new(Line::from(spans))
    }
}

impl StatefulWidget for &TreeView<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.visible_height = area.height.saturating_sub(2) as usize;

        let title = format!(
            " Sounds ({}/{}) ",
            self.visible_files,
            self.tree.files().len()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused))
            .title(Span::styled(title, self.theme.header_style));

        let items: Vec<ListItem> = self.rows.iter().map(|row| self.build_item(row)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style)
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol("▸ ");

        let mut widget_state = WidgetListState::default()
            .with_selected(state.selected)
            .with_offset(state.scroll_offset);
        StatefulWidget::render(list, area, buf, &mut widget_state);
        state.scroll_offset = widget_state.offset();
    }
}

/// Returns the text of one tree row: indentation, an expansion marker on
/// directories, and the label. Directory labels end with `/`.
#[must_use]
pub fn row_text(tree: &Hierarchy, row: &TreeRow) -> String {
    let label = tree.get(row.id).map_or("", |n| n.label.as_str());
    let indent = "  ".repeat(row.depth);
    if row.is_directory {
        let marker = if row.expanded { "▾" } else { "▸" };
        format!("{indent}{marker} {label}/")
    } else {
        format!("{indent}  {label}")
    }
}
