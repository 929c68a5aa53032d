//! Tag list component.
//!
//! One widget serves all four tag panels: the searchable tag list, the
//! include and exclude sets, and the tags of the selected sound. Every row
//! shows filter and assignment marks, a color swatch, and the name.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, HighlightSpacing, List, ListItem, ListState as WidgetListState,
    StatefulWidget,
};
use sbz_core::{TagCatalog, TagId};

use crate::app::ListState;
use crate::theme::Theme;

/// Tag sets used to mark list rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagMarks<'a> {
    /// Tags in the include set, marked `+`.
    pub included: &'a [TagId],
    /// Tags in the exclude set, marked `-`.
    pub excluded: &'a [TagId],
    /// Tags of the selected sound, marked `*`.
    pub assigned: &'a [TagId],
}

impl TagMarks<'_> {
    /// Returns the filter mark and the assignment mark of a tag.
    #[must_use]
    pub fn marks(&self, tag: TagId) -> (char, char) {
        let filter = if self.included.contains(&tag) {
            '+'
        } else if self.excluded.contains(&tag) {
            '-'
        } else {
            ' '
        };
        let assigned = if self.assigned.contains(&tag) { '*' } else { ' ' };
        (filter, assigned)
    }
}

/// A stateful list of tags.
pub struct TagList<'a> {
    title: &'a str,
    tags: &'a [TagId],
    catalog: &'a TagCatalog,
    marks: TagMarks<'a>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TagList<'a> {
    /// Creates a new tag list.
    #[must_use]
    pub const fn new(
        title: &'a str,
        tags: &'a [TagId],
        catalog: &'a TagCatalog,
        marks: TagMarks<'a>,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            tags,
            catalog,
            marks,
            focused,
            theme,
        }
    }

    fn build_item(&self, tag: TagId) -> Option<ListItem<'a>> {
        let def = self.catalog.get(tag)?;
        let (filter, assigned) = self.marks.marks(tag);
        let filter_style = match filter {
            '+' => Style::default().fg(self.theme.include_fg),
            '-' => Style::default().fg(self.theme.exclude_fg),
            _ => Style::default(),
        };

        Some(ListItem::new(Line::from(vec![
            Span::styled(filter.to_string(), filter_style),
            Span::styled(
                assigned.to_string(),
                Style::default().fg(self.theme.assigned_fg),
            ),
            Span::raw(" "),
            Span::styled("■ ", self.theme.tag_style(def.color)),
            Span::styled(def.name.clone(), self.theme.base_style()),
        ])))
    }
}

impl StatefulWidget for &TagList<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.visible_height = area.height.saturating_sub(2) as usize;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused))
            .title(Span::styled(
                format!(" {} ({}) ", self.title, self.tags.len()),
                self.theme.header_style,
            ));

        let items: Vec<ListItem> = self
            .tags
            .iter()
            .filter_map(|tag| self.build_item(*tag))
            .collect();

        // Only the focused panel shows its selection.
        let list = List::new(items)
            .block(block)
            .highlight_style(if self.focused {
                self.theme.highlight_style
            } else {
                Style::default()
            })
            .highlight_spacing(HighlightSpacing::Always)
            .highlight_symbol(if self.focused { "▸ " } else { "  " });

        let mut widget_state = WidgetListState::default()
            .with_selected(state.selected)
            .with_offset(state.scroll_offset);
        StatefulWidget::render(list, area, buf, &mut widget_state);
        state.scroll_offset = widget_state.offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbz_core::{TagColor, TagDefinition};

    #[test]
    fn test_marks() {
        let (a, b, c) = (TagId::new(0), TagId::new(1), TagId::new(2));
        let marks = TagMarks {
            included: &[a],
            excluded: &[b],
            assigned: &[a, c],
        };
        assert_eq!(marks.marks(a), ('+', '*'));
        assert_eq!(marks.marks(b), ('-', ' '));
        assert_eq!(marks.marks(c), (' ', '*'));
    }

    #[test]
    fn test_render_shows_names() {
        let catalog = TagCatalog::from_definitions([
            TagDefinition::new("drum", TagColor::rgb(255, 0, 0)),
            TagDefinition::new("loop", TagColor::rgb(0, 255, 0)),
        ]);
        let tags = catalog.search("");
        let theme = Theme::dark();
        let marks = TagMarks {
            included: &tags[..1],
            ..TagMarks::default()
        };
        let list = TagList::new("Tags", &tags, &catalog, marks, false, &theme);

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        StatefulWidget::render(&list, area, &mut buf, &mut state);

        let line: String = (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_owned())
            .collect();
        assert!(line.contains("+  ■ drum"), "{line}");
        assert_eq!(state.visible_height, 2);
    }
}
