//! Detail pane component.
//!
//! Displays the selected sound: name, location, and assigned tags.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use sbz_core::{ScannedFile, TagCatalog};

use crate::theme::Theme;

/// The detail pane widget.
pub struct DetailPane<'a> {
    file: Option<&'a ScannedFile>,
    catalog: &'a TagCatalog,
    theme: &'a Theme,
}

impl<'a> DetailPane<'a> {
    /// Creates a new detail pane.
    #[must_use]
    pub const fn new(
        file: Option<&'a ScannedFile>,
        catalog: &'a TagCatalog,
        theme: &'a Theme,
    ) -> Self {
        Self {
            file,
            catalog,
            theme,
        }
    }

    fn lines(&self, file: &'a ScannedFile) -> Vec<Line<'a>> {
        let label = self.theme.dimmed_style();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("File: ", label),
                Span::styled(
                    file.name.as_str(),
                    self.theme.accent_style().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("In:   ", label),
                Span::styled(file.relative_path.as_str(), self.theme.base_style()),
            ]),
            Line::from(vec![
                Span::styled("Path: ", label),
                Span::styled(file.full_path.as_str(), self.theme.base_style()),
            ]),
        ];

        let mut tags = vec![Span::styled("Tags: ", label)];
        if file.metadata.is_empty() {
            tags.push(Span::styled("none", label));
        }
        for def in file.metadata.tags().iter().filter_map(|t| self.catalog.get(*t)) {
            tags.push(Span::styled("■ ", self.theme.tag_style(def.color)));
            tags.push(Span::styled(format!("{} ", def.name), self.theme.base_style()));
        }
        lines.push(Line::from(tags));
        lines
    }
}

impl Widget for &DetailPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style)
            .title(Span::styled(" Details ", self.theme.header_style));

        let paragraph = match self.file {
            Some(file) => Paragraph::new(Text::from(self.lines(file)))
                .wrap(Wrap { trim: false }),
            None => Paragraph::new(Line::from(Span::styled(
                "No sound selected",
                Style::default().fg(self.theme.dimmed_fg),
            )))
            .alignment(Alignment::Center),
        };

        paragraph.block(block).render(area, buf);
    }
}
