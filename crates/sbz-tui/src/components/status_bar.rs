//! Status bar component.
//!
//! Displays the mode, the focused panel, the last status message, and a
//! summary of the active filter.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::{App, AppMode, Focus};
use crate::theme::Theme;

/// The status bar component.
pub struct StatusBar<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a new status bar.
    #[must_use]
    pub const fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }

    fn build_line(&self) -> Line<'a> {
        let mut spans = Vec::new();

        let mode_text = match self.app.mode {
            AppMode::Normal => match self.app.focus {
                Focus::Tree => "TREE",
                Focus::Tags => "TAGS",
                Focus::Include => "INCLUDE",
                Focus::Exclude => "EXCLUDE",
                Focus::Assigned => "ASSIGNED",
            },
            AppMode::Help => "HELP",
            AppMode::Input(_) => "INPUT",
        };
        spans.push(Span::styled(
            format!(" {mode_text} "),
            Style::default()
                .fg(Color::Black)
                .bg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        if let Some(status) = &self.app.status {
            let style = if status.is_error {
                self.theme.error_style()
            } else {
                self.theme.base_style()
            };
            spans.push(Span::styled(status.text.clone(), style));
            spans.push(Span::raw(" │ "));
        }

        let library = self.app.library();
        let filter = library.filter();
        if !filter.is_empty() {
            let catalog = library.catalog();
            let names = |tags: &[sbz_core::TagId], sign: char| {
                tags.iter()
                    .filter_map(|t| catalog.name(*t))
                    .map(|name| format!("{sign}{name}"))
                    .collect::<Vec<_>>()
            };
            spans.push(Span::styled("Filter: ", self.theme.dimmed_style()));
            for text in names(filter.included(), '+') {
                spans.push(Span::styled(
                    format!("{text} "),
                    Style::default().fg(self.theme.include_fg),
                ));
            }
            for text in names(filter.excluded(), '-') {
                spans.push(Span::styled(
                    format!("{text} "),
                    Style::default().fg(self.theme.exclude_fg),
                ));
            }
            spans.push(Span::raw("│ "));
        }

        if !self.app.tag_search.is_empty() {
            spans.push(Span::styled("Search: ", self.theme.dimmed_style()));
            spans.push(Span::styled(
                format!("\"{}\" ", self.app.tag_search),
                Style::default().fg(self.theme.assigned_fg),
            ));
        }

        Line::from(spans)
    }
}

impl Widget for &StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.status_bar_style)
            .render(area, buf);
    }
}
