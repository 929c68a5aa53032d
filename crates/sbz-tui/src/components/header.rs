//! Header bar component.
//!
//! Displays the application title, the search roots, and sound counts.

use camino::Utf8PathBuf;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::theme::Theme;

/// The header bar component.
pub struct HeaderBar<'a> {
    roots: &'a [Utf8PathBuf],
    visible: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> HeaderBar<'a> {
    /// Creates a new header bar.
    #[must_use]
    pub const fn new(
        roots: &'a [Utf8PathBuf],
        visible: usize,
        total: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            roots,
            visible,
            total,
            theme,
        }
    }

    fn roots_text(&self) -> String {
        match self.roots {
            [] => "<no roots>".to_owned(),
            [root] => shorten(root.as_str(), 40),
            [first, rest @ ..] => format!("{} (+{})", shorten(first.as_str(), 32), rest.len()),
        }
    }
}

impl Widget for &HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled("sbz", self.theme.accent_style().add_modifier(Modifier::BOLD)),
            Span::raw(" │ "),
            Span::styled(self.roots_text(), self.theme.base_style()),
            Span::raw(" │ "),
            Span::styled(
                format!("{}/{} sounds", self.visible, self.total),
                Style::default().fg(self.theme.include_fg),
            ),
            Span::raw(" │ "),
            Span::styled("? for help", Style::default().fg(self.theme.assigned_fg)),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(self.theme.border_style);

        Paragraph::new(line).block(block).render(area, buf);
    }
}

/// Keeps the end of `text`, the most specific part of a path.
fn shorten(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_owned();
    }
    let tail: String = text.chars().skip(count - max_chars + 3).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("/samples", 40), "/samples");
        let long = shorten("/home/someone/music/samples/drums/acoustic", 20);
        assert_eq!(long.chars().count(), 20);
        assert!(long.starts_with("..."));
        assert!(long.ends_with("acoustic"));
    }

    #[test]
    fn test_roots_text() {
        let theme = Theme::dark();
        let roots = [Utf8PathBuf::from("/a"), Utf8PathBuf::from("/b")];
        assert_eq!(HeaderBar::new(&[], 0, 0, &theme).roots_text(), "<no roots>");
        assert_eq!(HeaderBar::new(&roots, 0, 0, &theme).roots_text(), "/a (+1)");
    }
}
