//! Text input overlay.
//!
//! Used for the tag search and for naming tags.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// A single-line text input overlay widget.
pub struct TextInput<'a> {
    title: &'a str,
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> TextInput<'a> {
    /// Creates a new text input widget.
    #[must_use]
    pub const fn new(title: &'a str, text: &'a str, theme: &'a Theme) -> Self {
        Self { title, text, theme }
    }

    /// Returns the part of the text that fits in `width` columns, keeping
    /// the end where the cursor is.
    fn visible_text(&self, width: usize) -> &'a str {
        let mut start = 0;
        while self.text[start..].width() > width {
            start += self.text[start..].chars().next().map_or(1, char::len_utf8);
        }
        &self.text[start..]
    }
}

impl Widget for &TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                self.title,
                self.theme.accent_style().add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Span::styled(
                " Enter to confirm, Esc to cancel ",
                self.theme.dimmed_style(),
            ))
            .style(Style::default().bg(self.theme.overlay_bg));

        // Leave one column for the cursor.
        let width = usize::from(block.inner(area).width.saturating_sub(1));
        let cursor = Span::styled("▌", self.theme.accent_style());
        let line = if self.text.is_empty() {
            Line::from(vec![
                Span::styled(
                    "Type here...",
                    self.theme.dimmed_style().add_modifier(Modifier::ITALIC),
                ),
                cursor,
            ])
        } else {
            Line::from(vec![
                Span::styled(self.visible_text(width), self.theme.base_style()),
                cursor,
            ])
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_keeps_the_end() {
        let theme = Theme::dark();
        let input = TextInput::new(" Search ", "percussion", &theme);
        assert_eq!(input.visible_text(20), "percussion");
        assert_eq!(input.visible_text(4), "sion");
        assert_eq!(input.visible_text(0), "");
    }

    #[test]
    fn test_visible_text_wide_chars() {
        let theme = Theme::dark();
        let input = TextInput::new(" Search ", "ドラム", &theme);
        assert_eq!(input.visible_text(4), "ラム");
    }
}
