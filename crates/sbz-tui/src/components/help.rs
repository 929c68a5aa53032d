//! Help panel component.
//!
//! Displays a modal overlay with the key bindings.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table, Widget};

use crate::theme::Theme;

/// Key binding definition for the help panel.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
    /// Panels where the binding applies.
    scope: &'static str,
}

const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "j / ↓",
        description: "Next item",
        scope: "Any",
    },
    KeyBinding {
        key: "k / ↑",
        description: "Previous item",
        scope: "Any",
    },
    KeyBinding {
        key: "g / G",
        description: "First / last item",
        scope: "Any",
    },
    KeyBinding {
        key: "PgDn / PgUp",
        description: "Page down / up",
        scope: "Any",
    },
    KeyBinding {
        key: "Tab / S-Tab",
        description: "Next / previous panel",
        scope: "Any",
    },
    KeyBinding {
        key: "l / →",
        description: "Expand directory",
        scope: "Tree",
    },
    KeyBinding {
        key: "h / ←",
        description: "Collapse, or go to parent",
        scope: "Tree",
    },
    KeyBinding {
        key: "Enter",
        description: "Toggle directory, open sound",
        scope: "Tree",
    },
    KeyBinding {
        key: "Enter",
        description: "Toggle tag on sound",
        scope: "Tags",
    },
    KeyBinding {
        key: "Enter / d",
        description: "Remove from filter or sound",
        scope: "Lists",
    },
    KeyBinding {
        key: "i / x",
        description: "Include / exclude tag",
        scope: "Tree/Tags",
    },
    KeyBinding {
        key: "R",
        description: "Reset filter",
        scope: "Any",
    },
    KeyBinding {
        key: "a",
        description: "Assign tag to sound",
        scope: "Tree/Tags",
    },
    KeyBinding {
        key: "/",
        description: "Search tags (Esc clears)",
        scope: "Any",
    },
    KeyBinding {
        key: "n / e",
        description: "New / rename tag",
        scope: "Any",
    },
    KeyBinding {
        key: "d",
        description: "Delete unused tag",
        scope: "Tags",
    },
    KeyBinding {
        key: "r",
        description: "Rescan roots",
        scope: "Any",
    },
    KeyBinding {
        key: "o",
        description: "Open with command",
        scope: "Tree",
    },
    KeyBinding {
        key: "?",
        description: "Toggle help",
        scope: "Any",
    },
    KeyBinding {
        key: "q / Ctrl+c",
        description: "Quit",
        scope: "Any",
    },
];

/// A help panel overlay widget.
pub struct HelpPanel<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPanel<'a> {
    /// Creates a new help panel.
    #[must_use]
    pub const fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn build_rows(&self) -> Vec<Row<'static>> {
        KEY_BINDINGS
            .iter()
            .map(|binding| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        binding.key,
                        Style::default()
                            .fg(self.theme.assigned_fg)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(Span::styled(binding.description, self.theme.base_style())),
                    Cell::from(Span::styled(binding.scope, self.theme.dimmed_style())),
                ])
            })
            .collect()
    }
}

impl Widget for &HelpPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                " Help - Key Bindings ",
                self.theme.accent_style().add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(self.theme.overlay_bg));

        let header = Row::new(vec![
            Cell::from(Span::styled("Key", heading)),
            Cell::from(Span::styled("Action", heading)),
            Cell::from(Span::styled("Panel", heading)),
        ])
        .height(1)
        .bottom_margin(1);

        let widths = [
            Constraint::Length(13),
            Constraint::Min(25),
            Constraint::Length(10),
        ];

        Table::new(self.build_rows(), widths)
            .block(block)
            .header(header)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binding_is_described() {
        assert!(
            KEY_BINDINGS
                .iter()
                .all(|b| !b.key.is_empty() && !b.description.is_empty())
        );
        let theme = Theme::dark();
        assert_eq!(HelpPanel::new(&theme).build_rows().len(), KEY_BINDINGS.len());
    }
}
