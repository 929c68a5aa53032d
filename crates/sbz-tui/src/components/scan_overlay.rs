//! Scan progress overlay.
//!
//! Shown while a scan runs. Browsing continues underneath on the tree
//! published by the previous scan.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget};
use sbz_scanner::StatsSnapshot;

use crate::theme::Theme;

/// The scan progress overlay widget.
pub struct ScanOverlay<'a> {
    stats: &'a StatsSnapshot,
    theme: &'a Theme,
}

impl<'a> ScanOverlay<'a> {
    /// Creates a new scan overlay.
    #[must_use]
    pub const fn new(stats: &'a StatsSnapshot, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    fn counts(&self) -> String {
        let s = self.stats;
        let mut text = format!(
            "{}/{} directories, {} sounds",
            s.directories_scanned, s.directories_queued, s.files_found
        );
        if s.directories_failed > 0 {
            text.push_str(&format!(", {} failed", s.directories_failed));
        }
        text
    }
}

impl Widget for &ScanOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.focused_border_style)
            .title(Span::styled(
                " Scanning ",
                self.theme.accent_style().add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(self.theme.overlay_bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(self.counts(), self.theme.base_style())))
            .render(chunks[0], buf);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = self.stats.progress_percent().round().clamp(0.0, 100.0) as u16;
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.accent).bg(self.theme.overlay_bg))
            .percent(percent)
            .label(format!("{percent}%"))
            .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let theme = Theme::dark();
        let mut stats = StatsSnapshot {
            directories_queued: 4,
            directories_scanned: 2,
            files_found: 17,
            ..StatsSnapshot::default()
        };
        assert_eq!(
            ScanOverlay::new(&stats, &theme).counts(),
            "2/4 directories, 17 sounds"
        );
        stats.directories_failed = 1;
        assert!(ScanOverlay::new(&stats, &theme).counts().ends_with(", 1 failed"));
    }
}
