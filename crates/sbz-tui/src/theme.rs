//! Theme and styling for the TUI.
//!
//! # Example
//!
//! ```
//! use sbz_core::TagColor;
//! use sbz_tui::Theme;
//!
//! let theme = Theme::dark();
//! let style = theme.tag_style(TagColor::rgb(255, 0, 0));
//! ```

use ratatui::style::{Color, Modifier, Style};
use sbz_core::{ColorScheme, TagColor};

/// Colors and styles used throughout the interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // =========================================================================
    // Filter Colors
    // =========================================================================
    /// Marker color for tags in the include set.
    pub include_fg: Color,

    /// Marker color for tags in the exclude set.
    pub exclude_fg: Color,

    /// Marker color for tags assigned to the selected sound.
    pub assigned_fg: Color,

    // =========================================================================
    // Tree Colors
    // =========================================================================
    /// Foreground color for directory rows.
    pub directory_fg: Color,

    /// Foreground color for sound rows.
    pub sound_fg: Color,

    // =========================================================================
    // Base Colors
    // =========================================================================
    /// Primary foreground color.
    pub fg: Color,

    /// Dimmed/secondary text color.
    pub dimmed_fg: Color,

    /// Accent color for highlights.
    pub accent: Color,

    /// Error/warning color.
    pub error_fg: Color,

    /// Background of modal overlays.
    pub overlay_bg: Color,

    // =========================================================================
    // Styles
    // =========================================================================
    /// Style for normal borders.
    pub border_style: Style,

    /// Style for focused borders.
    pub focused_border_style: Style,

    /// Style for the selected row.
    pub highlight_style: Style,

    /// Style for panel titles.
    pub header_style: Style,

    /// Style for the status bar.
    pub status_bar_style: Style,
}

impl Theme {
    /// Creates a dark theme (light text on dark background).
    #[must_use]
    pub fn dark() -> Self {
        Self {
            include_fg: Color::Rgb(100, 255, 100),
            exclude_fg: Color::Rgb(255, 100, 100),
            assigned_fg: Color::Rgb(255, 200, 100),

            directory_fg: Color::Rgb(100, 150, 255),
            sound_fg: Color::Rgb(220, 220, 220),

            fg: Color::Rgb(220, 220, 220),
            dimmed_fg: Color::Rgb(128, 128, 128),
            accent: Color::Rgb(100, 150, 255),
            error_fg: Color::Rgb(255, 80, 80),
            overlay_bg: Color::Rgb(30, 30, 40),

            border_style: Style::default().fg(Color::Rgb(80, 80, 100)),
            focused_border_style: Style::default().fg(Color::Rgb(100, 150, 255)),
            highlight_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 80))
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(100, 150, 255))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(180, 180, 180))
                .bg(Color::Rgb(40, 40, 50)),
        }
    }

    /// Creates a light theme (dark text on light background).
    #[must_use]
    pub fn light() -> Self {
        Self {
            include_fg: Color::Rgb(50, 150, 50),
            exclude_fg: Color::Rgb(180, 50, 50),
            assigned_fg: Color::Rgb(180, 130, 50),

            directory_fg: Color::Rgb(50, 100, 200),
            sound_fg: Color::Rgb(30, 30, 30),

            fg: Color::Rgb(30, 30, 30),
            dimmed_fg: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(50, 100, 200),
            error_fg: Color::Rgb(180, 50, 50),
            overlay_bg: Color::Rgb(235, 235, 245),

            border_style: Style::default().fg(Color::Rgb(150, 150, 170)),
            focused_border_style: Style::default().fg(Color::Rgb(50, 100, 200)),
            highlight_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(200, 200, 220))
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(50, 100, 200))
                .add_modifier(Modifier::BOLD),
            status_bar_style: Style::default()
                .fg(Color::Rgb(60, 60, 60))
                .bg(Color::Rgb(220, 220, 230)),
        }
    }

    /// Creates a theme from a [`ColorScheme`]. `Auto` picks the dark theme.
    #[must_use]
    pub fn from_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark | ColorScheme::Auto | _ => Self::dark(),
        }
    }

    /// Returns the terminal color for a tag color. Alpha is ignored.
    #[must_use]
    pub const fn tag_color(color: TagColor) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }

    /// Returns the style of a tag swatch.
    #[must_use]
    pub fn tag_style(&self, color: TagColor) -> Style {
        Style::default().fg(Self::tag_color(color))
    }

    /// Returns a style with the base foreground color.
    #[must_use]
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Returns a style for dimmed/secondary text.
    #[must_use]
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.dimmed_fg)
    }

    /// Returns a style for accent/highlighted text.
    #[must_use]
    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Returns a style for error text.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_fg)
    }

    /// Returns the border style for a panel.
    #[must_use]
    pub const fn border(&self, focused: bool) -> Style {
        if focused {
            self.focused_border_style
        } else {
            self.border_style
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
