// TUI widget modules for each dashboard panel.

pub mod data;
pub mod filters;
pub mod notices;
pub mod position;
pub mod quit_confirm;
pub mod radar;
pub mod ranking;
pub mod scatter;
pub mod status_bar;
pub mod weights;

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

/// Colors cycled through for radar players and scatter clusters.
pub const SERIES_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::LightYellow,
    Color::LightMagenta,
];

/// Color for the `i`-th series.
pub fn series_color(i: usize) -> Color {
    SERIES_COLORS[i % SERIES_COLORS.len()]
}

/// Cyan border when the panel has keyboard focus, `base` otherwise.
pub fn focused_border_style(focused: bool, base: Style) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        base
    }
}

/// Bordered block with a title, highlighted when focused.
pub fn panel_block(title: impl Into<String>, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(focused_border_style(focused, Style::default()))
        .title(title.into())
}
