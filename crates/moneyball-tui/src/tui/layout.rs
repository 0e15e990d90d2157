// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Notices (0 rows when there are none)              |
// +-------------------------+------------------------+
// | Main Panel (70%)         | Sidebar (30%)          |
// |                          | +- Position (3) ------+|
// |                          | +- Weights (50%) -----+|
// |                          | +- Filters (rest) ----+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: title, profile, position, tabs.
    pub status_bar: Rect,
    /// Load warnings and blocking messages; zero height when empty.
    pub notices: Rect,
    /// Left side of the middle section: tab-switched content area.
    pub main_panel: Rect,
    /// Right sidebar top: active position selector.
    pub position: Rect,
    /// Right sidebar middle: weight sliders.
    pub weights: Rect,
    /// Right sidebar bottom: cluster/team/nation selectors.
    pub filters: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
///
/// `notice_rows` is the height of the notices zone, borders included.
pub fn build_layout(area: Rect, notice_rows: u16) -> AppLayout {
    // Vertical: status(1) | notices(n) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(notice_rows),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let notices = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(middle);

    let main_panel = horizontal[0];
    let sidebar = horizontal[1];

    let sidebar_sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(4),
        ])
        .split(sidebar);

    AppLayout {
        status_bar,
        notices,
        main_panel,
        position: sidebar_sections[0],
        weights: sidebar_sections[1],
        filters: sidebar_sections[2],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
