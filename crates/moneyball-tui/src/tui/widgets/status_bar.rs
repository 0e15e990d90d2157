// Status bar widget: dashboard title, profile, position, tab indicator.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use moneyball_core::session::Session;

use crate::protocol::TabId;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [profile] | [position] [players] | [tab bar] | [loaded at]
pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", session.title()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("({})", session.profile_name()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
    ];

    spans.push(Span::styled(
        position_summary(session),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));

    spans.extend(tab_spans(state.active_tab));

    spans.push(Span::styled(
        format!("| {}", loaded_label(session.loaded_at())),
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "Defenders 4/120" style summary of the active position.
pub fn position_summary(session: &Session) -> String {
    match session.position_name() {
        Some(name) => format!(
            "{} {}/{}",
            name,
            session.ranking().len(),
            session.table().len()
        ),
        None => "no position".to_string(),
    }
}

/// When the data was fetched, to the second.
pub fn loaded_label(at: DateTime<Local>) -> String {
    format!("loaded {}", at.format("%Y-%m-%d %H:%M:%S"))
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Ranking] [2:Radar] [3:Scatter] [4:Data]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab_id) in TabId::ALL.into_iter().enumerate() {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", i + 1, tab_label(tab_id)),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::Ranking => "Ranking",
        TabId::Radar => "Radar",
        TabId::Scatter => "Scatter",
        TabId::Data => "Data",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
