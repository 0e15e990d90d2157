// Ranking widget: scored table of the filtered position subset.
//
// Columns: Rank, Player, Team, Score (0-100), then one per scored statistic.
// Players on the radar are marked with '*'. The cursor row is highlighted
// and kept in view through TableState.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use moneyball_core::ranking::RankedRow;
use moneyball_core::session::Session;

use super::panel_block;
use crate::protocol::Panel;
use crate::tui::ViewState;

/// Width of each statistic column.
const STAT_WIDTH: u16 = 9;

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let ranking = session.ranking();
    let focused = state.focus == Panel::Main;
    let block = panel_block(build_title(session), focused);

    if ranking.is_empty() {
        let paragraph = Paragraph::new(empty_message(session))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut header_cells = vec![
        Cell::from("#"),
        Cell::from("Player"),
        Cell::from("Team"),
        Cell::from("Score"),
    ];
    header_cells.extend(ranking.columns.iter().map(|c| Cell::from(truncate(c, STAT_WIDTH))));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let radar = session.radar_players();
    let rows: Vec<Row> = ranking
        .rows
        .iter()
        .map(|ranked| {
            let on_radar = radar.iter().any(|p| p == &ranked.player);
            ranked_row(session, ranked, &ranking.columns, on_radar)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(6),
    ];
    widths.extend(ranking.columns.iter().map(|_| Constraint::Length(STAT_WIDTH)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(state.row_cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn ranked_row<'a>(
    session: &Session,
    ranked: &RankedRow,
    columns: &[String],
    on_radar: bool,
) -> Row<'a> {
    let marker = if on_radar { "*" } else { " " };
    let mut cells = vec![
        Cell::from(format!("{}{}", marker, ranked.rank)),
        Cell::from(ranked.player.clone()),
        Cell::from(ranked.team.clone()),
        Cell::from(format!("{:.1}", ranked.score.normalized))
            .style(Style::default().fg(score_color(ranked.score.normalized))),
    ];
    let row = session.row(ranked.index);
    cells.extend(columns.iter().map(|column| {
        let value = row.and_then(|r| r.stat(column));
        Cell::from(format_stat(value))
    }));

    let style = if on_radar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Row::new(cells).style(style)
}

/// Score color bands: green for the top quarter, red for the bottom.
pub fn score_color(score: f64) -> Color {
    if score >= 75.0 {
        Color::Green
    } else if score >= 50.0 {
        Color::White
    } else if score >= 25.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "--".to_string(),
    }
}

fn truncate(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}

fn build_title(session: &Session) -> String {
    let ranking = session.ranking();
    let mut title = match session.position_name() {
        Some(name) => format!("Ranking: {}", name),
        None => "Ranking".to_string(),
    };
    if !session.filters().is_unrestricted() {
        title.push_str(" [filtered]");
    }
    title.push_str(&format!(" ({})", ranking.len()));
    title
}

fn empty_message(session: &Session) -> &'static str {
    if session.is_blocked() {
        "  Nothing to rank."
    } else if session.weight_columns().is_empty() {
        "  No statistic of this position is in the data."
    } else {
        "  No player matches the current filters."
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{empty_session, session};
    use moneyball_core::data::table::CategoryField;
    use moneyball_core::session::SessionCommand;

    fn render_to_text(session: &Session, state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(120, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), session, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn score_color_bands() {
        assert_eq!(score_color(100.0), Color::Green);
        assert_eq!(score_color(60.0), Color::White);
        assert_eq!(score_color(30.0), Color::Yellow);
        assert_eq!(score_color(0.0), Color::Red);
    }

    #[test]
    fn format_stat_handles_missing() {
        assert_eq!(format_stat(Some(0.5)), "0.50");
        assert_eq!(format_stat(None), "--");
    }

    #[test]
    fn title_reports_filter_and_count() {
        let mut session = session();
        assert_eq!(build_title(&session), "Ranking: FW (5)");
        session.apply(SessionCommand::SelectOnly(CategoryField::Cluster, "0".into()));
        assert_eq!(build_title(&session), "Ranking: FW [filtered] (2)");
    }

    #[test]
    fn render_lists_players_and_columns() {
        let session = session();
        let text = render_to_text(&session, &ViewState::default());
        assert!(text.contains("Kane"));
        assert!(text.contains("xAG"));
        assert!(text.contains("100.0"));
    }

    #[test]
    fn render_marks_radar_players() {
        let mut session = session();
        session.apply(SessionCommand::ToggleRadarPlayer("Kane".into()));
        let text = render_to_text(&session, &ViewState::default());
        assert!(text.contains("*1"));
    }

    #[test]
    fn render_empty_filter_result() {
        let mut session = session();
        session.apply(SessionCommand::SelectNone(CategoryField::Team));
        let text = render_to_text(&session, &ViewState::default());
        assert!(text.contains("No player matches"));
    }

    #[test]
    fn render_blocked_session_does_not_panic() {
        let text = render_to_text(&empty_session(), &ViewState::default());
        assert!(text.contains("Nothing to rank"));
    }
}
