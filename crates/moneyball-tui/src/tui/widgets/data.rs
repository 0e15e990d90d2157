// Data widget: the raw rows behind the current ranking, or the whole table.
//
// Identity fields first, then numeric columns in table order. Ranked view:
// rows follow ranking order and show the columns populated for the ranked
// players. All-rows view: every loaded row in file order with every column,
// available even when nothing can be ranked.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use moneyball_core::data::table::PlayerRow;
use moneyball_core::session::Session;

use super::panel_block;
use super::ranking::format_stat;
use crate::protocol::Panel;
use crate::tui::ViewState;

const IDENTITY_HEADERS: [&str; 5] = ["Player", "Team", "Pos", "Nation", "Cluster"];

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let focused = state.focus == Panel::Main;
    let table = session.table();
    let (title, rows, columns): (String, Vec<&PlayerRow>, &[String]) = if state.all_rows {
        (
            format!(
                "Data: all {} rows, {} files",
                table.len(),
                session.loaded_files().len()
            ),
            table.rows().iter().collect(),
            table.columns(),
        )
    } else {
        let ranking = session.ranking();
        (
            format!(
                "Data: {} of {} rows, {} files",
                ranking.len(),
                table.len(),
                session.loaded_files().len()
            ),
            ranking
                .rows
                .iter()
                .filter_map(|ranked| session.row(ranked.index))
                .collect(),
            session.scatter_columns(),
        )
    };
    let block = panel_block(title, focused);

    if rows.is_empty() {
        let paragraph = Paragraph::new("  No rows.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(
        IDENTITY_HEADERS
            .iter()
            .map(|h| Cell::from(*h))
            .chain(columns.iter().map(|c| Cell::from(c.clone()))),
    )
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = rows.into_iter().map(|row| data_row(row, columns)).collect();

    let mut widths = vec![
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    widths.extend(columns.iter().map(|_| Constraint::Length(9)));

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(state.row_cursor));
    frame.render_stateful_widget(widget, area, &mut table_state);
}

fn data_row<'a>(row: &PlayerRow, columns: &[String]) -> Row<'a> {
    let dash = || "--".to_string();
    let mut cells = vec![
        Cell::from(row.player.clone()),
        Cell::from(row.team.clone()),
        Cell::from(row.position.clone()),
        Cell::from(row.nation.clone().unwrap_or_else(dash)),
        Cell::from(row.cluster.clone().unwrap_or_else(dash)),
    ];
    cells.extend(columns.iter().map(|c| Cell::from(format_stat(row.stat(c)))));
    Row::new(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TabId;
    use crate::tui::test_support::{empty_session, profile, session, table};
    use moneyball_core::config::{SchemaKind, WeightsConfig};
    use moneyball_core::data::loader::LoadReport;
    use moneyball_core::data::table::CategoryField;
    use moneyball_core::session::SessionCommand;

    fn rendered_text(session: &Session, state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(140, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), session, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn all_rows() -> ViewState {
        ViewState {
            active_tab: TabId::Data,
            all_rows: true,
            ..ViewState::default()
        }
    }

    #[test]
    fn render_shows_identity_and_stats() {
        let session = session();
        let text = rendered_text(&session, &ViewState::default());
        assert!(text.contains("Data: 5 of 5 rows, 1 files"));
        assert!(text.contains("Nation"));
        assert!(text.contains("Bayern"));
        assert!(text.contains("0.95"));
    }

    #[test]
    fn all_rows_lists_players_outside_the_subset() {
        let mut session = session();
        session.apply(SessionCommand::SelectOnly(CategoryField::Cluster, "2".into()));
        let ranked = rendered_text(&session, &ViewState::default());
        assert!(ranked.contains("Data: 1 of 5 rows"));
        assert!(!ranked.contains("Haaland"));

        let text = rendered_text(&session, &all_rows());
        assert!(text.contains("Data: all 5 rows, 1 files"));
        assert!(text.contains("Haaland"));
        assert!(text.contains("Retegui"));
        assert!(text.contains("Gls"));
    }

    #[test]
    fn all_rows_with_empty_subset() {
        let mut session = session();
        session.apply(SessionCommand::SelectNone(CategoryField::Team));
        assert!(session.ranking().is_empty());
        assert!(rendered_text(&session, &ViewState::default()).contains("No rows."));

        let text = rendered_text(&session, &all_rows());
        assert!(text.contains("Mbappe"));
        assert!(!text.contains("No rows."));
    }

    #[test]
    fn all_rows_on_blocked_session() {
        // A custom schema without positions leaves nothing to rank.
        let mut profile = profile();
        profile.schema = SchemaKind::Custom;
        let report = LoadReport {
            table: table(),
            loaded: vec!["players.csv".into()],
            failures: vec![],
        };
        let session = Session::new(&profile, report, WeightsConfig::default());
        assert!(session.is_blocked());

        let text = rendered_text(&session, &all_rows());
        assert!(text.contains("Dembele"));
        assert!(text.contains("Paris S-G"));
        assert!(text.contains("xAG"));
    }

    #[test]
    fn render_empty_session_does_not_panic() {
        let session = empty_session();
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &session, &ViewState::default()))
            .unwrap();
        assert!(rendered_text(&session, &all_rows()).contains("No rows."));
    }
}
