// TUI dashboard: layout, input handling, and widget rendering.
//
// The session is owned by the TUI loop. Key presses become `UserCommand`s;
// session commands are applied synchronously and the next render tick
// (~30 fps) draws the recomputed state.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use moneyball_core::data::table::CategoryField;
use moneyball_core::session::Session;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{info, warn};

use crate::protocol::{Panel, TabId, UserCommand};
use layout::{build_layout, AppLayout};

/// Selector order in the filters panel; each narrows the next one's options.
pub const FILTER_FIELDS: [CategoryField; 3] = [
    CategoryField::Cluster,
    CategoryField::Team,
    CategoryField::Nation,
];

/// Most notice lines shown at once.
const MAX_NOTICE_LINES: usize = 3;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: what is shown and where the cursors are.
///
/// Everything the dashboard computes lives in the `Session`; this only holds
/// presentation choices, so it can be rebuilt at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Panel receiving cursor and adjustment keys.
    pub focus: Panel,
    /// Selected row of the main panel list, see `row_count`.
    pub row_cursor: usize,
    /// Data tab lists every loaded row instead of the ranked ones.
    pub all_rows: bool,
    /// Selected weight slider.
    pub weight_cursor: usize,
    /// Selector shown in the filters panel.
    pub filter_field: CategoryField,
    /// Selected option of `filter_field`.
    pub filter_cursor: usize,
    /// Whether the quit confirmation dialog is shown.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_tab: TabId::Ranking,
            focus: Panel::Main,
            row_cursor: 0,
            all_rows: false,
            weight_cursor: 0,
            filter_field: FILTER_FIELDS[0],
            filter_cursor: 0,
            confirm_quit: false,
        }
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

impl ViewState {
    /// Keep every cursor inside the list it indexes.
    pub fn clamp_to(&mut self, session: &Session) {
        self.row_cursor = clamp_cursor(self.row_cursor, self.row_count(session));
        self.weight_cursor = clamp_cursor(self.weight_cursor, session.weight_columns().len());
        self.filter_cursor = clamp_cursor(
            self.filter_cursor,
            session.options().get(self.filter_field).len(),
        );
    }

    /// Whether `row_cursor` walks the whole table rather than the ranking.
    pub fn shows_all_rows(&self) -> bool {
        self.all_rows && self.active_tab == TabId::Data
    }

    /// Length of the list `row_cursor` indexes.
    pub fn row_count(&self, session: &Session) -> usize {
        if self.shows_all_rows() {
            session.table().len()
        } else {
            session.ranking().len()
        }
    }

    /// Ranked player under the row cursor. None while the cursor walks the
    /// whole table.
    pub fn selected_player<'a>(&self, session: &'a Session) -> Option<&'a str> {
        if self.shows_all_rows() {
            return None;
        }
        session
            .ranking()
            .rows
            .get(self.row_cursor)
            .map(|r| r.player.as_str())
    }

    pub fn selected_weight<'a>(&self, session: &'a Session) -> Option<&'a str> {
        session
            .weight_columns()
            .get(self.weight_cursor)
            .map(String::as_str)
    }

    pub fn selected_option<'a>(&self, session: &'a Session) -> Option<&'a str> {
        session
            .options()
            .get(self.filter_field)
            .get(self.filter_cursor)
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Rows the notices zone needs, borders included; 0 hides it.
pub fn notice_height(session: &Session) -> u16 {
    match session.notices().len().min(MAX_NOTICE_LINES) {
        0 => 0,
        n => n as u16 + 2,
    }
}

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, session: &Session, view: &ViewState) {
    let layout = build_layout(frame.area(), notice_height(session));

    widgets::status_bar::render(frame, layout.status_bar, session, view);
    if layout.notices.height > 0 {
        widgets::notices::render(frame, layout.notices, session);
    }
    render_main_panel(frame, &layout, session, view);
    widgets::position::render(frame, layout.position, session);
    widgets::weights::render(frame, layout.weights, session, view);
    widgets::filters::render(frame, layout.filters, session, view);
    render_help_bar(frame, &layout, view);

    if view.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, session: &Session, view: &ViewState) {
    let area = layout.main_panel;
    match view.active_tab {
        TabId::Ranking => widgets::ranking::render(frame, area, session, view),
        TabId::Radar => widgets::radar::render(frame, area, session, view),
        TabId::Scatter => widgets::scatter::render(frame, area, session, view),
        TabId::Data => widgets::data::render(frame, area, session, view),
    }
}

/// Key hints for the focused panel.
pub fn help_text(view: &ViewState) -> &'static str {
    match view.focus {
        Panel::Main => match view.active_tab {
            TabId::Scatter => " q:Quit | 1-4:Tabs | Tab:Focus | p/P:Position | j/k:Player | x/X y/Y:Axes",
            TabId::Data if view.all_rows => " q:Quit | 1-4:Tabs | Tab:Focus | p/P:Position | j/k:Move | v:Ranked rows",
            TabId::Data => " q:Quit | 1-4:Tabs | Tab:Focus | p/P:Position | j/k:Move | Space:Radar | v:All rows",
            _ => " q:Quit | 1-4:Tabs | Tab:Focus | p/P:Position | j/k:Move | Space:Radar | c:Clear radar",
        },
        Panel::Weights => " q:Quit | Tab:Focus | j/k:Column | h/l:-/+ step | H/L:-/+ 1.0 | 0:Zero | R:Reset",
        Panel::Filters => " q:Quit | Tab:Focus | h/l:Selector | j/k:Move | Space:Toggle | o:Only | a:All | n:None",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, view: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(view),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Apply a command to the session. Returns false when the loop should stop.
pub fn dispatch(command: UserCommand, session: &mut Session, view: &mut ViewState) -> bool {
    match command {
        UserCommand::Quit => false,
        UserCommand::Session(cmd) => {
            session.apply(cmd);
            view.clamp_to(session);
            true
        }
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits.
///
/// Initializes the terminal, installs a panic hook that restores it, then
/// selects over keyboard input and a render tick.
pub async fn run(mut session: Session) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    view_state.clamp_to(&session);

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(command) = input::handle_key(key_event, &mut view_state, &session) {
                            if !dispatch(command, &mut session, &mut view_state) {
                                info!("Quit requested");
                                break;
                            }
                        }
                        view_state.clamp_to(&session);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &session, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_support {
    use moneyball_core::config::{ColumnsConfig, ProfileConfig, SchemaKind, WeightsConfig};
    use moneyball_core::data::loader::LoadReport;
    use moneyball_core::data::table::{PlayerRow, PlayerTable};
    use moneyball_core::session::Session;

    pub fn profile() -> ProfileConfig {
        ProfileConfig {
            name: "test".into(),
            title: "Test League".into(),
            base_url: "data".into(),
            files: vec!["players.csv".into()],
            columns: ColumnsConfig {
                player: "Player".into(),
                team: "Squad".into(),
                position: "Position".into(),
                nation: Some("Nation".into()),
                cluster: Some("Cluster".into()),
            },
            schema: SchemaKind::Derived,
            positions: vec![],
        }
    }

    pub fn table() -> PlayerTable {
        let rows = [
            ("Haaland", "Man City", "NOR", "0", 0.79, 0.12, 0.82),
            ("Kane", "Bayern", "ENG", "0", 0.88, 0.25, 0.95),
            ("Mbappe", "Real Madrid", "FRA", "1", 0.70, 0.21, 0.76),
            ("Retegui", "Atalanta", "ITA", "1", 0.55, 0.10, 0.74),
            ("Dembele", "Paris S-G", "FRA", "2", 0.52, 0.30, 0.71),
        ]
        .into_iter()
        .map(|(name, squad, nation, cluster, xg, xag, gls)| {
            PlayerRow::new(name, squad, "FW")
                .with_nation(nation)
                .with_cluster(cluster)
                .with_stat("xG", xg)
                .with_stat("xAG", xag)
                .with_stat("Gls", gls)
        })
        .collect();
        PlayerTable::from_rows(vec!["xG".into(), "xAG".into(), "Gls".into()], rows)
    }

    pub fn session() -> Session {
        let report = LoadReport {
            table: table(),
            loaded: vec!["players.csv".into()],
            failures: vec![],
        };
        Session::new(&profile(), report, WeightsConfig::default())
    }

    pub fn empty_session() -> Session {
        Session::new(&profile(), LoadReport::default(), WeightsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{empty_session, session};
    use super::*;
    use moneyball_core::session::SessionCommand;

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.active_tab, TabId::Ranking);
        assert_eq!(state.focus, Panel::Main);
        assert_eq!(state.row_cursor, 0);
        assert!(!state.all_rows);
        assert_eq!(state.weight_cursor, 0);
        assert_eq!(state.filter_field, CategoryField::Cluster);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn clamp_keeps_cursors_in_range() {
        let session = session();
        let mut state = ViewState {
            row_cursor: 40,
            weight_cursor: 9,
            filter_cursor: 7,
            ..ViewState::default()
        };
        state.clamp_to(&session);
        assert_eq!(state.row_cursor, 4);
        assert_eq!(state.weight_cursor, 2);
        assert_eq!(state.filter_cursor, 2);
    }

    #[test]
    fn clamp_on_empty_session_is_zero() {
        let session = empty_session();
        let mut state = ViewState {
            row_cursor: 3,
            ..ViewState::default()
        };
        state.clamp_to(&session);
        assert_eq!(state.row_cursor, 0);
        assert!(state.selected_player(&session).is_none());
        assert!(state.selected_weight(&session).is_none());
    }

    #[test]
    fn all_rows_cursor_walks_the_table() {
        let mut session = session();
        session.apply(SessionCommand::SelectOnly(CategoryField::Cluster, "2".into()));
        assert_eq!(session.ranking().len(), 1);

        let mut state = ViewState {
            active_tab: TabId::Data,
            all_rows: true,
            row_cursor: 9,
            ..ViewState::default()
        };
        assert!(state.shows_all_rows());
        state.clamp_to(&session);
        assert_eq!(state.row_cursor, 4);
        assert!(state.selected_player(&session).is_none());

        // Other tabs keep indexing the ranking.
        state.active_tab = TabId::Ranking;
        assert_eq!(state.row_count(&session), 1);
        state.clamp_to(&session);
        assert_eq!(state.row_cursor, 0);
        assert_eq!(state.selected_player(&session), Some("Dembele"));
    }

    #[test]
    fn selections_follow_cursors() {
        let session = session();
        let state = ViewState {
            row_cursor: 0,
            weight_cursor: 1,
            filter_field: CategoryField::Nation,
            filter_cursor: 1,
            ..ViewState::default()
        };
        assert_eq!(state.selected_player(&session), Some("Kane"));
        assert_eq!(state.selected_weight(&session), Some("xAG"));
        assert_eq!(state.selected_option(&session), Some("FRA"));
    }

    #[test]
    fn dispatch_applies_and_quits() {
        let mut session = session();
        let mut state = ViewState {
            row_cursor: 4,
            ..ViewState::default()
        };
        let keep_going = dispatch(
            UserCommand::Session(SessionCommand::SelectOnly(
                CategoryField::Cluster,
                "1".into(),
            )),
            &mut session,
            &mut state,
        );
        assert!(keep_going);
        assert_eq!(session.ranking().len(), 2);
        assert_eq!(state.row_cursor, 1);
        assert!(!dispatch(UserCommand::Quit, &mut session, &mut state));
    }

    #[test]
    fn notice_height_tracks_notices() {
        assert_eq!(notice_height(&session()), 0);
        // Blocking notice for the empty load.
        assert_eq!(notice_height(&empty_session()), 3);
    }

    #[test]
    fn help_text_depends_on_focus() {
        let mut state = ViewState::default();
        assert!(help_text(&state).contains("Space:Radar"));
        state.active_tab = TabId::Scatter;
        assert!(help_text(&state).contains("j/k:Player"));
        state.active_tab = TabId::Data;
        assert!(help_text(&state).contains("v:All rows"));
        state.all_rows = true;
        assert!(help_text(&state).contains("v:Ranked rows"));
        state.focus = Panel::Weights;
        assert!(help_text(&state).contains("R:Reset"));
        state.focus = Panel::Filters;
        assert!(help_text(&state).contains("o:Only"));
    }

    #[test]
    fn render_frame_does_not_panic() {
        let session = session();
        for tab in TabId::ALL {
            let backend = ratatui::backend::TestBackend::new(140, 40);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            let state = ViewState {
                active_tab: tab,
                ..ViewState::default()
            };
            terminal
                .draw(|frame| render_frame(frame, &session, &state))
                .unwrap();
        }
    }

    #[test]
    fn render_frame_blocked_session_with_quit_dialog() {
        let session = empty_session();
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            confirm_quit: true,
            ..ViewState::default()
        };
        terminal
            .draw(|frame| render_frame(frame, &session, &state))
            .unwrap();
    }
}
