// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the session,
// or into local ViewState mutations (tab switching, focus, cursors).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use moneyball_core::session::{Session, SessionCommand};

use super::{ViewState, FILTER_FIELDS};
use crate::protocol::{Panel, TabId, UserCommand};

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Slider steps moved by H/L.
const COARSE_STEPS: i32 = 10;

fn session_cmd(cmd: SessionCommand) -> Option<UserCommand> {
    Some(UserCommand::Session(cmd))
}

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should change the session
/// or stop the loop. Returns `None` when it was handled locally by mutating
/// `ViewState`.
pub fn handle_key(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    session: &Session,
) -> Option<UserCommand> {
    // crossterm reports Release/Repeat events on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Keys that work regardless of focus.
    match key_event.code {
        KeyCode::Char('1') => return switch_tab(view_state, session, TabId::Ranking),
        KeyCode::Char('2') => return switch_tab(view_state, session, TabId::Radar),
        KeyCode::Char('3') => return switch_tab(view_state, session, TabId::Scatter),
        KeyCode::Char('4') => return switch_tab(view_state, session, TabId::Data),
        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            return None;
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.previous();
            return None;
        }
        KeyCode::Char('p') => {
            reset_cursors(view_state);
            return session_cmd(SessionCommand::NextPosition);
        }
        KeyCode::Char('P') => {
            reset_cursors(view_state);
            return session_cmd(SessionCommand::PreviousPosition);
        }
        KeyCode::Char('R') => return session_cmd(SessionCommand::ResetWeights),
        KeyCode::Char('x') => return session_cmd(SessionCommand::CycleScatterX { forward: true }),
        KeyCode::Char('X') => return session_cmd(SessionCommand::CycleScatterX { forward: false }),
        KeyCode::Char('y') => return session_cmd(SessionCommand::CycleScatterY { forward: true }),
        KeyCode::Char('Y') => return session_cmd(SessionCommand::CycleScatterY { forward: false }),
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            return None;
        }
        _ => {}
    }

    match view_state.focus {
        Panel::Main => handle_main(key_event, view_state, session),
        Panel::Weights => handle_weights(key_event, view_state, session),
        Panel::Filters => handle_filters(key_event, view_state, session),
    }
}

fn switch_tab(view_state: &mut ViewState, session: &Session, tab: TabId) -> Option<UserCommand> {
    view_state.active_tab = tab;
    view_state.clamp_to(session);
    None
}

/// A new position has a new row set, column set and option lists.
fn reset_cursors(view_state: &mut ViewState) {
    view_state.row_cursor = 0;
    view_state.weight_cursor = 0;
    view_state.filter_cursor = 0;
}

/// Handle key events while the quit dialog is shown: `y`/`q` confirm,
/// `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn move_cursor(cursor: &mut usize, delta: isize, len: usize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

/// Shared j/k/arrows/PageUp/PageDown handling. Returns true if consumed.
fn handle_vertical(code: KeyCode, cursor: &mut usize, len: usize) -> bool {
    let delta = match code {
        KeyCode::Up | KeyCode::Char('k') => -1,
        KeyCode::Down | KeyCode::Char('j') => 1,
        KeyCode::PageUp => -(PAGE_SIZE as isize),
        KeyCode::PageDown => PAGE_SIZE as isize,
        KeyCode::Home | KeyCode::Char('g') => -(len as isize),
        KeyCode::End | KeyCode::Char('G') => len as isize,
        _ => return false,
    };
    move_cursor(cursor, delta, len);
    true
}

fn handle_main(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    session: &Session,
) -> Option<UserCommand> {
    let len = view_state.row_count(session);
    if handle_vertical(key_event.code, &mut view_state.row_cursor, len) {
        return None;
    }
    match key_event.code {
        KeyCode::Char('v') if view_state.active_tab == TabId::Data => {
            view_state.all_rows = !view_state.all_rows;
            view_state.row_cursor = 0;
            None
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let player = view_state.selected_player(session)?;
            session_cmd(SessionCommand::ToggleRadarPlayer(player.to_string()))
        }
        KeyCode::Char('c') => session_cmd(SessionCommand::ClearRadar),
        _ => None,
    }
}

fn handle_weights(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    session: &Session,
) -> Option<UserCommand> {
    let len = session.weight_columns().len();
    if handle_vertical(key_event.code, &mut view_state.weight_cursor, len) {
        return None;
    }
    let steps = match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => -1,
        KeyCode::Right | KeyCode::Char('l') => 1,
        KeyCode::Char('H') => -COARSE_STEPS,
        KeyCode::Char('L') => COARSE_STEPS,
        KeyCode::Char('0') => {
            let column = view_state.selected_weight(session)?;
            return session_cmd(SessionCommand::SetWeight {
                column: column.to_string(),
                weight: 0.0,
            });
        }
        _ => return None,
    };
    let column = view_state.selected_weight(session)?;
    session_cmd(SessionCommand::AdjustWeight {
        column: column.to_string(),
        steps,
    })
}

fn cycle_filter_field(view_state: &mut ViewState, forward: bool) {
    let len = FILTER_FIELDS.len();
    let current = FILTER_FIELDS
        .iter()
        .position(|f| *f == view_state.filter_field)
        .unwrap_or(0);
    let next = if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    };
    view_state.filter_field = FILTER_FIELDS[next];
    view_state.filter_cursor = 0;
}

fn handle_filters(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    session: &Session,
) -> Option<UserCommand> {
    let field = view_state.filter_field;
    let len = session.options().get(field).len();
    if handle_vertical(key_event.code, &mut view_state.filter_cursor, len) {
        return None;
    }
    match key_event.code {
        KeyCode::Left | KeyCode::Char('h') => {
            cycle_filter_field(view_state, false);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            cycle_filter_field(view_state, true);
            None
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let value = view_state.selected_option(session)?;
            session_cmd(SessionCommand::ToggleFilter(field, value.to_string()))
        }
        KeyCode::Char('o') => {
            let value = view_state.selected_option(session)?;
            session_cmd(SessionCommand::SelectOnly(field, value.to_string()))
        }
        KeyCode::Char('a') => session_cmd(SessionCommand::SelectAll(field)),
        KeyCode::Char('n') => session_cmd(SessionCommand::SelectNone(field)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
