// Filters widget: cluster, team and nation selectors.
//
// One selector is shown at a time; h/l switch between them. Options cascade,
// so the team list only holds teams of the selected clusters and so on.

use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use moneyball_core::data::table::CategoryField;
use moneyball_core::ranking::Filters;
use moneyball_core::session::Session;

use super::panel_block;
use crate::protocol::Panel;
use crate::tui::{ViewState, FILTER_FIELDS};

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let focused = state.focus == Panel::Filters;
    let block = panel_block("Filters", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [selector_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    frame.render_widget(
        Paragraph::new(selector_line(state.filter_field, session.filters())),
        selector_area,
    );

    let field = state.filter_field;
    let options = session.options().get(field);
    if options.is_empty() {
        frame.render_widget(
            Paragraph::new("  No values.").style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return;
    }

    let filters = session.filters();
    let items: Vec<ListItem> = options
        .iter()
        .map(|value| option_item(value, filters.is_selected(field, value)))
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">");
    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.filter_cursor));
    }
    frame.render_stateful_widget(list, list_area, &mut list_state);

    let visible = list_area.height as usize;
    if options.len() > visible {
        let mut scrollbar_state = ScrollbarState::new(options.len().saturating_sub(visible))
            .position(state.filter_cursor);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// "Clusters* | Teams | Nations" with the shown selector highlighted and a
/// '*' on every restricted field.
pub fn selector_line(active: CategoryField, filters: &Filters) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, field) in FILTER_FIELDS.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        let restricted = if filters.get(field).is_some() { "*" } else { "" };
        let style = if field == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("{}{}", field.label(), restricted), style));
    }
    Line::from(spans)
}

fn option_item(value: &str, selected: bool) -> ListItem<'static> {
    let (check, color) = if selected {
        ("[x] ", Color::Green)
    } else {
        ("[ ] ", Color::DarkGray)
    };
    ListItem::new(Line::from(vec![
        Span::styled(check, Style::default().fg(color)),
        Span::raw(value.to_string()),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{empty_session, session};
    use moneyball_core::session::SessionCommand;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn selector_line_marks_restricted_fields() {
        let mut filters = Filters::all();
        assert_eq!(
            line_text(&selector_line(CategoryField::Cluster, &filters)),
            "Clusters | Teams | Nations"
        );
        filters.select_none(CategoryField::Nation);
        let line = selector_line(CategoryField::Team, &filters);
        assert_eq!(line_text(&line), "Clusters | Teams | Nations*");
        assert!(line.spans[2].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn render_shows_checkboxes() {
        let mut session = session();
        session.apply(SessionCommand::SelectOnly(CategoryField::Cluster, "2".into()));
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState {
            focus: Panel::Filters,
            ..ViewState::default()
        };
        terminal
            .draw(|frame| render(frame, frame.area(), &session, &state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("[ ] 0"));
        assert!(text.contains("[x] 2"));
    }

    #[test]
    fn render_empty_session_does_not_panic() {
        let session = empty_session();
        let backend = ratatui::backend::TestBackend::new(30, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &session, &ViewState::default()))
            .unwrap();
    }
}
