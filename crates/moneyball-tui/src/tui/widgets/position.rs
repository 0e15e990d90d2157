// Position selector widget: active category with its neighbours.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use moneyball_core::session::Session;

/// Render "< prev [ACTIVE] next >" for the position categories.
pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Position ({})", session.registry().len()));

    let line = match session.position_name() {
        Some(_) => selector_line(session),
        None => Line::from(Span::styled(
            "  none",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn selector_line(session: &Session) -> Line<'static> {
    let names = session.registry().names();
    let index = session.position_index();
    let count = names.len();
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled("p/P ", dim)];
    if count > 1 {
        let prev = names[(index + count - 1) % count];
        spans.push(Span::styled(format!("< {} ", prev), dim));
    }
    spans.push(Span::styled(
        format!("[{}]", names[index]),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));
    if count > 2 {
        let next = names[(index + 1) % count];
        spans.push(Span::styled(format!(" {} >", next), dim));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{empty_session, session};

    #[test]
    fn single_position_shows_only_active() {
        let line = selector_line(&session());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "p/P [FW]");
    }

    #[test]
    fn render_does_not_panic() {
        for session in [session(), empty_session()] {
            let backend = ratatui::backend::TestBackend::new(40, 3);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| render(frame, frame.area(), &session))
                .unwrap();
        }
    }
}
