// Notices widget: load warnings and blocking messages.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use moneyball_core::session::{NoticeLevel, Session};

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let notices = session.notices();
    let border = if session.is_blocked() {
        Color::Red
    } else {
        Color::Yellow
    };

    let lines: Vec<Line> = notices
        .iter()
        .map(|notice| {
            let color = level_color(notice.level);
            Line::from(vec![
                Span::styled(
                    format!("{} ", level_tag(notice.level)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(notice.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!("Notices ({})", notices.len())),
    );
    frame.render_widget(paragraph, area);
}

pub fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Blocking => Color::Red,
    }
}

fn level_tag(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Warning => "!",
        NoticeLevel::Blocking => "x",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::empty_session;

    #[test]
    fn level_colors() {
        assert_eq!(level_color(NoticeLevel::Warning), Color::Yellow);
        assert_eq!(level_color(NoticeLevel::Blocking), Color::Red);
    }

    #[test]
    fn render_blocking_notice_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 4);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let session = empty_session();
        terminal
            .draw(|frame| render(frame, frame.area(), &session))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("No player data"));
    }
}
