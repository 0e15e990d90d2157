// Weights widget: one slider per scored statistic of the active position.
//
// Each row shows the column name, a bar for the weight within the slider
// range, and the numeric weight. Zero weights are dimmed since they drop
// the column from scoring and the radar.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use moneyball_core::scoring::WeightSlider;
use moneyball_core::session::Session;

use super::panel_block;
use crate::protocol::Panel;
use crate::tui::ViewState;

/// Cells in the slider bar.
const BAR_WIDTH: usize = 10;

/// Width reserved for the column name.
const NAME_WIDTH: usize = 14;

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let focused = state.focus == Panel::Weights;
    let slider = session.slider();
    let block = panel_block(
        format!("Weights {:.0}..{:.0}", slider.min, slider.max),
        focused,
    );

    let columns = session.weight_columns();
    if columns.is_empty() {
        let paragraph = Paragraph::new("  No weights.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = columns
        .iter()
        .map(|column| {
            let weight = session.weights().get(column).unwrap_or(0.0);
            weight_item(column, weight, slider)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">");

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(state.weight_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn weight_item(column: &str, weight: f64, slider: &WeightSlider) -> ListItem<'static> {
    let color = if weight == 0.0 {
        Color::DarkGray
    } else {
        Color::White
    };
    let name: String = column.chars().take(NAME_WIDTH).collect();
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<width$} ", name, width = NAME_WIDTH),
            Style::default().fg(color),
        ),
        Span::styled(slider_bar(slider.fraction(weight)), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" {:>4.1}", weight),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]))
}

/// Filled/empty block bar for a fraction in [0, 1].
pub fn slider_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
