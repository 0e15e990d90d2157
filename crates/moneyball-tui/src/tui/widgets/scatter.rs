// Scatter widget: two statistics of the ranked players, colored by cluster.
//
// The player under the main row cursor is marked on the chart and named in a
// caption line below it.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

use moneyball_core::scatter::{ScatterPlot, ScatterPoint};
use moneyball_core::session::Session;

use super::{panel_block, series_color};
use crate::protocol::Panel;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let focused = state.focus == Panel::Main;
    let Some(plot) = session.scatter() else {
        let paragraph = Paragraph::new("  Nothing to plot for the current selection.")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel_block("Scatter", focused));
        frame.render_widget(paragraph, area);
        return;
    };

    let points = series_points(&plot);
    let selected = state
        .selected_player(session)
        .and_then(|player| plot.find(player));
    let marked = selected.map(|(_, p)| [(p.x, p.y)]);

    let mut datasets: Vec<Dataset> = plot
        .series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(format!("cluster {} ({})", series.cluster, series.points.len()))
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(series_color(i)))
                .data(data)
        })
        .collect();
    if let (Some((_, point)), Some(data)) = (selected, marked.as_ref()) {
        datasets.push(
            Dataset::default()
                .name(point.player.clone())
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
                .data(data),
        );
    }

    let [chart_area, caption_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let title = format!(
        "Scatter: {} vs {} ({} players)",
        plot.y_column,
        plot.x_column,
        plot.point_count()
    );
    let chart = Chart::new(datasets)
        .block(panel_block(title, focused))
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .title(Span::styled(plot.x_column.clone(), Style::default().fg(Color::Gray)))
                .bounds(plot.x_bounds)
                .labels(axis_labels(plot.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(plot.y_column.clone(), Style::default().fg(Color::Gray)))
                .bounds(plot.y_bounds)
                .labels(axis_labels(plot.y_bounds)),
        );
    frame.render_widget(chart, chart_area);

    let caption = match selected {
        Some((cluster, point)) => Line::from(vec![
            Span::styled(
                format!(" {} ", point.player),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                point_caption(&plot, cluster, point),
                Style::default().fg(Color::Gray),
            ),
        ]),
        None => Line::from(Span::styled(
            " j/k: pick a ranked player to mark",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(caption), caption_area);
}

/// "(Bayern, ENG, cluster 0)  xG 0.88  xAG 0.25" for a plotted point.
pub fn point_caption(plot: &ScatterPlot, cluster: &str, point: &ScatterPoint) -> String {
    format!(
        "({}, {}, cluster {})  {} {:.2}  {} {:.2}",
        point.team,
        point.nation.as_deref().unwrap_or("--"),
        cluster,
        plot.x_column,
        point.x,
        plot.y_column,
        point.y
    )
}

/// (x, y) pairs per series, in series order.
pub fn series_points(plot: &ScatterPlot) -> Vec<Vec<(f64, f64)>> {
    plot.series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.x, p.y)).collect())
        .collect()
}

/// Low, middle and high tick labels for an axis.
pub fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{empty_session, session};
    use moneyball_core::data::table::CategoryField;
    use moneyball_core::session::SessionCommand;

    #[test]
    fn axis_labels_span_bounds() {
        assert_eq!(axis_labels([0.0, 1.0]), vec!["0.00", "0.50", "1.00"]);
    }

    #[test]
    fn series_points_follow_clusters() {
        let session = session();
        let plot = session.scatter().unwrap();
        let points = series_points(&plot);
        assert_eq!(points.len(), 3);
        assert_eq!(points.iter().map(Vec::len).sum::<usize>(), 5);
    }

    #[test]
    fn point_caption_names_team_nation_and_values() {
        let session = session();
        let plot = session.scatter().unwrap();
        let (cluster, point) = plot.find("Kane").unwrap();
        assert_eq!(
            point_caption(&plot, cluster, point),
            "(Bayern, ENG, cluster 0)  xG 0.88  xAG 0.25"
        );
    }

    fn rendered_text(session: &Session, state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(140, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), session, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn render_names_the_player_under_the_cursor() {
        let session = session();
        let text = rendered_text(&session, &ViewState::default());
        assert!(text.contains("Kane"));
        assert!(text.contains("Bayern"));
        assert!(text.contains("ENG"));

        // Second ranked row.
        let state = ViewState {
            row_cursor: 1,
            ..ViewState::default()
        };
        let text = rendered_text(&session, &state);
        assert!(text.contains("Haaland"));
        assert!(text.contains("Man City"));
        assert!(text.contains("NOR"));
    }

    #[test]
    fn render_does_not_panic() {
        let session = session();
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &session, &ViewState::default()))
            .unwrap();
    }

    #[test]
    fn render_without_rows_shows_message() {
        let mut filtered = session();
        filtered.apply(SessionCommand::SelectNone(CategoryField::Nation));
        for session in [filtered, empty_session()] {
            let backend = ratatui::backend::TestBackend::new(80, 10);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| render(frame, frame.area(), &session, &ViewState::default()))
                .unwrap();
            let buffer = terminal.backend().buffer().clone();
            let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
            assert!(text.contains("Nothing to plot"));
        }
    }
}
