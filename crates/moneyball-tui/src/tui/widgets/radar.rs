// Radar widget: selected players' normalized statistics on polar axes.
//
// Axes are the weighted scored columns of the active position, evenly spaced
// clockwise from the top. Each player is a closed polygon; the legend on the
// right lists players with their raw values.

use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use moneyball_core::radar::RadarChart;
use moneyball_core::session::Session;

use super::{panel_block, series_color};
use crate::protocol::Panel;
use crate::tui::ViewState;

/// Canvas half-extent; leaves room for axis labels past the unit circle.
const EXTENT: f64 = 1.35;

/// Radius at which axis labels are printed.
const LABEL_RADIUS: f64 = 1.12;

/// Grid rings drawn behind the polygons.
const RINGS: [f64; 2] = [0.5, 1.0];

pub fn render(frame: &mut Frame, area: Rect, session: &Session, state: &ViewState) {
    let chart = session.radar();
    let focused = state.focus == Panel::Main;

    if chart.is_empty() {
        let paragraph = Paragraph::new(empty_message(&chart))
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(panel_block("Radar", focused));
        frame.render_widget(paragraph, area);
        return;
    }

    let [canvas_area, legend_area] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area);

    let canvas = Canvas::default()
        .block(panel_block(format!("Radar ({})", chart.series.len()), focused))
        .marker(Marker::Braille)
        .x_bounds([-EXTENT, EXTENT])
        .y_bounds([-EXTENT, EXTENT])
        .paint(|ctx| paint_radar(ctx, &chart));
    frame.render_widget(canvas, canvas_area);

    let legend = Paragraph::new(legend_lines(&chart))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(legend, legend_area);
}

/// Unit vector of axis `i` out of `n`, clockwise from the top.
pub fn axis_direction(i: usize, n: usize) -> (f64, f64) {
    let angle = FRAC_PI_2 - TAU * i as f64 / n.max(1) as f64;
    (angle.cos(), angle.sin())
}

/// Polygon vertices for one series of normalized values.
pub fn polygon(values: &[f64]) -> Vec<(f64, f64)> {
    let n = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let (dx, dy) = axis_direction(i, n);
            (dx * v, dy * v)
        })
        .collect()
}

fn paint_radar(ctx: &mut Context, chart: &RadarChart) {
    let n = chart.axes.len();
    let grid = Color::DarkGray;

    for ring in RINGS {
        let ring_points: Vec<(f64, f64)> = polygon(&vec![ring; n.max(3)]);
        draw_closed(ctx, &ring_points, grid);
    }
    for i in 0..n {
        let (dx, dy) = axis_direction(i, n);
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: 0.0,
            x2: dx,
            y2: dy,
            color: grid,
        });
    }
    ctx.layer();

    for (s, series) in chart.series.iter().enumerate() {
        draw_closed(ctx, &polygon(&series.normalized), series_color(s));
    }
    ctx.layer();

    for (i, axis) in chart.axes.iter().enumerate() {
        let (dx, dy) = axis_direction(i, n);
        // Shift left-side labels so they end at the axis tip.
        let shift = if dx < -0.1 { -(axis.len() as f64) * 0.04 } else { 0.0 };
        ctx.print(
            dx * LABEL_RADIUS + shift,
            dy * LABEL_RADIUS,
            Span::styled(axis.clone(), Style::default().fg(Color::White)),
        );
    }
}

fn draw_closed(ctx: &mut Context, points: &[(f64, f64)], color: Color) {
    if points.len() < 2 {
        return;
    }
    for (i, &(x1, y1)) in points.iter().enumerate() {
        let (x2, y2) = points[(i + 1) % points.len()];
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }
}

fn legend_lines(chart: &RadarChart) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (s, series) in chart.series.iter().enumerate() {
        let color = series_color(s);
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(
                series.player.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", series.team), Style::default().fg(Color::Gray)),
        ]));
        for (axis, raw) in chart.axes.iter().zip(&series.raw) {
            lines.push(Line::from(Span::styled(
                format!("  {}: {:.2}", axis, raw),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines
}

fn empty_message(chart: &RadarChart) -> &'static str {
    if chart.axes.is_empty() {
        "  No weighted statistic to plot."
    } else {
        "  Select players in the Ranking tab with Space to compare them here."
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
