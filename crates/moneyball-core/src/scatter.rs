// Scatter view model: two statistic columns plotted per cluster.

use std::collections::BTreeMap;

use crate::data::table::{PlayerRow, PlayerTable};

/// Series name for rows without a cluster id.
pub const UNCLUSTERED: &str = "unclustered";

/// Fraction of the data span added on each side of an axis.
const PADDING: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub player: String,
    pub team: String,
    pub nation: Option<String>,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub cluster: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub x_column: String,
    pub y_column: String,
    /// Ordered by cluster id, `UNCLUSTERED` last.
    pub series: Vec<ScatterSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ScatterPlot {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// The plotted point of `player` with its cluster, if any.
    pub fn find(&self, player: &str) -> Option<(&str, &ScatterPoint)> {
        self.series.iter().find_map(|s| {
            s.points
                .iter()
                .find(|p| p.player == player)
                .map(|p| (s.cluster.as_str(), p))
        })
    }
}

/// Columns of `table` with at least one value among `rows`.
pub fn numeric_columns(table: &PlayerTable, rows: &[&PlayerRow]) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| rows.iter().any(|r| r.stats.contains_key(c.as_str())))
        .cloned()
        .collect()
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    let (lo, hi) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * PADDING
    } else {
        (lo.abs() * PADDING).max(0.5)
    };
    Some([lo - pad, hi + pad])
}

/// Plot `y` against `x` over `rows`, one series per cluster.
///
/// Rows missing either value are skipped. Returns `None` when no point is
/// left to draw.
pub fn build_scatter(rows: &[&PlayerRow], x: &str, y: &str) -> Option<ScatterPlot> {
    let mut clustered: BTreeMap<String, Vec<ScatterPoint>> = BTreeMap::new();
    let mut unclustered = Vec::new();

    for row in rows {
        let (Some(xv), Some(yv)) = (row.stat(x), row.stat(y)) else {
            continue;
        };
        let point = ScatterPoint {
            player: row.player.clone(),
            team: row.team.clone(),
            nation: row.nation.clone(),
            x: xv,
            y: yv,
        };
        match &row.cluster {
            Some(c) => clustered.entry(c.clone()).or_default().push(point),
            None => unclustered.push(point),
        }
    }

    let mut series: Vec<ScatterSeries> = clustered
        .into_iter()
        .map(|(cluster, points)| ScatterSeries { cluster, points })
        .collect();
    if !unclustered.is_empty() {
        series.push(ScatterSeries {
            cluster: UNCLUSTERED.to_string(),
            points: unclustered,
        });
    }

    let points = || series.iter().flat_map(|s| s.points.iter());
    let x_bounds = padded_bounds(points().map(|p| p.x))?;
    let y_bounds = padded_bounds(points().map(|p| p.y))?;

    Some(ScatterPlot {
        x_column: x.to_string(),
        y_column: y.to_string(),
        series,
        x_bounds,
        y_bounds,
    })
}
