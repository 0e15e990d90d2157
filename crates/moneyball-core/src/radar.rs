// Radar comparison view model.

use crate::data::table::PlayerTable;
use crate::ranking::Ranking;
use crate::scoring::{normalize_radar, WeightMap};

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub player: String,
    pub team: String,
    /// Raw statistic values, one per axis.
    pub raw: Vec<f64>,
    /// `raw` scaled with the radar normalizer.
    pub normalized: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarChart {
    pub axes: Vec<String>,
    pub series: Vec<RadarSeries>,
}

impl RadarChart {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() || self.series.is_empty()
    }
}

/// Build the radar for `players`.
///
/// Axes are the scored columns of `ranking` that carry a weight, in ranking
/// order. Each player contributes the first ranked row with that name;
/// players outside the ranking are skipped.
pub fn build_radar(
    table: &PlayerTable,
    ranking: &Ranking,
    weights: &WeightMap,
    players: &[String],
) -> RadarChart {
    let axes: Vec<String> = ranking
        .columns
        .iter()
        .filter(|c| weights.get(c).is_some())
        .cloned()
        .collect();

    let series = players
        .iter()
        .filter_map(|name| {
            let ranked = ranking.find(name)?;
            let row = table.rows().get(ranked.index)?;
            let raw: Vec<f64> = axes
                .iter()
                .map(|c| row.stat(c).unwrap_or(0.0))
                .collect();
            let normalized = normalize_radar(&raw);
            Some(RadarSeries {
                player: row.player.clone(),
                team: row.team.clone(),
                raw,
                normalized,
            })
        })
        .collect();

    RadarChart { axes, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::PlayerRow;
    use crate::ranking::{rank_players, Filters};
    use crate::schema::PositionSchema;

    fn fixture() -> (PlayerTable, Ranking, WeightMap) {
        let table = PlayerTable::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                PlayerRow::new("Flat", "T1", "FW")
                    .with_stat("a", 5.0)
                    .with_stat("b", 5.0)
                    .with_stat("c", 5.0),
                PlayerRow::new("Spiky", "T2", "FW")
                    .with_stat("a", 0.0)
                    .with_stat("b", 10.0)
                    .with_stat("c", 5.0),
            ],
        );
        let weights = WeightMap::with_defaults(&["a", "b", "c"]);
        let schema = PositionSchema::new("Strikers", &["a", "b", "c"]);
        let ranking = rank_players(&table, &schema, &Filters::all(), &weights).unwrap();
        (table, ranking, weights)
    }

    #[test]
    fn equal_values_normalize_to_zero() {
        let (table, ranking, weights) = fixture();
        let chart = build_radar(&table, &ranking, &weights, &["Flat".to_string()]);
        assert_eq!(chart.axes, vec!["a", "b", "c"]);
        assert_eq!(chart.series.len(), 1);
        let flat = &chart.series[0];
        assert_eq!(flat.raw, vec![5.0, 5.0, 5.0]);
        assert!(flat.normalized.iter().all(|v| v.abs() < 1e-9 && !v.is_nan()));
    }

    #[test]
    fn series_follow_selection_order() {
        let (table, ranking, weights) = fixture();
        let chart = build_radar(
            &table,
            &ranking,
            &weights,
            &["Spiky".to_string(), "Flat".to_string()],
        );
        assert_eq!(chart.series[0].player, "Spiky");
        assert_eq!(chart.series[0].team, "T2");
        assert!(chart.series[0].normalized[1] > 0.99);
        assert_eq!(chart.series[1].player, "Flat");
    }

    #[test]
    fn unranked_players_are_skipped() {
        let (table, ranking, weights) = fixture();
        let chart = build_radar(&table, &ranking, &weights, &["Nobody".to_string()]);
        assert!(chart.series.is_empty());
        assert!(chart.is_empty());
    }

    #[test]
    fn unweighted_columns_are_not_axes() {
        let (table, ranking, _) = fixture();
        let weights: WeightMap = [("a", 1.0), ("c", 2.0)].into_iter().collect();
        let chart = build_radar(&table, &ranking, &weights, &["Spiky".to_string()]);
        assert_eq!(chart.axes, vec!["a", "c"]);
        assert_eq!(chart.series[0].raw, vec![0.0, 5.0]);
    }
}
