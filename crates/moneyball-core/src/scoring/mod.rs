// Weighted scoring engine: linear weighted sum per row, min-max scaled to 0-100.

pub mod normalize;
pub mod weights;

use crate::data::table::PlayerRow;

pub use normalize::{normalize_radar, normalize_scores};
pub use weights::{WeightMap, WeightSlider, DEFAULT_WEIGHT};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScoringError {
    #[error("invalid scoring input: {0}")]
    InvalidInput(String),
}

/// Score of a single row relative to the set it was scored with.
#[derive(Debug, Clone, PartialEq)]
pub struct RowScore {
    /// `(column, value × weight)` in column order. Missing values count as 0.
    pub contributions: Vec<(String, f64)>,
    pub raw: f64,
    /// In `[0, 100]`.
    pub normalized: f64,
}

/// Score `rows` over `columns` using `weights`.
///
/// Only columns that also have a weight contribute; weighted columns not in
/// `columns` are ignored. The result is index-aligned with `rows`. An empty
/// weight mapping is legal and gives every row the degenerate score.
pub fn score_rows(
    rows: &[&PlayerRow],
    columns: &[String],
    weights: &WeightMap,
) -> Result<Vec<RowScore>, ScoringError> {
    if rows.is_empty() {
        return Err(ScoringError::InvalidInput("no rows to score".into()));
    }

    let weighted: Vec<(&str, f64)> = columns
        .iter()
        .filter_map(|c| weights.get(c).map(|w| (c.as_str(), w)))
        .collect();

    let partial: Vec<(Vec<(String, f64)>, f64)> = rows
        .iter()
        .map(|row| {
            let contributions: Vec<(String, f64)> = weighted
                .iter()
                .map(|(column, weight)| {
                    (column.to_string(), row.stat(column).unwrap_or(0.0) * weight)
                })
                .collect();
            let raw = contributions.iter().map(|(_, v)| v).sum();
            (contributions, raw)
        })
        .collect();

    let raws: Vec<f64> = partial.iter().map(|(_, raw)| *raw).collect();
    let normalized = normalize_scores(&raws);

    Ok(partial
        .into_iter()
        .zip(normalized)
        .map(|((contributions, raw), normalized)| RowScore {
            contributions,
            raw,
            normalized,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
