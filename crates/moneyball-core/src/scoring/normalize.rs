// The two min-max normalizations used by the dashboard.
//
// They differ on purpose in how a zero range is handled and must not be
// merged: scores use an explicit policy, radar values an epsilon.

/// Normalized score given to every row when all raw scores are equal.
pub const DEGENERATE_SCORE: f64 = 100.0;

/// Added to the radar denominator so equal values map to 0 instead of NaN.
pub const RADAR_EPSILON: f64 = 1e-5;

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Scale raw scores to `[0, 100]` relative to the given set.
///
/// `(raw - min) / (max - min) * 100`. When the range is zero (a single row,
/// identical totals, or an empty weight mapping) every entry is
/// `DEGENERATE_SCORE`.
pub fn normalize_scores(raw: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(raw) else {
        return Vec::new();
    };
    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        return vec![DEGENERATE_SCORE; raw.len()];
    }
    raw.iter()
        .map(|v| {
            let scaled = (v - min) / range * 100.0;
            if scaled.is_nan() {
                0.0
            } else {
                scaled.clamp(0.0, 100.0)
            }
        })
        .collect()
}

/// Scale one player's radar values to roughly `[0, 1]`.
///
/// `(v - min) / (max - min + RADAR_EPSILON)`; identical values give zeros.
pub fn normalize_radar(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    let denominator = max - min + RADAR_EPSILON;
    values.iter().map(|v| (v - min) / denominator).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
