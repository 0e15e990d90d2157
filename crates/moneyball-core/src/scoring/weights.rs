// Per-column weight mapping and the slider that adjusts it.

use std::collections::BTreeMap;

use crate::config::WeightsConfig;

/// Weight every relevant column starts at, and returns to on reset.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Column → signed weight.
///
/// Owned by the session and lent to the scoring engine on every recompute.
/// Columns are seeded with `DEFAULT_WEIGHT` when first seen and keep the
/// user's value across position and filter changes until reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightMap {
    weights: BTreeMap<String, f64>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping with every listed column at `DEFAULT_WEIGHT`.
    pub fn with_defaults<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut map = Self::new();
        map.seed(columns);
        map
    }

    /// Give unseen columns the default weight; existing weights are kept.
    pub fn seed<S: AsRef<str>>(&mut self, columns: &[S]) {
        for column in columns {
            self.weights
                .entry(column.as_ref().to_string())
                .or_insert(DEFAULT_WEIGHT);
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.weights.get(column).copied()
    }

    /// Set a weight. Non-finite weights are ignored.
    pub fn set(&mut self, column: impl Into<String>, weight: f64) {
        if weight.is_finite() {
            self.weights.insert(column.into(), weight);
        }
    }

    /// Move a column's weight by `steps` slider increments and return the
    /// new value. Unweighted columns start from the default.
    pub fn adjust(&mut self, column: &str, steps: i32, slider: &WeightSlider) -> f64 {
        let current = self.get(column).unwrap_or(DEFAULT_WEIGHT);
        let next = slider.nudge(current, steps);
        self.weights.insert(column.to_string(), next);
        next
    }

    /// Put every listed column back to exactly `DEFAULT_WEIGHT`.
    pub fn reset<S: AsRef<str>>(&mut self, columns: &[S]) {
        for column in columns {
            self.weights
                .insert(column.as_ref().to_string(), DEFAULT_WEIGHT);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for WeightMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = WeightMap::new();
        for (column, weight) in iter {
            map.set(column, weight);
        }
        map
    }
}

// ---------------------------------------------------------------------------
// WeightSlider
// ---------------------------------------------------------------------------

/// Bounded, stepped control over a single weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for WeightSlider {
    fn default() -> Self {
        WeightsConfig::default().into()
    }
}

impl From<WeightsConfig> for WeightSlider {
    fn from(cfg: WeightsConfig) -> Self {
        WeightSlider {
            min: cfg.min,
            max: cfg.max,
            step: cfg.step,
        }
    }
}

impl WeightSlider {
    /// `current` moved by `steps` increments, snapped to the step grid and
    /// clamped to the slider range.
    pub fn nudge(&self, current: f64, steps: i32) -> f64 {
        let raw = current + f64::from(steps) * self.step;
        let snapped = (raw / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }

    /// Position of `value` along the slider, in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
