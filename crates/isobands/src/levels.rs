//! Discrete value levels derived from a grid's effective range.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A half-open value interval `[floor, ceiling)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: usize,
    pub floor: f64,
    pub ceiling: f64,
}

impl Level {
    /// Contour threshold for this level.
    pub fn threshold(&self, epsilon: f64) -> f64 {
        self.floor - epsilon
    }
}

/// Min and max over finite values `>= floor`, or `None` if there are none.
pub fn value_range(values: &[f64], floor: f64) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v >= floor)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Upper bound on the levels generated for one grid.
pub const MAX_LEVELS: usize = 10_000;

/// First level floor and number of levels covering `values`.
///
/// `start = floor(min / step) * step` and there are
/// `floor((max - start) / step)` levels, saturating at `usize::MAX`.
pub fn level_span(values: &[f64], floor: f64, step: f64) -> Option<(f64, usize)> {
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let (min, max) = value_range(values, floor)?;
    let start = (min / step).floor() * step;
    Some((start, ((max - start) / step).floor() as usize))
}

/// Generate the levels covering `values`, at most [`MAX_LEVELS`] of them.
///
/// Each ceiling is computed the same way as the next level's floor, so
/// consecutive levels share a boundary exactly.
pub fn generate_levels(values: &[f64], floor: f64, step: f64) -> Vec<Level> {
    let Some((start, count)) = level_span(values, floor, step) else {
        return Vec::new();
    };
    if count > MAX_LEVELS {
        warn!(count, max = MAX_LEVELS, step, "Truncating level sequence");
    }
    let count = count.min(MAX_LEVELS);

    (0..count)
        .map(|i| Level {
            index: i,
            floor: start + i as f64 * step,
            ceiling: start + (i + 1) as f64 * step,
        })
        .collect()
}
