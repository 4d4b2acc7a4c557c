use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Precomputed indicator arrays consumed by historical charts.
///
/// Arrays are aligned 1:1 with the bar list; `None` marks warm-up gaps.
/// An empty array means the indicator is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default)]
    pub sma_50: Vec<Option<f64>>,
    #[serde(default)]
    pub sma_200: Vec<Option<f64>>,
    #[serde(default)]
    pub support: Option<f64>,
    #[serde(default)]
    pub resistance: Option<f64>,
}

impl IndicatorSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sma_50.is_empty()
            && self.sma_200.is_empty()
            && self.support.is_none()
            && self.resistance.is_none()
    }

    /// Checks that every present array matches `bar_count` and that levels are finite.
    pub fn validate_alignment(&self, bar_count: usize) -> ChartResult<()> {
        for (name, values) in [("sma_50", &self.sma_50), ("sma_200", &self.sma_200)] {
            if !values.is_empty() && values.len() != bar_count {
                return Err(ChartError::InvalidData(format!(
                    "indicator `{name}` has {} entries for {bar_count} bars",
                    values.len()
                )));
            }
        }
        for (name, level) in [("support", self.support), ("resistance", self.resistance)] {
            if level.is_some_and(|value| !value.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "indicator level `{name}` must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// Converts a nullable, bar-aligned array into `(bar_index, value)` pairs.
///
/// Null and non-finite entries are skipped, never zero-filled.
pub fn dense_samples(values: &[Option<f64>]) -> impl Iterator<Item = (usize, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.filter(|v| v.is_finite()).map(|v| (index, v)))
}
