use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Pixel size of the element hosting a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Visible window of the chart in bar-index space.
///
/// `from`/`to` are fractional logical indices; they are not clamped to the
/// loaded data and may lie outside `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub from: f64,
    pub to: f64,
}

impl LogicalRange {
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.to - self.from
    }

    #[must_use]
    pub fn center(self) -> f64 {
        0.5 * (self.from + self.to)
    }

    /// Range of identical width whose center sits on `index`.
    #[must_use]
    pub fn centered_on(self, index: f64) -> Self {
        let half = 0.5 * self.width();
        Self {
            from: index - half,
            to: index + half,
        }
    }

    /// Linear interpolation towards `target`; `t = 0` is `self`, `t = 1` is `target`.
    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            from: self.from + (target.from - self.from) * t,
            to: self.to + (target.to - self.to) * t,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(ChartError::InvalidData(
                "logical range bounds must be finite".to_owned(),
            ));
        }
        if self.from > self.to {
            return Err(ChartError::InvalidData(
                "logical range `from` must be <= `to`".to_owned(),
            ));
        }
        Ok(self)
    }
}
