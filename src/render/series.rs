use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ContainerSize, TimeCoordinate};
use crate::render::{Color, LineStrokeStyle};

/// Backend handle of one chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChartId(pub u64);

/// Backend handle of one series inside a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series#{}", self.0)
    }
}

/// Chart-level options applied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub size: ContainerSize,
    pub background_color: Color,
    pub text_color: Color,
}

/// One candle with its resolved body and wick colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    pub time: TimeCoordinate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub color: Color,
    pub wick_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub time: TimeCoordinate,
    pub value: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub time: TimeCoordinate,
    pub value: f64,
}

/// Fraction of the pane height kept free above and below a price scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

/// Price scale a series is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PriceScaleId {
    /// Main price axis shared by candles and overlays.
    #[default]
    Main,
    /// Separate overlay scale, used for volume.
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeriesOptions {
    pub price_scale: PriceScaleId,
    pub margins: ScaleMargins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesOptions {
    pub title: String,
    pub color: Color,
    pub line_width: f64,
}

/// Static horizontal reference line attached to a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub price: f64,
    pub color: Color,
    pub line_width: f64,
    pub stroke_style: LineStrokeStyle,
    pub title: String,
}
