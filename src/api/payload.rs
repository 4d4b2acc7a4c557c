//! Decoding of the market-data backend's JSON responses.
//!
//! Failed lookups come back as `{"error": "..."}` and surface as
//! [`ChartError::InvalidData`]. Fields the chart does not use are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{Bar, ChartMode, IndicatorSet, IntradayInterval};
use crate::error::{ChartError, ChartResult};
use crate::extensions::PatternEvent;

/// Daily history of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPayload {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    /// Bars keyed by `date`.
    pub history: Vec<Bar>,
}

/// Sub-daily candles of one symbol for one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayPayload {
    pub symbol: String,
    pub interval: IntradayInterval,
    /// Bars keyed by `time` (`YYYY-MM-DD HH:MM`).
    pub candles: Vec<Bar>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

/// History plus the indicators and patterns computed over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub stock: StockPayload,
    #[serde(default)]
    pub indicators: IndicatorSet,
    #[serde(default)]
    pub patterns: Vec<PatternEvent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure { error: String },
    Success(T),
}

fn decode<T: DeserializeOwned>(input: &str) -> ChartResult<T> {
    match serde_json::from_str::<Envelope<T>>(input) {
        Ok(Envelope::Success(payload)) => Ok(payload),
        Ok(Envelope::Failure { error }) => Err(ChartError::InvalidData(format!(
            "backend reported an error: {error}"
        ))),
        // The untagged error hides the field-level cause; decode again for it.
        Err(_) => Ok(serde_json::from_str(input)?),
    }
}

impl StockPayload {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        decode(input)
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        ChartMode::Historical
    }
}

impl IntradayPayload {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        decode(input)
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        ChartMode::Intraday
    }
}

impl AnalysisPayload {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        decode(input)
    }
}
