//! Fetch windows offered by the quotes backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ChartMode;
use crate::error::ChartError;

/// Candle width for intraday fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IntradayInterval {
    #[serde(rename = "1m")]
    Min1,
    #[default]
    #[serde(rename = "5m")]
    Min5,
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "30m")]
    Min30,
    #[serde(rename = "1h")]
    Hour1,
}

impl IntradayInterval {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Min1 => "1m",
            Self::Min5 => "5m",
            Self::Min15 => "15m",
            Self::Min30 => "30m",
            Self::Hour1 => "1h",
        }
    }

    #[must_use]
    pub fn all() -> &'static [IntradayInterval] {
        &[
            Self::Min1,
            Self::Min5,
            Self::Min15,
            Self::Min30,
            Self::Hour1,
        ]
    }
}

/// Lookback window for daily history fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HistoricalPeriod {
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
    #[default]
    #[serde(rename = "6mo")]
    Month6,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "2y")]
    Year2,
}

impl HistoricalPeriod {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Month1 => "1mo",
            Self::Month3 => "3mo",
            Self::Month6 => "6mo",
            Self::Year1 => "1y",
            Self::Year2 => "2y",
        }
    }

    #[must_use]
    pub fn all() -> &'static [HistoricalPeriod] {
        &[
            Self::Month1,
            Self::Month3,
            Self::Month6,
            Self::Year1,
            Self::Year2,
        ]
    }
}

/// One user-selectable fetch window; decides the chart mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timeframe {
    Intraday(IntradayInterval),
    Historical(HistoricalPeriod),
}

impl Timeframe {
    #[must_use]
    pub fn mode(self) -> ChartMode {
        match self {
            Self::Intraday(_) => ChartMode::Intraday,
            Self::Historical(_) => ChartMode::Historical,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Intraday(interval) => interval.label(),
            Self::Historical(period) => period.label(),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(interval) = IntradayInterval::all()
            .iter()
            .find(|interval| interval.label() == value)
        {
            return Ok(Self::Intraday(*interval));
        }
        HistoricalPeriod::all()
            .iter()
            .find(|period| period.label() == value)
            .map(|period| Self::Historical(*period))
            .ok_or_else(|| ChartError::InvalidData(format!("unknown timeframe `{value}`")))
    }
}
