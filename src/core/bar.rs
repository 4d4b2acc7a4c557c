use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// One OHLCV observation keyed by its backend time string.
///
/// `source_key` is either a calendar date (`2024-03-15`) or a wall-clock
/// timestamp (`2024-03-15 09:15`). Interpretation depends on the chart mode
/// and is handled by [`crate::core::TimeAxisMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BarRecord", into = "BarRecord")]
pub struct Bar {
    pub source_key: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Builds a bar, rejecting values no chart can draw.
    ///
    /// Invariants:
    /// - `source_key` is not empty
    /// - all values are finite and `volume >= 0`
    ///
    /// Quote feeds occasionally report an open or close outside the
    /// high/low range. Such rows are kept: `high` and `low` are widened to
    /// cover every price of the bar and a warning is logged.
    pub fn new(
        source_key: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> ChartResult<Self> {
        let source_key = source_key.into();
        if source_key.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "bar source key must not be empty".to_owned(),
            ));
        }

        if !open.is_finite()
            || !high.is_finite()
            || !low.is_finite()
            || !close.is_finite()
            || !volume.is_finite()
        {
            return Err(ChartError::InvalidData(format!(
                "bar `{source_key}`: ohlcv values must be finite"
            )));
        }

        if volume < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "bar `{source_key}`: volume must be >= 0"
            )));
        }

        let wide_high = high.max(low).max(open).max(close);
        let wide_low = low.min(high).min(open).min(close);
        if wide_high != high || wide_low != low {
            warn!(
                bar = %source_key,
                open,
                high,
                low,
                close,
                "inconsistent ohlc widened to cover open/close"
            );
        }

        Ok(Self {
            source_key,
            open,
            high: wide_high,
            low: wide_low,
            close,
            volume,
        })
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Checks ascending order and uniqueness of bar source keys.
///
/// Keys of one series share a format, so plain string order matches time order.
pub fn validate_bar_sequence(bars: &[Bar]) -> ChartResult<()> {
    for pair in bars.windows(2) {
        let (prev, next) = (&pair[0].source_key, &pair[1].source_key);
        if next == prev {
            return Err(ChartError::InvalidData(format!(
                "duplicate bar source key `{next}`"
            )));
        }
        if next < prev {
            return Err(ChartError::InvalidData(format!(
                "bar `{next}` is ordered before `{prev}`"
            )));
        }
    }
    Ok(())
}

/// Wire shape of one candle as served by the quotes backend.
///
/// Historical rows carry only `date`. Intraday rows carry both `time`
/// (`YYYY-MM-DD HH:MM`) and `date`; `time` wins as the source key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl TryFrom<BarRecord> for Bar {
    type Error = ChartError;

    fn try_from(record: BarRecord) -> Result<Self, Self::Error> {
        let source_key = record.time.or(record.date).ok_or_else(|| {
            ChartError::InvalidData("bar record needs a `time` or `date` field".to_owned())
        })?;
        Bar::new(
            source_key,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        )
    }
}

impl From<Bar> for BarRecord {
    fn from(bar: Bar) -> Self {
        let has_clock = bar.source_key.len() > 10;
        let date = bar.source_key.get(..10).map(str::to_owned);
        Self {
            time: has_clock.then(|| bar.source_key.clone()),
            date: date.or(Some(bar.source_key)),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}
