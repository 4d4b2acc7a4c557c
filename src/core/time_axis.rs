use std::cmp::Ordering;
use std::fmt;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Bar;
use crate::error::{ChartError, ChartResult};

const INTRADAY_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Axis flavour of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartMode {
    /// Sub-daily bars on an epoch-seconds axis.
    Intraday,
    /// Daily bars on a calendar-date axis.
    #[default]
    Historical,
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intraday => f.write_str("intraday"),
            Self::Historical => f.write_str("historical"),
        }
    }
}

/// Chart-native time value of one bar.
///
/// Ordering is numeric between epochs and lexicographic between ISO dates.
/// Both variants never coexist within one chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeCoordinate {
    Epoch(i64),
    Date(String),
}

impl fmt::Display for TimeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epoch(seconds) => write!(f, "{seconds}"),
            Self::Date(date) => f.write_str(date),
        }
    }
}

/// Fixed wall-clock offset used to read intraday source keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntradayOffset {
    seconds_east: i32,
}

impl IntradayOffset {
    /// Indian Standard Time, UTC+5:30.
    pub const IST: Self = Self {
        seconds_east: 5 * 3600 + 30 * 60,
    };

    pub fn from_seconds_east(seconds_east: i32) -> ChartResult<Self> {
        FixedOffset::east_opt(seconds_east).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "intraday offset {seconds_east}s is outside +/-24h"
            ))
        })?;
        Ok(Self { seconds_east })
    }

    #[must_use]
    pub fn seconds_east(self) -> i32 {
        self.seconds_east
    }

    fn fixed(self) -> ChartResult<FixedOffset> {
        FixedOffset::east_opt(self.seconds_east).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "intraday offset {}s is outside +/-24h",
                self.seconds_east
            ))
        })
    }
}

impl Default for IntradayOffset {
    fn default() -> Self {
        Self::IST
    }
}

/// One coordinate per bar plus the reverse lookup by source key.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxisMap {
    mode: ChartMode,
    coordinates: Vec<TimeCoordinate>,
    index_by_key: IndexMap<String, usize>,
}

impl TimeAxisMap {
    /// Maps `bars` onto the axis of `mode`.
    ///
    /// Returns `Ok(None)` for an empty bar list: there is nothing to chart.
    /// Fails when a key cannot be parsed for the mode or when coordinates
    /// would decrease along bar order. Equal coordinates are accepted;
    /// [`crate::render::ChartBackend`] implementations may still refuse them.
    pub fn build(
        bars: &[Bar],
        mode: ChartMode,
        offset: IntradayOffset,
    ) -> ChartResult<Option<Self>> {
        if bars.is_empty() {
            return Ok(None);
        }

        let fixed = offset.fixed()?;
        let mut coordinates = Vec::with_capacity(bars.len());
        let mut index_by_key = IndexMap::with_capacity(bars.len());

        for (index, bar) in bars.iter().enumerate() {
            let coordinate = match mode {
                ChartMode::Intraday => {
                    TimeCoordinate::Epoch(intraday_epoch_seconds(&bar.source_key, fixed)?)
                }
                ChartMode::Historical => TimeCoordinate::Date(calendar_date(&bar.source_key)?),
            };

            if let Some(previous) = coordinates.last() {
                if coordinate.cmp(previous) == Ordering::Less {
                    return Err(ChartError::InvalidData(format!(
                        "time coordinate of `{}` decreases ({coordinate} < {previous})",
                        bar.source_key
                    )));
                }
            }

            if index_by_key.insert(bar.source_key.clone(), index).is_some() {
                return Err(ChartError::InvalidData(format!(
                    "duplicate bar source key `{}`",
                    bar.source_key
                )));
            }
            coordinates.push(coordinate);
        }

        Ok(Some(Self {
            mode,
            coordinates,
            index_by_key,
        }))
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Coordinates aligned 1:1 with the bars the map was built from.
    #[must_use]
    pub fn coordinates(&self) -> &[TimeCoordinate] {
        &self.coordinates
    }

    #[must_use]
    pub fn coordinate_at(&self, index: usize) -> Option<&TimeCoordinate> {
        self.coordinates.get(index)
    }

    /// Reverse lookup from a bar source key.
    #[must_use]
    pub fn coordinate_for(&self, source_key: &str) -> Option<&TimeCoordinate> {
        self.index_of(source_key)
            .and_then(|index| self.coordinates.get(index))
    }

    /// Logical bar index of a source key.
    #[must_use]
    pub fn index_of(&self, source_key: &str) -> Option<usize> {
        self.index_by_key.get(source_key).copied()
    }
}

fn intraday_epoch_seconds(key: &str, offset: FixedOffset) -> ChartResult<i64> {
    let naive = INTRADAY_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(key.trim(), format).ok())
        .ok_or_else(|| ChartError::InvalidTimeKey {
            key: key.to_owned(),
            reason: "expected `YYYY-MM-DD HH:MM[:SS]` wall-clock time".to_owned(),
        })?;

    naive
        .and_local_timezone(offset)
        .single()
        .map(|instant| instant.timestamp())
        .ok_or_else(|| ChartError::InvalidTimeKey {
            key: key.to_owned(),
            reason: "wall-clock time does not map to a single instant".to_owned(),
        })
}

fn calendar_date(key: &str) -> ChartResult<String> {
    let date = key.get(..10).ok_or_else(|| ChartError::InvalidTimeKey {
        key: key.to_owned(),
        reason: "expected at least a `YYYY-MM-DD` prefix".to_owned(),
    })?;

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| ChartError::InvalidTimeKey {
        key: key.to_owned(),
        reason: err.to_string(),
    })?;

    Ok(date.to_owned())
}
