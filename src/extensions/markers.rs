use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{TimeAxisMap, TimeCoordinate};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Direction a detected pattern points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// Externally detected technical-analysis signal anchored to one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEvent {
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub signal: PatternSignal,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
    /// Source key of the bar the pattern was detected on.
    pub date: String,
    /// Detector family, e.g. `candlestick`; absent for indicator-derived signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PatternEvent {
    #[must_use]
    pub fn new(
        pattern_type: impl Into<String>,
        signal: PatternSignal,
        confidence: f64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            pattern_type: pattern_type.into(),
            signal,
            confidence,
            description: String::new(),
            date: date.into(),
            category: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// The one pattern the user currently highlights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSelection {
    pub pattern_type: String,
    pub date: String,
}

impl ActiveSelection {
    #[must_use]
    pub fn new(pattern_type: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            pattern_type: pattern_type.into(),
            date: date.into(),
        }
    }

    #[must_use]
    pub fn of(event: &PatternEvent) -> Self {
        Self::new(event.pattern_type.clone(), event.date.clone())
    }

    #[must_use]
    pub fn matches(&self, event: &PatternEvent) -> bool {
        self.pattern_type == event.pattern_type && self.date == event.date
    }

    /// Selection state after the user clicks `event`.
    ///
    /// Clicking the active pattern clears the selection; clicking any other
    /// pattern makes it the active one.
    #[must_use]
    pub fn toggle(current: Option<&ActiveSelection>, event: &PatternEvent) -> Option<Self> {
        match current {
            Some(active) if active.matches(event) => None,
            _ => Some(Self::of(event)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
    InBar,
}

impl MarkerPosition {
    /// Mirror position used to set an active marker apart.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::AboveBar => Self::BelowBar,
            Self::BelowBar => Self::AboveBar,
            Self::InBar => Self::AboveBar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
    Square,
}

/// Annotation placed on one bar of the candlestick series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub time: TimeCoordinate,
    pub position: MarkerPosition,
    pub color: Color,
    pub shape: MarkerShape,
    pub text: String,
    /// Size multiplier relative to the backend's base glyph size.
    pub size: f64,
}

/// Colors and sizes of pattern markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default = "default_bullish_color")]
    pub bullish_color: Color,
    #[serde(default = "default_bearish_color")]
    pub bearish_color: Color,
    #[serde(default = "default_neutral_color")]
    pub neutral_color: Color,
    #[serde(default = "default_active_color")]
    pub active_color: Color,
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default = "default_active_size")]
    pub active_size: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            bullish_color: default_bullish_color(),
            bearish_color: default_bearish_color(),
            neutral_color: default_neutral_color(),
            active_color: default_active_color(),
            size: default_size(),
            active_size: default_active_size(),
        }
    }
}

impl MarkerStyle {
    pub fn validate(self) -> ChartResult<Self> {
        for color in [
            self.bullish_color,
            self.bearish_color,
            self.neutral_color,
            self.active_color,
        ] {
            color.validate()?;
        }
        for (value, name) in [(self.size, "size"), (self.active_size, "active_size")] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "marker style `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn signal_color(self, signal: PatternSignal) -> Color {
        match signal {
            PatternSignal::Bullish => self.bullish_color,
            PatternSignal::Bearish => self.bearish_color,
            PatternSignal::Neutral => self.neutral_color,
        }
    }
}

fn default_bullish_color() -> Color {
    Color::rgb8(0x22, 0xc5, 0x5e)
}

fn default_bearish_color() -> Color {
    Color::rgb8(0xef, 0x44, 0x44)
}

fn default_neutral_color() -> Color {
    Color::rgb8(0xf5, 0x9e, 0x0b)
}

fn default_active_color() -> Color {
    Color::rgb8(0xfa, 0xcc, 0x15)
}

fn default_size() -> f64 {
    1.0
}

fn default_active_size() -> f64 {
    2.0
}

/// Projects pattern events onto the time axis.
///
/// Events whose `date` is not a loaded bar key are dropped. The event
/// matching `active` gets the active color and size, a bracketed label and
/// the flipped position. The result is sorted ascending by time; equal
/// times keep input order.
pub fn project_pattern_markers(
    events: &[PatternEvent],
    axis: &TimeAxisMap,
    active: Option<&ActiveSelection>,
    style: &MarkerStyle,
) -> Vec<Marker> {
    let mut markers: Vec<Marker> = events
        .iter()
        .filter_map(|event| {
            let Some(time) = axis.coordinate_for(&event.date) else {
                trace!(
                    pattern = %event.pattern_type,
                    date = %event.date,
                    "pattern date not on loaded bars, marker dropped"
                );
                return None;
            };
            Some(build_marker(
                event,
                time.clone(),
                active.is_some_and(|selection| selection.matches(event)),
                style,
            ))
        })
        .collect();

    markers.sort_by(|a, b| a.time.cmp(&b.time));
    markers
}

/// Returns `true` when times never decrease along the slice.
#[must_use]
pub fn markers_are_sorted(markers: &[Marker]) -> bool {
    markers.windows(2).all(|pair| pair[0].time <= pair[1].time)
}

fn build_marker(
    event: &PatternEvent,
    time: TimeCoordinate,
    is_active: bool,
    style: &MarkerStyle,
) -> Marker {
    let (shape, position) = match event.signal {
        PatternSignal::Bullish => (MarkerShape::ArrowUp, MarkerPosition::BelowBar),
        PatternSignal::Bearish => (MarkerShape::ArrowDown, MarkerPosition::AboveBar),
        PatternSignal::Neutral => (MarkerShape::Square, MarkerPosition::AboveBar),
    };

    if is_active {
        Marker {
            time,
            position: position.flipped(),
            color: style.active_color,
            shape,
            text: format!("[{}]", event.pattern_type),
            size: style.active_size,
        }
    } else {
        Marker {
            time,
            position,
            color: style.signal_color(event.signal),
            shape,
            text: event.pattern_type.clone(),
            size: style.size,
        }
    }
}

/// Merges pattern lists from several detectors, one entry per pattern type.
///
/// The highest-confidence event of each type wins; on ties the first one
/// seen is kept. Output follows first-seen type order.
pub fn merge_pattern_events<I>(origins: I) -> Vec<PatternEvent>
where
    I: IntoIterator<Item = Vec<PatternEvent>>,
{
    let mut by_type: IndexMap<String, PatternEvent> = IndexMap::new();
    for event in origins.into_iter().flatten() {
        match by_type.get_mut(&event.pattern_type) {
            Some(kept) if OrderedFloat(event.confidence) > OrderedFloat(kept.confidence) => {
                *kept = event;
            }
            Some(_) => {}
            None => {
                by_type.insert(event.pattern_type.clone(), event);
            }
        }
    }
    by_type.into_values().collect()
}
