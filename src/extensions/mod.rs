//! Overlays and hooks layered on top of the chart core.

pub mod markers;
pub mod plugins;

pub use markers::{
    ActiveSelection, Marker, MarkerPosition, MarkerShape, MarkerStyle, PatternEvent,
    PatternSignal, markers_are_sorted, merge_pattern_events, project_pattern_markers,
};
pub use plugins::{ChartEvent, ChartPlugin, PluginContext};
