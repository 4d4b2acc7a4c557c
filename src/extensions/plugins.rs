use serde::{Deserialize, Serialize};

use crate::core::{ChartMode, ContainerSize, LogicalRange};
use crate::render::ChartId;

/// Read-only view state passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub chart: Option<ChartId>,
    pub mode: Option<ChartMode>,
    pub bar_count: usize,
    pub marker_count: usize,
    pub animating: bool,
}

/// Lifecycle events emitted by a chart view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    ChartCreated {
        chart: ChartId,
        mode: ChartMode,
        bar_count: usize,
    },
    ChartDisposed {
        chart: ChartId,
    },
    MarkersApplied {
        count: usize,
        dropped: usize,
    },
    NavigationStarted {
        bar_index: usize,
        target: LogicalRange,
    },
    NavigationFinished {
        range: LogicalRange,
    },
    NavigationCancelled,
    Resized {
        size: ContainerSize,
    },
}

/// Extension hook interface for bounded custom logic.
///
/// Plugins observe events and read view context without mutating the chart.
pub trait ChartPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent, context: PluginContext);
}
