mod chart_handle;
mod config;
mod container;
mod payload;
mod series_renderer;
mod view;

pub use chart_handle::ChartHandle;
pub use config::{ChartStyle, ChartViewConfig};
pub use container::{Container, HeadlessContainer, ResizeObserverId, ResizeReactor};
pub use payload::{AnalysisPayload, IntradayPayload, StockPayload};
pub use series_renderer::{build_chart, candle_points, line_points, volume_points};
pub use view::{AnimationStatus, ChartInput, ChartView};
