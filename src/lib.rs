//! pattern-chart: interactive candlestick charting engine.
//!
//! Builds candlestick charts with volume and indicator overlays on a
//! retained-mode [`render::ChartBackend`], projects detected chart patterns
//! as markers, and animates the viewport onto a selected pattern.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartInput, ChartView, ChartViewConfig};
pub use error::{ChartError, ChartResult};
