mod frame;
mod headless;
mod null_renderer;
mod primitives;
mod scene;
mod series;

pub use frame::RenderFrame;
pub use headless::{BackendLedger, HeadlessBackend, HeadlessChart, HeadlessSeries, SeriesData};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, TextHAlign, TextPrimitive,
    TrianglePrimitive,
};
pub use scene::{SceneConfig, build_scene_frame};
pub use series::{
    CandlePoint, ChartId, ChartOptions, HistogramPoint, HistogramSeriesOptions, LinePoint,
    LineSeriesOptions, PriceLine, PriceScaleId, ScaleMargins, SeriesId,
};

use crate::core::{ContainerSize, LogicalRange};
use crate::error::ChartResult;
use crate::extensions::Marker;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `RenderFrame` so drawing code stays
/// isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

/// Retained-mode chart library the engine drives.
///
/// Implementations own chart instances and their series; the engine only
/// holds ids. `set_markers` requires markers sorted ascending by time.
///
/// Series data must have strictly ascending times. This is stricter than
/// [`crate::core::TimeAxisMap`], which accepts equal coordinates: two
/// historical keys on one calendar date (`2024-03-15` and
/// `2024-03-15 10:00`) map to the same date and are refused here, so the
/// chart build fails and the partial chart is removed.
pub trait ChartBackend {
    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<ChartId>;

    fn add_candlestick_series(
        &mut self,
        chart: ChartId,
        data: Vec<CandlePoint>,
    ) -> ChartResult<SeriesId>;

    fn add_histogram_series(
        &mut self,
        chart: ChartId,
        options: HistogramSeriesOptions,
        data: Vec<HistogramPoint>,
    ) -> ChartResult<SeriesId>;

    fn add_line_series(
        &mut self,
        chart: ChartId,
        options: LineSeriesOptions,
        data: Vec<LinePoint>,
    ) -> ChartResult<SeriesId>;

    fn create_price_line(&mut self, series: SeriesId, line: PriceLine) -> ChartResult<()>;

    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]) -> ChartResult<()>;

    /// Fits the visible logical range to all loaded bars.
    fn fit_content(&mut self, chart: ChartId) -> ChartResult<()>;

    fn visible_logical_range(&self, chart: ChartId) -> ChartResult<Option<LogicalRange>>;

    fn set_visible_logical_range(&mut self, chart: ChartId, range: LogicalRange)
    -> ChartResult<()>;

    fn resize(&mut self, chart: ChartId, size: ContainerSize) -> ChartResult<()>;

    /// Destroys a chart and every series it owns.
    fn remove_chart(&mut self, chart: ChartId) -> ChartResult<()>;
}

impl<T: ChartBackend + ?Sized> ChartBackend for &mut T {
    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<ChartId> {
        (**self).create_chart(options)
    }

    fn add_candlestick_series(
        &mut self,
        chart: ChartId,
        data: Vec<CandlePoint>,
    ) -> ChartResult<SeriesId> {
        (**self).add_candlestick_series(chart, data)
    }

    fn add_histogram_series(
        &mut self,
        chart: ChartId,
        options: HistogramSeriesOptions,
        data: Vec<HistogramPoint>,
    ) -> ChartResult<SeriesId> {
        (**self).add_histogram_series(chart, options, data)
    }

    fn add_line_series(
        &mut self,
        chart: ChartId,
        options: LineSeriesOptions,
        data: Vec<LinePoint>,
    ) -> ChartResult<SeriesId> {
        (**self).add_line_series(chart, options, data)
    }

    fn create_price_line(&mut self, series: SeriesId, line: PriceLine) -> ChartResult<()> {
        (**self).create_price_line(series, line)
    }

    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]) -> ChartResult<()> {
        (**self).set_markers(series, markers)
    }

    fn fit_content(&mut self, chart: ChartId) -> ChartResult<()> {
        (**self).fit_content(chart)
    }

    fn visible_logical_range(&self, chart: ChartId) -> ChartResult<Option<LogicalRange>> {
        (**self).visible_logical_range(chart)
    }

    fn set_visible_logical_range(
        &mut self,
        chart: ChartId,
        range: LogicalRange,
    ) -> ChartResult<()> {
        (**self).set_visible_logical_range(chart, range)
    }

    fn resize(&mut self, chart: ChartId, size: ContainerSize) -> ChartResult<()> {
        (**self).resize(chart, size)
    }

    fn remove_chart(&mut self, chart: ChartId) -> ChartResult<()> {
        (**self).remove_chart(chart)
    }
}
