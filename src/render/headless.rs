use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{ContainerSize, LogicalRange, TimeCoordinate};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{Marker, markers_are_sorted};
use crate::render::{
    CandlePoint, ChartBackend, ChartId, ChartOptions, HistogramPoint, HistogramSeriesOptions,
    LinePoint, LineSeriesOptions, PriceLine, RenderFrame, Renderer, SceneConfig, SeriesId,
    build_scene_frame,
};

/// Call counters kept by [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendLedger {
    pub charts_created: usize,
    pub charts_removed: usize,
    pub series_created: usize,
    pub price_lines_created: usize,
    pub marker_updates: usize,
    pub range_updates: usize,
    pub resizes: usize,
}

impl BackendLedger {
    #[must_use]
    pub fn live_charts(self) -> usize {
        self.charts_created - self.charts_removed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Candlestick(Vec<CandlePoint>),
    Histogram {
        options: HistogramSeriesOptions,
        points: Vec<HistogramPoint>,
    },
    Line {
        options: LineSeriesOptions,
        points: Vec<LinePoint>,
    },
}

impl SeriesData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Candlestick(points) => points.len(),
            Self::Histogram { points, .. } => points.len(),
            Self::Line { points, .. } => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn times(&self) -> Vec<&TimeCoordinate> {
        match self {
            Self::Candlestick(points) => points.iter().map(|p| &p.time).collect(),
            Self::Histogram { points, .. } => points.iter().map(|p| &p.time).collect(),
            Self::Line { points, .. } => points.iter().map(|p| &p.time).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSeries {
    pub id: SeriesId,
    pub data: SeriesData,
    pub price_lines: Vec<PriceLine>,
    pub markers: Vec<Marker>,
}

/// Retained state of one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessChart {
    pub id: ChartId,
    pub options: ChartOptions,
    pub series: Vec<HeadlessSeries>,
    pub visible_range: Option<LogicalRange>,
    /// Every range applied through `set_visible_logical_range`, oldest first.
    pub range_history: Vec<LogicalRange>,
}

impl HeadlessChart {
    /// Sorted union of all series times mapped to logical bar indices.
    #[must_use]
    pub fn time_index(&self) -> IndexMap<TimeCoordinate, usize> {
        let times: BTreeSet<&TimeCoordinate> = self
            .series
            .iter()
            .flat_map(|series| series.data.times())
            .collect();
        times
            .into_iter()
            .enumerate()
            .map(|(index, time)| (time.clone(), index))
            .collect()
    }

    #[must_use]
    pub fn candlestick_series(&self) -> Option<&HeadlessSeries> {
        self.series
            .iter()
            .find(|series| matches!(series.data, SeriesData::Candlestick(_)))
    }

    #[must_use]
    pub fn line_series(&self) -> Vec<&HeadlessSeries> {
        self.series
            .iter()
            .filter(|series| matches!(series.data, SeriesData::Line { .. }))
            .collect()
    }

    #[must_use]
    pub fn histogram_series(&self) -> Option<&HeadlessSeries> {
        self.series
            .iter()
            .find(|series| matches!(series.data, SeriesData::Histogram { .. }))
    }

    /// Markers across all series, in series order.
    #[must_use]
    pub fn markers(&self) -> Vec<&Marker> {
        self.series
            .iter()
            .flat_map(|series| series.markers.iter())
            .collect()
    }
}

/// In-memory chart library.
///
/// Stores every chart and series it is asked to build, enforces the ordering
/// contracts a real retained-mode library relies on, and counts lifecycle
/// calls so hosts and tests can verify that no chart instance leaks.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    charts: IndexMap<ChartId, HeadlessChart>,
    series_owner: IndexMap<SeriesId, ChartId>,
    ledger: BackendLedger,
}

impl HeadlessBackend {
    #[must_use]
    pub fn ledger(&self) -> BackendLedger {
        self.ledger
    }

    #[must_use]
    pub fn live_chart_ids(&self) -> Vec<ChartId> {
        self.charts.keys().copied().collect()
    }

    #[must_use]
    pub fn chart(&self, chart: ChartId) -> Option<&HeadlessChart> {
        self.charts.get(&chart)
    }

    /// Projects a stored chart into draw primitives.
    pub fn build_render_frame(
        &self,
        chart: ChartId,
        config: &SceneConfig,
    ) -> ChartResult<RenderFrame> {
        let chart = self.chart_ref(chart)?;
        build_scene_frame(chart, config)
    }

    /// Projects a stored chart and hands the frame to `renderer`.
    pub fn render_chart<R: Renderer + ?Sized>(
        &self,
        chart: ChartId,
        config: &SceneConfig,
        renderer: &mut R,
    ) -> ChartResult<()> {
        let frame = self.build_render_frame(chart, config)?;
        renderer.render(&frame)
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn chart_ref(&self, chart: ChartId) -> ChartResult<&HeadlessChart> {
        self.charts
            .get(&chart)
            .ok_or(ChartError::UnknownChart(chart.0))
    }

    fn chart_mut(&mut self, chart: ChartId) -> ChartResult<&mut HeadlessChart> {
        self.charts
            .get_mut(&chart)
            .ok_or(ChartError::UnknownChart(chart.0))
    }

    fn series_mut(&mut self, series: SeriesId) -> ChartResult<&mut HeadlessSeries> {
        let owner = *self
            .series_owner
            .get(&series)
            .ok_or(ChartError::UnknownSeries(series.0))?;
        self.chart_mut(owner)?
            .series
            .iter_mut()
            .find(|entry| entry.id == series)
            .ok_or(ChartError::UnknownSeries(series.0))
    }

    fn push_series(&mut self, chart: ChartId, data: SeriesData) -> ChartResult<SeriesId> {
        validate_series_times(&data)?;
        // Resolve the chart before allocating so unknown ids leave no trace.
        self.chart_ref(chart)?;
        let id = SeriesId(self.allocate_id());
        let points = data.len();
        self.chart_mut(chart)?.series.push(HeadlessSeries {
            id,
            data,
            price_lines: Vec::new(),
            markers: Vec::new(),
        });
        self.series_owner.insert(id, chart);
        self.ledger.series_created += 1;
        trace!(%chart, series = %id, points, "series added");
        Ok(id)
    }
}

impl ChartBackend for HeadlessBackend {
    fn create_chart(&mut self, options: &ChartOptions) -> ChartResult<ChartId> {
        options.size.validate()?;
        options.background_color.validate()?;
        options.text_color.validate()?;

        let id = ChartId(self.allocate_id());
        self.charts.insert(
            id,
            HeadlessChart {
                id,
                options: *options,
                series: Vec::new(),
                visible_range: None,
                range_history: Vec::new(),
            },
        );
        self.ledger.charts_created += 1;
        debug!(chart = %id, width = options.size.width, height = options.size.height, "chart created");
        Ok(id)
    }

    fn add_candlestick_series(
        &mut self,
        chart: ChartId,
        data: Vec<CandlePoint>,
    ) -> ChartResult<SeriesId> {
        for point in &data {
            if ![point.open, point.high, point.low, point.close]
                .iter()
                .all(|value| value.is_finite())
            {
                return Err(ChartError::InvalidData(
                    "candle values must be finite".to_owned(),
                ));
            }
        }
        self.push_series(chart, SeriesData::Candlestick(data))
    }

    fn add_histogram_series(
        &mut self,
        chart: ChartId,
        options: HistogramSeriesOptions,
        data: Vec<HistogramPoint>,
    ) -> ChartResult<SeriesId> {
        let margins = options.margins;
        if !(0.0..1.0).contains(&(margins.top + margins.bottom))
            || margins.top < 0.0
            || margins.bottom < 0.0
        {
            return Err(ChartError::InvalidData(
                "histogram scale margins must be >= 0 and sum to < 1".to_owned(),
            ));
        }
        if data.iter().any(|point| !point.value.is_finite()) {
            return Err(ChartError::InvalidData(
                "histogram values must be finite".to_owned(),
            ));
        }
        self.push_series(
            chart,
            SeriesData::Histogram {
                options,
                points: data,
            },
        )
    }

    fn add_line_series(
        &mut self,
        chart: ChartId,
        options: LineSeriesOptions,
        data: Vec<LinePoint>,
    ) -> ChartResult<SeriesId> {
        if data.iter().any(|point| !point.value.is_finite()) {
            return Err(ChartError::InvalidData(
                "line values must be finite".to_owned(),
            ));
        }
        self.push_series(
            chart,
            SeriesData::Line {
                options,
                points: data,
            },
        )
    }

    fn create_price_line(&mut self, series: SeriesId, line: PriceLine) -> ChartResult<()> {
        if !line.price.is_finite() {
            return Err(ChartError::InvalidData(
                "price line level must be finite".to_owned(),
            ));
        }
        self.series_mut(series)?.price_lines.push(line);
        self.ledger.price_lines_created += 1;
        Ok(())
    }

    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]) -> ChartResult<()> {
        if !markers_are_sorted(markers) {
            return Err(ChartError::InvalidData(
                "markers must be sorted ascending by time".to_owned(),
            ));
        }
        self.series_mut(series)?.markers = markers.to_vec();
        self.ledger.marker_updates += 1;
        trace!(series = %series, count = markers.len(), "markers replaced");
        Ok(())
    }

    fn fit_content(&mut self, chart: ChartId) -> ChartResult<()> {
        let entry = self.chart_mut(chart)?;
        let bar_count = entry.time_index().len();
        entry.visible_range =
            (bar_count > 0).then(|| LogicalRange::new(-0.5, bar_count as f64 - 0.5));
        Ok(())
    }

    fn visible_logical_range(&self, chart: ChartId) -> ChartResult<Option<LogicalRange>> {
        Ok(self.chart_ref(chart)?.visible_range)
    }

    fn set_visible_logical_range(
        &mut self,
        chart: ChartId,
        range: LogicalRange,
    ) -> ChartResult<()> {
        let range = range.validate()?;
        let entry = self.chart_mut(chart)?;
        entry.visible_range = Some(range);
        entry.range_history.push(range);
        self.ledger.range_updates += 1;
        Ok(())
    }

    fn resize(&mut self, chart: ChartId, size: ContainerSize) -> ChartResult<()> {
        let size = size.validate()?;
        self.chart_mut(chart)?.options.size = size;
        self.ledger.resizes += 1;
        Ok(())
    }

    fn remove_chart(&mut self, chart: ChartId) -> ChartResult<()> {
        let removed = self
            .charts
            .shift_remove(&chart)
            .ok_or(ChartError::UnknownChart(chart.0))?;
        self.series_owner.retain(|_, owner| *owner != chart);
        self.ledger.charts_removed += 1;
        debug!(%chart, series = removed.series.len(), "chart removed");
        Ok(())
    }
}

fn validate_series_times(data: &SeriesData) -> ChartResult<()> {
    let times = data.times();
    if times.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ChartError::InvalidData(
            "series times must be strictly ascending".to_owned(),
        ));
    }
    Ok(())
}
