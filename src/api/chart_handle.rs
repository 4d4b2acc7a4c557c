use tracing::debug;

use crate::core::ChartMode;
use crate::error::ChartResult;
use crate::render::{ChartBackend, ChartId, SeriesId};

/// Backend ids of one built chart and every series it owns.
///
/// `dispose` consumes the handle, so a chart is removed at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    chart: ChartId,
    candles: SeriesId,
    volume: SeriesId,
    overlays: Vec<SeriesId>,
    mode: ChartMode,
    bar_count: usize,
}

impl ChartHandle {
    pub(crate) fn new(
        chart: ChartId,
        candles: SeriesId,
        volume: SeriesId,
        overlays: Vec<SeriesId>,
        mode: ChartMode,
        bar_count: usize,
    ) -> Self {
        Self {
            chart,
            candles,
            volume,
            overlays,
            mode,
            bar_count,
        }
    }

    #[must_use]
    pub fn chart(&self) -> ChartId {
        self.chart
    }

    /// Candlestick series; markers and price lines attach here.
    #[must_use]
    pub fn candles(&self) -> SeriesId {
        self.candles
    }

    #[must_use]
    pub fn volume(&self) -> SeriesId {
        self.volume
    }

    /// SMA line series, empty for intraday charts.
    #[must_use]
    pub fn overlays(&self) -> &[SeriesId] {
        &self.overlays
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        self.mode
    }

    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Removes the chart and its series from `backend`.
    pub fn dispose<B: ChartBackend + ?Sized>(self, backend: &mut B) -> ChartResult<()> {
        backend.remove_chart(self.chart)?;
        debug!(chart = %self.chart, mode = %self.mode, "chart disposed");
        Ok(())
    }
}
