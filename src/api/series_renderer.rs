use tracing::{debug, warn};

use crate::api::{ChartHandle, ChartStyle};
use crate::core::{Bar, ChartMode, ContainerSize, IndicatorSet, TimeAxisMap, dense_samples};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CandlePoint, ChartBackend, ChartId, ChartOptions, HistogramPoint, HistogramSeriesOptions,
    LinePoint, LineSeriesOptions, PriceLine, PriceScaleId, SeriesId,
};

/// Builds a complete chart for `bars` on `backend`.
///
/// Candles and volume are always built; historical charts also get the SMA
/// overlays and the support/resistance price lines. The visible range is
/// fitted to the loaded bars. If any step fails the partially built chart
/// is removed before the error is returned.
pub fn build_chart<B: ChartBackend + ?Sized>(
    backend: &mut B,
    bars: &[Bar],
    axis: &TimeAxisMap,
    indicators: &IndicatorSet,
    size: ContainerSize,
    style: &ChartStyle,
) -> ChartResult<ChartHandle> {
    if axis.len() != bars.len() {
        return Err(ChartError::InvalidData(format!(
            "time axis has {} coordinates for {} bars",
            axis.len(),
            bars.len()
        )));
    }
    if axis.mode() == ChartMode::Historical {
        indicators.validate_alignment(bars.len())?;
    }

    let chart = backend.create_chart(&ChartOptions {
        size,
        background_color: style.background_color,
        text_color: style.text_color,
    })?;

    match populate_chart(backend, chart, bars, axis, indicators, style) {
        Ok(handle) => {
            debug!(
                %chart,
                mode = %axis.mode(),
                bars = bars.len(),
                overlays = handle.overlays().len(),
                "chart built"
            );
            Ok(handle)
        }
        Err(err) => {
            if let Err(cleanup) = backend.remove_chart(chart) {
                warn!(%chart, error = %cleanup, "failed to remove partially built chart");
            }
            Err(err)
        }
    }
}

fn populate_chart<B: ChartBackend + ?Sized>(
    backend: &mut B,
    chart: ChartId,
    bars: &[Bar],
    axis: &TimeAxisMap,
    indicators: &IndicatorSet,
    style: &ChartStyle,
) -> ChartResult<ChartHandle> {
    let candles = backend.add_candlestick_series(chart, candle_points(bars, axis, style))?;
    let volume = backend.add_histogram_series(
        chart,
        HistogramSeriesOptions {
            price_scale: PriceScaleId::Volume,
            margins: style.volume_margins,
        },
        volume_points(bars, axis, style),
    )?;

    let overlays = match axis.mode() {
        ChartMode::Historical => {
            add_indicator_overlays(backend, chart, candles, axis, indicators, style)?
        }
        ChartMode::Intraday => Vec::new(),
    };

    backend.fit_content(chart)?;
    Ok(ChartHandle::new(
        chart,
        candles,
        volume,
        overlays,
        axis.mode(),
        bars.len(),
    ))
}

fn add_indicator_overlays<B: ChartBackend + ?Sized>(
    backend: &mut B,
    chart: ChartId,
    candles: SeriesId,
    axis: &TimeAxisMap,
    indicators: &IndicatorSet,
    style: &ChartStyle,
) -> ChartResult<Vec<SeriesId>> {
    let mut overlays = Vec::new();
    for (title, values, color) in [
        ("SMA 50", &indicators.sma_50, style.sma_50_color),
        ("SMA 200", &indicators.sma_200, style.sma_200_color),
    ] {
        let points = line_points(values, axis);
        if points.is_empty() {
            continue;
        }
        let options = LineSeriesOptions {
            title: title.to_owned(),
            color,
            line_width: style.sma_line_width,
        };
        overlays.push(backend.add_line_series(chart, options, points)?);
    }

    for (title, level, color) in [
        ("Support", indicators.support, style.support_color),
        ("Resistance", indicators.resistance, style.resistance_color),
    ] {
        let Some(price) = level else {
            continue;
        };
        backend.create_price_line(
            candles,
            PriceLine {
                price,
                color,
                line_width: style.price_line_width,
                stroke_style: style.price_line_style,
                title: title.to_owned(),
            },
        )?;
    }
    Ok(overlays)
}

/// One candle per bar, colored by direction.
#[must_use]
pub fn candle_points(bars: &[Bar], axis: &TimeAxisMap, style: &ChartStyle) -> Vec<CandlePoint> {
    bars.iter()
        .zip(axis.coordinates())
        .map(|(bar, time)| {
            let bullish = bar.is_bullish();
            CandlePoint {
                time: time.clone(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                color: style.body_color(bullish),
                wick_color: style.wick_color(bullish),
            }
        })
        .collect()
}

/// One volume bar per bar, tinted with the candle color.
#[must_use]
pub fn volume_points(bars: &[Bar], axis: &TimeAxisMap, style: &ChartStyle) -> Vec<HistogramPoint> {
    bars.iter()
        .zip(axis.coordinates())
        .map(|(bar, time)| HistogramPoint {
            time: time.clone(),
            value: bar.volume,
            color: style.volume_color(bar.is_bullish()),
        })
        .collect()
}

/// Line points for the defined entries of a bar-aligned indicator array.
#[must_use]
pub fn line_points(values: &[Option<f64>], axis: &TimeAxisMap) -> Vec<LinePoint> {
    dense_samples(values)
        .filter_map(|(index, value)| {
            axis.coordinate_at(index).map(|time| LinePoint {
                time: time.clone(),
                value,
            })
        })
        .collect()
}
