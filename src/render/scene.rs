use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, LogicalRange, TimeCoordinate};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{Marker, MarkerPosition, MarkerShape};
use crate::render::{
    HeadlessChart, LinePrimitive, PriceScaleId, RectPrimitive, RenderFrame, SeriesData,
    TextHAlign, TextPrimitive, TrianglePrimitive,
};

/// Geometry tuning for scene projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub price_padding_ratio: f64,
    pub body_width_ratio: f64,
    pub min_body_width_px: f64,
    pub wick_width_px: f64,
    pub marker_base_size_px: f64,
    pub marker_gap_px: f64,
    pub font_size_px: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            price_padding_ratio: 0.1,
            body_width_ratio: 0.6,
            min_body_width_px: 1.0,
            wick_width_px: 1.0,
            marker_base_size_px: 8.0,
            marker_gap_px: 4.0,
            font_size_px: 11.0,
        }
    }
}

impl SceneConfig {
    fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.body_width_ratio, "body_width_ratio"),
            (self.min_body_width_px, "min_body_width_px"),
            (self.wick_width_px, "wick_width_px"),
            (self.marker_base_size_px, "marker_base_size_px"),
            (self.marker_gap_px, "marker_gap_px"),
            (self.font_size_px, "font_size_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "scene config `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.price_padding_ratio.is_finite() || self.price_padding_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "scene config `price_padding_ratio` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Projects a retained chart into one frame of draw primitives.
///
/// Bars are laid out by logical index inside the visible range. Only items
/// whose index falls inside the range are emitted. The main price scale
/// autoscales to visible candles and overlays; the volume scale fills its
/// own band below the configured top margin.
pub fn build_scene_frame(chart: &HeadlessChart, config: &SceneConfig) -> ChartResult<RenderFrame> {
    let config = config.validate()?;
    let size = chart.options.size.validate()?;
    let mut frame = RenderFrame::new(size);

    let index = chart.time_index();
    if index.is_empty() {
        return Ok(frame);
    }

    let width_px = f64::from(size.width);
    let height_px = f64::from(size.height);
    let range = chart
        .visible_range
        .unwrap_or_else(|| LogicalRange::new(-0.5, index.len() as f64 - 0.5));
    let (from, to) = if range.width() > 0.0 {
        (range.from, range.to)
    } else {
        (range.from - 0.5, range.to + 0.5)
    };
    let x_scale = LinearScale::new(from, to, width_px)?;
    let bar_spacing = width_px / (to - from);
    let body_width = (bar_spacing * config.body_width_ratio).max(config.min_body_width_px);
    let visible = |i: usize| (i as f64) >= from - 0.5 && (i as f64) <= to + 0.5;
    let slot = |time: &TimeCoordinate| index.get(time).copied().filter(|i| visible(*i));

    frame.rects.push(RectPrimitive::new(
        0.0,
        0.0,
        width_px,
        height_px,
        chart.options.background_color,
    ));

    let price_scale = main_price_scale(chart, &slot, height_px, config)?;

    for series in &chart.series {
        match &series.data {
            SeriesData::Histogram { options, points } => {
                let top = height_px * options.margins.top;
                let band = height_px * (1.0 - options.margins.top - options.margins.bottom);
                let max = points
                    .iter()
                    .filter(|p| slot(&p.time).is_some())
                    .map(|p| OrderedFloat(p.value.abs()))
                    .max()
                    .map_or(1.0, |v| v.0.max(f64::EPSILON));
                let scale = match options.price_scale {
                    PriceScaleId::Volume => LinearScale::for_prices(0.0, max, top, band, 0.0)?,
                    PriceScaleId::Main => price_scale,
                };
                let base_y = scale.to_pixel(0.0)?;
                for point in points {
                    let Some(i) = slot(&point.time) else { continue };
                    let x = x_scale.to_pixel(i as f64)?;
                    let y = scale.to_pixel(point.value)?;
                    frame.rects.push(RectPrimitive::from_corners(
                        x - 0.5 * body_width,
                        y,
                        x + 0.5 * body_width,
                        base_y,
                        point.color,
                    ));
                }
            }
            SeriesData::Candlestick(points) => {
                for point in points {
                    let Some(i) = slot(&point.time) else { continue };
                    let x = x_scale.to_pixel(i as f64)?;
                    let high = price_scale.to_pixel(point.high)?;
                    let low = price_scale.to_pixel(point.low)?;
                    let open = price_scale.to_pixel(point.open)?;
                    let close = price_scale.to_pixel(point.close)?;
                    frame.lines.push(LinePrimitive::new(
                        x,
                        high,
                        x,
                        low,
                        config.wick_width_px,
                        point.wick_color,
                    ));
                    frame.rects.push(RectPrimitive::from_corners(
                        x - 0.5 * body_width,
                        open,
                        x + 0.5 * body_width,
                        close,
                        point.color,
                    ));
                }
            }
            SeriesData::Line { options, points } => {
                let mut previous: Option<(f64, f64)> = None;
                for point in points {
                    let Some(i) = slot(&point.time) else {
                        previous = None;
                        continue;
                    };
                    let x = x_scale.to_pixel(i as f64)?;
                    let y = price_scale.to_pixel(point.value)?;
                    if let Some((px, py)) = previous {
                        frame.lines.push(LinePrimitive::new(
                            px,
                            py,
                            x,
                            y,
                            options.line_width,
                            options.color,
                        ));
                    }
                    previous = Some((x, y));
                }
            }
        }

        for line in &series.price_lines {
            let y = price_scale.to_pixel(line.price)?;
            frame.lines.push(
                LinePrimitive::new(0.0, y, width_px, y, line.line_width, line.color)
                    .with_stroke_style(line.stroke_style),
            );
            if !line.title.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    line.title.clone(),
                    width_px - config.marker_gap_px,
                    y - config.marker_gap_px,
                    config.font_size_px,
                    line.color,
                    TextHAlign::Right,
                ));
            }
        }
    }

    project_markers(chart, &slot, x_scale, price_scale, config, &mut frame)?;
    Ok(frame)
}

fn main_price_scale(
    chart: &HeadlessChart,
    slot: &impl Fn(&TimeCoordinate) -> Option<usize>,
    height_px: f64,
    config: SceneConfig,
) -> ChartResult<LinearScale> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for series in &chart.series {
        match &series.data {
            SeriesData::Candlestick(points) => {
                for point in points.iter().filter(|p| slot(&p.time).is_some()) {
                    min = min.min(point.low);
                    max = max.max(point.high);
                }
            }
            SeriesData::Line { points, .. } => {
                for point in points.iter().filter(|p| slot(&p.time).is_some()) {
                    min = min.min(point.value);
                    max = max.max(point.value);
                }
            }
            SeriesData::Histogram { .. } => {}
        }
    }
    if !min.is_finite() || !max.is_finite() {
        // Nothing visible on the main scale; keep a unit domain.
        min = 0.0;
        max = 1.0;
    }
    LinearScale::for_prices(min, max, 0.0, height_px, config.price_padding_ratio)
}

fn project_markers(
    chart: &HeadlessChart,
    slot: &impl Fn(&TimeCoordinate) -> Option<usize>,
    x_scale: LinearScale,
    price_scale: LinearScale,
    config: SceneConfig,
    frame: &mut RenderFrame,
) -> ChartResult<()> {
    let Some(candles) = chart.candlestick_series() else {
        return Ok(());
    };
    let SeriesData::Candlestick(points) = &candles.data else {
        return Ok(());
    };
    let anchors: IndexMap<&TimeCoordinate, (f64, f64, f64)> = points
        .iter()
        .map(|p| (&p.time, (p.high, p.low, p.close)))
        .collect();

    // Markers sharing a bar and side stack away from the candle.
    let mut stacks: IndexMap<(usize, MarkerPosition), f64> = IndexMap::new();
    for marker in chart.markers() {
        let Some(i) = slot(&marker.time) else { continue };
        let Some(&(high, low, close)) = anchors.get(&marker.time) else {
            continue;
        };

        let x = x_scale.to_pixel(i as f64)?;
        let glyph = config.marker_base_size_px * marker.size;
        let stack = stacks.entry((i, marker.position)).or_insert(0.0);
        let offset = *stack;
        *stack += glyph + config.marker_gap_px + config.font_size_px;

        let center_y = match marker.position {
            MarkerPosition::AboveBar => {
                price_scale.to_pixel(high)? - config.marker_gap_px - 0.5 * glyph - offset
            }
            MarkerPosition::BelowBar => {
                price_scale.to_pixel(low)? + config.marker_gap_px + 0.5 * glyph + offset
            }
            MarkerPosition::InBar => price_scale.to_pixel(close)? + offset,
        };

        push_glyph(marker, x, center_y, glyph, frame);

        if !marker.text.is_empty() {
            let text_y = match marker.position {
                MarkerPosition::AboveBar => center_y - 0.5 * glyph - config.marker_gap_px,
                MarkerPosition::BelowBar | MarkerPosition::InBar => {
                    center_y + 0.5 * glyph + config.marker_gap_px + config.font_size_px
                }
            };
            frame.texts.push(TextPrimitive::new(
                marker.text.clone(),
                x,
                text_y,
                config.font_size_px,
                marker.color,
                TextHAlign::Center,
            ));
        }
    }
    Ok(())
}

fn push_glyph(marker: &Marker, x: f64, y: f64, glyph: f64, frame: &mut RenderFrame) {
    let half = 0.5 * glyph;
    match marker.shape {
        MarkerShape::ArrowUp => frame.triangles.push(TrianglePrimitive {
            points: [(x, y - half), (x - half, y + half), (x + half, y + half)],
            fill_color: marker.color,
        }),
        MarkerShape::ArrowDown => frame.triangles.push(TrianglePrimitive {
            points: [(x, y + half), (x - half, y - half), (x + half, y - half)],
            fill_color: marker.color,
        }),
        MarkerShape::Square => frame.rects.push(RectPrimitive::new(
            x - half,
            y - half,
            glyph,
            glyph,
            marker.color,
        )),
    }
}
