use serde::{Deserialize, Serialize};

use crate::core::IntradayOffset;
use crate::error::{ChartError, ChartResult};
use crate::extensions::MarkerStyle;
use crate::interaction::NavigationConfig;
use crate::render::{Color, LineStrokeStyle, ScaleMargins};

/// Colors and widths of the series a chart view builds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_up_color")]
    pub up_color: Color,
    #[serde(default = "default_down_color")]
    pub down_color: Color,
    #[serde(default = "default_up_wick_color")]
    pub up_wick_color: Color,
    #[serde(default = "default_down_wick_color")]
    pub down_wick_color: Color,
    /// Opacity applied to candle colors when coloring volume bars.
    #[serde(default = "default_volume_alpha")]
    pub volume_alpha: f64,
    #[serde(default = "default_volume_margins")]
    pub volume_margins: ScaleMargins,
    #[serde(default = "default_sma_50_color")]
    pub sma_50_color: Color,
    #[serde(default = "default_sma_200_color")]
    pub sma_200_color: Color,
    #[serde(default = "default_sma_line_width")]
    pub sma_line_width: f64,
    #[serde(default = "default_support_color")]
    pub support_color: Color,
    #[serde(default = "default_resistance_color")]
    pub resistance_color: Color,
    #[serde(default = "default_price_line_width")]
    pub price_line_width: f64,
    #[serde(default = "default_price_line_style")]
    pub price_line_style: LineStrokeStyle,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            text_color: default_text_color(),
            up_color: default_up_color(),
            down_color: default_down_color(),
            up_wick_color: default_up_wick_color(),
            down_wick_color: default_down_wick_color(),
            volume_alpha: default_volume_alpha(),
            volume_margins: default_volume_margins(),
            sma_50_color: default_sma_50_color(),
            sma_200_color: default_sma_200_color(),
            sma_line_width: default_sma_line_width(),
            support_color: default_support_color(),
            resistance_color: default_resistance_color(),
            price_line_width: default_price_line_width(),
            price_line_style: default_price_line_style(),
        }
    }
}

impl ChartStyle {
    /// Candle body color for a bar direction.
    #[must_use]
    pub fn body_color(self, bullish: bool) -> Color {
        if bullish { self.up_color } else { self.down_color }
    }

    #[must_use]
    pub fn wick_color(self, bullish: bool) -> Color {
        if bullish {
            self.up_wick_color
        } else {
            self.down_wick_color
        }
    }

    /// Volume bar color: the candle color at `volume_alpha` opacity.
    #[must_use]
    pub fn volume_color(self, bullish: bool) -> Color {
        self.body_color(bullish).with_alpha(self.volume_alpha)
    }

    pub fn validate(self) -> ChartResult<Self> {
        for color in [
            self.background_color,
            self.text_color,
            self.up_color,
            self.down_color,
            self.up_wick_color,
            self.down_wick_color,
            self.sma_50_color,
            self.sma_200_color,
            self.support_color,
            self.resistance_color,
        ] {
            color.validate()?;
        }

        if !self.volume_alpha.is_finite() || !(0.0..=1.0).contains(&self.volume_alpha) {
            return Err(ChartError::InvalidData(
                "volume alpha must be finite and in [0, 1]".to_owned(),
            ));
        }

        let margins = self.volume_margins;
        if !margins.top.is_finite()
            || !margins.bottom.is_finite()
            || margins.top < 0.0
            || margins.bottom < 0.0
            || margins.top + margins.bottom >= 1.0
        {
            return Err(ChartError::InvalidData(
                "volume margins must be >= 0 and sum to < 1".to_owned(),
            ));
        }

        for (value, name) in [
            (self.sma_line_width, "sma_line_width"),
            (self.price_line_width, "price_line_width"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "chart style `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Serializable setup of a [`crate::api::ChartView`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartViewConfig {
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub markers: MarkerStyle,
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Wall-clock offset of intraday source keys, seconds east of UTC.
    #[serde(default = "default_intraday_offset_seconds")]
    pub intraday_offset_seconds: i32,
}

impl Default for ChartViewConfig {
    fn default() -> Self {
        Self {
            style: ChartStyle::default(),
            markers: MarkerStyle::default(),
            navigation: NavigationConfig::default(),
            intraday_offset_seconds: default_intraday_offset_seconds(),
        }
    }
}

impl ChartViewConfig {
    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_marker_style(mut self, markers: MarkerStyle) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: NavigationConfig) -> Self {
        self.navigation = navigation;
        self
    }

    #[must_use]
    pub fn with_intraday_offset_seconds(mut self, seconds_east: i32) -> Self {
        self.intraday_offset_seconds = seconds_east;
        self
    }

    pub fn intraday_offset(self) -> ChartResult<IntradayOffset> {
        IntradayOffset::from_seconds_east(self.intraday_offset_seconds)
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.style.validate()?;
        self.markers.validate()?;
        self.intraday_offset()?;
        Ok(self)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_background_color() -> Color {
    Color::rgb8(0x0f, 0x17, 0x2a)
}

fn default_text_color() -> Color {
    Color::rgb8(0xcb, 0xd5, 0xe1)
}

fn default_up_color() -> Color {
    Color::rgb8(0x26, 0xa6, 0x9a)
}

fn default_down_color() -> Color {
    Color::rgb8(0xef, 0x53, 0x50)
}

fn default_up_wick_color() -> Color {
    default_up_color().lighten(0.35)
}

fn default_down_wick_color() -> Color {
    default_down_color().lighten(0.35)
}

fn default_volume_alpha() -> f64 {
    0.5
}

fn default_volume_margins() -> ScaleMargins {
    ScaleMargins {
        top: 0.8,
        bottom: 0.0,
    }
}

fn default_sma_50_color() -> Color {
    Color::rgb8(0x3b, 0x82, 0xf6)
}

fn default_sma_200_color() -> Color {
    Color::rgb8(0xa8, 0x55, 0xf7)
}

fn default_sma_line_width() -> f64 {
    2.0
}

fn default_support_color() -> Color {
    Color::rgb8(0x22, 0xc5, 0x5e)
}

fn default_resistance_color() -> Color {
    Color::rgb8(0xef, 0x44, 0x44)
}

fn default_price_line_width() -> f64 {
    1.0
}

fn default_price_line_style() -> LineStrokeStyle {
    LineStrokeStyle::Dashed
}

fn default_intraday_offset_seconds() -> i32 {
    IntradayOffset::IST.seconds_east()
}
