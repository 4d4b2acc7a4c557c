use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

fn require_finite(what: &str, values: &[f64]) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

/// Straight-alpha color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from 8-bit channels, e.g. `Color::rgb8(0x26, 0xa6, 0x9a)`.
    #[must_use]
    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Mixes `amount` of white into the color. Alpha is untouched.
    #[must_use]
    pub fn lighten(self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let towards_white = |channel: f64| channel + (1.0 - channel) * t;
        Self::rgba(
            towards_white(self.red),
            towards_white(self.green),
            towards_white(self.blue),
            self.alpha,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        let channels = [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ];
        match channels
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            // NaN fails `contains`, so this also rejects non-finite channels.
            Some((name, value)) => Err(ChartError::InvalidData(format!(
                "color channel `{name}` is {value}, expected a value in [0, 1]"
            ))),
            None => Ok(()),
        }
    }
}

/// Dash pattern of a stroked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Stroked segment from `(x1, y1)` to `(x2, y2)`: a wick, an indicator
/// step or a price line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub stroke_style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        require_finite("segment endpoints", &[self.x1, self.y1, self.x2, self.y2])?;
        if !(self.stroke_width > 0.0 && self.stroke_width.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "stroke width {} is not a positive finite value",
                self.stroke_width
            )));
        }
        self.color.validate()
    }
}

/// Filled box for a candle body or a volume bar; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
        }
    }

    /// Spans two opposite corners given in any order.
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, fill_color: Color) -> Self {
        Self::new(
            x1.min(x2),
            y1.min(y2),
            (x2 - x1).abs(),
            (y2 - y1).abs(),
            fill_color,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        require_finite("box geometry", &[self.x, self.y, self.width, self.height])?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "box extent {}x{} is negative",
                self.width, self.height
            )));
        }
        self.fill_color.validate()
    }
}

/// Arrow glyph of a pattern marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrianglePrimitive {
    pub points: [(f64, f64); 3],
    pub fill_color: Color,
}

impl TrianglePrimitive {
    pub fn validate(self) -> ChartResult<()> {
        let [(ax, ay), (bx, by), (cx, cy)] = self.points;
        require_finite("arrow vertices", &[ax, ay, bx, by, cx, cy])?;
        self.fill_color.validate()
    }
}

/// Anchor of a label relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Marker caption or price-line title.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.trim().is_empty() {
            return Err(ChartError::InvalidData("blank label".to_owned()));
        }
        require_finite("label anchor", &[self.x, self.y])?;
        if !(self.font_size_px > 0.0 && self.font_size_px.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "label `{}` has font size {}",
                self.text, self.font_size_px
            )));
        }
        self.color.validate()
    }
}
