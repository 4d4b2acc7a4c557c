use crate::core::ContainerSize;
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive, TrianglePrimitive};

/// Everything one chart paints in a single pass, in pixel space.
///
/// A renderer paints the groups back to front: boxes (background, volume,
/// candle bodies), segments (wicks, overlays, price lines), marker arrows,
/// then labels on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub size: ContainerSize,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub triangles: Vec<TrianglePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: ContainerSize) -> Self {
        Self {
            size,
            rects: Vec::new(),
            lines: Vec::new(),
            triangles: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Rejects the frame on the first primitive with broken geometry or color.
    pub fn validate(&self) -> ChartResult<()> {
        self.size.validate()?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.triangles
            .iter()
            .try_for_each(|triangle| triangle.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len() + self.lines.len() + self.triangles.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
