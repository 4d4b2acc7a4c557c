use tracing::trace;

use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Renderer that draws nothing and counts what it was given.
///
/// Frames are still validated, so headless hosts catch broken geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_rect_count: usize,
    pub last_arrow_count: usize,
    pub last_primitive_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_rect_count = frame.rects.len();
        self.last_arrow_count = frame.triangles.len();
        self.last_primitive_count = frame.primitive_count();
        trace!(
            frame = self.frames_rendered,
            primitives = self.last_primitive_count,
            "frame discarded"
        );
        Ok(())
    }
}
