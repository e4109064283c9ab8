use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates the frame so tests catch invalid geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_node_count: usize,
    pub last_stamp_count: usize,
    pub render_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()> {
        frame.validate()?;
        self.last_node_count = frame.surface.root().count();
        self.last_stamp_count = frame.canvas.map_or(0, |canvas| canvas.stamps().len());
        self.render_count += 1;
        Ok(())
    }
}
