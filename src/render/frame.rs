use crate::error::ChartResult;
use crate::render::canvas::CanvasLayer;
use crate::render::scene::Surface;

/// Everything a backend needs for one draw pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub surface: &'a Surface,
    pub canvas: Option<&'a CanvasLayer>,
}

impl<'a> RenderFrame<'a> {
    #[must_use]
    pub fn new(surface: &'a Surface) -> Self {
        Self {
            surface,
            canvas: None,
        }
    }

    #[must_use]
    pub fn with_canvas(mut self, canvas: &'a CanvasLayer) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.surface.validate()?;
        if let Some(canvas) = self.canvas {
            canvas.validate()?;
        }
        Ok(())
    }
}
