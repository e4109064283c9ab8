mod canvas;
mod frame;
mod null_renderer;
mod scene;
mod svg_renderer;
mod svg_writer;

pub use canvas::{CanvasLayer, MarkerStamp};
pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use scene::{KEY_ATTR, LEGEND_KEY_ATTR, Surface, SvgNode, translate};
pub use svg_renderer::SvgRenderer;
pub use svg_writer::{escape, write_svg};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive the finished scene after every draw so drawing code
/// stays isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()>;
}
