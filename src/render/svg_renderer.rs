use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{ChartError, ChartResult};
use crate::render::svg_writer::write_svg;
use crate::render::{RenderFrame, Renderer};

/// Serializes every rendered frame to an SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the last rendered frame.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> ChartResult<()> {
        let path = path.as_ref();
        let io_error = |error: std::io::Error| {
            ChartError::InvalidData(format!("failed to write `{}`: {error}", path.display()))
        };
        let mut file = File::create(path).map_err(io_error)?;
        file.write_all(self.document.as_bytes()).map_err(io_error)
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> ChartResult<()> {
        frame.validate()?;
        self.document = write_svg(frame.surface.root());
        Ok(())
    }
}
