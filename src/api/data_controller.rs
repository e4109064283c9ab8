use serde_json::Value;
use tracing::{debug, trace};

use crate::core::datum::{Datum, datums_from_json};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer};
use crate::strategy::Incoming;

use super::{Chart, ChartKind};

/// Bar chart layout switched through [`Chart::fire_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLayout {
    Grouped,
    Stacked,
}

impl<R: Renderer> Chart<R> {
    /// Draws the stored dataset.
    ///
    /// The strategy coerces and orders a copy; the stored datums keep their
    /// raw field values.
    pub fn draw(&mut self) -> ChartResult<()> {
        let mut snapshot = self.data.clone();
        self.strategy.prepare(self.container.config(), &mut snapshot);
        self.container.update_components(&snapshot)?;
        debug!(kind = self.kind.name(), count = snapshot.len(), "chart drawn");
        self.render()
    }

    /// Replaces the dataset and draws it.
    pub fn draw_data(&mut self, data: Vec<Datum>) -> ChartResult<()> {
        self.data = data;
        self.draw()
    }

    /// Merges pushed datums the way the chart kind does (append, sliding
    /// window, upsert, latest only) and redraws.
    pub fn keep_drawing(&mut self, incoming: impl Into<Incoming>) -> ChartResult<()> {
        let incoming = incoming.into();
        trace!(kind = self.kind.name(), incoming = incoming.len(), "keep drawing");
        self.strategy
            .keep_drawing(self.container.config(), &mut self.data, incoming);
        self.draw()
    }

    /// `keep_drawing` for a JSON payload: an object is one datum, an array
    /// a batch.
    pub fn keep_drawing_json(&mut self, payload: Value) -> ChartResult<()> {
        let incoming = match payload {
            Value::Array(_) => Incoming::Many(datums_from_json(payload)?),
            single => Incoming::One(Datum::from_json(single)?),
        };
        self.keep_drawing(incoming)
    }

    /// Switches a bar chart between grouped and stacked bars.
    pub fn fire_transition(&mut self, layout: BarLayout) -> ChartResult<()> {
        if self.kind != ChartKind::Barchart {
            return Err(ChartError::config(
                "stacked",
                format!("layout transitions only apply to bar charts, not {}", self.kind.name()),
            ));
        }
        let stacked = layout == BarLayout::Stacked;
        self.container.context_mut().config.put("stacked", stacked);
        debug!(stacked, "bar layout transition");
        self.draw()
    }

    #[must_use]
    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    /// Hands the current surface (and canvas, if any) to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        let mut frame = RenderFrame::new(self.container.surface());
        if let Some(canvas) = self.container.canvas() {
            frame = frame.with_canvas(canvas);
        }
        self.renderer.render(&frame)
    }
}
