use std::f64::consts::TAU;

use crate::components::{Component, RadialScales, RenderContext};
use crate::core::datum::Datum;
use crate::core::scale::{LinearScale, SqrtScale};
use crate::error::ChartResult;

/// Angle and radius scales of the sunburst. Draws nothing.
#[derive(Debug, Clone, Default)]
pub struct RadialAxes;

impl RadialAxes {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Component for RadialAxes {
    fn name(&self) -> &'static str {
        "radial-axes"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let radius = (ctx.width.min(ctx.height) / 2.0 - 10.0).max(0.0);
        ctx.radial = Some(RadialScales {
            angle: LinearScale::new((0.0, 1.0), (0.0, TAU))?,
            radius: SqrtScale::new((0.0, 1.0), (0.0, radius))?,
        });
        Ok(())
    }

    fn update(&mut self, _ctx: &mut RenderContext, _data: &[Datum]) -> ChartResult<()> {
        Ok(())
    }
}
