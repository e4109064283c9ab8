use crate::components::{Component, RenderContext, position};
use crate::core::datum::Datum;
use crate::core::shape::{Curve, line_path};
use crate::core::transform::nest_by;
use crate::error::ChartResult;
use crate::render::KEY_ATTR;

/// One `g.lineSeries > path.line` per series key.
#[derive(Debug, Clone)]
pub struct Lineset {
    curve: Curve,
}

impl Default for Lineset {
    fn default() -> Self {
        Self::new()
    }
}

impl Lineset {
    pub const CLASS: &'static str = "lineSeries";

    #[must_use]
    pub fn new() -> Self {
        Self {
            curve: Curve::MonotoneX,
        }
    }
}

impl Component for Lineset {
    fn name(&self) -> &'static str {
        "lineset"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        self.curve = Curve::from_name(ctx.config.str_or("curve", "monotoneX"))?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let y_field = ctx.property("propertyY", "y");
        let key_field = ctx.property("propertyKey", "key");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());

        let mut lines = Vec::new();
        for group in nest_by(data, &key_field) {
            let key = group.key.unwrap_or_default();
            let points: Vec<(f64, f64)> = group
                .values
                .iter()
                .filter_map(|datum| position(&x, &y, datum, &x_field, &y_field))
                .collect();
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            lines.push((key, color, opacity, line_path(&points, self.curve)));
        }

        let keys: Vec<String> = lines.iter().map(|line| line.0.clone()).collect();
        let plot = ctx.plot();
        plot.retain_keyed(Self::CLASS, KEY_ATTR, &keys);
        for (key, color, opacity, d) in lines {
            let series = plot.upsert_keyed("g", Self::CLASS, KEY_ATTR, &key);
            series
                .set_attr("stroke", color.clone())
                .set_style("opacity", opacity);
            let path = series.ensure_child("path", "line");
            path.set_attr("d", d)
                .set_style("stroke", color)
                .set_style("stroke-width", "1.9")
                .set_style("fill", "none");
        }
        Ok(())
    }
}
