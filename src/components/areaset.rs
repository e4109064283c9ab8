use crate::components::{Component, RenderContext, position};
use crate::core::datum::Datum;
use crate::core::shape::{Curve, area_path};
use crate::core::transform::nest_by;
use crate::error::ChartResult;
use crate::render::KEY_ATTR;

/// Filled area under each line series (`g.area > path.areaPath`).
#[derive(Debug, Clone)]
pub struct Areaset {
    curve: Curve,
    opacity: f64,
}

impl Default for Areaset {
    fn default() -> Self {
        Self::new()
    }
}

impl Areaset {
    pub const CLASS: &'static str = "area";

    #[must_use]
    pub fn new() -> Self {
        Self {
            curve: Curve::MonotoneX,
            opacity: 0.0,
        }
    }
}

impl Component for Areaset {
    fn name(&self) -> &'static str {
        "areaset"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        self.curve = Curve::from_name(ctx.config.str_or("curve", "monotoneX"))?;
        self.opacity = ctx.config.f64_or("areaOpacity", 0.0)?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let y_field = ctx.property("propertyY", "y");
        let key_field = ctx.property("propertyKey", "key");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());
        let baseline = ctx.height;

        let mut areas = Vec::new();
        for group in nest_by(data, &key_field) {
            let key = group.key.unwrap_or_default();
            let points: Vec<(f64, f64, f64)> = group
                .values
                .iter()
                .filter_map(|datum| position(&x, &y, datum, &x_field, &y_field))
                .map(|(px, py)| (px, baseline, py))
                .collect();
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            areas.push((key, color, opacity, area_path(&points, self.curve)));
        }

        let keys: Vec<String> = areas.iter().map(|area| area.0.clone()).collect();
        let fill_opacity = self.opacity.to_string();
        let plot = ctx.plot();
        plot.retain_keyed(Self::CLASS, KEY_ATTR, &keys);
        for (key, color, opacity, d) in areas {
            let series = plot.upsert_keyed("g", Self::CLASS, KEY_ATTR, &key);
            series.set_style("opacity", opacity);
            series
                .ensure_child("path", "areaPath")
                .set_attr("d", d)
                .set_style("fill", color)
                .set_style("fill-opacity", fill_opacity.clone());
        }
        Ok(())
    }
}
