use crate::components::dial::GaugeGeometry;
use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::core::shape::num;
use crate::error::ChartResult;
use crate::render::{SvgNode, translate};

const NEEDLE_FILL: &str = "#666666";

/// Needle pointing at the latest `propertyValue`, with its nut.
#[derive(Debug, Clone, Default)]
pub struct DialNeedle {
    value: f64,
}

impl DialNeedle {
    pub const CLASS: &'static str = "needle";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the needle currently points at.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    fn needle_attrs(ctx: &RenderContext, value: f64) -> ChartResult<(String, String)> {
        let geometry = GaugeGeometry::from_context(ctx)?;
        let nut = ctx.config.f64_or("needleNutRadius", 25.0)?;
        let length = ctx.config.f64_or("needleLenghtRatio", 0.8)? * geometry.radius;
        let r = geometry.radius;
        let transform = format!(
            "{} rotate({})",
            translate(r, r),
            num(geometry.needle_rotation(value)?)
        );
        let d = format!(
            "M {} 0 L 0 {} L {} 0",
            num(-nut),
            num(-length),
            num(nut)
        );
        Ok((transform, d))
    }
}

impl Component for DialNeedle {
    fn name(&self) -> &'static str {
        "dial-needle"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        self.value = ctx.config.f64_or("minLevel", 0.0)?;
        let (transform, d) = Self::needle_attrs(ctx, self.value)?;
        let r = GaugeGeometry::from_context(ctx)?.radius;
        let nut = ctx.config.f64_or("needleNutRadius", 25.0)?;
        let plot = ctx.plot();
        plot.remove_class(Self::CLASS);
        plot.append(SvgNode::new("path").with_class(Self::CLASS))
            .set_attr("transform", transform)
            .set_attr("d", d)
            .set_style("fill", NEEDLE_FILL);
        plot.append(SvgNode::new("circle").with_class(Self::CLASS))
            .set_attr("transform", translate(r, r))
            .set_num("cx", 0.0)
            .set_num("cy", 0.0)
            .set_num("r", nut)
            .set_style("fill", NEEDLE_FILL);
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let value_field = ctx.property("propertyValue", "value");
        let Some(value) = data.last().and_then(|datum| datum.number(&value_field)) else {
            return Ok(());
        };
        self.value = value;
        let (transform, d) = Self::needle_attrs(ctx, value)?;
        let needle = ctx.plot().find_mut(&|node: &SvgNode| {
            node.tag() == "path" && node.has_class(DialNeedle::CLASS)
        });
        if let Some(needle) = needle {
            needle.set_attr("transform", transform).set_attr("d", d);
        }
        tracing::trace!(value, "gauge needle moved");
        Ok(())
    }
}
