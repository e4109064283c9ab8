use crate::components::{Component, RenderContext};
use crate::core::color::ColorScale;
use crate::core::datum::Datum;
use crate::core::scale::LinearScale;
use crate::core::shape::{Arc, num};
use crate::error::{ChartError, ChartResult};
use crate::render::{SvgNode, translate};

/// Gauge geometry shared by the dial and its needle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GaugeGeometry {
    pub radius: f64,
    pub min_level: f64,
    pub max_level: f64,
    pub min_angle: f64,
    pub max_angle: f64,
}

impl GaugeGeometry {
    pub(crate) fn from_context(ctx: &RenderContext) -> ChartResult<Self> {
        Ok(Self {
            radius: ctx.width.min(ctx.height) / 2.0,
            min_level: ctx.config.f64_or("minLevel", 0.0)?,
            max_level: ctx.config.f64_or("maxLevel", 100.0)?,
            min_angle: ctx.config.f64_or("minAngle", -90.0)?,
            max_angle: ctx.config.f64_or("maxAngle", 90.0)?,
        })
    }

    /// Needle rotation in degrees for `value`.
    pub(crate) fn needle_rotation(self, value: f64) -> ChartResult<f64> {
        let scale = LinearScale::new(
            (self.min_level, self.max_level),
            (90.0 + self.min_angle, 90.0 + self.max_angle),
        )?;
        Ok(scale.to_pixel(value) - 90.0)
    }
}

/// Upper bound on `ticks`; one sector per degree of a full turn.
pub const MAX_TICKS: usize = 360;

/// Colored ring of `ticks` sectors with level labels.
#[derive(Debug, Clone, Default)]
pub struct Dial;

impl Dial {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Component for Dial {
    fn name(&self) -> &'static str {
        "dial"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let geometry = GaugeGeometry::from_context(ctx)?;
        let ring_width = ctx.config.f64_or("ringWidth", 50.0)?;
        let ring_margin = ctx.config.f64_or("ringMargin", 20.0)?;
        let label_inset = ctx.config.f64_or("labelInset", 10.0)?;
        let ticks = ctx.config.f64_or("ticks", 10.0)?.max(1.0);
        if ticks > MAX_TICKS as f64 {
            return Err(ChartError::config(
                "ticks",
                format!("expected at most {MAX_TICKS} sectors, got {ticks}"),
            ));
        }
        let ticks = ticks as usize;
        let invert = ctx.config.flag("invertColorScale");
        let r = geometry.radius;
        let span = geometry.max_angle - geometry.min_angle;
        let level = LinearScale::new((geometry.min_level, geometry.max_level), (0.0, 1.0))?;

        if let ColorScale::Quantile(scale) = &mut ctx.color {
            scale.set_domain(&[0.0, 1.0]);
        }
        let step = 1.0 / ticks as f64;
        let mut sectors = Vec::with_capacity(ticks);
        for i in 0..ticks {
            let start = i as f64 * step;
            let arc = Arc::new(
                r - ring_width - ring_margin,
                r - ring_margin,
                (geometry.min_angle + start * span).to_radians(),
                (geometry.min_angle + (start + step) * span).to_radians(),
            );
            let shade = if invert { 1.0 - start } else { start };
            sectors.push((arc.path(), ctx.color.color_for_value(shade).to_hex()));
        }
        let labels: Vec<(f64, String)> = level
            .ticks(ticks)
            .into_iter()
            .map(|tick| (geometry.min_angle + level.to_pixel(tick) * span, num(tick)))
            .collect();

        let plot = ctx.plot();
        plot.remove_class("arc");
        plot.remove_class("labels");
        let ring = plot.append(
            SvgNode::new("g")
                .with_class("arc")
                .with_attr("transform", translate(r, r)),
        );
        for (i, (d, fill)) in sectors.into_iter().enumerate() {
            ring.append(SvgNode::new("path").with_attr("id", format!("sector-{i}")))
                .set_attr("d", d)
                .set_attr("fill", fill);
        }
        let group = plot.append(
            SvgNode::new("g")
                .with_class("labels")
                .with_attr("transform", translate(r, r)),
        );
        for (angle, text) in labels {
            group
                .append(SvgNode::new("text"))
                .set_attr(
                    "transform",
                    format!("rotate({}) translate(0,{})", num(angle), num(label_inset - r)),
                )
                .set_text(text)
                .set_style("text-anchor", "middle")
                .set_style("font", "18px Montserrat, sans-serif");
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut RenderContext, _data: &[Datum]) -> ChartResult<()> {
        Ok(())
    }
}
