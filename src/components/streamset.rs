use crate::components::{Component, RenderContext};
use crate::core::datum::{Datum, FieldValue};
use crate::core::shape::{Curve, area_path};
use crate::core::stack::{StackLayout, StackOffset, StackOrder};
use crate::core::transform::{distinct_keys, simple_to_stacked};
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget};
use crate::render::{KEY_ATTR, SvgNode};

/// Stacked layers over time (streamgraph and stacked area), one `g.serie`
/// per key drawn with a cardinal curve.
#[derive(Debug, Clone, Default)]
pub struct Streamset {
    layout: StackLayout,
}

impl Streamset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for Streamset {
    fn name(&self) -> &'static str {
        "streamset"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        self.layout = StackLayout::new(
            StackOrder::from_name(ctx.config.str_or("stackOrder", "insideOut"))?,
            StackOffset::from_name(ctx.config.str_or("stackOffset", "none"))?,
        );
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let y_field = ctx.property("propertyY", "y");
        let key_field = ctx.property("propertyKey", "key");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());

        let keys = distinct_keys(data, &key_field);
        let rows = simple_to_stacked(data, &x_field, &key_field, &y_field);
        let owner = self.name();
        ctx.hits.clear_owner(owner);

        let mut layers = Vec::new();
        for serie in self.layout.stack(&rows, &keys) {
            let points: Vec<(f64, f64, f64, &FieldValue)> = serie
                .points
                .iter()
                .filter_map(|point| {
                    Some((
                        x.position(&point.x)?,
                        y.position(&FieldValue::Number(point.y0))?,
                        y.position(&FieldValue::Number(point.y1))?,
                        &point.x,
                    ))
                })
                .collect();
            for (index, &(px, y0, y1, value)) in points.iter().enumerate() {
                let left = index
                    .checked_sub(1)
                    .map_or(px, |previous| (points[previous].0 + px) / 2.0);
                let right = points.get(index + 1).map_or(px, |next| (next.0 + px) / 2.0);
                ctx.hits.register(
                    owner,
                    HitShape::rect(left, y1, (right - left).max(1.0), y0 - y1),
                    HitTarget::Mark {
                        key: Some(serie.key.clone()),
                    },
                    Datum::new()
                        .with(x_field.as_str(), value.clone())
                        .with(key_field.as_str(), serie.key.as_str())
                        .with("y0", serie.points[index].y0)
                        .with("y1", serie.points[index].y1),
                );
            }
            let bands: Vec<(f64, f64, f64)> = points.iter().map(|&(px, y0, y1, _)| (px, y0, y1)).collect();
            let color = ctx.key_color(&serie.key);
            let opacity = ctx.series_opacity(&serie.key);
            layers.push((serie.key, color, opacity, area_path(&bands, Curve::Cardinal)));
        }

        let plot = ctx.plot();
        plot.remove_class("serie");
        for (key, color, opacity, d) in layers {
            let group = plot.append(
                SvgNode::new("g")
                    .with_class("serie")
                    .with_attr(KEY_ATTR, key.as_str()),
            );
            group
                .set_style("stroke", color.clone())
                .set_style("opacity", opacity);
            group
                .append(SvgNode::new("path").with_class("layer"))
                .set_attr("d", d)
                .set_style("fill", color);
        }
        Ok(())
    }
}
