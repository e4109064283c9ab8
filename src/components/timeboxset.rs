use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::core::transform::nest_by;
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget};
use crate::render::{KEY_ATTR, SvgNode};

/// Swimlane boxes spanning `[start, end]` on the lane of their key.
#[derive(Debug, Clone, Default)]
pub struct Timeboxset;

impl Timeboxset {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Component for Timeboxset {
    fn name(&self) -> &'static str {
        "timeboxset"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let key_field = ctx.property("propertyKey", "key");
        let start_field = ctx.property("propertyStart", "start");
        let end_field = ctx.property("propertyEnd", "end");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());

        let groups = nest_by(data, &key_field);
        let lane_height = if groups.is_empty() {
            0.0
        } else {
            0.8 * ctx.height / groups.len() as f64
        };
        let owner = self.name();
        ctx.hits.clear_owner(owner);

        let mut lanes = Vec::with_capacity(groups.len());
        for group in groups {
            let key = group.key.clone().unwrap_or_default();
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            let mut boxes = Vec::with_capacity(group.values.len());
            for datum in &group.values {
                let (Some(start), Some(end), Some(top)) = (
                    x.position(datum.field(&start_field)),
                    x.position(datum.field(&end_field)),
                    y.position(datum.field(&key_field)),
                ) else {
                    continue;
                };
                ctx.hits.register(
                    owner,
                    HitShape::rect(start, top, end - start, lane_height),
                    HitTarget::Mark {
                        key: group.key.clone(),
                    },
                    datum.clone(),
                );
                boxes.push((start, end - start, top));
            }
            lanes.push((key, color, opacity, boxes));
        }

        let plot = ctx.plot();
        plot.remove_class("serie");
        for (key, color, opacity, boxes) in lanes {
            let group = plot.append(
                SvgNode::new("g")
                    .with_class("serie")
                    .with_attr(KEY_ATTR, key.as_str()),
            );
            group.set_style("opacity", opacity);
            for (left, width, top) in boxes {
                group
                    .append(SvgNode::new("rect"))
                    .set_num("x", left)
                    .set_num("y", top)
                    .set_num("width", width)
                    .set_num("height", lane_height)
                    .set_style("fill", color.clone());
            }
        }
        Ok(())
    }
}
