use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::core::pie::pie;
use crate::core::shape::Arc;
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget};
use crate::render::{KEY_ATTR, SvgNode};

/// Pie slices around the plot origin, one `g.slice` per datum key.
#[derive(Debug, Clone, Default)]
pub struct SectorSet;

impl SectorSet {
    pub const CLASS: &'static str = "slice";

    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Component for SectorSet {
    fn name(&self) -> &'static str {
        "sector-set"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let key_field = ctx.property("propertyKey", "key");
        let radius = ctx.width.min(ctx.height) / 2.0;
        let values: Vec<f64> = data
            .iter()
            .map(|datum| datum.number(&x_field).unwrap_or(0.0))
            .collect();
        let owner = self.name();
        ctx.hits.clear_owner(owner);

        let mut slices = Vec::with_capacity(data.len());
        for (slice, datum) in pie(&values).into_iter().zip(data) {
            let key = datum
                .key(&key_field)
                .unwrap_or_else(|| slice.index.to_string());
            let arc = Arc::new(0.0, radius, slice.start_angle, slice.end_angle);
            ctx.hits.register(
                owner,
                HitShape::Sector {
                    cx: 0.0,
                    cy: 0.0,
                    arc,
                },
                HitTarget::Mark {
                    key: Some(key.clone()),
                },
                datum.clone(),
            );
            let fill = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            slices.push((key, arc.path(), fill, opacity));
        }

        let keys: Vec<String> = slices.iter().map(|slice| slice.0.clone()).collect();
        let plot = ctx.plot();
        plot.retain_keyed(Self::CLASS, KEY_ATTR, &keys);
        for (key, d, fill, opacity) in slices {
            let group = plot.upsert_keyed("g", Self::CLASS, KEY_ATTR, &key);
            group.set_style("opacity", opacity);
            group
                .ensure_child("path", "sector")
                .set_attr("d", d)
                .set_attr("fill", fill);
        }
        Ok(())
    }
}
