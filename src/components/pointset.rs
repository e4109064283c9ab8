use crate::components::{Component, RenderContext, position};
use crate::core::datum::Datum;
use crate::core::shape::{SymbolKind, symbol_path};
use crate::core::transform::nest_by;
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget};
use crate::render::{KEY_ATTR, SvgNode, translate};

/// Marker symbols per datum, grouped by series in `g.points`.
#[derive(Debug, Clone)]
pub struct Pointset {
    kind: SymbolKind,
    ring: bool,
    size: f64,
    outline: f64,
}

impl Default for Pointset {
    fn default() -> Self {
        Self::new()
    }
}

impl Pointset {
    pub const CLASS: &'static str = "points";

    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: SymbolKind::Circle,
            ring: false,
            size: 0.0,
            outline: 2.0,
        }
    }

    /// Hit radius of a marker: the symbol's equivalent circle, at least 4px.
    pub(crate) fn hit_radius(size: f64) -> f64 {
        (size.max(0.0) / std::f64::consts::PI).sqrt().max(4.0)
    }
}

impl Component for Pointset {
    fn name(&self) -> &'static str {
        "pointset"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let shape = ctx.config.str_or("markerShape", "dot");
        self.kind = SymbolKind::from_marker_shape(shape);
        self.ring = shape == "ring";
        self.size = ctx.config.f64_or("markerSize", 0.0)?;
        self.outline = ctx.config.f64_or("markerOutlineWidth", 2.0)?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let y_field = ctx.property("propertyY", "y");
        let key_field = ctx.property("propertyKey", "key");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());
        let symbol = symbol_path(self.kind, self.size);
        let radius = Self::hit_radius(self.size);
        let owner = self.name();
        ctx.hits.clear_owner(owner);

        let mut series = Vec::new();
        for group in nest_by(data, &key_field) {
            let key = group.key.clone().unwrap_or_default();
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            let mut markers = Vec::with_capacity(group.values.len());
            for datum in &group.values {
                let Some((px, py)) = position(&x, &y, datum, &x_field, &y_field) else {
                    continue;
                };
                ctx.hits.register(
                    owner,
                    HitShape::Circle {
                        cx: px,
                        cy: py,
                        r: radius,
                    },
                    HitTarget::Mark {
                        key: group.key.clone(),
                    },
                    datum.clone(),
                );
                markers.push((px, py));
            }
            series.push((key, color, opacity, markers));
        }

        let keys: Vec<String> = series.iter().map(|serie| serie.0.clone()).collect();
        let fill_ring = self.ring;
        let outline = self.outline.to_string();
        let plot = ctx.plot();
        plot.retain_keyed(Self::CLASS, KEY_ATTR, &keys);
        for (key, color, opacity, markers) in series {
            let group = plot.upsert_keyed("g", Self::CLASS, KEY_ATTR, &key);
            group
                .set_style("stroke", color.clone())
                .set_style("opacity", opacity);
            group.children_mut().clear();
            for (px, py) in markers {
                let fill = if fill_ring { "transparent".to_owned() } else { color.clone() };
                group
                    .append(SvgNode::new("path").with_class("marker"))
                    .set_attr("d", symbol.clone())
                    .set_attr("transform", translate(px, py))
                    .set_style("stroke", color.clone())
                    .set_style("stroke-width", outline.clone())
                    .set_style("fill", fill);
            }
        }
        Ok(())
    }
}
