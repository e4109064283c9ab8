use crate::components::{Component, RenderContext, position, series_key};
use crate::core::datum::Datum;
use crate::core::shape::SymbolKind;
use crate::error::ChartResult;
use crate::render::{CanvasLayer, MarkerStamp};

/// Scatter markers painted into the canvas layer instead of SVG nodes.
#[derive(Debug, Clone)]
pub struct CanvasPointset {
    kind: SymbolKind,
    ring: bool,
    size: f64,
}

impl Default for CanvasPointset {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasPointset {
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: SymbolKind::Circle,
            ring: false,
            size: 0.0,
        }
    }
}

impl Component for CanvasPointset {
    fn name(&self) -> &'static str {
        "canvas-pointset"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let shape = ctx.config.str_or("markerShape", "dot");
        self.kind = SymbolKind::from_marker_shape(shape);
        self.ring = shape == "ring";
        self.size = ctx.config.f64_or("markerSize", 0.0)?;
        let offset = (
            ctx.config.f64_or("marginLeft", 0.0)?,
            ctx.config.f64_or("marginTop", 0.0)?,
        );
        ctx.canvas = Some(CanvasLayer::new(ctx.width, ctx.height, offset));
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let x_field = ctx.property("propertyX", "x");
        let y_field = ctx.property("propertyY", "y");
        let key_field = ctx.property("propertyKey", "key");
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());

        let mut stamps = Vec::with_capacity(data.len());
        for datum in data {
            let Some((px, py)) = position(&x, &y, datum, &x_field, &y_field) else {
                continue;
            };
            let color = ctx.color.color_for_key(&series_key(datum, &key_field));
            stamps.push(MarkerStamp {
                x: px,
                y: py,
                kind: self.kind,
                size: self.size,
                stroke: color,
                fill: (!self.ring).then_some(color),
            });
        }

        let (width, height) = (ctx.width, ctx.height);
        let canvas = ctx
            .canvas
            .get_or_insert_with(|| CanvasLayer::new(width, height, (0.0, 0.0)));
        canvas.clear();
        for stamp in stamps {
            canvas.stamp(stamp);
        }
        Ok(())
    }
}
