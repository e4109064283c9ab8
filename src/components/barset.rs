use crate::components::{Component, RenderContext};
use crate::core::datum::{Datum, FieldValue};
use crate::core::scale::{AxisScale, BandScale};
use crate::core::stack::{StackLayout, StackOffset, StackOrder};
use crate::core::transform::{distinct_keys, nest_by, simple_to_stacked};
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget};
use crate::render::{KEY_ATTR, SvgNode, translate};

/// Bars in grouped (side by side) or stacked layout, one `g.barSeries` per
/// key. Every update rebuilds the series from scratch.
#[derive(Debug, Clone, Default)]
pub struct Barset;

/// Geometry of one bar in plot coordinates.
struct Bar {
    /// Band start for grouped bars (applied as a transform), `0` otherwise.
    shift: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    datum: Datum,
}

impl Barset {
    pub const CLASS: &'static str = "barSeries";

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn stacked_bars(
        ctx: &RenderContext,
        data: &[Datum],
        x: &AxisScale,
        y: &AxisScale,
    ) -> ChartResult<Vec<(String, Vec<Bar>)>> {
        let x_field = ctx.config.str_or("propertyX", "x");
        let y_field = ctx.config.str_or("propertyY", "y");
        let key_field = ctx.config.str_or("propertyKey", "key");
        let layout = StackLayout::new(
            StackOrder::from_name(ctx.config.str_or("stackOrder", "none"))?,
            StackOffset::from_name(ctx.config.str_or("stackOffset", "none"))?,
        );
        let keys = distinct_keys(data, key_field);
        let rows = simple_to_stacked(data, x_field, key_field, y_field);
        let width = x.bandwidth();
        Ok(layout
            .stack(&rows, &keys)
            .into_iter()
            .map(|serie| {
                let bars = serie
                    .points
                    .iter()
                    .filter_map(|point| {
                        let left = x.position(&point.x)?;
                        let top = y.position(&FieldValue::Number(point.y1))?;
                        let bottom = y.position(&FieldValue::Number(point.y0))?;
                        Some(Bar {
                            shift: 0.0,
                            x: left,
                            y: top,
                            width,
                            height: bottom - top,
                            datum: Datum::new()
                                .with(x_field, point.x.clone())
                                .with(key_field, serie.key.as_str())
                                .with(y_field, point.y1 - point.y0)
                                .with("y0", point.y0)
                                .with("y1", point.y1),
                        })
                    })
                    .collect();
                (serie.key, bars)
            })
            .collect())
    }

    fn grouped_bars(
        ctx: &RenderContext,
        data: &[Datum],
        x: &AxisScale,
        y: &AxisScale,
    ) -> Vec<(String, Vec<Bar>)> {
        let x_field = ctx.config.str_or("propertyX", "x");
        let y_field = ctx.config.str_or("propertyY", "y");
        let key_field = ctx.config.str_or("propertyKey", "key");
        let mut group_band = BandScale::new((0.0, x.bandwidth()), 0.0).with_round(false);
        group_band.set_domain(distinct_keys(data, key_field));
        let width = group_band.bandwidth();
        let height = ctx.height;

        nest_by(data, key_field)
            .into_iter()
            .map(|group| {
                let key = group.key.unwrap_or_default();
                let offset = group_band.to_pixel(&key).unwrap_or(0.0);
                let bars = group
                    .values
                    .into_iter()
                    .filter_map(|datum| {
                        let band = x.position(datum.field(x_field))?;
                        let top = y.position(datum.field(y_field))?;
                        Some(Bar {
                            shift: band,
                            x: offset,
                            y: top,
                            width,
                            height: height - top,
                            datum,
                        })
                    })
                    .collect();
                (key, bars)
            })
            .collect()
    }
}

impl Component for Barset {
    fn name(&self) -> &'static str {
        "barset"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let (x, y) = (ctx.x_scale()?.clone(), ctx.y_scale()?.clone());
        let stacked = ctx.config.flag("stacked");
        let series = if stacked {
            Self::stacked_bars(ctx, data, &x, &y)?
        } else {
            Self::grouped_bars(ctx, data, &x, &y)
        };

        let owner = self.name();
        ctx.hits.clear_owner(owner);
        let mut styled = Vec::with_capacity(series.len());
        for (key, bars) in series {
            for bar in &bars {
                ctx.hits.register(
                    owner,
                    HitShape::rect(bar.shift + bar.x, bar.y, bar.width, bar.height),
                    HitTarget::Mark {
                        key: Some(key.clone()),
                    },
                    bar.datum.clone(),
                );
            }
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            styled.push((key, color, opacity, bars));
        }

        let plot = ctx.plot();
        plot.remove_class("serie");
        for (key, color, opacity, bars) in styled {
            let group = plot.append(
                SvgNode::new("g")
                    .with_class(&format!("{} serie", Self::CLASS))
                    .with_attr(KEY_ATTR, key.as_str()),
            );
            group.set_style("fill", color).set_style("opacity", opacity);
            for bar in bars {
                let rect = group.append(SvgNode::new("rect"));
                if !stacked {
                    rect.set_attr("transform", translate(bar.shift, 0.0));
                }
                rect.set_num("x", bar.x)
                    .set_num("y", bar.y)
                    .set_num("width", bar.width)
                    .set_num("height", bar.height.max(0.0));
            }
        }
        tracing::trace!(stacked, bars = data.len(), "bars redrawn");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Barset;
    use crate::components::{Component, RenderContext, XYAxes};
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::render::Surface;
    use approx::assert_relative_eq;

    fn draw(stacked: bool) -> RenderContext {
        let config = Config::new()
            .with("xAxisType", "categorical")
            .with("stacked", stacked);
        let surface = Surface::new(200.0, 100.0, (0.0, 0.0)).expect("surface");
        let mut ctx = RenderContext::new(config, 200.0, 100.0, surface).expect("context");
        let mut axes = XYAxes::new();
        let mut bars = Barset::new();
        axes.render(&mut ctx).expect("axes");
        bars.render(&mut ctx).expect("bars");
        let bar = |x: &str, key: &str, y: f64| Datum::new().with("x", x).with("key", key).with("y", y);
        let data = vec![bar("a", "A", 1.0), bar("a", "B", 3.0), bar("b", "A", 2.0)];
        axes.update(&mut ctx, &data).expect("axes update");
        bars.update(&mut ctx, &data).expect("bars update");
        ctx
    }

    #[test]
    fn stacked_bars_sit_on_top_of_each_other() {
        let ctx = draw(true);
        let series = ctx.surface.plot().select_all(Barset::CLASS);
        assert_eq!(series.len(), 2);
        let a = &series[0].children()[0];
        let b = &series[1].children()[0];
        let top_of_a: f64 = a.attr("y").and_then(|v| v.parse().ok()).expect("y");
        let height_of_b: f64 = b.attr("height").and_then(|v| v.parse().ok()).expect("height");
        let y_of_b: f64 = b.attr("y").and_then(|v| v.parse().ok()).expect("y");
        assert_relative_eq!(y_of_b + height_of_b, top_of_a, epsilon = 1e-3);
    }

    #[test]
    fn grouped_bars_split_the_band_per_key() {
        let ctx = draw(false);
        let series = ctx.surface.plot().select_all(Barset::CLASS);
        assert_eq!(series.len(), 2);
        let width_a: f64 = series[0].children()[0]
            .attr("width")
            .and_then(|v| v.parse().ok())
            .expect("width");
        let bandwidth = ctx.x.as_ref().map(|x| x.bandwidth()).expect("x");
        assert_relative_eq!(width_a, bandwidth / 2.0, epsilon = 1e-3);
        assert_eq!(ctx.hits.len(), 3);
    }
}
