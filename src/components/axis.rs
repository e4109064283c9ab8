use chrono::{DateTime, Duration, Utc};

use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::core::format::NumberFormat;
use crate::core::scale::{AxisScale, BandScale, LinearScale, TimeScale};
use crate::core::shape::num;
use crate::core::stack::{self, StackLayout, StackOffset, StackOrder};
use crate::core::ticks::time_tick_label;
use crate::core::transform::{distinct_keys, numeric_extent, simple_to_stacked, sorted_distinct_keys};
use crate::error::{ChartError, ChartResult};
use crate::render::{SvgNode, translate};

const TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Linear,
    Time,
    Categorical,
}

impl AxisKind {
    /// Parses an axis type option. `allowed` lists the kinds the axis
    /// accepts; anything else is an `UnsupportedAxisType` error.
    pub fn parse(axis: &'static str, value: &str, allowed: &[AxisKind]) -> ChartResult<Self> {
        let kind = match value {
            "linear" => Some(Self::Linear),
            "time" => Some(Self::Time),
            "categorical" => Some(Self::Categorical),
            _ => None,
        };
        kind.filter(|kind| allowed.contains(kind))
            .ok_or_else(|| ChartError::UnsupportedAxisType {
                axis,
                value: value.to_owned(),
            })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Time => "time",
            Self::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orient {
    Bottom,
    Left,
    Right,
}

/// Tick geometry (d3 axis conventions).
#[derive(Debug, Clone, Copy, PartialEq)]
struct TickStyle {
    inner: f64,
    outer: f64,
    padding: f64,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            inner: 6.0,
            outer: 6.0,
            padding: 3.0,
        }
    }
}

/// Redraws an axis group: domain path plus one `g.tick` per tick.
fn draw_axis(
    group: &mut SvgNode,
    orient: Orient,
    range: (f64, f64),
    ticks: &[(f64, String)],
    style: TickStyle,
) {
    group.children_mut().clear();
    group
        .set_attr("fill", "none")
        .set_attr("font-size", "10")
        .set_attr("font-family", "sans-serif")
        .set_attr(
            "text-anchor",
            match orient {
                Orient::Bottom => "middle",
                Orient::Left => "end",
                Orient::Right => "start",
            },
        );

    let (r0, r1) = range;
    let domain = match orient {
        Orient::Bottom => format!(
            "M{},{}V0H{}V{}",
            num(r0),
            num(style.outer),
            num(r1),
            num(style.outer)
        ),
        Orient::Left => format!(
            "M{},{}H0V{}H{}",
            num(-style.outer),
            num(r0),
            num(r1),
            num(-style.outer)
        ),
        Orient::Right => format!(
            "M{},{}H0V{}H{}",
            num(style.outer),
            num(r0),
            num(r1),
            num(style.outer)
        ),
    };
    group
        .append(SvgNode::new("path").with_class("domain"))
        .set_attr("stroke", "#000")
        .set_attr("d", domain);

    let spacing = style.inner.max(0.0) + style.padding;
    for (position, label) in ticks {
        let tick = group.append(SvgNode::new("g").with_class("tick"));
        tick.set_attr("opacity", "1");
        match orient {
            Orient::Bottom => {
                tick.set_attr("transform", translate(*position, 0.0));
                tick.append(SvgNode::new("line"))
                    .set_attr("stroke", "#000")
                    .set_num("y2", style.inner);
                tick.append(SvgNode::new("text"))
                    .set_attr("fill", "#000")
                    .set_num("y", spacing)
                    .set_attr("dy", "0.71em")
                    .set_text(label.clone());
            }
            Orient::Left | Orient::Right => {
                let sign = if orient == Orient::Left { -1.0 } else { 1.0 };
                tick.set_attr("transform", translate(0.0, *position));
                tick.append(SvgNode::new("line"))
                    .set_attr("stroke", "#000")
                    .set_num("x2", sign * style.inner);
                tick.append(SvgNode::new("text"))
                    .set_attr("fill", "#000")
                    .set_num("x", sign * spacing)
                    .set_attr("dy", "0.32em")
                    .set_text(label.clone());
            }
        }
    }
}

/// Tick positions and labels for a scale.
fn scale_ticks(scale: &AxisScale, format: Option<&NumberFormat>) -> Vec<(f64, String)> {
    match scale {
        AxisScale::Linear(linear) => linear
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|value| {
                let label = format.map_or_else(|| value.to_string(), |format| format.format(value));
                (linear.to_pixel(value), label)
            })
            .collect(),
        AxisScale::Time(time) => time
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|tick| (time.to_pixel(tick), time_tick_label(tick)))
            .collect(),
        AxisScale::Band(band) => band
            .domain()
            .iter()
            .filter_map(|key| {
                band.to_pixel(key)
                    .map(|start| ((start + band.bandwidth() / 2.0).round(), key.clone()))
            })
            .collect(),
    }
}

/// Horizontal axis at the bottom of the plot.
#[derive(Debug, Clone)]
pub struct XAxis {
    kind: AxisKind,
    format: Option<NumberFormat>,
    style: TickStyle,
}

impl Default for XAxis {
    fn default() -> Self {
        Self::new()
    }
}

impl XAxis {
    pub const CLASS: &'static str = "x";

    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: AxisKind::Linear,
            format: None,
            style: TickStyle::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    fn redraw(&self, ctx: &mut RenderContext) -> ChartResult<()> {
        let scale = ctx.x_scale()?.clone();
        let ticks = scale_ticks(&scale, self.format.as_ref());
        let style = self.style;
        let range = scale.range();
        if let Some(group) = ctx.plot().child_with_class_mut(Self::CLASS) {
            draw_axis(group, Orient::Bottom, range, &ticks, style);
        }
        Ok(())
    }
}

impl Component for XAxis {
    fn name(&self) -> &'static str {
        "x-axis"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let (width, height) = (ctx.width, ctx.height);
        self.kind = AxisKind::parse(
            "XAxis",
            ctx.config.str_or("xAxisType", "linear"),
            &[AxisKind::Linear, AxisKind::Time, AxisKind::Categorical],
        )?;
        let scale = match self.kind {
            AxisKind::Time => AxisScale::Time(TimeScale::new(
                (
                    DateTime::<Utc>::UNIX_EPOCH,
                    DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(1),
                ),
                (0.0, width),
            )?),
            AxisKind::Linear => {
                self.format = Some(NumberFormat::parse(ctx.config.str_or("xAxisFormat", ""))?);
                AxisScale::Linear(LinearScale::new((0.0, 1.0), (0.0, width))?)
            }
            AxisKind::Categorical => AxisScale::Band(BandScale::new((0.0, width), 0.1)),
        };
        if ctx.config.flag("xAxisGrid") {
            self.style.inner = -height;
            self.style.padding = 9.0;
        }
        ctx.x = Some(scale);

        let label = ctx.config.label("xAxisLabel").unwrap_or_default();
        let plot = ctx.plot();
        plot.append(
            SvgNode::new("g")
                .with_class(&format!("x axis {}", self.kind.name()))
                .with_attr("transform", translate(0.0, height)),
        );
        let title = plot.append(SvgNode::new("text").with_class("xaxis-title"));
        title
            .set_attr("text-anchor", "middle")
            .set_num("x", width / 2.0)
            .set_num("y", height + 40.0)
            .set_text(label)
            .set_style("font", "0.8em Montserrat, sans-serif");
        self.redraw(ctx)
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let property_x = ctx.property("propertyX", "x");
        match ctx.x.as_mut() {
            Some(AxisScale::Linear(scale)) => {
                if let Some((min, max)) = numeric_extent(data, &property_x) {
                    scale.set_domain(min, max)?;
                }
            }
            Some(AxisScale::Time(scale)) => {
                let start = ctx.config.str_or("propertyStart", "start");
                let end = ctx.config.str_or("propertyEnd", "end");
                let first = data
                    .iter()
                    .filter_map(|d| d.number(&property_x).or_else(|| d.number(start)))
                    .reduce(f64::min);
                let last = data
                    .iter()
                    .filter_map(|d| d.number(&property_x).or_else(|| d.number(end)))
                    .reduce(f64::max);
                if let (Some(first), Some(last)) = (first, last) {
                    scale.set_domain_millis(first, last)?;
                }
            }
            Some(AxisScale::Band(scale)) => {
                if !data.is_empty() {
                    scale.set_domain(sorted_distinct_keys(data, &property_x));
                }
            }
            None => {}
        }
        tracing::trace!(axis = "x", points = data.len(), "axis domain updated");
        self.redraw(ctx)
    }
}

/// Vertical axis, left (default) or right of the plot.
#[derive(Debug, Clone)]
pub struct YAxis {
    kind: AxisKind,
    orient: Orient,
    format: Option<NumberFormat>,
    style: TickStyle,
}

impl Default for YAxis {
    fn default() -> Self {
        Self::left()
    }
}

impl YAxis {
    pub const CLASS: &'static str = "y";

    #[must_use]
    pub fn left() -> Self {
        Self {
            kind: AxisKind::Linear,
            orient: Orient::Left,
            format: None,
            style: TickStyle::default(),
        }
    }

    #[must_use]
    pub fn right() -> Self {
        Self {
            orient: Orient::Right,
            ..Self::left()
        }
    }

    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    fn redraw(&self, ctx: &mut RenderContext) -> ChartResult<()> {
        let scale = ctx.y_scale()?.clone();
        let ticks = scale_ticks(&scale, self.format.as_ref());
        let (style, orient) = (self.style, self.orient);
        let opacity = if ctx.config.bool("yAxisShow").unwrap_or(true) {
            "1"
        } else {
            "0"
        };
        if let Some(group) = ctx.plot().child_with_class_mut(Self::CLASS) {
            draw_axis(group, orient, scale.range(), &ticks, style);
            group.set_attr("opacity", opacity);
        }
        Ok(())
    }

    /// `[min y0, max y1]` of the configured stack over the dataset.
    fn stacked_extent(ctx: &RenderContext, data: &[Datum]) -> ChartResult<Option<(f64, f64)>> {
        let x = ctx.config.str_or("propertyX", "x");
        let key = ctx.config.str_or("propertyKey", "key");
        let y = ctx.config.str_or("propertyY", "y");
        let layout = StackLayout::new(
            StackOrder::from_name(ctx.config.str_or("stackOrder", "none"))?,
            StackOffset::from_name(ctx.config.str_or("stackOffset", "none"))?,
        );
        let keys = distinct_keys(data, key);
        let series = layout.stack(&simple_to_stacked(data, x, key, y), &keys);
        Ok(stack::extent(&series))
    }
}

impl Component for YAxis {
    fn name(&self) -> &'static str {
        "y-axis"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let (width, height) = (ctx.width, ctx.height);
        self.kind = AxisKind::parse(
            "YAxis",
            ctx.config.str_or("yAxisType", "linear"),
            &[AxisKind::Linear, AxisKind::Categorical],
        )?;
        let scale = match self.kind {
            AxisKind::Categorical => AxisScale::Band(BandScale::new((height, 0.0), 0.1)),
            _ => {
                self.format = Some(NumberFormat::parse(ctx.config.str_or("yAxisFormat", ""))?);
                AxisScale::Linear(LinearScale::new((0.0, 1.0), (height, 0.0))?)
            }
        };
        if ctx.config.flag("yAxisGrid") && self.orient == Orient::Left {
            self.style = TickStyle {
                inner: -width,
                outer: 0.0,
                padding: 20.0,
            };
        }
        ctx.y = Some(scale);

        let offset = match self.orient {
            Orient::Right => width,
            _ => 0.0,
        };
        let label = ctx.config.label("yAxisLabel").unwrap_or_default();
        let plot = ctx.plot();
        plot.append(
            SvgNode::new("g")
                .with_class("y axis")
                .with_attr("transform", translate(offset, 0.0)),
        );
        plot.append(SvgNode::new("text").with_class("yaxis-title"))
            .set_attr("transform", "rotate(-90)")
            .set_attr("text-anchor", "middle")
            .set_num("x", -height / 2.0)
            .set_num("y", -55.0)
            .set_text(label)
            .set_style("font", "0.8em Montserrat, sans-serif");
        self.redraw(ctx)
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let property_y = ctx.property("propertyY", "y");
        let property_key = ctx.property("propertyKey", "key");
        let stacked = ctx.config.flag("stacked");
        let stacked_extent = if stacked && self.kind == AxisKind::Linear {
            Self::stacked_extent(ctx, data)?
        } else {
            None
        };
        match ctx.y.as_mut() {
            Some(AxisScale::Linear(scale)) => {
                let extent = if stacked {
                    stacked_extent
                } else {
                    numeric_extent(data, &property_y)
                };
                if let Some((min, max)) = extent {
                    scale.set_domain(min, max)?;
                }
            }
            Some(AxisScale::Band(scale)) => {
                if !data.is_empty() {
                    scale.set_domain(sorted_distinct_keys(data, &property_key));
                }
            }
            _ => {}
        }
        tracing::trace!(axis = "y", stacked, points = data.len(), "axis domain updated");
        self.redraw(ctx)
    }
}

/// Cartesian axis pair; the y axis renders and updates first.
#[derive(Debug, Clone, Default)]
pub struct XYAxes {
    pub x: XAxis,
    pub y: YAxis,
}

impl XYAxes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for XYAxes {
    fn name(&self) -> &'static str {
        "xy-axes"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        self.y.render(ctx)?;
        self.x.render(ctx)
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        self.y.update(ctx, data)?;
        self.x.update(ctx, data)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisKind, XYAxes};
    use crate::components::{Component, RenderContext};
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::core::scale::AxisScale;
    use crate::render::Surface;

    fn context(config: Config) -> RenderContext {
        let surface = Surface::new(200.0, 100.0, (0.0, 0.0)).expect("surface");
        RenderContext::new(config, 200.0, 100.0, surface).expect("context")
    }

    #[test]
    fn y_axis_rejects_time_type() {
        let mut ctx = context(Config::new().with("yAxisType", "time"));
        let error = XYAxes::new().render(&mut ctx).expect_err("time y axis");
        assert!(error.to_string().contains("YAxis"));
        assert!(AxisKind::parse("XAxis", "log", &[AxisKind::Linear]).is_err());
    }

    #[test]
    fn categorical_x_domain_is_sorted_distinct_keys() {
        let mut ctx = context(
            Config::new()
                .with("xAxisType", "categorical")
                .with("yAxisType", "linear"),
        );
        let mut axes = XYAxes::new();
        axes.render(&mut ctx).expect("render");
        let data = vec![
            Datum::new().with("x", "b").with("y", 1.0),
            Datum::new().with("x", "a").with("y", 3.0),
            Datum::new().with("x", "b").with("y", 2.0),
        ];
        axes.update(&mut ctx, &data).expect("update");
        let band = ctx.x.as_ref().and_then(AxisScale::as_band).expect("band");
        assert_eq!(band.domain(), ["a".to_owned(), "b".to_owned()]);
        let linear = ctx.y.as_ref().and_then(AxisScale::as_linear).expect("linear");
        assert_eq!(linear.domain(), (1.0, 3.0));
        assert_eq!(ctx.surface.plot().select_all("tick").len(), 2 + linear.ticks(10).len());
    }
}
