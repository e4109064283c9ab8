use std::collections::HashSet;

use crate::components::{Component, RenderContext, series_key};
use crate::core::datum::Datum;
use crate::core::force::ForceSimulation;
use crate::core::scale::LinearScale;
use crate::core::transform::simple_to_linked;
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget, PointerEvent, PointerEventKind, ZoomTransform};
use crate::render::{KEY_ATTR, SvgNode};

const LINK_STROKE: &str = "#999";
const DRAG_TICKS: usize = 10;

/// Force-directed network: `line` links, `circle` nodes and optional labels,
/// laid out by a settled force simulation.
#[derive(Debug, Clone, Default)]
pub struct LinkedNodeset {
    simulation: Option<ForceSimulation>,
    nodes: Vec<Datum>,
    links: Vec<Datum>,
    zoom: ZoomTransform,
    dragging: Option<usize>,
}

impl LinkedNodeset {
    pub const CLASS: &'static str = "serie";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn simulation(&self) -> Option<&ForceSimulation> {
        self.simulation.as_ref()
    }

    #[must_use]
    pub fn zoom_transform(&self) -> ZoomTransform {
        self.zoom
    }

    fn node_radius(ctx: &RenderContext, datum: &Datum) -> ChartResult<f64> {
        let weighted = ctx.config.flag("weighted");
        match datum.number("weight").filter(|_| weighted) {
            Some(weight) => {
                let scale = LinearScale::new(
                    (
                        ctx.config.f64_or("minNodeWeight", 0.0)?,
                        ctx.config.f64_or("maxNodeWeight", 100.0)?,
                    ),
                    (0.0, 15.0),
                )?;
                Ok(scale.to_pixel(weight))
            }
            None => ctx.config.f64_or("nodeWeight", 8.0),
        }
    }

    fn link_width(ctx: &RenderContext, datum: &Datum) -> ChartResult<f64> {
        let weighted = ctx.config.flag("weighted");
        match datum.number("weight").filter(|_| weighted) {
            Some(weight) => {
                let scale = LinearScale::new(
                    (
                        ctx.config.f64_or("minLinkWeight", 0.0)?,
                        ctx.config.f64_or("maxLinkWeight", 10.0)?,
                    ),
                    (0.0, 3.0),
                )?;
                Ok(scale.to_pixel(weight))
            }
            None => ctx.config.f64_or("linkWeight", 1.0),
        }
    }

    /// Rebuilds the scene and node hit regions from the current layout.
    fn redraw(&self, ctx: &mut RenderContext) -> ChartResult<()> {
        let owner = self.name();
        ctx.hits.clear_owner(owner);
        ctx.plot().remove_class(Self::CLASS);
        let Some(simulation) = self.simulation.as_ref() else {
            return Ok(());
        };
        let key_field = ctx.property("propertyKey", "key");
        let label_field = ctx.property("labelField", "id");
        let show_labels = ctx.config.flag("labelShow");
        let transform = (self.zoom != ZoomTransform::default()).then(|| self.zoom.to_attr());

        let mut lines = Vec::with_capacity(self.links.len());
        for (link, datum) in simulation.links().iter().zip(&self.links) {
            let (source, target) = (&simulation.nodes()[link.source], &simulation.nodes()[link.target]);
            lines.push((
                series_key(datum, &key_field),
                Self::link_width(ctx, datum)?,
                [source.x, source.y, target.x, target.y],
            ));
        }
        let mut circles = Vec::with_capacity(self.nodes.len());
        for (index, (node, datum)) in simulation.nodes().iter().zip(&self.nodes).enumerate() {
            let key = series_key(datum, &key_field);
            let radius = Self::node_radius(ctx, datum)?;
            let (cx, cy) = self.zoom.apply(node.x, node.y);
            ctx.hits.register(
                owner,
                HitShape::Circle {
                    cx,
                    cy,
                    r: (radius * self.zoom.k).max(4.0),
                },
                HitTarget::NetworkNode { index },
                datum.clone(),
            );
            let color = ctx.key_color(&key);
            let opacity = ctx.series_opacity(&key);
            let label = datum.field(&label_field).key_string().unwrap_or_default();
            circles.push((key, radius, color, opacity, label, node.x, node.y));
        }

        let serie = ctx.plot().append(SvgNode::new("g").with_class(Self::CLASS));
        let links = serie.append(SvgNode::new("g").with_class("links"));
        for (key, width, [x1, y1, x2, y2]) in lines {
            let line = links
                .append(SvgNode::new("line").with_attr(KEY_ATTR, key))
                .set_num("stroke-width", width)
                .set_attr("stroke", LINK_STROKE)
                .set_attr("stroke-opacity", "1")
                .set_num("x1", x1)
                .set_num("y1", y1)
                .set_num("x2", x2)
                .set_num("y2", y2);
            if let Some(transform) = &transform {
                line.set_attr("transform", transform.clone());
            }
        }
        let nodes = serie.append(SvgNode::new("g").with_class("nodes"));
        for (key, radius, color, opacity, _, x, y) in &circles {
            let circle = nodes
                .append(SvgNode::new("circle").with_attr(KEY_ATTR, key.as_str()))
                .set_num("r", *radius)
                .set_attr("fill", color.clone())
                .set_attr("stroke", "white")
                .set_num("cx", *x)
                .set_num("cy", *y)
                .set_style("opacity", opacity.clone());
            if let Some(transform) = &transform {
                circle.set_attr("transform", transform.clone());
            }
        }
        if show_labels {
            let labels = serie.append(SvgNode::new("g").with_class("labels"));
            for (key, _, _, opacity, label, x, y) in circles {
                let text = labels
                    .append(SvgNode::new("text").with_attr(KEY_ATTR, key))
                    .set_attr("dx", "10")
                    .set_attr("dy", ".35em")
                    .set_attr("font-size", ".85em")
                    .set_num("x", x)
                    .set_num("y", y)
                    .set_style("opacity", opacity)
                    .set_text(label);
                if let Some(transform) = &transform {
                    text.set_attr("transform", transform.clone());
                }
            }
        }
        Ok(())
    }
}

impl Component for LinkedNodeset {
    fn name(&self) -> &'static str {
        "linked-nodeset"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        self.zoom = ZoomTransform::default();
        self.dragging = None;
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let linked = simple_to_linked(data);
        let ids: Vec<String> = linked
            .nodes
            .iter()
            .map(|node| node.key("id").unwrap_or_default())
            .collect();
        let known: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let mut pairs = Vec::with_capacity(linked.links.len());
        let mut links = Vec::with_capacity(linked.links.len());
        for link in linked.links {
            match (link.key("source"), link.key("target")) {
                (Some(source), Some(target))
                    if known.contains(source.as_str()) && known.contains(target.as_str()) =>
                {
                    pairs.push((source, target));
                    links.push(link);
                }
                (source, target) => {
                    tracing::warn!(?source, ?target, "network link skipped: unknown endpoint");
                }
            }
        }

        let mut simulation =
            ForceSimulation::new(&ids, &pairs, (ctx.width / 2.0, ctx.height / 2.0));
        let ticks = simulation.settle();
        tracing::debug!(nodes = ids.len(), links = pairs.len(), ticks, "network laid out");
        self.simulation = Some(simulation);
        self.nodes = linked.nodes;
        self.links = links;
        self.dragging = None;
        self.redraw(ctx)
    }

    fn pointer(&mut self, ctx: &mut RenderContext, event: &PointerEvent) -> ChartResult<bool> {
        match event.kind {
            PointerEventKind::Down => {
                let Some(HitTarget::NetworkNode { index }) =
                    event.hit.as_ref().map(|hit| &hit.target)
                else {
                    return Ok(false);
                };
                let Some(simulation) = self.simulation.as_mut() else {
                    return Ok(false);
                };
                let Some(node) = simulation.nodes().get(*index) else {
                    return Ok(false);
                };
                let (x, y) = (node.x, node.y);
                simulation.pin(*index, x, y);
                self.dragging = Some(*index);
                Ok(true)
            }
            PointerEventKind::Up => {
                let (Some(index), Some(simulation)) = (self.dragging.take(), self.simulation.as_mut())
                else {
                    return Ok(false);
                };
                simulation.unpin(index);
                simulation.settle();
                self.redraw(ctx)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn pointer_move(&mut self, ctx: &mut RenderContext, x: f64, y: f64) -> ChartResult<bool> {
        let (Some(index), Some(simulation)) = (self.dragging, self.simulation.as_mut()) else {
            return Ok(false);
        };
        let (wx, wy) = self.zoom.invert(x, y);
        simulation.pin(index, wx, wy);
        for _ in 0..DRAG_TICKS {
            simulation.tick();
        }
        self.redraw(ctx)?;
        Ok(true)
    }

    fn zoom(&mut self, ctx: &mut RenderContext, factor: f64, x: f64, y: f64) -> ChartResult<bool> {
        if !ctx.config.flag("zoom") {
            return Ok(false);
        }
        self.zoom.zoom_at(factor, x, y);
        self.redraw(ctx)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::LinkedNodeset;
    use crate::components::{Component, RenderContext};
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::interaction::{PointerEvent, PointerEventKind, ZoomTransform};
    use crate::render::Surface;

    fn context() -> RenderContext {
        let config = Config::new().with("labelShow", true).with("zoom", true);
        let surface = Surface::new(300.0, 200.0, (0.0, 0.0)).expect("surface");
        RenderContext::new(config, 300.0, 200.0, surface).expect("context")
    }

    fn network() -> Vec<Datum> {
        vec![
            Datum::new().with("id", "a").with("key", "g1"),
            Datum::new().with("id", "b").with("key", "g2"),
            Datum::new().with("class", "link").with("source", "a").with("target", "b"),
            Datum::new().with("class", "link").with("source", "a").with("target", "zzz"),
        ]
    }

    #[test]
    fn draws_nodes_links_and_labels() {
        let mut ctx = context();
        let mut nodeset = LinkedNodeset::new();
        nodeset.render(&mut ctx).expect("render");
        nodeset.update(&mut ctx, &network()).expect("update");
        let plot = ctx.surface.plot();
        assert_eq!(plot.select_all("links")[0].children().len(), 1);
        assert_eq!(plot.select_all("nodes")[0].children().len(), 2);
        assert_eq!(plot.select_all("labels")[0].children()[0].text(), Some("a"));
        assert_eq!(ctx.hits.len(), 2);
    }

    #[test]
    fn drag_pins_the_node_under_the_pointer() {
        let mut ctx = context();
        let mut nodeset = LinkedNodeset::new();
        nodeset.render(&mut ctx).expect("render");
        nodeset.update(&mut ctx, &network()).expect("update");
        let node = nodeset.simulation().expect("simulation").nodes()[0].clone();
        let hit = ctx.hits.hit_test(node.x, node.y).cloned();
        let down = PointerEvent {
            kind: PointerEventKind::Down,
            x: node.x,
            y: node.y,
            hit,
        };
        assert!(nodeset.pointer(&mut ctx, &down).expect("down"));
        assert!(nodeset.pointer_move(&mut ctx, 20.0, 30.0).expect("move"));
        let pinned = &nodeset.simulation().expect("simulation").nodes()[0];
        assert_eq!((pinned.x, pinned.y), (20.0, 30.0));
        let up = PointerEvent {
            kind: PointerEventKind::Up,
            hit: None,
            ..down
        };
        assert!(nodeset.pointer(&mut ctx, &up).expect("up"));
        assert!(nodeset.simulation().expect("simulation").nodes()[0].fx.is_none());
    }

    #[test]
    fn zoom_is_clamped_to_the_scale_extent() {
        let mut ctx = context();
        let mut nodeset = LinkedNodeset::new();
        nodeset.render(&mut ctx).expect("render");
        nodeset.update(&mut ctx, &network()).expect("update");
        for _ in 0..10 {
            nodeset.zoom(&mut ctx, 2.0, 150.0, 100.0).expect("zoom");
        }
        assert_eq!(nodeset.zoom_transform().k, ZoomTransform::MAX_SCALE);
        let circle = &ctx.surface.plot().select_all("nodes")[0].children()[0];
        assert!(circle.attr("transform").is_some_and(|t| t.ends_with("scale(4)")));
    }
}
