use crate::components::{Component, RenderContext, TextIndicator};
use crate::core::datum::Datum;
use crate::core::hierarchy::Hierarchy;
use crate::core::shape::{Arc, num};
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget, PointerEvent, PointerEventKind};
use crate::render::SvgNode;

const NODE_ATTR: &str = "data-proteic-node";
const DIM_OPACITY: &str = "0.3";

/// Partitioned hierarchy drawn as concentric arcs around the plot origin.
#[derive(Debug, Clone, Default)]
pub struct SunburstDisk {
    tree: Option<Hierarchy>,
}

impl SunburstDisk {
    pub const CLASS: &'static str = "sunburst";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.tree.as_ref()
    }

    fn highlight(ctx: &mut RenderContext, path: &[usize]) {
        let keep: Vec<String> = path.iter().map(usize::to_string).collect();
        let dim = !keep.is_empty();
        let Some(disk) = ctx.plot().child_with_class_mut(Self::CLASS) else {
            return;
        };
        for node in disk.children_mut() {
            let kept = node
                .attr(NODE_ATTR)
                .is_some_and(|index| keep.iter().any(|k| k == index));
            let opacity = if dim && !kept { DIM_OPACITY } else { "1" };
            node.set_style("opacity", opacity);
        }
    }
}

impl Component for SunburstDisk {
    fn name(&self) -> &'static str {
        "sunburst-disk"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let owner = self.name();
        ctx.hits.clear_owner(owner);
        ctx.plot().remove_class(Self::CLASS);
        if data.is_empty() {
            self.tree = None;
            return Ok(());
        }
        let scales = ctx.radial_scales()?;
        let mut tree = Hierarchy::stratify(data, "id", "parent")?;
        tree.sum("value");
        tree.partition();

        let angle = |t: f64| scales.angle.to_pixel(t).clamp(0.0, std::f64::consts::TAU);
        let radius = |t: f64| scales.radius.to_pixel(t).max(0.0);
        let mut arcs = Vec::with_capacity(tree.len());
        for index in tree.descendants() {
            let node = tree.node(index);
            let arc = Arc::new(radius(node.y0), radius(node.y1), angle(node.x0), angle(node.x1));
            let fill = match node.parent {
                None => "white".to_owned(),
                Some(_) => ctx.key_color(&node.datum.key("label").unwrap_or_default()),
            };
            ctx.hits.register(
                owner,
                HitShape::Sector {
                    cx: 0.0,
                    cy: 0.0,
                    arc,
                },
                HitTarget::SunburstNode { index },
                node.datum.clone(),
            );
            arcs.push((index, arc.path(), fill));
        }
        tracing::trace!(nodes = arcs.len(), "sunburst partitioned");

        let disk = ctx.plot().append(SvgNode::new("g").with_class(Self::CLASS));
        for (index, d, fill) in arcs {
            disk.append(SvgNode::new("path").with_attr(NODE_ATTR, index.to_string()))
                .set_attr("d", d)
                .set_style("fill", fill)
                .set_style("stroke", "#fff")
                .set_style("stroke-width", "2")
                .set_style("shape-rendering", "crispEdge");
        }
        self.tree = Some(tree);
        Ok(())
    }

    fn pointer(&mut self, ctx: &mut RenderContext, event: &PointerEvent) -> ChartResult<bool> {
        match (event.kind, event.hit.as_ref().map(|hit| &hit.target)) {
            (PointerEventKind::Hover, Some(HitTarget::SunburstNode { index })) => {
                let Some(tree) = self.tree.as_ref() else {
                    return Ok(false);
                };
                let node = tree.node(*index);
                let label = node.datum.key("label").unwrap_or_default();
                let value = num(node.value);
                Self::highlight(ctx, &tree.ancestry(*index));
                TextIndicator::show(ctx, &value, &label);
                Ok(true)
            }
            (PointerEventKind::Leave, Some(HitTarget::SunburstNode { .. })) => {
                Self::highlight(ctx, &[]);
                TextIndicator::show(ctx, "", "");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SunburstDisk;
    use crate::components::{Component, RadialAxes, RenderContext, TextIndicator};
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::interaction::{PointerEvent, PointerEventKind};
    use crate::render::Surface;

    fn node(id: &str, parent: &str, value: f64) -> Datum {
        Datum::new()
            .with("id", id)
            .with("parent", parent)
            .with("label", id)
            .with("value", value)
    }

    #[test]
    fn hover_dims_everything_but_the_ancestry() {
        let surface = Surface::new(200.0, 200.0, (100.0, 100.0)).expect("surface");
        let mut ctx = RenderContext::new(Config::new(), 200.0, 200.0, surface).expect("context");
        let mut axes = RadialAxes::new();
        let mut disk = SunburstDisk::new();
        let mut indicator = TextIndicator::hover_only();
        axes.render(&mut ctx).expect("axes");
        indicator.render(&mut ctx).expect("indicator");
        let data = vec![
            node("root", "", 0.0),
            node("a", "root", 3.0),
            node("b", "root", 1.0),
        ];
        disk.update(&mut ctx, &data).expect("disk");
        assert_eq!(ctx.hits.len(), 3);

        let root = ctx.surface.plot().child_with_class(SunburstDisk::CLASS).expect("disk");
        assert_eq!(root.children()[0].style("fill"), Some("white"));

        let hit = ctx.hits.hit_test(75.0, 0.0).cloned();
        let hover = PointerEvent {
            kind: PointerEventKind::Hover,
            x: 75.0,
            y: 0.0,
            hit: hit.clone(),
        };
        assert!(disk.pointer(&mut ctx, &hover).expect("hover"));
        let paths = ctx.surface.plot().child_with_class(SunburstDisk::CLASS).expect("disk");
        let dimmed = paths
            .children()
            .iter()
            .filter(|path| path.style("opacity") == Some("0.3"))
            .count();
        assert_eq!(dimmed, 2);
        let value = ctx.surface.plot().select_all("value");
        assert_eq!(value[0].text(), Some("3"));

        let leave = PointerEvent {
            kind: PointerEventKind::Leave,
            hit,
            ..hover
        };
        disk.pointer(&mut ctx, &leave).expect("leave");
        let value = ctx.surface.plot().select_all("value");
        assert_eq!(value[0].text(), Some(""));
    }
}
