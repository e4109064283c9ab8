use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::core::transform::nest_by;
use crate::error::ChartResult;
use crate::interaction::{HitShape, HitTarget, PointerEvent, PointerEventKind};
use crate::render::{LEGEND_KEY_ATTR, SvgNode};

const SWATCH: f64 = 20.0;
const ROW_HEIGHT: f64 = 25.0;
const LABEL_CHAR_WIDTH: f64 = 8.0;

/// Key legend drawn in the right margin. Clicking an entry toggles the
/// visibility of every mark carrying that key.
#[derive(Debug, Clone, Default)]
pub struct Legend;

impl Legend {
    pub const CLASS: &'static str = "legend";

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn set_swatch(ctx: &mut RenderContext, key: &str, hidden: bool) {
        let fill = if hidden {
            "transparent".to_owned()
        } else {
            ctx.key_color(key)
        };
        let Some(legend) = ctx.plot().child_with_class_mut(Self::CLASS) else {
            return;
        };
        let entry = legend.children_mut().iter_mut().find(|entry| {
            entry.attr(LEGEND_KEY_ATTR) == Some(key)
        });
        if let Some(rect) = entry.and_then(|entry| {
            entry
                .children_mut()
                .iter_mut()
                .find(|child| child.tag() == "rect")
        }) {
            rect.set_style("fill", fill);
        }
    }
}

impl Component for Legend {
    fn name(&self) -> &'static str {
        "legend"
    }

    fn render(&mut self, _ctx: &mut RenderContext) -> ChartResult<()> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        let key_field = ctx.property("propertyKey", "key");
        let groups = nest_by(data, &key_field);
        if groups.len() == 1 && groups[0].key.is_none() {
            tracing::warn!(
                key_field = key_field.as_str(),
                "legend skipped: data carries no series key"
            );
            return Ok(());
        }

        let owner = self.name();
        ctx.hits.clear_owner(owner);
        let left = ctx.width + 10.0;
        let mut entries = Vec::with_capacity(groups.len());
        for (index, key) in groups.into_iter().filter_map(|group| group.key).enumerate() {
            let top = index as f64 * ROW_HEIGHT;
            let color = ctx.key_color(&key);
            let fill = if ctx.is_hidden(&key) {
                "transparent".to_owned()
            } else {
                color.clone()
            };
            let label_width = key.chars().count() as f64 * LABEL_CHAR_WIDTH;
            ctx.hits.register(
                owner,
                HitShape::rect(left, top, SWATCH + 5.0 + label_width, SWATCH),
                HitTarget::LegendEntry { key: key.clone() },
                Datum::new().with(key_field.as_str(), key.as_str()),
            );
            entries.push((key, top, color, fill));
        }

        let plot = ctx.plot();
        plot.remove_class(Self::CLASS);
        let legend = plot.append(SvgNode::new("g").with_class(Self::CLASS));
        for (key, top, color, fill) in entries {
            let entry = legend.append(
                SvgNode::new("g")
                    .with_class("legend-entry")
                    .with_attr(LEGEND_KEY_ATTR, key.as_str()),
            );
            entry
                .append(SvgNode::new("rect"))
                .set_num("x", left)
                .set_num("y", top)
                .set_num("height", SWATCH)
                .set_num("width", SWATCH)
                .set_style("fill", fill)
                .set_style("stroke", color)
                .set_style("opacity", "0.8");
            entry
                .append(SvgNode::new("text"))
                .set_num("x", left + 25.0)
                .set_num("y", top + 7.0)
                .set_attr("dy", "0.55em")
                .set_attr("font", "14px Montserrat, sans-serif")
                .set_text(key);
        }
        Ok(())
    }

    fn pointer(&mut self, ctx: &mut RenderContext, event: &PointerEvent) -> ChartResult<bool> {
        if event.kind != PointerEventKind::Click {
            return Ok(false);
        }
        let Some(HitTarget::LegendEntry { key }) = event.hit.as_ref().map(|hit| &hit.target) else {
            return Ok(false);
        };
        let hidden = ctx.toggle_hidden(key);
        ctx.apply_visibility();
        Self::set_swatch(ctx, key, hidden);
        tracing::debug!(key = key.as_str(), hidden, "legend entry toggled");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::Legend;
    use crate::components::{Component, RenderContext};
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::interaction::{HitTarget, PointerEvent, PointerEventKind};
    use crate::render::{KEY_ATTR, Surface, SvgNode};

    fn context() -> RenderContext {
        let surface = Surface::new(200.0, 100.0, (0.0, 0.0)).expect("surface");
        RenderContext::new(Config::new(), 200.0, 100.0, surface).expect("context")
    }

    #[test]
    fn entries_follow_series_keys() {
        let mut ctx = context();
        let data = vec![
            Datum::new().with("key", "A").with("y", 1.0),
            Datum::new().with("key", "B").with("y", 2.0),
        ];
        Legend::new().update(&mut ctx, &data).expect("legend");
        let entries = ctx.surface.plot().select_all("legend-entry");
        assert_eq!(entries.len(), 2);
        assert_eq!(ctx.hits.len(), 2);
    }

    #[test]
    fn unkeyed_data_draws_no_legend() {
        let mut ctx = context();
        let data = vec![Datum::new().with("y", 1.0)];
        Legend::new().update(&mut ctx, &data).expect("legend");
        assert!(ctx.surface.plot().child_with_class(Legend::CLASS).is_none());
    }

    #[test]
    fn click_toggles_series_opacity() {
        let mut ctx = context();
        ctx.plot()
            .append(SvgNode::new("g").with_class("serie").with_attr(KEY_ATTR, "A"));
        let mut legend = Legend::new();
        legend
            .update(&mut ctx, &[Datum::new().with("key", "A")])
            .expect("legend");
        let hit = ctx.hits.hit_test(215.0, 5.0).cloned();
        assert!(matches!(hit.as_ref().map(|h| &h.target), Some(HitTarget::LegendEntry { .. })));
        let click = PointerEvent {
            kind: PointerEventKind::Click,
            x: 215.0,
            y: 5.0,
            hit,
        };

        assert!(legend.pointer(&mut ctx, &click).expect("toggle"));
        let serie = ctx.surface.plot().child_with_class("serie").expect("serie");
        assert_eq!(serie.style("opacity"), Some("0.06"));

        assert!(legend.pointer(&mut ctx, &click).expect("toggle"));
        let serie = ctx.surface.plot().child_with_class("serie").expect("serie");
        assert_eq!(serie.style("opacity"), Some("1"));
    }
}
