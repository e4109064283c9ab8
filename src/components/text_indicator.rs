use crate::components::{Component, RenderContext};
use crate::core::datum::Datum;
use crate::error::ChartResult;
use crate::render::{SvgNode, translate};

/// Centered value/label pair (`g.text-indicator`).
///
/// When following data, every update shows the latest datum's value and
/// label; otherwise the texts are only filled by hover interaction.
#[derive(Debug, Clone)]
pub struct TextIndicator {
    offset: Option<(f64, f64)>,
    follow_data: bool,
}

impl Default for TextIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextIndicator {
    pub const CLASS: &'static str = "text-indicator";

    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: None,
            follow_data: true,
        }
    }

    #[must_use]
    pub fn hover_only() -> Self {
        Self {
            offset: None,
            follow_data: false,
        }
    }

    #[must_use]
    pub fn translated(mut self, x: f64, y: f64) -> Self {
        self.offset = Some((x, y));
        self
    }

    /// Writes `value` and `label` into an already rendered indicator.
    pub fn show(ctx: &mut RenderContext, value: &str, label: &str) {
        let Some(indicator) = ctx.plot().child_with_class_mut(Self::CLASS) else {
            return;
        };
        for child in indicator.children_mut() {
            if child.has_class("value") {
                child.set_text(value);
            } else if child.has_class("label") {
                child.set_text(label);
            }
        }
    }
}

impl Component for TextIndicator {
    fn name(&self) -> &'static str {
        "text-indicator"
    }

    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()> {
        let offset = self.offset;
        let plot = ctx.plot();
        plot.remove_class(Self::CLASS);
        let indicator = plot.append(
            SvgNode::new("g")
                .with_class(Self::CLASS)
                .with_attr("pointer-events", "none"),
        );
        indicator
            .set_style("text-anchor", "middle")
            .set_style("alignment-baseline", "central");
        if let Some((x, y)) = offset {
            indicator.set_attr("transform", translate(x, y));
        }
        for (class, shift) in [("value", None), ("label", Some("translate(0, 1.5em)"))] {
            let text = indicator.append(
                SvgNode::new("text")
                    .with_class(class)
                    .with_attr("x", "0")
                    .with_attr("y", "0")
                    .with_attr("pointer-events", "none"),
            );
            text.set_text("").set_style("text-anchor", "middle");
            if let Some(shift) = shift {
                text.set_style("transform", shift);
            }
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()> {
        if !self.follow_data {
            return Ok(());
        }
        let Some(latest) = data.last() else {
            return Ok(());
        };
        let value_field = ctx.property("propertyValue", "value");
        let value = latest.field(&value_field).key_string().unwrap_or_default();
        let label = latest
            .key("label")
            .or_else(|| ctx.config.label("label"))
            .unwrap_or_default();
        Self::show(ctx, &value, &label);
        Ok(())
    }
}
