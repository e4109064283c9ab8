use tracing::{debug, trace};

use crate::components::{Component, RenderContext};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::core::shape::num;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HitRegion, PointerEvent};
use crate::render::{CanvasLayer, Surface, SvgNode, translate};

pub const LOADING_ICON_ID: &str = "loadingIcon";

/// Root surface plus the ordered components drawn on it.
///
/// The surface is the plot size plus the margins; the plot group starts
/// translated by the left/top margins.
pub struct Container {
    ctx: RenderContext,
    components: Vec<Box<dyn Component>>,
    offset: (f64, f64),
}

impl Container {
    pub fn new(config: Config) -> ChartResult<Self> {
        let width = config.inner_width()?;
        let height = config.inner_height()?;
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        let left = config.f64("marginLeft")?;
        let top = config.f64("marginTop")?;
        let outer_width = width + left + config.f64("marginRight")?;
        let outer_height = height + top + config.f64("marginBottom")?;

        let mut surface = Surface::new(outer_width, outer_height, (left, top))?;
        surface
            .root_mut()
            .set_attr("class", "proteic")
            .set_attr("preserveAspectRatio", "xMinYMin meet")
            .set_attr(
                "viewBox",
                format!("0 0 {} {}", num(outer_width), num(outer_height)),
            );
        debug!(outer_width, outer_height, width, height, "container created");

        Ok(Self {
            ctx: RenderContext::new(config, width, height, surface)?,
            components: Vec::new(),
            offset: (left, top),
        })
    }

    /// Renders `component`'s static structure and attaches it.
    pub fn add(&mut self, mut component: Box<dyn Component>) -> ChartResult<&mut Self> {
        self.ctx.hits.set_layer(self.components.len());
        component.render(&mut self.ctx)?;
        trace!(component = component.name(), "component added");
        self.components.push(component);
        Ok(self)
    }

    /// Updates every component, in attachment order, from one snapshot.
    pub fn update_components(&mut self, data: &[Datum]) -> ChartResult<()> {
        for (layer, component) in self.components.iter_mut().enumerate() {
            self.ctx.hits.set_layer(layer);
            component.update(&mut self.ctx, data)?;
        }
        Ok(())
    }

    /// Moves the plot origin to `(x, y)` in surface coordinates.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.offset = (x, y);
        self.ctx.plot().set_attr("transform", translate(x, y));
    }

    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Surface coordinates to plot coordinates.
    #[must_use]
    pub fn to_plot(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.offset.0, y - self.offset.1)
    }

    pub fn add_loading_icon(&mut self) {
        if self.has_loading_icon() {
            return;
        }
        let href = self.ctx.config.str_or("loadingIcon", "").to_owned();
        self.ctx.surface.root_mut().append(
            SvgNode::new("image")
                .with_attr("id", LOADING_ICON_ID)
                .with_attr("width", "25%")
                .with_attr("height", "25%")
                .with_attr("x", "25%")
                .with_attr("y", "25%")
                .with_attr("xlink:href", href),
        );
    }

    pub fn remove_loading_icon(&mut self) {
        self.ctx
            .surface
            .root_mut()
            .children_mut()
            .retain(|child| child.attr("id") != Some(LOADING_ICON_ID));
    }

    #[must_use]
    pub fn has_loading_icon(&self) -> bool {
        self.ctx
            .surface
            .root()
            .children()
            .iter()
            .any(|child| child.attr("id") == Some(LOADING_ICON_ID))
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.ctx.surface
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&CanvasLayer> {
        self.ctx.canvas.as_ref()
    }

    /// Plot size (margins excluded).
    #[must_use]
    pub fn plot_size(&self) -> (f64, f64) {
        (self.ctx.width, self.ctx.height)
    }

    #[must_use]
    pub fn component_names(&self) -> Vec<&'static str> {
        self.components.iter().map(|component| component.name()).collect()
    }

    /// Topmost hit region under a plot-space point.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&HitRegion> {
        self.ctx.hits.hit_test(x, y)
    }

    pub(crate) fn dispatch_pointer(&mut self, event: &PointerEvent) -> ChartResult<bool> {
        let mut changed = false;
        for component in &mut self.components {
            changed |= component.pointer(&mut self.ctx, event)?;
        }
        Ok(changed)
    }

    pub(crate) fn dispatch_move(&mut self, x: f64, y: f64) -> ChartResult<bool> {
        let mut changed = false;
        for component in &mut self.components {
            changed |= component.pointer_move(&mut self.ctx, x, y)?;
        }
        Ok(changed)
    }

    pub(crate) fn dispatch_zoom(&mut self, factor: f64, x: f64, y: f64) -> ChartResult<bool> {
        let mut changed = false;
        for component in &mut self.components {
            changed |= component.zoom(&mut self.ctx, factor, x, y)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::Container;
    use crate::components::TextIndicator;
    use crate::core::config::Config;
    use crate::error::ChartError;
    use serde_json::json;

    fn config() -> Config {
        Config::from_pairs([
            ("width", json!(300)),
            ("height", json!(200)),
            ("marginTop", json!(10)),
            ("marginRight", json!(40)),
            ("marginBottom", json!(20)),
            ("marginLeft", json!(60)),
        ])
    }

    #[test]
    fn surface_adds_margins_around_the_plot() {
        let container = Container::new(config()).expect("container");
        assert_eq!(container.plot_size(), (200.0, 200.0));
        let root = container.surface().root();
        assert_eq!(root.attr("width"), Some("300"));
        assert_eq!(root.attr("height"), Some("230"));
        assert_eq!(root.attr("viewBox"), Some("0 0 300 230"));
        assert_eq!(root.attr("class"), Some("proteic"));
        assert_eq!(container.surface().plot().attr("transform"), Some("translate(60, 10)"));
        assert_eq!(container.to_plot(70.0, 15.0), (10.0, 5.0));
    }

    #[test]
    fn margins_wider_than_the_surface_are_rejected() {
        let narrow = config().with("width", 90);
        let err = Container::new(narrow).err().expect("plot width is negative");
        assert!(matches!(err, ChartError::InvalidViewport { width, .. } if width == -10.0));
        assert!(Container::new(config().with("height", 0)).is_err());
    }

    #[test]
    fn translate_replaces_the_margin_offset() {
        let mut container = Container::new(config()).expect("container");
        container.translate(100.0, 100.0);
        assert_eq!(container.surface().plot().attr("transform"), Some("translate(100, 100)"));
        assert_eq!(container.offset(), (100.0, 100.0));
    }

    #[test]
    fn loading_icon_is_added_once_and_removed() {
        let mut container = Container::new(config()).expect("container");
        container.add_loading_icon();
        container.add_loading_icon();
        let icons = container
            .surface()
            .root()
            .children()
            .iter()
            .filter(|child| child.tag() == "image")
            .count();
        assert_eq!(icons, 1);
        container.remove_loading_icon();
        assert!(!container.has_loading_icon());
    }

    #[test]
    fn components_render_when_added() {
        let mut container = Container::new(config()).expect("container");
        container.add(Box::new(TextIndicator::new())).expect("add");
        assert_eq!(container.component_names(), vec!["text-indicator"]);
        assert!(container.surface().plot().child_with_class(TextIndicator::CLASS).is_some());
    }
}
