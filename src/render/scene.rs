//! Retained SVG scene: a small element tree with keyed join helpers that
//! components mutate in place between draws.

use indexmap::IndexMap;

use crate::core::shape::num;
use crate::error::{ChartError, ChartResult};

/// Attribute holding the series key of a mark.
pub const KEY_ATTR: &str = "data-proteic-key";
/// Attribute holding the series key of a legend entry.
pub const LEGEND_KEY_ATTR: &str = "data-proteic-legend-key";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgNode {
    tag: String,
    attrs: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<SvgNode>,
}

impl SvgNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn attrs(&self) -> &IndexMap<String, String> {
        &self.attrs
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.attrs.insert(name.to_owned(), value.into());
        self
    }

    /// Sets a numeric attribute, rounded the way path data is.
    pub fn set_num(&mut self, name: &str, value: f64) -> &mut Self {
        self.set_attr(name, num(value))
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    #[must_use]
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn styles(&self) -> &IndexMap<String, String> {
        &self.styles
    }

    pub fn set_style(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.styles.insert(name.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|name| name == class))
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<SvgNode> {
        &mut self.children
    }

    /// Appends `child` and returns it for further configuration.
    pub fn append(&mut self, child: SvgNode) -> &mut SvgNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Inserts `child` first, below every existing sibling.
    pub fn prepend(&mut self, child: SvgNode) -> &mut SvgNode {
        self.children.insert(0, child);
        &mut self.children[0]
    }

    #[must_use]
    pub fn child_with_class(&self, class: &str) -> Option<&SvgNode> {
        self.children.iter().find(|child| child.has_class(class))
    }

    pub fn child_with_class_mut(&mut self, class: &str) -> Option<&mut SvgNode> {
        self.children.iter_mut().find(|child| child.has_class(class))
    }

    /// Returns the first child with `class`, appending `<tag class=..>` when
    /// there is none.
    pub fn ensure_child(&mut self, tag: &str, class: &str) -> &mut SvgNode {
        match self.children.iter().position(|child| child.has_class(class)) {
            Some(index) => &mut self.children[index],
            None => self.append(SvgNode::new(tag).with_class(class)),
        }
    }

    /// Child with `class` whose `attr` equals `key`.
    #[must_use]
    pub fn keyed_child(&self, class: &str, attr: &str, key: &str) -> Option<&SvgNode> {
        self.children
            .iter()
            .find(|child| child.has_class(class) && child.attr(attr) == Some(key))
    }

    /// Enter/update join for one keyed child: returns the existing element or
    /// appends a new `<tag class=.. attr=key>`.
    pub fn upsert_keyed(&mut self, tag: &str, class: &str, attr: &str, key: &str) -> &mut SvgNode {
        match self
            .children
            .iter()
            .position(|child| child.has_class(class) && child.attr(attr) == Some(key))
        {
            Some(index) => &mut self.children[index],
            None => self.append(
                SvgNode::new(tag)
                    .with_class(class)
                    .with_attr(attr, key),
            ),
        }
    }

    /// Exit join: drops children with `class` whose `attr` is not in `keep`.
    pub fn retain_keyed(&mut self, class: &str, attr: &str, keep: &[String]) {
        self.children.retain(|child| {
            !child.has_class(class)
                || child
                    .attr(attr)
                    .is_some_and(|key| keep.iter().any(|kept| kept == key))
        });
    }

    /// Removes every descendant carrying `class`.
    pub fn remove_class(&mut self, class: &str) {
        self.children.retain(|child| !child.has_class(class));
        for child in &mut self.children {
            child.remove_class(class);
        }
    }

    /// Depth-first search over this node and its descendants.
    #[must_use]
    pub fn find(&self, predicate: &dyn Fn(&SvgNode) -> bool) -> Option<&SvgNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    pub fn find_mut(&mut self, predicate: &dyn Fn(&SvgNode) -> bool) -> Option<&mut SvgNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(predicate))
    }

    /// Descendants (this node included) carrying `class`, in document order.
    #[must_use]
    pub fn select_all(&self, class: &str) -> Vec<&SvgNode> {
        let mut found = Vec::new();
        self.collect_class(class, &mut found);
        found
    }

    fn collect_class<'a>(&'a self, class: &str, found: &mut Vec<&'a SvgNode>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_class(class, found);
        }
    }

    /// Applies `visit` to this node and every descendant, parents first.
    pub fn visit_mut(&mut self, visit: &mut dyn FnMut(&mut SvgNode)) {
        visit(self);
        for child in &mut self.children {
            child.visit_mut(visit);
        }
    }

    /// Number of elements in this subtree.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SvgNode::count).sum::<usize>()
    }
}

/// Root drawable surface: an `<svg>` element holding the translated
/// `g.chartContainer` plot group.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    root: SvgNode,
    width: f64,
    height: f64,
}

impl Surface {
    pub const PLOT_CLASS: &'static str = "chartContainer";

    /// Outer size in pixels and the plot offset (left/top margins).
    pub fn new(width: f64, height: f64, offset: (f64, f64)) -> ChartResult<Self> {
        let mut surface = Self {
            root: SvgNode::new("svg")
                .with_attr("xmlns", "http://www.w3.org/2000/svg")
                .with_attr("xmlns:xlink", "http://www.w3.org/1999/xlink"),
            width,
            height,
        };
        surface.resize(width, height)?;
        surface
            .root
            .append(SvgNode::new("g").with_class(Self::PLOT_CLASS))
            .set_attr("transform", translate(offset.0, offset.1));
        Ok(surface)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidViewport { width, height });
        }
        self.width = width;
        self.height = height;
        self.root.set_num("width", width).set_num("height", height);
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn root(&self) -> &SvgNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SvgNode {
        &mut self.root
    }

    /// The translated plot group every component draws into.
    #[must_use]
    pub fn plot(&self) -> &SvgNode {
        self.root
            .child_with_class(Self::PLOT_CLASS)
            .unwrap_or(&self.root)
    }

    pub fn plot_mut(&mut self) -> &mut SvgNode {
        self.root.ensure_child("g", Self::PLOT_CLASS)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// `translate(x, y)` transform value.
#[must_use]
pub fn translate(x: f64, y: f64) -> String {
    format!("translate({}, {})", num(x), num(y))
}

#[cfg(test)]
mod tests {
    use super::{KEY_ATTR, Surface, SvgNode};

    #[test]
    fn keyed_joins_enter_update_and_exit() {
        let mut group = SvgNode::new("g");
        group.upsert_keyed("g", "serie", KEY_ATTR, "A").set_attr("fill", "red");
        group.upsert_keyed("g", "serie", KEY_ATTR, "B");
        group.upsert_keyed("g", "serie", KEY_ATTR, "A").set_attr("fill", "blue");
        assert_eq!(group.children().len(), 2);
        assert_eq!(group.keyed_child("serie", KEY_ATTR, "A").and_then(|n| n.attr("fill")), Some("blue"));

        group.retain_keyed("serie", KEY_ATTR, &["B".to_owned()]);
        assert_eq!(group.children().len(), 1);
        assert!(group.keyed_child("serie", KEY_ATTR, "A").is_none());
    }

    #[test]
    fn class_removal_reaches_nested_elements() {
        let mut root = SvgNode::new("g");
        root.append(SvgNode::new("g").with_class("outer"))
            .append(SvgNode::new("rect").with_class("serie other"));
        assert_eq!(root.select_all("serie").len(), 1);
        root.remove_class("serie");
        assert!(root.select_all("serie").is_empty());
        assert_eq!(root.count(), 2);
    }

    #[test]
    fn surface_rejects_empty_viewports() {
        assert!(Surface::new(0.0, 10.0, (0.0, 0.0)).is_err());
        let surface = Surface::new(100.0, 50.0, (10.0, 5.0)).expect("surface");
        assert_eq!(surface.plot().attr("transform"), Some("translate(10, 5)"));
    }
}
