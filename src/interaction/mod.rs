//! Pointer hit regions, hover tracking and zoom state.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::datum::Datum;
use crate::core::shape::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerEventKind {
    Down,
    Up,
    Hover,
    Leave,
    Click,
}

impl PointerEventKind {
    /// Option-style handler name (`onDown`, ...).
    #[must_use]
    pub const fn handler_name(self) -> &'static str {
        match self {
            Self::Down => "onDown",
            Self::Up => "onUp",
            Self::Hover => "onHover",
            Self::Leave => "onLeave",
            Self::Click => "onClick",
        }
    }
}

/// Geometry of a hit region in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Sector {
        cx: f64,
        cy: f64,
        arc: Arc,
    },
}

impl HitShape {
    /// Rectangle from possibly negative extents.
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            x: x.min(x + width),
            y: y.min(y + height),
            width: width.abs(),
            height: height.abs(),
        }
    }

    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match *self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => px >= x && px <= x + width && py >= y && py <= y + height,
            Self::Circle { cx, cy, r } => (px - cx).powi(2) + (py - cy).powi(2) <= r * r,
            Self::Sector { cx, cy, arc } => arc.contains(px - cx, py - cy),
        }
    }

    /// Squared distance from `(px, py)` to the shape's anchor point.
    #[must_use]
    pub fn anchor_distance2(&self, px: f64, py: f64) -> f64 {
        let (ax, ay) = match *self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => (x + width / 2.0, y + height / 2.0),
            Self::Circle { cx, cy, .. } => (cx, cy),
            Self::Sector { cx, cy, arc } => {
                let (dx, dy) = arc.centroid();
                (cx + dx, cy + dy)
            }
        };
        (px - ax).powi(2) + (py - ay).powi(2)
    }
}

/// What a hit region stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A series mark bound to one datum.
    Mark { key: Option<String> },
    LegendEntry { key: String },
    /// Node index in the sunburst hierarchy.
    SunburstNode { index: usize },
    /// Node index in the network simulation.
    NetworkNode { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub owner: &'static str,
    pub layer: usize,
    pub shape: HitShape,
    pub target: HitTarget,
    pub datum: Datum,
}

impl HitRegion {
    pub(crate) fn same_element(&self, other: &HitRegion) -> bool {
        self.owner == other.owner && self.target == other.target && self.datum == other.datum
    }
}

/// Pointer event delivered to components and user handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    pub hit: Option<HitRegion>,
}

/// Hit regions registered by components during update, in paint order.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<HitRegion>,
    layer: usize,
}

impl HitMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions registered from now on paint above earlier layers.
    pub fn set_layer(&mut self, layer: usize) {
        self.layer = layer;
    }

    /// Drops every region registered by `owner`.
    pub fn clear_owner(&mut self, owner: &str) {
        self.regions.retain(|region| region.owner != owner);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, owner: &'static str, shape: HitShape, target: HitTarget, datum: Datum) {
        self.regions.push(HitRegion {
            owner,
            layer: self.layer,
            shape,
            target,
            datum,
        });
    }

    #[must_use]
    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Topmost region under the pointer: highest layer first, then the
    /// region whose anchor is closest to the pointer.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&HitRegion> {
        let mut candidates: SmallVec<[(usize, OrderedFloat<f64>, usize); 4]> = SmallVec::new();
        for (index, region) in self.regions.iter().enumerate() {
            if region.shape.contains(x, y) {
                candidates.push((
                    region.layer,
                    OrderedFloat(region.shape.anchor_distance2(x, y)),
                    index,
                ));
            }
        }
        candidates
            .into_iter()
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(&b.2)))
            .map(|(_, _, index)| &self.regions[index])
    }
}

/// Tracks the element under the pointer to derive hover/leave transitions.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    current: Option<HitRegion>,
}

impl HoverState {
    /// Updates the hovered element and returns the events the move produced
    /// (a `Leave` for the old element before a `Hover` for the new one).
    pub fn track(&mut self, x: f64, y: f64, hit: Option<&HitRegion>) -> SmallVec<[PointerEvent; 2]> {
        let mut events = SmallVec::new();
        let unchanged = match (&self.current, hit) {
            (Some(current), Some(hit)) => current.same_element(hit),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return events;
        }
        if let Some(previous) = self.current.take() {
            events.push(PointerEvent {
                kind: PointerEventKind::Leave,
                x,
                y,
                hit: Some(previous),
            });
        }
        if let Some(hit) = hit {
            self.current = Some(hit.clone());
            events.push(PointerEvent {
                kind: PointerEventKind::Hover,
                x,
                y,
                hit: Some(hit.clone()),
            });
        }
        events
    }

    #[must_use]
    pub fn current(&self) -> Option<&HitRegion> {
        self.current.as_ref()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// Pan/zoom transform applied as `translate(x, y) scale(k)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl ZoomTransform {
    pub const MIN_SCALE: f64 = 0.5;
    pub const MAX_SCALE: f64 = 4.0;

    /// Multiplies the scale by `factor` (clamped to the scale extent) while
    /// keeping the plot point under `(px, py)` fixed.
    pub fn zoom_at(&mut self, factor: f64, px: f64, py: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = (self.k * factor).clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        let (wx, wy) = self.invert(px, py);
        self.k = k;
        self.x = px - wx * k;
        self.y = py - wy * k;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    #[must_use]
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.x) / self.k, (y - self.y) / self.k)
    }

    #[must_use]
    pub fn to_attr(&self) -> String {
        use crate::core::shape::num;
        format!(
            "translate({}, {}) scale({})",
            num(self.x),
            num(self.y),
            num(self.k)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{HitMap, HitShape, HitTarget, HoverState, PointerEventKind, ZoomTransform};
    use crate::core::datum::Datum;

    #[test]
    fn later_layers_win_and_nearest_anchor_breaks_ties() {
        let mut hits = HitMap::new();
        hits.register(
            "points",
            HitShape::Circle { cx: 0.0, cy: 0.0, r: 10.0 },
            HitTarget::Mark { key: Some("A".into()) },
            Datum::new().with("x", 0.0),
        );
        hits.register(
            "points",
            HitShape::Circle { cx: 5.0, cy: 0.0, r: 10.0 },
            HitTarget::Mark { key: Some("A".into()) },
            Datum::new().with("x", 5.0),
        );
        let hit = hits.hit_test(4.0, 0.0).expect("hit");
        assert_eq!(hit.datum.number("x"), Some(5.0));

        hits.set_layer(1);
        hits.register(
            "legend",
            HitShape::rect(-20.0, -20.0, 40.0, 40.0),
            HitTarget::LegendEntry { key: "A".into() },
            Datum::new(),
        );
        assert!(matches!(
            hits.hit_test(4.0, 0.0).map(|hit| &hit.target),
            Some(HitTarget::LegendEntry { .. })
        ));
        hits.clear_owner("legend");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn hover_emits_leave_before_hover() {
        let mut hits = HitMap::new();
        hits.register(
            "bars",
            HitShape::rect(0.0, 0.0, 10.0, 10.0),
            HitTarget::Mark { key: None },
            Datum::new(),
        );
        let mut hover = HoverState::default();
        let entered = hover.track(5.0, 5.0, hits.hit_test(5.0, 5.0));
        assert_eq!(entered.len(), 1);
        assert_eq!(entered[0].kind, PointerEventKind::Hover);
        assert!(hover.track(6.0, 6.0, hits.hit_test(6.0, 6.0)).is_empty());
        let left = hover.track(50.0, 50.0, hits.hit_test(50.0, 50.0));
        assert_eq!(left[0].kind, PointerEventKind::Leave);
    }

    #[test]
    fn zoom_is_clamped_and_keeps_anchor_fixed() {
        let mut zoom = ZoomTransform::default();
        zoom.zoom_at(2.0, 100.0, 50.0);
        assert_eq!(zoom.apply(100.0, 50.0), (100.0, 50.0));
        zoom.zoom_at(100.0, 0.0, 0.0);
        assert_eq!(zoom.k, ZoomTransform::MAX_SCALE);
        zoom.zoom_at(0.001, 0.0, 0.0);
        assert_eq!(zoom.k, ZoomTransform::MIN_SCALE);
    }
}
