use tracing::{debug, trace};

use crate::core::datum::Datum;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HitRegion, HitShape, HitTarget, PointerEvent, PointerEventKind};
use crate::render::Renderer;

use super::Chart;

/// User callback for one pointer event kind (`onHover`, `onClick`, ...).
pub type PointerHandler = Box<dyn FnMut(&PointerEvent)>;

impl<R: Renderer> Chart<R> {
    /// Registers `handler` for `kind`. Handlers run after the components
    /// reacted to the event, in registration order.
    pub fn on<F>(&mut self, kind: PointerEventKind, handler: F) -> &mut Self
    where
        F: FnMut(&PointerEvent) + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
        self
    }

    /// Pointer moved to `(x, y)` in surface coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<()> {
        validate_point(x, y)?;
        let (px, py) = self.container.to_plot(x, y);
        let mut changed = self.container.dispatch_move(px, py)?;
        let hit = self.container.hit_test(px, py).cloned();
        for event in self.hover.track(px, py, hit.as_ref()) {
            changed |= self.dispatch(event)?;
        }
        self.render_if(changed)
    }

    /// Pointer left the surface.
    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        let mut changed = false;
        let previous = self.hover.current().cloned();
        if let Some(previous) = previous {
            let (x, y) = anchor(&previous);
            for event in self.hover.track(x, y, None) {
                changed |= self.dispatch(event)?;
            }
        }
        self.pressed = None;
        self.render_if(changed)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> ChartResult<()> {
        validate_point(x, y)?;
        let (px, py) = self.container.to_plot(x, y);
        let hit = self.container.hit_test(px, py).cloned();
        self.pressed = hit.clone();
        let changed = self.dispatch(PointerEvent {
            kind: PointerEventKind::Down,
            x: px,
            y: py,
            hit,
        })?;
        self.render_if(changed)
    }

    /// Releases the pointer; a release over the element that was pressed
    /// also produces a `Click`.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> ChartResult<()> {
        validate_point(x, y)?;
        let (px, py) = self.container.to_plot(x, y);
        let hit = self.container.hit_test(px, py).cloned();
        let pressed = self.pressed.take();
        let mut changed = self.dispatch(PointerEvent {
            kind: PointerEventKind::Up,
            x: px,
            y: py,
            hit: hit.clone(),
        })?;
        let clicked = match (&pressed, &hit) {
            (Some(pressed), Some(hit)) => pressed.same_element(hit),
            _ => false,
        };
        if clicked {
            changed |= self.dispatch(PointerEvent {
                kind: PointerEventKind::Click,
                x: px,
                y: py,
                hit,
            })?;
        }
        self.render_if(changed)
    }

    /// Wheel zoom by `factor` around `(x, y)` in surface coordinates.
    pub fn wheel(&mut self, factor: f64, x: f64, y: f64) -> ChartResult<()> {
        validate_point(x, y)?;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let (px, py) = self.container.to_plot(x, y);
        let changed = self.container.dispatch_zoom(factor, px, py)?;
        trace!(factor, changed, "wheel zoom");
        self.render_if(changed)
    }

    /// Toggles the legend entry of `key` as if it were clicked. Returns
    /// whether the chart has a legend entry for it.
    pub fn legend_toggle(&mut self, key: &str) -> ChartResult<bool> {
        let entry = self
            .container
            .context()
            .hits
            .regions()
            .iter()
            .find(|region| matches!(&region.target, HitTarget::LegendEntry { key: k } if k == key))
            .cloned();
        let Some(entry) = entry else {
            debug!(key, "legend toggle ignored: no such entry");
            return Ok(false);
        };
        let (x, y) = anchor(&entry);
        let changed = self.container.dispatch_pointer(&PointerEvent {
            kind: PointerEventKind::Click,
            x,
            y,
            hit: Some(entry),
        })?;
        self.render_if(changed)?;
        Ok(true)
    }

    /// Keys currently toggled off through the legend.
    #[must_use]
    pub fn hidden_keys(&self) -> &[String] {
        self.container.context().hidden_keys()
    }

    /// Datum under the pointer, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&Datum> {
        self.hover.current().map(|region| &region.datum)
    }

    fn dispatch(&mut self, event: PointerEvent) -> ChartResult<bool> {
        let changed = self.container.dispatch_pointer(&event)?;
        for (kind, handler) in &mut self.handlers {
            if *kind == event.kind {
                handler(&event);
            }
        }
        Ok(changed)
    }

    fn render_if(&mut self, changed: bool) -> ChartResult<()> {
        if changed { self.render() } else { Ok(()) }
    }
}

fn validate_point(x: f64, y: f64) -> ChartResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ChartError::InvalidData(
            "pointer position must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn anchor(region: &HitRegion) -> (f64, f64) {
    match region.shape {
        HitShape::Rect { x, y, width, height } => (x + width / 2.0, y + height / 2.0),
        HitShape::Circle { cx, cy, .. } | HitShape::Sector { cx, cy, .. } => (cx, cy),
    }
}
