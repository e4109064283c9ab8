use std::sync::mpsc::Receiver;

use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::datasource::{Datasource, DatasourceEvent};
use crate::interaction::{HitRegion, HoverState, PointerEventKind};
use crate::render::{CanvasLayer, Renderer, write_svg};
use crate::strategy::Strategy;

use super::{ChartKind, Container, PointerHandler};

/// A data source attached to a chart and the receiving end of its events.
pub(super) struct AttachedSource {
    pub(super) source: Box<dyn Datasource>,
    pub(super) events: Receiver<DatasourceEvent>,
}

/// Main facade consumed by host applications.
///
/// `Chart` owns the dataset, the strategy of its chart kind, the container
/// with the rendered components and the renderer every draw is handed to.
pub struct Chart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) kind: ChartKind,
    pub(super) strategy: Box<dyn Strategy>,
    pub(super) container: Container,
    pub(super) data: Vec<Datum>,
    pub(super) hover: HoverState,
    pub(super) pressed: Option<HitRegion>,
    pub(super) handlers: Vec<(PointerEventKind, PointerHandler)>,
    pub(super) source: Option<AttachedSource>,
}

impl<R: Renderer> Chart<R> {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Defaults merged with the user's values.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.container.config()
    }

    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Current SVG document.
    #[must_use]
    pub fn svg(&self) -> String {
        write_svg(self.container.surface().root())
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&CanvasLayer> {
        self.container.canvas()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
