use crate::components::{CanvasPointset, Component, Pointset, XYAxes};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Strategy, prepare_xy, push_legend};

/// Axes and markers, painted on the canvas layer when `canvas` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterplotStrategy;

impl Strategy for ScatterplotStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let markers: Box<dyn Component> = if config.flag("canvas") {
            Box::new(CanvasPointset::new())
        } else {
            Box::new(Pointset::new())
        };
        let mut components: Vec<Box<dyn Component>> = vec![Box::new(XYAxes::new()), markers];
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, config: &Config, data: &mut [Datum]) {
        prepare_xy(config, data);
    }
}
