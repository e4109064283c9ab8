use crate::components::{Component, Dial, DialNeedle, TextIndicator};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Incoming, Strategy};

/// Dial, needle and (with `numericIndicator`) a value readout below the
/// dial center.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaugeStrategy;

impl Strategy for GaugeStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> =
            vec![Box::new(Dial::new()), Box::new(DialNeedle::new())];
        if config.flag("numericIndicator") {
            let r = config.inner_width()?.min(config.inner_height()?) / 2.0;
            components.push(Box::new(TextIndicator::new().translated(r, r + 75.0)));
        }
        Ok(components)
    }

    fn prepare(&self, _config: &Config, _data: &mut [Datum]) {}

    /// Only the newest datum is kept.
    fn keep_drawing(&self, _config: &Config, data: &mut Vec<Datum>, incoming: Incoming) {
        if let Some(latest) = incoming.into_vec().pop() {
            data.clear();
            data.push(latest);
        }
    }
}
