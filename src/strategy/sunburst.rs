use crate::components::{Component, RadialAxes, SunburstDisk, TextIndicator};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::Strategy;

/// Radial scales, the partitioned disk and a hover readout at the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunburstStrategy;

impl Strategy for SunburstStrategy {
    fn components(&self, _config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        Ok(vec![
            Box::new(RadialAxes::new()),
            Box::new(SunburstDisk::new()),
            Box::new(TextIndicator::hover_only()),
        ])
    }

    fn prepare(&self, _config: &Config, _data: &mut [Datum]) {}

    fn centered(&self) -> bool {
        true
    }
}
