use crate::components::{Component, SectorSet};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Strategy, push_legend};

/// Pie slices around the plot center.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieChartStrategy;

impl Strategy for PieChartStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> = vec![Box::new(SectorSet::new())];
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, _config: &Config, _data: &mut [Datum]) {}

    fn centered(&self) -> bool {
        true
    }
}
