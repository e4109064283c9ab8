use crate::components::{Component, Streamset, XYAxes};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::core::transform::{convert_fields_to_time, sort_by_field};
use crate::error::ChartResult;

use super::{Strategy, push_legend};

/// Stacked layers over a time x axis. Serves both the streamgraph and the
/// stacked area chart; they differ only in their stack defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamgraphStrategy;

impl Strategy for StreamgraphStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> =
            vec![Box::new(XYAxes::new()), Box::new(Streamset::new())];
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, config: &Config, data: &mut [Datum]) {
        let x_field = config.str_or("propertyX", "x");
        convert_fields_to_time(data, &[x_field], config.str_or("xAxisFormat", ""));
        sort_by_field(data, x_field);
    }
}
