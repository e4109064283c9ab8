use crate::components::{Component, LinkedNodeset};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Strategy, push_legend};

/// Force-directed nodes and links. Zoom is handled by the node set itself
/// and gated on the `zoom` option.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkStrategy;

impl Strategy for NetworkStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> = vec![Box::new(LinkedNodeset::new())];
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, _config: &Config, _data: &mut [Datum]) {}
}
