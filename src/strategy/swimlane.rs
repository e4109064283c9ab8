use crate::components::{Component, Timeboxset, XYAxes};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::core::transform::{convert_fields_to_time, sort_by_field};
use crate::error::ChartResult;

use super::{Strategy, push_legend};

/// Time x axis, categorical lanes and one box per `[start, end]` datum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwimlaneStrategy;

impl Strategy for SwimlaneStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> = vec![Box::new(XYAxes::new())];
        push_legend(config, &mut components);
        components.push(Box::new(Timeboxset::new()));
        Ok(components)
    }

    fn prepare(&self, config: &Config, data: &mut [Datum]) {
        let start = config.str_or("propertyStart", "start");
        let end = config.str_or("propertyEnd", "end");
        convert_fields_to_time(data, &[start, end], config.str_or("xAxisFormat", ""));
        sort_by_field(data, start);
    }
}

#[cfg(test)]
mod tests {
    use super::SwimlaneStrategy;
    use crate::core::config::Config;
    use crate::core::datum::{Datum, FieldValue};
    use crate::strategy::Strategy;

    #[test]
    fn boxes_are_parsed_and_sorted_by_start() {
        let config = Config::new().with("xAxisFormat", "%y/%m/%d");
        let mut data = vec![
            Datum::new().with("key", "b").with("start", "16/03/01").with("end", "16/04/01"),
            Datum::new().with("key", "a").with("start", "16/01/01").with("end", "16/02/01"),
        ];
        SwimlaneStrategy.prepare(&config, &mut data);
        assert_eq!(data[0].key("key").as_deref(), Some("a"));
        assert!(matches!(data[1].field("end"), FieldValue::Time(_)));
    }
}
