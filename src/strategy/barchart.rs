use crate::components::{Barset, Component, XYAxes};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Incoming, Strategy, prepare_xy, push_legend};

/// Axes and grouped/stacked bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarchartStrategy;

impl Strategy for BarchartStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> =
            vec![Box::new(XYAxes::new()), Box::new(Barset::new())];
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, config: &Config, data: &mut [Datum]) {
        prepare_xy(config, data);
    }

    /// A batch replaces the dataset; a single datum replaces the one with
    /// the same `(x, key)` or is appended.
    fn keep_drawing(&self, config: &Config, data: &mut Vec<Datum>, incoming: Incoming) {
        match incoming {
            Incoming::Many(batch) => *data = batch,
            Incoming::One(datum) => {
                let x_field = config.str_or("propertyX", "x");
                let key_field = config.str_or("propertyKey", "key");
                let same_bar = |existing: &Datum| {
                    existing.field(x_field) == datum.field(x_field)
                        && existing.field(key_field) == datum.field(key_field)
                };
                match data.iter().position(same_bar) {
                    Some(index) => data[index] = datum,
                    None => data.push(datum),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BarchartStrategy;
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::strategy::Strategy;

    fn bar(x: &str, key: &str, y: f64) -> Datum {
        Datum::new().with("x", x).with("key", key).with("y", y)
    }

    #[test]
    fn single_datums_upsert_by_x_and_key() {
        let mut data = vec![bar("a", "K", 1.0), bar("b", "K", 2.0)];
        let config = Config::new();
        BarchartStrategy.keep_drawing(&config, &mut data, bar("a", "K", 9.0).into());
        BarchartStrategy.keep_drawing(&config, &mut data, bar("a", "L", 4.0).into());
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].number("y"), Some(9.0));

        BarchartStrategy.keep_drawing(&config, &mut data, vec![bar("z", "K", 1.0)].into());
        assert_eq!(data.len(), 1);
    }
}
