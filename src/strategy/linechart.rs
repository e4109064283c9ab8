use crate::components::{Areaset, Component, Lineset, Pointset, XYAxes};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;

use super::{Incoming, Strategy, prepare_xy, push_legend};

/// Axes and lines, plus areas when `areaOpacity > 0` and markers when
/// `markerSize > 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinechartStrategy;

impl Strategy for LinechartStrategy {
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>> {
        let mut components: Vec<Box<dyn Component>> =
            vec![Box::new(XYAxes::new()), Box::new(Lineset::new())];
        if config.f64_or("areaOpacity", 0.0)? > 0.0 {
            components.push(Box::new(Areaset::new()));
        }
        if config.f64_or("markerSize", 0.0)? > 0.0 {
            components.push(Box::new(Pointset::new()));
        }
        push_legend(config, &mut components);
        Ok(components)
    }

    fn prepare(&self, config: &Config, data: &mut [Datum]) {
        prepare_xy(config, data);
    }

    /// Appends, then keeps only the newest `maxNumberOfElements` datums.
    fn keep_drawing(&self, config: &Config, data: &mut Vec<Datum>, incoming: Incoming) {
        data.extend(incoming.into_vec());
        let Ok(limit) = config.usize("maxNumberOfElements") else {
            return;
        };
        if data.len() > limit {
            let overflow = data.len() - limit;
            data.drain(..overflow);
            tracing::trace!(overflow, limit, "line chart window slid");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LinechartStrategy;
    use crate::core::config::Config;
    use crate::core::datum::Datum;
    use crate::strategy::Strategy;

    #[test]
    fn optional_layers_follow_the_config() {
        let plain = Config::new().with("areaOpacity", 0).with("markerSize", 0);
        let rich = Config::new()
            .with("areaOpacity", 0.4)
            .with("markerSize", 20)
            .with("legend", true);
        let strategy = LinechartStrategy;
        assert_eq!(strategy.components(&plain).expect("plain").len(), 2);
        let names: Vec<&str> = strategy
            .components(&rich)
            .expect("rich")
            .iter()
            .map(|component| component.name())
            .collect();
        assert_eq!(names, ["xy-axes", "lineset", "areaset", "pointset", "legend"]);
    }

    #[test]
    fn keep_drawing_slides_the_window() {
        let config = Config::new().with("maxNumberOfElements", 3);
        let mut data: Vec<Datum> = (0..3).map(|x| Datum::new().with("x", f64::from(x))).collect();
        LinechartStrategy.keep_drawing(&config, &mut data, Datum::new().with("x", 3.0).into());
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].number("x"), Some(1.0));
    }
}
