//! Per-chart drawing strategies.
//!
//! A strategy decides which components a chart is made of, how a raw data
//! snapshot is coerced and ordered before the components see it, and how
//! incoming datums are merged into the chart's dataset.

mod barchart;
mod gauge;
mod linechart;
mod network;
mod piechart;
mod scatterplot;
mod streamgraph;
mod sunburst;
mod swimlane;

pub use barchart::BarchartStrategy;
pub use gauge::GaugeStrategy;
pub use linechart::LinechartStrategy;
pub use network::NetworkStrategy;
pub use piechart::PieChartStrategy;
pub use scatterplot::ScatterplotStrategy;
pub use streamgraph::StreamgraphStrategy;
pub use sunburst::SunburstStrategy;
pub use swimlane::SwimlaneStrategy;

use crate::components::{Component, Legend};
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::core::transform::{AxisField, convert_by_xy_format, sort_by_field};
use crate::error::ChartResult;

/// Datums pushed into a running chart: a single object or a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    One(Datum),
    Many(Vec<Datum>),
}

impl Incoming {
    #[must_use]
    pub fn into_vec(self) -> Vec<Datum> {
        match self {
            Self::One(datum) => vec![datum],
            Self::Many(data) => data,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(data) => data.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Datum> for Incoming {
    fn from(datum: Datum) -> Self {
        Self::One(datum)
    }
}

impl From<Vec<Datum>> for Incoming {
    fn from(data: Vec<Datum>) -> Self {
        Self::Many(data)
    }
}

/// How one chart kind is assembled and fed.
pub trait Strategy {
    /// Components in render/update order.
    fn components(&self, config: &Config) -> ChartResult<Vec<Box<dyn Component>>>;

    /// Coerces field types and orders a snapshot before drawing.
    fn prepare(&self, config: &Config, data: &mut [Datum]);

    /// Whether the plot origin sits at the plot center instead of the
    /// top-left margin corner.
    fn centered(&self) -> bool {
        false
    }

    /// Merges pushed datums into the chart dataset. Appends by default.
    fn keep_drawing(&self, _config: &Config, data: &mut Vec<Datum>, incoming: Incoming) {
        data.extend(incoming.into_vec());
    }
}

/// Appends a `Legend` when the `legend` option is on.
pub(crate) fn push_legend(config: &Config, components: &mut Vec<Box<dyn Component>>) {
    if config.flag("legend") {
        components.push(Box::new(Legend::new()));
    }
}

/// Coerces x/y through their axis types, then sorts by x.
pub(crate) fn prepare_xy(config: &Config, data: &mut [Datum]) {
    let x_field = config.str_or("propertyX", "x");
    let y_field = config.str_or("propertyY", "y");
    convert_by_xy_format(
        data,
        AxisField {
            field: x_field,
            axis_type: config.str_or("xAxisType", "linear"),
            format: config.str_or("xAxisFormat", ""),
        },
        AxisField {
            field: y_field,
            axis_type: config.str_or("yAxisType", "linear"),
            format: config.str_or("yAxisFormat", ""),
        },
    );
    sort_by_field(data, x_field);
}
