use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::strategy::{
    BarchartStrategy, GaugeStrategy, LinechartStrategy, NetworkStrategy, PieChartStrategy,
    ScatterplotStrategy, Strategy, StreamgraphStrategy, SunburstStrategy, SwimlaneStrategy,
};

use super::defaults::defaults_for;

/// Supported chart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Linechart,
    Barchart,
    Gauge,
    Scatterplot,
    Streamgraph,
    StackedArea,
    Swimlane,
    Sunburst,
    Network,
    PieChart,
}

impl ChartKind {
    pub const ALL: [Self; 10] = [
        Self::Linechart,
        Self::Barchart,
        Self::Gauge,
        Self::Scatterplot,
        Self::Streamgraph,
        Self::StackedArea,
        Self::Swimlane,
        Self::Sunburst,
        Self::Network,
        Self::PieChart,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Linechart => "linechart",
            Self::Barchart => "barchart",
            Self::Gauge => "gauge",
            Self::Scatterplot => "scatterplot",
            Self::Streamgraph => "streamgraph",
            Self::StackedArea => "stackedArea",
            Self::Swimlane => "swimlane",
            Self::Sunburst => "sunburst",
            Self::Network => "network",
            Self::PieChart => "pieChart",
        }
    }

    #[must_use]
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Self::Linechart => Box::new(LinechartStrategy),
            Self::Barchart => Box::new(BarchartStrategy),
            Self::Gauge => Box::new(GaugeStrategy),
            Self::Scatterplot => Box::new(ScatterplotStrategy),
            Self::Streamgraph | Self::StackedArea => Box::new(StreamgraphStrategy),
            Self::Swimlane => Box::new(SwimlaneStrategy),
            Self::Sunburst => Box::new(SunburstStrategy),
            Self::Network => Box::new(NetworkStrategy),
            Self::PieChart => Box::new(PieChartStrategy),
        }
    }

    /// Default configuration user values are merged over.
    #[must_use]
    pub fn defaults(self) -> Config {
        defaults_for(self)
    }
}
