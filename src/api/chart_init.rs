use tracing::info;

use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::error::ChartResult;
use crate::interaction::HoverState;
use crate::render::Renderer;

use super::{Chart, ChartKind, Container};

impl<R: Renderer> Chart<R> {
    /// Builds a chart of `kind` with `user_config` merged over the kind's
    /// defaults and renders the static structure of its components.
    ///
    /// Fails on an unusable size or on component render errors such as an
    /// unsupported axis type. `data` is stored but not drawn until
    /// [`Chart::draw`].
    pub fn new(renderer: R, kind: ChartKind, data: Vec<Datum>, user_config: Config) -> ChartResult<Self> {
        let config = Config::merged(&kind.defaults(), &user_config);
        let strategy = kind.strategy();
        let components = strategy.components(&config)?;
        let mut container = Container::new(config)?;
        let component_count = components.len();
        for component in components {
            container.add(component)?;
        }
        if strategy.centered() {
            let (width, height) = container.plot_size();
            container.translate(width / 2.0, height / 2.0);
        }
        let (width, height) = container.plot_size();
        info!(kind = kind.name(), width, height, component_count, "chart initialized");

        Ok(Self {
            renderer,
            kind,
            strategy,
            container,
            data,
            hover: HoverState::default(),
            pressed: None,
            handlers: Vec::new(),
            source: None,
        })
    }

    pub fn linechart(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Linechart, data, config)
    }

    pub fn barchart(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Barchart, data, config)
    }

    pub fn gauge(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Gauge, data, config)
    }

    pub fn scatterplot(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Scatterplot, data, config)
    }

    pub fn streamgraph(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Streamgraph, data, config)
    }

    pub fn stacked_area(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::StackedArea, data, config)
    }

    pub fn swimlane(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Swimlane, data, config)
    }

    pub fn sunburst(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Sunburst, data, config)
    }

    pub fn network(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::Network, data, config)
    }

    pub fn piechart(renderer: R, data: Vec<Datum>, config: Config) -> ChartResult<Self> {
        Self::new(renderer, ChartKind::PieChart, data, config)
    }
}
