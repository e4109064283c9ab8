//! Chart facade: configuration, drawing strategy, container and renderer
//! wired together.
//!
//! `Chart` is split across controller files the same way the drawing
//! pipeline is split: construction, data, pointer interaction and data
//! sources.

mod chart;
mod chart_init;
mod chart_kind;
mod container;
mod data_controller;
mod datasource_controller;
mod defaults;
mod interaction_controller;

pub use chart::Chart;
pub use chart_kind::ChartKind;
pub use container::{Container, LOADING_ICON_ID};
pub use data_controller::BarLayout;
pub use defaults::defaults_for;
pub use interaction_controller::PointerHandler;
