//! proteic: declarative SVG charts with a render/update component model.
//!
//! A [`Chart`] is built from a [`ChartKind`], a dataset and a flat
//! configuration merged over the kind's defaults. Its strategy assembles
//! components (axes, series, legend, indicators) that render once and then
//! update in place from every data snapshot; the finished SVG scene is handed
//! to a [`render::Renderer`]. Live data arrives through HTTP polling or
//! WebSocket [`datasource`]s drained with [`Chart::pump_events`].

pub mod api;
pub mod components;
pub mod core;
pub mod datasource;
pub mod error;
pub mod interaction;
pub mod render;
pub mod strategy;
pub mod telemetry;

pub use api::{BarLayout, Chart, ChartKind};
pub use core::{Config, Datum, FieldValue};
pub use error::{ChartError, ChartResult};
