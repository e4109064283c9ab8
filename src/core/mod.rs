pub mod color;
pub mod config;
pub mod datum;
pub mod force;
pub mod format;
pub mod hierarchy;
pub mod pie;
pub mod scale;
pub mod shape;
pub mod stack;
pub mod ticks;
pub mod transform;

pub use color::{Color, ColorScale};
pub use config::Config;
pub use datum::{Datum, FieldValue, datums_from_json};
pub use force::ForceSimulation;
pub use hierarchy::Hierarchy;
pub use scale::{AxisScale, BandScale, LinearScale, SqrtScale, TimeScale};
pub use shape::{Curve, SymbolKind};
pub use stack::{StackLayout, StackOffset, StackOrder};
