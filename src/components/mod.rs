//! Visual components sharing one coordinate/color context.
//!
//! A component renders its static structure once and then updates in place
//! from each data snapshot handed over by the container.

mod areaset;
mod axis;
mod barset;
mod canvas_pointset;
mod dial;
mod dial_needle;
mod legend;
mod linked_nodeset;
mod lineset;
mod pointset;
mod radial_axis;
mod sector_set;
mod streamset;
mod sunburst_disk;
mod text_indicator;
mod timeboxset;

pub use areaset::Areaset;
pub use axis::{AxisKind, XAxis, XYAxes, YAxis};
pub use barset::Barset;
pub use canvas_pointset::CanvasPointset;
pub use dial::Dial;
pub use dial_needle::DialNeedle;
pub use legend::Legend;
pub use linked_nodeset::LinkedNodeset;
pub use lineset::Lineset;
pub use pointset::Pointset;
pub use radial_axis::RadialAxes;
pub use sector_set::SectorSet;
pub use streamset::Streamset;
pub use sunburst_disk::SunburstDisk;
pub use text_indicator::TextIndicator;
pub use timeboxset::Timeboxset;

use crate::core::color::ColorScale;
use crate::core::config::Config;
use crate::core::datum::Datum;
use crate::core::scale::{AxisScale, LinearScale, SqrtScale};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HitMap, PointerEvent};
use crate::render::{CanvasLayer, KEY_ATTR, Surface, SvgNode};

/// Opacity of series toggled off through the legend.
pub const HIDE_OPACITY: f64 = 0.06;

/// Angle/radius scales shared by the radial components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialScales {
    pub angle: LinearScale,
    pub radius: SqrtScale,
}

/// Shared state every component reads and writes during render/update.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub config: Config,
    /// Plot size (margins excluded).
    pub width: f64,
    pub height: f64,
    pub surface: Surface,
    pub canvas: Option<CanvasLayer>,
    pub x: Option<AxisScale>,
    pub y: Option<AxisScale>,
    pub radial: Option<RadialScales>,
    pub color: ColorScale,
    pub hits: HitMap,
    hidden_keys: Vec<String>,
}

impl RenderContext {
    pub fn new(config: Config, width: f64, height: f64, surface: Surface) -> ChartResult<Self> {
        let color = match config.get("colorScale") {
            Some(value) => ColorScale::from_config_value(value)?,
            None => ColorScale::named("category7")?,
        };
        Ok(Self {
            config,
            width,
            height,
            surface,
            canvas: None,
            x: None,
            y: None,
            radial: None,
            color,
            hits: HitMap::new(),
            hidden_keys: Vec::new(),
        })
    }

    /// Plot group every component draws into.
    pub fn plot(&mut self) -> &mut SvgNode {
        self.surface.plot_mut()
    }

    /// Name of the datum field configured under `key` (e.g. `propertyX`).
    #[must_use]
    pub fn property(&self, key: &str, default: &str) -> String {
        self.config.str_or(key, default).to_owned()
    }

    pub fn x_scale(&self) -> ChartResult<&AxisScale> {
        self.x
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("x axis scale is not initialized".to_owned()))
    }

    pub fn y_scale(&self) -> ChartResult<&AxisScale> {
        self.y
            .as_ref()
            .ok_or_else(|| ChartError::InvalidData("y axis scale is not initialized".to_owned()))
    }

    pub fn radial_scales(&self) -> ChartResult<RadialScales> {
        self.radial
            .ok_or_else(|| ChartError::InvalidData("radial scales are not initialized".to_owned()))
    }

    /// Hex color assigned to a series key.
    pub fn key_color(&mut self, key: &str) -> String {
        self.color.color_for_key(key).to_hex()
    }

    #[must_use]
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_keys.iter().any(|hidden| hidden == key)
    }

    #[must_use]
    pub fn hidden_keys(&self) -> &[String] {
        &self.hidden_keys
    }

    /// Flips the visibility of `key`; returns whether it is now hidden.
    pub fn toggle_hidden(&mut self, key: &str) -> bool {
        match self.hidden_keys.iter().position(|hidden| hidden == key) {
            Some(index) => {
                self.hidden_keys.remove(index);
                false
            }
            None => {
                self.hidden_keys.push(key.to_owned());
                true
            }
        }
    }

    /// Opacity style a mark keyed by `key` should carry.
    #[must_use]
    pub fn series_opacity(&self, key: &str) -> String {
        if self.is_hidden(key) {
            HIDE_OPACITY.to_string()
        } else {
            "1".to_owned()
        }
    }

    /// Re-applies the legend visibility to every keyed mark in the plot.
    pub fn apply_visibility(&mut self) {
        let hidden = self.hidden_keys.clone();
        self.surface.plot_mut().visit_mut(&mut |node| {
            if let Some(key) = node.attr(KEY_ATTR) {
                let opacity = if hidden.iter().any(|h| h == key) {
                    HIDE_OPACITY.to_string()
                } else {
                    "1".to_owned()
                };
                node.set_style("opacity", opacity);
            }
        });
    }
}

/// Render-once / update-on-data contract of every visual component.
pub trait Component {
    /// Owner tag used for hit regions.
    fn name(&self) -> &'static str;

    /// Builds the static structure.
    fn render(&mut self, ctx: &mut RenderContext) -> ChartResult<()>;

    /// Redraws from a data snapshot.
    fn update(&mut self, ctx: &mut RenderContext, data: &[Datum]) -> ChartResult<()>;

    /// Reacts to pointer activity. Returns whether the scene changed.
    fn pointer(&mut self, _ctx: &mut RenderContext, _event: &PointerEvent) -> ChartResult<bool> {
        Ok(false)
    }

    /// Pointer movement while any button may be held (drag support).
    fn pointer_move(&mut self, _ctx: &mut RenderContext, _x: f64, _y: f64) -> ChartResult<bool> {
        Ok(false)
    }

    /// Wheel zoom around `(x, y)`.
    fn zoom(&mut self, _ctx: &mut RenderContext, _factor: f64, _x: f64, _y: f64) -> ChartResult<bool> {
        Ok(false)
    }
}

/// Series key of a datum; datums without one share the empty key.
pub(crate) fn series_key(datum: &Datum, key_field: &str) -> String {
    datum.key(key_field).unwrap_or_default()
}

/// Pixel position of a datum on a cartesian pair of scales.
pub(crate) fn position(
    x: &AxisScale,
    y: &AxisScale,
    datum: &Datum,
    x_field: &str,
    y_field: &str,
) -> Option<(f64, f64)> {
    Some((x.position(datum.field(x_field))?, y.position(datum.field(y_field))?))
}
