use crate::core::color::Color;
use crate::core::shape::SymbolKind;
use crate::error::{ChartError, ChartResult};

/// One marker painted onto the canvas layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStamp {
    pub x: f64,
    pub y: f64,
    pub kind: SymbolKind,
    pub size: f64,
    pub stroke: Color,
    /// `None` paints an outline only.
    pub fill: Option<Color>,
}

/// Immediate-mode drawing layer placed over the plot area. Stamps are
/// cleared on every update rather than joined by key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasLayer {
    width: f64,
    height: f64,
    offset: (f64, f64),
    stamps: Vec<MarkerStamp>,
}

impl CanvasLayer {
    #[must_use]
    pub fn new(width: f64, height: f64, offset: (f64, f64)) -> Self {
        Self {
            width,
            height,
            offset,
            stamps: Vec::new(),
        }
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn clear(&mut self) {
        self.stamps.clear();
    }

    pub fn stamp(&mut self, stamp: MarkerStamp) {
        self.stamps.push(stamp);
    }

    #[must_use]
    pub fn stamps(&self) -> &[MarkerStamp] {
        &self.stamps
    }

    pub fn validate(&self) -> ChartResult<()> {
        for stamp in &self.stamps {
            if !stamp.x.is_finite() || !stamp.y.is_finite() || !stamp.size.is_finite() {
                return Err(ChartError::InvalidData(
                    "canvas marker position and size must be finite".to_owned(),
                ));
            }
            stamp.stroke.validate()?;
            if let Some(fill) = stamp.fill {
                fill.validate()?;
            }
        }
        Ok(())
    }
}
