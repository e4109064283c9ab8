use std::fmt;

use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(text: &str) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidData(format!("invalid hex color: {text:?}"));
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        let (red, green, blue) = match digits.len() {
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            3 => {
                let short = |index: usize| channel(&digits[index..=index]).map(|v| v * 17);
                (short(0)?, short(1)?, short(2)?)
            }
            _ => return Err(invalid()),
        };
        Ok(Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        ))
    }

    /// `#rrggbb` representation (alpha is dropped).
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub const CATEGORY2: [&str; 9] = [
    "#b6dde2", "#6394af", "#e4e9ab", "#8ea876", "#f7dce1", "#cc878f", "#fadaac", "#f29a83",
    "#8d7e9e",
];
pub const CATEGORY3: [&str; 9] = [
    "#6b68a9", "#8cc590", "#b9487d", "#bfa1c5", "#4e6936", "#71bbc3", "#484156", "#ccaf44",
    "#d0553c",
];
pub const CATEGORY4: [&str; 9] = [
    "#f1a30d", "#1d4763", "#84c7bc", "#c1212d", "#8fbe46", "#076837", "#563a2d", "#563a2d",
    "#87325d",
];
pub const CATEGORY5: [&str; 9] = [
    "#f1a30d", "#0c3183", "#acd9d6", "#c1212d", "#8fbe46", "#076837", "#8a6338", "#8d2d84",
    "#f09bbc",
];
pub const CATEGORY7: [&str; 9] = [
    "#ea671e", "#684592", "#84b92a", "#cd131c", "#3c5ba2", "#5baddc", "#ffde06", "#5db68b",
    "#775e47",
];
pub const CATEGORY8: [&str; 9] = [
    "#ebd646", "#a50f38", "#00a096", "#f09bbc", "#065b78", "#72722a", "#005231", "#4d4e98",
    "#7c4d25",
];
pub const DIVERGING_SPECTRAL2: [&str; 13] = [
    "#d43d4f", "#df564b", "#eb6d45", "#f08e53", "#f8b96f", "#fee08b", "#f5f2b8", "#d7e5b1",
    "#b5d7aa", "#8ec8a3", "#6abda3", "#4fa4b5", "#3489be",
];

fn palette(hexes: &[&str]) -> ChartResult<Vec<Color>> {
    hexes.iter().map(|hex| Color::from_hex(hex)).collect()
}

/// Ordinal scale with an implicit domain: keys are assigned palette entries
/// in first-seen order, cycling when the palette runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalColorScale {
    domain: Vec<String>,
    range: Vec<Color>,
}

impl OrdinalColorScale {
    pub fn new(range: Vec<Color>) -> ChartResult<Self> {
        if range.is_empty() {
            return Err(ChartError::InvalidData(
                "ordinal color scale needs at least one color".to_owned(),
            ));
        }
        Ok(Self {
            domain: Vec::new(),
            range,
        })
    }

    pub fn color(&mut self, key: &str) -> Color {
        let index = match self.domain.iter().position(|known| known == key) {
            Some(index) => index,
            None => {
                self.domain.push(key.to_owned());
                self.domain.len() - 1
            }
        };
        self.range[index % self.range.len()]
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

/// Quantile scale: a sorted numeric domain is split into as many quantiles
/// as there are colors.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileColorScale {
    domain: Vec<f64>,
    range: Vec<Color>,
    thresholds: Vec<f64>,
}

impl QuantileColorScale {
    pub fn new(range: Vec<Color>) -> ChartResult<Self> {
        if range.is_empty() {
            return Err(ChartError::InvalidData(
                "quantile color scale needs at least one color".to_owned(),
            ));
        }
        Ok(Self {
            domain: Vec::new(),
            range,
            thresholds: Vec::new(),
        })
    }

    pub fn set_domain(&mut self, values: &[f64]) {
        let mut domain: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        domain.sort_by(f64::total_cmp);
        self.thresholds = (1..self.range.len())
            .map(|index| quantile(&domain, index as f64 / self.range.len() as f64))
            .collect();
        self.domain = domain;
    }

    pub fn reverse_range(&mut self) {
        self.range.reverse();
    }

    #[must_use]
    pub fn color(&self, value: f64) -> Color {
        let index = self.thresholds.partition_point(|threshold| *threshold <= value);
        self.range[index.min(self.range.len() - 1)]
    }

    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

fn quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let position = (n - 1) as f64 * p;
            let lower = position.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
        }
    }
}

/// Color scale selected through the `colorScale` config key.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    Ordinal(OrdinalColorScale),
    Quantile(QuantileColorScale),
}

impl ColorScale {
    /// Builds a named palette (`category2`..`category8`, `divergingSpectral2`).
    pub fn named(name: &str) -> ChartResult<Self> {
        let ordinal = |hexes: &[&str]| -> ChartResult<Self> {
            Ok(Self::Ordinal(OrdinalColorScale::new(palette(hexes)?)?))
        };
        match name {
            "category2" => ordinal(&CATEGORY2),
            "category3" => ordinal(&CATEGORY3),
            "category4" => ordinal(&CATEGORY4),
            "category5" => ordinal(&CATEGORY5),
            "category7" => ordinal(&CATEGORY7),
            "category8" => ordinal(&CATEGORY8),
            "divergingSpectral2" => Ok(Self::Quantile(QuantileColorScale::new(palette(
                &DIVERGING_SPECTRAL2,
            )?)?)),
            other => Err(ChartError::config(
                "colorScale",
                format!("unknown color scale: {other:?}"),
            )),
        }
    }

    /// Accepts a palette name or an explicit list of hex colors (ordinal).
    pub fn from_config_value(value: &Value) -> ChartResult<Self> {
        match value {
            Value::String(name) => Self::named(name),
            Value::Array(items) => {
                let colors = items
                    .iter()
                    .map(|item| match item {
                        Value::String(hex) => Color::from_hex(hex),
                        other => Err(ChartError::config(
                            "colorScale",
                            format!("expected hex color, got {other}"),
                        )),
                    })
                    .collect::<ChartResult<Vec<_>>>()?;
                Ok(Self::Ordinal(OrdinalColorScale::new(colors)?))
            }
            other => Err(ChartError::config(
                "colorScale",
                format!("expected palette name or color list, got {other}"),
            )),
        }
    }

    /// Color for a series key. Quantile scales interpret the key as a number.
    pub fn color_for_key(&mut self, key: &str) -> Color {
        match self {
            Self::Ordinal(scale) => scale.color(key),
            Self::Quantile(scale) => scale.color(key.parse().unwrap_or(f64::NAN)),
        }
    }

    /// Color for a numeric value. Ordinal scales key by the value's text.
    pub fn color_for_value(&mut self, value: f64) -> Color {
        match self {
            Self::Ordinal(scale) => scale.color(&value.to_string()),
            Self::Quantile(scale) => scale.color(value),
        }
    }
}
