use chrono::{DateTime, Utc};

use crate::core::datum::FieldValue;
use crate::core::ticks;
use crate::error::{ChartError, ChartResult};

fn validate_pair(name: &str, start: f64, end: f64) -> ChartResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(format!(
            "scale {name} must be finite, got [{start}, {end}]"
        )));
    }
    Ok(())
}

/// Continuous mapping `domain -> range` with linear interpolation.
///
/// A degenerate domain (`start == end`) maps every value to the middle of
/// the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        validate_pair("domain", domain.0, domain.1)?;
        validate_pair("range", range.0, range.1)?;
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn set_domain(&mut self, start: f64, end: f64) -> ChartResult<()> {
        validate_pair("domain", start, end)?;
        self.domain_start = start;
        self.domain_end = end;
        Ok(())
    }

    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        ticks::ticks(self.domain_start, self.domain_end, count)
    }
}

/// Square-root scale (`exponent = 0.5`), used for radial distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

fn signed_sqrt(value: f64) -> f64 {
    value.signum() * value.abs().sqrt()
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range)?,
        })
    }

    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        self.inner.to_pixel(signed_sqrt(value))
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.inner.range()
    }
}

/// Linear scale over UTC instants (epoch milliseconds internally).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            inner: LinearScale::new(
                (
                    domain.0.timestamp_millis() as f64,
                    domain.1.timestamp_millis() as f64,
                ),
                range,
            )?,
        })
    }

    /// Epoch-millisecond domain.
    #[must_use]
    pub fn domain_millis(self) -> (f64, f64) {
        self.inner.domain()
    }

    pub fn set_domain_millis(&mut self, start: f64, end: f64) -> ChartResult<()> {
        self.inner.set_domain(start, end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.inner.range()
    }

    #[must_use]
    pub fn to_pixel(self, time: DateTime<Utc>) -> f64 {
        self.inner.to_pixel(time.timestamp_millis() as f64)
    }

    #[must_use]
    pub fn millis_to_pixel(self, millis: f64) -> f64 {
        self.inner.to_pixel(millis)
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<DateTime<Utc>> {
        let (start, end) = self.inner.domain();
        ticks::time_ticks(start, end, count)
    }
}

/// Ordinal band scale: each domain key gets an evenly spaced band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range_start: f64,
    range_end: f64,
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    step: f64,
    bandwidth: f64,
    starts: Vec<f64>,
}

impl BandScale {
    /// Creates a rounded band scale with equal inner/outer `padding` and
    /// centered alignment.
    #[must_use]
    pub fn new(range: (f64, f64), padding: f64) -> Self {
        let mut scale = Self {
            domain: Vec::new(),
            range_start: range.0,
            range_end: range.1,
            padding_inner: padding.clamp(0.0, 1.0),
            padding_outer: padding.max(0.0),
            align: 0.5,
            round: true,
            step: 0.0,
            bandwidth: 0.0,
            starts: Vec::new(),
        };
        scale.rescale();
        scale
    }

    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    pub fn set_domain(&mut self, keys: Vec<String>) {
        self.domain = keys;
        self.rescale();
    }

    pub fn set_range(&mut self, start: f64, end: f64) {
        self.range_start = start;
        self.range_end = end;
        self.rescale();
    }

    fn rescale(&mut self) {
        let count = self.domain.len() as f64;
        let reverse = self.range_end < self.range_start;
        let (mut start, stop) = if reverse {
            (self.range_end, self.range_start)
        } else {
            (self.range_start, self.range_end)
        };
        let mut step =
            (stop - start) / (count - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        start += (stop - start - step * (count - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }
        let mut starts: Vec<f64> = (0..self.domain.len())
            .map(|index| start + step * index as f64)
            .collect();
        if reverse {
            starts.reverse();
        }
        self.step = step;
        self.bandwidth = bandwidth;
        self.starts = starts;
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Start of the band assigned to `key`; unknown keys have no band.
    #[must_use]
    pub fn to_pixel(&self, key: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|candidate| candidate == key)
            .map(|index| self.starts[index])
    }
}

/// Scale owned by a cartesian axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Time(TimeScale),
    Band(BandScale),
}

impl AxisScale {
    /// Pixel position of a datum field; `None` when the value does not map.
    #[must_use]
    pub fn position(&self, value: &FieldValue) -> Option<f64> {
        match self {
            Self::Linear(scale) => value.as_f64().map(|v| scale.to_pixel(v)),
            Self::Time(scale) => value.as_f64().map(|v| scale.millis_to_pixel(v)),
            Self::Band(scale) => value.key_string().and_then(|key| scale.to_pixel(&key)),
        }
    }

    /// Band width for categorical scales, `0` otherwise.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(scale) => scale.bandwidth(),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Time(scale) => scale.range(),
            Self::Band(scale) => (scale.range_start, scale.range_end),
        }
    }

    #[must_use]
    pub fn as_linear(&self) -> Option<LinearScale> {
        match self {
            Self::Linear(scale) => Some(*scale),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_band(&self) -> Option<&BandScale> {
        match self {
            Self::Band(scale) => Some(scale),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BandScale, LinearScale, SqrtScale};
    use approx::assert_relative_eq;

    #[test]
    fn linear_scale_maps_and_inverts() {
        let scale = LinearScale::new((0.0, 10.0), (250.0, 0.0)).expect("scale");
        assert_relative_eq!(scale.to_pixel(0.0), 250.0);
        assert_relative_eq!(scale.to_pixel(10.0), 0.0);
        assert_relative_eq!(scale.to_pixel(5.0), 125.0);
        assert_relative_eq!(scale.invert(125.0), 5.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_midpoint() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0)).expect("scale");
        assert_relative_eq!(scale.to_pixel(3.0), 50.0);
        assert!(LinearScale::new((f64::NAN, 1.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn band_scale_matches_rounded_padding_layout() {
        let mut scale = BandScale::new((0.0, 100.0), 0.1);
        scale.set_domain(vec!["a".into(), "b".into(), "c".into()]);
        // step = floor(100 / (3 - 0.1 + 0.2)) = 32
        assert_relative_eq!(scale.step(), 32.0);
        assert_relative_eq!(scale.bandwidth(), 29.0);
        let a = scale.to_pixel("a").expect("a");
        let c = scale.to_pixel("c").expect("c");
        assert_relative_eq!(c - a, 64.0);
        assert!(scale.to_pixel("z").is_none());
    }

    #[test]
    fn reversed_band_range_assigns_first_key_to_the_bottom() {
        let mut scale = BandScale::new((200.0, 0.0), 0.1);
        scale.set_domain(vec!["a".into(), "b".into()]);
        let a = scale.to_pixel("a").expect("a");
        let b = scale.to_pixel("b").expect("b");
        assert!(a > b);
    }

    #[test]
    fn sqrt_scale_compresses_large_values() {
        let scale = SqrtScale::new((0.0, 1.0), (0.0, 100.0)).expect("scale");
        assert_relative_eq!(scale.to_pixel(0.25), 50.0);
        assert_relative_eq!(scale.to_pixel(1.0), 100.0);
    }
}
