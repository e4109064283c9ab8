//! Stack layout: turns per-x rows of keyed values into cumulative bands.

use indexmap::IndexMap;

use crate::core::datum::FieldValue;
use crate::error::{ChartError, ChartResult};

/// Values of every series at one x position.
#[derive(Debug, Clone, PartialEq)]
pub struct StackRow {
    pub x: FieldValue,
    pub values: IndexMap<String, f64>,
}

/// One band of a stacked series at one x position.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPoint {
    pub x: FieldValue,
    pub y0: f64,
    pub y1: f64,
}

/// All bands of one key, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSeries {
    pub key: String,
    /// Position of `key` in the requested key list.
    pub index: usize,
    pub points: Vec<StackPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOrder {
    #[default]
    None,
    /// Largest series in the middle, smaller ones alternating outwards.
    InsideOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    #[default]
    None,
    /// Minimizes weighted layer slope changes (streamgraph baseline).
    Wiggle,
}

impl StackOrder {
    pub fn from_name(name: &str) -> ChartResult<Self> {
        match name {
            "none" => Ok(Self::None),
            "insideOut" => Ok(Self::InsideOut),
            other => Err(ChartError::config(
                "stackOrder",
                format!("unknown stack order: {other:?}"),
            )),
        }
    }
}

impl StackOffset {
    pub fn from_name(name: &str) -> ChartResult<Self> {
        match name {
            "none" => Ok(Self::None),
            "wiggle" => Ok(Self::Wiggle),
            other => Err(ChartError::config(
                "stackOffset",
                format!("unknown stack offset: {other:?}"),
            )),
        }
    }
}

/// Configured stack generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackLayout {
    pub order: StackOrder,
    pub offset: StackOffset,
}

impl StackLayout {
    #[must_use]
    pub const fn new(order: StackOrder, offset: StackOffset) -> Self {
        Self { order, offset }
    }

    /// Stacks `rows` for `keys`. Missing values count as zero.
    ///
    /// The result is in key order; `order` only changes which series sits
    /// on top of which.
    #[must_use]
    pub fn stack(&self, rows: &[StackRow], keys: &[String]) -> Vec<StackSeries> {
        // bands[i][j] = (y0, y1) for key i at row j; y1 holds the raw value
        // until the offset runs.
        let mut bands: Vec<Vec<(f64, f64)>> = keys
            .iter()
            .map(|key| {
                rows.iter()
                    .map(|row| {
                        let value = row.values.get(key).copied().unwrap_or(0.0);
                        (0.0, if value.is_finite() { value } else { 0.0 })
                    })
                    .collect()
            })
            .collect();

        let order = match self.order {
            StackOrder::None => (0..keys.len()).collect(),
            StackOrder::InsideOut => inside_out(&bands),
        };
        match self.offset {
            StackOffset::None => offset_none(&mut bands, &order),
            StackOffset::Wiggle => offset_wiggle(&mut bands, &order),
        }

        keys.iter()
            .zip(bands)
            .enumerate()
            .map(|(index, (key, series))| StackSeries {
                key: key.clone(),
                index,
                points: rows
                    .iter()
                    .zip(series)
                    .map(|(row, (y0, y1))| StackPoint {
                        x: row.x.clone(),
                        y0,
                        y1,
                    })
                    .collect(),
            })
            .collect()
    }
}

/// `[min y0, max y1]` over every band, `None` when there are no bands.
#[must_use]
pub fn extent(series: &[StackSeries]) -> Option<(f64, f64)> {
    let mut points = series.iter().flat_map(|serie| serie.points.iter()).peekable();
    points.peek()?;
    let (lo, hi) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), point| {
        (lo.min(point.y0), hi.max(point.y1))
    });
    Some((lo, hi))
}

fn inside_out(bands: &[Vec<(f64, f64)>]) -> Vec<usize> {
    let sums: Vec<f64> = bands
        .iter()
        .map(|series| series.iter().map(|band| band.1).sum())
        .collect();
    let mut by_size: Vec<usize> = (0..bands.len()).collect();
    by_size.sort_by(|a, b| sums[*b].total_cmp(&sums[*a]));

    let (mut top, mut bottom) = (0.0, 0.0);
    let (mut tops, mut bottoms) = (Vec::new(), Vec::new());
    for index in by_size {
        if top < bottom {
            top += sums[index];
            tops.push(index);
        } else {
            bottom += sums[index];
            bottoms.push(index);
        }
    }
    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

fn offset_none(bands: &mut [Vec<(f64, f64)>], order: &[usize]) {
    for pair in order.windows(2) {
        let (below, above) = (pair[0], pair[1]);
        for j in 0..bands[above].len() {
            let base = bands[below][j].1;
            let band = &mut bands[above][j];
            band.0 = base;
            band.1 += base;
        }
    }
}

fn offset_wiggle(bands: &mut [Vec<(f64, f64)>], order: &[usize]) {
    let Some(&first) = order.first() else {
        return;
    };
    let rows = bands[first].len();
    if rows == 0 {
        return;
    }
    let mut baseline = 0.0;
    for j in 1..rows {
        let (mut total, mut weighted) = (0.0, 0.0);
        for (i, &series) in order.iter().enumerate() {
            let current = bands[series][j].1;
            let previous = bands[series][j - 1].1;
            let mut slope = (current - previous) / 2.0;
            for &below in &order[..i] {
                slope += bands[below][j].1 - bands[below][j - 1].1;
            }
            total += current;
            weighted += slope * current;
        }
        bands[first][j - 1].0 = baseline;
        bands[first][j - 1].1 += baseline;
        if total != 0.0 {
            baseline -= weighted / total;
        }
    }
    bands[first][rows - 1].0 = baseline;
    bands[first][rows - 1].1 += baseline;
    offset_none(bands, order);
}
