//! Pie layout: maps values to consecutive angular sectors.

use std::f64::consts::TAU;

/// Angular span assigned to one input value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    /// Position of the value in the input.
    pub index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Lays `values` out over `[0, 2π]`, largest first.
///
/// Slices are returned in input order; only the angular placement follows
/// the descending sort. Non-positive or non-finite values get a zero-width
/// slice. A zero total collapses every slice onto angle zero.
#[must_use]
pub fn pie(values: &[f64]) -> Vec<PieSlice> {
    let clean: Vec<f64> = values
        .iter()
        .map(|value| if value.is_finite() { *value } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().filter(|value| **value > 0.0).sum();
    let scale = if total > 0.0 { TAU / total } else { 0.0 };

    let mut order: Vec<usize> = (0..clean.len()).collect();
    order.sort_by(|a, b| clean[*b].total_cmp(&clean[*a]));

    let mut slices = vec![
        PieSlice {
            index: 0,
            value: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
        };
        clean.len()
    ];
    let mut angle = 0.0;
    for index in order {
        let value = clean[index];
        let start_angle = angle;
        if value > 0.0 {
            angle += value * scale;
        }
        slices[index] = PieSlice {
            index,
            value,
            start_angle,
            end_angle: angle,
        };
    }
    slices
}
