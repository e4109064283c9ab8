//! SVG path generators: interpolated lines and areas, annular sectors and
//! marker symbols.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use crate::error::{ChartError, ChartResult};

const EPSILON: f64 = 1e-12;

/// Formats a path coordinate with at most three decimals.
#[must_use]
pub fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}

/// Incremental SVG path-data writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathBuilder {
    data: String,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.data, "M{},{}", num(x), num(y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.data, "L{},{}", num(x), num(y));
    }

    pub fn bezier_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        let _ = write!(
            self.data,
            "C{},{},{},{},{},{}",
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            num(x),
            num(y)
        );
    }

    pub fn arc_to(&mut self, radius: f64, large_arc: bool, sweep: bool, x: f64, y: f64) {
        let _ = write!(
            self.data,
            "A{},{},0,{},{},{},{}",
            num(radius),
            num(radius),
            u8::from(large_arc),
            u8::from(sweep),
            num(x),
            num(y)
        );
    }

    pub fn close(&mut self) {
        self.data.push('Z');
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.data
    }
}

/// Interpolation between consecutive points of a line or area edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    LinearClosed,
    MonotoneX,
    MonotoneY,
    Natural,
    Step,
    StepAfter,
    StepBefore,
    Cardinal,
}

impl Curve {
    pub fn from_name(name: &str) -> ChartResult<Self> {
        match name {
            "linear" => Ok(Self::Linear),
            "linearClosed" => Ok(Self::LinearClosed),
            "monotoneX" => Ok(Self::MonotoneX),
            "monotoneY" => Ok(Self::MonotoneY),
            "natural" => Ok(Self::Natural),
            "step" => Ok(Self::Step),
            "stepAfter" => Ok(Self::StepAfter),
            "stepBefore" => Ok(Self::StepBefore),
            "cardinal" => Ok(Self::Cardinal),
            other => Err(ChartError::config("curve", format!("unknown curve: {other:?}"))),
        }
    }

    /// Appends the interpolated polyline through `points`.
    ///
    /// When `connect` is set the first point is joined with a line segment
    /// instead of starting a new subpath (area baselines).
    pub fn trace(self, points: &[(f64, f64)], path: &mut PathBuilder, connect: bool) {
        let Some(&(x0, y0)) = points.first() else {
            return;
        };
        if connect {
            path.line_to(x0, y0);
        } else {
            path.move_to(x0, y0);
        }
        if points.len() == 1 {
            return;
        }
        match self {
            Self::Linear | Self::LinearClosed => {
                for &(x, y) in &points[1..] {
                    path.line_to(x, y);
                }
            }
            Self::Step => trace_step(points, path, 0.5),
            Self::StepAfter => trace_step(points, path, 1.0),
            Self::StepBefore => trace_step(points, path, 0.0),
            Self::MonotoneX => trace_monotone(points, path, false),
            Self::MonotoneY => trace_monotone(points, path, true),
            Self::Natural => trace_natural(points, path),
            Self::Cardinal => trace_cardinal(points, path, 0.0),
        }
    }
}

fn trace_step(points: &[(f64, f64)], path: &mut PathBuilder, t: f64) {
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if t <= 0.0 {
            path.line_to(x0, y1);
        } else {
            let xm = x0 * (1.0 - t) + x1 * t;
            path.line_to(xm, y0);
            path.line_to(xm, y1);
        }
        if t <= 0.0 {
            path.line_to(x1, y1);
        }
    }
    if t > 0.0 && t < 1.0 {
        if let Some(&(x, y)) = points.last() {
            path.line_to(x, y);
        }
    }
}

fn sign(value: f64) -> f64 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

fn monotone_tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let mut tangents = vec![0.0; n];
    if n < 3 {
        return tangents;
    }
    for i in 1..n - 1 {
        let (x0, y0) = points[i - 1];
        let (x1, y1) = points[i];
        let (x2, y2) = points[i + 1];
        let h0 = x1 - x0;
        let h1 = x2 - x1;
        let s0 = (y1 - y0) / h0;
        let s1 = (y2 - y1) / h1;
        let p = (s0 * h1 + s1 * h0) / (h0 + h1);
        let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
        tangents[i] = if t.is_finite() { t } else { 0.0 };
    }
    let end_slope = |a: (f64, f64), b: (f64, f64), t: f64| {
        let h = b.0 - a.0;
        if h != 0.0 {
            (3.0 * (b.1 - a.1) / h - t) / 2.0
        } else {
            t
        }
    };
    tangents[0] = end_slope(points[0], points[1], tangents[1]);
    tangents[n - 1] = end_slope(points[n - 2], points[n - 1], tangents[n - 2]);
    tangents
}

fn trace_monotone(points: &[(f64, f64)], path: &mut PathBuilder, swap: bool) {
    if points.len() == 2 {
        path.line_to(points[1].0, points[1].1);
        return;
    }
    let oriented: Vec<(f64, f64)> = if swap {
        points.iter().map(|&(x, y)| (y, x)).collect()
    } else {
        points.to_vec()
    };
    let tangents = monotone_tangents(&oriented);
    for i in 0..oriented.len() - 1 {
        let (x0, y0) = oriented[i];
        let (x1, y1) = oriented[i + 1];
        let dx = (x1 - x0) / 3.0;
        let c1 = (x0 + dx, y0 + dx * tangents[i]);
        let c2 = (x1 - dx, y1 - dx * tangents[i + 1]);
        if swap {
            path.bezier_to(c1.1, c1.0, c2.1, c2.0, y1, x1);
        } else {
            path.bezier_to(c1.0, c1.1, c2.0, c2.1, x1, y1);
        }
    }
}

/// Control points of the natural cubic spline through `values`.
fn natural_control_points(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = values.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];
    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = values[0] + 2.0 * values[1];
    for i in 1..n.saturating_sub(1) {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * values[i] + 2.0 * values[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * values[n - 1] + values[n];
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (values[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * values[i + 1] - a[i + 1];
    }
    (a, b)
}

fn trace_natural(points: &[(f64, f64)], path: &mut PathBuilder) {
    if points.len() == 2 {
        path.line_to(points[1].0, points[1].1);
        return;
    }
    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    let (ax, bx) = natural_control_points(&xs);
    let (ay, by) = natural_control_points(&ys);
    for i in 1..points.len() {
        path.bezier_to(ax[i - 1], ay[i - 1], bx[i - 1], by[i - 1], xs[i], ys[i]);
    }
}

fn trace_cardinal(points: &[(f64, f64)], path: &mut PathBuilder, tension: f64) {
    let n = points.len();
    if n == 2 {
        path.line_to(points[1].0, points[1].1);
        return;
    }
    let k = (1.0 - tension) / 6.0;
    for i in 0..n - 1 {
        let current = points[i];
        let next = points[i + 1];
        let before = if i == 0 { next } else { points[i - 1] };
        let after = if i + 2 < n { points[i + 2] } else { current };
        path.bezier_to(
            current.0 + k * (next.0 - before.0),
            current.1 + k * (next.1 - before.1),
            next.0 + k * (current.0 - after.0),
            next.1 + k * (current.1 - after.1),
            next.0,
            next.1,
        );
    }
}

/// Path of a line through `points`; empty when there are no points.
#[must_use]
pub fn line_path(points: &[(f64, f64)], curve: Curve) -> String {
    let mut path = PathBuilder::new();
    curve.trace(points, &mut path, false);
    if curve == Curve::LinearClosed && points.len() > 1 {
        path.close();
    }
    path.finish()
}

/// Closed path between a top edge `(x, y1)` and a baseline `(x, y0)`.
#[must_use]
pub fn area_path(points: &[(f64, f64, f64)], curve: Curve) -> String {
    if points.is_empty() {
        return String::new();
    }
    let top: Vec<(f64, f64)> = points.iter().map(|&(x, _, y1)| (x, y1)).collect();
    let bottom: Vec<(f64, f64)> = points.iter().rev().map(|&(x, y0, _)| (x, y0)).collect();
    let mut path = PathBuilder::new();
    curve.trace(&top, &mut path, false);
    curve.trace(&bottom, &mut path, true);
    path.close();
    path.finish()
}

/// Annular sector geometry. Angles are radians, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    #[must_use]
    pub const fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
        }
    }

    /// Center of the sector, useful for labels.
    #[must_use]
    pub fn centroid(self) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (self.start_angle + self.end_angle) / 2.0 - PI / 2.0;
        (r * a.cos(), r * a.sin())
    }

    /// Whether `(x, y)` (relative to the arc center) lies inside the sector.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        let radius = x.hypot(y);
        let (r0, r1) = if self.inner_radius <= self.outer_radius {
            (self.inner_radius, self.outer_radius)
        } else {
            (self.outer_radius, self.inner_radius)
        };
        if radius < r0 || radius > r1 {
            return false;
        }
        let (a0, a1) = if self.start_angle <= self.end_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        };
        if a1 - a0 >= TAU - EPSILON {
            return true;
        }
        let angle = x.atan2(-y).rem_euclid(TAU);
        let start = a0.rem_euclid(TAU);
        let sweep = a1 - a0;
        (angle - start).rem_euclid(TAU) <= sweep
    }

    #[must_use]
    pub fn path(self) -> String {
        let (mut r0, mut r1) = (self.inner_radius.max(0.0), self.outer_radius.max(0.0));
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let a0 = self.start_angle - PI / 2.0;
        let a1 = self.end_angle - PI / 2.0;
        let delta = (a1 - a0).abs();
        let clockwise = a1 > a0;
        let mut path = PathBuilder::new();

        if r1 <= EPSILON {
            path.move_to(0.0, 0.0);
            path.close();
            return path.finish();
        }

        if delta >= TAU - EPSILON {
            circle(&mut path, r1, a0, clockwise);
            if r0 > EPSILON {
                circle(&mut path, r0, a1, !clockwise);
            }
            return path.finish();
        }

        let large = delta >= PI;
        path.move_to(r1 * a0.cos(), r1 * a0.sin());
        path.arc_to(r1, large, clockwise, r1 * a1.cos(), r1 * a1.sin());
        if r0 > EPSILON {
            path.line_to(r0 * a1.cos(), r0 * a1.sin());
            path.arc_to(r0, large, !clockwise, r0 * a0.cos(), r0 * a0.sin());
        } else {
            path.line_to(0.0, 0.0);
        }
        path.close();
        path.finish()
    }
}

fn circle(path: &mut PathBuilder, radius: f64, angle: f64, sweep: bool) {
    let (x, y) = (radius * angle.cos(), radius * angle.sin());
    path.move_to(x, y);
    path.arc_to(radius, true, sweep, -x, -y);
    path.arc_to(radius, true, sweep, x, y);
}

/// Marker symbol types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Circle,
    Cross,
    Diamond,
    Square,
    Star,
    Triangle,
    Wye,
}

impl SymbolKind {
    /// Maps a `markerShape` value; `dot`, `ring` and unknown names are circles.
    #[must_use]
    pub fn from_marker_shape(name: &str) -> Self {
        match name {
            "cross" => Self::Cross,
            "diamond" => Self::Diamond,
            "square" => Self::Square,
            "star" => Self::Star,
            "triangle" => Self::Triangle,
            "wye" => Self::Wye,
            _ => Self::Circle,
        }
    }
}

/// Path of a symbol centered at the origin with the given area in px².
#[must_use]
pub fn symbol_path(kind: SymbolKind, size: f64) -> String {
    let size = size.max(0.0);
    let mut path = PathBuilder::new();
    match kind {
        SymbolKind::Circle => {
            let r = (size / PI).sqrt();
            path.move_to(r, 0.0);
            path.arc_to(r, true, true, -r, 0.0);
            path.arc_to(r, true, true, r, 0.0);
        }
        SymbolKind::Cross => {
            let r = (size / 5.0).sqrt() / 2.0;
            let outline = [
                (-3.0, -1.0),
                (-1.0, -1.0),
                (-1.0, -3.0),
                (1.0, -3.0),
                (1.0, -1.0),
                (3.0, -1.0),
                (3.0, 1.0),
                (1.0, 1.0),
                (1.0, 3.0),
                (-1.0, 3.0),
                (-1.0, 1.0),
                (-3.0, 1.0),
            ];
            polygon(&mut path, outline.iter().map(|&(x, y)| (x * r, y * r)));
        }
        SymbolKind::Diamond => {
            let tan30 = (1.0f64 / 3.0).sqrt();
            let y = (size / (tan30 * 2.0)).sqrt();
            let x = y * tan30;
            polygon(&mut path, [(0.0, -y), (x, 0.0), (0.0, y), (-x, 0.0)]);
        }
        SymbolKind::Square => {
            let w = size.sqrt();
            let x = -w / 2.0;
            polygon(&mut path, [(x, x), (x + w, x), (x + w, x + w), (x, x + w)]);
        }
        SymbolKind::Star => {
            let ka = 0.890_813_091_529_285_2;
            let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
            let kx = (TAU / 10.0).sin() * kr;
            let ky = -(TAU / 10.0).cos() * kr;
            let r = (size * ka).sqrt();
            let (x, y) = (kx * r, ky * r);
            let mut outline = vec![(0.0, -r), (x, y)];
            for i in 1..5 {
                let a = TAU * f64::from(i) / 5.0;
                let (s, c) = a.sin_cos();
                outline.push((s * r, -c * r));
                outline.push((c * x - s * y, s * x + c * y));
            }
            polygon(&mut path, outline);
        }
        SymbolKind::Triangle => {
            let sqrt3 = 3.0f64.sqrt();
            let y = -(size / (sqrt3 * 3.0)).sqrt();
            polygon(&mut path, [(0.0, y * 2.0), (-sqrt3 * y, -y), (sqrt3 * y, -y)]);
        }
        SymbolKind::Wye => {
            let c = -0.5;
            let s = 3.0f64.sqrt() / 2.0;
            let k = 1.0 / 12.0f64.sqrt();
            let a = (k / 2.0 + 1.0) * 3.0;
            let r = (size / a).sqrt();
            let (x0, y0) = (r / 2.0, r * k);
            let (x1, y1) = (x0, r * k + r);
            let (x2, y2) = (-x1, y1);
            polygon(
                &mut path,
                [
                    (x0, y0),
                    (x1, y1),
                    (x2, y2),
                    (c * x0 - s * y0, s * x0 + c * y0),
                    (c * x1 - s * y1, s * x1 + c * y1),
                    (c * x2 - s * y2, s * x2 + c * y2),
                    (c * x0 + s * y0, c * y0 - s * x0),
                    (c * x1 + s * y1, c * y1 - s * x1),
                    (c * x2 + s * y2, c * y2 - s * x2),
                ],
            );
        }
    }
    path.finish()
}

fn polygon(path: &mut PathBuilder, points: impl IntoIterator<Item = (f64, f64)>) {
    let mut points = points.into_iter();
    if let Some((x, y)) = points.next() {
        path.move_to(x, y);
        for (x, y) in points {
            path.line_to(x, y);
        }
        path.close();
    }
}

#[cfg(test)]
mod tests {
    use super::{Arc, Curve, SymbolKind, area_path, line_path, symbol_path};
    use std::f64::consts::{PI, TAU};

    #[test]
    fn linear_line_joins_points() {
        let path = line_path(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)], Curve::Linear);
        assert_eq!(path, "M0,0L10,5L20,0");
        assert_eq!(line_path(&[], Curve::MonotoneX), "");
    }

    #[test]
    fn step_after_holds_the_previous_value() {
        let path = line_path(&[(0.0, 0.0), (10.0, 5.0)], Curve::StepAfter);
        assert_eq!(path, "M0,0L10,0L10,5");
    }

    #[test]
    fn monotone_curve_passes_through_every_point() {
        let points = [(0.0, 0.0), (10.0, 8.0), (20.0, 2.0), (30.0, 9.0)];
        let path = line_path(&points, Curve::MonotoneX);
        assert!(path.starts_with("M0,0C"));
        for (x, y) in &points[1..] {
            assert!(path.contains(&format!(",{x},{y}")), "missing {x},{y} in {path}");
        }
    }

    #[test]
    fn area_closes_back_along_the_baseline() {
        let path = area_path(&[(0.0, 100.0, 10.0), (50.0, 100.0, 20.0)], Curve::Linear);
        assert_eq!(path, "M0,10L50,20L50,100L0,100Z");
    }

    #[test]
    fn arc_contains_points_inside_the_sector() {
        let quarter = Arc::new(10.0, 20.0, 0.0, PI / 2.0);
        assert!(quarter.contains(10.0, -10.0));
        assert!(!quarter.contains(-10.0, -10.0));
        assert!(!quarter.contains(2.0, -2.0));
        let full = Arc::new(0.0, 20.0, 0.0, TAU);
        assert!(full.contains(-5.0, 5.0));
        assert!(full.path().matches('A').count() == 2);
    }

    #[test]
    fn every_symbol_produces_a_path() {
        for kind in [
            SymbolKind::Circle,
            SymbolKind::Cross,
            SymbolKind::Diamond,
            SymbolKind::Square,
            SymbolKind::Star,
            SymbolKind::Triangle,
            SymbolKind::Wye,
        ] {
            assert!(symbol_path(kind, 64.0).starts_with('M'));
        }
        assert_eq!(SymbolKind::from_marker_shape("ring"), SymbolKind::Circle);
        assert_eq!(SymbolKind::from_marker_shape("bogus"), SymbolKind::Circle);
    }
}
