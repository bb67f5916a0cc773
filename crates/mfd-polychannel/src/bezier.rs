//! Bezier-curve expansion: turns one [`crate::resolve::ResolvedEntry::Bezier`]
//! run into a sequence of plain cross-sections sampled along the curve.

use crate::resolve::{Resolved, ResolvedEntry};
use crate::shapes::ShapeType;

type Point = (f64, f64, f64);

fn lerp(a: Point, b: Point, t: f64) -> Point {
    (a.0 * (1.0 - t) + b.0 * t, a.1 * (1.0 - t) + b.1 * t, a.2 * (1.0 - t) + b.2 * t)
}

fn binomial(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

fn bernstein_point(t: f64, points: &[Point]) -> Point {
    let n = (points.len() - 1) as u32;
    let mut acc = (0.0, 0.0, 0.0);
    for (i, &p) in points.iter().enumerate() {
        let coeff = binomial(n, i as u32) * (1.0 - t).powi((n - i as u32) as i32) * t.powi(i as i32);
        acc.0 += coeff * p.0;
        acc.1 += coeff * p.1;
        acc.2 += coeff * p.2;
    }
    acc
}

/// Expand one Bezier entry against the shape immediately preceding it.
pub(crate) fn expand(prev: &Resolved, control_points: &[Point], endpoint: &Resolved, bezier_segments: u32) -> Vec<ResolvedEntry> {
    let shape_type = if endpoint.shape_type != prev.shape_type { ShapeType::RoundedCube } else { endpoint.shape_type };

    let mut curve_points = Vec::with_capacity(control_points.len() + 2);
    curve_points.push(prev.position);
    curve_points.extend_from_slice(control_points);
    curve_points.push(endpoint.position);

    let steps = bezier_segments.max(2);
    let mut out = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let position = bernstein_point(t, &curve_points);
        let size = lerp(prev.size, endpoint.size, t);
        let rounded_cube_radius = lerp(prev.rounded_cube_radius, endpoint.rounded_cube_radius, t);
        let rotation = lerp(prev.rotation, endpoint.rotation, t);
        let no_validation = !(i == 0 || i == steps - 1);

        out.push(ResolvedEntry::Shape(Resolved {
            shape_type,
            position,
            size,
            rounded_cube_radius,
            rotation,
            corner_radius: 0.0,
            corner_segments: endpoint.corner_segments,
            segments: endpoint.segments,
            no_validation,
        }));
    }
    out
}

/// Run Bezier expansion over the whole (corner-rounded) entry list.
pub(crate) fn expand_all(entries: Vec<ResolvedEntry>) -> Vec<ResolvedEntry> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ResolvedEntry::Shape(shape) => out.push(ResolvedEntry::Shape(shape)),
            ResolvedEntry::Bezier { endpoint, control_points, bezier_segments } => {
                let prev = out.last().expect("bezier entry is never first").common().clone();
                out.extend(expand(&prev, &control_points, &endpoint, bezier_segments));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_matches_pascals_triangle() {
        assert_eq!(binomial(4, 0), 1.0);
        assert_eq!(binomial(4, 1), 4.0);
        assert_eq!(binomial(4, 2), 6.0);
        assert_eq!(binomial(4, 4), 1.0);
    }

    #[test]
    fn bernstein_endpoints_match_control_points() {
        let points = vec![(0.0, 0.0, 0.0), (5.0, 5.0, 0.0), (10.0, 0.0, 0.0)];
        let start = bernstein_point(0.0, &points);
        let end = bernstein_point(1.0, &points);
        assert_eq!(start, (0.0, 0.0, 0.0));
        assert_eq!(end, (10.0, 0.0, 0.0));
    }
}
