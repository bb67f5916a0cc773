//! Corner rounding: replaces a sharp (A, B, C) vertex with a sampled arc
//! when `B`'s corner radius is nonzero.

use crate::arc::arc_between_angle_3d;
use crate::error::{PolychannelError, Result};
use crate::resolve::{Resolved, ResolvedEntry};

type Point = (f64, f64, f64);

fn lerp(a: Point, b: Point, t: f64) -> Point {
    (a.0 * (1.0 - t) + b.0 * t, a.1 * (1.0 - t) + b.1 * t, a.2 * (1.0 - t) + b.2 * t)
}

fn axis(p: Point, i: usize) -> f64 {
    match i {
        0 => p.0,
        1 => p.1,
        _ => p.2,
    }
}

fn with_axis(mut p: Point, i: usize, value: f64) -> Point {
    match i {
        0 => p.0 = value,
        1 => p.1 = value,
        _ => p.2 = value,
    }
    p
}

fn add(a: Point, b: Point) -> Point {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}

/// Replace every interior shape entry with a nonzero corner radius by its
/// sampled rounding arc. Bezier entries pass through unrounded (a corner
/// radius on a Bezier endpoint is not a combination the source format
/// supports; the curve's own samples already smooth the transition).
/// Operates over a borrowed slice so each entry can see its immediate
/// neighbours' original (pre-replacement) positions, matching the
/// reference algorithm's lookahead.
pub(crate) fn round_corners_slice(entries: &[ResolvedEntry]) -> Result<Vec<ResolvedEntry>> {
    if entries.len() < 3 {
        return Ok(entries.to_vec());
    }

    let mut out = Vec::with_capacity(entries.len());
    let len = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        let corner_radius = entry.common().corner_radius;
        if corner_radius <= 0.0 {
            out.push(entry.clone());
            continue;
        }
        if i == 0 || i == len - 1 {
            return Err(PolychannelError::EndpointCornerRadius);
        }
        let shape = match entry {
            ResolvedEntry::Shape(s) => s.clone(),
            ResolvedEntry::Bezier { .. } => {
                out.push(entry.clone());
                continue;
            }
        };

        let a = entries[i - 1].common().position;
        let b = shape.position;
        let c = entries[i + 1].common().position;

        let arc = arc_between_angle_3d(a, b, c, corner_radius, shape.corner_segments)?;
        let Some(arc) = arc else {
            out.push(entry.clone());
            continue;
        };
        if arc.start_dir == arc.end_dir {
            // Degenerate corner: the incoming/outgoing legs share a
            // dominant axis. Pass the shape through unrounded rather than
            // zeroing a size dimension that was never swept along this
            // corner.
            out.push(entry.clone());
            continue;
        }

        let mut start_size = shape.size;
        let mut end_size = shape.size;
        start_size = with_axis(start_size, arc.start_dir, 0.0);
        end_size = with_axis(end_size, arc.end_dir, axis(end_size, arc.start_dir));
        end_size = with_axis(end_size, arc.start_dir, 0.0);

        let steps = arc.points.len();
        for (idx, (point, rotation)) in arc.points.iter().zip(arc.rotations.iter()).enumerate() {
            let t = idx as f64 / (steps - 1) as f64;
            let size = lerp(start_size, end_size, t);
            let no_validation = !(idx == 0 || idx == steps - 1);
            out.push(ResolvedEntry::Shape(Resolved {
                shape_type: shape.shape_type,
                position: *point,
                size,
                rounded_cube_radius: shape.rounded_cube_radius,
                rotation: add(shape.rotation, *rotation),
                corner_radius: shape.corner_radius,
                corner_segments: shape.corner_segments,
                segments: None,
                no_validation,
            }));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeType;

    fn shape(position: Point, corner_radius: f64) -> ResolvedEntry {
        ResolvedEntry::Shape(Resolved {
            shape_type: ShapeType::Cube,
            position,
            size: (4.0, 4.0, 4.0),
            rounded_cube_radius: (0.0, 0.0, 0.0),
            rotation: (0.0, 0.0, 0.0),
            corner_radius,
            corner_segments: 5,
            segments: None,
            no_validation: false,
        })
    }

    #[test]
    fn zero_radius_corners_pass_through() {
        let entries = vec![
            shape((0.0, 0.0, 0.0), 0.0),
            shape((10.0, 0.0, 0.0), 0.0),
            shape((10.0, 10.0, 0.0), 0.0),
        ];
        let out = round_corners_slice(&entries).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn rounded_corner_expands_into_arc_samples() {
        let entries = vec![
            shape((0.0, 0.0, 0.0), 0.0),
            shape((10.0, 0.0, 0.0), 2.0),
            shape((10.0, 10.0, 0.0), 0.0),
        ];
        let out = round_corners_slice(&entries).unwrap();
        assert_eq!(out.len(), 2 + 5);
    }

    #[test]
    fn endpoint_corner_radius_errors() {
        let entries = vec![
            shape((0.0, 0.0, 0.0), 1.0),
            shape((10.0, 0.0, 0.0), 0.0),
            shape((10.0, 10.0, 0.0), 0.0),
        ];
        assert!(matches!(round_corners_slice(&entries), Err(PolychannelError::EndpointCornerRadius)));
    }
}
