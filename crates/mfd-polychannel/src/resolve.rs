//! Sparse-to-dense defaulting pass: fills every `None` field from the
//! previous entry, per the first-entry/subsequent-entry rules.

use crate::error::{PolychannelError, Result};
use crate::shapes::{BezierShape, Entry, ShapeType};

type Point = (f64, f64, f64);

fn add(a: Point, b: Point) -> Point {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}

fn half(p: Point) -> Point {
    (p.0 / 2.0, p.1 / 2.0, p.2 / 2.0)
}

/// A fully-defaulted cross-section, still carrying its own
/// `_no_validation` flag (always `false` until the corner-rounding pass
/// samples through it).
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub shape_type: ShapeType,
    pub position: Point,
    pub size: Point,
    pub rounded_cube_radius: Point,
    pub rotation: Point,
    pub corner_radius: f64,
    pub corner_segments: u32,
    pub segments: Option<u32>,
    pub no_validation: bool,
}

/// A defaulted entry: either a plain cross-section or a Bezier run whose
/// endpoint has already been defaulted like any other entry.
#[derive(Debug, Clone)]
pub(crate) enum ResolvedEntry {
    Shape(Resolved),
    Bezier { endpoint: Resolved, control_points: Vec<Point>, bezier_segments: u32 },
}

impl ResolvedEntry {
    pub(crate) fn common(&self) -> &Resolved {
        match self {
            ResolvedEntry::Shape(r) => r,
            ResolvedEntry::Bezier { endpoint, .. } => endpoint,
        }
    }
}

fn default_radius_for(shape_type: ShapeType, size: Point, prev: Option<&Resolved>) -> Result<Point> {
    match shape_type {
        ShapeType::Cube => Ok((0.0, 0.0, 0.0)),
        ShapeType::Sphere => Ok(half(size)),
        ShapeType::RoundedCube => match prev {
            Some(prev) => Ok(prev.rounded_cube_radius),
            None => Err(PolychannelError::FirstShapeMissingRadius),
        },
    }
}

/// Run the first-entry/subsequent-entry defaulting pass over the raw
/// entry list.
pub(crate) fn resolve(entries: &[Entry]) -> Result<Vec<ResolvedEntry>> {
    if entries.len() < 2 {
        return Err(PolychannelError::TooShort);
    }

    let mut resolved: Vec<ResolvedEntry> = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let sparse = match entry {
            Entry::Shape(s) => s,
            Entry::Bezier(b) => &b.sparse,
        };
        let prev = resolved.last().map(|r: &ResolvedEntry| r.common().clone());

        if i == 0 {
            if matches!(entry, Entry::Bezier(_)) {
                return Err(PolychannelError::BezierFirst);
            }
            let shape_type = sparse.shape_type.ok_or(PolychannelError::FirstShapeMissingType)?;
            let size = sparse.size.ok_or(PolychannelError::FirstShapeMissingSize)?;
            let rounded_cube_radius = match sparse.rounded_cube_radius {
                Some(r) => r,
                None => default_radius_for(shape_type, size, None)?,
            };
            let position = sparse.position.unwrap_or((0.0, 0.0, 0.0));
            let corner_radius = sparse.corner_radius.unwrap_or(0.0);
            let corner_segments = sparse.corner_segments.unwrap_or(10);
            let rotation = sparse.rotation.unwrap_or((0.0, 0.0, 0.0));

            resolved.push(ResolvedEntry::Shape(Resolved {
                shape_type,
                position,
                size,
                rounded_cube_radius,
                rotation,
                corner_radius,
                corner_segments,
                segments: sparse.segments,
                no_validation: false,
            }));
            continue;
        }

        let prev = prev.expect("non-first entry always has a predecessor");
        let shape_type = sparse.shape_type.unwrap_or(prev.shape_type);
        let size = sparse.size.unwrap_or(prev.size);
        let rounded_cube_radius = match sparse.rounded_cube_radius {
            Some(r) => r,
            None => default_radius_for(shape_type, size, Some(&prev))?,
        };
        let absolute_position = sparse.absolute_position.unwrap_or(false);
        let mut position = sparse.position.unwrap_or(prev.position);
        if !absolute_position {
            position = add(position, prev.position);
        }
        let corner_radius = sparse.corner_radius.unwrap_or(prev.corner_radius);
        let corner_segments = sparse.corner_segments.unwrap_or(prev.corner_segments);
        let rotation = sparse.rotation.unwrap_or(prev.rotation);

        let common = Resolved {
            shape_type,
            position,
            size,
            rounded_cube_radius,
            rotation,
            corner_radius,
            corner_segments,
            segments: sparse.segments,
            no_validation: false,
        };

        match entry {
            Entry::Shape(_) => resolved.push(ResolvedEntry::Shape(common)),
            Entry::Bezier(BezierShape { control_points, bezier_segments, .. }) => {
                if control_points.is_empty() {
                    return Err(PolychannelError::BezierTooFewControlPoints);
                }
                if *bezier_segments < 2 {
                    return Err(PolychannelError::BezierTooFewSegments);
                }
                let shifted: Vec<Point> = if absolute_position {
                    control_points.clone()
                } else {
                    control_points.iter().map(|&p| add(p, prev.position)).collect()
                };
                resolved.push(ResolvedEntry::Bezier {
                    endpoint: common,
                    control_points: shifted,
                    bezier_segments: *bezier_segments,
                });
            }
        }
    }

    Ok(resolved)
}
