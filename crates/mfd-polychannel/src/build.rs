//! Materialisation: turns a fully-expanded, rounded cross-section list into
//! primitive [`mfd_geom::Shape`]s and hulls them pairwise into one channel.

use mfd_geom::Shape;

use crate::error::{PolychannelError, Result};
use crate::resolve::{Resolved, ResolvedEntry};
use crate::shapes::{Entry, ShapeType};
use crate::{bezier, resolve, rounding};

fn with_segments<T>(segments: Option<u32>, f: impl FnOnce() -> T) -> T {
    match segments {
        Some(n) => {
            let previous = mfd_geom::default_segments();
            mfd_geom::set_default_segments(n);
            let result = f();
            mfd_geom::set_default_segments(previous);
            result
        }
        None => f(),
    }
}

fn build_shape(entry: &Resolved) -> Shape {
    let primitive = with_segments(entry.segments, || match entry.shape_type {
        ShapeType::Cube => Shape::cube(entry.size.0, entry.size.1, entry.size.2, true, entry.no_validation),
        ShapeType::Sphere => Shape::ellipsoid(entry.size.0 / 2.0, entry.size.1 / 2.0, entry.size.2 / 2.0),
        ShapeType::RoundedCube => Shape::rounded_cube(
            entry.size.0,
            entry.size.1,
            entry.size.2,
            entry.rounded_cube_radius.0,
            entry.rounded_cube_radius.1,
            entry.rounded_cube_radius.2,
        ),
    });
    primitive
        .rotate(entry.rotation.0, entry.rotation.1, entry.rotation.2)
        .translate(entry.position.0, entry.position.1, entry.position.2)
}

/// A hulled channel built from a sparse list of cross-sections.
pub struct Polychannel {
    shape: Shape,
}

impl Polychannel {
    /// Resolve, round, expand, and hull `entries` into one channel.
    ///
    /// When `show_only_shapes` is set the cross-sections are unioned
    /// instead of hulled together, for previewing a channel's stations
    /// without the connecting sweep.
    pub fn build(entries: Vec<Entry>, show_only_shapes: bool) -> Result<Self> {
        let resolved = resolve::resolve(&entries)?;
        let rounded = rounding::round_corners_slice(&resolved)?;
        let expanded = bezier::expand_all(rounded);

        let shapes: Vec<Shape> = expanded
            .iter()
            .map(|e| match e {
                ResolvedEntry::Shape(s) => build_shape(s),
                ResolvedEntry::Bezier { .. } => unreachable!("bezier entries are expanded before materialisation"),
            })
            .collect();

        if shapes.len() < 2 {
            return Err(PolychannelError::TooShort);
        }

        let solid = if show_only_shapes {
            let mut path = shapes[0].copy(true);
            for shape in &shapes[1..] {
                path = path.union(shape);
            }
            path
        } else {
            let mut path = shapes[0].hull(&shapes[1]);
            let mut last_shape = shapes[1].copy(true);
            for shape in &shapes[2..] {
                path = path.union(&last_shape.hull(shape));
                last_shape = shape.copy(true);
            }
            path
        };

        Ok(Self { shape: solid })
    }

    /// The hulled channel solid.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Consume the channel, returning its solid.
    pub fn into_shape(self) -> Shape {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SparseShape;

    #[test]
    fn straight_channel_of_two_cubes_hulls() {
        let entries = vec![
            Entry::Shape(SparseShape::new().shape_type(ShapeType::Cube).size((4.0, 4.0, 4.0)).position((0.0, 0.0, 0.0)).absolute()),
            Entry::Shape(SparseShape::new().position((10.0, 0.0, 0.0)).absolute()),
        ];
        let channel = Polychannel::build(entries, false).unwrap();
        assert!(!channel.shape().solid().is_empty());
    }

    #[test]
    fn single_shape_is_too_short() {
        let entries = vec![Entry::Shape(SparseShape::new().shape_type(ShapeType::Cube).size((4.0, 4.0, 4.0)))];
        assert!(matches!(Polychannel::build(entries, false), Err(PolychannelError::TooShort)));
    }

    #[test]
    fn show_only_shapes_unions_instead_of_hulling() {
        let entries = vec![
            Entry::Shape(SparseShape::new().shape_type(ShapeType::Cube).size((4.0, 4.0, 4.0)).position((0.0, 0.0, 0.0)).absolute()),
            Entry::Shape(SparseShape::new().position((20.0, 0.0, 0.0)).absolute()),
        ];
        let channel = Polychannel::build(entries, true).unwrap();
        assert!(!channel.shape().solid().is_empty());
    }
}
