//! Thin wrapper over the external manifold CSG library.
//!
//! Everything in this module is a direct pass-through to `manifold_rs`,
//! isolating the one indispensable external dependency the core has (per
//! the design notes: "the manifold CSG library is the only indispensable
//! external dependency of the core"). No boolean, tessellation, or mesh
//! logic is implemented locally — if it's not here, it's the library's job.

use manifold_rs::Manifold;

/// Which boolean combinator a batch operation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Union (logical OR) of all operands.
    Add,
    /// Subtract every operand after the first from the first.
    Subtract,
    /// Intersection (logical AND) of all operands.
    Intersect,
}

/// A vertex/triangle mesh as handed back by the manifold library.
#[derive(Debug, Clone)]
pub struct ManifoldMesh {
    /// Flattened `x, y, z, x, y, z, ...` vertex positions.
    pub vertices: Vec<f64>,
    /// Flattened triangle vertex indices.
    pub indices: Vec<u32>,
}

/// A closed 2D polygon produced by slicing a manifold at a given Z height.
#[derive(Debug, Clone)]
pub struct SlicePolygon {
    /// Vertices in order, `(x, y)` in the same units as the solid.
    pub points: Vec<(f64, f64)>,
}

/// Handle to one manifold solid.
#[derive(Clone)]
pub struct ManifoldHandle(Manifold);

impl ManifoldHandle {
    /// The empty solid (identity element for union).
    pub fn empty() -> Self {
        Self(Manifold::empty())
    }

    /// An axis-aligned box with its minimum corner at the origin,
    /// extent `(x, y, z)`.
    pub fn cube(x: f64, y: f64, z: f64) -> Self {
        Self(Manifold::cube(x, y, z))
    }

    /// A cylinder along Z with independent bottom/top radii, from `z=0` to
    /// `z=height`.
    pub fn cylinder(height: f64, rlow: f64, rhigh: f64, segments: u32) -> Self {
        Self(Manifold::cylinder(rlow, rhigh, height, segments))
    }

    /// A sphere centred at the origin.
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self(Manifold::sphere(radius, segments))
    }

    /// Union.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0))
    }

    /// Difference (`self - other`).
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0))
    }

    /// Intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0))
    }

    /// Apply a boolean combinator across a non-empty slice of operands in
    /// one pass. The reference library's native batch entry points
    /// (`batch_boolean`/`batch_hull`) are preferred over chained binary
    /// calls because they amortise the underlying BSP rebuild; this wrapper
    /// folds pairwise when only binary ops are bound, and the fold order
    /// (left to right) keeps the result independent of how many operands
    /// are passed.
    pub fn batch_boolean(parts: &[Self], op: BoolOp) -> Self {
        debug_assert!(!parts.is_empty());
        let mut iter = parts.iter();
        let first = iter.next().unwrap().clone();
        iter.fold(first, |acc, next| match op {
            BoolOp::Add => acc.union(next),
            BoolOp::Subtract => acc.difference(next),
            BoolOp::Intersect => acc.intersection(next),
        })
    }

    /// Convex hull of the combined geometry of every operand.
    pub fn batch_hull(parts: &[Self]) -> Self {
        debug_assert!(!parts.is_empty());
        let manifolds: Vec<Manifold> = parts.iter().map(|p| p.0.clone()).collect();
        Self(Manifold::hull(&manifolds))
    }

    /// Translate.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self(self.0.translate(dx, dy, dz))
    }

    /// Euler rotation in degrees (X then Y then Z).
    pub fn rotate(&self, rx: f64, ry: f64, rz: f64) -> Self {
        Self(self.0.rotate(rx, ry, rz))
    }

    /// Non-uniform scale.
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Self {
        Self(self.0.scale(sx, sy, sz))
    }

    /// Mirror across the planes whose flag is set.
    pub fn mirror(&self, mx: bool, my: bool, mz: bool) -> Self {
        let sx = if mx { -1.0 } else { 1.0 };
        let sy = if my { -1.0 } else { 1.0 };
        let sz = if mz { -1.0 } else { 1.0 };
        self.scale(sx, sy, sz)
    }

    /// Whether the solid has zero volume.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tessellated mesh.
    pub fn to_mesh(&self) -> ManifoldMesh {
        let mesh = self.0.to_mesh();
        ManifoldMesh {
            vertices: mesh.vertices().to_vec(),
            indices: mesh.indices().to_vec(),
        }
    }

    /// Axis-aligned bounding box `(x0, y0, z0, x1, y1, z1)` of the solid,
    /// derived from the tessellated mesh.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64, f64, f64) {
        let mesh = self.to_mesh();
        let mut min = (f64::MAX, f64::MAX, f64::MAX);
        let mut max = (f64::MIN, f64::MIN, f64::MIN);
        for chunk in mesh.vertices.chunks_exact(3) {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min = (min.0.min(x), min.1.min(y), min.2.min(z));
            max = (max.0.max(x), max.1.max(y), max.2.max(z));
        }
        if mesh.vertices.is_empty() {
            return (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        }
        (min.0, min.1, min.2, max.0, max.1, max.2)
    }

    /// Slice the solid at height `z`, returning the cross-section's closed
    /// polygons in the library's own winding convention.
    pub fn slice(&self, z: f64) -> Vec<SlicePolygon> {
        self.0
            .slice(z)
            .into_iter()
            .map(|poly| SlicePolygon { points: poly })
            .collect()
    }

    /// Sample an implicit function's zero level-set over `bounds` on a grid
    /// with spacing `edge`, producing a solid approximating `level`.
    pub fn level_set(
        f: impl Fn(f64, f64, f64) -> f64,
        bounds: (f64, f64, f64, f64, f64, f64),
        edge: f64,
        level: f64,
    ) -> Self {
        Self(Manifold::level_set(&f, bounds, edge, level))
    }
}
