//! Geometry core: CSG solids, keepout tracking, and the primitive builders
//! everything above this crate composes (polychannels, components, the
//! slicer).
//!
//! All boolean and tessellation work is delegated to an external manifold
//! library ([`backend`]); this crate's own job is keepout bookkeeping,
//! pixel-grid alignment, and the primitive catalogue.

#![warn(missing_docs)]

mod aabb;
mod backend;
mod error;
mod math;
mod segments;
mod shape;

pub use aabb::Aabb;
pub use backend::{BoolOp, ManifoldHandle, ManifoldMesh, SlicePolygon};
pub use error::{Result, ShapeError};
pub use math::{Point3, Transform, Vec3};
pub use segments::{default_segments, set_default_segments};
pub use shape::{Shape, ShapeMeta};
