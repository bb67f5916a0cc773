//! Errors raised by the geometry core.

use thiserror::Error;

/// Errors surfaced while constructing or combining [`crate::Shape`]s.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// A cylinder's top/bottom radii were not both multiples of 0.5.
    #[error("cylinder radii must be multiples of 0.5, got rlow={rlow}, rhigh={rhigh}")]
    ShapeRadiusGrid {
        /// Bottom radius, in mm.
        rlow: f64,
        /// Top radius, in mm.
        rhigh: f64,
    },
    /// A cylinder's top and bottom radii had unequal half-pixel parity.
    #[error("cylinder top/bottom radii must share parity: rlow={rlow}, rhigh={rhigh}")]
    ShapeParity {
        /// Bottom radius, in mm.
        rlow: f64,
        /// Top radius, in mm.
        rhigh: f64,
    },
    /// A batch combinator was called with an empty shape list.
    #[error("batch combinator called with an empty shape list")]
    EmptyBatch,
    /// An imported mesh remained non-manifold after repair.
    #[error("imported mesh is not watertight after repair")]
    MeshNotWatertight,
}

/// Result alias for geometry-core operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
