//! Errors raised while resolving or materialising a polychannel.

use thiserror::Error;

/// Errors surfaced while building a [`crate::Polychannel`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolychannelError {
    /// Fewer than 2 shapes were supplied.
    #[error("polychannel requires at least 2 shapes")]
    TooShort,
    /// The first entry did not specify a shape type.
    #[error("shape type must be specified for the first shape in a polychannel")]
    FirstShapeMissingType,
    /// The first entry did not specify a size.
    #[error("size must be specified for the first shape in a polychannel")]
    FirstShapeMissingSize,
    /// The first entry is a rounded cube with no radius given.
    #[error("rounded cube radius must be specified for the first round cube shape in a polychannel")]
    FirstShapeMissingRadius,
    /// A Bezier entry was the first in the list.
    #[error("bezier curve cannot be the first shape in a polychannel")]
    BezierFirst,
    /// An entry's shape type has no known defaulting/construction rule.
    #[error("unsupported shape type: {0}")]
    UnsupportedShapeType(String),
    /// A Bezier entry had no control points.
    #[error("bezier curve requires at least 1 control point")]
    BezierTooFewControlPoints,
    /// A Bezier entry had fewer than 2 segments.
    #[error("bezier curve requires at least 2 segments")]
    BezierTooFewSegments,
    /// The corner radius exceeded the adjoining segment lengths.
    #[error("corner arc geometry is invalid: {0}")]
    ArcGeometry(String),
    /// A corner radius was given on the first or last shape.
    #[error("first and last shapes in a polychannel cannot have a corner radius")]
    EndpointCornerRadius,
}

/// Result alias for polychannel operations.
pub type Result<T> = std::result::Result<T, PolychannelError>;
