//! Polychannel builder: expands a sparse list of cross-sections (with
//! optional corner rounding and Bezier runs) into one swept, hulled solid.

#![warn(missing_docs)]

mod arc;
mod bezier;
mod build;
mod error;
mod resolve;
mod rounding;
mod shapes;

pub use build::Polychannel;
pub use error::{PolychannelError, Result};
pub use shapes::{BezierShape, Entry, ShapeType, SparseShape};
