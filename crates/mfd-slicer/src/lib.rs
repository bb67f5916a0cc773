//! CSG-to-raster slicer: a depth-first walk over a component tree that
//! unions bulk shapes, subtracts voids and child bounding-box cutouts,
//! rasterises each layer with an orientation-aware fill, and bit-packs the
//! result with run-length encoding.

#![warn(missing_docs)]

mod error;
mod polygon;
mod raster;
mod rle;
mod slice;

pub use error::{Result, SlicerError};
pub use polygon::Polygon2;
pub use raster::{flip_vertical, rasterize, GrayImage};
pub use rle::PackedImage;
pub use slice::{slice_device, ChildPosition, ComponentSlices, SliceRecord, SlicedDevice};
