//! Post-slice image generation: regional exposure splitting, membrane and
//! secondary-dose synthesis, and PNG encode/decode for the image store the
//! print compiler writes to disk.

#![warn(missing_docs)]

mod error;
mod exposure_region;
mod membrane;
mod morphology;
mod png;
mod secondary_dose;

pub use error::{ImagingError, Result};
pub use exposure_region::{attach_position_settings, split_exposure_region, ExposureSplit};
pub use membrane::{synthesize_membranes, Membrane};
pub use morphology::{and, and_not, dilate, erode, not, open_3x3, or};
pub use png::{decode_png, encode_png};
pub use secondary_dose::{synthesize_secondary_dose, SecondaryDoseSlice};
