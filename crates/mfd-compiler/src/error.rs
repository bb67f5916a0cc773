//! Print-compiler error kinds.

use thiserror::Error;

/// Errors raised while compiling a sliced device into a print job.
#[derive(Error, Debug)]
pub enum CompilerError {
    /// A stitched device was compiled against a printer with no XY stage.
    #[error("device {0} requires a printer with XY stage support")]
    XyStageRequired(String),
    /// No light engine in the printer profile fits the device's pixel
    /// pitch, pixel count, and wavelength.
    #[error("no light engine matches px_size={px_size}, px_count={px_count:?}, wavelength={wavelength}nm")]
    NoMatchingLightEngine {
        /// The device's pixel pitch, in mm.
        px_size: f64,
        /// The device's pixel count.
        px_count: (i64, i64),
        /// The requested wavelength, in nm.
        wavelength: u32,
    },
    /// The device tree produced no slices at all.
    #[error("device {0} produced no slices")]
    NoSlices(String),
    /// Slicing the device tree failed.
    #[error(transparent)]
    Slicer(#[from] mfd_slicer::SlicerError),
    /// Writing the image store or zip archive failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Zip archive construction failed.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// PNG encoding failed.
    #[error(transparent)]
    Image(#[from] mfd_imaging::ImagingError),
}

/// Convenience alias for compiler results.
pub type Result<T> = std::result::Result<T, CompilerError>;
