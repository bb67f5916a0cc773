//! Errors raised while encoding or decoding a raster's PNG wire form.

use thiserror::Error;

/// Errors surfaced by [`crate::encode_png`] and [`crate::decode_png`].
#[derive(Error, Debug)]
pub enum ImagingError {
    /// The underlying PNG codec failed.
    #[error("PNG codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Result alias for imaging operations.
pub type Result<T> = std::result::Result<T, ImagingError>;
