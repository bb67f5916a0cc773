//! Errors raised while slicing a component tree into per-layer rasters.

use thiserror::Error;

/// Errors surfaced by [`crate::slice_device`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlicerError {
    /// A component's bulk shapes were empty once its own and its
    /// children's cutouts would be subtracted from them.
    #[error("component '{0}' has no bulk shape to slice")]
    NoBulkShape(String),
    /// A regional-settings entry's mask shape was empty; slicing it would
    /// produce an unresolvable raster.
    #[error("regional settings '{0}' on component '{1}' have an empty mask shape")]
    EmptyMask(String, String),
}

/// Result alias for slicer operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
