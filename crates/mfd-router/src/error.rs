//! Errors raised while planning or materialising a route.

use thiserror::Error;

/// Errors surfaced by [`crate::Router`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    /// A port's native bounding box (plus channel margin) does not fit
    /// inside the routed component, excluding the port's own normal axis.
    #[error("port '{0}' cannot be routed: its bounding box does not fit inside the component")]
    PortUnroutable(String),
    /// A dotted path did not resolve to a port anywhere in the tree.
    #[error("port '{0}' not found")]
    PortNotFound(String),
    /// A route request referenced a route name that was never queued.
    #[error("route '{0}' was never queued")]
    RouteNotFound(String),
    /// A fractional path's per-axis deltas did not sum to 1.0.
    #[error("fractional path deltas on axis {axis} sum to {sum}, expected 1.0")]
    FractionalPathNotNormalized {
        /// Which axis failed (0=x, 1=y, 2=z).
        axis: u8,
        /// The actual sum.
        sum: f64,
    },
    /// The polychannel builder rejected the materialised path.
    #[error("failed to materialise route '{name}': {source}")]
    Materialisation {
        /// The route's name.
        name: String,
        /// The underlying polychannel error, rendered to a string.
        source: String,
    },
    /// Reading or writing the on-disk route cache failed.
    #[error("route cache I/O failed: {0}")]
    CacheIo(String),
}

/// Result alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
