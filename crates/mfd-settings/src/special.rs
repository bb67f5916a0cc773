//! Opt-in special techniques layered onto a position/exposure setting.

use serde::{Deserialize, Serialize};

/// A layer-movement technique applied between two print layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecialLayerTechnique {
    /// Squeeze resin out from under the part before the next layer.
    SqueezeOutResin {
        /// Whether the technique is active.
        enabled: bool,
        /// Number of squeeze strokes.
        count: u32,
        /// Squeeze force, in newtons.
        squeeze_force: f64,
        /// Squeeze dwell time, in milliseconds.
        squeeze_time: f64,
    },
}

/// An image-level technique applied to a single exposed layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecialImageTechnique {
    /// Insert extra zero-thickness exposure layers.
    ZeroMicronLayer {
        /// Whether the technique is active.
        enabled: bool,
        /// Number of zero-micron layers to insert.
        count: u32,
    },
    /// Raise the build platform to expose onto a film rather than the
    /// previous cured layer.
    PrintOnFilm {
        /// Whether the technique is active.
        enabled: bool,
        /// Distance to raise, in mm.
        distance_up_mm: f64,
    },
}
