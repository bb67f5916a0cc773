//! Sparse settings structs shared by the component tree, slicer, and print
//! compiler: position (platform motion), exposure (light engine), membrane,
//! and secondary-dose; plus the process-wide [`Config`] and resin-naming
//! [`ResinType`].

#![warn(missing_docs)]

mod config;
mod exposure;
mod membrane;
mod position;
mod resin;
mod secondary_dose;
mod special;

pub use config::{Config, ConfigError, RouterConfig};
pub use exposure::ExposureSettings;
pub use membrane::MembraneSettings;
pub use position::PositionSettings;
pub use resin::{ResinError, ResinType};
pub use secondary_dose::{SecondaryDoseError, SecondaryDoseSettings};
pub use special::{SpecialImageTechnique, SpecialLayerTechnique};
