//! Membrane (thin-film bridge) exposure settings.

use serde::{Deserialize, Serialize};

use crate::exposure::ExposureSettings;
use crate::special::SpecialImageTechnique;

/// Settings controlling how a thin membrane spanning a void is exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembraneSettings {
    /// Membranes thicker than this are not treated as bridges.
    pub max_membrane_thickness_um: f64,
    /// Dilation applied to the membrane mask, in px.
    pub dilation_px: u32,
    /// Exposure applied to the membrane mask.
    pub exposure_settings: ExposureSettings,
}

impl MembraneSettings {
    /// Build from the flattened field set the reference format accepts.
    pub fn new(
        max_membrane_thickness_um: f64,
        exposure_time: f64,
        dilation_px: u32,
        defocus_um: f64,
        special_image_techniques: Vec<SpecialImageTechnique>,
    ) -> Self {
        Self {
            max_membrane_thickness_um,
            dilation_px,
            exposure_settings: ExposureSettings {
                exposure_time: Some(exposure_time),
                relative_focus_position: Some(defocus_um),
                special_image_techniques,
                ..Default::default()
            },
        }
    }
}
