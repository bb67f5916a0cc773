//! Per-layer light-engine exposure settings.

use serde::{Deserialize, Serialize};

use crate::special::SpecialImageTechnique;

/// Light-engine exposure parameters for one printed layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureSettings {
    /// Whether to apply the light engine's grayscale correction.
    pub grayscale_correction: Option<bool>,
    /// Exposure time, in ms.
    pub exposure_time: Option<f64>,
    /// Light engine power, as a percentage.
    pub power_setting: Option<u32>,
    /// Light engine wavelength, in nm.
    pub wavelength: Option<u32>,
    /// Focus offset relative to the nominal plane, in microns.
    pub relative_focus_position: Option<f64>,
    /// Wait before exposure starts, in ms.
    pub wait_before_exposure: Option<f64>,
    /// Wait after exposure ends, in ms.
    pub wait_after_exposure: Option<f64>,
    /// Image-level techniques applied to this layer.
    pub special_image_techniques: Vec<SpecialImageTechnique>,
    /// Whether this exposure belongs to the burn-in sequence.
    pub burnin: bool,
}

impl ExposureSettings {
    /// An exposure setting with only `exposure_time` set; used to
    /// construct the membrane/secondary-dose sub-settings.
    pub fn with_exposure_time(exposure_time: Option<f64>) -> Self {
        Self { exposure_time, ..Default::default() }
    }

    /// Fill every unset field from `defaults`.
    pub fn fill_with_defaults(&mut self, defaults: &ExposureSettings) {
        self.grayscale_correction = self.grayscale_correction.or(defaults.grayscale_correction);
        self.exposure_time = self.exposure_time.or(defaults.exposure_time);
        self.power_setting = self.power_setting.or(defaults.power_setting);
        self.wavelength = self.wavelength.or(defaults.wavelength);
        self.relative_focus_position = self.relative_focus_position.or(defaults.relative_focus_position);
        self.wait_before_exposure = self.wait_before_exposure.or(defaults.wait_before_exposure);
        self.wait_after_exposure = self.wait_after_exposure.or(defaults.wait_after_exposure);
        if self.special_image_techniques.is_empty() {
            self.special_image_techniques = defaults.special_image_techniques.clone();
        }
    }
}
