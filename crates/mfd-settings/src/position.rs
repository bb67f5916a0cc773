//! Layer-to-layer build-platform motion settings.

use serde::{Deserialize, Serialize};

use crate::special::SpecialLayerTechnique;

/// Build-platform motion between two exposed layers. Every numeric field
/// is sparse (`None` inherits from a device default via
/// [`PositionSettings::fill_with_defaults`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSettings {
    /// Distance to move up, in mm.
    pub distance_up: Option<f64>,
    /// Initial wait before motion starts, in ms.
    pub initial_wait: Option<f64>,
    /// Upward speed, in mm/sec.
    pub up_speed: Option<f64>,
    /// Upward acceleration, in mm/sec^2.
    pub up_acceleration: Option<f64>,
    /// Wait after the upward move, in ms.
    pub up_wait: Option<f64>,
    /// Downward speed, in mm/sec.
    pub down_speed: Option<f64>,
    /// Downward acceleration, in mm/sec^2.
    pub down_acceleration: Option<f64>,
    /// Final wait before exposure, in ms.
    pub final_wait: Option<f64>,
    /// Layer-movement techniques applied at this layer.
    pub special_layer_techniques: Vec<SpecialLayerTechnique>,
}

impl PositionSettings {
    /// Fill every unset field from `defaults`, leaving already-set fields
    /// untouched.
    pub fn fill_with_defaults(&mut self, defaults: &PositionSettings) {
        self.distance_up = self.distance_up.or(defaults.distance_up);
        self.initial_wait = self.initial_wait.or(defaults.initial_wait);
        self.up_speed = self.up_speed.or(defaults.up_speed);
        self.up_acceleration = self.up_acceleration.or(defaults.up_acceleration);
        self.up_wait = self.up_wait.or(defaults.up_wait);
        self.down_speed = self.down_speed.or(defaults.down_speed);
        self.down_acceleration = self.down_acceleration.or(defaults.down_acceleration);
        self.final_wait = self.final_wait.or(defaults.final_wait);
        if self.special_layer_techniques.is_empty() {
            self.special_layer_techniques = defaults.special_layer_techniques.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_with_defaults_only_fills_unset_fields() {
        let mut settings = PositionSettings { distance_up: Some(2.0), ..Default::default() };
        let defaults = PositionSettings { distance_up: Some(1.0), up_speed: Some(25.0), ..Default::default() };
        settings.fill_with_defaults(&defaults);
        assert_eq!(settings.distance_up, Some(2.0));
        assert_eq!(settings.up_speed, Some(25.0));
    }
}
