//! Secondary-dose (edge/roof) exposure settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exposure::ExposureSettings;

/// Errors raised while constructing [`SecondaryDoseSettings`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecondaryDoseError {
    /// Edge erosion/dilation was requested without an edge exposure time.
    #[error("edge exposure time must be set if edge erosion or dilation is specified")]
    EdgeExposureTimeMissing,
    /// Roof erosion/layers-above was requested without a roof exposure
    /// time.
    #[error("roof exposure time must be set if roof erosion or layers above is specified")]
    RoofExposureTimeMissing,
}

/// A secondary, lower-dose exposure applied to edges and roof faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDoseSettings {
    /// Erosion applied to the edge mask, in px.
    pub edge_erosion_px: u32,
    /// Dilation applied to the edge mask, in px.
    pub edge_dilation_px: u32,
    /// Erosion applied to the roof mask, in px.
    pub roof_erosion_px: u32,
    /// How many prior layers' masks accumulate into the roof mask.
    pub roof_layers_above: u32,
    /// Exposure applied to the edge mask.
    pub edge_exposure_settings: ExposureSettings,
    /// Exposure applied to the roof mask.
    pub roof_exposure_settings: ExposureSettings,
}

impl SecondaryDoseSettings {
    /// Build secondary-dose settings, validating that erosion/dilation/
    /// layer-accumulation parameters are never set without their
    /// corresponding exposure time.
    pub fn new(
        edge_exposure_time: Option<f64>,
        edge_erosion_px: u32,
        edge_dilation_px: u32,
        roof_exposure_time: Option<f64>,
        roof_erosion_px: u32,
        roof_layers_above: u32,
    ) -> Result<Self, SecondaryDoseError> {
        if edge_exposure_time.is_none() && (edge_erosion_px > 0 || edge_dilation_px > 0) {
            return Err(SecondaryDoseError::EdgeExposureTimeMissing);
        }
        if roof_exposure_time.is_none() && (roof_erosion_px > 0 || roof_layers_above > 0) {
            return Err(SecondaryDoseError::RoofExposureTimeMissing);
        }
        Ok(Self {
            edge_erosion_px,
            edge_dilation_px,
            roof_erosion_px,
            roof_layers_above,
            edge_exposure_settings: ExposureSettings::with_exposure_time(edge_exposure_time),
            roof_exposure_settings: ExposureSettings::with_exposure_time(roof_exposure_time),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_erosion_without_exposure_time_errors() {
        let err = SecondaryDoseSettings::new(None, 2, 0, None, 0, 0).unwrap_err();
        assert_eq!(err, SecondaryDoseError::EdgeExposureTimeMissing);
    }

    #[test]
    fn roof_layers_without_exposure_time_errors() {
        let err = SecondaryDoseSettings::new(Some(100.0), 0, 0, None, 0, 2).unwrap_err();
        assert_eq!(err, SecondaryDoseError::RoofExposureTimeMissing);
    }

    #[test]
    fn valid_settings_construct() {
        let settings = SecondaryDoseSettings::new(Some(100.0), 2, 2, Some(80.0), 1, 3).unwrap();
        assert_eq!(settings.edge_erosion_px, 2);
        assert_eq!(settings.roof_layers_above, 3);
    }
}
