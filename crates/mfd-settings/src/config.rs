//! Process-wide tunables: circular-segment count, A* defaults, the
//! temp-directory/minimisation flags, and the position/exposure default
//! tables, loadable from a TOML file overlaid on [`Config::default`].

use serde::{Deserialize, Serialize};

use crate::exposure::ExposureSettings;
use crate::position::PositionSettings;

/// Errors raised while loading a [`Config`] from disk.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The TOML file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The TOML file did not parse.
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// A* router tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Cost-function heuristic weight `H`.
    pub heuristic_weight: f64,
    /// Cost-function turn weight `T`.
    pub turn_weight: f64,
    /// Wall-clock autoroute deadline, in seconds.
    pub timeout_secs: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { heuristic_weight: 10.0, turn_weight: 2.0, timeout_secs: 120.0 }
    }
}

/// Process-wide tunables, deserialisable from TOML. Every field overlays a
/// documented literal default: a user file only needs to list the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default circular-segment count for new circular/cylindrical shapes.
    pub circular_segments: u32,
    /// A* router defaults.
    pub router: RouterConfig,
    /// Keep the compile temp directory even on success.
    pub save_temp_files: bool,
    /// Content-address the image store instead of writing one file per
    /// slice.
    pub minimize_layers: bool,
    /// Device-wide default position settings.
    pub default_position: PositionSettings,
    /// Device-wide default exposure settings.
    pub default_exposure: ExposureSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            circular_segments: 20,
            router: RouterConfig::default(),
            save_temp_files: false,
            minimize_layers: true,
            default_position: PositionSettings {
                distance_up: Some(1.0),
                initial_wait: Some(0.0),
                up_speed: Some(25.0),
                up_acceleration: Some(50.0),
                up_wait: Some(0.0),
                down_speed: Some(20.0),
                down_acceleration: Some(50.0),
                final_wait: Some(0.0),
                special_layer_techniques: Vec::new(),
            },
            default_exposure: ExposureSettings {
                grayscale_correction: Some(false),
                exposure_time: Some(300.0),
                power_setting: Some(100),
                wavelength: Some(365),
                relative_focus_position: Some(0.0),
                wait_before_exposure: Some(0.0),
                wait_after_exposure: Some(0.0),
                special_image_techniques: Vec::new(),
                burnin: false,
            },
        }
    }
}

impl Config {
    /// Load a config by overlaying `path`'s TOML content over
    /// [`Config::default`]; a key the file omits keeps its default.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_documented_literal_values() {
        let config = Config::default();
        assert_eq!(config.circular_segments, 20);
        assert_eq!(config.router.heuristic_weight, 10.0);
        assert_eq!(config.router.turn_weight, 2.0);
        assert_eq!(config.default_position.distance_up, Some(1.0));
        assert_eq!(config.default_exposure.exposure_time, Some(300.0));
    }

    #[test]
    fn a_partial_toml_file_overlays_only_the_given_keys() {
        let toml = "circular_segments = 32\n\n[router]\nturn_weight = 5.0\n";
        let parsed: Config = toml::from_str(toml).unwrap();
        assert_eq!(parsed.circular_segments, 32);
        assert_eq!(parsed.router.turn_weight, 5.0);
        assert_eq!(parsed.router.heuristic_weight, 10.0);
        assert_eq!(parsed.default_exposure.wavelength, Some(365));
    }
}
