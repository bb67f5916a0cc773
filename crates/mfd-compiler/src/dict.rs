//! Conversion of settings structs into the print program's documented
//! external key names, as flat `serde_json::Value` maps — the representation
//! the named-settings dedup and group-matching logic diffs against.

use serde_json::{json, Map, Value};

use mfd_settings::{ExposureSettings, PositionSettings, SpecialImageTechnique, SpecialLayerTechnique};

fn special_image_technique_json(t: &SpecialImageTechnique) -> Value {
    match t {
        SpecialImageTechnique::ZeroMicronLayer { enabled, count } => json!({
            "Zero-micron layer": { "Enable": enabled, "Count": count },
        }),
        SpecialImageTechnique::PrintOnFilm { enabled, distance_up_mm } => json!({
            "Print on film": { "Enable": enabled, "Distance up (mm)": distance_up_mm },
        }),
    }
}

fn special_layer_technique_json(t: &SpecialLayerTechnique) -> Value {
    match t {
        SpecialLayerTechnique::SqueezeOutResin { enabled, count, squeeze_force, squeeze_time } => json!({
            "Squeeze out resin": {
                "Enable squeeze": enabled,
                "Squeeze count": count,
                "Squeeze force (N)": squeeze_force,
                "Squeeze time (ms)": squeeze_time,
            },
        }),
    }
}

/// Image settings, as the full flattened dict the compiler diffs and
/// stores under `"Named image settings"`. `light_engine`/`x_offset_um`/
/// `y_offset_um`/`image_file` are computed by the embedding stage, not
/// carried on [`ExposureSettings`] itself.
pub fn image_settings_dict(
    settings: &ExposureSettings,
    image_file: &str,
    light_engine: &str,
    x_offset_um: f64,
    y_offset_um: f64,
) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("Image file".into(), json!(image_file));
    map.insert("Do light grayscale correction".into(), json!(settings.grayscale_correction.unwrap_or(false)));
    map.insert("Image x offset (um)".into(), json!(x_offset_um));
    map.insert("Image y offset (um)".into(), json!(y_offset_um));
    map.insert("Layer exposure time (ms)".into(), json!(settings.exposure_time.unwrap_or(300.0)));
    map.insert("Light engine".into(), json!(light_engine));
    map.insert("Light engine power setting".into(), json!(settings.power_setting.unwrap_or(100)));
    map.insert("Light engine wavelength (nm)".into(), json!(settings.wavelength.unwrap_or(365)));
    map.insert("Relative focus position (um)".into(), json!(settings.relative_focus_position.unwrap_or(0.0)));
    map.insert("Wait before exposure (ms)".into(), json!(settings.wait_before_exposure.unwrap_or(0.0)));
    map.insert("Wait after exposure (ms)".into(), json!(settings.wait_after_exposure.unwrap_or(0.0)));
    if !settings.special_image_techniques.is_empty() {
        let merged: Map<String, Value> = settings
            .special_image_techniques
            .iter()
            .map(special_image_technique_json)
            .flat_map(|v| v.as_object().cloned().unwrap_or_default())
            .collect();
        map.insert("Special image techniques".into(), Value::Object(merged));
    }
    map
}

/// Position settings, as the full flattened dict diffed and stored under
/// `"Named position settings"`. `layer_thickness_um` is computed per layer
/// by the layer-iteration stage.
pub fn position_settings_dict(settings: &PositionSettings, layer_thickness_um: f64) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("Layer thickness (um)".into(), json!(layer_thickness_um));
    map.insert("Distance up (mm)".into(), json!(settings.distance_up.unwrap_or(1.0)));
    map.insert("Initial wait (ms)".into(), json!(settings.initial_wait.unwrap_or(0.0)));
    map.insert("BP up speed (mm/sec)".into(), json!(settings.up_speed.unwrap_or(25.0)));
    map.insert("BP up acceleration (mm/sec^2)".into(), json!(settings.up_acceleration.unwrap_or(50.0)));
    map.insert("Up wait (ms)".into(), json!(settings.up_wait.unwrap_or(0.0)));
    map.insert("BP down speed (mm/sec)".into(), json!(settings.down_speed.unwrap_or(20.0)));
    map.insert("BP down acceleration (mm/sec^2)".into(), json!(settings.down_acceleration.unwrap_or(50.0)));
    map.insert("Final wait (ms)".into(), json!(settings.final_wait.unwrap_or(0.0)));
    if !settings.special_layer_techniques.is_empty() {
        let merged: Map<String, Value> = settings
            .special_layer_techniques
            .iter()
            .map(special_layer_technique_json)
            .flat_map(|v| v.as_object().cloned().unwrap_or_default())
            .collect();
        map.insert("Special layer techniques".into(), Value::Object(merged));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_settings_dict_applies_defaults_for_unset_fields() {
        let dict = image_settings_dict(&ExposureSettings::default(), "a.png", "LRS10", 0.0, 0.0);
        assert_eq!(dict["Layer exposure time (ms)"], json!(300.0));
        assert_eq!(dict["Light engine power setting"], json!(100));
    }

    #[test]
    fn position_settings_dict_carries_the_given_layer_thickness() {
        let dict = position_settings_dict(&PositionSettings::default(), 42.5);
        assert_eq!(dict["Layer thickness (um)"], json!(42.5));
    }
}
