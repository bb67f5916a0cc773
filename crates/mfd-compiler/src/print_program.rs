//! The print program JSON document emitted by the compiler, matching the
//! external interface's top-level schema: header, design metadata, default
//! layer settings, named-settings dictionaries, and the layer list.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Schema version string stamped into every print program.
pub const SCHEMA_VERSION: &str = "5.0.0";

/// `"Header"`.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    /// Schema version string.
    #[serde(rename = "Schema version")]
    pub schema_version: String,
    /// `"minimized_slices"` or `"slices"`, matching the on-disk image
    /// directory name.
    #[serde(rename = "Image directory")]
    pub image_directory: String,
}

/// `"Design"`: free-form provenance metadata, not interpreted by the
/// printer.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Design {
    /// Operator name.
    #[serde(rename = "User")]
    pub user: String,
    /// One-line purpose of the print.
    #[serde(rename = "Purpose")]
    pub purpose: String,
    /// Longer free-form description.
    #[serde(rename = "Description")]
    pub description: String,
    /// Resin schema string, e.g. `Mo-01__Ab-02__PI-01`.
    #[serde(rename = "Resin")]
    pub resin: String,
    /// Target 3D printer name.
    #[serde(rename = "3D printer")]
    pub printer: String,
    /// Path to the design script/source that produced this job.
    #[serde(rename = "Design file")]
    pub design_file: String,
    /// Always `"OpenMFD"`.
    #[serde(rename = "Slicer")]
    pub slicer: String,
    /// Compile timestamp, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "Date")]
    pub date: String,
}

/// Vacuum-assisted print technique parameters.
#[derive(Debug, Clone, Serialize)]
pub struct VacuumSettings {
    /// Whether vacuum assist is enabled.
    #[serde(rename = "Enable vacuum")]
    pub enable: bool,
    /// Target vacuum level, in torr.
    #[serde(rename = "Target vacuum level (Torr)")]
    pub target_torr: f64,
    /// Wait time to reach vacuum, in seconds.
    #[serde(rename = "Vacuum wait time (sec)")]
    pub wait_sec: f64,
}

/// One entry in a layer's `"Image settings list"`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageSettingsRef {
    /// Image filename, relative to the image directory.
    #[serde(rename = "Image file")]
    pub image_file: String,
    /// Name of a `"Named image settings"` entry this layer's settings
    /// delta is expressed against, if not the defaults.
    #[serde(rename = "Using named image settings", skip_serializing_if = "Option::is_none")]
    pub using_named_image_settings: Option<String>,
}

/// A layer's resolved `"Position settings"` reference.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct PositionSettingsRef {
    /// Name of a `"Named position settings"` entry, if not the defaults.
    #[serde(rename = "Using named position settings", skip_serializing_if = "Option::is_none")]
    pub using_named_position_settings: Option<String>,
}

/// One entry of `"Layers"`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layer {
    /// How many consecutive identical layers this entry stands for.
    #[serde(rename = "Number of duplications")]
    pub duplications: u32,
    /// Position-settings reference, omitted when it's exactly the
    /// defaults.
    #[serde(rename = "Position settings", skip_serializing_if = "Option::is_none")]
    pub position_settings: Option<PositionSettingsRef>,
    /// The layer's image settings, one per exposure-combination output.
    #[serde(rename = "Image settings list")]
    pub image_settings_list: Vec<ImageSettingsRef>,
}

/// The full print program document.
#[derive(Debug, Clone, Serialize)]
pub struct PrintProgram {
    /// `"Header"`.
    #[serde(rename = "Header")]
    pub header: Header,
    /// `"Design"`.
    #[serde(rename = "Design")]
    pub design: Design,
    /// `"Variables"`, always empty in this implementation.
    #[serde(rename = "Variables")]
    pub variables: BTreeMap<String, Value>,
    /// `"Default layer settings"`, the fully expanded default position and
    /// image settings every named-settings delta is computed against.
    #[serde(rename = "Default layer settings")]
    pub default_layer_settings: Value,
    /// `"Special print techniques"`, omitted when none are configured.
    #[serde(rename = "Special print techniques", skip_serializing_if = "Option::is_none")]
    pub special_print_techniques: Option<Value>,
    /// `"Named position settings"`.
    #[serde(rename = "Named position settings")]
    pub named_position_settings: BTreeMap<String, Value>,
    /// `"Named image settings"`.
    #[serde(rename = "Named image settings")]
    pub named_image_settings: BTreeMap<String, Value>,
    /// `"Named layer groups"`, always empty in this implementation.
    #[serde(rename = "Named layer groups")]
    pub named_layer_groups: BTreeMap<String, Value>,
    /// `"Layers"`.
    #[serde(rename = "Layers")]
    pub layers: Vec<Layer>,
}
