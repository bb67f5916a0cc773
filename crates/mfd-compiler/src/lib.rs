//! The print compiler: turns a sliced device tree into the layer-ordered,
//! deduplicated print program a DLP printer consumes, plus its image
//! directory and optional zip archive — §4.7.

#![warn(missing_docs)]

mod compile;
mod dict;
mod embed;
mod error;
mod image_store;
mod layers;
mod light_engine;
mod named_settings;
mod print_program;

pub use compile::{compile_print_job, zip_output_directory};
pub use dict::{image_settings_dict, position_settings_dict};
pub use embed::{apply_regional_settings, embed_into_canvas, fill_defaults, resolve_device_plan, DeviceImagingPlan, FilledDefaults, RegionalOutputs};
pub use error::{CompilerError, Result};
pub use image_store::{FlatImageStore, UniqueImageStore};
pub use layers::{combine_exposures, group_by_settings, iterate_by_layer, CombinedExposure, EmbeddedSlice};
pub use light_engine::{LightEngine, PrinterProfile};
pub use named_settings::{match_or_find_closest, NamedSettingsTable};
pub use print_program::{Design, Header, ImageSettingsRef, Layer, PositionSettingsRef, PrintProgram, VacuumSettings, SCHEMA_VERSION};
