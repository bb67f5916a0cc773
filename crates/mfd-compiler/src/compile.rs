//! The print-compiler entry point: slice, image, embed, group, combine,
//! deduplicate, minimize, and emit — §4.7 in full.

use std::collections::BTreeMap;
use std::path::Path;

use rayon::prelude::*;
use serde_json::{json, Map, Value};

use mfd_component::Component;
use mfd_slicer::{slice_device, GrayImage};

use crate::dict::{image_settings_dict, position_settings_dict};
use crate::embed::{apply_regional_settings, embed_into_canvas, fill_defaults, resolve_device_plan};
use crate::error::{CompilerError, Result};
use crate::image_store::{FlatImageStore, UniqueImageStore};
use crate::layers::{combine_exposures, group_by_settings, iterate_by_layer, EmbeddedSlice};
use crate::light_engine::PrinterProfile;
use crate::named_settings::NamedSettingsTable;
use crate::print_program::{Design, Header, ImageSettingsRef, Layer, PositionSettingsRef, PrintProgram, SCHEMA_VERSION};

const IGNORE_IMAGE_KEYS: &[&str] =
    &["Image file", "Layer exposure time (ms)", "Wait before exposure (ms)", "Wait after exposure (ms)"];

enum ImageStore {
    Unique(UniqueImageStore),
    Flat(FlatImageStore),
}

impl ImageStore {
    fn add_image(&mut self, png_bytes: &[u8], suggested_name: &str) -> Result<std::path::PathBuf> {
        match self {
            ImageStore::Unique(s) => s.add_image(png_bytes, suggested_name),
            ImageStore::Flat(s) => s.add_image(png_bytes, suggested_name),
        }
    }
}

/// Compile a device's component tree into a print program, writing its
/// image directory alongside `output_dir/print_program.json`. Returns the
/// assembled program (already written to disk) and the count of distinct
/// images stored.
pub fn compile_print_job(
    root: &Component,
    profile: &PrinterProfile,
    design: Design,
    output_dir: impl AsRef<Path>,
    minimize: bool,
) -> Result<PrintProgram> {
    let output_dir = output_dir.as_ref();
    let device_name = root.name().unwrap_or("device").to_string();
    let mut design = design;
    if design.date.is_empty() {
        design.date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    }

    let sliced = slice_device(root)?;
    let defaults = fill_defaults(root);
    let root_defaults = defaults.get("").cloned().unwrap_or_default();
    let plan = resolve_device_plan(root, profile, &root_defaults.exposure)?;

    let merged = embed_into_canvas(&sliced, root);
    if merged.is_empty() {
        return Err(CompilerError::NoSlices(device_name));
    }

    let z: Vec<f64> = merged.iter().map(|(z, _)| *z).collect();
    let mut images: Vec<GrayImage> = merged.iter().map(|(_, img)| img.clone()).collect();
    let regional = apply_regional_settings(root, &sliced, &z, &mut images);

    let mut slices: Vec<EmbeddedSlice> = Vec::with_capacity(images.len() + regional.extra_layers.len());
    for (i, image) in images.into_iter().enumerate() {
        let exposure = root_defaults.exposure.clone();
        let position = regional.position_overrides[i].clone().unwrap_or_else(|| root_defaults.position.clone());
        slices.push(EmbeddedSlice {
            layer_position_um: z[i],
            image,
            exposure,
            light_engine: plan.light_engine.clone(),
            x_offset_um: plan.x_offset_um,
            y_offset_um: plan.y_offset_um,
            position,
        });
    }
    for (i, image, exposure) in regional.extra_layers {
        let mut exposure = exposure;
        exposure.fill_with_defaults(&root_defaults.exposure);
        let position = regional.position_overrides.get(i).cloned().flatten().unwrap_or_else(|| root_defaults.position.clone());
        slices.push(EmbeddedSlice {
            layer_position_um: z[i],
            image,
            exposure,
            light_engine: plan.light_engine.clone(),
            x_offset_um: plan.x_offset_um,
            y_offset_um: plan.y_offset_um,
            position,
        });
    }

    let image_directory_name = if minimize { "minimized_slices" } else { "slices" };
    let mut store = if minimize {
        ImageStore::Unique(UniqueImageStore::open(output_dir.join(image_directory_name))?)
    } else {
        ImageStore::Flat(FlatImageStore::open(output_dir.join(image_directory_name))?)
    };

    let position_defaults_dict = position_settings_dict(&root_defaults.position, 0.0);
    let image_defaults_dict = image_settings_dict(&root_defaults.exposure, "", &plan.light_engine, plan.x_offset_um, plan.y_offset_um);
    let mut position_table = NamedSettingsTable::with_defaults(position_defaults_dict.clone());
    let mut image_table = NamedSettingsTable::with_defaults(image_defaults_dict.clone());

    let layer_buckets = iterate_by_layer(slices);

    // Grouping, exposure combination, and PNG encoding are pure per-layer
    // work, independent across layers: the hot path, parallelized with
    // rayon. Named-settings resolution and image-store writes depend on
    // processing order, so they stay on the sequential pass below.
    let prepared: Vec<Result<(Map<String, Value>, Vec<(Vec<u8>, Map<String, Value>)>)>> = layer_buckets
        .par_iter()
        .enumerate()
        .map(|(index, (z_value, bucket))| {
            let layer_thickness_um = if index == 0 { *z_value } else { z_value - layer_buckets[index - 1].0 };
            let position_dict = position_settings_dict(&bucket[0].position, layer_thickness_um);

            let groups = group_by_settings(bucket.clone());
            let mut tiers = Vec::new();
            for group in &groups {
                for tier in combine_exposures(group) {
                    let png = mfd_imaging::encode_png(&tier.image)?;
                    let mut exposure = group[0].exposure.clone();
                    exposure.exposure_time = Some(tier.exposure_time_ms);
                    let dict = image_settings_dict(&exposure, "", &group[0].light_engine, group[0].x_offset_um, group[0].y_offset_um);
                    tiers.push((png, dict));
                }
            }
            Ok((position_dict, tiers))
        })
        .collect();

    let mut layers: Vec<Layer> = Vec::with_capacity(prepared.len());
    let mut fresh_counter = 0u32;

    for (index, prepared_layer) in prepared.into_iter().enumerate() {
        let (position_dict, tiers) = prepared_layer?;
        let position_name = position_table.resolve(&position_dict, &[], "Using named position settings", || {
            fresh_counter += 1;
            format!("position_{fresh_counter}")
        });

        let mut image_settings_list = Vec::with_capacity(tiers.len());
        for (tier_index, (png, mut dict)) in tiers.into_iter().enumerate() {
            let file_stem = format!("layer_{index}_{tier_index}.png");
            let image_file = store.add_image(&png, &file_stem)?.to_string_lossy().into_owned();
            dict.insert("Image file".to_string(), json!(image_file));
            let name = image_table.resolve(&dict, IGNORE_IMAGE_KEYS, "Using named image settings", || {
                fresh_counter += 1;
                format!("image_{fresh_counter}")
            });
            image_settings_list.push(ImageSettingsRef { image_file, using_named_image_settings: name });
        }

        layers.push(Layer {
            duplications: 1,
            position_settings: position_name.map(|n| PositionSettingsRef { using_named_position_settings: Some(n) }),
            image_settings_list,
        });
    }

    let layers = minimize_runs(layers);

    let default_layer_settings = json!({
        "Position settings": position_defaults_dict,
        "Image settings": image_defaults_dict,
    });

    let program = PrintProgram {
        header: Header { schema_version: SCHEMA_VERSION.to_string(), image_directory: image_directory_name.to_string() },
        design,
        variables: BTreeMap::new(),
        default_layer_settings,
        special_print_techniques: None,
        named_position_settings: position_table.into_deltas(),
        named_image_settings: image_table.into_deltas(),
        named_layer_groups: BTreeMap::new(),
        layers,
    };

    std::fs::write(output_dir.join("print_program.json"), serde_json::to_string_pretty(&program)?)?;
    Ok(program)
}

fn minimize_runs(layers: Vec<Layer>) -> Vec<Layer> {
    let mut out: Vec<Layer> = Vec::with_capacity(layers.len());
    for layer in layers {
        match out.last_mut() {
            Some(prev) if prev.position_settings == layer.position_settings && prev.image_settings_list == layer.image_settings_list => {
                prev.duplications += 1;
            }
            _ => out.push(layer),
        }
    }
    out
}

/// Pack an output directory into a zip archive at `zip_path`.
pub fn zip_output_directory(output_dir: impl AsRef<Path>, zip_path: impl AsRef<Path>) -> Result<()> {
    let output_dir = output_dir.as_ref();
    let file = std::fs::File::create(zip_path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for entry in walk_files(output_dir)? {
        let relative = entry.strip_prefix(output_dir).unwrap_or(&entry);
        writer.start_file(relative.to_string_lossy(), options)?;
        std::io::Write::write_all(&mut writer, &std::fs::read(&entry)?)?;
    }
    writer.finish()?;
    Ok(())
}

fn walk_files(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            out.extend(walk_files(&path)?);
        } else {
            out.push(path);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfd_geom::Shape;
    use mfd_units::UnitScale;

    use crate::light_engine::LightEngine;

    fn tempdir(label: &str) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let mut p = std::env::temp_dir();
        p.push(format!("mfd-compiler-{label}-{}", COUNTER.fetch_add(1, Ordering::Relaxed)));
        p
    }

    #[test]
    fn compiles_a_single_bulk_device_into_a_print_program() {
        let mut device = Component::new((4, 4, 3)).with_units(UnitScale::new(1.0, 1.0));
        device.add_bulk("body", Shape::cube(4.0, 4.0, 3.0, false, true), None).unwrap();
        let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 1.0, (4, 4), vec![365]));

        let out_dir = tempdir("job");
        std::fs::create_dir_all(&out_dir).unwrap();
        let design = Design { slicer: "OpenMFD".to_string(), ..Default::default() };
        let program = compile_print_job(&device, &profile, design, &out_dir, true).unwrap();

        // All 3 layers are identical solid cube slices with the same
        // thickness, so layer-run minimization collapses them into one
        // entry with 3 duplications.
        assert_eq!(program.layers.len(), 1);
        assert_eq!(program.layers[0].duplications, 3);
        assert!(out_dir.join("print_program.json").exists());
        assert!(out_dir.join("minimized_slices").is_dir());
        std::fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn a_device_with_no_matching_light_engine_errors() {
        let mut device = Component::new((4, 4, 1)).with_units(UnitScale::new(2.0, 1.0));
        device.add_bulk("body", Shape::cube(8.0, 8.0, 1.0, false, true), None).unwrap();
        let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 1.0, (4, 4), vec![365]));

        let out_dir = tempdir("mismatch");
        std::fs::create_dir_all(&out_dir).unwrap();
        let err = compile_print_job(&device, &profile, Design::default(), &out_dir, true).unwrap_err();
        assert!(matches!(err, CompilerError::NoMatchingLightEngine { .. }));
        std::fs::remove_dir_all(&out_dir).ok();
    }

    fn layer_with_tag(tag: u32) -> Layer {
        Layer {
            duplications: 1,
            position_settings: None,
            image_settings_list: vec![ImageSettingsRef { image_file: format!("layer_{tag}.png"), using_named_image_settings: None }],
        }
    }

    proptest::proptest! {
        /// Collapsing consecutive identical layers never changes the total
        /// physical layer count, regardless of which runs happen to repeat.
        #[test]
        fn minimize_runs_preserves_total_layer_count(tags in proptest::collection::vec(0u32..4, 1..40)) {
            let layers: Vec<Layer> = tags.iter().map(|&t| layer_with_tag(t)).collect();
            let original_count = layers.len() as u32;
            let minimized = minimize_runs(layers);
            let total: u32 = minimized.iter().map(|l| l.duplications).sum();
            prop_assert_eq!(total, original_count);

            // No two consecutive entries should have been left uncollapsed.
            for pair in minimized.windows(2) {
                prop_assert!(
                    pair[0].position_settings != pair[1].position_settings
                        || pair[0].image_settings_list != pair[1].image_settings_list
                );
            }
        }
    }
}
