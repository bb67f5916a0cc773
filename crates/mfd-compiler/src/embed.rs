//! Default-settings fill and sub-component embedding: §4.7 steps 1-2.
//!
//! Nested components embed into their owning device's canvas by direct
//! pixel-offset paste when they share the device's unit scale; a
//! different-grid child (its own `px_size`/`layer_size`) is left out of the
//! merged canvas, since re-rastering across grids needs the full stitched
//! compositing path this module doesn't implement. `fill_defaults` and the
//! membrane/secondary-dose/exposure-region pass below only look at the
//! device root's own regional settings, not a subcomponent's.

use std::collections::HashMap;

use mfd_component::{Component, RegionalSettings};
use mfd_settings::{ExposureSettings, PositionSettings};
use mfd_slicer::{GrayImage, SlicedDevice};

use crate::error::{CompilerError, Result};
use crate::light_engine::PrinterProfile;

/// A component's fully resolved defaults, after inheriting from every
/// ancestor.
#[derive(Debug, Clone, Default)]
pub struct FilledDefaults {
    /// Resolved default exposure settings.
    pub exposure: ExposureSettings,
    /// Resolved default position settings.
    pub position: PositionSettings,
}

/// Walk the tree filling every component's defaults from its ancestors'.
pub fn fill_defaults(root: &Component) -> HashMap<String, FilledDefaults> {
    let mut out = HashMap::new();
    fill_defaults_rec(root, "", &ExposureSettings::default(), &PositionSettings::default(), &mut out);
    out
}

fn fill_defaults_rec(
    component: &Component,
    path: &str,
    inherited_exposure: &ExposureSettings,
    inherited_position: &PositionSettings,
    out: &mut HashMap<String, FilledDefaults>,
) {
    let mut exposure = component.own_default_exposure_settings().cloned().unwrap_or_default();
    exposure.fill_with_defaults(inherited_exposure);
    let mut position = component.own_default_position_settings().cloned().unwrap_or_default();
    position.fill_with_defaults(inherited_position);

    for (name, child) in component.subcomponents() {
        let child_path = if path.is_empty() { name.clone() } else { format!("{path}.{name}") };
        fill_defaults_rec(child, &child_path, &exposure, &position, out);
    }

    out.insert(path.to_string(), FilledDefaults { exposure, position });
}

/// The device-level light engine and image offset resolved from its pixel
/// pitch, pixel count, and default wavelength.
pub struct DeviceImagingPlan {
    /// Resolved light engine name.
    pub light_engine: String,
    /// Image X offset, in micrometres.
    pub x_offset_um: f64,
    /// Image Y offset, in micrometres.
    pub y_offset_um: f64,
}

/// Resolve a device's light engine against a printer profile. A single,
/// centred device (no `StitchedDevice` tiling) always offsets by zero.
pub fn resolve_device_plan(root: &Component, profile: &PrinterProfile, resolved_exposure: &ExposureSettings) -> Result<DeviceImagingPlan> {
    let (width, height, _) = root.size();
    let wavelength = resolved_exposure.wavelength.unwrap_or(365);
    let px_size = root.units().px_size;
    let engine = profile
        .find(px_size, (width, height), wavelength)
        .ok_or(CompilerError::NoMatchingLightEngine { px_size, px_count: (width, height), wavelength })?;
    Ok(DeviceImagingPlan { light_engine: engine.name.clone(), x_offset_um: 0.0, y_offset_um: 0.0 })
}

fn accumulated_offset_px(root: &Component, path: &str) -> (i64, i64) {
    let mut mm = (0.0, 0.0);
    let mut current = path.to_string();
    while !current.is_empty() {
        let Some(comp) = root.find_component(&current) else { break };
        let (ox, oy, _) = comp.position();
        let units = comp.units();
        mm.0 += units.px_to_mm(ox as f64);
        mm.1 += units.px_to_mm(oy as f64);
        current = match current.rfind('.') {
            Some(i) => current[..i].to_string(),
            None => String::new(),
        };
    }
    let root_px_size = root.units().px_size;
    ((mm.0 / root_px_size).round() as i64, (mm.1 / root_px_size).round() as i64)
}

fn paste(canvas: &mut GrayImage, src: &GrayImage, dx: i64, dy: i64) {
    for y in 0..src.height as i64 {
        for x in 0..src.width as i64 {
            let v = src.get(x, y);
            if v != 0 {
                canvas.set(x + dx, y + dy, v);
            }
        }
    }
}

fn round_z(z: f64) -> i64 {
    (z * 10.0).round() as i64
}

/// Flatten the device root's own slices and every same-grid subcomponent's
/// slices into one canvas-sized raster per layer, ordered by ascending Z.
pub fn embed_into_canvas(sliced: &SlicedDevice, root: &Component) -> Vec<(f64, GrayImage)> {
    let root_slices = sliced.components.get("").map(|c| &c.slices[..]).unwrap_or(&[]);
    let mut order: Vec<i64> = Vec::with_capacity(root_slices.len());
    let mut by_z: HashMap<i64, (f64, GrayImage)> = HashMap::new();
    for record in root_slices {
        let key = round_z(record.layer_position_um);
        order.push(key);
        by_z.insert(key, (record.layer_position_um, record.image.decode()));
    }

    for (path, comp_slices) in &sliced.components {
        if path.is_empty() {
            continue;
        }
        let Some(comp) = root.find_component(path) else { continue };
        if comp.units() != root.units() {
            continue;
        }
        let (dx, dy) = accumulated_offset_px(root, path);
        for record in &comp_slices.slices {
            let key = round_z(record.layer_position_um);
            if let Some((_, canvas)) = by_z.get_mut(&key) {
                paste(canvas, &record.image.decode(), dx, dy);
            }
        }
    }

    order.into_iter().filter_map(|key| by_z.remove(&key)).collect()
}

/// Per-slice regional outputs produced by applying the device root's
/// membrane, secondary-dose, exposure-region, and position regional
/// settings against the merged canvas rasters.
pub struct RegionalOutputs {
    /// One entry per base slice: extra rasters to emit alongside it (with
    /// their own exposure settings), e.g. a membrane or edge/roof dose.
    pub extra_layers: Vec<(usize, GrayImage, ExposureSettings)>,
    /// Per-slice position-settings override, where a position region
    /// covers that slice.
    pub position_overrides: Vec<Option<PositionSettings>>,
}

/// Apply the device root's regional settings (membrane support, secondary
/// dose, exposure splitting, platform-motion overrides) against the merged
/// per-layer rasters, mutating `images` in place to remove whatever was
/// carved out.
pub fn apply_regional_settings(root: &Component, sliced: &SlicedDevice, z: &[f64], images: &mut [GrayImage]) -> RegionalOutputs {
    let empty = HashMap::new();
    let masks_by_name: &HashMap<String, Vec<mfd_slicer::SliceRecord>> = sliced.components.get("").map(|c| &c.masks).unwrap_or(&empty);

    let mut extra_layers = Vec::new();
    let mut position_overrides = vec![None; images.len()];
    let mut membrane_shapes: Vec<Option<GrayImage>> = vec![None; images.len()];

    for (name, (_, settings)) in root.regional_settings() {
        let Some(mask_records) = masks_by_name.get(name) else { continue };
        if mask_records.len() != images.len() {
            continue;
        }
        let masks: Vec<GrayImage> = mask_records.iter().map(|r| r.image.decode()).collect();

        match settings {
            RegionalSettings::Membrane(membrane_settings) => {
                let membranes = mfd_imaging::synthesize_membranes(z, images, &masks, membrane_settings);
                for m in membranes {
                    membrane_shapes[m.slice_index] = Some(m.dilated.clone());
                    extra_layers.push((m.slice_index, m.dilated, membrane_settings.exposure_settings.clone()));
                }
            }
            RegionalSettings::SecondaryDose(dose_settings) => {
                let doses = mfd_imaging::synthesize_secondary_dose(images, &membrane_shapes, dose_settings);
                for d in doses {
                    if let Some(edge) = d.edge {
                        extra_layers.push((d.slice_index, edge, dose_settings.edge_exposure_settings.clone()));
                    }
                    if let Some(roof) = d.roof {
                        extra_layers.push((d.slice_index, roof, dose_settings.roof_exposure_settings.clone()));
                    }
                }
            }
            RegionalSettings::Exposure(exposure_settings) => {
                let splits = mfd_imaging::split_exposure_region(images, &masks);
                for (i, split) in splits.into_iter().enumerate() {
                    images[i] = split.remaining;
                    if let Some(regional) = split.regional {
                        extra_layers.push((i, regional, exposure_settings.clone()));
                    }
                }
            }
            RegionalSettings::Position(position_settings) => {
                let attached = mfd_imaging::attach_position_settings(&masks, position_settings);
                for (i, maybe) in attached.into_iter().enumerate() {
                    if maybe.is_some() {
                        position_overrides[i] = maybe;
                    }
                }
            }
        }
    }

    RegionalOutputs { extra_layers, position_overrides }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfd_geom::Shape;
    use mfd_slicer::slice_device;
    use mfd_units::UnitScale;

    fn leaf_with_bulk(size: (i64, i64, i64)) -> Component {
        let mut c = Component::new(size).with_units(UnitScale::new(1.0, 1.0));
        let (sx, sy, sz) = size;
        c.add_bulk("body", Shape::cube(sx as f64, sy as f64, sz as f64, false, true), None).unwrap();
        c
    }

    #[test]
    fn fill_defaults_inherits_unset_fields_from_the_parent() {
        let mut parent = leaf_with_bulk((8, 8, 2));
        parent.add_default_exposure_settings(ExposureSettings { exposure_time: Some(500.0), ..Default::default() });
        let child = leaf_with_bulk((2, 2, 2));
        parent.add_subcomponent("inlet", child).unwrap();

        let resolved = fill_defaults(&parent);
        assert_eq!(resolved[""].exposure.exposure_time, Some(500.0));
        assert_eq!(resolved["inlet"].exposure.exposure_time, Some(500.0));
    }

    #[test]
    fn embed_into_canvas_pastes_a_same_grid_child_at_its_offset() {
        let mut parent = leaf_with_bulk((8, 8, 2));
        let mut child = leaf_with_bulk((2, 2, 2));
        child.translate(3, 3, 0);
        child.run_translate(parent.units());
        parent.add_subcomponent("inlet", child).unwrap();

        let sliced = slice_device(&parent).unwrap();
        let merged = embed_into_canvas(&sliced, &parent);
        assert_eq!(merged.len(), 2);
        let (_, canvas) = &merged[0];
        assert_eq!(canvas.get(4, 4), 255);
    }
}
