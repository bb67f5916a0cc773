//! The depth-first per-component slicer: CSG composite construction, void
//! and bounding-box cutouts, per-layer rasterization, and regional masks.

use std::collections::HashMap;

use mfd_component::Component;
use mfd_geom::Shape;
use rayon::prelude::*;

use crate::error::{Result, SlicerError};
use crate::polygon::Polygon2;
use crate::raster::{flip_vertical, rasterize};
use crate::rle::PackedImage;

const BBOX_CUTOUT_SHRINK: f64 = 0.05;

/// One sliced layer: its raster (bit-packed RLE) and its printed Z stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRecord {
    /// Cumulative Z position after this layer, in micrometres, rounded to
    /// 0.1 µm.
    pub layer_position_um: f64,
    /// The layer's raster.
    pub image: PackedImage,
}

/// Where a sliced component sits relative to its parent, in the
/// component's own pixel/layer lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPosition {
    /// The parent's dotted path (`""` for the device root).
    pub parent: String,
    /// Offset from the parent's origin, in this component's own units.
    pub offset: (i64, i64, i64),
}

/// Everything sliced for one component: its own per-layer rasters plus any
/// regional masks, keyed by regional-settings name.
#[derive(Debug, Clone, Default)]
pub struct ComponentSlices {
    /// Where this component is placed (one entry per parenting, though the
    /// tree-ownership model here means there is always exactly one).
    pub positions: Vec<ChildPosition>,
    /// This component's own per-layer rasters.
    pub slices: Vec<SliceRecord>,
    /// Regional-settings mask rasters, keyed by regional-settings name.
    pub masks: HashMap<String, Vec<SliceRecord>>,
}

/// Every component's slices for one device, keyed by dotted path from the
/// device root (`""` is the root itself).
#[derive(Debug, Clone)]
pub struct SlicedDevice {
    /// The device root's name.
    pub name: String,
    /// Per-component slices, keyed by dotted path.
    pub components: HashMap<String, ComponentSlices>,
}

/// Slice a device's entire component tree.
pub fn slice_device(root: &Component) -> Result<SlicedDevice> {
    let mut components = HashMap::new();
    slice_component(root, "", None, &mut components)?;
    Ok(SlicedDevice { name: root.name().unwrap_or_default().to_string(), components })
}

/// One Z sample: the mm height to slice the composite at, and the
/// cumulative mm thickness stamp to report for it.
struct LayerSample {
    z_mm: f64,
    cumulative_mm: f64,
}

fn layer_samples(component: &Component) -> Vec<LayerSample> {
    let (_, _, base_z) = component.position();
    let units = component.units();
    let base_z_mm = units.layer_to_mm(base_z as f64);

    if let Some(groups) = component.layer_groups() {
        let sizes: Vec<f64> = groups.iter().flat_map(|&(count, size)| std::iter::repeat(size).take(count as usize)).collect();
        let mut samples = Vec::with_capacity(sizes.len());
        let mut mid = sizes.first().copied().unwrap_or(0.0) / 2.0;
        let mut cumulative = 0.0;
        for (i, &thickness) in sizes.iter().enumerate() {
            cumulative += thickness;
            samples.push(LayerSample { z_mm: base_z_mm + mid, cumulative_mm: cumulative });
            if i + 1 < sizes.len() {
                mid += (thickness + sizes[i + 1]) / 2.0;
            }
        }
        return samples;
    }

    let (_, _, layer_count) = component.size();
    let layer_size_mm = units.layer_size;
    (0..layer_count)
        .map(|i| LayerSample {
            z_mm: base_z_mm + (i as f64 + 0.5) * layer_size_mm,
            cumulative_mm: (i as f64 + 1.0) * layer_size_mm,
        })
        .collect()
}

fn round_um(mm: f64) -> f64 {
    ((mm * 1000.0) * 10.0).round() / 10.0
}

/// Slice a single composite at every layer sample, translating into local
/// pixel coordinates and rasterizing with the orientation-aware fill rule.
fn slice_composite(component: &Component, composite: &Shape) -> Vec<SliceRecord> {
    let units = component.units();
    let (x0_mm, y0_mm, _, _, _, _) = component.bounding_box_mm();
    let (width_px, height_px, _) = component.size();
    let (width, height) = (width_px.max(0) as u32, height_px.max(0) as u32);

    // The CSG slice itself runs single-threaded against the composite's
    // backing solid; only the per-layer rasterize-and-pack step, which
    // touches nothing but owned polygon data, is fanned out across threads.
    let per_layer: Vec<(f64, Vec<Polygon2>)> = layer_samples(component)
        .into_iter()
        .map(|sample| {
            let polygons: Vec<Polygon2> = composite
                .slice(sample.z_mm)
                .into_iter()
                .map(|poly| {
                    Polygon2::new(
                        poly.points
                            .iter()
                            .map(|&(x, y)| ((x - x0_mm) / units.px_size, (y - y0_mm) / units.px_size))
                            .collect(),
                    )
                })
                .collect();
            (sample.cumulative_mm, polygons)
        })
        .collect();

    per_layer
        .into_par_iter()
        .map(|(cumulative_mm, polygons)| {
            let image = flip_vertical(&rasterize(&polygons, width, height));
            SliceRecord { layer_position_um: round_um(cumulative_mm), image: PackedImage::encode(&image) }
        })
        .collect()
}

fn bounding_box_cutout(child: &Component) -> Shape {
    let (x0, y0, z0, x1, y1, z1) = child.bounding_box_mm();
    let units = child.units();
    let (shrink_x, shrink_y, shrink_z) =
        (units.px_to_mm(BBOX_CUTOUT_SHRINK), units.px_to_mm(BBOX_CUTOUT_SHRINK), units.layer_to_mm(BBOX_CUTOUT_SHRINK));
    Shape::cube(
        (x1 - x0 - 2.0 * shrink_x).max(0.0),
        (y1 - y0 - 2.0 * shrink_y).max(0.0),
        (z1 - z0 - 2.0 * shrink_z).max(0.0),
        false,
        true,
    )
    .translate(x0 + shrink_x, y0 + shrink_y, z0 + shrink_z)
}

fn slice_component(
    component: &Component,
    path: &str,
    parent: Option<&str>,
    out: &mut HashMap<String, ComponentSlices>,
) -> Result<()> {
    let bulk_shapes: Vec<Shape> = component.bulk_shapes().values().cloned().collect();
    if bulk_shapes.is_empty() {
        return Err(SlicerError::NoBulkShape(path.to_string()));
    }
    let mut composite = Shape::batch_union(&bulk_shapes).map_err(|_| SlicerError::NoBulkShape(path.to_string()))?;

    let mut cutouts: Vec<Shape> = Vec::new();
    for (name, child) in component.subcomponents() {
        let child_path = if path.is_empty() { name.clone() } else { format!("{path}.{name}") };
        slice_component(child, &child_path, Some(path), out)?;
        if child.wants_bounding_box_subtracted() {
            cutouts.push(bounding_box_cutout(child));
        }
    }

    let mut local_shapes: Vec<Shape> = component.shapes().values().cloned().collect();
    local_shapes.extend(cutouts);
    if !local_shapes.is_empty() {
        let void_union = Shape::batch_union(&local_shapes).expect("non-empty by construction");
        composite = composite.subtract(&void_union);
    }

    let slices = slice_composite(component, &composite);

    let mut masks = HashMap::new();
    for (name, (mask_shape, _settings)) in component.regional_settings() {
        masks.insert(name.clone(), slice_composite(component, mask_shape));
    }

    let entry = out.entry(path.to_string()).or_default();
    entry.slices = slices;
    entry.masks = masks;
    if let Some(parent) = parent {
        entry.positions.push(ChildPosition { parent: parent.to_string(), offset: component.position() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfd_units::UnitScale;

    fn leaf_with_bulk(size: (i64, i64, i64)) -> Component {
        let mut c = Component::new(size).with_units(UnitScale::new(1.0, 1.0));
        let (sx, sy, sz) = size;
        c.add_bulk("body", Shape::cube(sx as f64, sy as f64, sz as f64, false, true), None).unwrap();
        c
    }

    #[test]
    fn slicing_a_leaf_component_produces_one_slice_per_layer() {
        let device = leaf_with_bulk((4, 4, 3));
        let sliced = slice_device(&device).unwrap();
        let root = sliced.components.get("").unwrap();
        assert_eq!(root.slices.len(), 3);
        for slice in &root.slices {
            assert!(!slice.image.decode().is_empty());
        }
    }

    #[test]
    fn a_component_with_no_bulk_shapes_fails_to_slice() {
        let device = Component::new((4, 4, 3)).with_units(UnitScale::new(1.0, 1.0));
        let err = slice_device(&device).unwrap_err();
        assert!(matches!(err, SlicerError::NoBulkShape(_)));
    }

    #[test]
    fn a_subcomponent_is_recorded_under_its_parent_path() {
        let mut parent = leaf_with_bulk((8, 8, 3));
        let child = leaf_with_bulk((2, 2, 2));
        parent.add_subcomponent("inlet", child).unwrap();
        let sliced = slice_device(&parent).unwrap();
        assert!(sliced.components.contains_key("inlet"));
        let inlet = sliced.components.get("inlet").unwrap();
        assert_eq!(inlet.positions.len(), 1);
        assert_eq!(inlet.positions[0].parent, "");
    }

    #[test]
    fn bounding_box_subtraction_removes_a_layer_of_material() {
        let mut parent = leaf_with_bulk((8, 8, 4));
        let mut child = leaf_with_bulk((8, 8, 2)).subtract_bounding_box(true);
        child.translate(0, 0, 0);
        child.run_translate(parent.units());
        parent.add_subcomponent("plug", child).unwrap();
        let sliced = slice_device(&parent).unwrap();
        let root = sliced.components.get("").unwrap();
        let first_layer = root.slices[0].image.decode();
        assert!(first_layer.is_empty());
        let last_layer = root.slices[3].image.decode();
        assert!(!last_layer.is_empty());
    }
}
