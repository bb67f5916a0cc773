//! Root components: the device being printed, plus a few bundled printer
//! pixel/layer profiles.

use mfd_units::UnitScale;

use crate::component::Component;

/// A device: the root component of a print job, carrying the printer's
/// pixel count and pixel/layer size.
#[derive(Clone)]
pub struct Device {
    root: Component,
}

impl Device {
    /// Build a device sized to a printer's pixel count.
    pub fn new(name: &str, layers: u32, layer_size: f64, px_count: (i64, i64), px_size: f64) -> Self {
        let root = Component::new((px_count.0, px_count.1, layers as i64))
            .with_units(UnitScale::new(px_size, layer_size));
        let mut device = Self { root };
        device.root_mut().set_name(name);
        device
    }

    /// A device profiled for the Visitech light engine's LRS10 lens:
    /// 2560x1600 px at 0.0076mm/px.
    pub fn visitech_lrs10(name: &str, layers: u32, layer_size: f64) -> Self {
        Self::new(name, layers, layer_size, (2560, 1600), 0.0076)
    }

    /// A device profiled for the Visitech light engine's LRS20 lens:
    /// 2560x1600 px at 0.0152mm/px.
    pub fn visitech_lrs20(name: &str, layers: u32, layer_size: f64) -> Self {
        Self::new(name, layers, layer_size, (2560, 1600), 0.0152)
    }

    /// A device profiled for a Wintech light engine: 1920x1080 px at
    /// 0.00075mm/px.
    pub fn wintech(name: &str, layers: u32, layer_size: f64) -> Self {
        Self::new(name, layers, layer_size, (1920, 1080), 0.00075)
    }

    /// The device's root component.
    pub fn root(&self) -> &Component {
        &self.root
    }

    /// The device's root component, mutably.
    pub fn root_mut(&mut self) -> &mut Component {
        &mut self.root
    }

    /// Consume the device, returning its root component.
    pub fn into_root(self) -> Component {
        self.root
    }
}

/// A device assembled from several identical printer tiles, overlapped by
/// `overlap_px` along their shared edge, to cover a build area larger than
/// any single light engine's field.
#[derive(Clone)]
pub struct StitchedDevice {
    device: Device,
    tiles_x: u32,
    tiles_y: u32,
    base_px_count: (i64, i64),
    overlap_px: i64,
}

impl StitchedDevice {
    /// Build a stitched device. `overlap_px` must be smaller than the base
    /// tile's extent on both axes.
    pub fn new(
        name: &str,
        layers: u32,
        layer_size: f64,
        tiles_x: u32,
        tiles_y: u32,
        base_px_count: (i64, i64),
        overlap_px: i64,
        px_size: f64,
    ) -> Result<Self, String> {
        if tiles_x < 1 || tiles_y < 1 {
            return Err("tiles_x and tiles_y must be >= 1".to_string());
        }
        if overlap_px < 0 {
            return Err("overlap_px must be >= 0".to_string());
        }
        if overlap_px >= base_px_count.0 || overlap_px >= base_px_count.1 {
            return Err("overlap_px must be smaller than base_px_count in both dimensions".to_string());
        }
        let stitched_px_count = (
            base_px_count.0 * tiles_x as i64 - overlap_px * (tiles_x as i64 - 1),
            base_px_count.1 * tiles_y as i64 - overlap_px * (tiles_y as i64 - 1),
        );
        let device = Device::new(name, layers, layer_size, stitched_px_count, px_size);
        Ok(Self { device, tiles_x, tiles_y, base_px_count, overlap_px })
    }

    /// The stitched device's tile grid dimensions.
    pub fn tile_grid(&self) -> (u32, u32) {
        (self.tiles_x, self.tiles_y)
    }

    /// A single tile's unstitched pixel extent.
    pub fn base_px_count(&self) -> (i64, i64) {
        self.base_px_count
    }

    /// Overlap between adjacent tiles, in pixels.
    pub fn overlap_px(&self) -> i64 {
        self.overlap_px
    }

    /// The underlying stitched device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The underlying stitched device, mutably.
    pub fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }
}

/// A component whose Z lattice is divided into non-uniform layer groups
/// (e.g. thin layers near a membrane, thick layers in bulk channel),
/// modeled internally at the greatest common layer size across all groups.
#[derive(Clone)]
pub struct VariableLayerThicknessComponent {
    inner: Component,
    layer_groups: Vec<(u32, f64)>,
}

impl VariableLayerThicknessComponent {
    /// Build a component whose total layer count must equal `size.2`.
    /// `layer_groups` is a list of `(repeat_count, layer_size_mm)` pairs
    /// read top-down from the first printed layer.
    pub fn new(
        size: (i64, i64, i64),
        px_size: f64,
        layer_groups: Vec<(u32, f64)>,
    ) -> Result<Self, String> {
        let layer_count: i64 = layer_groups.iter().map(|(count, _)| *count as i64).sum();
        if layer_count != size.2 {
            return Err(format!(
                "layers in layer_groups {layer_count} does not match component height {}",
                size.2
            ));
        }
        let modeling_layer_size = float_gcf(&layer_groups.iter().map(|(_, s)| *s).collect::<Vec<_>>());
        let mut inner = Component::new(size).with_units(UnitScale::new(px_size, modeling_layer_size));
        inner.set_layer_groups(layer_groups.clone());
        Ok(Self { inner, layer_groups })
    }

    /// Expand the layer groups into one entry per modeled layer.
    pub fn expanded_layer_sizes(&self) -> Vec<f64> {
        let mut sizes = Vec::new();
        for &(count, size) in &self.layer_groups {
            sizes.extend(std::iter::repeat(size).take(count as usize));
        }
        sizes
    }

    /// Total physical height in millimetres, from the true (non-GCD)
    /// layer sizes rather than the internal modeling resolution.
    pub fn device_height_mm(&self) -> f64 {
        self.layer_groups.iter().map(|(count, size)| *count as f64 * size).sum()
    }

    /// The underlying component.
    pub fn component(&self) -> &Component {
        &self.inner
    }

    /// The underlying component, mutably.
    pub fn component_mut(&mut self) -> &mut Component {
        &mut self.inner
    }
}

/// Greatest common factor across a set of decimal layer sizes, found by
/// scaling to a common integer denominator (matches the reference
/// fractional-GCD approach rather than a float epsilon search).
fn float_gcf(values: &[f64]) -> f64 {
    const DENOMINATOR: i64 = 1_000_000;
    let scaled: Vec<i64> = values.iter().map(|v| (v * DENOMINATOR as f64).round() as i64).collect();
    let gcd = scaled.into_iter().fold(0i64, gcd_i64);
    gcd as f64 / DENOMINATOR as f64
}

fn gcd_i64(a: i64, b: i64) -> i64 {
    if b == 0 {
        a.abs()
    } else {
        gcd_i64(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitech_lrs10_has_expected_profile() {
        let device = Device::visitech_lrs10("chip", 50, 0.01);
        assert_eq!(device.root().size(), (2560, 1600, 50));
    }

    #[test]
    fn stitched_device_sums_tile_extents_minus_overlap() {
        let stitched =
            StitchedDevice::new("tiled", 10, 0.01, 2, 1, (2560, 1600), 100, 0.0076).unwrap();
        assert_eq!(stitched.device().root().size(), (2560 * 2 - 100, 1600, 10));
    }

    #[test]
    fn stitched_device_rejects_overlap_larger_than_tile() {
        let err = StitchedDevice::new("tiled", 10, 0.01, 2, 1, (2560, 1600), 4000, 0.0076);
        assert!(err.is_err());
    }

    #[test]
    fn variable_layer_thickness_rejects_mismatched_layer_count() {
        let err = VariableLayerThicknessComponent::new((10, 10, 5), 0.0076, vec![(2, 0.01)]);
        assert!(err.is_err());
    }

    #[test]
    fn variable_layer_thickness_expands_groups() {
        let v = VariableLayerThicknessComponent::new((10, 10, 3), 0.0076, vec![(2, 0.02), (1, 0.01)]).unwrap();
        assert_eq!(v.expanded_layer_sizes(), vec![0.02, 0.02, 0.01]);
    }
}
