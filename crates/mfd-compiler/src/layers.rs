//! Layer iteration, common-settings grouping, and exposure-sum combination:
//! §4.7 steps 3-5.

use mfd_settings::{ExposureSettings, PositionSettings};
use mfd_slicer::GrayImage;

/// One slice after embedding into its device's raster, ready for layer
/// iteration and grouping.
#[derive(Debug, Clone)]
pub struct EmbeddedSlice {
    /// Cumulative Z position, in micrometres.
    pub layer_position_um: f64,
    /// The embedded raster.
    pub image: GrayImage,
    /// Resolved exposure settings for this slice.
    pub exposure: ExposureSettings,
    /// Resolved light engine name.
    pub light_engine: String,
    /// Resolved image X offset, in micrometres.
    pub x_offset_um: f64,
    /// Resolved image Y offset, in micrometres.
    pub y_offset_um: f64,
    /// Resolved position (build-platform motion) settings.
    pub position: PositionSettings,
}

/// Group slices that share every exposure setting except image file,
/// exposure time, and the two wait times, then sort groups by the
/// documented group sort key.
pub fn group_by_settings(slices: Vec<EmbeddedSlice>) -> Vec<Vec<EmbeddedSlice>> {
    let mut groups: Vec<Vec<EmbeddedSlice>> = Vec::new();
    for slice in slices {
        let matching = groups.iter_mut().find(|group| group_key(&group[0]) == group_key(&slice));
        match matching {
            Some(group) => group.push(slice),
            None => groups.push(vec![slice]),
        }
    }
    groups.sort_by(|a, b| sort_key(&a[0]).partial_cmp(&sort_key(&b[0])).unwrap());
    groups
}

type GroupKey = (Option<bool>, Option<u32>, Option<u32>, Option<i64>, String, String, i64, i64);

fn group_key(slice: &EmbeddedSlice) -> GroupKey {
    (
        slice.exposure.grayscale_correction,
        slice.exposure.power_setting,
        slice.exposure.wavelength,
        slice.exposure.relative_focus_position.map(|f| (f * 1000.0).round() as i64),
        serde_json::to_string(&slice.exposure.special_image_techniques).unwrap_or_default(),
        slice.light_engine.clone(),
        (slice.x_offset_um * 1000.0).round() as i64,
        (slice.y_offset_um * 1000.0).round() as i64,
    )
}

fn sort_key(slice: &EmbeddedSlice) -> (String, f64, f64, f64, u32, bool) {
    (
        slice.light_engine.clone(),
        slice.x_offset_um,
        slice.y_offset_um,
        slice.exposure.relative_focus_position.unwrap_or(0.0),
        slice.exposure.power_setting.unwrap_or(100),
        slice.exposure.grayscale_correction.unwrap_or(false),
    )
}

/// A combined output raster with the exposure time it should be assigned.
pub struct CombinedExposure {
    /// The raster: `255` where the cumulative exposure reaches this tier.
    pub image: GrayImage,
    /// Exposure time for this tier, in ms (the increment above the
    /// previous tier).
    pub exposure_time_ms: f64,
}

/// Combine a group's rasters by exposure-sum: every unique positive
/// cumulative-exposure value becomes its own output raster, exposed for the
/// increment above the previous tier.
pub fn combine_exposures(group: &[EmbeddedSlice]) -> Vec<CombinedExposure> {
    if group.len() == 1 {
        return vec![CombinedExposure {
            image: group[0].image.clone(),
            exposure_time_ms: group[0].exposure.exposure_time.unwrap_or(300.0),
        }];
    }

    let (w, h) = (group[0].image.width, group[0].image.height);
    let mut exposure_sum = vec![0.0f64; (w as usize) * (h as usize)];
    for slice in group {
        let exp = slice.exposure.exposure_time.unwrap_or(300.0);
        for (sum, &pixel) in exposure_sum.iter_mut().zip(&slice.image.data) {
            if pixel == 255 {
                *sum += exp;
            }
        }
    }

    let mut unique: Vec<f64> = exposure_sum.iter().copied().filter(|&v| v > 0.0).collect();
    unique.sort_by(|a, b| a.partial_cmp(b).unwrap());
    unique.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    let mut outputs = Vec::with_capacity(unique.len());
    let mut prev = 0.0;
    for &tier in &unique {
        let data: Vec<u8> = exposure_sum.iter().map(|&v| if v >= tier { 255 } else { 0 }).collect();
        outputs.push(CombinedExposure { image: GrayImage { width: w, height: h, data }, exposure_time_ms: tier - prev });
        prev = tier;
    }
    outputs
}

/// Bucket slices by `layer_position_um`, in ascending order; within each
/// bucket, sort by `(layer_position_um, exposure_time)` to match the
/// reference ordering.
pub fn iterate_by_layer(mut slices: Vec<EmbeddedSlice>) -> Vec<(f64, Vec<EmbeddedSlice>)> {
    slices.sort_by(|a, b| {
        a.layer_position_um
            .partial_cmp(&b.layer_position_um)
            .unwrap()
            .then(a.exposure.exposure_time.unwrap_or(300.0).partial_cmp(&b.exposure.exposure_time.unwrap_or(300.0)).unwrap())
    });

    let mut layers: Vec<(f64, Vec<EmbeddedSlice>)> = Vec::new();
    for slice in slices {
        match layers.last_mut() {
            Some((z, bucket)) if (*z - slice.layer_position_um).abs() < 1e-9 => bucket.push(slice),
            _ => layers.push((slice.layer_position_um, vec![slice])),
        }
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32) -> GrayImage {
        GrayImage { width: w, height: h, data: vec![255; (w * h) as usize] }
    }

    fn slice_at(z: f64, exposure_time: f64, img: GrayImage) -> EmbeddedSlice {
        EmbeddedSlice {
            layer_position_um: z,
            image: img,
            exposure: ExposureSettings { exposure_time: Some(exposure_time), ..Default::default() },
            light_engine: "LRS10".to_string(),
            x_offset_um: 0.0,
            y_offset_um: 0.0,
            position: PositionSettings::default(),
        }
    }

    #[test]
    fn iterate_by_layer_buckets_and_sorts_ascending() {
        let slices = vec![slice_at(20.0, 300.0, solid(2, 2)), slice_at(10.0, 300.0, solid(2, 2))];
        let layers = iterate_by_layer(slices);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].0, 10.0);
        assert_eq!(layers[1].0, 20.0);
    }

    #[test]
    fn group_by_settings_merges_slices_with_identical_exposure_shape() {
        let slices = vec![slice_at(10.0, 300.0, solid(2, 2)), slice_at(10.0, 500.0, solid(2, 2))];
        let groups = group_by_settings(slices);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn combine_exposures_splits_overlapping_regions_into_exposure_tiers() {
        let mut a = solid(2, 2);
        a.data = vec![255, 255, 0, 0];
        let mut b = solid(2, 2);
        b.data = vec![255, 0, 0, 0];
        let group = vec![slice_at(10.0, 100.0, a), slice_at(10.0, 200.0, b)];
        let combined = combine_exposures(&group);
        // pixel 0 gets 300 total, pixel 1 gets 100: two tiers.
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].exposure_time_ms, 100.0);
        assert_eq!(combined[1].exposure_time_ms, 200.0);
        assert_eq!(combined[0].image.get(0, 0), 255);
        assert_eq!(combined[0].image.get(1, 0), 255);
        assert_eq!(combined[1].image.get(0, 0), 255);
        assert_eq!(combined[1].image.get(1, 0), 0);
    }

    proptest::proptest! {
        /// For any set of binary masks with exposures, the emitted tiers'
        /// cumulative exposure at each pixel equals the sum of the input
        /// masks' exposures wherever that pixel was set.
        #[test]
        fn exposure_sum_law_holds_pixelwise(
            masks in proptest::collection::vec(
                (proptest::collection::vec(proptest::bool::ANY, 9), 1u32..500),
                1..5,
            ),
        ) {
            let group: Vec<EmbeddedSlice> = masks
                .iter()
                .map(|(bits, exposure)| {
                    let data = bits.iter().map(|&b| if b { 255u8 } else { 0u8 }).collect();
                    slice_at(10.0, *exposure as f64, GrayImage { width: 3, height: 3, data })
                })
                .collect();

            let combined = combine_exposures(&group);

            for pixel in 0..9 {
                let expected: f64 = masks
                    .iter()
                    .filter(|(bits, _)| bits[pixel])
                    .map(|(_, exposure)| *exposure as f64)
                    .sum();
                let actual: f64 = combined
                    .iter()
                    .filter(|tier| tier.image.data[pixel] == 255)
                    .map(|tier| tier.exposure_time_ms)
                    .sum();
                prop_assert!((expected - actual).abs() < 1e-6);
            }
        }
    }
}
