//! Membrane (thin-film bridge) synthesis — §4.6 "Membrane settings".

use mfd_slicer::GrayImage;
use mfd_settings::MembraneSettings;

use crate::morphology::{and, and_not, dilate, not, open_3x3};

/// One synthesised membrane: which base-slice index it belongs to, its
/// pre-dilation candidate (kept so secondary-dose synthesis can re-add and
/// erode it back), and its dilated, emitted raster.
pub struct Membrane {
    /// Index into the base slice list this membrane was carved out of.
    pub slice_index: usize,
    /// The candidate membrane shape before dilation.
    pub pre_dilation: GrayImage,
    /// The dilated raster emitted as a new slice under the region's
    /// exposure settings.
    pub dilated: GrayImage,
}

/// Find spans between two slices whose Z separation matches
/// `max_membrane_thickness_um` (within 0.01 µm) and, for every layer
/// strictly between them, carve out and emit a membrane wherever material
/// exists in the gap neither the floor nor the ceiling layer occupies.
/// Mutates `images` in place, subtracting each emitted membrane's
/// pre-dilation shape from its own layer.
pub fn synthesize_membranes(z_um: &[f64], images: &mut [GrayImage], masks: &[GrayImage], settings: &MembraneSettings) -> Vec<Membrane> {
    let n = images.len();
    let mut membranes = Vec::new();
    for i in 0..n {
        let prev = (0..i)
            .rev()
            .find(|&j| (z_um[i] - z_um[j] - settings.max_membrane_thickness_um).abs() <= 0.01);
        let Some(prev) = prev else { continue };

        let floor_img = images[prev].clone();
        let ceiling_img = images[i].clone();
        for j in (prev + 1)..i {
            let gap = and(&not(&floor_img), &not(&ceiling_img));
            let region = and(&gap, &masks[j]);
            let candidate = and(&images[j], &region);
            let opened = open_3x3(&candidate);
            if opened.is_empty() {
                continue;
            }
            images[j] = and_not(&images[j], &opened);
            let dilated = dilate(&opened, settings.dilation_px);
            membranes.push(Membrane { slice_index: j, pre_dilation: opened, dilated });
        }
    }
    membranes
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfd_settings::{ExposureSettings, SpecialImageTechnique};

    fn square(w: u32, h: u32, x0: i64, y0: i64, x1: i64, y1: i64) -> GrayImage {
        let mut img = GrayImage::blank(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 255);
            }
        }
        img
    }

    /// A solid frame with a hole punched in its centre, representing a
    /// floor/ceiling layer with a channel void at `(x0,y0)..(x1,y1)`.
    fn frame_with_hole(w: u32, h: u32, x0: i64, y0: i64, x1: i64, y1: i64) -> GrayImage {
        let mut img = square(w, h, 0, 0, w as i64, h as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 0);
            }
        }
        img
    }

    fn membrane_settings() -> MembraneSettings {
        MembraneSettings::new(0.02, 500.0, 2, 0.0, Vec::<SpecialImageTechnique>::new())
    }

    #[test]
    fn a_gap_exactly_one_membrane_thick_emits_a_membrane() {
        // z1 is deliberately off-pitch from z0/z2 so only the (z0, z2) pair
        // lands within the 0.01um tolerance of the 0.02um membrane thickness.
        let z = vec![0.0, 0.0133, 0.02];
        let mut images = vec![
            frame_with_hole(10, 10, 2, 2, 8, 8),
            square(10, 10, 0, 0, 10, 10),
            frame_with_hole(10, 10, 2, 2, 8, 8),
        ];
        let masks = vec![square(10, 10, 0, 0, 10, 10); 3];
        let membranes = synthesize_membranes(&z, &mut images, &masks, &membrane_settings());
        assert_eq!(membranes.len(), 1);
        assert_eq!(membranes[0].slice_index, 1);
        assert_eq!(images[1].get(5, 5), 0);
    }

    #[test]
    fn no_emission_when_the_gap_does_not_match_the_membrane_thickness() {
        let z = vec![0.0, 0.05, 0.10];
        let mut images = vec![
            frame_with_hole(10, 10, 2, 2, 8, 8),
            square(10, 10, 0, 0, 10, 10),
            frame_with_hole(10, 10, 2, 2, 8, 8),
        ];
        let masks = vec![square(10, 10, 0, 0, 10, 10); 3];
        let membranes = synthesize_membranes(&z, &mut images, &masks, &membrane_settings());
        assert!(membranes.is_empty());
    }

    #[test]
    fn membrane_exposure_settings_carry_the_configured_time() {
        let settings = membrane_settings();
        assert_eq!(settings.exposure_settings, ExposureSettings {
            exposure_time: Some(500.0),
            relative_focus_position: Some(0.0),
            ..Default::default()
        });
    }
}
