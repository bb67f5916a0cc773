//! Secondary-dose (edge + roof) synthesis — §4.6 "Secondary dose".

use mfd_slicer::GrayImage;
use mfd_settings::SecondaryDoseSettings;

use crate::morphology::{all_white, and, and_not, dilate, erode, or};

/// One slice's secondary-dose result.
pub struct SecondaryDoseSlice {
    /// Index into the base slice list.
    pub slice_index: usize,
    /// Edge-dose raster, if non-empty.
    pub edge: Option<GrayImage>,
    /// Roof-dose raster, if non-empty.
    pub roof: Option<GrayImage>,
}

/// Synthesise edge and roof secondary-dose rasters for every slice, mutating
/// `images` in place so the bulk dose excludes whatever was carved out
/// (`img AND NOT (edge OR roof)`). `membranes[i]` is slice `i`'s pre-dilation
/// membrane shape (the candidate re-added and eroded back before morphology,
/// per §4.6), or `None` where no membrane touches that slice.
pub fn synthesize_secondary_dose(
    images: &mut [GrayImage],
    membranes: &[Option<GrayImage>],
    settings: &SecondaryDoseSettings,
) -> Vec<SecondaryDoseSlice> {
    let n = images.len();
    let mut out = Vec::with_capacity(n);
    let edge_active = settings.edge_exposure_settings.exposure_time.is_some();
    let roof_active = settings.roof_exposure_settings.exposure_time.is_some();
    let edge_time = settings.edge_exposure_settings.exposure_time.unwrap_or(0.0);
    let roof_time = settings.roof_exposure_settings.exposure_time.unwrap_or(0.0);

    for i in 0..n {
        let membrane = membranes[i].clone().unwrap_or_else(|| GrayImage::blank(images[i].width, images[i].height));
        let with_membrane = or(&images[i], &membrane);

        let mut edge = GrayImage::blank(images[i].width, images[i].height);
        if edge_active {
            let eroded = and_not(&erode(&with_membrane, settings.edge_erosion_px), &membrane);
            let dilated = and_not(&dilate(&with_membrane, settings.edge_dilation_px), &membrane);
            edge = and_not(&dilated, &eroded);
        }

        let mut roof = GrayImage::blank(images[i].width, images[i].height);
        if roof_active {
            let mut accumulator = all_white(&images[i]);
            let start = i.saturating_sub(settings.roof_layers_above as usize);
            for prev in start..i {
                accumulator = and(&accumulator, &erode(&images[prev], settings.roof_erosion_px));
            }
            let eroded_self = erode(&images[i], settings.roof_erosion_px);
            roof = and_not(&and_not(&eroded_self, &accumulator), &membrane);
        }

        if edge_active && roof_active {
            if edge_time >= roof_time {
                roof = and_not(&roof, &edge);
            } else {
                edge = and_not(&edge, &roof);
            }
        }

        images[i] = and_not(&images[i], &or(&edge, &roof));

        out.push(SecondaryDoseSlice {
            slice_index: i,
            edge: if edge.is_empty() { None } else { Some(edge) },
            roof: if roof.is_empty() { None } else { Some(roof) },
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: u32, h: u32, x0: i64, y0: i64, x1: i64, y1: i64) -> GrayImage {
        let mut img = GrayImage::blank(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 255);
            }
        }
        img
    }

    fn settings(edge_time: Option<f64>, roof_time: Option<f64>) -> SecondaryDoseSettings {
        let edge_px = if edge_time.is_some() { 1 } else { 0 };
        let roof_px = if roof_time.is_some() { 1 } else { 0 };
        SecondaryDoseSettings::new(edge_time, edge_px, edge_px, roof_time, roof_px, roof_px).unwrap()
    }

    #[test]
    fn a_solid_square_gets_an_edge_ring_and_a_shrunk_bulk() {
        let mut images = vec![square(20, 20, 4, 4, 16, 16)];
        let membranes = vec![None];
        let result = synthesize_secondary_dose(&mut images, &membranes, &settings(Some(500.0), None));
        assert!(result[0].edge.is_some());
        assert!(result[0].roof.is_none());
        // the centre stays bulk, dosed once
        assert_eq!(images[0].get(10, 10), 255);
    }

    #[test]
    fn roof_accumulates_against_prior_layers() {
        // The second layer overhangs the first, so its erosion isn't fully
        // covered by the accumulated prior erosion and a roof is flagged.
        let mut images = vec![square(20, 20, 4, 4, 16, 16), square(20, 20, 2, 2, 18, 18)];
        let membranes = vec![None, None];
        let result = synthesize_secondary_dose(&mut images, &membranes, &settings(None, Some(300.0)));
        assert!(result[0].roof.is_none(), "no prior layer to roof against on the first slice");
        assert!(result[1].roof.is_some());
    }

    #[test]
    fn higher_dose_wins_the_overlap_between_edge_and_roof() {
        let mut images = vec![square(20, 20, 4, 4, 16, 16), square(20, 20, 2, 2, 18, 18)];
        let membranes = vec![None, None];
        let result = synthesize_secondary_dose(&mut images, &membranes, &settings(Some(100.0), Some(500.0)));
        if let (Some(edge), Some(roof)) = (&result[1].edge, &result[1].roof) {
            for (e, r) in edge.data.iter().zip(&roof.data) {
                assert!(!(*e != 0 && *r != 0), "edge and roof must not overlap after clipping");
            }
        }
    }
}
