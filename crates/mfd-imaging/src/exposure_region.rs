//! Regional exposure-settings splitting (§4.6 "Exposure settings") and
//! position-settings attachment (§4.6 "Position settings").

use mfd_slicer::GrayImage;
use mfd_settings::PositionSettings;

use crate::morphology::{and, and_not};

/// One slice's split result: the bulk raster with the region carved out,
/// plus the carved-out region itself (only present when the mask was
/// non-empty for this slice).
pub struct ExposureSplit {
    /// `img AND NOT mask`, replacing the original slice's raster.
    pub remaining: GrayImage,
    /// `img AND mask`, a new slice to emit under the region's settings.
    /// `None` when the mask didn't cover this slice at all.
    pub regional: Option<GrayImage>,
}

/// Split each slice against a region's mask: `exposure_img = img AND mask`,
/// `img <- img AND NOT mask`. One entry per input slice, in order.
pub fn split_exposure_region(images: &[GrayImage], masks: &[GrayImage]) -> Vec<ExposureSplit> {
    images
        .iter()
        .zip(masks)
        .map(|(img, mask)| {
            if mask.is_empty() {
                return ExposureSplit { remaining: img.clone(), regional: None };
            }
            let regional = and(img, mask);
            let remaining = and_not(img, mask);
            let regional = if regional.is_empty() { None } else { Some(regional) };
            ExposureSplit { remaining, regional }
        })
        .collect()
}

/// Attach `settings` to every slice index whose mask is non-empty.
pub fn attach_position_settings(masks: &[GrayImage], settings: &PositionSettings) -> Vec<Option<PositionSettings>> {
    masks.iter().map(|mask| if mask.is_empty() { None } else { Some(settings.clone()) }).collect()
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

    #[test]
    fn split_removes_masked_region_from_the_base_slice() {
        let img = square(8, 8, 0, 0, 8, 8);
        let mask = square(8, 8, 0, 0, 4, 4);
        let split = split_exposure_region(&[img], &[mask]).remove(0);
        assert_eq!(split.remaining.get(0, 0), 0);
        assert_eq!(split.remaining.get(7, 7), 255);
        assert_eq!(split.regional.unwrap().get(0, 0), 255);
    }

    #[test]
    fn an_empty_mask_leaves_the_slice_untouched_and_emits_nothing() {
        let img = square(4, 4, 0, 0, 4, 4);
        let mask = GrayImage::blank(4, 4);
        let split = split_exposure_region(&[img.clone()], &[mask]).remove(0);
        assert_eq!(split.remaining, img);
        assert!(split.regional.is_none());
    }

    #[test]
    fn position_settings_attach_only_where_the_mask_is_non_empty() {
        let settings = PositionSettings { distance_up: Some(1.0), ..Default::default() };
        let masks = vec![GrayImage::blank(2, 2), square(2, 2, 0, 0, 1, 1)];
        let attached = attach_position_settings(&masks, &settings);
        assert!(attached[0].is_none());
        assert_eq!(attached[1], Some(settings));
    }
}
