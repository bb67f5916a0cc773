//! Binary mask arithmetic and flat-rectangle morphology over
//! [`GrayImage`](mfd_slicer::GrayImage): the primitives every membrane and
//! secondary-dose formula in §4.6 composes from.

use mfd_slicer::GrayImage;

fn zip_pixels(a: &GrayImage, b: &GrayImage, f: impl Fn(bool, bool) -> bool) -> GrayImage {
    debug_assert_eq!((a.width, a.height), (b.width, b.height));
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&pa, &pb)| if f(pa != 0, pb != 0) { 255 } else { 0 })
        .collect();
    GrayImage { width: a.width, height: a.height, data }
}

/// Bitwise AND of two masks.
pub fn and(a: &GrayImage, b: &GrayImage) -> GrayImage {
    zip_pixels(a, b, |x, y| x && y)
}

/// Bitwise OR of two masks.
pub fn or(a: &GrayImage, b: &GrayImage) -> GrayImage {
    zip_pixels(a, b, |x, y| x || y)
}

/// Bitwise AND-NOT: `a AND NOT b`.
pub fn and_not(a: &GrayImage, b: &GrayImage) -> GrayImage {
    zip_pixels(a, b, |x, y| x && !y)
}

/// Bitwise NOT.
pub fn not(a: &GrayImage) -> GrayImage {
    let data = a.data.iter().map(|&p| if p == 0 { 255 } else { 0 }).collect();
    GrayImage { width: a.width, height: a.height, data }
}

/// An all-white mask the same size as `like`.
pub fn all_white(like: &GrayImage) -> GrayImage {
    GrayImage { width: like.width, height: like.height, data: vec![255; like.data.len()] }
}

fn window_reduce(img: &GrayImage, radius: u32, all: bool) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    let (w, h) = (img.width as i64, img.height as i64);
    let r = radius as i64;
    let mut data = vec![0u8; img.data.len()];
    for y in 0..h {
        for x in 0..w {
            let mut result = all;
            'window: for dy in -r..=r {
                for dx in -r..=r {
                    let set = img.get(x + dx, y + dy) != 0;
                    if all && !set {
                        result = false;
                        break 'window;
                    }
                    if !all && set {
                        result = true;
                        break 'window;
                    }
                }
            }
            data[(y as usize) * (w as usize) + (x as usize)] = if result { 255 } else { 0 };
        }
    }
    GrayImage { width: img.width, height: img.height, data }
}

/// Erode by a flat `(2*radius+1)^2` square structuring element: a pixel
/// stays set only if every pixel in its window (treating out-of-bounds as
/// unset) is set.
pub fn erode(img: &GrayImage, radius: u32) -> GrayImage {
    window_reduce(img, radius, true)
}

/// Dilate by a flat `(2*radius+1)^2` square structuring element: a pixel
/// becomes set if any pixel in its window is set.
pub fn dilate(img: &GrayImage, radius: u32) -> GrayImage {
    window_reduce(img, radius, false)
}

/// Morphological opening (erode then dilate) with a 3x3 structuring
/// element, i.e. `radius = 1`.
pub fn open_3x3(img: &GrayImage) -> GrayImage {
    dilate(&erode(img, 1), 1)
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
    fn erode_shrinks_a_solid_square() {
        let img = square(10, 10, 2, 2, 8, 8);
        let eroded = erode(&img, 1);
        assert_eq!(eroded.get(2, 2), 0);
        assert_eq!(eroded.get(5, 5), 255);
    }

    #[test]
    fn dilate_grows_a_single_pixel() {
        let mut img = GrayImage::blank(10, 10);
        img.set(5, 5, 255);
        let dilated = dilate(&img, 1);
        assert_eq!(dilated.get(4, 5), 255);
        assert_eq!(dilated.get(6, 6), 255);
        assert_eq!(dilated.get(0, 0), 0);
    }

    #[test]
    fn open_3x3_removes_a_single_pixel_speckle() {
        let mut img = GrayImage::blank(10, 10);
        img.set(5, 5, 255);
        let opened = open_3x3(&img);
        assert!(opened.is_empty());
    }

    #[test]
    fn and_not_punches_b_out_of_a() {
        let a = square(4, 4, 0, 0, 4, 4);
        let b = square(4, 4, 0, 0, 2, 4);
        let result = and_not(&a, &b);
        assert_eq!(result.get(0, 0), 0);
        assert_eq!(result.get(3, 0), 255);
    }
}
