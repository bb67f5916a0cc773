//! PNG encode/decode for a sliced raster, for the image store the print
//! compiler writes to disk.

use image::{DynamicImage, GrayImage as DynGrayImage};
use mfd_slicer::GrayImage;

use crate::error::Result;

/// Encode a raster to PNG bytes.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>> {
    let buffer = DynGrayImage::from_raw(img.width, img.height, img.data.clone())
        .expect("GrayImage buffer length matches width*height by construction");
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(buffer).write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode PNG bytes back into a raster.
pub fn decode_png(bytes: &[u8]) -> Result<GrayImage> {
    let dynamic = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
    let gray = dynamic.to_luma8();
    Ok(GrayImage { width: gray.width(), height: gray.height(), data: gray.into_raw() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_a_checkerboard() {
        let mut img = GrayImage::blank(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                if (x + y) % 2 == 0 {
                    img.set(x, y, 255);
                }
            }
        }
        let bytes = encode_png(&img).unwrap();
        let decoded = decode_png(&bytes).unwrap();
        assert_eq!(decoded, img);
    }
}
