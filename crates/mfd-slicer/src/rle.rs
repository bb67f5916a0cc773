//! Wire format for a sliced layer: bit-pack the binary mask, then
//! run-length-encode the packed bytes. Mirrors `numpy.packbits` followed by
//! a run-length pass over the packed byte stream.

use crate::raster::GrayImage;

/// A bit-packed, run-length-encoded raster.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedImage {
    /// Original image width.
    pub width: u32,
    /// Original image height.
    pub height: u32,
    /// Distinct packed-byte values, one per run.
    pub values: Vec<u8>,
    /// Run lengths, parallel to `values`.
    pub run_lengths: Vec<u32>,
}

fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | ((b as u8) << (7 - i))))
        .collect()
}

fn unpack_bits(bytes: &[u8], bit_count: usize) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bit_count);
    'outer: for byte in bytes {
        for i in 0..8 {
            if bits.len() == bit_count {
                break 'outer;
            }
            bits.push((byte >> (7 - i)) & 1 == 1);
        }
    }
    bits
}

impl PackedImage {
    /// Pack a grayscale image: threshold each pixel (non-zero is set),
    /// bit-pack the flattened row-major bitmap, then RLE-encode the packed
    /// bytes.
    pub fn encode(img: &GrayImage) -> Self {
        let bits: Vec<bool> = img.data.iter().map(|&b| b != 0).collect();
        let packed = pack_bits(&bits);

        let mut values = Vec::new();
        let mut run_lengths = Vec::new();
        for byte in packed {
            if values.last() == Some(&byte) {
                *run_lengths.last_mut().unwrap() += 1;
            } else {
                values.push(byte);
                run_lengths.push(1u32);
            }
        }
        Self { width: img.width, height: img.height, values, run_lengths }
    }

    /// Reconstruct the grayscale image (0 or 255 per pixel) this was
    /// packed from.
    pub fn decode(&self) -> GrayImage {
        let mut packed = Vec::new();
        for (&value, &run) in self.values.iter().zip(&self.run_lengths) {
            packed.extend(std::iter::repeat(value).take(run as usize));
        }
        let bit_count = (self.width as usize) * (self.height as usize);
        let bits = unpack_bits(&packed, bit_count);
        let data = bits.iter().map(|&b| if b { 255u8 } else { 0u8 }).collect();
        GrayImage { width: self.width, height: self.height, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_blank_image() {
        let img = GrayImage::blank(16, 16);
        let packed = PackedImage::encode(&img);
        assert_eq!(packed.decode(), img);
    }

    #[test]
    fn round_trips_a_checkerboard() {
        let mut img = GrayImage::blank(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                if (x + y) % 2 == 0 {
                    img.set(x, y, 255);
                }
            }
        }
        let packed = PackedImage::encode(&img);
        assert_eq!(packed.decode(), img);
    }

    #[test]
    fn a_solid_image_packs_to_a_single_run() {
        let img = GrayImage { width: 16, height: 1, data: vec![255; 16] };
        let packed = PackedImage::encode(&img);
        assert_eq!(packed.values.len(), 1);
        assert_eq!(packed.run_lengths[0], 2);
    }

    fn image_strategy() -> impl proptest::strategy::Strategy<Value = GrayImage> {
        (1u32..24, 1u32..24).prop_flat_map(|(width, height)| {
            proptest::collection::vec(proptest::bool::ANY, (width * height) as usize)
                .prop_map(move |bits| GrayImage {
                    width,
                    height,
                    data: bits.into_iter().map(|b| if b { 255u8 } else { 0u8 }).collect(),
                })
        })
    }

    proptest::proptest! {
        #[test]
        fn decode_of_encode_is_the_identity(img in image_strategy()) {
            let packed = PackedImage::encode(&img);
            prop_assert_eq!(packed.decode(), img.clone());

            let expected_packed_bytes = ((img.width as usize * img.height as usize) + 7) / 8;
            let run_length_sum: u32 = packed.run_lengths.iter().sum();
            prop_assert_eq!(run_length_sum as usize, expected_packed_bytes);
        }
    }
}
