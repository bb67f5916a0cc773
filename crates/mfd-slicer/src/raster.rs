//! An 8-bit grayscale raster and the orientation-aware polygon fill that
//! produces one from a layer's sliced polygons.

use crate::polygon::Polygon2;

/// A flat `H x W` 8-bit grayscale image, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixel data, one byte per pixel.
    pub data: Vec<u8>,
}

impl GrayImage {
    /// A blank (all-zero) image.
    pub fn blank(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; (width as usize) * (height as usize)] }
    }

    /// Pixel accessor; out-of-bounds reads return 0.
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Pixel mutator; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i64, y: i64, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// Whether every pixel is 0.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

/// Fill one polygon's interior into `img` with `value`, via a standard
/// even-odd scanline fill over integer vertices.
fn fill_polygon(img: &mut GrayImage, polygon: &Polygon2, value: u8) {
    let points = &polygon.points;
    let n = points.len();
    if n < 3 {
        return;
    }
    let (mut y_min, mut y_max) = (f64::MAX, f64::MIN);
    for &(_, y) in points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    let y0 = y_min.floor().max(0.0) as i64;
    let y1 = y_max.ceil().min(img.height as f64 - 1.0) as i64;
    for y in y0..=y1 {
        let yf = y as f64 + 0.5;
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..n {
            let (x0, py0) = points[i];
            let (x1, py1) = points[(i + 1) % n];
            if (py0 <= yf && py1 > yf) || (py1 <= yf && py0 > yf) {
                let t = (yf - py0) / (py1 - py0);
                xs.push(x0 + t * (x1 - x0));
            }
        }
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.chunks_exact(2) {
            let (x_start, x_end) = (pair[0].floor() as i64, pair[1].ceil() as i64);
            for x in x_start..x_end {
                img.set(x, y, value);
            }
        }
    }
}

/// Rasterise a layer's polygons into an `H x W` image. Polygons are drawn
/// in order (so outer contours must precede their holes): clockwise
/// polygons fill solid (255), counter-clockwise ones punch a hole (0).
/// Each polygon is shrunk inward by 0.1px first to avoid edge artefacts,
/// then its vertices are floored to integer pixel coordinates.
pub fn rasterize(polygons: &[Polygon2], width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::blank(width, height);
    for polygon in polygons {
        let buffered = polygon.offset_inward(0.1).unwrap_or_else(|| polygon.clone());
        let floored = Polygon2::new(buffered.points.iter().map(|&(x, y)| (x.floor(), y.floor())).collect());
        let value = if polygon.is_clockwise() { 255 } else { 0 };
        fill_polygon(&mut img, &floored, value);
    }
    img
}

/// Flip an image vertically so row 0 becomes the image's top when the
/// slicer's native Y axis points up.
pub fn flip_vertical(img: &GrayImage) -> GrayImage {
    let (w, h) = (img.width as usize, img.height as usize);
    let mut data = vec![0u8; w * h];
    for y in 0..h {
        let src = &img.data[y * w..(y + 1) * w];
        let dst_row = h - 1 - y;
        data[dst_row * w..(dst_row + 1) * w].copy_from_slice(src);
    }
    GrayImage { width: img.width, height: img.height, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ccw_square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon2 {
        Polygon2::new(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn cw_square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon2 {
        let mut p = ccw_square(x0, y0, x1, y1);
        p.points.reverse();
        p
    }

    #[test]
    fn clockwise_square_fills_solid() {
        let img = rasterize(&[cw_square(2.0, 2.0, 8.0, 8.0)], 10, 10);
        assert_eq!(img.get(5, 5), 255);
        assert_eq!(img.get(0, 0), 0);
    }

    #[test]
    fn counter_clockwise_hole_punches_through_prior_fill() {
        let polygons = vec![cw_square(0.0, 0.0, 10.0, 10.0), ccw_square(3.0, 3.0, 7.0, 7.0)];
        let img = rasterize(&polygons, 10, 10);
        assert_eq!(img.get(5, 5), 0);
        assert_eq!(img.get(1, 1), 255);
    }

    #[test]
    fn flip_vertical_reverses_row_order() {
        let mut img = GrayImage::blank(2, 2);
        img.set(0, 0, 255);
        let flipped = flip_vertical(&img);
        assert_eq!(flipped.get(0, 1), 255);
        assert_eq!(flipped.get(0, 0), 0);
    }
}
