//! Integer pixel/layer space and the real-valued mm scalars that convert it.

/// An integer position or extent in a component's pixel/layer lattice.
pub type IVec3 = (i64, i64, i64);

/// Millimetres-per-pixel and millimetres-per-layer scale factors owned by
/// every component. Conversions between a parent and a child unit system
/// are explicit and rounded to 3 decimals, per the authored contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    /// Millimetres per pixel (XY).
    pub px_size: f64,
    /// Millimetres per layer (Z).
    pub layer_size: f64,
}

impl UnitScale {
    /// Construct a unit scale.
    pub fn new(px_size: f64, layer_size: f64) -> Self {
        Self { px_size, layer_size }
    }

    /// Round a millimetre value to 3 decimal places.
    fn round3(value: f64) -> f64 {
        (value * 1000.0).round() / 1000.0
    }

    /// Convert an XY pixel count expressed in `self`'s unit system into the
    /// equivalent pixel count in `other`'s unit system, rounded to 3
    /// decimals of the intermediate millimetre value before dividing back.
    pub fn convert_px(&self, other: &UnitScale, px: f64) -> f64 {
        let mm = Self::round3(px * self.px_size);
        mm / other.px_size
    }

    /// Convert a Z layer count expressed in `self`'s unit system into the
    /// equivalent layer count in `other`'s unit system.
    pub fn convert_layer(&self, other: &UnitScale, layers: f64) -> f64 {
        let mm = Self::round3(layers * self.layer_size);
        mm / other.layer_size
    }

    /// Millimetres for a pixel count, rounded to 3 decimals.
    pub fn px_to_mm(&self, px: f64) -> f64 {
        Self::round3(px * self.px_size)
    }

    /// Millimetres for a layer count, rounded to 3 decimals.
    pub fn layer_to_mm(&self, layers: f64) -> f64 {
        Self::round3(layers * self.layer_size)
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self { px_size: 1.0, layer_size: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_to_mm_rounds_to_3_decimals() {
        let u = UnitScale::new(0.0123456, 1.0);
        assert_eq!(u.px_to_mm(10.0), 0.123);
    }

    #[test]
    fn convert_px_round_trips_through_mm() {
        let parent = UnitScale::new(0.01, 1.0);
        let child = UnitScale::new(0.02, 1.0);
        let converted = parent.convert_px(&child, 100.0);
        assert_eq!(converted, 50.0);
    }
}
