//! Minimal nalgebra-backed point/vector/transform types shared by the
//! geometry core, the polychannel builder, and the component tree.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 4x4 affine transformation matrix, composed as `self * other` applies
/// `other` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self { matrix: Matrix4::identity() }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Euler rotation in degrees, applied in X then Y then Z order, matching
    /// the reference implementation's sequential-axis rotation.
    pub fn rotation_xyz_deg(rx: f64, ry: f64, rz: f64) -> Self {
        let x = Self::axis_rotation(0, rx.to_radians());
        let y = Self::axis_rotation(1, ry.to_radians());
        let z = Self::axis_rotation(2, rz.to_radians());
        Self { matrix: z.matrix * y.matrix * x.matrix }
    }

    fn axis_rotation(axis: usize, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        match axis {
            0 => {
                m[(1, 1)] = c;
                m[(1, 2)] = -s;
                m[(2, 1)] = s;
                m[(2, 2)] = c;
            }
            1 => {
                m[(0, 0)] = c;
                m[(0, 2)] = s;
                m[(2, 0)] = -s;
                m[(2, 2)] = c;
            }
            _ => {
                m[(0, 0)] = c;
                m[(0, 1)] = -s;
                m[(1, 0)] = s;
                m[(1, 1)] = c;
            }
        }
        Self { matrix: m }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn rotation_z_90_rotates_x_axis_to_y() {
        let t = Transform::rotation_xyz_deg(0.0, 0.0, 90.0);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn translation_shifts_point() {
        let t = Transform::translation(1.0, 2.0, 3.0);
        let p = t.apply_point(&Point3::origin());
        assert_eq!((p.x, p.y, p.z), (1.0, 2.0, 3.0));
    }

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        // 90 about X then 90 about Z should differ from pure Z rotation.
        let xz = Transform::rotation_xyz_deg(90.0, 0.0, 90.0);
        let z_only = Transform::rotation_xyz_deg(0.0, 0.0, 90.0);
        let p = Point3::new(0.0, 1.0, 0.0);
        assert!((xz.apply_point(&p) - z_only.apply_point(&p)).norm() > 1e-6);
        let _ = PI;
    }
}
