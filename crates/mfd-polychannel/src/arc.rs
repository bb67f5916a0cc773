//! 3D arc construction between three collinear-or-not waypoints, used to
//! round a polychannel's manhattan corners.

use crate::error::{PolychannelError, Result};
use nalgebra::Vector3;

type Point = (f64, f64, f64);

/// An arc fit between the incoming leg `B-A` and outgoing leg `B-C`.
pub struct Arc {
    /// Sampled points along the arc, `n` of them.
    pub points: Vec<Point>,
    /// Local rotation vector (axis-angle, as Euler degrees about `normal`)
    /// at each sampled point.
    pub rotations: Vec<Point>,
    /// Index (0=x, 1=y, 2=z) of the dominant axis of the incoming leg.
    pub start_dir: usize,
    /// Index of the dominant axis of the outgoing leg.
    pub end_dir: usize,
}

fn to_vec(p: Point) -> Vector3<f64> {
    Vector3::new(p.0, p.1, p.2)
}

fn argmax_abs(v: &Vector3<f64>) -> usize {
    let abs = (v.x.abs(), v.y.abs(), v.z.abs());
    if abs.0 >= abs.1 && abs.0 >= abs.2 {
        0
    } else if abs.1 >= abs.2 {
        1
    } else {
        2
    }
}

/// Fit an arc of radius `r`, sampled at `n` points, into the corner at `b`
/// between the straight legs `a-b` and `b-c`. Returns `Ok(None)` when `a`,
/// `b`, `c` are collinear (the bisector direction is undefined) — callers
/// treat that, and the `start_dir == end_dir` case, as "pass the corner
/// through unrounded".
pub fn arc_between_angle_3d(a: Point, b: Point, c: Point, r: f64, n: u32) -> Result<Option<Arc>> {
    let (a, b, c) = (to_vec(a), to_vec(b), to_vec(c));
    let ba = a - b;
    let bc = c - b;
    let ba_len = ba.norm();
    let bc_len = bc.norm();
    let u_ba = ba / ba_len;
    let u_bc = bc / bc_len;

    if r > ba_len.round() || r > bc_len.round() {
        return Err(PolychannelError::ArcGeometry(format!(
            "radius {r} is larger than incoming/outgoing channel lengths {ba_len}, {bc_len}"
        )));
    }

    let cos_theta = u_ba.dot(&u_bc).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let half_theta = theta / 2.0;
    let offset = r / half_theta.tan();
    if offset.round() > ba_len.round() || offset.round() > bc_len.round() {
        return Err(PolychannelError::ArcGeometry(format!(
            "offset {offset} exceeds incoming/outgoing channel lengths {ba_len}, {bc_len}"
        )));
    }

    let p1 = b + u_ba * offset;
    let p2 = b + u_bc * offset;

    let bisector_raw = u_ba + u_bc;
    let bisector_norm = bisector_raw.norm();
    if bisector_norm < 1e-12 {
        return Ok(None);
    }
    let bisector = bisector_raw / bisector_norm;

    let start_dir = argmax_abs(&u_ba);
    let end_dir = argmax_abs(&u_bc);

    let center = b + bisector * (r / half_theta.sin());
    let v1 = p1 - center;
    let v2 = p2 - center;

    let normal_raw = v1.cross(&v2);
    let normal_norm = normal_raw.norm();
    if normal_norm < 1e-12 {
        return Ok(None);
    }
    let normal = normal_raw / normal_norm;

    let u = v1 / v1.norm();
    let v = normal.cross(&u).normalize();

    let start_angle = 0.0_f64;
    let mut end_angle = v2.dot(&v).atan2(v2.dot(&u));
    if end_angle < 0.0 {
        end_angle += 2.0 * std::f64::consts::PI;
    }
    if end_angle > std::f64::consts::PI {
        end_angle -= 2.0 * std::f64::consts::PI;
    }

    let steps = n.max(2);
    let mut points = Vec::with_capacity(steps as usize);
    let mut rotations = Vec::with_capacity(steps as usize);
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let angle = start_angle + (end_angle - start_angle) * t;
        let p = center + r * (angle.cos() * u + angle.sin() * v);
        points.push((p.x, p.y, p.z));
        let rot = normal * angle.to_degrees();
        rotations.push((rot.x, rot.y, rot.z));
    }

    Ok(Some(Arc { points, rotations, start_dir, end_dir }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angle_corner_produces_quarter_arc() {
        let arc = arc_between_angle_3d((0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0), 2.0, 5)
            .unwrap()
            .unwrap();
        assert_eq!(arc.points.len(), 5);
        assert_eq!(arc.start_dir, 0);
        assert_eq!(arc.end_dir, 1);
    }

    #[test]
    fn collinear_points_return_none() {
        let arc = arc_between_angle_3d((0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (20.0, 0.0, 0.0), 2.0, 5).unwrap();
        assert!(arc.is_none());
    }

    #[test]
    fn radius_larger_than_leg_errors() {
        let err = arc_between_angle_3d((0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0), 50.0, 5).unwrap_err();
        assert!(matches!(err, PolychannelError::ArcGeometry(_)));
    }
}
