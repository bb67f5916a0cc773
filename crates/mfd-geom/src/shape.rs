//! `Shape`: a manifold solid plus metadata and keepout AABBs.

use crate::aabb::Aabb;
use crate::backend::{BoolOp, ManifoldHandle, SlicePolygon};
use crate::error::{Result, ShapeError};
use crate::math::Transform;
use crate::segments::default_segments;
use mfd_units::Color;

const ZERO_EXTENT_CLAMP: f64 = 1e-4;

/// Metadata a Shape carries alongside its solid.
#[derive(Debug, Clone, Default)]
pub struct ShapeMeta {
    /// Display name, if any.
    pub name: Option<String>,
    /// Fully-qualified owning-component name, set once the shape is added
    /// to a component.
    pub owner: Option<String>,
    /// Display color.
    pub color: Option<Color>,
    /// Region/label key this shape is filed under.
    pub label: Option<String>,
}

/// A manifold solid plus its carried keepout boxes and metadata.
///
/// Invariant: a Shape owns exactly one manifold solid. Keepouts are carried
/// through every affine operation in parallel with the solid (see
/// `Aabb::{translate,rotate,scale,mirror}`).
#[derive(Clone)]
pub struct Shape {
    solid: ManifoldHandle,
    keepouts: Vec<Aabb>,
    meta: ShapeMeta,
}

impl Shape {
    fn from_parts(solid: ManifoldHandle, keepouts: Vec<Aabb>, meta: ShapeMeta) -> Self {
        Self { solid, keepouts, meta }
    }

    /// Wrap a bare solid with no keepouts and no metadata.
    pub fn bare(solid: ManifoldHandle) -> Self {
        Self::from_parts(solid, Vec::new(), ShapeMeta::default())
    }

    /// This shape's keepout boxes.
    pub fn keepouts(&self) -> &[Aabb] {
        &self.keepouts
    }

    /// Metadata accessor.
    pub fn meta(&self) -> &ShapeMeta {
        &self.meta
    }

    /// Mutable metadata accessor.
    pub fn meta_mut(&mut self) -> &mut ShapeMeta {
        &mut self.meta
    }

    /// The solid's own bounding box (not the keepouts).
    pub fn bounding_box(&self) -> Aabb {
        let (x0, y0, z0, x1, y1, z1) = self.solid.bounding_box();
        Aabb::new((x0, y0, z0), (x1, y1, z1))
    }

    /// Add a single box to this shape's keepout list directly.
    pub fn add_keepout(&mut self, bbox: Aabb) {
        self.keepouts.push(bbox);
    }

    fn axis_shift_for_centering(extent: f64, center: bool, no_validation: bool) -> f64 {
        if center && !no_validation && (extent.round() as i64).rem_euclid(2) != 0 {
            0.5
        } else {
            0.0
        }
    }

    /// Axis-aligned box, `(x, y, z)` extent. When `center` is true and an
    /// axis has odd integer extent, that axis is shifted by `+0.5` so its
    /// faces land on pixel boundaries (suppressed by `no_validation`).
    pub fn cube(x: f64, y: f64, z: f64, center: bool, no_validation: bool) -> Self {
        let (x, y, z) = (x.max(ZERO_EXTENT_CLAMP), y.max(ZERO_EXTENT_CLAMP), z.max(ZERO_EXTENT_CLAMP));
        let mut solid = ManifoldHandle::cube(x, y, z);
        if center {
            solid = solid.translate(-x / 2.0, -y / 2.0, -z / 2.0);
        }
        let shift = (
            Self::axis_shift_for_centering(x, center, no_validation),
            Self::axis_shift_for_centering(y, center, no_validation),
            Self::axis_shift_for_centering(z, center, no_validation),
        );
        if shift != (0.0, 0.0, 0.0) {
            solid = solid.translate(shift.0, shift.1, shift.2);
        }
        Self::bare(solid)
    }

    /// Ellipsoid: a unit sphere non-uniformly scaled to `(rx, ry, rz)`
    /// radii, centred at the origin.
    pub fn ellipsoid(rx: f64, ry: f64, rz: f64) -> Self {
        let segments = default_segments();
        let unit = ManifoldHandle::sphere(1.0, segments);
        Self::bare(unit.scale(rx.max(ZERO_EXTENT_CLAMP), ry.max(ZERO_EXTENT_CLAMP), rz.max(ZERO_EXTENT_CLAMP)))
    }

    /// Sphere of uniform radius.
    pub fn sphere(radius: f64) -> Self {
        Self::ellipsoid(radius, radius, radius)
    }

    /// Cylinder along Z with independent bottom/top radii. Radii must each
    /// be multiples of 0.5 (`ShapeRadiusGrid`) and share parity, i.e.
    /// `round(rlow * 2)` and `round(rhigh * 2)` must have the same
    /// evenness (`ShapeParity`).
    pub fn cylinder(
        height: f64,
        rlow: f64,
        rhigh: f64,
        segments: u32,
        center: bool,
    ) -> Result<Self> {
        let half_low = (rlow * 2.0).round();
        let half_high = (rhigh * 2.0).round();
        if (half_low - rlow * 2.0).abs() > 1e-6 || (half_high - rhigh * 2.0).abs() > 1e-6 {
            return Err(ShapeError::ShapeRadiusGrid { rlow, rhigh });
        }
        if (half_low.rem_euclid(2.0) - half_high.rem_euclid(2.0)).abs() > f64::EPSILON {
            return Err(ShapeError::ShapeParity { rlow, rhigh });
        }
        let height = height.max(ZERO_EXTENT_CLAMP);
        let mut solid = ManifoldHandle::cylinder(height, rlow, rhigh, segments);
        if center {
            solid = solid.translate(0.0, 0.0, -height / 2.0);
        }
        Ok(Self::bare(solid))
    }

    /// Convex hull of eight spheres of radius `(rx, ry, rz)` placed at the
    /// corners of a `(x, y, z)` box, centred at the origin.
    pub fn rounded_cube(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        let segments = default_segments();
        let hx = x / 2.0 - rx;
        let hy = y / 2.0 - ry;
        let hz = z / 2.0 - rz;
        let mut corner_spheres = Vec::with_capacity(8);
        for &sx in &[-1.0, 1.0] {
            for &sy in &[-1.0, 1.0] {
                for &sz in &[-1.0, 1.0] {
                    let sphere = ManifoldHandle::sphere(1.0, segments)
                        .scale(rx.max(ZERO_EXTENT_CLAMP), ry.max(ZERO_EXTENT_CLAMP), rz.max(ZERO_EXTENT_CLAMP))
                        .translate(sx * hx, sy * hy, sz * hz);
                    corner_spheres.push(sphere);
                }
            }
        }
        Self::bare(ManifoldHandle::batch_hull(&corner_spheres))
    }

    /// Gyroid triply-periodic minimal surface, sampled over `bounds` with
    /// cell spacing `edge`, then scaled to `(x, y, z)`.
    pub fn tpms_gyroid(bounds: (f64, f64, f64, f64, f64, f64), edge: f64, x: f64, y: f64, z: f64) -> Self {
        let solid = ManifoldHandle::level_set(
            |px, py, pz| px.sin() * py.cos() + py.sin() * pz.cos() + pz.sin() * px.cos(),
            bounds,
            edge,
            0.0,
        );
        let (bx0, by0, bz0, bx1, by1, bz1) = bounds;
        let (bw, bh, bd) = ((bx1 - bx0).max(ZERO_EXTENT_CLAMP), (by1 - by0).max(ZERO_EXTENT_CLAMP), (bz1 - bz0).max(ZERO_EXTENT_CLAMP));
        Self::bare(solid.scale(x / bw, y / bh, z / bd))
    }

    /// Schwarz diamond triply-periodic minimal surface.
    pub fn tpms_diamond(bounds: (f64, f64, f64, f64, f64, f64), edge: f64, x: f64, y: f64, z: f64) -> Self {
        let solid = ManifoldHandle::level_set(
            |px, py, pz| {
                px.sin() * py.sin() * pz.sin()
                    + px.sin() * py.cos() * pz.cos()
                    + px.cos() * py.sin() * pz.cos()
                    + px.cos() * py.cos() * pz.sin()
            },
            bounds,
            edge,
            0.0,
        );
        let (bx0, by0, bz0, bx1, by1, bz1) = bounds;
        let (bw, bh, bd) = ((bx1 - bx0).max(ZERO_EXTENT_CLAMP), (by1 - by0).max(ZERO_EXTENT_CLAMP), (bz1 - bz0).max(ZERO_EXTENT_CLAMP));
        Self::bare(solid.scale(x / bw, y / bh, z / bd))
    }

    /// Translate the solid and every keepout by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_parts(
            self.solid.translate(dx, dy, dz),
            self.keepouts.iter().map(|k| k.translate(dx, dy, dz)).collect(),
            self.meta.clone(),
        )
    }

    /// Euler-rotate the solid (degrees, X then Y then Z); each keepout
    /// becomes the AABB of its 8 rotated corners.
    pub fn rotate(&self, rx: f64, ry: f64, rz: f64) -> Self {
        let t = Transform::rotation_xyz_deg(rx, ry, rz);
        Self::from_parts(
            self.solid.rotate(rx, ry, rz),
            self.keepouts.iter().map(|k| k.rotate(&t)).collect(),
            self.meta.clone(),
        )
    }

    /// Scale the solid and every keepout corner-wise.
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Self {
        let sx = if sx.abs() < ZERO_EXTENT_CLAMP { ZERO_EXTENT_CLAMP } else { sx };
        let sy = if sy.abs() < ZERO_EXTENT_CLAMP { ZERO_EXTENT_CLAMP } else { sy };
        let sz = if sz.abs() < ZERO_EXTENT_CLAMP { ZERO_EXTENT_CLAMP } else { sz };
        Self::from_parts(
            self.solid.scale(sx, sy, sz),
            self.keepouts.iter().map(|k| k.scale(sx, sy, sz)).collect(),
            self.meta.clone(),
        )
    }

    /// Scale so the current bounding box matches `target`, clamping
    /// zero-size target dimensions to avoid a singular scale.
    pub fn resize(&self, target: (f64, f64, f64)) -> Self {
        let bbox = self.bounding_box();
        let current = (
            (bbox.max.0 - bbox.min.0).max(ZERO_EXTENT_CLAMP),
            (bbox.max.1 - bbox.min.1).max(ZERO_EXTENT_CLAMP),
            (bbox.max.2 - bbox.min.2).max(ZERO_EXTENT_CLAMP),
        );
        let (tx, ty, tz) = (target.0.max(ZERO_EXTENT_CLAMP), target.1.max(ZERO_EXTENT_CLAMP), target.2.max(ZERO_EXTENT_CLAMP));
        self.scale(tx / current.0, ty / current.1, tz / current.2)
    }

    /// Mirror across the planes flagged `true`; the solid mirrors via a
    /// negative scale and every keepout is negated and re-sorted.
    pub fn mirror(&self, mx: bool, my: bool, mz: bool) -> Self {
        Self::from_parts(
            self.solid.mirror(mx, my, mz),
            self.keepouts.iter().map(|k| k.mirror(mx, my, mz)).collect(),
            self.meta.clone(),
        )
    }

    /// Union: extends both keepout lists.
    pub fn union(&self, other: &Self) -> Self {
        let mut keepouts = self.keepouts.clone();
        keepouts.extend(other.keepouts.iter().cloned());
        Self::from_parts(self.solid.union(&other.solid), keepouts, self.meta.clone())
    }

    /// Difference: keeps only `self`'s keepouts.
    pub fn subtract(&self, other: &Self) -> Self {
        Self::from_parts(self.solid.difference(&other.solid), self.keepouts.clone(), self.meta.clone())
    }

    /// Intersection: intersects every pair of keepouts, keeping only the
    /// non-empty results.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut keepouts = Vec::new();
        for a in &self.keepouts {
            for b in &other.keepouts {
                if let Some(overlap) = a.intersect(b) {
                    keepouts.push(overlap);
                }
            }
        }
        Self::from_parts(self.solid.intersection(&other.solid), keepouts, self.meta.clone())
    }

    /// Convex hull with `other`: extends both keepout lists and appends a
    /// bridging box spanning the union AABB of both operands' solids.
    pub fn hull(&self, other: &Self) -> Self {
        let mut keepouts = self.keepouts.clone();
        keepouts.extend(other.keepouts.iter().cloned());
        keepouts.push(self.bounding_box().union_box(&other.bounding_box()));
        let hulled = ManifoldHandle::batch_hull(&[self.solid.clone(), other.solid.clone()]);
        Self::from_parts(hulled, keepouts, self.meta.clone())
    }

    /// Deep copy. `keep_metadata` preserves name/owner/color/label;
    /// otherwise the copy starts with blank metadata (matching the
    /// reference implementation's internal vs. user-facing `copy`).
    pub fn copy(&self, keep_metadata: bool) -> Self {
        Self::from_parts(
            self.solid.clone(),
            self.keepouts.clone(),
            if keep_metadata { self.meta.clone() } else { ShapeMeta::default() },
        )
    }

    /// Batch union; single-element input short-circuits to a copy.
    pub fn batch_union(parts: &[Self]) -> Result<Self> {
        Self::batch(parts, BoolOp::Add)
    }

    /// Batch subtract-from-first.
    pub fn batch_subtract(parts: &[Self]) -> Result<Self> {
        Self::batch(parts, BoolOp::Subtract)
    }

    /// Union `adds` then subtract `subs` from the result; both preferred
    /// over chained binary calls since the underlying library's batch
    /// boolean amortises a single BSP rebuild.
    pub fn batch_add_then_subtract(adds: &[Self], subs: &[Self]) -> Result<Self> {
        if adds.is_empty() {
            return Err(ShapeError::EmptyBatch);
        }
        let unioned = Self::batch(adds, BoolOp::Add)?;
        if subs.is_empty() {
            return Ok(unioned);
        }
        let subtracted = Self::batch(subs, BoolOp::Add)?;
        Ok(unioned.subtract(&subtracted))
    }

    fn batch(parts: &[Self], op: BoolOp) -> Result<Self> {
        if parts.is_empty() {
            return Err(ShapeError::EmptyBatch);
        }
        if parts.len() == 1 {
            return Ok(parts[0].copy(true));
        }
        let handles: Vec<ManifoldHandle> = parts.iter().map(|p| p.solid.clone()).collect();
        let mut keepouts = Vec::new();
        match op {
            BoolOp::Add => {
                for p in parts {
                    keepouts.extend(p.keepouts.iter().cloned());
                }
            }
            BoolOp::Subtract => keepouts = parts[0].keepouts.clone(),
            BoolOp::Intersect => {
                keepouts = parts[0].keepouts.clone();
                for p in &parts[1..] {
                    let mut next = Vec::new();
                    for a in &keepouts {
                        for b in &p.keepouts {
                            if let Some(overlap) = a.intersect(b) {
                                next.push(overlap);
                            }
                        }
                    }
                    keepouts = next;
                }
            }
        }
        Ok(Self::from_parts(ManifoldHandle::batch_boolean(&handles, op), keepouts, parts[0].meta.clone()))
    }

    /// Slice the solid at height `z`.
    pub fn slice(&self, z: f64) -> Vec<SlicePolygon> {
        self.solid.slice(z)
    }

    /// Access the underlying manifold handle (used by the slicer/router
    /// crates that need raw mesh/slice access beyond the Shape API).
    pub fn solid(&self) -> &ManifoldHandle {
        &self.solid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_rejects_non_half_multiple_radii() {
        let err = Shape::cylinder(10.0, 1.3, 1.3, 20, true).unwrap_err();
        assert!(matches!(err, ShapeError::ShapeRadiusGrid { .. }));
    }

    #[test]
    fn cylinder_rejects_mismatched_parity() {
        let err = Shape::cylinder(10.0, 1.0, 1.5, 20, true).unwrap_err();
        assert!(matches!(err, ShapeError::ShapeParity { .. }));
    }

    #[test]
    fn union_extends_both_keepout_lists() {
        let mut a = Shape::cube(2.0, 2.0, 2.0, true, false);
        a.add_keepout(Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)));
        let mut b = Shape::cube(2.0, 2.0, 2.0, true, false);
        b.add_keepout(Aabb::new((2.0, 2.0, 2.0), (3.0, 3.0, 3.0)));
        let u = a.union(&b);
        assert_eq!(u.keepouts().len(), 2);
    }

    #[test]
    fn subtract_keeps_only_self_keepouts() {
        let mut a = Shape::cube(2.0, 2.0, 2.0, true, false);
        a.add_keepout(Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)));
        let mut b = Shape::cube(2.0, 2.0, 2.0, true, false);
        b.add_keepout(Aabb::new((2.0, 2.0, 2.0), (3.0, 3.0, 3.0)));
        let d = a.subtract(&b);
        assert_eq!(d.keepouts().len(), 1);
    }

    #[test]
    fn batch_with_single_element_short_circuits_to_copy() {
        let a = Shape::cube(1.0, 1.0, 1.0, false, false);
        let result = Shape::batch_union(std::slice::from_ref(&a)).unwrap();
        assert!(!result.solid().is_empty());
    }

    #[test]
    fn empty_batch_errors() {
        assert!(matches!(Shape::batch_union(&[]), Err(ShapeError::EmptyBatch)));
    }

    #[test]
    fn resize_clamps_zero_extent_target() {
        let a = Shape::cube(2.0, 2.0, 2.0, true, false);
        let resized = a.resize((0.0, 4.0, 4.0));
        assert!(!resized.solid().is_empty());
    }
}
