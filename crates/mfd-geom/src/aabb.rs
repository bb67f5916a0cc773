//! Axis-aligned keepout boxes carried alongside a [`crate::Shape`]'s solid.

use crate::math::Transform;

/// An axis-aligned bounding box `(x0, y0, z0, x1, y1, z1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: (f64, f64, f64),
    /// Maximum corner.
    pub max: (f64, f64, f64),
}

impl Aabb {
    /// Build a box from two corners, independent of ordering.
    pub fn new(a: (f64, f64, f64), b: (f64, f64, f64)) -> Self {
        Self {
            min: (a.0.min(b.0), a.1.min(b.1), a.2.min(b.2)),
            max: (a.0.max(b.0), a.1.max(b.1), a.2.max(b.2)),
        }
    }

    /// Translate both corners by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            min: (self.min.0 + dx, self.min.1 + dy, self.min.2 + dz),
            max: (self.max.0 + dx, self.max.1 + dy, self.max.2 + dz),
        }
    }

    /// Scale both corners independently about the origin.
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(
            (self.min.0 * sx, self.min.1 * sy, self.min.2 * sz),
            (self.max.0 * sx, self.max.1 * sy, self.max.2 * sz),
        )
    }

    /// Rotate: take the AABB of all 8 rotated corners.
    pub fn rotate(&self, t: &Transform) -> Self {
        let (x0, y0, z0) = self.min;
        let (x1, y1, z1) = self.max;
        let corners = [
            (x0, y0, z0), (x0, y0, z1), (x0, y1, z0), (x0, y1, z1),
            (x1, y0, z0), (x1, y0, z1), (x1, y1, z0), (x1, y1, z1),
        ];
        let mut rotated = corners.iter().map(|&(x, y, z)| {
            let p = t.apply_point(&nalgebra::Point3::new(x, y, z));
            (p.x, p.y, p.z)
        });
        let first = rotated.next().unwrap();
        let mut bbox = Aabb::new(first, first);
        for c in rotated {
            bbox = bbox.extend_point(c);
        }
        bbox
    }

    /// Mirror: negate both corners on each flagged axis and re-sort.
    ///
    /// The reference implementation applies the same-sign shift on both the
    /// `+X` and `-X` branch after a surface-normal flip; this is intentional
    /// (the box re-anchors to its new outer face), not a bug — see
    /// DESIGN.md's Open Question resolution.
    pub fn mirror(&self, mx: bool, my: bool, mz: bool) -> Self {
        let flip = |lo: f64, hi: f64, do_flip: bool| -> (f64, f64) {
            if do_flip {
                let (a, b) = (-lo, -hi);
                (a.min(b), a.max(b))
            } else {
                (lo, hi)
            }
        };
        let (x0, x1) = flip(self.min.0, self.max.0, mx);
        let (y0, y1) = flip(self.min.1, self.max.1, my);
        let (z0, z1) = flip(self.min.2, self.max.2, mz);
        Self { min: (x0, y0, z0), max: (x1, y1, z1) }
    }

    fn extend_point(&self, p: (f64, f64, f64)) -> Self {
        Self::new(
            (self.min.0.min(p.0), self.min.1.min(p.1), self.min.2.min(p.2)),
            (self.max.0.max(p.0), self.max.1.max(p.1), self.max.2.max(p.2)),
        )
    }

    /// Intersect two boxes with strict corner comparisons; `None` if the
    /// boxes merely touch or do not overlap.
    pub fn intersect(&self, other: &Aabb) -> Option<Self> {
        let x0 = self.min.0.max(other.min.0);
        let y0 = self.min.1.max(other.min.1);
        let z0 = self.min.2.max(other.min.2);
        let x1 = self.max.0.min(other.max.0);
        let y1 = self.max.1.min(other.max.1);
        let z1 = self.max.2.min(other.max.2);
        if x0 < x1 && y0 < y1 && z0 < z1 {
            Some(Self { min: (x0, y0, z0), max: (x1, y1, z1) })
        } else {
            None
        }
    }

    /// The union AABB of two boxes (used as the hull bridge box: the
    /// reference implementation computes the same min/max on every axis
    /// regardless of which axis has the largest centre separation).
    pub fn union_box(&self, other: &Aabb) -> Self {
        Self::new(
            (self.min.0.min(other.min.0), self.min.1.min(other.min.1), self.min.2.min(other.min.2)),
            (self.max.0.max(other.max.0), self.max.1.max(other.max.1), self.max.2.max(other.max.2)),
        )
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64, f64) {
        (
            (self.min.0 + self.max.0) / 2.0,
            (self.min.1 + self.max.1) / 2.0,
            (self.min.2 + self.max.2) / 2.0,
        )
    }

    /// Whether `other` fits entirely inside `self`, optionally ignoring one
    /// axis (used by the router's reachability prefilter, which excludes
    /// the port's own normal axis).
    pub fn contains(&self, other: &Aabb, exclude_axis: Option<usize>) -> bool {
        let axes = [
            (self.min.0, self.max.0, other.min.0, other.max.0),
            (self.min.1, self.max.1, other.min.1, other.max.1),
            (self.min.2, self.max.2, other.min.2, other.max.2),
        ];
        axes.iter().enumerate().all(|(i, &(smin, smax, omin, omax))| {
            Some(i) == exclude_axis || (smin <= omin && omax <= smax)
        })
    }

    /// Shrink the box inward by `amount` on every face.
    pub fn shrink(&self, amount: f64) -> Self {
        Self {
            min: (self.min.0 + amount, self.min.1 + amount, self.min.2 + amount),
            max: (self.max.0 - amount, self.max.1 - amount, self.max.2 - amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_shifts_both_corners() {
        let b = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let t = b.translate(1.0, 2.0, 3.0);
        assert_eq!(t.min, (1.0, 2.0, 3.0));
        assert_eq!(t.max, (2.0, 3.0, 4.0));
    }

    #[test]
    fn mirror_negates_and_resorts() {
        let b = Aabb::new((2.0, 0.0, 0.0), (5.0, 1.0, 1.0));
        let m = b.mirror(true, false, false);
        assert_eq!(m.min.0, -5.0);
        assert_eq!(m.max.0, -2.0);
    }

    #[test]
    fn intersect_requires_strict_overlap() {
        let a = Aabb::new((0.0, 0.0, 0.0), (1.0, 1.0, 1.0));
        let touching = Aabb::new((1.0, 0.0, 0.0), (2.0, 1.0, 1.0));
        assert!(a.intersect(&touching).is_none());
        let overlapping = Aabb::new((0.5, 0.0, 0.0), (2.0, 1.0, 1.0));
        assert!(a.intersect(&overlapping).is_some());
    }

    #[test]
    fn contains_respects_excluded_axis() {
        let outer = Aabb::new((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        let poking_out_on_x = Aabb::new((-1.0, 1.0, 1.0), (2.0, 2.0, 2.0));
        assert!(!outer.contains(&poking_out_on_x, None));
        assert!(outer.contains(&poking_out_on_x, Some(0)));
    }
}
