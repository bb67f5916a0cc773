//! R-tree index over the three keepout categories a router tracks:
//! sub-component footprints, port bounding boxes, and shape-derived
//! keepouts.

use rstar::{RTree, RTreeObject, AABB};

/// Which category a keepout entry came from, for bookkeeping when the
/// cache revalidates a previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepoutKind {
    /// A sub-component's own bounding box.
    Subcomponent,
    /// A port's bounding box, expanded by the channel margin.
    Port,
    /// A keepout AABB carried by one of the component's shapes.
    Shape,
}

/// One entry in the keepout index: an axis-aligned box, tagged with the
/// key it was inserted under (a subcomponent/port name or a
/// `"{shape}_{i}"` key) so it can be found again and removed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepoutEntry {
    /// The key this entry is filed under (port name, subcomponent name, or
    /// `shape_keepoutindex`).
    pub key: String,
    /// Which category this entry belongs to.
    pub kind: KeepoutKind,
    /// The box itself, already expanded by the router's channel margin
    /// where the source calls for it.
    pub bbox: (f64, f64, f64, f64, f64, f64),
}

impl RTreeObject for KeepoutEntry {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        let (x0, y0, z0, x1, y1, z1) = self.bbox;
        AABB::from_corners([x0, y0, z0], [x1, y1, z1])
    }
}

/// Expand a bounding box by a margin on every side.
pub fn add_margin(bbox: (f64, f64, f64, f64, f64, f64), margin: (f64, f64, f64)) -> (f64, f64, f64, f64, f64, f64) {
    let (x0, y0, z0, x1, y1, z1) = bbox;
    let (mx, my, mz) = margin;
    (x0 - mx, y0 - my, z0 - mz, x1 + mx, y1 + my, z1 + mz)
}

/// Whether two boxes intersect (open-interval test: touching faces don't
/// count as intersecting).
pub fn intersects(a: (f64, f64, f64, f64, f64, f64), b: (f64, f64, f64, f64, f64, f64)) -> bool {
    let (x0a, y0a, z0a, x1a, y1a, z1a) = a;
    let (x0b, y0b, z0b, x1b, y1b, z1b) = b;
    !(x1a <= x0b || x1b <= x0a || y1a <= y0b || y1b <= y0a || z1a <= z0b || z1b <= z0a)
}

/// Whether `inner` fits entirely inside `outer`, optionally ignoring the
/// axis indicated by a nonzero component of `exclude_axis` (used for the
/// port reachability prefilter, which can't constrain the axis the port
/// itself pokes through).
pub fn is_inside(
    inner: (f64, f64, f64, f64, f64, f64),
    outer: (f64, f64, f64, f64, f64, f64),
    exclude_axis: Option<(i64, i64, i64)>,
) -> bool {
    let (x0i, y0i, z0i, x1i, y1i, z1i) = inner;
    let (x0o, y0o, z0o, x1o, y1o, z1o) = outer;
    if let Some(axis) = exclude_axis {
        if axis.0 != 0 {
            return y0o <= y0i && y1i <= y1o && z0o <= z0i && z1i <= z1o;
        } else if axis.1 != 0 {
            return x0o <= x0i && x1i <= x1o && z0o <= z0i && z1i <= z1o;
        } else if axis.2 != 0 {
            return x0o <= x0i && x1i <= x1o && y0o <= y0i && y1i <= y1o;
        }
    }
    x0o <= x0i && x1i <= x1o && y0o <= y0i && y1i <= y1o && z0o <= z0i && z1i <= z1o
}

/// The R-tree of keepout entries, plus the port-name -> entries map used to
/// remove and reinsert a port's own keepouts around routing.
#[derive(Default)]
pub struct KeepoutIndex {
    tree: RTree<KeepoutEntry>,
}

impl KeepoutIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert one keepout entry.
    pub fn insert(&mut self, entry: KeepoutEntry) {
        self.tree.insert(entry);
    }

    /// Remove every entry filed under `key`, returning them so they can be
    /// reinserted later.
    pub fn remove_by_key(&mut self, key: &str) -> Vec<KeepoutEntry> {
        let matches: Vec<KeepoutEntry> =
            self.tree.iter().filter(|e| e.key == key).cloned().collect();
        for entry in &matches {
            self.tree.remove(entry);
        }
        matches
    }

    /// Whether a 1-pixel-shrunk version of `bbox` intersects anything in
    /// the index.
    pub fn shrunk_box_is_clear(&self, bbox: (f64, f64, f64, f64, f64, f64)) -> bool {
        let (x0, y0, z0, x1, y1, z1) = bbox;
        let shrunk = (x0 + 1.0, y0 + 1.0, z0 + 1.0, x1 - 1.0, y1 - 1.0, z1 - 1.0);
        let (sx0, sy0, sz0, sx1, sy1, sz1) = shrunk;
        if sx1 <= sx0 || sy1 <= sy0 || sz1 <= sz0 {
            return self.tree.locate_in_envelope_intersecting(&AABB::from_corners(
                [x0, y0, z0],
                [x1, y1, z1],
            )).next().is_none();
        }
        let envelope = AABB::from_corners([sx0, sy0, sz0], [sx1, sy1, sz1]);
        self.tree.locate_in_envelope_intersecting(&envelope).next().is_none()
    }

    /// Number of entries currently indexed.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_detects_overlap_and_touching() {
        assert!(intersects((0.0, 0.0, 0.0, 2.0, 2.0, 2.0), (1.0, 1.0, 1.0, 3.0, 3.0, 3.0)));
        assert!(!intersects((0.0, 0.0, 0.0, 1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 2.0, 2.0, 2.0)));
    }

    #[test]
    fn is_inside_respects_excluded_axis() {
        let inner = (0.0, 0.0, -5.0, 1.0, 1.0, 0.0);
        let outer = (0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        assert!(!is_inside(inner, outer, None));
        assert!(is_inside(inner, outer, Some((0, 0, 1))));
    }

    #[test]
    fn remove_by_key_clears_only_matching_entries() {
        let mut idx = KeepoutIndex::new();
        idx.insert(KeepoutEntry { key: "a".into(), kind: KeepoutKind::Port, bbox: (0.0, 0.0, 0.0, 1.0, 1.0, 1.0) });
        idx.insert(KeepoutEntry { key: "b".into(), kind: KeepoutKind::Port, bbox: (5.0, 5.0, 5.0, 6.0, 6.0, 6.0) });
        let removed = idx.remove_by_key("a");
        assert_eq!(removed.len(), 1);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn shrunk_box_is_clear_detects_neighbouring_keepout() {
        let mut idx = KeepoutIndex::new();
        idx.insert(KeepoutEntry { key: "a".into(), kind: KeepoutKind::Shape, bbox: (5.0, 5.0, 5.0, 10.0, 10.0, 10.0) });
        assert!(idx.shrunk_box_is_clear((0.0, 0.0, 0.0, 3.0, 3.0, 3.0)));
        assert!(!idx.shrunk_box_is_clear((4.0, 4.0, 4.0, 8.0, 8.0, 8.0)));
    }
}
