//! Connection points on a component's boundary.

use mfd_units::{IVec3, UnitScale};

/// What a port is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// Fluid/signal flows into the component through this port.
    In,
    /// Fluid/signal flows out of the component through this port.
    Out,
    /// The port carries traffic in either direction.
    InOut,
}

/// Which face of the component's bounding box a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceNormal {
    /// Outward normal `(+1, 0, 0)`.
    PosX,
    /// Outward normal `(-1, 0, 0)`.
    NegX,
    /// Outward normal `(0, +1, 0)`.
    PosY,
    /// Outward normal `(0, -1, 0)`.
    NegY,
    /// Outward normal `(0, 0, +1)`.
    PosZ,
    /// Outward normal `(0, 0, -1)`.
    NegZ,
}

impl SurfaceNormal {
    /// The unit outward-normal vector for this face.
    pub fn to_vector(self) -> IVec3 {
        match self {
            SurfaceNormal::PosX => (1, 0, 0),
            SurfaceNormal::NegX => (-1, 0, 0),
            SurfaceNormal::PosY => (0, 1, 0),
            SurfaceNormal::NegY => (0, -1, 0),
            SurfaceNormal::PosZ => (0, 0, 1),
            SurfaceNormal::NegZ => (0, 0, -1),
        }
    }
}

/// A connection point on a component's boundary, in the component's own
/// integer pixel/layer lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub(crate) name: String,
    kind: PortKind,
    position: IVec3,
    size: IVec3,
    surface_normal: SurfaceNormal,
}

impl Port {
    /// Construct a port. The name is assigned by the owning component when
    /// the port is added, so it starts empty here.
    pub fn new(kind: PortKind, position: IVec3, size: IVec3, surface_normal: SurfaceNormal) -> Self {
        Self { name: String::new(), kind, position, size, surface_normal }
    }

    /// The port's name, once it has been added to a component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether traffic flows in, out, or both ways.
    pub fn kind(&self) -> PortKind {
        self.kind
    }

    /// Position in the owning component's integer lattice.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// Extent in the owning component's integer lattice.
    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// The face of the bounding box this port opens onto.
    pub fn surface_normal(&self) -> SurfaceNormal {
        self.surface_normal
    }

    pub(crate) fn set_position(&mut self, position: IVec3) {
        self.position = position;
    }

    pub(crate) fn set_size(&mut self, size: IVec3) {
        self.size = size;
    }

    pub(crate) fn set_surface_normal(&mut self, normal: SurfaceNormal) {
        self.surface_normal = normal;
    }

    /// Bounding box of this port in millimetres, expressed in `target`'s
    /// unit system after conversion from `own`'s.
    pub fn bounding_box_mm(&self, own: UnitScale, target: UnitScale) -> (f64, f64, f64, f64, f64, f64) {
        let (px, py, pz) = self.position;
        let (sx, sy, sz) = self.size;
        let x0 = own.convert_px(&target, px as f64);
        let y0 = own.convert_px(&target, py as f64);
        let z0 = own.convert_layer(&target, pz as f64);
        let x1 = own.convert_px(&target, (px + sx) as f64);
        let y1 = own.convert_px(&target, (py + sy) as f64);
        let z1 = own.convert_layer(&target, (pz + sz) as f64);
        (x0, y0, z0, x1, y1, z1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_vector_matches_face() {
        assert_eq!(SurfaceNormal::PosX.to_vector(), (1, 0, 0));
        assert_eq!(SurfaceNormal::NegZ.to_vector(), (0, 0, -1));
    }

    #[test]
    fn bounding_box_converts_units() {
        let port = Port::new(PortKind::In, (0, 0, 0), (10, 10, 1), SurfaceNormal::PosX);
        let own = UnitScale::new(0.01, 0.05);
        let target = UnitScale::new(0.02, 0.05);
        let bbox = port.bounding_box_mm(own, target);
        assert_eq!(bbox.3, 5.0);
    }
}
