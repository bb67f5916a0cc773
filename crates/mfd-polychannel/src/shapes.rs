//! Sparse, user-facing entry types: each field left `None` inherits from
//! the previous entry (or a type-specific default for the first entry).

/// Which primitive a polychannel cross-section is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// Axis-aligned box.
    Cube,
    /// Sphere/ellipsoid.
    Sphere,
    /// Box with spherical corner fillets.
    RoundedCube,
}

/// A single cross-section in a polychannel, with every field optional
/// except where the first-entry/subsequent-entry defaulting rules require
/// it (enforced at resolution time, not construction time).
#[derive(Debug, Clone, Default)]
pub struct SparseShape {
    /// Cross-section primitive; defaults to the previous entry's.
    pub shape_type: Option<ShapeType>,
    /// Position `(x, y, z)`; defaults to the previous entry's position.
    pub position: Option<(f64, f64, f64)>,
    /// Extent `(x, y, z)`; defaults to the previous entry's size.
    pub size: Option<(f64, f64, f64)>,
    /// Corner-fillet radii for a rounded cube.
    pub rounded_cube_radius: Option<(f64, f64, f64)>,
    /// Euler rotation in degrees; defaults to the previous entry's.
    pub rotation: Option<(f64, f64, f64)>,
    /// Whether `position` is absolute or relative to the previous entry.
    /// Defaults to `false` (relative) for all but the first entry.
    pub absolute_position: Option<bool>,
    /// Radius of the arc inserted at this corner; `0` means no rounding.
    pub corner_radius: Option<f64>,
    /// Sample count along this corner's arc.
    pub corner_segments: Option<u32>,
    /// Tessellation segment count override for this entry's primitive.
    pub segments: Option<u32>,
}

impl SparseShape {
    /// Start building a sparse shape entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shape type.
    pub fn shape_type(mut self, shape_type: ShapeType) -> Self {
        self.shape_type = Some(shape_type);
        self
    }

    /// Set the position.
    pub fn position(mut self, position: (f64, f64, f64)) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the size.
    pub fn size(mut self, size: (f64, f64, f64)) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the rounded-cube fillet radii.
    pub fn rounded_cube_radius(mut self, radius: (f64, f64, f64)) -> Self {
        self.rounded_cube_radius = Some(radius);
        self
    }

    /// Set the rotation.
    pub fn rotation(mut self, rotation: (f64, f64, f64)) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Mark the position as absolute (default is relative to the previous
    /// entry).
    pub fn absolute(mut self) -> Self {
        self.absolute_position = Some(true);
        self
    }

    /// Set this corner's fillet radius.
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Set this corner's arc sample count.
    pub fn corner_segments(mut self, segments: u32) -> Self {
        self.corner_segments = Some(segments);
        self
    }

    /// Override the tessellation segment count for this entry.
    pub fn segments(mut self, segments: u32) -> Self {
        self.segments = Some(segments);
        self
    }
}

/// A Bezier-interpolated run of cross-sections between the previous entry
/// and this entry's resolved endpoint.
#[derive(Debug, Clone)]
pub struct BezierShape {
    /// Interior control points (not including the implicit start/end).
    pub control_points: Vec<(f64, f64, f64)>,
    /// Number of cross-sections to sample along the curve.
    pub bezier_segments: u32,
    /// The endpoint entry's own sparse fields (shape type, size, position
    /// of the curve's end, etc.)
    pub sparse: SparseShape,
}

/// One entry in a polychannel's shape list.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A single cross-section.
    Shape(SparseShape),
    /// A Bezier-interpolated run of cross-sections.
    Bezier(BezierShape),
}

impl From<SparseShape> for Entry {
    fn from(shape: SparseShape) -> Self {
        Entry::Shape(shape)
    }
}

impl From<BezierShape> for Entry {
    fn from(shape: BezierShape) -> Self {
        Entry::Bezier(shape)
    }
}
