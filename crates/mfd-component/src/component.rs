//! The component tree: named shapes, ports, subcomponents, and the
//! transforms that move them together.

use std::collections::HashMap;

use mfd_geom::Shape;
use mfd_settings::{ExposureSettings, MembraneSettings, PositionSettings, SecondaryDoseSettings};
use mfd_units::{Color, IVec3, UnitScale};

use crate::error::{ComponentError, Result};
use crate::port::{Port, PortKind, SurfaceNormal};

/// A regional override, scoped to a shape, layered over a component's
/// defaults. Two entries of the same kind may not overlap.
#[derive(Debug, Clone)]
pub enum RegionalSettings {
    /// Per-layer platform-motion override.
    Position(PositionSettings),
    /// Per-layer exposure override.
    Exposure(ExposureSettings),
    /// Membrane-support override.
    Membrane(MembraneSettings),
    /// Secondary-dose (edge/roof) override.
    SecondaryDose(SecondaryDoseSettings),
}

impl RegionalSettings {
    fn kind_tag(&self) -> &'static str {
        match self {
            RegionalSettings::Position(_) => "position",
            RegionalSettings::Exposure(_) => "exposure",
            RegionalSettings::Membrane(_) => "membrane",
            RegionalSettings::SecondaryDose(_) => "secondary_dose",
        }
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.is_empty() && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A node in the device tree: owns shapes, ports, subcomponents, and the
/// settings that govern how its region of the device prints.
#[derive(Clone)]
pub struct Component {
    name: Option<String>,
    units: UnitScale,
    size: IVec3,
    position: IVec3,
    hide_in_render: bool,
    subtract_bounding_box: bool,
    layer_groups: Option<Vec<(u32, f64)>>,

    pending_translation: IVec3,
    rotation: i32,
    mirroring: (bool, bool),

    shapes: HashMap<String, Shape>,
    bulk_shapes: HashMap<String, Shape>,
    ports: HashMap<String, Port>,
    subcomponents: HashMap<String, Component>,
    labels: HashMap<String, Color>,
    regional_settings: HashMap<String, (Shape, RegionalSettings)>,

    default_exposure_settings: Option<ExposureSettings>,
    default_position_settings: Option<PositionSettings>,
    burnin_settings: Option<ExposureSettings>,
}

impl Component {
    /// Construct an empty component with a given lattice extent and unit
    /// system. `px_size`/`layer_size` default to 0.0076 mm and 0.01 mm.
    pub fn new(size: IVec3) -> Self {
        Self {
            name: None,
            units: UnitScale::new(0.0076, 0.01),
            size,
            position: (0, 0, 0),
            hide_in_render: false,
            subtract_bounding_box: false,
            layer_groups: None,
            pending_translation: (0, 0, 0),
            rotation: 0,
            mirroring: (false, false),
            shapes: HashMap::new(),
            bulk_shapes: HashMap::new(),
            ports: HashMap::new(),
            subcomponents: HashMap::new(),
            labels: HashMap::new(),
            regional_settings: HashMap::new(),
            default_exposure_settings: None,
            default_position_settings: None,
            burnin_settings: None,
        }
    }

    /// Override the unit system (defaults to 0.0076mm px / 0.01mm layer).
    pub fn with_units(mut self, units: UnitScale) -> Self {
        self.units = units;
        self
    }

    /// Hide this component's shapes from preview renders while keeping them
    /// in the print job.
    pub fn hide_in_render(mut self, hide: bool) -> Self {
        self.hide_in_render = hide;
        self
    }

    /// Whether this component's world AABB is cut out of its parent's bulk
    /// when it's placed as a subcomponent, instead of relying solely on its
    /// own void shapes.
    pub fn subtract_bounding_box(mut self, subtract: bool) -> Self {
        self.subtract_bounding_box = subtract;
        self
    }

    /// Whether this component's world AABB should be cut from its parent's
    /// bulk when slicing.
    pub fn wants_bounding_box_subtracted(&self) -> bool {
        self.subtract_bounding_box
    }

    /// Mark this component as having non-uniform per-layer thickness,
    /// read-top-down as `(repeat_count, layer_size_mm)` groups. Set by
    /// `VariableLayerThicknessComponent::new` so the grouping survives once
    /// the inner component is placed into the tree.
    pub fn set_layer_groups(&mut self, groups: Vec<(u32, f64)>) {
        self.layer_groups = Some(groups);
    }

    /// This component's non-uniform layer-thickness groups, if any.
    pub fn layer_groups(&self) -> Option<&[(u32, f64)]> {
        self.layer_groups.as_deref()
    }

    /// This component's own name, set by its parent on `add_subcomponent`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set this component's own name directly. Used for root components
    /// (devices), which have no parent to assign a name on `add_subcomponent`.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// The unit system this component's lattice is expressed in.
    pub fn units(&self) -> UnitScale {
        self.units
    }

    /// Lattice extent.
    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// Position relative to the parent's lattice.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// This component's bounding box in millimetres, in its own unit
    /// system.
    pub fn bounding_box_mm(&self) -> (f64, f64, f64, f64, f64, f64) {
        let (x, y, z) = self.position;
        let (sx, sy, sz) = self.size;
        (
            self.units.px_to_mm(x as f64),
            self.units.px_to_mm(y as f64),
            self.units.layer_to_mm(z as f64),
            self.units.px_to_mm((x + sx) as f64),
            self.units.px_to_mm((y + sy) as f64),
            self.units.layer_to_mm((z + sz) as f64),
        )
    }

    /// Named shapes this component owns directly (not bulk, not
    /// subcomponents).
    pub fn shapes(&self) -> &HashMap<String, Shape> {
        &self.shapes
    }

    /// Bulk shapes (excluded from per-shape regional accounting).
    pub fn bulk_shapes(&self) -> &HashMap<String, Shape> {
        &self.bulk_shapes
    }

    /// Ports, keyed by name.
    pub fn ports(&self) -> &HashMap<String, Port> {
        &self.ports
    }

    /// Direct subcomponents, keyed by name.
    pub fn subcomponents(&self) -> &HashMap<String, Component> {
        &self.subcomponents
    }

    /// Label -> display color map.
    pub fn labels(&self) -> &HashMap<String, Color> {
        &self.labels
    }

    /// Regional setting overrides, keyed by name: each entry pairs the
    /// region's mask shape with the settings layered over it.
    pub fn regional_settings(&self) -> &HashMap<String, (Shape, RegionalSettings)> {
        &self.regional_settings
    }

    fn name_taken(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
            || self.bulk_shapes.contains_key(name)
            || self.ports.contains_key(name)
            || self.subcomponents.contains_key(name)
            || self.labels.contains_key(name)
            || self.regional_settings.contains_key(name)
    }

    fn validate_name(&self, name: &str) -> Result<()> {
        if !is_valid_identifier(name) {
            return Err(ComponentError::InvalidIdentifier(name.to_string()));
        }
        if self.name_taken(name) {
            return Err(ComponentError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    /// Register a label with a display color. Fails if the name collides
    /// with any other slot in this component.
    pub fn add_label(&mut self, name: &str, color: Color) -> Result<()> {
        self.validate_name(name)?;
        self.labels.insert(name.to_string(), color);
        Ok(())
    }

    /// Register several labels at once.
    pub fn add_labels(&mut self, labels: impl IntoIterator<Item = (String, Color)>) -> Result<()> {
        for (name, color) in labels {
            self.add_label(&name, color)?;
        }
        Ok(())
    }

    fn add_named_shape(
        &mut self,
        map_is_bulk: bool,
        name: &str,
        mut shape: Shape,
        label: Option<&str>,
    ) -> Result<()> {
        self.validate_name(name)?;
        if let Some(label) = label {
            if !self.labels.contains_key(label) {
                return Err(ComponentError::LabelNotFound(label.to_string()));
            }
            shape.meta_mut().label = Some(label.to_string());
            shape.meta_mut().color = Some(self.labels[label]);
        }
        shape.meta_mut().name = Some(name.to_string());
        if map_is_bulk {
            self.bulk_shapes.insert(name.to_string(), shape);
        } else {
            self.shapes.insert(name.to_string(), shape);
        }
        Ok(())
    }

    /// Add a void (subtracted material) shape, owned by this component.
    pub fn add_void(&mut self, name: &str, shape: Shape, label: Option<&str>) -> Result<()> {
        self.add_named_shape(false, name, shape, label)
    }

    /// Add a bulk shape: excluded from per-shape regional-settings
    /// accounting but otherwise identical to a void.
    pub fn add_bulk(&mut self, name: &str, shape: Shape, label: Option<&str>) -> Result<()> {
        self.add_named_shape(true, name, shape, label)
    }

    /// Add a connection port on this component's boundary.
    pub fn add_port(&mut self, name: &str, mut port: Port) -> Result<()> {
        self.validate_name(name)?;
        port.name = name.to_string();
        self.ports.insert(name.to_string(), port);
        Ok(())
    }

    /// Set this component's default per-layer exposure settings.
    pub fn add_default_exposure_settings(&mut self, settings: ExposureSettings) {
        self.default_exposure_settings = Some(settings);
    }

    /// Set this component's default per-layer platform-motion settings.
    pub fn add_default_position_settings(&mut self, settings: PositionSettings) {
        self.default_position_settings = Some(settings);
    }

    /// Override the exposure used for the device's burn-in (first) layer.
    pub fn set_burn_in_exposure(&mut self, settings: ExposureSettings) {
        self.burnin_settings = Some(settings);
    }

    /// This component's own default exposure settings, if set directly
    /// (as opposed to inherited from a parent or the top-level config).
    pub fn own_default_exposure_settings(&self) -> Option<&ExposureSettings> {
        self.default_exposure_settings.as_ref()
    }

    /// This component's own default position settings, if set directly.
    pub fn own_default_position_settings(&self) -> Option<&PositionSettings> {
        self.default_position_settings.as_ref()
    }

    /// Per-layer burn-in exposure overrides, one entry per leading layer.
    pub fn burnin_settings(&self) -> Option<&ExposureSettings> {
        self.burnin_settings.as_ref()
    }

    /// Layer the given regional settings over the region covered by
    /// `shape`. Fails if the region overlaps an existing entry of the same
    /// kind.
    pub fn add_regional_settings(&mut self, name: &str, shape: Shape, settings: RegionalSettings) -> Result<()> {
        self.validate_name(name)?;
        let kind = settings.kind_tag();
        for (existing_name, (existing_shape, existing_settings)) in &self.regional_settings {
            if existing_settings.kind_tag() != kind {
                continue;
            }
            if !shape.intersect(existing_shape).solid().is_empty() {
                return Err(ComponentError::RegionalOverlap {
                    new: name.to_string(),
                    existing: existing_name.clone(),
                });
            }
        }
        self.regional_settings.insert(name.to_string(), (shape, settings));
        Ok(())
    }

    /// Add a fully-built subcomponent. Every label key and every owned
    /// shape's label is promoted by prefixing it with `{name}.`, recursing
    /// into the child's own subcomponents.
    pub fn add_subcomponent(&mut self, name: &str, mut child: Component) -> Result<()> {
        self.validate_name(name)?;
        child.name = Some(name.to_string());
        promote_labels(&mut child, name);
        self.subcomponents.insert(name.to_string(), child);
        Ok(())
    }

    /// Rename a label, or a directly-owned shape's label, found by walking
    /// a dotted path into subcomponents.
    pub fn relabel(&mut self, path: &str, new_label: &str) -> Result<()> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let leaf = segments.pop().ok_or_else(|| ComponentError::NotFound(path.to_string()))?;
        let mut target = self;
        for seg in segments {
            target = target
                .subcomponents
                .get_mut(seg)
                .ok_or_else(|| ComponentError::NotFound(seg.to_string()))?;
        }
        if let Some(color) = target.labels.remove(leaf) {
            target.labels.insert(new_label.to_string(), color);
            for shape in target.shapes.values_mut().chain(target.bulk_shapes.values_mut()) {
                if shape.meta().label.as_deref() == Some(leaf) {
                    shape.meta_mut().label = Some(new_label.to_string());
                }
            }
            return Ok(());
        }
        if let Some(shape) = target.shapes.get_mut(leaf).or_else(|| target.bulk_shapes.get_mut(leaf)) {
            shape.meta_mut().label = Some(new_label.to_string());
            return Ok(());
        }
        Err(ComponentError::NotFound(path.to_string()))
    }

    /// Mark two ports, anywhere in the tree, as connected to each other.
    /// Connection bookkeeping is the router's job; here we only validate
    /// that both paths resolve to real ports.
    pub fn connect_port(&self, a: &str, b: &str) -> Result<()> {
        self.resolve_port(a)?;
        self.resolve_port(b)?;
        Ok(())
    }

    fn resolve_port(&self, path: &str) -> Result<&Port> {
        self.find_port(path).ok_or_else(|| ComponentError::NotFound(path.to_string()))
    }

    /// Resolve a dotted path (`"inlet.mixer.outlet"`) to a port anywhere
    /// in this component's subtree.
    pub fn find_port(&self, path: &str) -> Option<&Port> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let leaf = segments.pop()?;
        let mut target = self;
        for seg in segments {
            target = target.subcomponents.get(seg)?;
        }
        target.ports.get(leaf)
    }

    /// Resolve a dotted path to a subcomponent anywhere in this
    /// component's subtree. An empty path resolves to `self`.
    pub fn find_component(&self, path: &str) -> Option<&Component> {
        let mut target = self;
        if path.is_empty() {
            return Some(target);
        }
        for seg in path.split('.') {
            target = target.subcomponents.get(seg)?;
        }
        Some(target)
    }

    /// Queue a translation to be applied once this component is parented
    /// (see `run_translate`).
    pub fn translate(&mut self, dx: i64, dy: i64, dz: i64) {
        self.pending_translation = (
            self.pending_translation.0 + dx,
            self.pending_translation.1 + dy,
            self.pending_translation.2 + dz,
        );
    }

    /// Apply the queued translation, converting it from `parent_units` into
    /// this component's own unit system, and propagate it to every owned
    /// shape, port, subcomponent, and regional-settings shape.
    pub fn run_translate(&mut self, parent_units: UnitScale) {
        let (dx, dy, dz) = self.pending_translation;
        self.pending_translation = (0, 0, 0);
        if dx == 0 && dy == 0 && dz == 0 {
            return;
        }
        let dx = parent_units.convert_px(&self.units, dx as f64).round() as i64;
        let dy = parent_units.convert_px(&self.units, dy as f64).round() as i64;
        let dz = parent_units.convert_layer(&self.units, dz as f64).round() as i64;
        self.translate_self(dx, dy, dz);
    }

    fn translate_self(&mut self, dx: i64, dy: i64, dz: i64) {
        self.position = (self.position.0 + dx, self.position.1 + dy, self.position.2 + dz);
        let dxf = self.units.px_to_mm(dx as f64);
        let dyf = self.units.px_to_mm(dy as f64);
        let dzf = self.units.layer_to_mm(dz as f64);
        for shape in self.shapes.values_mut().chain(self.bulk_shapes.values_mut()) {
            *shape = shape.translate(dxf, dyf, dzf);
        }
        for (shape, _) in self.regional_settings.values_mut() {
            *shape = shape.translate(dxf, dyf, dzf);
        }
        for port in self.ports.values_mut() {
            let (px, py, pz) = port.position();
            port.set_position((px + dx, py + dy, pz + dz));
        }
        for child in self.subcomponents.values_mut() {
            child.translate(dx, dy, dz);
            let units = self.units;
            child.run_translate(units);
        }
    }

    /// Rotate this component (and everything it owns) by a multiple of 90
    /// degrees about the Z axis. If `in_place`, the component is translated
    /// to the origin, rotated, then translated back so its footprint stays
    /// anchored at its prior position.
    pub fn rotate(&mut self, degrees: i32, in_place: bool) -> Result<()> {
        if degrees % 90 != 0 {
            return Err(ComponentError::RotationNotMultipleOf90(degrees));
        }
        let normalized = degrees.rem_euclid(360);
        if normalized == 0 {
            return Ok(());
        }
        let origin = self.position;
        if in_place {
            self.position = (0, 0, 0);
        }
        let radians = degrees as f64;
        for shape in self.shapes.values_mut().chain(self.bulk_shapes.values_mut()) {
            *shape = shape.rotate(0.0, 0.0, radians);
        }
        for (shape, _) in self.regional_settings.values_mut() {
            *shape = shape.rotate(0.0, 0.0, radians);
        }
        let (sx, sy, sz) = self.size;
        let new_size = match normalized {
            90 | 270 => (sy, sx, sz),
            _ => (sx, sy, sz),
        };
        for port in self.ports.values_mut() {
            rotate_port(port, normalized, (sx, sy));
        }
        for child in self.subcomponents.values_mut() {
            child.rotate(degrees, true)?;
        }
        self.size = new_size;
        self.rotation = (self.rotation + normalized).rem_euclid(360);
        if in_place {
            self.position = origin;
        }
        Ok(())
    }

    /// Mirror this component about the planes flagged true. A double
    /// mirror (both axes) collapses to a 180 degree rotation, matching the
    /// authored contract's treatment of `mirror(true, true)`.
    pub fn mirror(&mut self, mx: bool, my: bool, in_place: bool) -> Result<()> {
        if mx && my {
            return self.rotate(180, in_place);
        }
        if !mx && !my {
            return Ok(());
        }
        let origin = self.position;
        if in_place {
            self.position = (0, 0, 0);
        }
        for shape in self.shapes.values_mut().chain(self.bulk_shapes.values_mut()) {
            *shape = shape.mirror(mx, my, false);
        }
        for (shape, _) in self.regional_settings.values_mut() {
            *shape = shape.mirror(mx, my, false);
        }
        let (sx, sy, _) = self.size;
        for port in self.ports.values_mut() {
            mirror_port(port, mx, my, (sx, sy));
        }
        for child in self.subcomponents.values_mut() {
            child.mirror(mx, my, true)?;
        }
        self.mirroring = (self.mirroring.0 ^ mx, self.mirroring.1 ^ my);
        if in_place {
            self.position = origin;
        }
        Ok(())
    }
}

/// Recursively prefix every label key and every owned shape's label with
/// `{prefix}.`, so a relabel or render-color lookup performed from the
/// parent's scope resolves through the child's namespace.
fn promote_labels(component: &mut Component, prefix: &str) {
    let old: Vec<String> = component.labels.keys().cloned().collect();
    for key in old {
        let color = component.labels.remove(&key).expect("key just read");
        component.labels.insert(format!("{prefix}.{key}"), color);
    }
    for shape in component.shapes.values_mut().chain(component.bulk_shapes.values_mut()) {
        if let Some(label) = &shape.meta().label {
            let promoted = format!("{prefix}.{label}");
            shape.meta_mut().label = Some(promoted);
        }
    }
    let names: Vec<String> = component.subcomponents.keys().cloned().collect();
    for name in names {
        let child = component.subcomponents.get_mut(&name).expect("key just read");
        promote_labels(child, &format!("{prefix}.{name}"));
    }
}

/// Position rule: 90 -> (-y, x); 180 -> (-x, -y); 270 -> (y, -x).
fn rotate_port(port: &mut Port, degrees: i32, size: (i64, i64)) {
    let (px, py, pz) = port.position();
    let (new_px, new_py) = match degrees {
        90 => (-py, px),
        180 => (-px, -py),
        270 => (py, -px),
        _ => (px, py),
    };
    port.set_position((new_px, new_py, pz));

    let normal = port.surface_normal();
    let (new_normal, shift): (SurfaceNormal, (i64, i64)) = match (degrees, normal) {
        (90, SurfaceNormal::PosX) => (SurfaceNormal::PosY, (-1, 0)),
        (90, SurfaceNormal::PosY) => (SurfaceNormal::NegX, (0, 0)),
        (90, SurfaceNormal::NegX) => (SurfaceNormal::NegY, (-1, 0)),
        (90, SurfaceNormal::NegY) => (SurfaceNormal::PosX, (0, 0)),
        (180, SurfaceNormal::PosX) => (SurfaceNormal::NegX, (0, -1)),
        (180, SurfaceNormal::PosY) => (SurfaceNormal::NegY, (-1, 0)),
        (180, SurfaceNormal::NegX) => (SurfaceNormal::PosX, (0, -1)),
        (180, SurfaceNormal::NegY) => (SurfaceNormal::PosY, (-1, 0)),
        (270, SurfaceNormal::PosX) => (SurfaceNormal::NegY, (0, 0)),
        (270, SurfaceNormal::PosY) => (SurfaceNormal::PosX, (0, -1)),
        (270, SurfaceNormal::NegX) => (SurfaceNormal::PosY, (0, 0)),
        (270, SurfaceNormal::NegY) => (SurfaceNormal::NegX, (0, -1)),
        (_, other) => (other, (0, 0)),
    };
    port.set_surface_normal(new_normal);

    // Z-normal ports keep their face but still shift with the footprint
    // rotation, since the footprint's (x, y) extents swap at 90/270.
    let (px, py, pz) = port.position();
    if matches!(normal, SurfaceNormal::PosZ | SurfaceNormal::NegZ) {
        let (dx, dy) = z_normal_shift(degrees, size);
        port.set_position((px + dx, py + dy, pz));
        return;
    }
    let (sx, sy) = size;
    let (px, py, pz) = port.position();
    port.set_position((px + shift.0 * sx, py + shift.1 * sy, pz));
}

/// Ports with a Z-facing surface normal don't swap face, but the footprint
/// underneath them still rotates; this is the documented supplement beyond
/// the XY port table.
fn z_normal_shift(degrees: i32, size: (i64, i64)) -> (i64, i64) {
    let (sx, sy) = size;
    match degrees {
        90 => (0, sx),
        180 => (-sx, -sy),
        270 => (sy, 0),
        _ => (0, 0),
    }
}

fn mirror_port(port: &mut Port, mx: bool, my: bool, size: (i64, i64)) {
    let (sx, sy) = size;
    let (px, py, pz) = port.position();
    let (psx, psy, _) = port.size();
    let mut new_px = px;
    let mut new_py = py;
    if mx {
        new_px = sx - px - psx;
    }
    if my {
        new_py = sy - py - psy;
    }
    port.set_position((new_px, new_py, pz));

    let normal = port.surface_normal();
    let new_normal = match (mx, my, normal) {
        (true, _, SurfaceNormal::PosX) => SurfaceNormal::NegX,
        (true, _, SurfaceNormal::NegX) => SurfaceNormal::PosX,
        (_, true, SurfaceNormal::PosY) => SurfaceNormal::NegY,
        (_, true, SurfaceNormal::NegY) => SurfaceNormal::PosY,
        (_, _, other) => other,
    };
    port.set_surface_normal(new_normal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_is_rejected() {
        let mut c = Component::new((10, 10, 10));
        c.add_label("red_ink", Color::from_rgba(255, 0, 0, 255)).unwrap();
        let err = c.add_label("red_ink", Color::from_rgba(0, 255, 0, 255));
        assert!(matches!(err, Err(ComponentError::NameConflict(_))));
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let mut c = Component::new((10, 10, 10));
        let err = c.add_label("9bad", Color::from_rgba(1, 1, 1, 255));
        assert!(matches!(err, Err(ComponentError::InvalidIdentifier(_))));
    }

    #[test]
    fn add_subcomponent_promotes_labels() {
        let mut child = Component::new((5, 5, 5));
        child.add_label("channel", Color::from_rgba(1, 2, 3, 255)).unwrap();
        let mut parent = Component::new((10, 10, 10));
        parent.add_subcomponent("inlet", child).unwrap();
        let promoted = parent.subcomponents.get("inlet").unwrap();
        assert!(promoted.labels.contains_key("inlet.channel"));
    }

    #[test]
    fn rotate_rejects_non_multiple_of_90() {
        let mut c = Component::new((10, 10, 10));
        let err = c.rotate(45, false);
        assert!(matches!(err, Err(ComponentError::RotationNotMultipleOf90(45))));
    }

    #[test]
    fn rotate_90_swaps_footprint() {
        let mut c = Component::new((10, 20, 5));
        c.rotate(90, false).unwrap();
        assert_eq!(c.size(), (20, 10, 5));
    }

    #[test]
    fn double_mirror_collapses_to_180_rotation() {
        let mut a = Component::new((10, 20, 5));
        let mut b = Component::new((10, 20, 5));
        a.mirror(true, true, false).unwrap();
        b.rotate(180, false).unwrap();
        assert_eq!(a.size(), b.size());
    }

    #[test]
    fn regional_settings_overlap_is_rejected() {
        let mut c = Component::new((100, 100, 10));
        let a = Shape::cube(10.0, 10.0, 10.0, false, true);
        let b = Shape::cube(10.0, 10.0, 10.0, false, true);
        c.add_regional_settings(
            "dose_a",
            a,
            RegionalSettings::Exposure(ExposureSettings::default()),
        )
        .unwrap();
        let err = c.add_regional_settings(
            "dose_b",
            b,
            RegionalSettings::Exposure(ExposureSettings::default()),
        );
        assert!(matches!(err, Err(ComponentError::RegionalOverlap { .. })));
    }
}
