//! Small, hardcoded device trees used to exercise the facade end to end.
//!
//! These stand in for the device-description scripts a real user would
//! write against this crate: there is no serialized file format here to
//! load, so the CLI bundles a couple of fixtures directly.

use anyhow::Result;
use mfd::{Component, Device, Entry, Polychannel, Port, PortKind, Shape, ShapeType, SparseShape, SurfaceNormal};

/// A single straight channel cut through a slab, with an inlet and outlet
/// port on opposite faces.
pub fn straight_channel(layers: u32, layer_size: f64) -> Result<Component> {
    let mut device = Device::visitech_lrs10("straight-channel", layers, layer_size);
    let root = device.root_mut();

    let (w, h) = (400i64, 200i64);
    root.add_bulk("slab", Shape::cube(w as f64, h as f64, layers as f64, false, true), None)?;

    let channel = Polychannel::build(
        vec![
            Entry::Shape(
                SparseShape::new()
                    .shape_type(ShapeType::RoundedCube)
                    .position((40.0, (h / 2) as f64, (layers / 2) as f64))
                    .size((10.0, 10.0, layers as f64 * 2.0))
                    .rounded_cube_radius((2.0, 2.0, 0.0))
                    .absolute(),
            ),
            Entry::Shape(
                SparseShape::new()
                    .position(((w - 40) as f64, (h / 2) as f64, (layers / 2) as f64))
                    .absolute(),
            ),
        ],
        false,
    )?;
    root.add_void("channel", channel.into_shape(), Some("fluid path"))?;

    root.add_port("inlet", Port::new(PortKind::In, (40, h / 2, 0), (10, 10, 0), SurfaceNormal::NegZ))?;
    root.add_port("outlet", Port::new(PortKind::Out, (w - 40, h / 2, 0), (10, 10, 0), SurfaceNormal::NegZ))?;

    Ok(device.into_root())
}

/// A bare slab with no channel, for smoke-testing compilation without
/// pulling in the polychannel builder at all.
pub fn blank_slab(layers: u32, layer_size: f64) -> Result<Component> {
    let mut device = Device::wintech("blank-slab", layers, layer_size);
    device
        .root_mut()
        .add_bulk("slab", Shape::cube(200.0, 200.0, layers as f64, false, true), None)?;
    Ok(device.into_root())
}
