//! The component tree: named shapes, ports, subcomponents, regional
//! settings, and the rigid transforms that move them together as a unit.

#![warn(missing_docs)]

mod component;
mod device;
mod error;
mod port;

pub use component::{Component, RegionalSettings};
pub use device::{Device, StitchedDevice, VariableLayerThicknessComponent};
pub use error::{ComponentError, Result};
pub use port::{Port, PortKind, SurfaceNormal};
