#![warn(missing_docs)]

//! Integer pixel/layer space and RGBA palette lookup.
//!
//! This crate owns the two pieces of state every downstream component needs
//! before it can own geometry: the `(px_size, layer_size)` unit system that
//! converts a component's integer lattice into millimetres, and color
//! resolution against the five bundled palettes.

mod color;
mod units;

pub use color::{Color, ColorError};
pub use units::{IVec3, UnitScale};
