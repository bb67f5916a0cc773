//! The facade's top-level error, collecting every pipeline crate's error
//! type behind one `#[from]`-derived enum.

use thiserror::Error;

/// Any failure raised while building, routing, slicing, imaging, or
/// compiling a device.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Color resolution failed.
    #[error(transparent)]
    Color(#[from] mfd_units::ColorError),
    /// Shape construction or combination failed.
    #[error(transparent)]
    Shape(#[from] mfd_geom::ShapeError),
    /// Polychannel construction failed.
    #[error(transparent)]
    Polychannel(#[from] mfd_polychannel::PolychannelError),
    /// Component-tree construction failed.
    #[error(transparent)]
    Component(#[from] mfd_component::ComponentError),
    /// Routing failed.
    #[error(transparent)]
    Router(#[from] mfd_router::RouterError),
    /// Slicing failed.
    #[error(transparent)]
    Slicer(#[from] mfd_slicer::SlicerError),
    /// Print compilation failed.
    #[error(transparent)]
    Compiler(#[from] mfd_compiler::CompilerError),
    /// Loading a TOML configuration file failed.
    #[error(transparent)]
    Config(#[from] mfd_settings::ConfigError),
}

/// Convenience alias for facade results.
pub type Result<T> = std::result::Result<T, CompileError>;
