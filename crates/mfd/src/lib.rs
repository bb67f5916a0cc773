//! OpenMFD: compiles a hierarchical, parametric microfluidic device
//! description into a layer-by-layer photolithographic print job.
//!
//! This facade re-exports the pipeline crates (units/color, geometry,
//! polychannel, component tree, router, slicer, imaging, compiler,
//! settings) and wires the last three into one [`compile`] entry point.
//!
//! # Example
//!
//! ```ignore
//! use mfd::{compile, Component, Config, Design, LightEngine, PrinterProfile, SystemClock};
//!
//! let device = Component::new((100, 100, 10));
//! let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 0.0076, (2560, 1600), vec![365]));
//! let config = Config::default();
//! let design = Design { slicer: "OpenMFD".to_string(), ..Default::default() };
//! let program = compile(&device, &profile, design, "out", &config, &SystemClock)?;
//! # Ok::<(), mfd::CompileError>(())
//! ```

#![warn(missing_docs)]

mod clock;
mod compile;
mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use compile::{compile, compile_and_zip};
pub use error::{CompileError, Result};

pub use mfd_units::{Color, ColorError, IVec3, UnitScale};

pub use mfd_geom::{default_segments, set_default_segments, Aabb, Shape, ShapeError, ShapeMeta};

pub use mfd_polychannel::{BezierShape, Entry, Polychannel, PolychannelError, ShapeType, SparseShape};

pub use mfd_component::{
    Component, ComponentError, Device, Port, PortKind, RegionalSettings, StitchedDevice, SurfaceNormal,
    VariableLayerThicknessComponent,
};

pub use mfd_router::{Axis, Cell, KeepoutEntry, KeepoutIndex, KeepoutKind, ResolvedRoute, Router, RouterError, RouteType};

pub use mfd_slicer::{slice_device, GrayImage, PackedImage, SlicedDevice, SlicerError};

pub use mfd_imaging::{decode_png, encode_png, synthesize_membranes, synthesize_secondary_dose, Membrane};

pub use mfd_compiler::{
    zip_output_directory, CompilerError, Design, Header, LightEngine, PrintProgram, PrinterProfile,
};

pub use mfd_settings::{
    Config, ConfigError, ExposureSettings, MembraneSettings, PositionSettings, ResinError, ResinType,
    RouterConfig, SecondaryDoseSettings,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tempdir(label: &str) -> std::path::PathBuf {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let mut p = std::env::temp_dir();
        p.push(format!("mfd-facade-{label}-{}", COUNTER.fetch_add(1, Ordering::Relaxed)));
        p
    }

    #[test]
    fn compile_stamps_a_blank_design_date_from_the_injected_clock() {
        let mut device = Component::new((4, 4, 1)).with_units(UnitScale::new(1.0, 1.0));
        device.add_bulk("body", Shape::cube(4.0, 4.0, 1.0, false, true), None).unwrap();
        let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 1.0, (4, 4), vec![365]));
        let config = Config::default();

        let frozen = chrono::Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let clock = FixedClock(frozen);

        let out_dir = tempdir("stamp");
        std::fs::create_dir_all(&out_dir).unwrap();
        let program = compile(&device, &profile, Design::default(), &out_dir, &config, &clock).unwrap();
        assert_eq!(program.design.date, "2026-01-02 03:04:05");
        std::fs::remove_dir_all(&out_dir).ok();
    }

    #[test]
    fn compile_removes_the_output_directory_on_failure_unless_save_temp_files() {
        let mut device = Component::new((4, 4, 1)).with_units(UnitScale::new(1.0, 1.0));
        device.add_bulk("body", Shape::cube(4.0, 4.0, 1.0, false, true), None).unwrap();
        // No light engine in this profile matches the device, so compilation fails.
        let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 5.0, (4, 4), vec![365]));
        let config = Config::default();

        let out_dir = tempdir("cleanup");
        std::fs::create_dir_all(&out_dir).unwrap();
        let err = compile(&device, &profile, Design::default(), &out_dir, &config, &SystemClock).unwrap_err();
        assert!(matches!(err, CompileError::Compiler(_)));
        assert!(!out_dir.exists());
    }
}
