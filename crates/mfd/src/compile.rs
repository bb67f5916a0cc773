//! End-to-end orchestration: slice, image-generate, and compile a device
//! tree into a print job, with temp-directory cleanup on failure.

use std::path::Path;

use mfd_compiler::{Design, PrinterProfile, PrintProgram};
use mfd_component::Component;
use mfd_settings::Config;

use crate::clock::Clock;
use crate::error::Result;

/// Compile `root` against `profile` into `output_dir`, stamping `design`'s
/// `Date` field from `clock` if the caller left it blank. On failure, the
/// output directory is removed unless `config.save_temp_files` is set.
pub fn compile(
    root: &Component,
    profile: &PrinterProfile,
    mut design: Design,
    output_dir: impl AsRef<Path>,
    config: &Config,
    clock: &dyn Clock,
) -> Result<PrintProgram> {
    let output_dir = output_dir.as_ref();
    if design.date.is_empty() {
        design.date = clock.now().format("%Y-%m-%d %H:%M:%S").to_string();
    }

    match mfd_compiler::compile_print_job(root, profile, design, output_dir, config.minimize_layers) {
        Ok(program) => Ok(program),
        Err(err) => {
            if !config.save_temp_files {
                let _ = std::fs::remove_dir_all(output_dir);
            }
            Err(err.into())
        }
    }
}

/// Like [`compile`], but also packs `output_dir` into a zip archive at
/// `zip_path` once the print program has been written.
pub fn compile_and_zip(
    root: &Component,
    profile: &PrinterProfile,
    design: Design,
    output_dir: impl AsRef<Path>,
    zip_path: impl AsRef<Path>,
    config: &Config,
    clock: &dyn Clock,
) -> Result<PrintProgram> {
    let program = compile(root, profile, design, output_dir.as_ref(), config, clock)?;
    mfd_compiler::zip_output_directory(output_dir, zip_path)?;
    Ok(program)
}
