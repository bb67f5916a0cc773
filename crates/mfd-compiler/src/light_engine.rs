//! Printer light-engine profiles: the table a device's pixel pitch, pixel
//! count, and exposure wavelength are matched against to resolve the
//! `Light engine` name recorded in the print program.

/// One light engine a printer can address.
#[derive(Debug, Clone, PartialEq)]
pub struct LightEngine {
    /// The name recorded in the print program's image settings.
    pub name: String,
    /// Native pixel pitch, in mm.
    pub px_size: f64,
    /// Native pixel count the engine projects.
    pub px_count: (i64, i64),
    /// Wavelengths this engine supports, in nm.
    pub wavelengths: Vec<u32>,
}

impl LightEngine {
    /// Build a light engine profile.
    pub fn new(name: impl Into<String>, px_size: f64, px_count: (i64, i64), wavelengths: Vec<u32>) -> Self {
        Self { name: name.into(), px_size, px_count, wavelengths }
    }
}

/// A printer's capabilities: whether it has XY stage support for stitched
/// devices, and the light engines it can drive.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterProfile {
    /// Whether the printer's build platform can translate in X/Y, required
    /// for `StitchedDevice` tiling.
    pub xy_stage_available: bool,
    /// Light engines this printer can select between.
    pub light_engines: Vec<LightEngine>,
}

impl PrinterProfile {
    /// A printer with a single light engine and no XY stage.
    pub fn single_engine(engine: LightEngine) -> Self {
        Self { xy_stage_available: false, light_engines: vec![engine] }
    }

    /// Find the light engine matching a device's pixel pitch, pixel count,
    /// and requested wavelength.
    pub fn find(&self, px_size: f64, px_count: (i64, i64), wavelength: u32) -> Option<&LightEngine> {
        self.light_engines.iter().find(|engine| {
            (engine.px_size - px_size).abs() < 1e-9 && engine.px_count == px_count && engine.wavelengths.contains(&wavelength)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_an_engine_matching_all_three_keys() {
        let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 0.0076, (2560, 1600), vec![365, 385]));
        assert!(profile.find(0.0076, (2560, 1600), 385).is_some());
        assert!(profile.find(0.0076, (2560, 1600), 405).is_none());
        assert!(profile.find(0.0152, (2560, 1600), 365).is_none());
    }
}
