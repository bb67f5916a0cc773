//! `mfd`: compile one of the bundled fixture devices into a print job.

mod fixtures;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mfd::{compile, compile_and_zip, Config, Design, LightEngine, PrinterProfile, SystemClock};

#[derive(Parser)]
#[command(name = "mfd", about = "Compile OpenMFD fixture devices into print jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a fixture device into a print job directory.
    Compile {
        /// Which bundled fixture to build.
        #[arg(value_enum)]
        fixture: Fixture,
        /// Directory the print job is written to.
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
        /// Number of layers in the fixture's slab.
        #[arg(long, default_value_t = 40)]
        layers: u32,
        /// Layer thickness in mm.
        #[arg(long, default_value_t = 0.05)]
        layer_size: f64,
        /// Optional TOML config file, overlaid on the built-in defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also pack the output directory into this zip file.
        #[arg(short, long)]
        zip: Option<PathBuf>,
    },
    /// List the bundled fixtures.
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Fixture {
    StraightChannel,
    BlankSlab,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match Cli::parse().command {
        Commands::List => {
            println!("straight-channel  a slab with one straight fluid channel and two ports");
            println!("blank-slab        a bare slab, no channel");
            Ok(())
        }
        Commands::Compile { fixture, output, layers, layer_size, config, zip } => {
            run_compile(fixture, output, layers, layer_size, config, zip)
        }
    }
}

fn run_compile(
    fixture: Fixture,
    output: PathBuf,
    layers: u32,
    layer_size: f64,
    config_path: Option<PathBuf>,
    zip_path: Option<PathBuf>,
) -> Result<()> {
    if layers == 0 {
        bail!("--layers must be at least 1");
    }

    let config = match config_path {
        Some(path) => Config::load(&path).with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    let root = match fixture {
        Fixture::StraightChannel => fixtures::straight_channel(layers, layer_size)?,
        Fixture::BlankSlab => fixtures::blank_slab(layers, layer_size)?,
    };

    let profile = PrinterProfile::single_engine(LightEngine::new("LRS10", 0.0076, (2560, 1600), vec![365]));
    let design = Design { slicer: "mfd-cli".to_string(), ..Default::default() };

    std::fs::create_dir_all(&output).with_context(|| format!("creating output directory {}", output.display()))?;

    let program = match &zip_path {
        Some(zip) => compile_and_zip(&root, &profile, design, &output, zip, &config, &SystemClock)?,
        None => compile(&root, &profile, design, &output, &config, &SystemClock)?,
    };

    tracing::info!(layers = program.layers.len(), output = %output.display(), "compiled print job");
    Ok(())
}
