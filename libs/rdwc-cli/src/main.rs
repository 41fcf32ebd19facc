//! rdwc CLI - RDWC plumbing generator
//!
//! Generates a complete system from a JSON configuration and exports it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rdwc_gen::settings::Resolution;
use rdwc_gen::{Generator, GeneratorConfig};
use std::fs;
use std::path::{Path, PathBuf};

mod export;

#[derive(Parser)]
#[command(name = "rdwc")]
#[command(about = "Procedural RDWC hydroponic plumbing generator", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a system from a configuration file
    Generate {
        /// JSON configuration; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the scene as Wavefront OBJ
        #[arg(short, long)]
        obj: Option<PathBuf>,
        /// Use coarse preview segment counts
        #[arg(long)]
        preview: bool,
    },
    /// Print the default configuration as JSON
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Generate {
            config,
            obj,
            preview,
        } => generate(config.as_deref(), obj.as_deref(), preview)?,
        Commands::Defaults => println!("{}", GeneratorConfig::default().to_json()?),
    }
    Ok(())
}

fn generate(config: Option<&Path>, obj: Option<&Path>, preview: bool) -> Result<()> {
    let mut config = match config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GeneratorConfig::from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    if preview {
        config.resolution = Resolution::preview();
    }

    let mut generator = Generator::new();
    let summary = generator.generate(&config)?;
    println!("{summary}");
    for failure in &summary.failures {
        warn!("{}: {}", failure.part, failure.message);
    }

    if let Some(path) = obj {
        let text = export::scene_to_obj(generator.scene())?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        info!("Exported OBJ to {}", path.display());
    }
    Ok(())
}
