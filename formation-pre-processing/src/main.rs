/// Formation baker: formations in, position/colour textures and a manifest out.
mod baker;
mod config;
mod dds_writer;
mod inspect;
mod laz;
mod manifest;
mod mesh;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::baker::ShowBaker;
use crate::config::{FormationSpec, ShowConfig};

#[derive(Parser)]
#[command(name = "formation-pre-processing", version, about = "Bake drone show formations into GPU textures")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every formation of a show and write textures plus manifest.json
    Bake {
        /// TOML show description, defaults to grid, sphere and heart
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "show")]
        output: PathBuf,

        /// Override the drone count
        #[arg(long)]
        drones: Option<usize>,

        /// Append a text formation sampled from this glTF mesh
        #[arg(long)]
        text_mesh: Option<PathBuf>,

        /// Override the sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a baked show and print what it contains
    Inspect {
        /// Path to manifest.json
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over -v
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Bake {
            config,
            output,
            drones,
            text_mesh,
            seed,
        } => {
            let mut show = match config {
                Some(path) => ShowConfig::load(&path)?,
                None => ShowConfig::default(),
            };
            if let Some(drones) = drones {
                show.drone_count = drones;
            }
            if let Some(seed) = seed {
                show.seed = seed;
            }
            if let Some(mesh) = text_mesh {
                show.formations.push(FormationSpec::Text {
                    mesh,
                    mesh_name: None,
                    seed: None,
                });
            }
            ShowBaker::new(show, &output).bake()?;
            Ok(())
        }
        Commands::Inspect { manifest } => inspect::inspect(&manifest),
    }
}
