//! stitch-export - Whipstitch asset export tool
//!
//! Converts scene documents dumped from the authoring tool into engine text assets
//! (.wsMesh, .wsAnim, .wsModel)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stitch_export::{export_scene, manifest, scene, ExportOptions};

#[derive(Parser)]
#[command(name = "stitch-export")]
#[command(about = "Whipstitch asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every scene listed in a manifest file
    Build {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without exporting
    Check {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,
    },

    /// Export a single scene document
    Scene {
        /// Input scene document (JSON)
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model name (default: scene name, then file stem)
        #[arg(long)]
        name: Option<String>,

        /// Mesh object to export (default: first mesh)
        #[arg(long)]
        mesh: Option<String>,

        /// Armature object to export (default: first armature)
        #[arg(long)]
        rig: Option<String>,

        /// Frame rate written to animations (default: scene rate, else 24)
        #[arg(long)]
        fps: Option<f32>,
    },

    /// List objects and actions in a scene document
    List {
        /// Input scene document (JSON)
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building assets from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let reports = manifest::build_all(&config, output.as_deref())?;
            let conditions: usize = reports.iter().map(|r| r.conditions.len()).sum();
            tracing::info!(
                "Build complete! {} model(s), {} condition(s)",
                reports.len(),
                conditions
            );
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Scene {
            input,
            output,
            name,
            mesh,
            rig,
            fps,
        } => {
            if let Some(fps) = fps {
                if !(fps.is_finite() && fps > 0.0) {
                    anyhow::bail!("Invalid frame rate: {}", fps);
                }
            }
            let output = output.unwrap_or_else(|| {
                input
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            });
            tracing::info!("Exporting {:?} -> {:?}", input, output);
            let options = ExportOptions {
                model_name: name,
                mesh,
                rig,
                fps,
            };
            export_scene(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::List { input } => {
            scene::list_contents(&input)?;
        }
    }

    Ok(())
}
