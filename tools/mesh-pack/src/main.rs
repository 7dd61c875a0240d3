//! mesh-pack - stroke mesh packing tool
//!
//! Converts mesh manifests (TOML or JSON) to packed vertex/index buffers
//! (.vtx, .idx) plus their coding params (.coding.json)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mesh-pack")]
#[command(about = "Stroke mesh packing tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a mesh manifest into buffer files
    Pack {
        /// Path to the mesh manifest (.toml or .json)
        manifest: PathBuf,

        /// Output directory (default: next to the manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a manifest without writing output
    Check {
        /// Path to the mesh manifest (.toml or .json)
        manifest: PathBuf,
    },

    /// Pack in memory and print layout, coding params and decoded vertices
    Inspect {
        /// Path to the mesh manifest (.toml or .json)
        manifest: PathBuf,

        /// Number of vertices to decode
        #[arg(long, default_value_t = 4)]
        vertices: usize,
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
        Commands::Pack { manifest, output } => {
            tracing::info!("Packing {:?}", manifest);
            let files = mesh_pack::pack_manifest(&manifest, output.as_deref())?;
            tracing::info!(
                "Wrote {:?}, {:?}, {:?}",
                files.vertex_path,
                files.index_path,
                files.coding_path
            );
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let mesh = mesh_pack::check_manifest(&manifest)?;
            tracing::info!(
                "Manifest is valid! {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
        }

        Commands::Inspect { manifest, vertices } => {
            mesh_pack::inspect_manifest(&manifest, vertices)?;
        }
    }

    Ok(())
}
