//! View360 command line tools
//!
//! Utilities around the meshes the 360° stereo photo viewer maps photos onto:
//! - Inspect a PLY mesh (vertex/triangle counts, bounds, GPU buffer sizes)
//! - Generate the left/right half-sphere meshes

mod app;
mod errors;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use view360_data::DEFAULT_SUBDIVISIONS;

/// View360 - mesh tools for 360° stereo photos
#[derive(Parser, Debug)]
#[command(name = "view360")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a PLY mesh and print a summary
    Inspect {
        /// Path to the PLY file
        file: PathBuf,

        /// Print the summary as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Use a generated half-sphere when the file cannot be loaded
        #[arg(long)]
        fallback_sphere: bool,
    },
    /// Write sphereL.ply and sphereR.ply
    GenSphere {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Longitude subdivisions
        #[arg(long, default_value_t = DEFAULT_SUBDIVISIONS)]
        x_count: u32,

        /// Latitude subdivisions
        #[arg(long, default_value_t = DEFAULT_SUBDIVISIONS)]
        y_count: u32,
    },
}

fn run(args: Args) -> Result<(), errors::AppError> {
    match args.command {
        Command::Inspect {
            file,
            json,
            fallback_sphere,
        } => {
            let summary = app::inspect(&app::InspectOptions {
                path: file,
                fallback_sphere,
            })?;
            if json {
                app::print_summary_json(&summary)?;
            }
        }
        Command::GenSphere {
            out_dir,
            x_count,
            y_count,
        } => {
            app::gen_sphere(&app::GenSphereOptions {
                out_dir,
                x_count,
                y_count,
            })?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    app::init_logging(&app::LoggingConfig {
        level: args.log_level.clone(),
    });

    if let Err(e) = run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
