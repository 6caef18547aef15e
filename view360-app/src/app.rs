//! Command implementations: mesh inspection and sphere generation.

use crate::errors::AppError;
use std::path::PathBuf;
use tracing::{error, info, warn};
use view360_data::{
    DEFAULT_SUBDIVISIONS, Hemisphere, MeshSummary, TexturedMesh, generate_half_sphere,
    load_textured_mesh_from_ply, save_textured_mesh_as_ply,
};

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Where an inspected mesh came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshSource {
    File,
    FallbackSphere,
}

/// Options for `view360 inspect`.
pub struct InspectOptions {
    pub path: PathBuf,
    pub fallback_sphere: bool,
}

/// Load and validate a mesh, falling back to a generated left half-sphere when
/// requested and the file cannot be used.
pub fn load_mesh(options: &InspectOptions) -> Result<(TexturedMesh, MeshSource), AppError> {
    let loaded = load_textured_mesh_from_ply(&options.path)
        .map_err(AppError::from)
        .and_then(|mesh| {
            mesh.validate()?;
            Ok(mesh)
        });

    match loaded {
        Ok(mesh) => Ok((mesh, MeshSource::File)),
        Err(e) if options.fallback_sphere => {
            error!("Failed to load {}: {}", options.path.display(), e);
            warn!("Falling back to a generated half-sphere");
            let mesh =
                generate_half_sphere(DEFAULT_SUBDIVISIONS, DEFAULT_SUBDIVISIONS, Hemisphere::Left)?;
            Ok((mesh, MeshSource::FallbackSphere))
        }
        Err(e) => Err(e),
    }
}

/// Run `view360 inspect`: load a mesh and describe it.
pub fn inspect(options: &InspectOptions) -> Result<MeshSummary, AppError> {
    let (mesh, source) = load_mesh(options)?;
    let summary = mesh.summary();

    info!(
        "{} ({:?}): {} vertices, {} triangles",
        options.path.display(),
        source,
        summary.vertex_count,
        summary.triangle_count
    );
    if let Some(bounds) = summary.bounds {
        info!("Bounds: min {:?}, max {:?}", bounds.min, bounds.max);
    }
    info!(
        "GPU buffers: {} vertex bytes, {} index bytes",
        summary.vertex_buffer_bytes, summary.index_buffer_bytes
    );
    Ok(summary)
}

/// Options for `view360 gen-sphere`.
pub struct GenSphereOptions {
    pub out_dir: PathBuf,
    pub x_count: u32,
    pub y_count: u32,
}

/// Run `view360 gen-sphere`: write the left and right eye meshes.
pub fn gen_sphere(options: &GenSphereOptions) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(&options.out_dir)?;

    let mut written = Vec::with_capacity(2);
    for hemisphere in [Hemisphere::Left, Hemisphere::Right] {
        let mesh = generate_half_sphere(options.x_count, options.y_count, hemisphere)?;
        let path = options.out_dir.join(hemisphere.file_name());
        save_textured_mesh_as_ply(&mesh, &path)?;
        info!(
            "Wrote {}: {} vertices, {} triangles",
            path.display(),
            mesh.vertex_list.len(),
            mesh.num_triangles()
        );
        written.push(path);
    }
    Ok(written)
}

/// Print a summary as pretty JSON on stdout.
pub fn print_summary_json(summary: &MeshSummary) -> Result<(), AppError> {
    println!("{}", summary.to_json()?);
    Ok(())
}
