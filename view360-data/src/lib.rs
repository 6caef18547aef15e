//! View360 Data Crate
//!
//! Mesh loading and generation for the 360° stereo photo viewer.
//! This crate is GPU-agnostic: it reads and writes the ASCII PLY meshes the
//! viewer maps photos onto, and produces the half-sphere meshes themselves.

pub mod ply;
pub mod sphere;
pub mod types;

pub use ply::{PlyError, PlyReader, load_textured_mesh_from_ply, save_textured_mesh_as_ply};
pub use sphere::{DEFAULT_SUBDIVISIONS, Hemisphere, generate_half_sphere};
pub use types::{GpuVertex, MeshError, MeshSummary, TexturedMesh, XyzUv};
