//! Core mesh types shared by the PLY reader, writer and sphere generator.
//!
//! These are CPU-side representations. [`GpuVertex`] is the packed layout the
//! renderer uploads into its vertex buffer.

use glam::{Vec2, Vec3};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by mesh validation, generation and writing.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    Empty,

    #[error("Triangle index list length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("Triangle index {index} out of range (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Invalid sphere resolution {x_count}x{y_count}")]
    InvalidResolution { x_count: u32, y_count: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A vertex with a position and a texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzUv {
    /// Position in model space.
    pub position: Vec3,
    /// Texture coordinate (s, t).
    pub uv: Vec2,
}

impl XyzUv {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// Vertex layout consumed by the textured mesh shader: POSITION float3, TEXCOORD float2.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl From<&XyzUv> for GpuVertex {
    fn from(v: &XyzUv) -> Self {
        Self {
            position: v.position.to_array(),
            uv: v.uv.to_array(),
        }
    }
}

/// Axis-aligned bounds of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Short description of a mesh, printed by the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub bounds: Option<Bounds>,
    pub vertex_buffer_bytes: usize,
    pub index_buffer_bytes: usize,
}

impl MeshSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A triangle mesh with texture coordinates.
///
/// `triangle_idx_list` is flat: each consecutive triple names one triangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TexturedMesh {
    pub vertex_list: Vec<XyzUv>,
    pub triangle_idx_list: Vec<u32>,
}

impl TexturedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertex_list.clear();
        self.triangle_idx_list.clear();
    }

    pub fn num_triangles(&self) -> usize {
        self.triangle_idx_list.len() / 3
    }

    /// Iterate over the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangle_idx_list
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Check that the index list holds whole triangles and every index names a vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.triangle_idx_list.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.triangle_idx_list.len()));
        }
        let vertex_count = self.vertex_list.len();
        if let Some(&index) = self
            .triangle_idx_list
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Compute the bounds of all vertex positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.vertex_list.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in &self.vertex_list {
            min = min.min(v.position);
            max = max.max(v.position);
        }

        Some(Bounds {
            min: min.to_array(),
            max: max.to_array(),
        })
    }

    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertex_list.iter().map(GpuVertex::from).collect()
    }

    /// Vertex buffer contents, ready for upload.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.gpu_vertices()).to_vec()
    }

    /// Index buffer contents (32-bit indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangle_idx_list)
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            vertex_count: self.vertex_list.len(),
            triangle_count: self.num_triangles(),
            bounds: self.bounds(),
            vertex_buffer_bytes: self.vertex_list.len() * std::mem::size_of::<GpuVertex>(),
            index_buffer_bytes: self.triangle_idx_list.len() * std::mem::size_of::<u32>(),
        }
    }
}
