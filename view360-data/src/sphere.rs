//! Half-sphere meshes for equirectangular stereo photos.
//!
//! Each eye sees one half of a side-by-side 360° photo mapped onto the inside
//! of a hemisphere. The left eye covers longitudes 0..π, the right eye π..2π.
//! Texture coordinates run from s = 1 at the first longitude to s = 0 at the
//! last, and from t = 1 at the north pole to t = 0 at the south pole.

use crate::types::{MeshError, TexturedMesh, XyzUv};
use glam::{Vec2, Vec3};
use std::f64::consts::PI;
use tracing::debug;

/// Default longitude and latitude subdivisions of the shipped meshes.
pub const DEFAULT_SUBDIVISIONS: u32 = 64;

/// Which half of the sphere to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    fn longitude_offset(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Right => PI,
        }
    }

    /// File name the viewer loads for this eye.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Left => "sphereL.ply",
            Self::Right => "sphereR.ply",
        }
    }
}

/// Generate a unit half-sphere with `x_count` longitude and `y_count` latitude steps.
///
/// Triangles wind counter-clockwise when seen from the sphere's center.
pub fn generate_half_sphere(
    x_count: u32,
    y_count: u32,
    hemisphere: Hemisphere,
) -> Result<TexturedMesh, MeshError> {
    // Every vertex index must fit in a u32.
    let vertex_total = x_count
        .checked_add(1)
        .zip(y_count.checked_add(1))
        .and_then(|(columns, rows)| columns.checked_mul(rows));
    let Some(vertex_total) = vertex_total.filter(|_| x_count > 0 && y_count > 0) else {
        return Err(MeshError::InvalidResolution { x_count, y_count });
    };

    let offset = hemisphere.longitude_offset();
    let rows = y_count + 1;
    let mut mesh = TexturedMesh::new();
    mesh.vertex_list.reserve(vertex_total as usize);
    mesh.triangle_idx_list
        .reserve(x_count as usize * y_count as usize * 6);

    for x in 0..=x_count {
        let phi_f = PI * x as f64 / x_count as f64;
        let phi = phi_f + offset;
        let s = 1.0 - phi_f / PI;

        for y in 0..=y_count {
            let theta = PI * y as f64 / y_count as f64;
            let t = 1.0 - theta / PI;

            let position = Vec3::new(
                (theta.sin() * phi.cos()) as f32,
                theta.cos() as f32,
                (theta.sin() * phi.sin()) as f32,
            );
            mesh.vertex_list
                .push(XyzUv::new(position, Vec2::new(s as f32, t as f32)));
        }
    }

    let index = |x: u32, y: u32| x * rows + y;
    for x in 0..x_count {
        for y in 0..y_count {
            let p00 = index(x, y);
            let p10 = index(x, y + 1);
            let p01 = index(x + 1, y);
            let p11 = index(x + 1, y + 1);

            push_triangle(&mut mesh, [p00, p10, p01]);
            push_triangle(&mut mesh, [p11, p01, p10]);
        }
    }

    debug!(
        "Generated {:?} half-sphere: {} vertices, {} triangles",
        hemisphere,
        mesh.vertex_list.len(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

fn push_triangle(mesh: &mut TexturedMesh, [a, b, c]: [u32; 3]) {
    if a == b || a == c || b == c {
        return;
    }
    mesh.triangle_idx_list.extend_from_slice(&[a, b, c]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::{parse_ply_str, write_textured_mesh_as_ply};

    #[test]
    fn test_counts() {
        let mesh = generate_half_sphere(8, 4, Hemisphere::Left).unwrap();
        assert_eq!(mesh.vertex_list.len(), 9 * 5);
        assert_eq!(mesh.num_triangles(), 2 * 8 * 4);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let mesh = generate_half_sphere(16, 16, Hemisphere::Right).unwrap();
        for v in &mesh.vertex_list {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
            assert!((0.0..=1.0).contains(&v.uv.x));
            assert!((0.0..=1.0).contains(&v.uv.y));
        }
    }

    #[test]
    fn test_hemisphere_sides() {
        // The left half has z >= 0 and the right z <= 0.
        let left = generate_half_sphere(4, 4, Hemisphere::Left).unwrap();
        let right = generate_half_sphere(4, 4, Hemisphere::Right).unwrap();
        assert!(left.vertex_list.iter().all(|v| v.position.z >= -1e-6));
        assert!(right.vertex_list.iter().all(|v| v.position.z <= 1e-6));
    }

    #[test]
    fn test_texture_corners() {
        let mesh = generate_half_sphere(4, 2, Hemisphere::Left).unwrap();
        let first = mesh.vertex_list[0];
        assert_eq!(first.uv, Vec2::new(1.0, 1.0));
        assert!((first.position - Vec3::Y).length() < 1e-6);

        let last = mesh.vertex_list.last().unwrap();
        assert!((last.uv - Vec2::new(0.0, 0.0)).length() < 1e-6);
        assert!((last.position + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_triangles_face_center() {
        let mesh = generate_half_sphere(8, 8, Hemisphere::Left).unwrap();
        for [a, b, c] in mesh.triangles() {
            let p0 = mesh.vertex_list[a as usize].position;
            let p1 = mesh.vertex_list[b as usize].position;
            let p2 = mesh.vertex_list[c as usize].position;
            let normal = (p1 - p0).cross(p2 - p0);
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (p0 + p1 + p2) / 3.0;
            // Inward-facing: normal points toward the origin.
            assert!(normal.dot(centroid) < 0.0);
        }
    }

    #[test]
    fn test_invalid_resolution() {
        assert!(matches!(
            generate_half_sphere(0, 4, Hemisphere::Left),
            Err(MeshError::InvalidResolution { x_count: 0, y_count: 4 })
        ));
    }

    #[test]
    fn test_resolution_beyond_u32_indices() {
        assert!(matches!(
            generate_half_sphere(70000, 70000, Hemisphere::Left),
            Err(MeshError::InvalidResolution {
                x_count: 70000,
                y_count: 70000
            })
        ));
        assert!(matches!(
            generate_half_sphere(u32::MAX, 1, Hemisphere::Right),
            Err(MeshError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_written_sphere_parses() {
        let mesh = generate_half_sphere(6, 3, Hemisphere::Right).unwrap();
        let mut out = Vec::new();
        write_textured_mesh_as_ply(&mesh, &mut out).unwrap();

        let parsed = parse_ply_str(std::str::from_utf8(&out).unwrap()).unwrap();
        assert_eq!(parsed.vertex_list.len(), mesh.vertex_list.len());
        assert_eq!(parsed.triangle_idx_list, mesh.triangle_idx_list);
    }
}
