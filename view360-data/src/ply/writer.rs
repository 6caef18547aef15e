//! ASCII PLY writer producing the subset [`PlyReader`](super::PlyReader) accepts.

use crate::types::{MeshError, TexturedMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Write `mesh` as ASCII PLY with `x y z s t` vertices and triangle faces.
///
/// The face element is left out for meshes without triangles, since the
/// reader rejects `element face 0`.
pub fn write_textured_mesh_as_ply<W: Write>(
    mesh: &TexturedMesh,
    mut writer: W,
) -> Result<(), MeshError> {
    if mesh.vertex_list.is_empty() {
        return Err(MeshError::Empty);
    }
    mesh.validate()?;

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", mesh.vertex_list.len())?;
    for name in ["x", "y", "z", "s", "t"] {
        writeln!(writer, "property float {}", name)?;
    }
    if mesh.num_triangles() > 0 {
        writeln!(writer, "element face {}", mesh.num_triangles())?;
        writeln!(writer, "property list uchar uint vertex_indices")?;
    }
    writeln!(writer, "end_header")?;

    for v in &mesh.vertex_list {
        writeln!(
            writer,
            "{} {} {} {} {}",
            v.position.x, v.position.y, v.position.z, v.uv.x, v.uv.y
        )?;
    }
    for [a, b, c] in mesh.triangles() {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    writer.flush()?;
    debug!(
        "Wrote PLY mesh: {} vertices, {} triangles",
        mesh.vertex_list.len(),
        mesh.num_triangles()
    );
    Ok(())
}

/// Write `mesh` to a PLY file, replacing any existing file.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_textured_mesh_as_ply<P: AsRef<Path>>(
    mesh: &TexturedMesh,
    path: P,
) -> Result<(), MeshError> {
    let file = File::create(path.as_ref())?;
    write_textured_mesh_as_ply(mesh, BufWriter::new(file))?;
    info!("Saved PLY mesh to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ply::parse_ply_str;
    use crate::types::XyzUv;
    use glam::{Vec2, Vec3};

    fn write_to_string(mesh: &TexturedMesh) -> String {
        let mut out = Vec::new();
        write_textured_mesh_as_ply(mesh, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let mesh = TexturedMesh {
            vertex_list: vec![
                XyzUv::new(Vec3::ZERO, Vec2::ZERO),
                XyzUv::new(Vec3::X, Vec2::X),
                XyzUv::new(Vec3::Y, Vec2::Y),
            ],
            triangle_idx_list: vec![0, 1, 2],
        };
        let text = write_to_string(&mesh);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ply");
        assert_eq!(lines[2], "element vertex 3");
        assert_eq!(lines[8], "element face 1");
        assert_eq!(lines[9], "property list uchar uint vertex_indices");
        assert_eq!(lines[10], "end_header");
        assert_eq!(lines[12], "1 0 0 1 0");
        assert_eq!(lines[14], "3 0 1 2");

        assert_eq!(parse_ply_str(&text).unwrap(), mesh);
    }

    #[test]
    fn test_vertex_only_mesh_omits_faces() {
        let mesh = TexturedMesh {
            vertex_list: vec![XyzUv::new(Vec3::new(0.5, -0.25, 2.0), Vec2::new(0.1, 0.2))],
            triangle_idx_list: Vec::new(),
        };
        let text = write_to_string(&mesh);
        assert!(!text.contains("element face"));

        let parsed = parse_ply_str(&text).unwrap();
        assert_eq!(parsed.vertex_list, mesh.vertex_list);
        assert!(parsed.triangle_idx_list.is_empty());
    }

    #[test]
    fn test_rejects_empty_and_invalid_meshes() {
        let mut out = Vec::new();
        assert!(matches!(
            write_textured_mesh_as_ply(&TexturedMesh::new(), &mut out),
            Err(MeshError::Empty)
        ));

        let bad = TexturedMesh {
            vertex_list: vec![XyzUv::default()],
            triangle_idx_list: vec![0, 0, 1],
        };
        assert!(matches!(
            write_textured_mesh_as_ply(&bad, &mut out),
            Err(MeshError::IndexOutOfRange { index: 1, .. })
        ));
        assert!(out.is_empty());
    }
}
