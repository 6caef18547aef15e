//! ASCII PLY reading and writing for textured meshes.

mod error;
mod property;
mod reader;
mod writer;

pub use error::PlyError;
pub use property::{PlyEncoding, VertexLayout, VertexPropertySet};
pub use reader::{ParseState, PlyReader, load_textured_mesh_from_ply, parse_ply_str};
pub use writer::{save_textured_mesh_as_ply, write_textured_mesh_as_ply};
