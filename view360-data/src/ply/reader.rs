//! Line-oriented reader for the ASCII PLY subset used by the sphere meshes.
//!
//! The reader walks an explicit state machine, one handler per state:
//!
//! ```text
//! ReadSignature -> ReadFormat -> ReadHeader -> ReadVertex -> ReadFace -> Finished
//! ```
//!
//! `ReadHeaderVertex` and `ReadHeaderFace` are header states entered after an
//! `element` line; they are handled exactly like `ReadHeader`. Every error is
//! fatal and no partially filled mesh is ever returned.

use crate::ply::{PlyEncoding, PlyError, VertexLayout, VertexPropertySet};
use crate::types::{TexturedMesh, XyzUv};
use glam::{Vec2, Vec3};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::str::SplitWhitespace;
use tracing::{debug, info, warn};

/// Longest accepted line, in bytes, excluding the line terminator.
const MAX_LINE_BYTES: u64 = 64 * 1024;

/// Upper bound on capacity reserved up front from header element counts.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Parser state. The vertex state carries the layout classified at `end_header`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    ReadSignature,
    ReadFormat,
    ReadHeader,
    ReadHeaderVertex,
    ReadHeaderFace,
    ReadVertex(VertexLayout),
    ReadFace,
    Finished,
}

/// Parses one PLY stream at a time into a [`TexturedMesh`].
#[derive(Debug)]
pub struct PlyReader {
    state: ParseState,
    line_number: usize,
    encoding: PlyEncoding,
    vertex_count: usize,
    face_count: usize,
    vertex_props: VertexPropertySet,
    has_vertex_indices: bool,
}

impl Default for PlyReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlyReader {
    pub fn new() -> Self {
        Self {
            state: ParseState::ReadSignature,
            line_number: 0,
            encoding: PlyEncoding::Ascii,
            vertex_count: 0,
            face_count: 0,
            vertex_props: VertexPropertySet::empty(),
            has_vertex_indices: false,
        }
    }

    /// Current state; `Finished` after a successful [`read`](Self::read).
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Encoding recorded from the last `format` line.
    pub fn encoding(&self) -> PlyEncoding {
        self.encoding
    }

    /// Parse a whole stream. All state from a previous call is discarded first.
    pub fn read<R: BufRead>(&mut self, mut reader: R) -> Result<TexturedMesh, PlyError> {
        *self = Self::new();

        let mut mesh = TexturedMesh::new();
        let mut buf = String::new();

        loop {
            let step = match self.state {
                ParseState::ReadSignature => self.read_signature(&mut reader, &mut buf),
                ParseState::ReadFormat => self.read_format(&mut reader, &mut buf),
                ParseState::ReadHeader
                | ParseState::ReadHeaderVertex
                | ParseState::ReadHeaderFace => self.read_header(&mut reader, &mut buf),
                ParseState::ReadVertex(layout) => {
                    self.read_vertices(&mut reader, &mut buf, layout, &mut mesh)
                }
                ParseState::ReadFace => self.read_faces(&mut reader, &mut buf, &mut mesh),
                ParseState::Finished => break,
            };

            if let Err(e) = step {
                warn!("Failed to parse PLY stream in state {:?}: {}", self.state, e);
                return Err(e);
            }
        }

        debug!(
            "PLY parsed: {} vertices, {} triangles",
            mesh.vertex_list.len(),
            mesh.num_triangles()
        );
        Ok(mesh)
    }

    /// Read the next line into `buf` with the trailing LF and CR removed.
    fn next_line<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
        expected: &'static str,
    ) -> Result<(), PlyError> {
        buf.clear();
        let read = reader.by_ref().take(MAX_LINE_BYTES + 2).read_line(buf)?;
        if read == 0 {
            return Err(PlyError::UnexpectedEndOfStream {
                line: self.line_number,
                expected,
            });
        }
        self.line_number += 1;

        let body = buf.trim_end_matches(['\n', '\r']).len();
        if body as u64 > MAX_LINE_BYTES {
            return Err(PlyError::MalformedDataLine {
                line: self.line_number,
                reason: format!("line longer than {} bytes", MAX_LINE_BYTES),
            });
        }

        if buf.ends_with('\n') {
            buf.pop();
        }
        if buf.ends_with('\r') {
            buf.pop();
        }
        Ok(())
    }

    fn read_signature<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
    ) -> Result<(), PlyError> {
        self.next_line(reader, buf, "signature")?;
        if buf.as_str() != "ply" {
            return Err(PlyError::NotAPlyFile {
                line: self.line_number,
            });
        }
        self.state = ParseState::ReadFormat;
        Ok(())
    }

    fn read_format<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
    ) -> Result<(), PlyError> {
        self.next_line(reader, buf, "format line")?;
        let line = self.line_number;
        let format_err = |reason: String| PlyError::UnsupportedFormatOrVersion { line, reason };

        let mut tokens = buf.split_whitespace();
        let (Some("format"), Some(kind), Some(version)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(format_err(format!("expected 'format <type> <version>', got '{}'", buf)));
        };

        self.encoding = PlyEncoding::from_token(kind)
            .ok_or_else(|| format_err(format!("unknown format type '{}'", kind)))?;
        if version != "1.0" {
            return Err(format_err(format!("unknown PLY version '{}'", version)));
        }

        self.state = ParseState::ReadHeader;
        Ok(())
    }

    fn read_header<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
    ) -> Result<(), PlyError> {
        self.next_line(reader, buf, "end_header")?;

        let mut tokens = buf.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Err(self.header_err("empty header line"));
        };

        match keyword {
            "end_header" => self.finish_header(),
            "comment" | "obj_info" => Ok(()),
            "element" => self.read_element(tokens),
            "property" => self.read_property(tokens),
            other => {
                debug!("Ignoring header keyword '{}' at line {}", other, self.line_number);
                Ok(())
            }
        }
    }

    fn read_element(&mut self, mut tokens: SplitWhitespace<'_>) -> Result<(), PlyError> {
        let Some(name) = tokens.next() else {
            return Err(self.header_err("element without a name"));
        };

        match name {
            "vertex" => {
                self.vertex_count = self.parse_count(tokens.next(), "element vertex")?;
                self.state = ParseState::ReadHeaderVertex;
            }
            "face" => {
                self.face_count = self.parse_count(tokens.next(), "element face")?;
                self.state = ParseState::ReadHeaderFace;
            }
            other => warn!(
                "Ignoring unsupported element '{}' at line {}",
                other, self.line_number
            ),
        }
        Ok(())
    }

    fn read_property(&mut self, mut tokens: SplitWhitespace<'_>) -> Result<(), PlyError> {
        let Some(kind) = tokens.next() else {
            return Err(self.header_err("property without a type"));
        };

        match kind {
            "float" => {
                let Some(name) = tokens.next() else {
                    return Err(self.header_err("property float without a name"));
                };
                match VertexPropertySet::from_property_name(name) {
                    Some(flag) => self.vertex_props |= flag,
                    None => debug!("Ignoring unknown float property '{}'", name),
                }
            }
            "list" => self.has_vertex_indices = true,
            other => debug!(
                "Ignoring property of type '{}' at line {}",
                other, self.line_number
            ),
        }
        Ok(())
    }

    fn finish_header(&mut self) -> Result<(), PlyError> {
        if self.vertex_count == 0 {
            return Err(self.header_err("header does not contain 'element vertex'"));
        }
        if self.vertex_props.is_empty() {
            return Err(self.header_err("header does not contain any vertex property"));
        }

        let layout = VertexLayout::classify(self.vertex_props).ok_or_else(|| {
            PlyError::UnsupportedVertexLayout {
                line: self.line_number,
                properties: format!("{:?}", self.vertex_props),
            }
        })?;

        if self.encoding == PlyEncoding::Binary {
            return Err(PlyError::UnsupportedFormatOrVersion {
                line: self.line_number,
                reason: "binary vertex data is not supported".to_string(),
            });
        }

        debug!(
            "PLY header: {} vertices ({:?}), {} faces",
            self.vertex_count, layout, self.face_count
        );
        self.state = ParseState::ReadVertex(layout);
        Ok(())
    }

    fn read_vertices<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
        layout: VertexLayout,
        mesh: &mut TexturedMesh,
    ) -> Result<(), PlyError> {
        let expected = layout.field_count();
        let uv = layout.uv_offset();
        mesh.vertex_list
            .reserve(self.vertex_count.min(MAX_PREALLOCATED));

        for _ in 0..self.vertex_count {
            self.next_line(reader, buf, "vertex data")?;

            let mut fields = [0.0f32; 8];
            let mut count = 0;
            for token in buf.split_whitespace() {
                if count == expected {
                    return Err(self.data_err(format!(
                        "expected {} vertex fields, found more",
                        expected
                    )));
                }
                fields[count] = token
                    .parse::<f32>()
                    .map_err(|_| self.data_err(format!("invalid float '{}'", token)))?;
                count += 1;
            }
            if count != expected {
                return Err(self.data_err(format!(
                    "expected {} vertex fields, found {}",
                    expected, count
                )));
            }

            // Normals, when present, are read and dropped.
            mesh.vertex_list.push(XyzUv::new(
                Vec3::new(fields[0], fields[1], fields[2]),
                Vec2::new(fields[uv], fields[uv + 1]),
            ));
        }

        self.state = ParseState::ReadFace;
        Ok(())
    }

    fn read_faces<R: BufRead>(
        &mut self,
        reader: &mut R,
        buf: &mut String,
        mesh: &mut TexturedMesh,
    ) -> Result<(), PlyError> {
        if !self.has_vertex_indices {
            // Point-only mesh.
            self.state = ParseState::Finished;
            return Ok(());
        }

        mesh.triangle_idx_list
            .reserve(self.face_count.saturating_mul(3).min(MAX_PREALLOCATED));

        for _ in 0..self.face_count {
            self.next_line(reader, buf, "face data")?;
            let line = self.line_number;

            let mut tokens = buf.split_whitespace();
            let count: i64 = tokens
                .next()
                .ok_or_else(|| self.data_err("empty face line".to_string()))?
                .parse()
                .map_err(|_| self.data_err("invalid face vertex count".to_string()))?;
            if count != 3 {
                return Err(PlyError::UnsupportedPolygon { line, count });
            }

            let mut indices = [0u32; 3];
            let mut n = 0;
            for token in tokens {
                if n == 3 {
                    return Err(self.data_err("expected 3 face indices, found more".to_string()));
                }
                indices[n] = token
                    .parse::<u32>()
                    .map_err(|_| self.data_err(format!("invalid vertex index '{}'", token)))?;
                n += 1;
            }
            if n != 3 {
                return Err(self.data_err(format!("expected 3 face indices, found {}", n)));
            }

            if let Some(&index) = indices.iter().find(|&&i| i as usize >= self.vertex_count) {
                return Err(PlyError::IndexOutOfRange {
                    line,
                    index,
                    vertex_count: self.vertex_count,
                });
            }

            mesh.triangle_idx_list.extend_from_slice(&indices);
        }

        self.state = ParseState::Finished;
        Ok(())
    }

    fn parse_count(&self, token: Option<&str>, what: &str) -> Result<usize, PlyError> {
        let token = token.ok_or_else(|| self.header_err(&format!("{} without a count", what)))?;
        match token.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n as usize),
            _ => Err(self.header_err(&format!("{} has invalid count '{}'", what, token))),
        }
    }

    fn header_err(&self, reason: &str) -> PlyError {
        PlyError::MissingOrInvalidHeaderField {
            line: self.line_number,
            reason: reason.to_string(),
        }
    }

    fn data_err(&self, reason: String) -> PlyError {
        PlyError::MalformedDataLine {
            line: self.line_number,
            reason,
        }
    }
}

/// Load a textured mesh from a PLY file on disk.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_textured_mesh_from_ply<P: AsRef<Path>>(path: P) -> Result<TexturedMesh, PlyError> {
    debug!("Loading PLY mesh from: {}", path.as_ref().display());
    let file = File::open(path.as_ref())?;
    let mesh = PlyReader::new().read(BufReader::new(file))?;

    info!(
        "PLY mesh loaded: {} vertices, {} triangles",
        mesh.vertex_list.len(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Parse PLY text held in memory.
pub fn parse_ply_str(text: &str) -> Result<TexturedMesh, PlyError> {
    PlyReader::new().read(Cursor::new(text))
}
