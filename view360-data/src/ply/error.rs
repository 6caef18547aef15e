use thiserror::Error;

/// Errors that can occur while parsing a PLY stream.
///
/// Line numbers are 1-based and count every line read from the stream.
#[derive(Debug, Error)]
pub enum PlyError {
    #[error("Not a PLY file (line {line})")]
    NotAPlyFile { line: usize },

    #[error("Unsupported format or version at line {line}: {reason}")]
    UnsupportedFormatOrVersion { line: usize, reason: String },

    #[error("Missing or invalid header field at line {line}: {reason}")]
    MissingOrInvalidHeaderField { line: usize, reason: String },

    #[error("Unsupported vertex layout at line {line}: properties {properties}")]
    UnsupportedVertexLayout { line: usize, properties: String },

    #[error("Only triangles are supported, face at line {line} has {count} vertices")]
    UnsupportedPolygon { line: usize, count: i64 },

    #[error("Malformed data line {line}: {reason}")]
    MalformedDataLine { line: usize, reason: String },

    #[error("Face at line {line} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        line: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Unexpected end of stream after line {line} while reading {expected}")]
    UnexpectedEndOfStream { line: usize, expected: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
