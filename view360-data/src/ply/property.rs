//! Header-level PLY descriptors: encoding, vertex property set and layout.

use bitflags::bitflags;

/// Data encoding declared on the `format` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlyEncoding {
    #[default]
    Ascii,
    Binary,
}

impl PlyEncoding {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ascii" => Some(Self::Ascii),
            // binary_little_endian / binary_big_endian are recorded as binary too
            t if t.starts_with("binary") => Some(Self::Binary),
            _ => None,
        }
    }
}

bitflags! {
    /// Per-vertex float properties recognized in the header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VertexPropertySet: u32 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
        const NX = 1 << 3;
        const NY = 1 << 4;
        const NZ = 1 << 5;
        const S = 1 << 6;
        const T = 1 << 7;
    }
}

impl VertexPropertySet {
    pub const POSITION_UV: Self = Self::X
        .union(Self::Y)
        .union(Self::Z)
        .union(Self::S)
        .union(Self::T);

    pub const POSITION_NORMAL_UV: Self = Self::POSITION_UV
        .union(Self::NX)
        .union(Self::NY)
        .union(Self::NZ);

    /// Map a `property float <name>` name to its flag.
    pub fn from_property_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            "nx" => Some(Self::NX),
            "ny" => Some(Self::NY),
            "nz" => Some(Self::NZ),
            "s" => Some(Self::S),
            "t" => Some(Self::T),
            _ => None,
        }
    }
}

/// The two vertex row layouts the reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `x y z nx ny nz s t`
    PositionNormalUv,
    /// `x y z s t`
    PositionUv,
}

impl VertexLayout {
    /// Classify a property set; anything but the two exact layouts is rejected.
    pub fn classify(props: VertexPropertySet) -> Option<Self> {
        if props == VertexPropertySet::POSITION_NORMAL_UV {
            Some(Self::PositionNormalUv)
        } else if props == VertexPropertySet::POSITION_UV {
            Some(Self::PositionUv)
        } else {
            None
        }
    }

    /// Number of floats on each vertex line.
    pub fn field_count(self) -> usize {
        match self {
            Self::PositionNormalUv => 8,
            Self::PositionUv => 5,
        }
    }

    /// Column of the `s` coordinate; `t` follows it.
    pub fn uv_offset(self) -> usize {
        match self {
            Self::PositionNormalUv => 6,
            Self::PositionUv => 3,
        }
    }
}
