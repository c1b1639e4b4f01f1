//! Vertex attribute formats, semantics, and the attribute triple.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar layout of one vertex attribute.
///
/// Every format has a fixed byte size; scalars are `f32` except for
/// [`VertexFormat::UByte4`], which packs four unsigned bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum VertexFormat {
    /// One 32-bit float.
    Float1 = 0,
    /// Two 32-bit floats.
    Float2 = 1,
    /// Three 32-bit floats.
    Float3 = 2,
    /// Four 32-bit floats.
    Float4 = 3,
    /// Four unsigned bytes.
    UByte4 = 4,
}

impl VertexFormat {
    /// Byte size of one value of this format.
    #[inline]
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Float1 | Self::UByte4 => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }

    /// Number of whitespace-separated scalars in the textual form.
    #[inline]
    #[must_use]
    pub const fn scalar_count(self) -> usize {
        match self {
            Self::Float1 => 1,
            Self::Float2 => 2,
            Self::Float3 => 3,
            Self::Float4 | Self::UByte4 => 4,
        }
    }

    /// The token used for this format in the ASCII container form.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Float1 => "f1",
            Self::Float2 => "f2",
            Self::Float3 => "f3",
            Self::Float4 => "f4",
            Self::UByte4 => "ub4",
        }
    }

    /// Parse an ASCII container token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "f1" => Some(Self::Float1),
            "f2" => Some(Self::Float2),
            "f3" => Some(Self::Float3),
            "f4" => Some(Self::Float4),
            "ub4" => Some(Self::UByte4),
            _ => None,
        }
    }

    /// Decode the binary container byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Float1),
            1 => Some(Self::Float2),
            2 => Some(Self::Float3),
            3 => Some(Self::Float4),
            4 => Some(Self::UByte4),
            _ => None,
        }
    }
}

impl fmt::Display for VertexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Meaning of one vertex attribute.
///
/// The declaration order of the variants defines the total order used when
/// comparing vertex descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum VertexSemantic {
    /// Vertex position.
    Position = 0,
    /// Primary vertex color.
    Color0 = 1,
    /// Secondary vertex color.
    Color1 = 2,
    /// Vertex normal.
    Normal = 3,
    /// Tangent-space basis vector.
    Tangent = 4,
    /// First texture coordinate set.
    Texture0 = 5,
    /// Second texture coordinate set.
    Texture1 = 6,
    /// Third texture coordinate set.
    Texture2 = 7,
    /// Fourth texture coordinate set.
    Texture3 = 8,
    /// Point sprite size.
    PointSize = 9,
}

impl VertexSemantic {
    /// The token used for this semantic in the ASCII container form.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Color0 => "color0",
            Self::Color1 => "color1",
            Self::Normal => "normal",
            Self::Tangent => "tangent",
            Self::Texture0 => "texcoord0",
            Self::Texture1 => "texcoord1",
            Self::Texture2 => "texcoord2",
            Self::Texture3 => "texcoord3",
            Self::PointSize => "pointsize",
        }
    }

    /// Parse an ASCII container token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "position" => Some(Self::Position),
            "color0" => Some(Self::Color0),
            "color1" => Some(Self::Color1),
            "normal" => Some(Self::Normal),
            "tangent" => Some(Self::Tangent),
            "texcoord0" => Some(Self::Texture0),
            "texcoord1" => Some(Self::Texture1),
            "texcoord2" => Some(Self::Texture2),
            "texcoord3" => Some(Self::Texture3),
            "pointsize" => Some(Self::PointSize),
            _ => None,
        }
    }

    /// Decode the binary container byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Position),
            1 => Some(Self::Color0),
            2 => Some(Self::Color1),
            3 => Some(Self::Normal),
            4 => Some(Self::Tangent),
            5 => Some(Self::Texture0),
            6 => Some(Self::Texture1),
            7 => Some(Self::Texture2),
            8 => Some(Self::Texture3),
            9 => Some(Self::PointSize),
            _ => None,
        }
    }
}

impl fmt::Display for VertexSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One attribute of a vertex record: semantic, format, and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexAttribute {
    /// What the attribute means.
    pub semantic: VertexSemantic,
    /// How the attribute is laid out.
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex record.
    pub offset: u32,
}

impl VertexAttribute {
    /// Create an attribute.
    #[inline]
    #[must_use]
    pub const fn new(semantic: VertexSemantic, format: VertexFormat, offset: u32) -> Self {
        Self {
            semantic,
            format,
            offset,
        }
    }
}

impl PartialOrd for VertexAttribute {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexAttribute {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.semantic
            .cmp(&other.semantic)
            .then_with(|| self.format.cmp(&other.format))
            .then_with(|| self.offset.cmp(&other.offset))
    }
}
