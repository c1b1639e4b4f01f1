//! Primitive groups: runs of indices under one primitive kind and material.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a group's indices assemble into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PrimitiveKind {
    /// Independent triangles, three indices each.
    TriList = 0,
    /// A triangle strip: `n - 2` triangles with alternating winding.
    TriStrip = 1,
    /// A triangle fan around the first index.
    TriFan = 2,
}

impl PrimitiveKind {
    /// The token used for this kind in the ASCII container form.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::TriList => "trilist",
            Self::TriStrip => "tristrip",
            Self::TriFan => "trifan",
        }
    }

    /// Parse an ASCII container token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "trilist" => Some(Self::TriList),
            "tristrip" => Some(Self::TriStrip),
            "trifan" => Some(Self::TriFan),
            _ => None,
        }
    }

    /// Decode the binary container byte.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::TriList),
            1 => Some(Self::TriStrip),
            2 => Some(Self::TriFan),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A contiguous run of vertex indices under one primitive kind and material.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrimitiveGroup {
    /// How the indices assemble into triangles.
    pub kind: PrimitiveKind,
    /// Index into the owning model's material list.
    pub material_index: u32,
    /// Indices into the owning mesh's vertex array.
    pub indices: Vec<u32>,
}

impl PrimitiveGroup {
    /// Create a group.
    #[inline]
    #[must_use]
    pub const fn new(kind: PrimitiveKind, material_index: u32, indices: Vec<u32>) -> Self {
        Self {
            kind,
            material_index,
            indices,
        }
    }

    /// Number of triangles this group realises.
    ///
    /// A list realises `n / 3` triangles; strips and fans realise `n - 2`.
    #[must_use]
    pub fn face_count(&self) -> usize {
        match self.kind {
            PrimitiveKind::TriList => self.indices.len() / 3,
            PrimitiveKind::TriStrip | PrimitiveKind::TriFan => {
                self.indices.len().saturating_sub(2)
            }
        }
    }
}
