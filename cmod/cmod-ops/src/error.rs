//! Error types for mesh transformations.

use cmod_types::MeshError;
use thiserror::Error;

/// Result type for mesh transformations.
pub type OpResult<T> = Result<T, OpError>;

/// Errors that can occur during a mesh transformation.
///
/// Every failure is terminal: the pipeline reports the diagnostic and
/// aborts without a partial commit.
#[derive(Debug, Error)]
pub enum OpError {
    /// Normal or tangent pass on a mesh whose position is not a float3.
    #[error("vertex position must be a float3")]
    PositionFormat,

    /// Tangent pass on a mesh whose normal is missing or not a float3.
    #[error("float3 format vertex normal required")]
    NormalFormat,

    /// Tangent pass on a mesh with no first texture coordinate set.
    #[error("texture coordinates must be present in mesh to generate tangents")]
    TexCoordMissing,

    /// Tangent pass on a mesh whose first texture coordinate set is not a
    /// float2.
    #[error("texture coordinate must be a float2")]
    TexCoordFormat,

    /// A triangle list whose index count is not a positive multiple of
    /// three.
    #[error("triangle list has invalid number of indices ({count})")]
    ListIndexCount {
        /// The offending index count.
        count: usize,
    },

    /// A strip or fan with fewer than three indices.
    #[error("tri strip or fan has less than three indices ({count})")]
    StripIndexCount {
        /// The offending index count.
        count: usize,
    },

    /// Tangent pass on a mesh still containing strips or fans.
    #[error("mesh should contain just triangle lists")]
    NonListPrimitive,

    /// A group references a vertex past the end of the vertex buffer.
    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: u32,
    },

    /// The strip generator reported failure.
    #[error("generate tri strips failed")]
    StripFailed,

    /// A rebuilt vertex buffer disagreed with its schema.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
