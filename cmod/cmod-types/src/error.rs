//! Error types for the CMOD object model.

use thiserror::Error;

use crate::attribute::VertexSemantic;

/// Result type for model construction and mutation.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while building or mutating model types.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A semantic appeared more than once in one vertex description.
    #[error("duplicate vertex attribute semantic: {semantic}")]
    DuplicateSemantic {
        /// The repeated semantic.
        semantic: VertexSemantic,
    },

    /// An attribute extends past the end of the vertex record.
    #[error("attribute {semantic} at offset {offset} overruns stride {stride}")]
    AttributeOutOfBounds {
        /// Semantic of the offending attribute.
        semantic: VertexSemantic,
        /// Byte offset of the attribute.
        offset: u32,
        /// Record stride in bytes.
        stride: u32,
    },

    /// Vertex data length does not equal `vertex_count * stride`.
    #[error("vertex data is {got} bytes, expected {expected}")]
    VertexDataSize {
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        got: usize,
    },
}
