//! Error types for CMOD container I/O.

use cmod_types::MeshError;
use thiserror::Error;

/// Result type for CMOD container I/O.
pub type CmodResult<T> = Result<T, CmodError>;

/// Errors that can occur while loading or saving a CMOD container.
#[derive(Debug, Error)]
pub enum CmodError {
    /// The stream does not begin with a CMOD signature.
    #[error("not a CMOD model file (bad signature)")]
    InvalidSignature,

    /// A parse error in the ASCII form.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of what was expected.
        message: String,
    },

    /// Invalid content in the binary form.
    #[error("invalid model content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// The stream ended mid-structure.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A primitive group references a vertex past the declared count.
    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Declared vertex count.
        vertex_count: u32,
    },

    /// A declared schema was rejected by the model types.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmodError {
    /// Create a [`CmodError::Parse`] at the given line.
    #[must_use]
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an [`CmodError::InvalidContent`] error.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
