//! Reader and writer for the CMOD model container.
//!
//! A CMOD stream carries an ordered list of opaque materials followed by an
//! ordered list of meshes, in one of two forms distinguished by a 16-byte
//! signature:
//!
//! - **ASCII** (`#celmodel__ascii`) - line-oriented blocks of
//!   whitespace-separated tokens
//! - **Binary** (`#celmodel_binary`) - little-endian scalars with
//!   length-prefixed strings
//!
//! Both forms store a mesh's vertex schema as `(semantic, format)` pairs in
//! declaration order; attribute offsets and the record stride are
//! reconstructed by packing the pairs in that order. Materials are opaque
//! property lines preserved verbatim, so a model survives
//! load → transform → save without the tool understanding its materials.
//!
//! # Example
//!
//! ```
//! use cmod_io::{load_model, save_model_ascii};
//! use cmod_types::Model;
//!
//! let mut out = Vec::new();
//! save_model_ascii(&Model::new(), &mut out).unwrap();
//!
//! let model = load_model(&mut out.as_slice()).unwrap();
//! assert!(model.meshes().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod ascii;
mod binary;
mod error;

pub use ascii::save_model_ascii;
pub use binary::save_model_binary;
pub use error::{CmodError, CmodResult};

use std::io::BufRead;

use cmod_types::Model;

/// Signature that opens the ASCII form.
pub const ASCII_SIGNATURE: &[u8; 16] = b"#celmodel__ascii";

/// Signature that opens the binary form.
pub const BINARY_SIGNATURE: &[u8; 16] = b"#celmodel_binary";

/// Load a model, auto-detecting the container form from its signature.
///
/// # Errors
///
/// Returns [`CmodError::InvalidSignature`] when the stream opens with
/// neither signature, or any parse/IO error from the detected form.
pub fn load_model<R: BufRead>(reader: &mut R) -> CmodResult<Model> {
    let mut signature = [0u8; 16];
    reader
        .read_exact(&mut signature)
        .map_err(|_| CmodError::InvalidSignature)?;

    if &signature == ASCII_SIGNATURE {
        ascii::load_body(reader)
    } else if &signature == BINARY_SIGNATURE {
        binary::load_body(reader)
    } else {
        Err(CmodError::InvalidSignature)
    }
}
