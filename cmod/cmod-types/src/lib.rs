//! Core model types for CMOD processing.
//!
//! This crate provides the object model shared by every CMOD tool:
//!
//! - [`VertexFormat`] / [`VertexSemantic`] - Scalar layout and meaning of one
//!   vertex attribute
//! - [`VertexAttribute`] / [`VertexDescription`] - The schema of an
//!   interleaved vertex record
//! - [`Mesh`] - A raw interleaved vertex buffer plus primitive groups
//! - [`Model`] - An ordered collection of meshes and opaque materials
//!
//! # Vertex Buffers
//!
//! A mesh owns a flat byte buffer of `vertex_count * stride` bytes. The
//! schema drives every read and write: each attribute is located by its byte
//! offset, and scalars are stored **little-endian** regardless of host
//! platform, so byte-level comparisons and on-disk binary payloads agree
//! everywhere.
//!
//! # Example
//!
//! ```
//! use cmod_types::{Mesh, VertexDescription, VertexFormat, VertexSemantic};
//!
//! // A position-only schema: one float3 at offset 0, stride 12.
//! let desc = VertexDescription::from_formats([(
//!     VertexSemantic::Position,
//!     VertexFormat::Float3,
//! )])
//! .unwrap();
//! assert_eq!(desc.stride(), 12);
//!
//! let mut mesh = Mesh::new(desc.clone());
//! let data: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
//!     .iter()
//!     .flat_map(|v| v.to_le_bytes())
//!     .collect();
//! mesh.set_vertices(desc, 3, data).unwrap();
//! assert_eq!(mesh.vertex_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod attribute;
mod desc;
mod error;
mod group;
mod mesh;
mod model;

pub use attribute::{VertexAttribute, VertexFormat, VertexSemantic};
pub use desc::VertexDescription;
pub use error::{MeshError, MeshResult};
pub use group::{PrimitiveGroup, PrimitiveKind};
pub use mesh::Mesh;
pub use model::{Material, Model};
