//! Mesh transformations over CMOD models.
//!
//! This crate is the processing core of the `cmodfix` tool. Every
//! transformation is a batch function over [`cmod_types`] values:
//!
//! - [`dedup_vertices`] - Collapse byte-identical vertex records and remap
//!   indices in place
//! - [`generate_normals`] - Rebuild a mesh with smoothing-group corner
//!   normals
//! - [`generate_tangents`] - Rebuild a mesh with UV-derived corner tangents
//! - [`merge_model_meshes`] - Merge meshes that share a vertex schema
//! - [`convert_to_strips`] - Replace triangle lists through a pluggable
//!   strip generator
//!
//! The normal and tangent passes read positions (and texture coordinates)
//! straight out of the interleaved vertex buffer through the schema, join
//! topologically-equivalent face corners with a sort-based weld, and emit a
//! new mesh in which every face corner is a distinct vertex record.
//!
//! # Example
//!
//! ```
//! use cmod_ops::generate_normals;
//! use cmod_types::{Mesh, PrimitiveGroup, PrimitiveKind, VertexDescription,
//!                  VertexFormat, VertexSemantic};
//!
//! let desc = VertexDescription::from_formats([(
//!     VertexSemantic::Position,
//!     VertexFormat::Float3,
//! )])
//! .unwrap();
//! let data: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
//!     .iter()
//!     .flat_map(|v| v.to_le_bytes())
//!     .collect();
//! let mut mesh = Mesh::with_vertices(desc, 3, data).unwrap();
//! mesh.add_group(PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2]));
//!
//! let with_normals = generate_normals(&mesh, 0.0, false).unwrap();
//! assert_eq!(with_normals.description().stride(), 24);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod adjacency;
mod dedup;
mod error;
mod expand;
mod faces;
mod merge;
mod normals;
mod strip;
mod tangents;
mod vertex;
mod weld;

pub use adjacency::VertexFaceAdjacency;
pub use dedup::dedup_vertices;
pub use error::{OpError, OpResult};
pub use faces::{average_face_vectors, extract_faces, Face};
pub use merge::merge_model_meshes;
pub use normals::generate_normals;
pub use strip::{convert_to_strips, GreedyStripGenerator, StripGenerator, StripGroup};
pub use tangents::generate_tangents;
pub use vertex::{RecordEquiv, RecordOrder, VertexView};
pub use weld::join_vertices;
