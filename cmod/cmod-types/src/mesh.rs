//! The mesh container: a schema, a raw vertex buffer, and primitive groups.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::desc::VertexDescription;
use crate::error::{MeshError, MeshResult};
use crate::group::PrimitiveGroup;

/// A triangle mesh with an interleaved, schema-described vertex buffer.
///
/// The vertex buffer always holds exactly `vertex_count * stride` bytes;
/// [`Mesh::set_vertices`] is the only way to replace it (and, with it, the
/// schema). Scalars in the buffer are stored little-endian.
///
/// # Example
///
/// ```
/// use cmod_types::{Mesh, PrimitiveGroup, PrimitiveKind, VertexDescription,
///                  VertexFormat, VertexSemantic};
///
/// let desc = VertexDescription::from_formats([(
///     VertexSemantic::Position,
///     VertexFormat::Float3,
/// )])
/// .unwrap();
///
/// let data: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
///     .iter()
///     .flat_map(|v| v.to_le_bytes())
///     .collect();
///
/// let mut mesh = Mesh::new(desc.clone());
/// mesh.set_vertices(desc, 3, data).unwrap();
/// mesh.add_group(PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2]));
/// assert_eq!(mesh.groups().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    desc: VertexDescription,
    vertex_count: u32,
    vertex_data: Vec<u8>,
    groups: Vec<PrimitiveGroup>,
}

impl Mesh {
    /// Create an empty mesh with the given schema.
    #[must_use]
    pub const fn new(desc: VertexDescription) -> Self {
        Self {
            desc,
            vertex_count: 0,
            vertex_data: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Create a mesh from a schema and a filled vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexDataSize`] if `data.len()` differs from
    /// `vertex_count * stride`.
    pub fn with_vertices(
        desc: VertexDescription,
        vertex_count: u32,
        data: Vec<u8>,
    ) -> MeshResult<Self> {
        let mut mesh = Self::new(desc.clone());
        mesh.set_vertices(desc, vertex_count, data)?;
        Ok(mesh)
    }

    /// Replace the vertex buffer, and with it the schema.
    ///
    /// This is the only mutation that may change the schema; primitive
    /// groups are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexDataSize`] if `data.len()` differs from
    /// `vertex_count * stride`.
    pub fn set_vertices(
        &mut self,
        desc: VertexDescription,
        vertex_count: u32,
        data: Vec<u8>,
    ) -> MeshResult<()> {
        let expected = vertex_count as usize * desc.stride() as usize;
        if data.len() != expected {
            return Err(MeshError::VertexDataSize {
                expected,
                got: data.len(),
            });
        }
        self.desc = desc;
        self.vertex_count = vertex_count;
        self.vertex_data = data;
        Ok(())
    }

    /// The vertex schema.
    #[inline]
    #[must_use]
    pub const fn description(&self) -> &VertexDescription {
        &self.desc
    }

    /// Number of vertex records.
    #[inline]
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// The raw interleaved vertex buffer.
    #[inline]
    #[must_use]
    pub fn vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// The primitive groups, in order.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[PrimitiveGroup] {
        &self.groups
    }

    /// Append a primitive group.
    pub fn add_group(&mut self, group: PrimitiveGroup) {
        self.groups.push(group);
    }

    /// Remove all primitive groups.
    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Rewrite every group index through `map` (old index to new index).
    ///
    /// Indices outside `map` are left unchanged; callers are expected to
    /// provide a map covering every vertex.
    pub fn remap_indices(&mut self, map: &[u32]) {
        for group in &mut self.groups {
            for index in &mut group.indices {
                if let Some(&new) = map.get(*index as usize) {
                    *index = new;
                }
            }
        }
    }
}
