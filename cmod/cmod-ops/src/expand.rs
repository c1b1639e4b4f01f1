//! Corner expansion: rebuild a mesh with one vertex record per face corner.
//!
//! Shared tail of the normal and tangent passes. The schema is augmented
//! with the generated attribute, every face corner becomes a distinct
//! record copied from its source attributes, and each original primitive
//! group is re-emitted as a triangle list over sequential indices.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use cmod_types::{Mesh, PrimitiveGroup, PrimitiveKind, VertexFormat, VertexSemantic};
use nalgebra::Vector3;

use crate::error::OpResult;
use crate::faces::Face;

/// Build the new mesh for a generation pass.
///
/// `corner_vectors` holds one generated float3 per face corner, in face
/// order; it is written into the `semantic` slot of the augmented schema
/// while every other attribute of the new record is copied from the source
/// record at the corner's attribute index.
pub(crate) fn expand_with_corner_vectors(
    mesh: &Mesh,
    faces: &[Face],
    corner_vectors: &[Vector3<f32>],
    semantic: VertexSemantic,
) -> OpResult<Mesh> {
    let desc = mesh.description();
    let new_desc = desc.augmented(semantic, VertexFormat::Float3);
    let new_stride = new_desc.stride() as usize;
    let old_stride = desc.stride() as usize;

    // For each attribute of the new schema, the offset it is copied from in
    // the old record; the generated slot has no source.
    let mut target_offset = 0usize;
    let mut from_offsets: Vec<Option<(usize, usize)>> = Vec::new();
    for attr in new_desc.attributes() {
        if attr.semantic == semantic {
            target_offset = attr.offset as usize;
            from_offsets.push(None);
        } else {
            from_offsets.push(
                desc.attribute(attr.semantic)
                    .map(|old| (old.offset as usize, attr.format.size() as usize)),
            );
        }
    }

    let old_data = mesh.vertex_data();
    let mut data = vec![0u8; faces.len() * 3 * new_stride];
    for (f, face) in faces.iter().enumerate() {
        for j in 0..3 {
            let corner = f * 3 + j;
            let record = &mut data[corner * new_stride..(corner + 1) * new_stride];
            let source = &old_data[face.i[j] as usize * old_stride..];

            for (attr, from) in new_desc.attributes().iter().zip(&from_offsets) {
                if let Some((from_offset, size)) = *from {
                    let to = attr.offset as usize;
                    record[to..to + size].copy_from_slice(&source[from_offset..from_offset + size]);
                }
            }

            let vector = corner_vectors[corner];
            for (k, component) in [vector.x, vector.y, vector.z].into_iter().enumerate() {
                let at = target_offset + k * 4;
                record[at..at + 4].copy_from_slice(&component.to_le_bytes());
            }
        }
    }

    let mut new_mesh = Mesh::with_vertices(new_desc, faces.len() as u32 * 3, data)?;

    // One triangle list per original group, over sequential indices.
    let mut first_index = 0u32;
    for group in mesh.groups() {
        let index_count = group.face_count() as u32 * 3;
        new_mesh.add_group(PrimitiveGroup::new(
            PrimitiveKind::TriList,
            group.material_index,
            (first_index..first_index + index_count).collect(),
        ));
        first_index += index_count;
    }

    Ok(new_mesh)
}
