//! UV-derived tangent generation.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use cmod_types::{Mesh, VertexFormat, VertexSemantic};
use nalgebra::Vector3;
use tracing::debug;

use crate::adjacency::VertexFaceAdjacency;
use crate::error::{OpError, OpResult};
use crate::expand::expand_with_corner_vectors;
use crate::faces::{average_face_vectors, extract_faces};
use crate::vertex::{read_vec2, read_vec3, RecordEquiv, RecordOrder};
use crate::weld::join_vertices;

/// Tolerance used when welding corners by position plus texture coordinate.
const WELD_TOLERANCE: f32 = 1.0e-5;

/// Generate per-corner tangents from the first texture coordinate set.
///
/// Requires a float3 position, a float3 normal, and a float2 `texcoord0`;
/// the mesh must already consist of triangle lists only (the pipeline runs
/// this pass after normal generation, which normalises strips and fans
/// away).
///
/// Welding joins corners only when both position **and** texture coordinate
/// agree within a small relative tolerance, so tangents stay discontinuous
/// across UV seams. Neighbour faces contribute to a corner only while their
/// tangents agree within ninety degrees. The output mesh mirrors the normal
/// pass: augmented schema, one record per face corner, one triangle list
/// per source group.
///
/// # Errors
///
/// - [`OpError::PositionFormat`] when position is missing or not a float3
/// - [`OpError::NormalFormat`] when the normal is missing or not a float3
/// - [`OpError::TexCoordMissing`] / [`OpError::TexCoordFormat`] when
///   `texcoord0` is absent or not a float2
/// - [`OpError::NonListPrimitive`] when a strip or fan survives in the
///   input
pub fn generate_tangents(mesh: &Mesh, weld: bool) -> OpResult<Mesh> {
    let desc = mesh.description();
    let position = desc
        .attribute(VertexSemantic::Position)
        .filter(|attr| attr.format == VertexFormat::Float3)
        .ok_or(OpError::PositionFormat)?;
    desc.attribute(VertexSemantic::Normal)
        .filter(|attr| attr.format == VertexFormat::Float3)
        .ok_or(OpError::NormalFormat)?;
    let texcoord = desc
        .attribute(VertexSemantic::Texture0)
        .ok_or(OpError::TexCoordMissing)?;
    if texcoord.format != VertexFormat::Float2 {
        return Err(OpError::TexCoordFormat);
    }

    let pos_offset = position.offset as usize;
    let tex_offset = texcoord.offset as usize;
    let stride = desc.stride() as usize;

    let mut faces = extract_faces(mesh, true)?;

    // Per-face tangent direction from the UV gradient; a face with a
    // degenerate UV mapping keeps the zero vector.
    let data = mesh.vertex_data();
    for face in &mut faces {
        let p0 = read_vec3(data, face.i[0] as usize * stride + pos_offset);
        let p1 = read_vec3(data, face.i[1] as usize * stride + pos_offset);
        let p2 = read_vec3(data, face.i[2] as usize * stride + pos_offset);
        let tc0 = read_vec2(data, face.i[0] as usize * stride + tex_offset);
        let tc1 = read_vec2(data, face.i[1] as usize * stride + tex_offset);
        let tc2 = read_vec2(data, face.i[2] as usize * stride + tex_offset);

        let s1 = tc1.x - tc0.x;
        let s2 = tc2.x - tc0.x;
        let t1 = tc1.y - tc0.y;
        let t2 = tc2.y - tc0.y;
        let a = s1 * t2 - s2 * t1;
        face.vector = if a == 0.0 {
            Vector3::zeros()
        } else {
            ((p1 - p0) * t2 - (p2 - p0) * t1) / a
        };
    }

    if weld {
        join_vertices(
            &mut faces,
            mesh,
            &RecordOrder::PointTex {
                pos_offset,
                tex_offset,
            },
            &RecordEquiv::PointTex {
                pos_offset,
                tex_offset,
                tolerance: WELD_TOLERANCE,
            },
        );
    }

    let adjacency = VertexFaceAdjacency::build(&faces, mesh.vertex_count());

    // Neighbours with obtuse tangent disagreement are excluded (cos 90).
    let mut corner_tangents: Vec<Vector3<f32>> = Vec::with_capacity(faces.len() * 3);
    for (f, face) in faces.iter().enumerate() {
        for &vi in &face.vi {
            corner_tangents.push(average_face_vectors(
                &faces,
                f as u32,
                adjacency.faces_of(vi),
                0.0,
            ));
        }
    }

    debug!(
        faces = faces.len(),
        vertices = mesh.vertex_count(),
        weld,
        "generated tangents"
    );

    expand_with_corner_vectors(mesh, &faces, &corner_tangents, VertexSemantic::Tangent)
}
