//! Smoothing-group normal generation.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use cmod_types::{Mesh, VertexFormat, VertexSemantic};
use nalgebra::Vector3;
use tracing::debug;

use crate::adjacency::VertexFaceAdjacency;
use crate::error::{OpError, OpResult};
use crate::expand::expand_with_corner_vectors;
use crate::faces::{average_face_vectors, extract_faces};
use crate::vertex::{read_vec3, RecordEquiv, RecordOrder};
use crate::weld::join_vertices;

/// Generate per-corner normals smoothed across co-welded faces.
///
/// Faces whose geometric normals agree within `smooth_angle` **radians**
/// contribute to each other's corner normals wherever welding (or exact
/// index sharing) joins their corners. The result is a new mesh: the schema
/// gains a float3 normal, every face corner becomes a distinct vertex
/// record, and each source primitive group reappears as a triangle list
/// with its material index intact.
///
/// A smoothing angle of zero yields flat shading; an angle of pi smooths
/// every face sharing a point.
///
/// # Errors
///
/// - [`OpError::PositionFormat`] when the mesh's position attribute is
///   missing or not a float3
/// - Any face-extraction error of [`extract_faces`]
pub fn generate_normals(mesh: &Mesh, smooth_angle: f32, weld: bool) -> OpResult<Mesh> {
    let desc = mesh.description();
    let position = desc
        .attribute(VertexSemantic::Position)
        .filter(|attr| attr.format == VertexFormat::Float3)
        .ok_or(OpError::PositionFormat)?;
    let pos_offset = position.offset as usize;
    let stride = desc.stride() as usize;
    let cos_smooth_angle = smooth_angle.cos();

    let mut faces = extract_faces(mesh, false)?;

    // Geometric face normals; degenerate faces keep the zero vector and
    // contribute nothing to the averages.
    let data = mesh.vertex_data();
    for face in &mut faces {
        let p0 = read_vec3(data, face.i[0] as usize * stride + pos_offset);
        let p1 = read_vec3(data, face.i[1] as usize * stride + pos_offset);
        let p2 = read_vec3(data, face.i[2] as usize * stride + pos_offset);
        let normal = (p1 - p0).cross(&(p2 - p1));
        face.vector = if normal.norm_squared() > 0.0 {
            normal.normalize()
        } else {
            normal
        };
    }

    if weld {
        join_vertices(
            &mut faces,
            mesh,
            &RecordOrder::Point { pos_offset },
            &RecordEquiv::Point {
                pos_offset,
                tolerance: 0.0,
            },
        );
    }

    let adjacency = VertexFaceAdjacency::build(&faces, mesh.vertex_count());

    let mut corner_normals: Vec<Vector3<f32>> = Vec::with_capacity(faces.len() * 3);
    for (f, face) in faces.iter().enumerate() {
        for &vi in &face.vi {
            corner_normals.push(average_face_vectors(
                &faces,
                f as u32,
                adjacency.faces_of(vi),
                cos_smooth_angle,
            ));
        }
    }

    debug!(
        faces = faces.len(),
        vertices = mesh.vertex_count(),
        weld,
        "generated smoothed normals"
    );

    expand_with_corner_vectors(mesh, &faces, &corner_normals, VertexSemantic::Normal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cmod_types::{PrimitiveGroup, PrimitiveKind, VertexDescription};

    fn position_mesh(positions: &[[f32; 3]], groups: Vec<PrimitiveGroup>) -> Mesh {
        let desc =
            VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float3)])
                .unwrap();
        let data: Vec<u8> = positions
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let mut mesh = Mesh::with_vertices(desc, positions.len() as u32, data).unwrap();
        for group in groups {
            mesh.add_group(group);
        }
        mesh
    }

    fn normal_of(mesh: &Mesh, vertex: u32) -> Vector3<f32> {
        let offset = mesh
            .description()
            .attribute(VertexSemantic::Normal)
            .unwrap()
            .offset as usize;
        let stride = mesh.description().stride() as usize;
        read_vec3(mesh.vertex_data(), vertex as usize * stride + offset)
    }

    #[test]
    fn flat_triangle_gets_plane_normal() {
        let mesh = position_mesh(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2])],
        );

        let result = generate_normals(&mesh, 0.0, false).unwrap();

        let desc = result.description();
        assert_eq!(desc.stride(), 24);
        assert_eq!(desc.attribute(VertexSemantic::Position).unwrap().offset, 0);
        assert_eq!(desc.attribute(VertexSemantic::Normal).unwrap().offset, 12);
        assert_eq!(result.vertex_count(), 3);
        assert_eq!(result.groups().len(), 1);
        assert_eq!(result.groups()[0].kind, PrimitiveKind::TriList);
        assert_eq!(result.groups()[0].indices, vec![0, 1, 2]);

        for v in 0..3 {
            assert_relative_eq!(normal_of(&result, v), Vector3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn welded_planar_quad_is_smooth_everywhere() {
        // Two coplanar triangles in the z = 0 plane with duplicated edge
        // records; welding joins them.
        let mesh = position_mesh(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![PrimitiveGroup::new(
                PrimitiveKind::TriList,
                0,
                vec![0, 1, 2, 3, 4, 5],
            )],
        );

        for (angle, weld) in [(std::f32::consts::PI, true), (0.0, false)] {
            let result = generate_normals(&mesh, angle, weld).unwrap();
            for v in 0..result.vertex_count() {
                assert_relative_eq!(normal_of(&result, v), Vector3::new(0.0, 0.0, 1.0));
            }
        }
    }

    #[test]
    fn strip_decomposes_into_sequential_list() {
        let mesh = position_mesh(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 2.0, 0.0],
            ],
            vec![PrimitiveGroup::new(
                PrimitiveKind::TriStrip,
                2,
                vec![0, 1, 2, 3, 4],
            )],
        );

        let result = generate_normals(&mesh, 0.0, false).unwrap();
        assert_eq!(result.vertex_count(), 9);
        assert_eq!(result.groups().len(), 1);
        let group = &result.groups()[0];
        assert_eq!(group.kind, PrimitiveKind::TriList);
        assert_eq!(group.material_index, 2);
        assert_eq!(group.indices, (0..9).collect::<Vec<u32>>());
    }

    #[test]
    fn degenerate_face_falls_back_to_unit_x() {
        let mesh = position_mesh(
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
            vec![PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2])],
        );
        let result = generate_normals(&mesh, 0.0, false).unwrap();
        for v in 0..3 {
            assert_eq!(normal_of(&result, v), Vector3::new(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn non_float3_position_rejected() {
        let desc =
            VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float2)])
                .unwrap();
        let mesh = Mesh::with_vertices(desc, 0, Vec::new()).unwrap();
        assert!(matches!(
            generate_normals(&mesh, 0.0, false),
            Err(OpError::PositionFormat)
        ));
    }

    #[test]
    fn material_indices_survive() {
        let mesh = position_mesh(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [2.0, 0.0, 0.0],
                [3.0, 0.0, 0.0],
                [2.0, 1.0, 0.0],
            ],
            vec![
                PrimitiveGroup::new(PrimitiveKind::TriList, 5, vec![0, 1, 2]),
                PrimitiveGroup::new(PrimitiveKind::TriList, 9, vec![3, 4, 5]),
            ],
        );
        let result = generate_normals(&mesh, 0.0, false).unwrap();
        assert_eq!(result.groups()[0].material_index, 5);
        assert_eq!(result.groups()[1].material_index, 9);
        assert_eq!(result.groups()[0].indices, vec![0, 1, 2]);
        assert_eq!(result.groups()[1].indices, vec![3, 4, 5]);
    }
}
