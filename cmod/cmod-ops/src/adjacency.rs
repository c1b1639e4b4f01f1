//! Per-point face adjacency in compressed sparse row form.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use crate::faces::Face;

/// For every point identity, the faces that contain it.
///
/// Built in two passes over the face list (count, then scatter) into a flat
/// offsets-plus-payload pair, so one transformation allocates exactly two
/// vectors regardless of valence distribution.
#[derive(Debug, Clone)]
pub struct VertexFaceAdjacency {
    offsets: Vec<u32>,
    face_indices: Vec<u32>,
}

impl VertexFaceAdjacency {
    /// Build the adjacency of `faces` over `vertex_count` point identities.
    ///
    /// Uses each face's welded point identities (`vi`), so co-welded
    /// corners share one neighbourhood.
    #[must_use]
    pub fn build(faces: &[Face], vertex_count: u32) -> Self {
        let n = vertex_count as usize;
        let mut counts = vec![0u32; n];
        for face in faces {
            for &v in &face.vi {
                counts[v as usize] += 1;
            }
        }

        let mut offsets = vec![0u32; n + 1];
        for i in 0..n {
            offsets[i + 1] = offsets[i] + counts[i];
        }

        let mut cursor = offsets[..n].to_vec();
        let mut face_indices = vec![0u32; offsets[n] as usize];
        for (f, face) in faces.iter().enumerate() {
            for &v in &face.vi {
                face_indices[cursor[v as usize] as usize] = f as u32;
                cursor[v as usize] += 1;
            }
        }

        Self {
            offsets,
            face_indices,
        }
    }

    /// The faces containing point identity `vertex`.
    #[inline]
    #[must_use]
    pub fn faces_of(&self, vertex: u32) -> &[u32] {
        let start = self.offsets[vertex as usize] as usize;
        let end = self.offsets[vertex as usize + 1] as usize;
        &self.face_indices[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(i: [u32; 3]) -> Face {
        Face {
            i,
            vi: i,
            vector: nalgebra::Vector3::zeros(),
        }
    }

    #[test]
    fn shared_vertex_lists_both_faces() {
        let faces = vec![face([0, 1, 2]), face([2, 1, 3])];
        let adjacency = VertexFaceAdjacency::build(&faces, 4);

        assert_eq!(adjacency.faces_of(0), &[0]);
        assert_eq!(adjacency.faces_of(3), &[1]);

        let mut of_1 = adjacency.faces_of(1).to_vec();
        of_1.sort_unstable();
        assert_eq!(of_1, vec![0, 1]);
    }

    #[test]
    fn unreferenced_vertex_has_no_faces() {
        let faces = vec![face([0, 1, 2])];
        let adjacency = VertexFaceAdjacency::build(&faces, 5);
        assert!(adjacency.faces_of(4).is_empty());
    }
}
