//! Face extraction: flatten primitive groups into explicit triangles.

use cmod_types::{Mesh, PrimitiveKind};
use nalgebra::Vector3;

use crate::error::{OpError, OpResult};

/// One triangle of a mesh, as used by the normal and tangent passes.
///
/// `i` are indices into the vertex attribute buffer; `vi` are the point
/// identities assigned by welding (equal to `i` until a weld runs).
/// `vector` caches the face's geometric normal or tangent-plane direction.
#[derive(Debug, Clone)]
pub struct Face {
    /// Vertex attribute indices, winding order preserved.
    pub i: [u32; 3],
    /// Point identities used to aggregate smoothing neighbourhoods.
    pub vi: [u32; 3],
    /// Cached per-face vector (normal or tangent direction).
    pub vector: Vector3<f32>,
}

impl Face {
    fn new(i0: u32, i1: u32, i2: u32) -> Self {
        Self {
            i: [i0, i1, i2],
            vi: [i0, i1, i2],
            vector: Vector3::zeros(),
        }
    }
}

/// Flatten every primitive group of `mesh` into a triangle list.
///
/// Strips and fans are decomposed with winding preserved: triangle `j` of a
/// strip reverses its leading edge when `j` is odd, and a fan pivots on its
/// first index. Group order is preserved in the output.
///
/// # Errors
///
/// - [`OpError::ListIndexCount`] / [`OpError::StripIndexCount`] when a
///   group's index count violates its primitive kind
/// - [`OpError::NonListPrimitive`] when `lists_only` is set and a strip or
///   fan is present
/// - [`OpError::IndexOutOfRange`] when a group references a vertex past the
///   end of the vertex array
pub fn extract_faces(mesh: &Mesh, lists_only: bool) -> OpResult<Vec<Face>> {
    let vertex_count = mesh.vertex_count();
    let mut faces = Vec::new();

    for group in mesh.groups() {
        let indices = &group.indices;
        if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
            return Err(OpError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        match group.kind {
            PrimitiveKind::TriList => {
                if indices.len() < 3 || indices.len() % 3 != 0 {
                    return Err(OpError::ListIndexCount {
                        count: indices.len(),
                    });
                }
                for tri in indices.chunks_exact(3) {
                    faces.push(Face::new(tri[0], tri[1], tri[2]));
                }
            }
            PrimitiveKind::TriStrip => {
                if lists_only {
                    return Err(OpError::NonListPrimitive);
                }
                if indices.len() < 3 {
                    return Err(OpError::StripIndexCount {
                        count: indices.len(),
                    });
                }
                for j in 2..indices.len() {
                    if j % 2 == 0 {
                        faces.push(Face::new(indices[j - 2], indices[j - 1], indices[j]));
                    } else {
                        faces.push(Face::new(indices[j - 1], indices[j - 2], indices[j]));
                    }
                }
            }
            PrimitiveKind::TriFan => {
                if lists_only {
                    return Err(OpError::NonListPrimitive);
                }
                if indices.len() < 3 {
                    return Err(OpError::StripIndexCount {
                        count: indices.len(),
                    });
                }
                for j in 2..indices.len() {
                    faces.push(Face::new(indices[0], indices[j - 1], indices[j]));
                }
            }
        }
    }

    Ok(faces)
}

/// Average the cached vectors of a face's smoothing neighbourhood.
///
/// A neighbour `g` contributes when it is `this_face` itself or when its
/// vector agrees with this face's vector beyond `cos_threshold` (strict
/// comparison, so an exactly-threshold neighbour is excluded). A zero sum
/// falls back to `(1, 0, 0)`; otherwise the sum is normalised.
#[must_use]
pub fn average_face_vectors(
    faces: &[Face],
    this_face: u32,
    neighbors: &[u32],
    cos_threshold: f32,
) -> Vector3<f32> {
    let face = &faces[this_face as usize];

    let mut sum = Vector3::zeros();
    for &g in neighbors {
        let cos_angle = face.vector.dot(&faces[g as usize].vector);
        if g == this_face || cos_angle > cos_threshold {
            sum += faces[g as usize].vector;
        }
    }

    if sum.norm_squared() == 0.0 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        sum.normalize()
    }
}
