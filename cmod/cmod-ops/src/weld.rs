//! Sort-based welding of face corners.

use cmod_types::Mesh;

use crate::faces::Face;
use crate::vertex::{RecordEquiv, RecordOrder, VertexView};

/// Join topologically-equivalent face corners without touching the vertex
/// buffer.
///
/// Builds one record view per face corner, sorts them under `ordering`, and
/// assigns every corner in a run of `equivalence`-equal records the point
/// identity of the run's first record. After the pass, `face.i` still
/// indexes the attribute buffer while `face.vi` carries the merged point
/// identity.
pub fn join_vertices(
    faces: &mut [Face],
    mesh: &Mesh,
    ordering: &RecordOrder,
    equivalence: &RecordEquiv,
) {
    if faces.is_empty() {
        return;
    }

    let stride = mesh.description().stride() as usize;
    let data = mesh.vertex_data();

    let mut views: Vec<VertexView<'_>> = Vec::with_capacity(faces.len() * 3);
    for face in faces.iter() {
        for &index in &face.i {
            let at = index as usize * stride;
            views.push(VertexView::new(index, &data[at..at + stride]));
        }
    }

    views.sort_by(|a, b| ordering.compare(a, b));

    // Identity-initialised so attribute indices never referenced by a face
    // keep themselves as representative.
    let mut merge_map: Vec<u32> = (0..mesh.vertex_count()).collect();
    let mut last_unique = 0;
    for i in 0..views.len() {
        if i == 0 || !equivalence.equivalent(&views[i - 1], &views[i]) {
            last_unique = i;
        }
        merge_map[views[i].index as usize] = views[last_unique].index;
    }

    for face in faces.iter_mut() {
        for k in 0..3 {
            face.vi[k] = merge_map[face.i[k] as usize];
        }
    }
}
