//! Vertex deduplication: collapse byte-identical records.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use cmod_types::Mesh;
use tracing::debug;

use crate::error::OpResult;
use crate::vertex::{RecordEquiv, RecordOrder, VertexView};

/// Collapse byte-identical vertex records and remap group indices.
///
/// Sorts a permutation of the vertex array so identical records become
/// consecutive, keeps the first record of each run, and rewrites every
/// group index through the resulting map. A mesh with no duplicates (or no
/// vertices) is returned untouched, which makes the pass idempotent.
///
/// Returns the number of records removed.
///
/// # Errors
///
/// Propagates buffer replacement failures from the mesh; these cannot
/// occur for a mesh whose buffer length matches its schema.
pub fn dedup_vertices(mesh: &mut Mesh) -> OpResult<usize> {
    let n = mesh.vertex_count() as usize;
    if n == 0 {
        return Ok(0);
    }

    let stride = mesh.description().stride() as usize;
    let data = mesh.vertex_data();

    // Sort record views so identical ones are consecutive.
    let mut views: Vec<VertexView<'_>> = (0..n)
        .map(|i| VertexView::new(i as u32, &data[i * stride..(i + 1) * stride]))
        .collect();
    let ordering = RecordOrder::Full;
    views.sort_unstable_by(|a, b| ordering.compare(a, b));

    // Walk the runs: the first record of each run is its representative.
    let equivalence = RecordEquiv::Exact;
    let mut remap = vec![0u32; n];
    let mut compacted = Vec::new();
    let mut unique = 0u32;
    for i in 0..n {
        if i == 0 || !equivalence.equivalent(&views[i - 1], &views[i]) {
            compacted.extend_from_slice(views[i].record);
            unique += 1;
        }
        remap[views[i].index as usize] = unique - 1;
    }

    let removed = n - unique as usize;
    if removed == 0 {
        return Ok(0);
    }

    debug!(
        vertices = n,
        unique,
        removed,
        "deduplicated vertex records"
    );

    mesh.set_vertices(mesh.description().clone(), unique, compacted)?;
    mesh.remap_indices(&remap);
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cmod_types::{
        PrimitiveGroup, PrimitiveKind, VertexDescription, VertexFormat, VertexSemantic,
    };

    fn position_mesh(positions: &[[f32; 3]]) -> Mesh {
        let desc =
            VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float3)])
                .unwrap();
        let data: Vec<u8> = positions
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        Mesh::with_vertices(desc, positions.len() as u32, data).unwrap()
    }

    fn realized_positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        let stride = mesh.description().stride() as usize;
        let data = mesh.vertex_data();
        mesh.groups()
            .iter()
            .flat_map(|g| g.indices.iter())
            .map(|&i| {
                let at = i as usize * stride;
                [
                    f32::from_le_bytes(data[at..at + 4].try_into().unwrap()),
                    f32::from_le_bytes(data[at + 4..at + 8].try_into().unwrap()),
                    f32::from_le_bytes(data[at + 8..at + 12].try_into().unwrap()),
                ]
            })
            .collect()
    }

    #[test]
    fn collapses_identical_pairs() {
        // Two triangles sharing an edge, stored with six records of which
        // three are byte-identical pairs.
        let mut mesh = position_mesh(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        mesh.add_group(PrimitiveGroup::new(
            PrimitiveKind::TriList,
            0,
            vec![0, 1, 2, 3, 4, 5],
        ));

        let before = realized_positions(&mesh);
        let removed = dedup_vertices(&mut mesh).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(
            mesh.vertex_data().len(),
            4 * mesh.description().stride() as usize
        );

        // The realized triangles are unchanged.
        assert_eq!(realized_positions(&mesh), before);

        // Every index is in range.
        for group in mesh.groups() {
            for &index in &group.indices {
                assert!(index < mesh.vertex_count());
            }
        }
    }

    #[test]
    fn idempotent() {
        let mut mesh = position_mesh(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        mesh.add_group(PrimitiveGroup::new(
            PrimitiveKind::TriList,
            0,
            vec![0, 1, 2, 0, 1, 3],
        ));

        assert_eq!(dedup_vertices(&mut mesh).unwrap(), 1);
        let first = mesh.clone();
        assert_eq!(dedup_vertices(&mut mesh).unwrap(), 0);
        assert_eq!(mesh, first);
    }

    #[test]
    fn empty_mesh_is_a_noop() {
        let desc =
            VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float3)])
                .unwrap();
        let mut mesh = Mesh::new(desc);
        assert_eq!(dedup_vertices(&mut mesh).unwrap(), 0);
    }

    #[test]
    fn unique_mesh_untouched() {
        let mut mesh = position_mesh(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        mesh.add_group(PrimitiveGroup::new(PrimitiveKind::TriList, 3, vec![0, 1, 2]));
        let before = mesh.clone();
        assert_eq!(dedup_vertices(&mut mesh).unwrap(), 0);
        assert_eq!(mesh, before);
    }
}
