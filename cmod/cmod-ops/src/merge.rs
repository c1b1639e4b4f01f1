//! Mesh merging: combine meshes that share a vertex schema.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use cmod_types::{Mesh, Model, PrimitiveGroup};
use tracing::debug;

use crate::error::OpResult;

/// Merge all meshes of `model` that share an identical vertex description.
///
/// Meshes are grouped by the schema total order; within a group, vertex
/// buffers are concatenated in model order and every primitive group is
/// re-emitted with its indices rebased by the running vertex offset.
/// Materials are copied to the new model unchanged and in order, so the
/// material indices carried by the groups stay valid. Meshes with unique
/// schemas are carried over as single-mesh groups.
///
/// # Errors
///
/// Propagates buffer construction failures; these cannot occur for meshes
/// whose buffers match their schemas.
pub fn merge_model_meshes(model: &Model) -> OpResult<Model> {
    let mut order: Vec<usize> = (0..model.meshes().len()).collect();
    order.sort_by(|&a, &b| {
        model.meshes()[a]
            .description()
            .cmp(model.meshes()[b].description())
    });

    let mut merged = Model::new();
    for material in model.materials() {
        merged.add_material(material.clone());
    }

    let mut start = 0;
    while start < order.len() {
        let desc = model.meshes()[order[start]].description();

        let mut end = start + 1;
        while end < order.len() && model.meshes()[order[end]].description() == desc {
            end += 1;
        }

        let members = &order[start..end];
        let total_vertices: u32 = members
            .iter()
            .map(|&m| model.meshes()[m].vertex_count())
            .sum();

        let mut data = Vec::with_capacity(total_vertices as usize * desc.stride() as usize);
        let mut mesh = Mesh::new(desc.clone());
        let mut vertex_offset = 0u32;
        let mut groups = Vec::new();
        for &m in members {
            let source = &model.meshes()[m];
            data.extend_from_slice(source.vertex_data());
            for group in source.groups() {
                if group.indices.is_empty() {
                    continue;
                }
                groups.push(PrimitiveGroup::new(
                    group.kind,
                    group.material_index,
                    group.indices.iter().map(|&i| i + vertex_offset).collect(),
                ));
            }
            vertex_offset += source.vertex_count();
        }

        mesh.set_vertices(desc.clone(), total_vertices, data)?;
        for group in groups {
            mesh.add_group(group);
        }
        merged.add_mesh(mesh);

        start = end;
    }

    debug!(
        meshes_in = model.meshes().len(),
        meshes_out = merged.meshes().len(),
        "merged meshes by vertex schema"
    );

    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cmod_types::{
        Material, PrimitiveKind, VertexDescription, VertexFormat, VertexSemantic,
    };

    fn position_desc() -> VertexDescription {
        VertexDescription::from_formats([(VertexSemantic::Position, VertexFormat::Float3)])
            .unwrap()
    }

    fn textured_desc() -> VertexDescription {
        VertexDescription::from_formats([
            (VertexSemantic::Position, VertexFormat::Float3),
            (VertexSemantic::Texture0, VertexFormat::Float2),
        ])
        .unwrap()
    }

    fn triangle_mesh(desc: VertexDescription, base: f32, material_index: u32) -> Mesh {
        let scalars = desc.stride() as usize / 4;
        let mut records = Vec::new();
        for v in 0..3 {
            for s in 0..scalars {
                records.push(base + (v * scalars + s) as f32);
            }
        }
        let data: Vec<u8> = records.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut mesh = Mesh::with_vertices(desc, 3, data).unwrap();
        mesh.add_group(PrimitiveGroup::new(
            PrimitiveKind::TriList,
            material_index,
            vec![0, 1, 2],
        ));
        mesh
    }

    #[test]
    fn meshes_group_by_schema() {
        let mut model = Model::new();
        model.add_material(Material::new());
        model.add_mesh(triangle_mesh(position_desc(), 0.0, 0));
        model.add_mesh(triangle_mesh(textured_desc(), 100.0, 1));
        model.add_mesh(triangle_mesh(position_desc(), 50.0, 2));

        let merged = merge_model_meshes(&model).unwrap();

        assert_eq!(merged.meshes().len(), 2);
        assert_eq!(merged.materials().len(), 1);

        // Triangle count is preserved.
        let faces: usize = merged
            .meshes()
            .iter()
            .flat_map(|m| m.groups())
            .map(PrimitiveGroup::face_count)
            .sum();
        assert_eq!(faces, 3);
    }

    #[test]
    fn indices_are_rebased_by_vertex_offset() {
        let mut model = Model::new();
        model.add_mesh(triangle_mesh(position_desc(), 0.0, 0));
        model.add_mesh(triangle_mesh(position_desc(), 50.0, 1));

        let merged = merge_model_meshes(&model).unwrap();
        assert_eq!(merged.meshes().len(), 1);
        let mesh = &merged.meshes()[0];
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.groups().len(), 2);
        assert_eq!(mesh.groups()[0].indices, vec![0, 1, 2]);
        assert_eq!(mesh.groups()[1].indices, vec![3, 4, 5]);
        assert_eq!(mesh.groups()[0].material_index, 0);
        assert_eq!(mesh.groups()[1].material_index, 1);
    }

    #[test]
    fn vertex_bytes_concatenate_in_model_order() {
        let first = triangle_mesh(position_desc(), 0.0, 0);
        let second = triangle_mesh(position_desc(), 50.0, 0);
        let mut model = Model::new();
        model.add_mesh(first.clone());
        model.add_mesh(second.clone());

        let merged = merge_model_meshes(&model).unwrap();
        let mesh = &merged.meshes()[0];
        let stride = 12 * 3;
        assert_eq!(&mesh.vertex_data()[..stride], first.vertex_data());
        assert_eq!(&mesh.vertex_data()[stride..], second.vertex_data());
    }

    #[test]
    fn empty_model_merges_to_empty() {
        let merged = merge_model_meshes(&Model::new()).unwrap();
        assert!(merged.meshes().is_empty());
        assert!(merged.materials().is_empty());
    }
}
