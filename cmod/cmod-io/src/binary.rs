//! The binary CMOD form.
//!
//! Little-endian throughout, after the 16-byte signature:
//!
//! ```text
//! u32 material count
//!   per material: u32 line count, then per line u32 length + UTF-8 bytes
//! u32 mesh count
//!   per mesh:
//!     u32 attribute count
//!       per attribute: u8 semantic, u8 format
//!     u32 vertex count
//!     vertex count * stride bytes of record data
//!     u32 group count
//!       per group: u8 primitive kind, u32 material index,
//!                  u32 index count, u32 indices...
//! ```
//!
//! Attribute offsets and the stride are reconstructed by declaration-order
//! packing, exactly as in the ASCII form. Vertex records are stored as raw
//! buffer bytes, so binary round trips are bit-exact.

// Counts fit the wire format's u32 fields
#![allow(clippy::cast_possible_truncation)]

use std::io::{Read, Write};

use cmod_types::{
    Material, Mesh, Model, PrimitiveGroup, PrimitiveKind, VertexDescription, VertexFormat,
    VertexSemantic,
};

use crate::error::{CmodError, CmodResult};
use crate::BINARY_SIGNATURE;

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> CmodResult<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CmodError::UnexpectedEof
        } else {
            CmodError::Io(e)
        }
    })
}

fn read_u8<R: Read>(reader: &mut R) -> CmodResult<u8> {
    let mut byte = [0u8; 1];
    read_exact(reader, &mut byte)?;
    Ok(byte[0])
}

fn read_u32<R: Read>(reader: &mut R) -> CmodResult<u32> {
    let mut bytes = [0u8; 4];
    read_exact(reader, &mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_string<R: Read>(reader: &mut R) -> CmodResult<String> {
    let length = read_u32(reader)? as usize;
    let mut bytes = vec![0u8; length];
    read_exact(reader, &mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|_| CmodError::invalid_content("material property is not UTF-8"))
}

/// Parse the body following the binary signature.
pub(crate) fn load_body<R: Read>(reader: &mut R) -> CmodResult<Model> {
    let mut model = Model::new();

    let material_count = read_u32(reader)?;
    for _ in 0..material_count {
        let line_count = read_u32(reader)?;
        let mut material = Material::new();
        for _ in 0..line_count {
            material.push_property(read_string(reader)?);
        }
        model.add_material(material);
    }

    let mesh_count = read_u32(reader)?;
    for _ in 0..mesh_count {
        model.add_mesh(load_mesh(reader)?);
    }

    Ok(model)
}

fn load_mesh<R: Read>(reader: &mut R) -> CmodResult<Mesh> {
    let attribute_count = read_u32(reader)?;
    let mut formats = Vec::new();
    for _ in 0..attribute_count {
        let semantic = read_u8(reader)?;
        let semantic = VertexSemantic::from_u8(semantic)
            .ok_or_else(|| CmodError::invalid_content(format!("unknown semantic {semantic}")))?;
        let format = read_u8(reader)?;
        let format = VertexFormat::from_u8(format)
            .ok_or_else(|| CmodError::invalid_content(format!("unknown format {format}")))?;
        formats.push((semantic, format));
    }
    let desc = VertexDescription::from_formats(formats)?;

    let vertex_count = read_u32(reader)?;
    let stride = desc.stride() as usize;
    let mut data = Vec::new();
    let mut record = vec![0u8; stride];
    for _ in 0..vertex_count {
        read_exact(reader, &mut record)?;
        data.extend_from_slice(&record);
    }
    let mut mesh = Mesh::with_vertices(desc, vertex_count, data)?;

    let group_count = read_u32(reader)?;
    for _ in 0..group_count {
        let kind = read_u8(reader)?;
        let kind = PrimitiveKind::from_u8(kind)
            .ok_or_else(|| CmodError::invalid_content(format!("unknown primitive {kind}")))?;
        let material_index = read_u32(reader)?;
        let index_count = read_u32(reader)?;
        let mut indices = Vec::new();
        for _ in 0..index_count {
            let index = read_u32(reader)?;
            if index >= vertex_count {
                return Err(CmodError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            indices.push(index);
        }
        mesh.add_group(PrimitiveGroup::new(kind, material_index, indices));
    }

    Ok(mesh)
}

/// Save `model` in the binary form.
///
/// # Errors
///
/// Returns any error of the underlying writer.
pub fn save_model_binary<W: Write>(model: &Model, writer: &mut W) -> CmodResult<()> {
    writer.write_all(BINARY_SIGNATURE)?;

    writer.write_all(&(model.materials().len() as u32).to_le_bytes())?;
    for material in model.materials() {
        writer.write_all(&(material.properties().len() as u32).to_le_bytes())?;
        for property in material.properties() {
            writer.write_all(&(property.len() as u32).to_le_bytes())?;
            writer.write_all(property.as_bytes())?;
        }
    }

    writer.write_all(&(model.meshes().len() as u32).to_le_bytes())?;
    for mesh in model.meshes() {
        let attributes = mesh.description().attributes();
        writer.write_all(&(attributes.len() as u32).to_le_bytes())?;
        for attr in attributes {
            writer.write_all(&[attr.semantic as u8, attr.format as u8])?;
        }

        writer.write_all(&mesh.vertex_count().to_le_bytes())?;
        writer.write_all(mesh.vertex_data())?;

        writer.write_all(&(mesh.groups().len() as u32).to_le_bytes())?;
        for group in mesh.groups() {
            writer.write_all(&[group.kind as u8])?;
            writer.write_all(&group.material_index.to_le_bytes())?;
            writer.write_all(&(group.indices.len() as u32).to_le_bytes())?;
            for &index in &group.indices {
                writer.write_all(&index.to_le_bytes())?;
            }
        }
    }

    Ok(())
}
