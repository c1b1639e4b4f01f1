//! Round-trip tests across both container forms.

#![allow(clippy::unwrap_used)]

use cmod_io::{load_model, save_model_ascii, save_model_binary};
use cmod_types::{
    Material, Mesh, Model, PrimitiveGroup, PrimitiveKind, VertexDescription, VertexFormat,
    VertexSemantic,
};

/// A model exercising every format, several semantics, multiple groups,
/// multiple materials, and awkward float payloads.
fn fixture() -> Model {
    let mut model = Model::new();

    let mut wood = Material::new();
    wood.push_property("diffuse 0.8 0.6 0.4");
    wood.push_property("texture0 \"planks base.png\"");
    model.add_material(wood);
    model.add_material(Material::new());

    let plain = VertexDescription::from_formats([(
        VertexSemantic::Position,
        VertexFormat::Float3,
    )])
    .unwrap();
    let mut data = Vec::new();
    for scalar in [
        0.0f32, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        1.5e-7, -2.25, 1024.5,
    ] {
        data.extend_from_slice(&scalar.to_le_bytes());
    }
    let mut first = Mesh::with_vertices(plain, 4, data).unwrap();
    first.add_group(PrimitiveGroup::new(PrimitiveKind::TriList, 0, vec![0, 1, 2]));
    first.add_group(PrimitiveGroup::new(
        PrimitiveKind::TriStrip,
        1,
        vec![0, 1, 2, 3],
    ));
    model.add_mesh(first);

    let fancy = VertexDescription::from_formats([
        (VertexSemantic::Position, VertexFormat::Float3),
        (VertexSemantic::Normal, VertexFormat::Float3),
        (VertexSemantic::Color0, VertexFormat::UByte4),
        (VertexSemantic::Texture0, VertexFormat::Float2),
        (VertexSemantic::PointSize, VertexFormat::Float1),
    ])
    .unwrap();
    let stride = fancy.stride() as usize;
    assert_eq!(stride, 12 + 12 + 4 + 8 + 4);
    let mut data = Vec::new();
    for v in 0..3u8 {
        for scalar in [f32::from(v), 0.5, -0.5, 0.0, 0.0, 1.0] {
            data.extend_from_slice(&scalar.to_le_bytes());
        }
        data.extend_from_slice(&[v, 10, 20, 255]);
        for scalar in [0.25f32, 0.75, 2.0] {
            data.extend_from_slice(&scalar.to_le_bytes());
        }
    }
    let mut second = Mesh::with_vertices(fancy, 3, data).unwrap();
    second.add_group(PrimitiveGroup::new(PrimitiveKind::TriFan, 1, vec![0, 1, 2]));
    model.add_mesh(second);

    model
}

#[test]
fn ascii_round_trip_preserves_the_model() {
    let model = fixture();
    let mut text = Vec::new();
    save_model_ascii(&model, &mut text).unwrap();

    let reloaded = load_model(&mut text.as_slice()).unwrap();
    assert_eq!(reloaded, model);
}

#[test]
fn binary_round_trip_preserves_the_model() {
    let model = fixture();
    let mut bytes = Vec::new();
    save_model_binary(&model, &mut bytes).unwrap();

    let reloaded = load_model(&mut bytes.as_slice()).unwrap();
    assert_eq!(reloaded, model);
}

#[test]
fn forms_convert_into_each_other() {
    let model = fixture();

    let mut bytes = Vec::new();
    save_model_binary(&model, &mut bytes).unwrap();
    let from_binary = load_model(&mut bytes.as_slice()).unwrap();

    let mut text = Vec::new();
    save_model_ascii(&from_binary, &mut text).unwrap();
    let from_ascii = load_model(&mut text.as_slice()).unwrap();

    assert_eq!(from_ascii, model);

    let mut bytes_again = Vec::new();
    save_model_binary(&from_ascii, &mut bytes_again).unwrap();
    assert_eq!(bytes_again, bytes);
}

#[test]
fn empty_model_round_trips() {
    let model = Model::new();

    let mut text = Vec::new();
    save_model_ascii(&model, &mut text).unwrap();
    assert_eq!(load_model(&mut text.as_slice()).unwrap(), model);

    let mut bytes = Vec::new();
    save_model_binary(&model, &mut bytes).unwrap();
    assert_eq!(load_model(&mut bytes.as_slice()).unwrap(), model);
}
