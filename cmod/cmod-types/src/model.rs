//! The model container: meshes plus opaque materials.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// An opaque material: an ordered list of property lines.
///
/// The processing core never interprets materials; it only preserves their
/// order and the indices that primitive groups use to reference them. The
/// container formats carry each property as one line of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    properties: Vec<String>,
}

impl Material {
    /// Create an empty material.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Append a property line.
    pub fn push_property(&mut self, line: impl Into<String>) {
        self.properties.push(line.into());
    }

    /// The property lines, in order.
    #[inline]
    #[must_use]
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl FromIterator<String> for Material {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

/// An ordered sequence of meshes and materials.
///
/// Primitive groups reference materials by index into the model's material
/// list; every transformation preserves those indices.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
}

impl Model {
    /// Create an empty model.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Append a mesh.
    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    /// Append a material.
    pub fn add_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// The meshes, in order.
    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable access to the meshes.
    #[inline]
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// The materials, in order.
    #[inline]
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Consume the model, yielding its meshes and materials.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Mesh>, Vec<Material>) {
        (self.meshes, self.materials)
    }
}
