//! Vertex description: the schema of an interleaved vertex record.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attribute::{VertexAttribute, VertexFormat, VertexSemantic};
use crate::error::{MeshError, MeshResult};

/// An ordered list of vertex attributes plus the record stride in bytes.
///
/// Within one description a semantic appears at most once, and every
/// attribute fits inside the stride. Two descriptions are equal when they
/// have the same stride and the same attributes in the same order.
///
/// # Example
///
/// ```
/// use cmod_types::{VertexDescription, VertexFormat, VertexSemantic};
///
/// let desc = VertexDescription::from_formats([
///     (VertexSemantic::Position, VertexFormat::Float3),
///     (VertexSemantic::Texture0, VertexFormat::Float2),
/// ])
/// .unwrap();
///
/// assert_eq!(desc.stride(), 20);
/// let tex = desc.attribute(VertexSemantic::Texture0).unwrap();
/// assert_eq!(tex.offset, 12);
/// assert_eq!(desc.attribute(VertexSemantic::Normal), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexDescription {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexDescription {
    /// Create a description from explicit attributes and stride.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DuplicateSemantic`] if a semantic appears twice,
    /// or [`MeshError::AttributeOutOfBounds`] if an attribute overruns the
    /// stride.
    pub fn new(attributes: Vec<VertexAttribute>, stride: u32) -> MeshResult<Self> {
        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.semantic == attr.semantic) {
                return Err(MeshError::DuplicateSemantic {
                    semantic: attr.semantic,
                });
            }
            if attr.offset + attr.format.size() > stride {
                return Err(MeshError::AttributeOutOfBounds {
                    semantic: attr.semantic,
                    offset: attr.offset,
                    stride,
                });
            }
        }
        Ok(Self { attributes, stride })
    }

    /// Create a description by packing `(semantic, format)` pairs in
    /// declaration order, accumulating offsets into the stride.
    ///
    /// This is the canonical layout rule: both container forms store only
    /// the pairs and reconstruct offsets this way.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DuplicateSemantic`] if a semantic appears twice.
    pub fn from_formats<I>(formats: I) -> MeshResult<Self>
    where
        I: IntoIterator<Item = (VertexSemantic, VertexFormat)>,
    {
        let mut attributes = Vec::new();
        let mut stride = 0;
        for (semantic, format) in formats {
            if attributes
                .iter()
                .any(|a: &VertexAttribute| a.semantic == semantic)
            {
                return Err(MeshError::DuplicateSemantic { semantic });
            }
            attributes.push(VertexAttribute::new(semantic, format, stride));
            stride += format.size();
        }
        Ok(Self { attributes, stride })
    }

    /// The attributes, in declaration order.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// The record stride in bytes.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// Look up an attribute by semantic.
    #[must_use]
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.semantic == semantic)
    }

    /// Return a description guaranteed to contain `(semantic, format)`.
    ///
    /// Existing attributes are kept in their original order and re-packed
    /// with offsets accumulated from a running stride. An existing attribute
    /// with the requested semantic but a different format is dropped and
    /// replaced. The requested attribute is appended at the end iff it was
    /// not already present with the requested format.
    ///
    /// # Example
    ///
    /// ```
    /// use cmod_types::{VertexDescription, VertexFormat, VertexSemantic};
    ///
    /// let desc = VertexDescription::from_formats([(
    ///     VertexSemantic::Position,
    ///     VertexFormat::Float3,
    /// )])
    /// .unwrap();
    ///
    /// let with_normal = desc.augmented(VertexSemantic::Normal, VertexFormat::Float3);
    /// assert_eq!(with_normal.stride(), 24);
    /// assert_eq!(
    ///     with_normal.attribute(VertexSemantic::Normal).unwrap().offset,
    ///     12
    /// );
    ///
    /// // Augmenting with an attribute already present at the requested
    /// // format is the identity.
    /// assert_eq!(with_normal.augmented(VertexSemantic::Normal, VertexFormat::Float3), with_normal);
    /// ```
    #[must_use]
    pub fn augmented(&self, semantic: VertexSemantic, format: VertexFormat) -> Self {
        let mut attributes = Vec::with_capacity(self.attributes.len() + 1);
        let mut stride = 0;
        let mut found_match = false;

        for attr in &self.attributes {
            if attr.semantic == semantic && attr.format != format {
                // Same semantic, wrong format: drop it; the new attribute
                // replaces it.
                continue;
            }
            if attr.semantic == semantic {
                found_match = true;
            }
            attributes.push(VertexAttribute::new(attr.semantic, attr.format, stride));
            stride += attr.format.size();
        }

        if !found_match {
            attributes.push(VertexAttribute::new(semantic, format, stride));
            stride += format.size();
        }

        Self { attributes, stride }
    }
}

impl PartialOrd for VertexDescription {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexDescription {
    /// Lexicographic by `(stride, attribute count, attributes pairwise)`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.stride
            .cmp(&other.stride)
            .then_with(|| self.attributes.len().cmp(&other.attributes.len()))
            .then_with(|| self.attributes.cmp(&other.attributes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pos_tex() -> VertexDescription {
        VertexDescription::from_formats([
            (VertexSemantic::Position, VertexFormat::Float3),
            (VertexSemantic::Texture0, VertexFormat::Float2),
        ])
        .unwrap()
    }

    #[test]
    fn packing_accumulates_offsets() {
        let desc = pos_tex();
        assert_eq!(desc.stride(), 20);
        assert_eq!(desc.attribute(VertexSemantic::Position).unwrap().offset, 0);
        assert_eq!(desc.attribute(VertexSemantic::Texture0).unwrap().offset, 12);
    }

    #[test]
    fn duplicate_semantic_rejected() {
        let result = VertexDescription::from_formats([
            (VertexSemantic::Position, VertexFormat::Float3),
            (VertexSemantic::Position, VertexFormat::Float2),
        ]);
        assert!(matches!(
            result,
            Err(MeshError::DuplicateSemantic {
                semantic: VertexSemantic::Position
            })
        ));
    }

    #[test]
    fn out_of_bounds_attribute_rejected() {
        let result = VertexDescription::new(
            vec![VertexAttribute::new(
                VertexSemantic::Position,
                VertexFormat::Float3,
                4,
            )],
            12,
        );
        assert!(matches!(
            result,
            Err(MeshError::AttributeOutOfBounds { offset: 4, .. })
        ));
    }

    #[test]
    fn augment_appends_missing_attribute() {
        let desc = pos_tex().augmented(VertexSemantic::Normal, VertexFormat::Float3);
        assert_eq!(desc.stride(), 32);
        let normal = desc.attribute(VertexSemantic::Normal).unwrap();
        assert_eq!(normal.offset, 20);
        // Existing attributes keep their relative order.
        assert_eq!(desc.attributes()[0].semantic, VertexSemantic::Position);
        assert_eq!(desc.attributes()[1].semantic, VertexSemantic::Texture0);
    }

    #[test]
    fn augment_with_present_attribute_is_identity() {
        let desc = pos_tex();
        assert_eq!(
            desc.augmented(VertexSemantic::Texture0, VertexFormat::Float2),
            desc
        );
    }

    #[test]
    fn augment_replaces_mismatched_format() {
        // A float4 tangent is dropped and replaced by a float3 one at the end.
        let desc = VertexDescription::from_formats([
            (VertexSemantic::Position, VertexFormat::Float3),
            (VertexSemantic::Tangent, VertexFormat::Float4),
            (VertexSemantic::Texture0, VertexFormat::Float2),
        ])
        .unwrap();

        let augmented = desc.augmented(VertexSemantic::Tangent, VertexFormat::Float3);
        assert_eq!(augmented.stride(), 12 + 8 + 12);
        let attrs = augmented.attributes();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].semantic, VertexSemantic::Position);
        assert_eq!(attrs[1].semantic, VertexSemantic::Texture0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].semantic, VertexSemantic::Tangent);
        assert_eq!(attrs[2].format, VertexFormat::Float3);
        assert_eq!(attrs[2].offset, 20);
    }

    #[test]
    fn description_total_order() {
        let small = VertexDescription::from_formats([(
            VertexSemantic::Position,
            VertexFormat::Float3,
        )])
        .unwrap();
        let large = pos_tex();
        // Shorter stride sorts first.
        assert!(small < large);
        assert_eq!(small.cmp(&small.clone()), Ordering::Equal);

        // Same stride, ordered by attributes.
        let normal_only = VertexDescription::from_formats([(
            VertexSemantic::Normal,
            VertexFormat::Float3,
        )])
        .unwrap();
        assert!(small < normal_only);
    }
}
