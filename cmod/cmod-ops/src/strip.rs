//! Triangle-strip conversion through a pluggable generator.
//!
//! The conversion pass owns the policy (which meshes are eligible, how
//! results replace the group list); the actual stripification is behind
//! [`StripGenerator`] so an external implementation can be swapped in. The
//! built-in [`GreedyStripGenerator`] walks shared edges greedily.

// Mesh indices and counts don't overflow in practice
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;

use cmod_types::{Mesh, PrimitiveGroup, PrimitiveKind};
use tracing::debug;

use crate::error::{OpError, OpResult};

/// Generators address vertices with 16-bit indices; meshes at or past this
/// vertex count are skipped.
pub const MAX_STRIP_VERTICES: u32 = 1 << 16;

/// One group produced by a strip generator.
///
/// A `kind` of `None` marks a group the conversion pass must discard (a
/// primitive type with no CMOD counterpart).
#[derive(Debug, Clone)]
pub struct StripGroup {
    /// The produced primitive kind, if representable.
    pub kind: Option<PrimitiveKind>,
    /// 16-bit indices into the source mesh's vertex array.
    pub indices: Vec<u16>,
}

/// A triangle-list-to-strips converter.
pub trait StripGenerator {
    /// Convert one triangle list into strips, fans, and/or smaller lists.
    ///
    /// `indices` has a positive length divisible by three. Returns `None`
    /// on failure, which aborts the conversion pass.
    fn generate(&self, indices: &[u16]) -> Option<Vec<StripGroup>>;
}

/// Replace a mesh's triangle lists with generator output.
///
/// The pass is skipped silently (returning `false`) when the mesh has too
/// many vertices for 16-bit indices or when any group is already a strip or
/// fan. Otherwise every group is fed through `generator`; each produced
/// group keeps its source group's material index, discarding empty and
/// unrepresentable ones. On success the mesh's group list is replaced
/// wholesale and `true` is returned.
///
/// # Errors
///
/// - [`OpError::ListIndexCount`] when an eligible group's index count is
///   not a positive multiple of three
/// - [`OpError::StripFailed`] when the generator reports failure; the mesh
///   is left untouched
pub fn convert_to_strips(mesh: &mut Mesh, generator: &dyn StripGenerator) -> OpResult<bool> {
    if mesh.vertex_count() >= MAX_STRIP_VERTICES {
        return Ok(false);
    }
    if mesh
        .groups()
        .iter()
        .any(|group| group.kind != PrimitiveKind::TriList)
    {
        return Ok(false);
    }

    let mut converted = Vec::new();
    for group in mesh.groups() {
        if group.indices.len() < 3 || group.indices.len() % 3 != 0 {
            return Err(OpError::ListIndexCount {
                count: group.indices.len(),
            });
        }

        let narrow: Vec<u16> = group.indices.iter().map(|&i| i as u16).collect();
        let strips = generator.generate(&narrow).ok_or(OpError::StripFailed)?;

        for strip in strips {
            let Some(kind) = strip.kind else { continue };
            if strip.indices.is_empty() {
                continue;
            }
            converted.push(PrimitiveGroup::new(
                kind,
                group.material_index,
                strip.indices.iter().map(|&i| u32::from(i)).collect(),
            ));
        }
    }

    debug!(
        groups_in = mesh.groups().len(),
        groups_out = converted.len(),
        "converted triangle lists to strips"
    );

    mesh.clear_groups();
    for group in converted {
        mesh.add_group(group);
    }
    Ok(true)
}

/// Greedy shared-edge stripifier.
///
/// Seeds a strip at each unused triangle and extends it while an unused
/// triangle shares the strip's live edge with matching winding, bounding
/// strip length by the vertex cache size. Runs too short to pay for strip
/// encoding are gathered into one trailing triangle list.
#[derive(Debug, Clone)]
pub struct GreedyStripGenerator {
    /// Maximum indices per strip; bounds the working set to the
    /// post-transform vertex cache.
    pub cache_size: usize,
    /// Minimum triangles per emitted strip; shorter runs fall back to the
    /// trailing list.
    pub min_strip_faces: usize,
}

impl Default for GreedyStripGenerator {
    fn default() -> Self {
        Self {
            cache_size: 16,
            min_strip_faces: 2,
        }
    }
}

impl GreedyStripGenerator {
    /// Third vertex of `face` opposite the directed edge `(e0, e1)`, if
    /// the face contains that edge in winding order.
    fn across(face: [u16; 3], e0: u16, e1: u16) -> Option<u16> {
        let [p, q, r] = face;
        if (p, q) == (e0, e1) {
            Some(r)
        } else if (q, r) == (e0, e1) {
            Some(p)
        } else if (r, p) == (e0, e1) {
            Some(q)
        } else {
            None
        }
    }
}

impl StripGenerator for GreedyStripGenerator {
    fn generate(&self, indices: &[u16]) -> Option<Vec<StripGroup>> {
        let faces: Vec<[u16; 3]> = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();

        // Directed edge -> faces carrying it in winding order.
        let mut by_edge: HashMap<(u16, u16), Vec<u32>> = HashMap::new();
        for (f, &[p, q, r]) in faces.iter().enumerate() {
            for edge in [(p, q), (q, r), (r, p)] {
                by_edge.entry(edge).or_default().push(f as u32);
            }
        }

        let mut used = vec![false; faces.len()];
        let mut strips = Vec::new();
        let mut leftover = Vec::new();

        for seed in 0..faces.len() {
            if used[seed] {
                continue;
            }
            used[seed] = true;
            let [a, b, c] = faces[seed];
            let mut strip = vec![a, b, c];
            let mut strip_faces = 1;

            while strip.len() < self.cache_size {
                let j = strip.len();
                // The triangle formed by appending at position j reverses
                // its leading edge when j is odd.
                let (e0, e1) = if j % 2 == 0 {
                    (strip[j - 2], strip[j - 1])
                } else {
                    (strip[j - 1], strip[j - 2])
                };

                let next = by_edge.get(&(e0, e1)).and_then(|candidates| {
                    candidates
                        .iter()
                        .find(|&&f| !used[f as usize])
                        .and_then(|&f| {
                            Self::across(faces[f as usize], e0, e1).map(|x| (f, x))
                        })
                });
                let Some((f, x)) = next else { break };

                used[f as usize] = true;
                strip.push(x);
                strip_faces += 1;
            }

            if strip_faces >= self.min_strip_faces {
                strips.push(StripGroup {
                    kind: Some(PrimitiveKind::TriStrip),
                    indices: strip,
                });
            } else {
                leftover.extend_from_slice(&faces[seed]);
            }
        }

        if !leftover.is_empty() {
            strips.push(StripGroup {
                kind: Some(PrimitiveKind::TriList),
                indices: leftover,
            });
        }

        Some(strips)
    }
}
