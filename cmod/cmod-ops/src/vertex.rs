//! Vertex record views and the comparator family.
//!
//! Deduplication and welding both work by sorting lightweight views of
//! vertex records so that equivalent records end up consecutive. The
//! orderings and equivalence predicates here are the parameterised keys for
//! those sorts: whole-record bytes for deduplication, position (optionally
//! plus texture coordinate) for welding.

use std::cmp::Ordering;

use nalgebra::{Vector2, Vector3};

/// A borrowed view of one vertex record: its index and its raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct VertexView<'a> {
    /// Index of the record in the owning mesh's vertex array.
    pub index: u32,
    /// The record's bytes (`stride` of them, little-endian scalars).
    pub record: &'a [u8],
}

impl<'a> VertexView<'a> {
    /// Create a view.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, record: &'a [u8]) -> Self {
        Self { index, record }
    }
}

/// Read a little-endian `f32` at `at` bytes into `data`.
#[inline]
pub(crate) fn read_f32(data: &[u8], at: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[at..at + 4]);
    f32::from_le_bytes(bytes)
}

/// Read a little-endian float3 at `at` bytes into `data`.
#[inline]
pub(crate) fn read_vec3(data: &[u8], at: usize) -> Vector3<f32> {
    Vector3::new(read_f32(data, at), read_f32(data, at + 4), read_f32(data, at + 8))
}

/// Read a little-endian float2 at `at` bytes into `data`.
#[inline]
pub(crate) fn read_vec2(data: &[u8], at: usize) -> Vector2<f32> {
    Vector2::new(read_f32(data, at), read_f32(data, at + 4))
}

/// Relative approximate equality: `|x - y| <= tol * min(|x|, |y|)`.
///
/// A tolerance of zero recovers strict equality.
#[inline]
#[must_use]
pub fn approx_equal(x: f32, y: f32, tolerance: f32) -> bool {
    (x - y).abs() <= tolerance * x.abs().min(y.abs())
}

/// Floats compare by `partial_cmp`; an incomparable pair ties.
#[inline]
fn cmp_f32(x: f32, y: f32) -> Ordering {
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// A strict weak ordering over vertex records.
#[derive(Debug, Clone, Copy)]
pub enum RecordOrder {
    /// Lexicographic over the entire record.
    Full,
    /// Lexicographic over position `(x, y, z)`.
    Point {
        /// Byte offset of the position attribute.
        pos_offset: usize,
    },
    /// Lexicographic over `(x, y, z, u, v)`.
    PointTex {
        /// Byte offset of the position attribute.
        pos_offset: usize,
        /// Byte offset of the texture coordinate attribute.
        tex_offset: usize,
    },
}

impl RecordOrder {
    /// Compare two records under this ordering.
    #[must_use]
    pub fn compare(&self, a: &VertexView<'_>, b: &VertexView<'_>) -> Ordering {
        match *self {
            Self::Full => a.record.cmp(b.record),
            Self::Point { pos_offset } => cmp_points(a.record, b.record, pos_offset),
            Self::PointTex {
                pos_offset,
                tex_offset,
            } => cmp_points(a.record, b.record, pos_offset).then_with(|| {
                let ta = read_vec2(a.record, tex_offset);
                let tb = read_vec2(b.record, tex_offset);
                cmp_f32(ta.x, tb.x).then_with(|| cmp_f32(ta.y, tb.y))
            }),
        }
    }
}

fn cmp_points(a: &[u8], b: &[u8], pos_offset: usize) -> Ordering {
    let pa = read_vec3(a, pos_offset);
    let pb = read_vec3(b, pos_offset);
    cmp_f32(pa.x, pb.x)
        .then_with(|| cmp_f32(pa.y, pb.y))
        .then_with(|| cmp_f32(pa.z, pb.z))
}

/// An equivalence predicate over vertex records.
#[derive(Debug, Clone, Copy)]
pub enum RecordEquiv {
    /// Byte equality over the entire record.
    Exact,
    /// Componentwise relative equality of positions.
    Point {
        /// Byte offset of the position attribute.
        pos_offset: usize,
        /// Relative tolerance; zero means strict equality.
        tolerance: f32,
    },
    /// Componentwise relative equality of positions and texture
    /// coordinates.
    PointTex {
        /// Byte offset of the position attribute.
        pos_offset: usize,
        /// Byte offset of the texture coordinate attribute.
        tex_offset: usize,
        /// Relative tolerance; zero means strict equality.
        tolerance: f32,
    },
}

impl RecordEquiv {
    /// Test two records for equivalence.
    #[must_use]
    pub fn equivalent(&self, a: &VertexView<'_>, b: &VertexView<'_>) -> bool {
        match *self {
            Self::Exact => a.record == b.record,
            Self::Point {
                pos_offset,
                tolerance,
            } => points_equal(a.record, b.record, pos_offset, tolerance),
            Self::PointTex {
                pos_offset,
                tex_offset,
                tolerance,
            } => {
                points_equal(a.record, b.record, pos_offset, tolerance) && {
                    let ta = read_vec2(a.record, tex_offset);
                    let tb = read_vec2(b.record, tex_offset);
                    approx_equal(ta.x, tb.x, tolerance) && approx_equal(ta.y, tb.y, tolerance)
                }
            }
        }
    }
}

fn points_equal(a: &[u8], b: &[u8], pos_offset: usize, tolerance: f32) -> bool {
    let pa = read_vec3(a, pos_offset);
    let pb = read_vec3(b, pos_offset);
    approx_equal(pa.x, pb.x, tolerance)
        && approx_equal(pa.y, pb.y, tolerance)
        && approx_equal(pa.z, pb.z, tolerance)
}
