//! Per-vertex attribute records and the operations that combine them.
//!
//! A [`Vertex`] gathers every attribute channel the host mesh may carry for
//! one index. Channels other than position are optional; `Option` is the
//! presence flag. [`Vertex::average`] and [`Vertex::mix`] are the building
//! blocks for merge/weld/subdivide edits, and [`VertexArrays`] is the
//! parallel-array form exchanged with the host.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{approx2, approx3, approx4};

/// A single vertex with optional attribute channels.
///
/// Color is RGBA in `Vec4`, tangent carries its handedness in `w`, and the
/// four UV channels mirror the host's texture channel layout (`uv0` is the
/// primary channel, `uv2`..`uv4` are auxiliary).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Option<Vec4>,
    pub uv0: Option<Vec2>,
    pub normal: Option<Vec3>,
    pub tangent: Option<Vec4>,
    pub uv2: Option<Vec2>,
    pub uv3: Option<Vec4>,
    pub uv4: Option<Vec4>,
}

/// Linear blend of two optional channels.
///
/// Both present blends, one present copies that side unchanged, neither
/// present stays absent.
fn mix_channel<T>(x: Option<T>, y: Option<T>, i: f32, a: f32) -> Option<T>
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Mul<f32, Output = T>,
{
    match (x, y) {
        (Some(x), Some(y)) => Some(x * i + y * a),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

impl Vertex {
    /// Vertex with only a position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Approximate equality across all channels.
    ///
    /// Absent channels compare as zero, matching how the host treats
    /// unwritten attribute arrays.
    pub fn approx_eq(&self, other: &Vertex, eps: f32) -> bool {
        approx3(self.position, other.position, eps)
            && approx4(
                self.color.unwrap_or(Vec4::ZERO),
                other.color.unwrap_or(Vec4::ZERO),
                eps,
            )
            && approx2(
                self.uv0.unwrap_or(Vec2::ZERO),
                other.uv0.unwrap_or(Vec2::ZERO),
                eps,
            )
            && approx3(
                self.normal.unwrap_or(Vec3::ZERO),
                other.normal.unwrap_or(Vec3::ZERO),
                eps,
            )
            && approx4(
                self.tangent.unwrap_or(Vec4::ZERO),
                other.tangent.unwrap_or(Vec4::ZERO),
                eps,
            )
            && approx2(
                self.uv2.unwrap_or(Vec2::ZERO),
                other.uv2.unwrap_or(Vec2::ZERO),
                eps,
            )
            && approx4(
                self.uv3.unwrap_or(Vec4::ZERO),
                other.uv3.unwrap_or(Vec4::ZERO),
                eps,
            )
            && approx4(
                self.uv4.unwrap_or(Vec4::ZERO),
                other.uv4.unwrap_or(Vec4::ZERO),
                eps,
            )
    }

    /// Average a set of vertices to a single vertex.
    ///
    /// `indices` selects a subset of `vertices`; `None` averages all of
    /// them. Position, color, and uv0 are the mean over the full selection
    /// count (an absent color/uv0 contributes zero). The remaining channels
    /// are the mean over only the inputs that carry them, and are present in
    /// the result iff at least one input contributed.
    ///
    /// An empty selection divides by a zero count and yields NaN position;
    /// callers must guard against empty selections. Deliberately unguarded.
    ///
    /// Indices must be in range for `vertices`; out-of-range indices panic.
    pub fn average(vertices: &[Vertex], indices: Option<&[u32]>) -> Vertex {
        let count = indices.map_or(vertices.len(), |sel| sel.len());

        let mut position = Vec3::ZERO;
        let mut color = Vec4::ZERO;
        let mut uv0 = Vec2::ZERO;

        let mut normal = (Vec3::ZERO, 0u32);
        let mut tangent = (Vec4::ZERO, 0u32);
        let mut uv2 = (Vec2::ZERO, 0u32);
        let mut uv3 = (Vec4::ZERO, 0u32);
        let mut uv4 = (Vec4::ZERO, 0u32);

        for k in 0..count {
            let v = match indices {
                Some(sel) => &vertices[sel[k] as usize],
                None => &vertices[k],
            };

            position += v.position;
            color += v.color.unwrap_or(Vec4::ZERO);
            uv0 += v.uv0.unwrap_or(Vec2::ZERO);

            if let Some(n) = v.normal {
                normal.0 += n;
                normal.1 += 1;
            }
            if let Some(t) = v.tangent {
                tangent.0 += t;
                tangent.1 += 1;
            }
            if let Some(u) = v.uv2 {
                uv2.0 += u;
                uv2.1 += 1;
            }
            if let Some(u) = v.uv3 {
                uv3.0 += u;
                uv3.1 += 1;
            }
            if let Some(u) = v.uv4 {
                uv4.0 += u;
                uv4.1 += 1;
            }
        }

        // count == 0 makes this scale infinite and the unconditional
        // channels NaN. Known fragility, preserved and tested.
        let scale = 1.0 / count as f32;

        Vertex {
            position: position * scale,
            color: Some(color * scale),
            uv0: Some(uv0 * scale),
            normal: (normal.1 > 0).then(|| normal.0 / normal.1 as f32),
            tangent: (tangent.1 > 0).then(|| tangent.0 / tangent.1 as f32),
            uv2: (uv2.1 > 0).then(|| uv2.0 / uv2.1 as f32),
            uv3: (uv3.1 > 0).then(|| uv3.0 / uv3.1 as f32),
            uv4: (uv4.1 > 0).then(|| uv4.0 / uv4.1 as f32),
        }
    }

    /// Linear interpolation between two vertices. `a = 0` is fully `x`,
    /// `a = 1` is fully `y`.
    ///
    /// Optional channels present on only one side copy that side's value
    /// unchanged regardless of `a`; channels absent on both sides stay
    /// absent.
    pub fn mix(x: &Vertex, y: &Vertex, a: f32) -> Vertex {
        let i = 1.0 - a;

        Vertex {
            position: x.position * i + y.position * a,
            color: mix_channel(x.color, y.color, i, a),
            uv0: mix_channel(x.uv0, y.uv0, i, a),
            normal: mix_channel(x.normal, y.normal, i, a),
            tangent: mix_channel(x.tangent, y.tangent, i, a),
            uv2: mix_channel(x.uv2, y.uv2, i, a),
            uv3: mix_channel(x.uv3, y.uv3, i, a),
            uv4: mix_channel(x.uv4, y.uv4, i, a),
        }
    }
}

/// Parallel per-channel attribute arrays, the wire shape exchanged with the
/// host renderer.
///
/// A channel is carried iff its array is `Some` with the same length as
/// `positions`; shorter or absent arrays mean the channel is not present on
/// any vertex.
#[derive(Debug, Clone, Default)]
pub struct VertexArrays {
    pub positions: Vec<Vec3>,
    pub colors: Option<Vec<Vec4>>,
    pub uv0: Option<Vec<Vec2>>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Vec<Vec4>>,
    pub uv2: Option<Vec<Vec2>>,
    pub uv3: Option<Vec<Vec4>>,
    pub uv4: Option<Vec<Vec4>>,
}

impl VertexArrays {
    /// Split the parallel arrays into one record per vertex.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        let n = self.positions.len();

        // A channel only counts when it covers every vertex.
        fn channel<T: Copy>(arr: &Option<Vec<T>>, n: usize, i: usize) -> Option<T> {
            arr.as_ref().filter(|a| a.len() == n).map(|a| a[i])
        }

        (0..n)
            .map(|i| Vertex {
                position: self.positions[i],
                color: channel(&self.colors, n, i),
                uv0: channel(&self.uv0, n, i),
                normal: channel(&self.normals, n, i),
                tangent: channel(&self.tangents, n, i),
                uv2: channel(&self.uv2, n, i),
                uv3: channel(&self.uv3, n, i),
                uv4: channel(&self.uv4, n, i),
            })
            .collect()
    }

    /// Rebuild parallel arrays from vertex records.
    ///
    /// A channel array is emitted iff the first vertex carries that channel;
    /// vertices missing it fill in with zeroes. An empty vertex list yields
    /// empty position data and no optional channels.
    pub fn from_vertices(vertices: &[Vertex]) -> VertexArrays {
        let Some(first) = vertices.first() else {
            return VertexArrays::default();
        };

        fn gather<T: Copy + Default>(
            vertices: &[Vertex],
            emit: bool,
            get: impl Fn(&Vertex) -> Option<T>,
        ) -> Option<Vec<T>> {
            emit.then(|| {
                vertices
                    .iter()
                    .map(|v| get(v).unwrap_or_default())
                    .collect()
            })
        }

        VertexArrays {
            positions: vertices.iter().map(|v| v.position).collect(),
            colors: gather(vertices, first.color.is_some(), |v| v.color),
            uv0: gather(vertices, first.uv0.is_some(), |v| v.uv0),
            normals: gather(vertices, first.normal.is_some(), |v| v.normal),
            tangents: gather(vertices, first.tangent.is_some(), |v| v.tangent),
            uv2: gather(vertices, first.uv2.is_some(), |v| v.uv2),
            uv3: gather(vertices, first.uv3.is_some(), |v| v.uv3),
            uv4: gather(vertices, first.uv4.is_some(), |v| v.uv4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx3, COMPARE_EPSILON};

    fn full_vertex(seed: f32) -> Vertex {
        Vertex {
            position: Vec3::new(seed, seed * 2.0, -seed),
            color: Some(Vec4::new(0.1 * seed, 0.2, 0.3, 1.0)),
            uv0: Some(Vec2::new(seed, 1.0 - seed)),
            normal: Some(Vec3::new(0.0, 1.0, 0.0)),
            tangent: Some(Vec4::new(1.0, 0.0, 0.0, -1.0)),
            uv2: Some(Vec2::splat(seed)),
            uv3: Some(Vec4::splat(seed + 1.0)),
            uv4: Some(Vec4::splat(seed - 1.0)),
        }
    }

    #[test]
    fn test_average_single_element_is_identity() {
        let v = full_vertex(0.7);
        let avg = Vertex::average(std::slice::from_ref(&v), None);
        assert!(avg.approx_eq(&v, COMPARE_EPSILON));
    }

    #[test]
    fn test_average_subset_by_indices() {
        let verts = vec![full_vertex(0.0), full_vertex(2.0), full_vertex(100.0)];
        let avg = Vertex::average(&verts, Some(&[0, 1]));
        assert!(approx3(avg.position, Vec3::new(1.0, 2.0, -1.0), COMPARE_EPSILON));
    }

    #[test]
    fn test_average_optional_channel_counts_contributors_only() {
        let mut a = Vertex::at(Vec3::ZERO);
        a.normal = Some(Vec3::new(0.0, 1.0, 0.0));
        let b = Vertex::at(Vec3::new(2.0, 0.0, 0.0));

        let avg = Vertex::average(&[a, b], None);

        // Position averages over both inputs, normal only over the one
        // vertex that carries it.
        assert!(approx3(avg.position, Vec3::new(1.0, 0.0, 0.0), COMPARE_EPSILON));
        assert_eq!(avg.normal, Some(Vec3::new(0.0, 1.0, 0.0)));
        // No input carried uv2, so the result lacks it.
        assert_eq!(avg.uv2, None);
    }

    #[test]
    fn test_average_empty_selection_is_nan() {
        // Known fragility: a zero-count selection divides by zero. Callers
        // must guard; the kernel does not.
        let verts = vec![full_vertex(1.0)];
        let avg = Vertex::average(&verts, Some(&[]));
        assert!(avg.position.is_nan());
    }

    #[test]
    fn test_mix_endpoints() {
        let x = full_vertex(0.25);
        let y = full_vertex(0.75);

        let at_x = Vertex::mix(&x, &y, 0.0);
        let at_y = Vertex::mix(&x, &y, 1.0);

        assert!(at_x.approx_eq(&x, COMPARE_EPSILON));
        assert!(at_y.approx_eq(&y, COMPARE_EPSILON));
    }

    #[test]
    fn test_mix_one_sided_channel_copies_present_side() {
        let mut x = Vertex::at(Vec3::ZERO);
        x.uv2 = Some(Vec2::new(0.5, 0.5));
        let y = Vertex::at(Vec3::ONE);

        let mid = Vertex::mix(&x, &y, 0.5);
        assert_eq!(mid.uv2, Some(Vec2::new(0.5, 0.5)));
        assert_eq!(mid.uv3, None);
    }

    #[test]
    fn test_arrays_roundtrip_presence() {
        let verts = vec![full_vertex(0.1), full_vertex(0.9)];
        let arrays = VertexArrays::from_vertices(&verts);
        assert!(arrays.colors.is_some());
        assert!(arrays.normals.is_some());

        let back = arrays.to_vertices();
        assert_eq!(back.len(), 2);
        for (a, b) in back.iter().zip(&verts) {
            assert!(a.approx_eq(b, COMPARE_EPSILON));
        }
    }

    #[test]
    fn test_arrays_short_channel_is_dropped() {
        let arrays = VertexArrays {
            positions: vec![Vec3::ZERO, Vec3::ONE],
            normals: Some(vec![Vec3::Y]), // length mismatch
            ..VertexArrays::default()
        };
        let verts = arrays.to_vertices();
        assert!(verts.iter().all(|v| v.normal.is_none()));
    }
}
