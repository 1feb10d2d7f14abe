//! Indexed triangle geometry with the primitives the mug is built from.
//!
//! Conventions follow the usual WebGL layout: Y up, counter-clockwise front
//! faces, UV origin bottom-left. Cylinders start their circumference at +Z
//! and run towards +X, so `u = 0` lies on the seam.

use std::f64::consts::{PI, TAU};

pub const HALF_PI: f64 = PI / 2.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Face orientation applied to a part when merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    Keep,
    Reverse,
}

pub struct GeometryPart<'a> {
    pub geometry: &'a Geometry,
    pub winding: Winding,
}

impl<'a> GeometryPart<'a> {
    pub fn keep(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            winding: Winding::Keep,
        }
    }

    pub fn reversed(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            winding: Winding::Reverse,
        }
    }
}

fn to_f32(v: [f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        [0.0, 0.0, 0.0]
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.positions.first()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for p in &self.positions {
            for k in 0..3 {
                b.min[k] = b.min[k].min(p[k]);
                b.max[k] = b.max[k].max(p[k]);
            }
        }
        Some(b)
    }

    /// Open-ended truncated cone around Y, centred on the origin. Only the
    /// side wall is generated.
    pub fn open_cylinder(radius_top: f64, radius_bottom: f64, height: f64, radial_segments: usize) -> Self {
        let radial = radial_segments.max(3);
        let half = height / 2.0;
        let slope = if height != 0.0 {
            (radius_bottom - radius_top) / height
        } else {
            0.0
        };
        let mut g = Geometry::default();
        for row in 0..=1usize {
            let v = row as f64;
            let radius = v * (radius_bottom - radius_top) + radius_top;
            for x in 0..=radial {
                let u = x as f64 / radial as f64;
                let (sin_t, cos_t) = (u * TAU).sin_cos();
                g.positions.push(to_f32([radius * sin_t, -v * height + half, radius * cos_t]));
                g.normals.push(to_f32(normalize([sin_t, slope, cos_t])));
                g.uvs.push([u as f32, (1.0 - v) as f32]);
            }
        }
        let stride = (radial + 1) as u32;
        for x in 0..radial as u32 {
            let a = x;
            let b = stride + x;
            let c = stride + x + 1;
            let d = x + 1;
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
        g
    }

    /// Flat disk in the XY plane facing +Z.
    pub fn disk(radius: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        let mut g = Geometry::default();
        g.positions.push([0.0, 0.0, 0.0]);
        g.normals.push([0.0, 0.0, 1.0]);
        g.uvs.push([0.5, 0.5]);
        for s in 0..=segments {
            let (sin_t, cos_t) = (s as f64 / segments as f64 * TAU).sin_cos();
            g.positions.push(to_f32([radius * cos_t, radius * sin_t, 0.0]));
            g.normals.push([0.0, 0.0, 1.0]);
            g.uvs.push([((cos_t + 1.0) / 2.0) as f32, ((sin_t + 1.0) / 2.0) as f32]);
        }
        for i in 1..=segments as u32 {
            g.indices.extend_from_slice(&[i, i + 1, 0]);
        }
        g
    }

    /// Torus (or torus arc) around the Z axis, sweeping `arc` radians from +X
    /// towards +Y.
    pub fn torus(radius: f64, tube: f64, radial_segments: usize, tubular_segments: usize, arc: f64) -> Self {
        let radial = radial_segments.max(3);
        let tubular = tubular_segments.max(3);
        let mut g = Geometry::default();
        for j in 0..=radial {
            for i in 0..=tubular {
                let u = i as f64 / tubular as f64 * arc;
                let v = j as f64 / radial as f64 * TAU;
                let ring = radius + tube * v.cos();
                let p = [ring * u.cos(), ring * u.sin(), tube * v.sin()];
                let center = [radius * u.cos(), radius * u.sin(), 0.0];
                g.positions.push(to_f32(p));
                g.normals.push(to_f32(normalize([p[0] - center[0], p[1] - center[1], p[2]])));
                g.uvs.push([(i as f64 / tubular as f64) as f32, (j as f64 / radial as f64) as f32]);
            }
        }
        let stride = (tubular + 1) as u32;
        for j in 1..=radial as u32 {
            for i in 1..=tubular as u32 {
                let a = stride * j + i - 1;
                let b = stride * (j - 1) + i - 1;
                let c = stride * (j - 1) + i;
                let d = stride * j + i;
                g.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        g
    }

    fn map_vectors(&mut self, f: impl Fn([f64; 3]) -> [f64; 3]) {
        let apply = |v: &mut [f32; 3]| {
            let r = f([v[0] as f64, v[1] as f64, v[2] as f64]);
            *v = to_f32(r);
        };
        self.positions.iter_mut().for_each(&apply);
        self.normals.iter_mut().for_each(&apply);
    }

    pub fn rotate_x(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.map_vectors(|[x, y, z]| [x, y * c - z * s, y * s + z * c]);
        self
    }

    pub fn rotate_y(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.map_vectors(|[x, y, z]| [x * c + z * s, y, -x * s + z * c]);
        self
    }

    pub fn rotate_z(&mut self, angle: f64) -> &mut Self {
        let (s, c) = angle.sin_cos();
        self.map_vectors(|[x, y, z]| [x * c - y * s, x * s + y * c, z]);
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        for p in &mut self.positions {
            *p = to_f32([p[0] as f64 + dx, p[1] as f64 + dy, p[2] as f64 + dz]);
        }
        self
    }

    /// Per-vertex normals from the area-weighted face normals of the current
    /// winding.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![[0.0f64; 3]; self.positions.len()];
        let pos = |i: u32| {
            let p = self.positions[i as usize];
            [p[0] as f64, p[1] as f64, p[2] as f64]
        };
        for [ia, ib, ic] in self.triangles() {
            let (a, b, c) = (pos(ia), pos(ib), pos(ic));
            let cb = [c[0] - b[0], c[1] - b[1], c[2] - b[2]];
            let ab = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
            let n = [
                cb[1] * ab[2] - cb[2] * ab[1],
                cb[2] * ab[0] - cb[0] * ab[2],
                cb[0] * ab[1] - cb[1] * ab[0],
            ];
            for i in [ia, ib, ic] {
                let v = &mut acc[i as usize];
                v[0] += n[0];
                v[1] += n[1];
                v[2] += n[2];
            }
        }
        self.normals = acc.into_iter().map(|n| to_f32(normalize(n))).collect();
    }

    /// Geometric normal of triangle `t` under its winding.
    pub fn face_normal(&self, t: [u32; 3]) -> [f64; 3] {
        let p = |i: u32| {
            let v = self.positions[i as usize];
            [v[0] as f64, v[1] as f64, v[2] as f64]
        };
        let (a, b, c) = (p(t[0]), p(t[1]), p(t[2]));
        let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        normalize([
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ])
    }

    /// Flat `[x, y, z, ...]` view for GPU upload.
    pub fn flat_positions(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    pub fn flat_normals(&self) -> &[f32] {
        self.normals.as_flattened()
    }

    pub fn flat_uvs(&self) -> &[f32] {
        self.uvs.as_flattened()
    }
}

/// Concatenates vertex buffers and re-bases each part's indices onto the
/// merged buffer. Parts marked [`Winding::Reverse`] have every triangle
/// flipped. Normals are recomputed from the merged faces.
pub fn merge_geometries(parts: &[GeometryPart<'_>]) -> Geometry {
    let vertices: usize = parts.iter().map(|p| p.geometry.vertex_count()).sum();
    let indices: usize = parts.iter().map(|p| p.geometry.indices.len()).sum();
    let mut out = Geometry {
        positions: Vec::with_capacity(vertices),
        normals: Vec::new(),
        uvs: Vec::with_capacity(vertices),
        indices: Vec::with_capacity(indices),
    };
    for part in parts {
        let g = part.geometry;
        let offset = out.positions.len() as u32;
        out.positions.extend_from_slice(&g.positions);
        out.uvs.extend_from_slice(&g.uvs);
        for [a, b, c] in g.triangles() {
            let tri = match part.winding {
                Winding::Keep => [a, b, c],
                Winding::Reverse => [c, b, a],
            };
            out.indices.extend(tri.iter().map(|i| i + offset));
        }
    }
    out.compute_vertex_normals();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    fn single_triangle() -> Geometry {
        Geometry {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn cylinder_seam_starts_at_plus_z() {
        let g = Geometry::open_cylinder(1.0, 1.0, 2.0, 4);
        assert_eq!(g.vertex_count(), 10);
        assert_eq!(g.triangle_count(), 8);
        assert_relative_eq!(g.positions[0][2], 1.0);
        assert_relative_eq!(g.positions[0][1], 1.0);
        assert_eq!(g.uvs[0], [0.0, 1.0]);
        // quarter turn lands on +X
        assert_relative_eq!(g.positions[1][0], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn cylinder_faces_point_outward() {
        let g = Geometry::open_cylinder(0.9, 1.0, 2.0, 16);
        for t in g.triangles() {
            let n = g.face_normal(t);
            let p = g.positions[t[0] as usize];
            assert!(dot(n, [p[0] as f64, 0.0, p[2] as f64]) > 0.0);
        }
    }

    #[test]
    fn disk_faces_plus_z() {
        let g = Geometry::disk(2.0, 8);
        assert_eq!(g.vertex_count(), 10);
        for t in g.triangles() {
            assert_relative_eq!(g.face_normal(t)[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn rotate_x_turns_disk_downward() {
        let mut g = Geometry::disk(1.0, 8);
        g.rotate_x(HALF_PI);
        for t in g.triangles() {
            assert_relative_eq!(g.face_normal(t)[1], -1.0, epsilon = 1e-6);
        }
        assert_relative_eq!(g.normals[0][1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn torus_arc_spans_half_circle() {
        let g = Geometry::torus(3.0, 0.5, 8, 16, PI);
        let b = g.bounds().unwrap();
        assert_relative_eq!(b.max[0], 3.5, epsilon = 1e-5);
        assert_relative_eq!(b.min[0], -3.5, epsilon = 1e-5);
        assert_relative_eq!(b.max[1], 3.5, epsilon = 1e-5);
        assert!(b.min[1] > -0.6);
    }

    #[test]
    fn merge_offsets_indices_and_keeps_winding() {
        let a = single_triangle();
        let mut b = single_triangle();
        b.translate(0.0, 0.0, 1.0);
        let merged = merge_geometries(&[GeometryPart::keep(&a), GeometryPart::keep(&b)]);
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(merged.uvs.len(), 6);
        assert_relative_eq!(merged.normals[4][2], 1.0);
    }

    #[test]
    fn merge_reverses_marked_parts() {
        let a = single_triangle();
        let b = single_triangle();
        let merged = merge_geometries(&[GeometryPart::keep(&a), GeometryPart::reversed(&b)]);
        assert_eq!(&merged.indices[3..], &[5, 4, 3]);
        let tris: Vec<_> = merged.triangles().collect();
        assert_relative_eq!(merged.face_normal(tris[0])[2], 1.0);
        assert_relative_eq!(merged.face_normal(tris[1])[2], -1.0);
        assert_relative_eq!(merged.normals[3][2], -1.0);
    }

    #[test]
    fn flat_views_match_counts() {
        let g = Geometry::open_cylinder(1.0, 1.0, 1.0, 8);
        assert_eq!(g.flat_positions().len(), g.vertex_count() * 3);
        assert_eq!(g.flat_uvs().len(), g.vertex_count() * 2);
    }
}
