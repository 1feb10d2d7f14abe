use std::f64::consts::{PI, TAU};

use serde::Serialize;
use wrap_core::MugDimensions;
use wrap_core::constants::HANDLE_AZIMUTH_TURNS;

use crate::constants::{
    CERAMIC_COLOR, CERAMIC_THICKNESS_MM, HANDLE_RADIAL_SEGMENTS, HANDLE_RADIUS_RATIO,
    HANDLE_TUBE_RATIO, HANDLE_TUBULAR_SEGMENTS, LIP_RADIAL_SEGMENTS, LIP_TUBULAR_SEGMENTS,
    SCENE_SCALE, TOP_RADIUS_RATIO, WALL_SEGMENTS,
};
use crate::error::MeshError;
use crate::mesh::{Geometry, GeometryPart, HALF_PI, merge_geometries};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MeshName {
    OuterWall,
    InnerParts,
    Handle,
    Lip,
}

impl MeshName {
    pub const ALL: [MeshName; 4] = [
        MeshName::OuterWall,
        MeshName::InnerParts,
        MeshName::Handle,
        MeshName::Lip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MeshName::OuterWall => "outerWall",
            MeshName::InnerParts => "innerParts",
            MeshName::Handle => "handle",
            MeshName::Lip => "lip",
        }
    }
}

/// Lambert-style surface. `textured` marks the mesh that receives the
/// projected design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub color: u32,
    pub textured: bool,
}

impl Material {
    pub fn plain() -> Self {
        Self {
            color: CERAMIC_COLOR,
            textured: false,
        }
    }

    pub fn textured() -> Self {
        Self {
            color: CERAMIC_COLOR,
            textured: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MugMesh {
    pub name: MeshName,
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MugMesh {
    fn new(name: MeshName, geometry: Geometry, material: Material) -> Self {
        Self {
            name,
            geometry,
            material,
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

/// The four named sub-meshes of one mug, in [`MeshName::ALL`] order.
#[derive(Clone, Debug, PartialEq)]
pub struct MugMeshGroup {
    meshes: [MugMesh; 4],
}

impl MugMeshGroup {
    pub fn meshes(&self) -> &[MugMesh; 4] {
        &self.meshes
    }

    pub fn get(&self, name: MeshName) -> &MugMesh {
        &self.meshes[name as usize]
    }

    pub fn outer_wall(&self) -> &MugMesh {
        self.get(MeshName::OuterWall)
    }

    pub fn into_meshes(self) -> [MugMesh; 4] {
        self.meshes
    }

    /// Wavefront OBJ with one object per sub-mesh.
    pub fn to_obj(&self) -> String {
        let mut out = String::from("# mug mesh\n");
        let mut base = 1u32;
        for mesh in &self.meshes {
            let g = &mesh.geometry;
            out.push_str(&format!("o {}\n", mesh.name.as_str()));
            for p in &g.positions {
                out.push_str(&format!("v {} {} {}\n", p[0], p[1], p[2]));
            }
            for t in &g.uvs {
                out.push_str(&format!("vt {} {}\n", t[0], t[1]));
            }
            for n in &g.normals {
                out.push_str(&format!("vn {} {} {}\n", n[0], n[1], n[2]));
            }
            for [a, b, c] in g.triangles() {
                let (a, b, c) = (a + base, b + base, c + base);
                out.push_str(&format!("f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}\n"));
            }
            base += g.vertex_count() as u32;
        }
        out
    }
}

/// Scene-space measurements of the mug body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MugProfile {
    pub height: f64,
    pub thickness: f64,
    pub outer_radius: f64,
    pub outer_top_radius: f64,
    pub inner_radius: f64,
    pub inner_top_radius: f64,
    pub handle_radius: f64,
    pub handle_tube: f64,
}

impl MugProfile {
    pub fn new(dims: &MugDimensions) -> Result<Self, MeshError> {
        dims.validate()?;
        let k = SCENE_SCALE;
        let height = dims.height_mm * k;
        let outer_radius = dims.diameter_mm / 2.0 * k;
        let outer_top_radius = outer_radius * TOP_RADIUS_RATIO;
        // Thin mugs keep a positive cavity: the wall never exceeds half the
        // top radius or half the height.
        let thickness = (CERAMIC_THICKNESS_MM * k)
            .min(outer_top_radius / 2.0)
            .min(height / 2.0);
        Ok(Self {
            height,
            thickness,
            outer_radius,
            outer_top_radius,
            inner_radius: outer_radius - thickness,
            inner_top_radius: outer_top_radius - thickness,
            handle_radius: height * HANDLE_RADIUS_RATIO,
            handle_tube: thickness.max(dims.handle_area_width_mm * k * HANDLE_TUBE_RATIO),
        })
    }
}

fn outer_wall(p: &MugProfile) -> Geometry {
    Geometry::open_cylinder(p.outer_top_radius, p.outer_radius, p.height, WALL_SEGMENTS)
}

// Inner wall, underside and cavity floor. The inner wall is wound inward.
fn inner_parts(p: &MugProfile) -> Geometry {
    let mut wall = Geometry::open_cylinder(
        p.inner_top_radius,
        p.inner_radius,
        p.height - p.thickness,
        WALL_SEGMENTS,
    );
    wall.translate(0.0, p.thickness / 2.0, 0.0);

    let mut underside = Geometry::disk(p.outer_radius, WALL_SEGMENTS);
    underside.rotate_x(HALF_PI).translate(0.0, -p.height / 2.0, 0.0);

    let mut floor = Geometry::disk(p.inner_radius, WALL_SEGMENTS);
    floor
        .rotate_x(-HALF_PI)
        .translate(0.0, -p.height / 2.0 + p.thickness, 0.0);

    merge_geometries(&[
        GeometryPart::reversed(&wall),
        GeometryPart::keep(&underside),
        GeometryPart::keep(&floor),
    ])
}

// C-shaped half torus standing upright, bulging away from the body at the
// handle azimuth.
fn handle(p: &MugProfile) -> Geometry {
    let mut g = Geometry::torus(
        p.handle_radius,
        p.handle_tube,
        HANDLE_RADIAL_SEGMENTS,
        HANDLE_TUBULAR_SEGMENTS,
        PI,
    );
    g.rotate_z(HALF_PI)
        .rotate_y(HALF_PI)
        .translate(0.0, 0.0, p.outer_radius - p.thickness)
        .rotate_y(HANDLE_AZIMUTH_TURNS * TAU);
    g
}

fn lip(p: &MugProfile) -> Geometry {
    let major = (p.outer_top_radius + p.inner_top_radius) / 2.0;
    let minor = (p.outer_top_radius - p.inner_top_radius) / 2.0;
    let mut g = Geometry::torus(major, minor, LIP_RADIAL_SEGMENTS, LIP_TUBULAR_SEGMENTS, TAU);
    g.rotate_x(HALF_PI).translate(0.0, p.height / 2.0, 0.0);
    g
}

pub fn build_mug(dims: &MugDimensions) -> Result<MugMeshGroup, MeshError> {
    let profile = MugProfile::new(dims)?;
    log::debug!(
        "building mug: r={:.3} top={:.3} h={:.3} wall={:.3}",
        profile.outer_radius,
        profile.outer_top_radius,
        profile.height,
        profile.thickness
    );
    Ok(MugMeshGroup {
        meshes: [
            MugMesh::new(MeshName::OuterWall, outer_wall(&profile), Material::textured()),
            MugMesh::new(MeshName::InnerParts, inner_parts(&profile), Material::plain()),
            MugMesh::new(MeshName::Handle, handle(&profile), Material::plain()),
            MugMesh::new(MeshName::Lip, lip(&profile), Material::plain()),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard() -> MugMeshGroup {
        build_mug(&MugDimensions::default()).unwrap()
    }

    #[test]
    fn four_named_meshes_in_order() {
        let group = standard();
        let names: Vec<_> = group.meshes().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["outerWall", "innerParts", "handle", "lip"]);
        assert!(group.meshes().iter().all(|m| m.cast_shadow && m.receive_shadow));
        assert!(group.outer_wall().material.textured);
        assert!(!group.get(MeshName::Lip).material.textured);
    }

    #[test]
    fn profile_matches_scale_and_wall() {
        let p = MugProfile::new(&MugDimensions::default()).unwrap();
        assert_relative_eq!(p.outer_radius, 1.23, epsilon = 1e-12);
        assert_relative_eq!(p.outer_top_radius, 1.107, epsilon = 1e-12);
        assert_relative_eq!(p.thickness, 0.12, epsilon = 1e-12);
        assert_relative_eq!(p.inner_radius, 1.11, epsilon = 1e-12);
        assert_relative_eq!(p.height, 2.85, epsilon = 1e-12);
        assert_relative_eq!(p.handle_radius, 0.95, epsilon = 1e-12);
        assert_relative_eq!(p.handle_tube, 0.24, epsilon = 1e-12);
    }

    #[test]
    fn outer_wall_spans_full_height() {
        let b = standard().outer_wall().geometry.bounds().unwrap();
        assert_relative_eq!(b.max[1], 1.425, epsilon = 1e-5);
        assert_relative_eq!(b.min[1], -1.425, epsilon = 1e-5);
        assert_relative_eq!(b.max[2], 1.23, epsilon = 1e-5);
    }

    #[test]
    fn inner_parts_leave_a_solid_bottom() {
        let group = standard();
        let g = &group.get(MeshName::InnerParts).geometry;
        // 2 * 33 wall vertices + 2 * 34 disk vertices
        assert_eq!(g.vertex_count(), 66 + 68);
        let b = g.bounds().unwrap();
        assert_relative_eq!(b.min[1], -1.425, epsilon = 1e-5);
        assert_relative_eq!(b.max[1], 1.425, epsilon = 1e-5);
    }

    #[test]
    fn inner_wall_faces_the_cavity() {
        let group = standard();
        let g = &group.get(MeshName::InnerParts).geometry;
        let wall_triangles = WALL_SEGMENTS * 2;
        for t in g.triangles().take(wall_triangles) {
            let n = g.face_normal(t);
            let p = g.positions[t[0] as usize];
            let radial = n[0] * p[0] as f64 + n[2] * p[2] as f64;
            assert!(radial < 0.0, "inner wall triangle faces outward");
        }
    }

    #[test]
    fn handle_sits_behind_the_seam() {
        let group = standard();
        let b = group.get(MeshName::Handle).geometry.bounds().unwrap();
        let p = MugProfile::new(&MugDimensions::default()).unwrap();
        let base = (p.outer_radius - p.thickness) as f32;
        assert!(b.min[2] > base - p.handle_tube as f32 - 1e-4);
        assert_relative_eq!(
            b.max[2],
            (p.outer_radius - p.thickness + p.handle_radius + p.handle_tube) as f32,
            epsilon = 1e-4
        );
        assert_relative_eq!(b.max[1], (p.handle_radius + p.handle_tube) as f32, epsilon = 1e-4);
        assert!(b.max[0].abs() <= p.handle_tube as f32 + 1e-4);
    }

    #[test]
    fn lip_rests_on_the_rim() {
        let group = standard();
        let b = group.get(MeshName::Lip).geometry.bounds().unwrap();
        let p = MugProfile::new(&MugDimensions::default()).unwrap();
        assert_relative_eq!(b.max[0], p.outer_top_radius as f32, epsilon = 1e-4);
        assert_relative_eq!((b.max[1] + b.min[1]) / 2.0, (p.height / 2.0) as f32, epsilon = 1e-4);
    }

    #[test]
    fn thin_mug_keeps_positive_cavity() {
        let p = MugProfile::new(&MugDimensions::new(5.0, 6.0, 1.0).unwrap()).unwrap();
        assert!(p.inner_radius > 0.0 && p.inner_top_radius > 0.0);
        assert!(p.height - p.thickness > 0.0);
    }

    #[test]
    fn obj_export_has_four_objects() {
        let obj = standard().to_obj();
        assert_eq!(obj.matches("\no ").count(), 4);
        assert!(obj.contains("o outerWall\n"));
        assert!(obj.lines().any(|l| l.starts_with("f ")));
    }
}
