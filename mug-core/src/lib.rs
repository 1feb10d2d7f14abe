//! Hollow 3D mug matching the flattened wrap: mesh primitives, the named
//! mesh group, scene ownership, and the interaction and frame loop of the
//! preview.

pub mod builder;
pub mod constants;
pub mod error;
pub mod interaction;
pub mod mesh;
pub mod render_loop;
pub mod scene;
pub mod texture;

pub use builder::{Material, MeshName, MugMesh, MugMeshGroup, MugProfile, build_mug};
pub use error::MeshError;
pub use interaction::{
    AutoRotation, Camera, Controls, Gesture, MugPose, PointerButton, ScreenPoint, TouchMode,
};
pub use mesh::{Bounds, Geometry, GeometryPart, Winding, merge_geometries};
pub use render_loop::{FrameHandle, FrameScheduler, FrameState, MugView, RenderLoop};
pub use scene::{MeshHandles, MugScene, ResourceId, ResourceKind};
pub use texture::{Texture, Wrap};
