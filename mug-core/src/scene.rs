use std::collections::BTreeMap;

use wrap_core::MugDimensions;

use crate::builder::{MeshName, MugMeshGroup, build_mug};
use crate::error::MeshError;
use crate::texture::Texture;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Geometry(MeshName),
    Material(MeshName),
    Texture,
}

/// GPU-side handles the scene has handed out. Released ids queue up until the
/// host drains them and disposes the matching buffers.
#[derive(Debug, Default)]
struct Ledger {
    next: u64,
    live: BTreeMap<ResourceId, ResourceKind>,
    released: Vec<(ResourceId, ResourceKind)>,
}

impl Ledger {
    fn allocate(&mut self, kind: ResourceKind) -> ResourceId {
        self.next += 1;
        let id = ResourceId(self.next);
        self.live.insert(id, kind);
        id
    }

    fn release(&mut self, id: ResourceId) {
        if let Some(kind) = self.live.remove(&id) {
            self.released.push((id, kind));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandles {
    pub geometry: ResourceId,
    pub material: ResourceId,
}

struct MountedGroup {
    group: MugMeshGroup,
    handles: [MeshHandles; 4],
}

struct MountedTexture {
    texture: Texture,
    id: ResourceId,
}

/// Owns the current mug and its outer-wall texture. Each rebuild replaces the
/// whole group; nothing from an earlier group stays live.
#[derive(Default)]
pub struct MugScene {
    ledger: Ledger,
    mounted: Option<MountedGroup>,
    texture: Option<MountedTexture>,
    generation: u64,
}

impl MugScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a new group for `dims` and releases the previous one. The
    /// current texture is dropped as well: it belongs to the old design.
    pub fn rebuild(&mut self, dims: &MugDimensions, generation: u64) -> Result<&MugMeshGroup, MeshError> {
        let group = build_mug(dims)?;
        self.release_group();
        self.release_texture();
        self.generation = generation;
        let handles = MeshName::ALL.map(|name| MeshHandles {
            geometry: self.ledger.allocate(ResourceKind::Geometry(name)),
            material: self.ledger.allocate(ResourceKind::Material(name)),
        });
        log::debug!(
            "mug rebuilt for generation {generation}: {} live resources",
            self.ledger.live.len()
        );
        let mounted = self.mounted.insert(MountedGroup { group, handles });
        Ok(&mounted.group)
    }

    /// Assigns `texture` to the outer wall. Textures projected from an older
    /// generation than the current group are discarded and `false` returned.
    pub fn apply_texture(&mut self, texture: Texture) -> bool {
        if self.mounted.is_none() || texture.generation < self.generation {
            log::debug!(
                "dropping stale texture (generation {} < {})",
                texture.generation,
                self.generation
            );
            return false;
        }
        self.release_texture();
        self.generation = texture.generation;
        let id = self.ledger.allocate(ResourceKind::Texture);
        self.texture = Some(MountedTexture { texture, id });
        true
    }

    pub fn group(&self) -> Option<&MugMeshGroup> {
        self.mounted.as_ref().map(|m| &m.group)
    }

    pub fn handles(&self, name: MeshName) -> Option<MeshHandles> {
        self.mounted.as_ref().map(|m| m.handles[name as usize])
    }

    /// Texture map of the outer wall, once one has been applied.
    pub fn outer_wall_texture(&self) -> Option<&Texture> {
        self.texture.as_ref().map(|t| &t.texture)
    }

    pub fn texture_id(&self) -> Option<ResourceId> {
        self.texture.as_ref().map(|t| t.id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_resources(&self) -> usize {
        self.ledger.live.len()
    }

    /// Ids released since the last drain, oldest first.
    pub fn drain_released(&mut self) -> Vec<(ResourceId, ResourceKind)> {
        std::mem::take(&mut self.ledger.released)
    }

    /// Releases everything; the scene is empty afterwards.
    pub fn clear(&mut self) {
        self.release_group();
        self.release_texture();
    }

    fn release_group(&mut self) {
        if let Some(old) = self.mounted.take() {
            for h in old.handles {
                self.ledger.release(h.geometry);
                self.ledger.release(h.material);
            }
        }
    }

    fn release_texture(&mut self) {
        if let Some(old) = self.texture.take() {
            self.ledger.release(old.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(generation: u64) -> Texture {
        Texture::new(2, 1, vec![255; 8], generation).unwrap()
    }

    #[test]
    fn rebuild_allocates_one_geometry_and_material_per_mesh() {
        let mut scene = MugScene::new();
        scene.rebuild(&MugDimensions::default(), 1).unwrap();
        assert_eq!(scene.live_resources(), 8);
        assert!(scene.drain_released().is_empty());
        assert!(scene.handles(MeshName::Lip).is_some());
    }

    #[test]
    fn rebuild_releases_previous_group_and_texture() {
        let mut scene = MugScene::new();
        scene.rebuild(&MugDimensions::default(), 1).unwrap();
        assert!(scene.apply_texture(white(1)));
        assert_eq!(scene.live_resources(), 9);
        let old = scene.handles(MeshName::OuterWall).unwrap();

        scene.rebuild(&MugDimensions::default(), 2).unwrap();
        assert_eq!(scene.live_resources(), 8);
        assert!(scene.outer_wall_texture().is_none());
        let released = scene.drain_released();
        assert_eq!(released.len(), 9);
        assert!(released.iter().any(|(id, _)| *id == old.geometry));
        assert!(released.iter().any(|(_, k)| *k == ResourceKind::Texture));
    }

    #[test]
    fn stale_texture_is_rejected() {
        let mut scene = MugScene::new();
        scene.rebuild(&MugDimensions::default(), 3).unwrap();
        assert!(!scene.apply_texture(white(2)));
        assert!(scene.outer_wall_texture().is_none());
        assert!(scene.apply_texture(white(3)));
        assert!(scene.apply_texture(white(4)));
        assert_eq!(scene.generation(), 4);
        assert!(!scene.apply_texture(white(3)));
        assert_eq!(scene.drain_released().len(), 1);
    }

    #[test]
    fn texture_without_group_is_ignored() {
        let mut scene = MugScene::new();
        assert!(!scene.apply_texture(white(1)));
    }

    #[test]
    fn invalid_dimensions_keep_current_group() {
        let mut scene = MugScene::new();
        scene.rebuild(&MugDimensions::default(), 1).unwrap();
        let bad = MugDimensions {
            height_mm: -1.0,
            ..MugDimensions::default()
        };
        assert!(scene.rebuild(&bad, 2).is_err());
        assert_eq!(scene.live_resources(), 8);
        assert!(scene.group().is_some());
    }

    #[test]
    fn clear_releases_everything() {
        let mut scene = MugScene::new();
        scene.rebuild(&MugDimensions::default(), 1).unwrap();
        scene.apply_texture(white(1));
        scene.clear();
        assert_eq!(scene.live_resources(), 0);
        assert_eq!(scene.drain_released().len(), 9);
        assert!(scene.group().is_none());
    }
}
