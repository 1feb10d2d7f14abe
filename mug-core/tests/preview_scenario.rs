use mug_core::{
    FrameHandle, FrameScheduler, MeshName, MugView, PointerButton, ScreenPoint, Texture, Wrap,
};
use wrap_core::MugDimensions;

#[derive(Default)]
struct ManualFrames {
    next: i32,
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next += 1;
        Some(FrameHandle(self.next))
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

#[test]
fn switching_to_3d_yields_textured_outer_wall() {
    let mut view = MugView::new(ManualFrames::default());
    view.activate(&MugDimensions::default(), 7, 0.0).unwrap();

    let group = view.scene.group().unwrap();
    assert_eq!(group.meshes().len(), 4);
    for name in MeshName::ALL {
        assert!(group.get(name).geometry.vertex_count() > 0);
    }

    let texture = Texture::new(8, 4, vec![255; 8 * 4 * 4], 7).unwrap();
    assert!(view.apply_texture(texture));
    let map = view.scene.outer_wall_texture().unwrap();
    assert_eq!((map.wrap_s, map.wrap_t), (Wrap::Repeat, Wrap::Repeat));
    assert!(view.scene.texture_id().is_some());
}

#[test]
fn design_change_supersedes_pending_texture() {
    let mut view = MugView::new(ManualFrames::default());
    view.activate(&MugDimensions::default(), 1, 0.0).unwrap();
    assert!(view.refresh(&MugDimensions::new(100.0, 90.0, 25.0).unwrap(), 2, 10.0).unwrap());
    let late = Texture::new(1, 1, vec![255; 4], 1).unwrap();
    assert!(!view.apply_texture(late));
    assert!(view.scene.outer_wall_texture().is_none());
}

#[test]
fn interaction_stops_idle_spin() {
    let mut view = MugView::new(ManualFrames::default());
    view.activate(&MugDimensions::default(), 1, 0.0).unwrap();
    view.on_frame(1_000.0).unwrap();
    view.controls.pointer_down(PointerButton::Left, ScreenPoint::new(0.0, 0.0));
    let before = view.on_frame(2_000.0).unwrap().pose;
    let after = view.on_frame(6_000.0).unwrap().pose;
    assert_eq!(before, after);
}
