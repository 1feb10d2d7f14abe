use wrap_core::MugDimensions;

use crate::error::MeshError;
use crate::interaction::{Camera, Controls, MugPose};
use crate::scene::MugScene;
use crate::texture::Texture;

/// Host handle for one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Asks the host for the next display frame.
pub trait FrameScheduler {
    /// `None` when the host refused to schedule.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Cooperative per-frame task. At most one frame is pending; once stopped no
/// further frames are requested.
pub struct RenderLoop<S> {
    scheduler: S,
    active: bool,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            active: false,
            pending: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.schedule();
    }

    pub fn stop(&mut self) {
        self.active = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Called by the host when the pending frame fires. Returns whether the
    /// frame should be rendered; the next frame is requested first.
    pub fn on_frame(&mut self) -> bool {
        self.pending = None;
        if !self.active {
            return false;
        }
        self.schedule();
        true
    }

    fn schedule(&mut self) {
        match self.scheduler.request_frame() {
            Some(handle) => self.pending = Some(handle),
            None => {
                log::warn!("frame request refused, stopping render loop");
                self.active = false;
            }
        }
    }
}

/// What the host draws for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub camera: Camera,
    pub pose: MugPose,
}

/// The 3D view: scene, controls and render loop under one active flag.
pub struct MugView<S> {
    pub scene: MugScene,
    pub controls: Controls,
    render_loop: RenderLoop<S>,
}

impl<S: FrameScheduler> MugView<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scene: MugScene::new(),
            controls: Controls::new(),
            render_loop: RenderLoop::new(scheduler),
        }
    }

    pub fn is_active(&self) -> bool {
        self.render_loop.is_active()
    }

    pub fn render_loop(&self) -> &RenderLoop<S> {
        &self.render_loop
    }

    pub fn render_loop_mut(&mut self) -> &mut RenderLoop<S> {
        &mut self.render_loop
    }

    /// Switches to 3D: builds the mug, starts the idle spin and the loop.
    pub fn activate(
        &mut self,
        dims: &MugDimensions,
        generation: u64,
        now_ms: f64,
    ) -> Result<(), MeshError> {
        self.scene.rebuild(dims, generation)?;
        self.controls.auto_rotation.start(now_ms);
        self.render_loop.start();
        Ok(())
    }

    /// Rebuilds for a changed design while active. Ignored in 2D.
    pub fn refresh(&mut self, dims: &MugDimensions, generation: u64, now_ms: f64) -> Result<bool, MeshError> {
        if !self.is_active() {
            return Ok(false);
        }
        self.scene.rebuild(dims, generation)?;
        self.controls.auto_rotation.start(now_ms);
        Ok(true)
    }

    /// Applies a projected texture unless the view left 3D or the texture
    /// is stale.
    pub fn apply_texture(&mut self, texture: Texture) -> bool {
        self.is_active() && self.scene.apply_texture(texture)
    }

    /// Switches back to 2D. No frame runs after this.
    pub fn deactivate(&mut self) {
        self.render_loop.stop();
        self.controls.auto_rotation.stop();
    }

    pub fn on_frame(&mut self, now_ms: f64) -> Option<FrameState> {
        if !self.render_loop.on_frame() {
            return None;
        }
        self.controls.tick(now_ms);
        Some(FrameState {
            camera: self.controls.camera,
            pose: self.controls.pose,
        })
    }
}
