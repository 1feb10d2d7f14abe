use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mug_core::{FrameHandle, FrameScheduler, MeshName, MugMesh, MugView, ScreenPoint};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::editor::Editor;
use crate::utils::{frame_object, js_error, pointer_button, screen_points};

type RafClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` behind the frame loop. The callback is installed
/// once by [`Viewer::new`] and reused for every frame.
pub struct RafScheduler {
    window: Window,
    callback: Rc<RefCell<Option<RafClosure>>>,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.window.cancel_animation_frame(handle.0).is_err() {
            log::warn!("could not cancel frame {}", handle.0);
        }
    }
}

struct ViewerState {
    view: MugView<RafScheduler>,
    draw: js_sys::Function,
    texture_size: Option<(u32, u32)>,
}

/// The 3D preview. Geometry, materials and the outer-wall texture are read
/// out for the host's WebGL scene; each frame calls `draw` with the camera
/// and mug pose. Timestamps must come from `performance.now()`.
#[wasm_bindgen]
pub struct Viewer {
    state: Rc<RefCell<ViewerState>>,
}

#[wasm_bindgen]
impl Viewer {
    #[wasm_bindgen(constructor)]
    pub fn new(draw: js_sys::Function) -> Result<Viewer, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let callback: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
        let scheduler = RafScheduler {
            window,
            callback: callback.clone(),
        };
        let state = Rc::new(RefCell::new(ViewerState {
            view: MugView::new(scheduler),
            draw,
            texture_size: None,
        }));
        let weak: Weak<RefCell<ViewerState>> = Rc::downgrade(&state);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let (frame, draw) = {
                let mut s = state.borrow_mut();
                (s.view.on_frame(ts), s.draw.clone())
            };
            if let Some(frame) = frame {
                let res = frame_object(&frame).and_then(|f| draw.call1(&JsValue::NULL, &f));
                if let Err(err) = res {
                    log::error!("draw callback failed: {err:?}");
                }
            }
        }) as Box<dyn FnMut(f64)>));
        Ok(Viewer { state })
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().view.is_active()
    }

    /// Texture size matching the host's canvas; zero falls back to the
    /// default size.
    pub fn set_texture_size(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().texture_size = Some((width, height));
    }

    /// Switches to 3D for the editor's current template.
    pub fn activate(&mut self, editor: &Editor, now_ms: f64) -> Result<(), JsValue> {
        let template = editor.template()?;
        {
            let mut s = self.state.borrow_mut();
            s.view
                .activate(&editor.dimensions(), template.generation, now_ms)
                .map_err(js_error)?;
        }
        self.project_texture(editor)
    }

    /// Follows a regenerated template while in 3D. Returns false in 2D.
    pub fn sync(&mut self, editor: &Editor, now_ms: f64) -> Result<bool, JsValue> {
        let template = editor.template()?;
        let refreshed = self
            .state
            .borrow_mut()
            .view
            .refresh(&editor.dimensions(), template.generation, now_ms)
            .map_err(js_error)?;
        if refreshed {
            self.project_texture(editor)?;
        }
        Ok(refreshed)
    }

    pub fn deactivate(&mut self) {
        self.state.borrow_mut().view.deactivate();
    }

    pub fn pointer_down(&mut self, button: i16, x: f64, y: f64) {
        if let Some(button) = pointer_button(button) {
            let at = ScreenPoint::new(x, y);
            self.state.borrow_mut().view.controls.pointer_down(button, at);
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let at = ScreenPoint::new(x, y);
        self.state.borrow_mut().view.controls.pointer_move(at);
    }

    pub fn pointer_up(&mut self, button: i16) {
        if let Some(button) = pointer_button(button) {
            self.state.borrow_mut().view.controls.pointer_up(button);
        }
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.state.borrow_mut().view.controls.wheel(delta_y);
    }

    /// Touch handlers take flat `[x0, y0, x1, y1, ...]` coordinates.
    pub fn touch_start(&mut self, coords: &[f64]) {
        let touches = screen_points(coords);
        self.state.borrow_mut().view.controls.touch_start(&touches);
    }

    pub fn touch_move(&mut self, coords: &[f64]) {
        let touches = screen_points(coords);
        self.state.borrow_mut().view.controls.touch_move(&touches);
    }

    pub fn touch_end(&mut self, remaining: &[f64]) {
        let touches = screen_points(remaining);
        self.state.borrow_mut().view.controls.touch_end(&touches);
    }

    pub fn touch_cancel(&mut self) {
        self.state.borrow_mut().view.controls.touch_cancel();
    }

    /// 4 while a mug is built, else 0.
    pub fn mesh_count(&self) -> usize {
        self.state
            .borrow()
            .view
            .scene
            .group()
            .map_or(0, |g| g.meshes().len())
    }

    pub fn mesh_name(&self, index: usize) -> Option<String> {
        MeshName::ALL.get(index).map(|n| n.as_str().to_string())
    }

    pub fn positions(&self, index: usize) -> Vec<f32> {
        self.with_mesh(index, |m| m.geometry.flat_positions().to_vec())
    }

    pub fn normals(&self, index: usize) -> Vec<f32> {
        self.with_mesh(index, |m| m.geometry.flat_normals().to_vec())
    }

    pub fn uvs(&self, index: usize) -> Vec<f32> {
        self.with_mesh(index, |m| m.geometry.flat_uvs().to_vec())
    }

    pub fn indices(&self, index: usize) -> Vec<u32> {
        self.with_mesh(index, |m| m.geometry.indices.clone())
    }

    /// Material of mesh `index` as JSON.
    pub fn material(&self, index: usize) -> Result<Option<String>, JsValue> {
        let s = self.state.borrow();
        let Some(mesh) = mesh_at(&s, index) else {
            return Ok(None);
        };
        serde_json::to_string(&mesh.material)
            .map(Some)
            .map_err(js_error)
    }

    /// Resource id of the geometry buffers of mesh `index`.
    pub fn geometry_id(&self, index: usize) -> Option<f64> {
        let name = *MeshName::ALL.get(index)?;
        let s = self.state.borrow();
        s.view.scene.handles(name).map(|h| h.geometry.0 as f64)
    }

    pub fn texture_id(&self) -> Option<f64> {
        self.state.borrow().view.scene.texture_id().map(|id| id.0 as f64)
    }

    pub fn texture_width(&self) -> u32 {
        self.state
            .borrow()
            .view
            .scene
            .outer_wall_texture()
            .map_or(0, |t| t.width)
    }

    pub fn texture_height(&self) -> u32 {
        self.state
            .borrow()
            .view
            .scene
            .outer_wall_texture()
            .map_or(0, |t| t.height)
    }

    /// Straight RGBA rows of the outer-wall texture, top row first.
    pub fn texture_rgba(&self) -> Vec<u8> {
        self.state
            .borrow()
            .view
            .scene
            .outer_wall_texture()
            .map(|t| t.rgba.clone())
            .unwrap_or_default()
    }

    /// Ids the host must dispose since the last call.
    pub fn drain_released(&mut self) -> Vec<f64> {
        self.state
            .borrow_mut()
            .view
            .scene
            .drain_released()
            .into_iter()
            .map(|(id, _)| id.0 as f64)
            .collect()
    }
}

impl Viewer {
    fn with_mesh<T: Default>(&self, index: usize, f: impl FnOnce(&MugMesh) -> T) -> T {
        let s = self.state.borrow();
        mesh_at(&s, index).map(f).unwrap_or_default()
    }

    fn project_texture(&mut self, editor: &Editor) -> Result<(), JsValue> {
        let template = editor.template()?;
        let size = self.state.borrow().texture_size;
        let texture = editor
            .renderer()
            .texture(&template.document, template.generation, size)
            .map_err(js_error)?;
        if !self.state.borrow_mut().view.apply_texture(texture) {
            log::debug!("texture for generation {} dropped", template.generation);
        }
        Ok(())
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.view.deactivate();
        }
    }
}

fn mesh_at(state: &ViewerState, index: usize) -> Option<&MugMesh> {
    state.view.scene.group()?.meshes().get(index)
}
