use std::fmt::Display;

use js_sys::{Object, Reflect};
use mug_core::{FrameState, PointerButton, ScreenPoint};
use wasm_bindgen::JsValue;
use wrap_core::Side;

/// Error value handed back across the JS boundary.
pub fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn parse_side(side: &str) -> Result<Side, JsValue> {
    match side {
        "face" => Ok(Side::Face),
        "back" => Ok(Side::Back),
        other => Err(js_error(format!("unknown side: {other}"))),
    }
}

/// `MouseEvent.button` to the buttons the preview reacts to.
pub fn pointer_button(button: i16) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Left),
        2 => Some(PointerButton::Right),
        _ => None,
    }
}

/// Flat `[x0, y0, x1, y1, ...]` touch coordinates.
pub fn screen_points(coords: &[f64]) -> Vec<ScreenPoint> {
    coords
        .chunks_exact(2)
        .map(|c| ScreenPoint::new(c[0], c[1]))
        .collect()
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

/// `{ camera: {x, y, z}, rotationX, rotationY }` for the draw callback.
pub fn frame_object(frame: &FrameState) -> Result<JsValue, JsValue> {
    let camera = Object::new();
    set(&camera, "x", &frame.camera.x.into())?;
    set(&camera, "y", &frame.camera.y.into())?;
    set(&camera, "z", &frame.camera.z.into())?;
    let out = Object::new();
    set(&out, "camera", &camera)?;
    set(&out, "rotationX", &frame.pose.rotation_x.into())?;
    set(&out, "rotationY", &frame.pose.rotation_y.into())?;
    Ok(out.into())
}
