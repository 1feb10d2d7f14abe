//! Pointer, wheel and touch handling for the 3D preview.

use std::f64::consts::TAU;

use crate::constants::{
    AUTO_ROTATION_PERIOD_MS, CAMERA_MAX_Z, CAMERA_MIN_Z, CAMERA_START_Z, PAN_SPEED, ROTATE_SPEED,
    ZOOM_SPEED,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchMode {
    Single { last: ScreenPoint },
    Pinch { distance: f64, center: ScreenPoint },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        button: PointerButton,
        last: ScreenPoint,
    },
    Touching(TouchMode),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: CAMERA_START_Z,
        }
    }
}

impl Camera {
    fn pan(&mut self, dx: f64, dy: f64) {
        self.x -= dx * PAN_SPEED;
        self.y += dy * PAN_SPEED;
    }

    fn dolly(&mut self, dz: f64) {
        self.z = (self.z + dz).clamp(CAMERA_MIN_Z, CAMERA_MAX_Z);
    }
}

/// Euler rotation of the mug group (radians).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MugPose {
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl MugPose {
    fn turn(&mut self, dx: f64, dy: f64) {
        self.rotation_y += dx * ROTATE_SPEED;
        self.rotation_x += dy * ROTATE_SPEED;
    }
}

/// Idle spin: one revolution per period, origin reset every revolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoRotation {
    origin: Option<f64>,
}

impl AutoRotation {
    pub fn start(&mut self, now_ms: f64) {
        self.origin = Some(now_ms);
    }

    pub fn stop(&mut self) {
        self.origin = None;
    }

    pub fn is_running(&self) -> bool {
        self.origin.is_some()
    }

    /// Y rotation for `now_ms`, or `None` when stopped.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        let origin = self.origin?;
        let elapsed = (now_ms - origin).max(0.0);
        let angle = elapsed / AUTO_ROTATION_PERIOD_MS * TAU;
        if elapsed >= AUTO_ROTATION_PERIOD_MS {
            self.origin = Some(now_ms);
        }
        Some(angle)
    }
}

/// Input state machine driving the camera and mug pose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Controls {
    pub gesture: Gesture,
    pub camera: Camera,
    pub pose: MugPose,
    pub auto_rotation: AutoRotation,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, button: PointerButton, at: ScreenPoint) {
        self.auto_rotation.stop();
        self.gesture = Gesture::Dragging { button, last: at };
    }

    pub fn pointer_move(&mut self, at: ScreenPoint) {
        let Gesture::Dragging { button, last } = &mut self.gesture else {
            return;
        };
        let (dx, dy) = (at.x - last.x, at.y - last.y);
        match button {
            PointerButton::Left => self.pose.turn(dx, dy),
            PointerButton::Right => self.camera.pan(dx, dy),
        }
        *last = at;
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        if matches!(self.gesture, Gesture::Dragging { button: b, .. } if b == button) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.auto_rotation.stop();
        self.camera.dolly(delta_y * ZOOM_SPEED);
    }

    pub fn touch_start(&mut self, touches: &[ScreenPoint]) {
        self.auto_rotation.stop();
        match *touches {
            [a, b, ..] => {
                self.gesture = Gesture::Touching(TouchMode::Pinch {
                    distance: a.distance(b),
                    center: a.midpoint(b),
                })
            }
            [a] => self.gesture = Gesture::Touching(TouchMode::Single { last: a }),
            [] => {}
        }
    }

    pub fn touch_move(&mut self, touches: &[ScreenPoint]) {
        let Gesture::Touching(mode) = &mut self.gesture else {
            return;
        };
        match (mode, touches) {
            (TouchMode::Pinch { distance, center }, [a, b]) => {
                let d = a.distance(*b);
                let c = a.midpoint(*b);
                self.camera.dolly(-(d - *distance) * ZOOM_SPEED);
                self.camera.pan(c.x - center.x, c.y - center.y);
                *distance = d;
                *center = c;
            }
            (TouchMode::Single { last }, [a]) => {
                self.pose.turn(a.x - last.x, a.y - last.y);
                *last = *a;
            }
            _ => {}
        }
    }

    /// `remaining` are the touches still on the surface.
    pub fn touch_end(&mut self, remaining: &[ScreenPoint]) {
        let Gesture::Touching(mode) = self.gesture else {
            return;
        };
        match (mode, remaining) {
            (_, []) => self.gesture = Gesture::Idle,
            (TouchMode::Pinch { .. }, [a]) => {
                self.gesture = Gesture::Touching(TouchMode::Single { last: *a })
            }
            _ => {}
        }
    }

    pub fn touch_cancel(&mut self) {
        if matches!(self.gesture, Gesture::Touching(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Advances auto-rotation to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(angle) = self.auto_rotation.tick(now_ms) {
            self.pose.rotation_y = angle;
        }
    }
}
