//! Scene constants for the 3D preview.

/// Scene units per millimeter.
pub const SCENE_SCALE: f64 = 0.03;
/// Simulated ceramic wall thickness (mm).
pub const CERAMIC_THICKNESS_MM: f64 = 4.0;
/// Top radius of the tapered body relative to the bottom radius.
pub const TOP_RADIUS_RATIO: f64 = 0.9;
/// Radial segments of walls and bottom disks.
pub const WALL_SEGMENTS: usize = 32;
/// Handle torus: major radius as a fraction of the scene height.
pub const HANDLE_RADIUS_RATIO: f64 = 1.0 / 3.0;
/// Handle tube radius as a fraction of the scaled handle area width.
pub const HANDLE_TUBE_RATIO: f64 = 0.4;
pub const HANDLE_RADIAL_SEGMENTS: usize = 8;
pub const HANDLE_TUBULAR_SEGMENTS: usize = 16;
pub const LIP_RADIAL_SEGMENTS: usize = 8;
pub const LIP_TUBULAR_SEGMENTS: usize = 32;
/// Plain ceramic colour.
pub const CERAMIC_COLOR: u32 = 0xffffff;

// Camera and gesture tuning.
pub const CAMERA_START_Z: f64 = 5.0;
pub const CAMERA_MIN_Z: f64 = 2.0;
pub const CAMERA_MAX_Z: f64 = 15.0;
/// Radians of mug rotation per pixel of drag.
pub const ROTATE_SPEED: f64 = 0.01;
/// Scene units of camera travel per pixel of pan.
pub const PAN_SPEED: f64 = 0.01;
/// Scene units of camera travel per wheel/pinch unit.
pub const ZOOM_SPEED: f64 = 0.01;
/// Idle auto-rotation period for one full revolution (ms).
pub const AUTO_ROTATION_PERIOD_MS: f64 = 10_000.0;

/// Texture size used when the host cannot report the preview size.
pub const FALLBACK_TEXTURE_WIDTH: u32 = 1024;
pub const FALLBACK_TEXTURE_HEIGHT: u32 = 512;
