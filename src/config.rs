// Compile-time tunables. One place to tweak the demo without hunting
// through the frame loop.

/// Requested capture size; the stream may deliver something close instead,
/// and every buffer in the program follows the actual size.
pub const CAMERA_WIDTH: u32 = 1280;
pub const CAMERA_HEIGHT: u32 = 720;
pub const CAMERA_FPS: u32 = 30;

/// Directory the header overlay images are loaded from, relative to the
/// working directory.
pub const HEADER_DIR: &str = "header";

/// Height of the header strip at the top of the frame. Selection boxes
/// live inside this band.
pub const HEADER_HEIGHT: usize = 100;

/// Brush radius bounds for the thumb-index sizing gesture.
pub const BRUSH_MIN: i32 = 4;
pub const BRUSH_MAX: i32 = 40;
pub const BRUSH_DEFAULT: i32 = 8;

/// Thumb-index pixel distances mapped onto [BRUSH_MIN, BRUSH_MAX].
pub const SIZE_DIST_MIN: f32 = 30.0;
pub const SIZE_DIST_MAX: f32 = 250.0;

/// Eraser radius. Fixed; the sizing gesture only affects the brush.
pub const ERASER_RADIUS: i32 = 64;

/// A fingertip must clear its proximal joint by this many pixels before
/// the finger counts as raised. Absorbs landmark jitter near the fold.
pub const FINGER_TOLERANCE: f32 = 4.0;
