// Virtual painter:
// • Live camera (mirrored) is always the base image.
// • Index finger up: you paint onto a persistent canvas in the active color.
// • Index + middle up: selection mode — touch a header box to switch
//   color or pick the eraser.
// • Thumb + index up: pinch wider/narrower to resize the brush.
// • Fist (or losing the hand) lifts the pen. ESC or Q quits.

mod camera;
mod config;
mod draw;
mod error;
mod fingers;
mod hand;
mod overlay;
mod paint;
mod types;

use std::time::{Duration, Instant};

use camera::CameraCapture;
use config::{CAMERA_FPS, CAMERA_HEIGHT, CAMERA_WIDTH, ERASER_RADIUS, HEADER_DIR, HEADER_HEIGHT};
use draw::Drawer;
use error::Error;
use hand::{LandmarkProvider, MediaPipeTracker};
use overlay::{HeaderSet, Tool};
use paint::Painter;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(0, CAMERA_WIDTH, CAMERA_HEIGHT, CAMERA_FPS)?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);
    let mut drawer = Drawer::new("Virtual Painter", w, h)?;

    /* --- Tool header, hand tracker, paint state --- */
    let mut headers = HeaderSet::load(HEADER_DIR, w)?;
    let mut tracker = MediaPipeTracker::new()?;
    let mut painter = Painter::new(w, h);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_requested() {
        /* 1) Grab a fresh mirrored frame (blocks on the camera). */
        let mut frame = cam.next_frame()?;

        /* 2) Look for a hand. A tracker hiccup on a single frame degrades
        to "no hand"; only the camera is allowed to end the run. */
        let tracked = match tracker.detect(&frame) {
            Ok(tracked) => tracked,
            Err(e) => {
                log::warn!("hand tracking: {e}");
                None
            }
        };

        /* 3) Classify fingers and run the paint controller. */
        let mode = match &tracked {
            Some(hand) => {
                let fingers = fingers::classify(hand);
                painter.update(fingers, hand, &mut headers).label()
            }
            None => {
                painter.hand_lost();
                "NO HAND"
            }
        };

        /* 4) Compose: strokes over video, then header, skeleton, cursor, HUD. */
        paint::composite_over(&mut frame, painter.canvas());
        headers.blit(&mut frame);
        if let Some(hand) = &tracked {
            draw::draw_skeleton(&mut frame, hand);
            let (cx, cy) = hand.index_tip();
            match headers.active_tool() {
                Tool::Brush(color) => {
                    draw::fill_circle(&mut frame, cx, cy, painter.brush_size(), color)
                }
                Tool::Eraser => draw::draw_circle(&mut frame, cx, cy, ERASER_RADIUS, 0x00FFFFFF),
            }
        }

        let tool_tag = match headers.active_tool() {
            Tool::Brush(_) => "PAINT",
            Tool::Eraser => "ERASE",
        };
        let hud = format!("{mode} | {tool_tag} | {hud_fps_text}");
        draw::draw_text_5x7(&mut frame, 8, HEADER_HEIGHT as i32 + 8, &hud, 0x00FFFFFF);

        /* 5) Present to the window. */
        drawer.present(&frame)?;

        /* 6) FPS counter (HUD + debug log once per second). */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
