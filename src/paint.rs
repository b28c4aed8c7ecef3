//! The paint controller: maps each frame's finger state to one action and
//! accumulates strokes onto the persistent canvas.
//!
//! The canvas is an all-black buffer of the frame's size; black is the
//! transparency key, so the eraser is just a large brush painting black.
//! The only state carried between frames is the previous fingertip position
//! and the selected tool; both survive until overwritten, and the position
//! memory is cleared whenever the draw gesture is absent so a fresh stroke
//! never connects to a stale point.

use crate::config::{
    BRUSH_DEFAULT, BRUSH_MAX, BRUSH_MIN, ERASER_RADIUS, SIZE_DIST_MAX, SIZE_DIST_MIN,
};
use crate::draw::draw_thick_line;
use crate::fingers::FingerState;
use crate::hand::{HandLandmarks, landmarks as lm};
use crate::overlay::{HeaderSet, Tool};
use crate::types::{FrameBuffer, Point};

/// Canvas pixels equal to this value show the live video through.
pub const CANVAS_CLEAR: u32 = 0;

/// The one action taken for a frame, decided by the finger vector alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// No recognized gesture; position memory is dropped.
    Idle,
    /// Index only: extend the current stroke.
    Draw,
    /// Index + middle: hit-test the header regions, no drawing.
    Select,
    /// Thumb + index: brush radius from the thumb-index distance.
    SizeBrush,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Idle => "IDLE",
            Action::Draw => "DRAW",
            Action::Select => "SELECT",
            Action::SizeBrush => "SIZE",
        }
    }
}

/// Pure gesture mapping. Every combination not in the table is Idle, which
/// keeps an ambiguous frame from extending a stroke.
pub fn action_for(fingers: FingerState) -> Action {
    let f = fingers;
    match (f.thumb, f.index, f.middle, f.ring, f.pinky) {
        (false, true, false, false, false) => Action::Draw,
        (false, true, true, false, false) => Action::Select,
        (true, true, false, false, false) => Action::SizeBrush,
        _ => Action::Idle,
    }
}

/// Brush radius for a thumb-index pixel distance: linear between the
/// distance bounds, clamped to [BRUSH_MIN, BRUSH_MAX].
pub fn size_for_distance(dist: f32) -> i32 {
    let t = ((dist - SIZE_DIST_MIN) / (SIZE_DIST_MAX - SIZE_DIST_MIN)).clamp(0.0, 1.0);
    (BRUSH_MIN as f32 + t * (BRUSH_MAX - BRUSH_MIN) as f32).round() as i32
}

pub struct Painter {
    canvas: FrameBuffer,
    prev: Option<Point>,
    brush_size: i32,
}

impl Painter {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            canvas: FrameBuffer::new(width, height),
            prev: None,
            brush_size: BRUSH_DEFAULT,
        }
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    pub fn brush_size(&self) -> i32 {
        self.brush_size
    }

    /// The hand left the frame: invalidate the position memory so the
    /// stroke does not jump when tracking comes back.
    pub fn hand_lost(&mut self) {
        self.prev = None;
    }

    /// One controller step. Returns the action taken, for the HUD.
    pub fn update(
        &mut self,
        fingers: FingerState,
        hand: &HandLandmarks,
        headers: &mut HeaderSet,
    ) -> Action {
        let action = action_for(fingers);
        match action {
            Action::Draw => {
                let tip = hand.index_tip();
                if let Some(prev) = self.prev {
                    let (radius, color) = match headers.active_tool() {
                        Tool::Brush(color) => (self.brush_size, color),
                        Tool::Eraser => (ERASER_RADIUS, CANVAS_CLEAR),
                    };
                    draw_thick_line(&mut self.canvas, prev, tip, radius, color);
                }
                // With empty memory only the point is recorded; drawing
                // starts on the next frame.
                self.prev = Some(tip);
            }
            Action::Select => {
                self.prev = None;
                if let Some(region) = headers.hit_test(hand.index_tip()) {
                    headers.select(region);
                }
            }
            Action::SizeBrush => {
                self.prev = None;
                let a = &hand.landmarks[lm::INDEX_FINGER_TIP];
                let b = &hand.landmarks[lm::THUMB_TIP];
                let dist = (a.x - b.x).hypot(a.y - b.y);
                self.brush_size = size_for_distance(dist);
            }
            Action::Idle => {
                self.prev = None;
            }
        }
        action
    }
}

/// Merge the canvas over the live frame: any pixel ever painted (non-key)
/// fully replaces the video pixel, everything else shows the video
/// unchanged.
pub fn composite_over(live: &mut FrameBuffer, canvas: &FrameBuffer) {
    debug_assert_eq!(live.width, canvas.width);
    debug_assert_eq!(live.height, canvas.height);
    let len = live.pixels.len().min(canvas.pixels.len());
    for i in 0..len {
        let c = canvas.pixels[i];
        if c != CANVAS_CLEAR {
            live.pixels[i] = c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingers::fixtures::fist;
    use crate::hand::Handedness;

    const W: usize = 1280;
    const H: usize = 720;

    fn draw_gesture() -> FingerState {
        FingerState {
            index: true,
            ..FingerState::NONE
        }
    }

    fn select_gesture() -> FingerState {
        FingerState {
            index: true,
            middle: true,
            ..FingerState::NONE
        }
    }

    fn size_gesture() -> FingerState {
        FingerState {
            thumb: true,
            index: true,
            ..FingerState::NONE
        }
    }

    /// A hand whose index tip sits at (x, y).
    fn hand_at(x: f32, y: f32) -> HandLandmarks {
        let mut hand = fist(Handedness::Right);
        hand.landmarks[lm::INDEX_FINGER_TIP].x = x;
        hand.landmarks[lm::INDEX_FINGER_TIP].y = y;
        hand
    }

    fn active_color(headers: &HeaderSet) -> u32 {
        match headers.active_tool() {
            Tool::Brush(c) => c,
            Tool::Eraser => panic!("expected a brush to be active"),
        }
    }

    #[test]
    fn two_draw_frames_leave_a_segment() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);
        let color = active_color(&headers);

        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        // First frame only records the point.
        assert!(painter.canvas().pixels.iter().all(|&p| p == CANVAS_CLEAR));

        painter.update(draw_gesture(), &hand_at(300.0, 300.0), &mut headers);
        for x in [200usize, 250, 300] {
            assert_eq!(painter.canvas().get(x, 300), color, "missing at x={x}");
        }
    }

    #[test]
    fn fist_clears_memory_so_no_segment_connects() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);

        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        let action = painter.update(FingerState::NONE, &hand_at(210.0, 300.0), &mut headers);
        assert_eq!(action, Action::Idle);
        painter.update(draw_gesture(), &hand_at(600.0, 300.0), &mut headers);

        // Nothing between the old and new positions.
        assert_eq!(painter.canvas().get(400, 300), CANVAS_CLEAR);
    }

    #[test]
    fn hand_lost_invalidates_memory() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);

        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        painter.hand_lost();
        painter.update(draw_gesture(), &hand_at(500.0, 300.0), &mut headers);
        assert_eq!(painter.canvas().get(350, 300), CANVAS_CLEAR);
    }

    #[test]
    fn selection_inside_region_switches_tool() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);
        let before = headers.active_tool();

        // Center of the second slot, inside the header strip.
        let action = painter.update(select_gesture(), &hand_at(480.0, 50.0), &mut headers);
        assert_eq!(action, Action::Select);
        assert_ne!(headers.active_tool(), before);
    }

    #[test]
    fn selection_outside_all_regions_keeps_tool() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);
        let before = headers.active_tool();

        // Below the header strip entirely.
        painter.update(select_gesture(), &hand_at(480.0, 400.0), &mut headers);
        assert_eq!(headers.active_tool(), before);
    }

    #[test]
    fn selection_frame_suppresses_drawing() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);

        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        painter.update(select_gesture(), &hand_at(480.0, 50.0), &mut headers);
        painter.update(draw_gesture(), &hand_at(600.0, 300.0), &mut headers);

        assert_eq!(painter.canvas().get(400, 300), CANVAS_CLEAR);
    }

    #[test]
    fn brush_size_is_monotonic_and_clamped() {
        let mut last = 0;
        for d in (0..400).step_by(10) {
            let size = size_for_distance(d as f32);
            assert!(size >= BRUSH_MIN && size <= BRUSH_MAX);
            assert!(size >= last, "size shrank at distance {d}");
            last = size;
        }
        assert_eq!(size_for_distance(0.0), BRUSH_MIN);
        assert_eq!(size_for_distance(10_000.0), BRUSH_MAX);
    }

    #[test]
    fn sizing_gesture_updates_brush_from_thumb_distance() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);

        let mut hand = hand_at(400.0, 400.0);
        hand.landmarks[lm::THUMB_TIP].x = 400.0 + SIZE_DIST_MAX;
        hand.landmarks[lm::THUMB_TIP].y = 400.0;
        let action = painter.update(size_gesture(), &hand, &mut headers);
        assert_eq!(action, Action::SizeBrush);
        assert_eq!(painter.brush_size(), BRUSH_MAX);

        hand.landmarks[lm::THUMB_TIP].x = 400.0 + SIZE_DIST_MIN;
        painter.update(size_gesture(), &hand, &mut headers);
        assert_eq!(painter.brush_size(), BRUSH_MIN);
    }

    #[test]
    fn eraser_paints_the_key_color() {
        let mut painter = Painter::new(W, H);
        let mut headers = HeaderSet::synthetic(W, 4);

        // Lay down a stroke, then erase back over it.
        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        painter.update(draw_gesture(), &hand_at(300.0, 300.0), &mut headers);
        assert_ne!(painter.canvas().get(250, 300), CANVAS_CLEAR);

        headers.select(3); // rightmost region: the eraser
        painter.hand_lost();
        painter.update(draw_gesture(), &hand_at(200.0, 300.0), &mut headers);
        painter.update(draw_gesture(), &hand_at(300.0, 300.0), &mut headers);
        assert_eq!(painter.canvas().get(250, 300), CANVAS_CLEAR);
    }

    #[test]
    fn composite_keeps_untouched_pixels_identical() {
        let mut live = FrameBuffer::new(64, 64);
        for (i, px) in live.pixels.iter_mut().enumerate() {
            *px = i as u32 | 0x00010101; // arbitrary non-key pattern
        }
        let reference = live.clone();

        let mut canvas = FrameBuffer::new(64, 64);
        canvas.pixels[10] = 0x00FF00FF;

        composite_over(&mut live, &canvas);
        assert_eq!(live.pixels[10], 0x00FF00FF);
        for i in 0..live.pixels.len() {
            if i != 10 {
                assert_eq!(live.pixels[i], reference.pixels[i], "pixel {i} changed");
            }
        }
    }

    #[test]
    fn gesture_table_is_exhaustive_and_exclusive() {
        assert_eq!(action_for(draw_gesture()), Action::Draw);
        assert_eq!(action_for(select_gesture()), Action::Select);
        assert_eq!(action_for(size_gesture()), Action::SizeBrush);
        assert_eq!(action_for(FingerState::NONE), Action::Idle);
        // Three fingers up is not a recognized gesture.
        let three = FingerState {
            index: true,
            middle: true,
            ring: true,
            ..FingerState::NONE
        };
        assert_eq!(action_for(three), Action::Idle);
        // An open palm is not a draw gesture either.
        let palm = FingerState {
            thumb: true,
            index: true,
            middle: true,
            ring: true,
            pinky: true,
        };
        assert_eq!(action_for(palm), Action::Idle);
    }
}
