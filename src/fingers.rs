//! Finger-state classification: which fingers are raised this frame.
//!
//! Purely geometric, one frame at a time, no smoothing. An extended finger
//! holds its tip above the PIP joint when the hand is upright; the thumb
//! extends sideways instead, so it compares x against the IP joint in the
//! direction the thumb points for the reported handedness.

use crate::config::FINGER_TOLERANCE;
use crate::hand::{HandLandmarks, Handedness, landmarks as lm};

/// Raised/extended flag per finger for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// All fingers down (fist, or nothing classifiable).
    pub const NONE: FingerState = FingerState {
        thumb: false,
        index: false,
        middle: false,
        ring: false,
        pinky: false,
    };

    pub fn count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&up| up)
            .count()
    }
}

/// Classify one hand. Fails closed: malformed coordinates report every
/// finger down so downstream logic sees "no gesture" instead of garbage.
pub fn classify(hand: &HandLandmarks) -> FingerState {
    if hand
        .landmarks
        .iter()
        .any(|l| !l.x.is_finite() || !l.y.is_finite())
    {
        return FingerState::NONE;
    }

    // Image y grows downward, so "above" means numerically smaller.
    let raised = |tip: usize, pip: usize| {
        hand.landmarks[pip].y - hand.landmarks[tip].y > FINGER_TOLERANCE
    };

    let thumb_tip = hand.landmarks[lm::THUMB_TIP].x;
    let thumb_ip = hand.landmarks[lm::THUMB_IP].x;
    let thumb = match hand.handedness {
        // On the mirrored feed a right hand's thumb points toward larger x.
        Handedness::Right => thumb_tip - thumb_ip > FINGER_TOLERANCE,
        Handedness::Left => thumb_ip - thumb_tip > FINGER_TOLERANCE,
    };

    FingerState {
        thumb,
        index: raised(lm::INDEX_FINGER_TIP, lm::INDEX_FINGER_PIP),
        middle: raised(lm::MIDDLE_FINGER_TIP, lm::MIDDLE_FINGER_PIP),
        ring: raised(lm::RING_FINGER_TIP, lm::RING_FINGER_PIP),
        pinky: raised(lm::PINKY_TIP, lm::PINKY_PIP),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::hand::{HandLandmarks, Handedness, Landmark, landmarks as lm};

    /// A fist at the center of a 1280x720 frame: every tip slightly below
    /// its PIP, thumb tip tucked level with its IP.
    pub fn fist(handedness: Handedness) -> HandLandmarks {
        let mut landmarks = [Landmark::default(); 21];
        for (i, l) in landmarks.iter_mut().enumerate() {
            *l = Landmark {
                x: 600.0 + i as f32 * 5.0,
                y: 400.0,
                z: 0.0,
            };
        }
        for (tip, pip) in [
            (lm::INDEX_FINGER_TIP, lm::INDEX_FINGER_PIP),
            (lm::MIDDLE_FINGER_TIP, lm::MIDDLE_FINGER_PIP),
            (lm::RING_FINGER_TIP, lm::RING_FINGER_PIP),
            (lm::PINKY_TIP, lm::PINKY_PIP),
        ] {
            landmarks[pip].y = 380.0;
            landmarks[tip].y = 400.0; // below the joint: curled
        }
        landmarks[lm::THUMB_IP].x = 560.0;
        landmarks[lm::THUMB_TIP].x = 560.0; // level with the joint: tucked
        HandLandmarks {
            landmarks,
            confidence: 0.9,
            handedness,
        }
    }

    /// Raise one non-thumb finger by moving its tip well above its PIP.
    pub fn raise(hand: &mut HandLandmarks, tip: usize, pip: usize) {
        hand.landmarks[tip].y = hand.landmarks[pip].y - 60.0;
    }

    /// Extend the thumb outward for the hand's handedness.
    pub fn extend_thumb(hand: &mut HandLandmarks) {
        let ip = hand.landmarks[lm::THUMB_IP].x;
        hand.landmarks[lm::THUMB_TIP].x = match hand.handedness {
            Handedness::Right => ip + 50.0,
            Handedness::Left => ip - 50.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{extend_thumb, fist, raise};
    use super::*;
    use crate::hand::Handedness;

    #[test]
    fn fist_reports_nothing_raised() {
        let hand = fist(Handedness::Right);
        assert_eq!(classify(&hand), FingerState::NONE);
    }

    #[test]
    fn index_above_pip_is_raised() {
        let mut hand = fist(Handedness::Right);
        raise(&mut hand, lm::INDEX_FINGER_TIP, lm::INDEX_FINGER_PIP);
        let state = classify(&hand);
        assert!(state.index);
        assert_eq!(state.count(), 1);
    }

    #[test]
    fn tip_within_tolerance_stays_down() {
        let mut hand = fist(Handedness::Right);
        // Above the PIP, but not beyond the tolerance band.
        hand.landmarks[lm::INDEX_FINGER_TIP].y =
            hand.landmarks[lm::INDEX_FINGER_PIP].y - FINGER_TOLERANCE;
        assert!(!classify(&hand).index);
    }

    #[test]
    fn all_four_fingers_raised() {
        let mut hand = fist(Handedness::Left);
        raise(&mut hand, lm::INDEX_FINGER_TIP, lm::INDEX_FINGER_PIP);
        raise(&mut hand, lm::MIDDLE_FINGER_TIP, lm::MIDDLE_FINGER_PIP);
        raise(&mut hand, lm::RING_FINGER_TIP, lm::RING_FINGER_PIP);
        raise(&mut hand, lm::PINKY_TIP, lm::PINKY_PIP);
        let state = classify(&hand);
        assert!(state.index && state.middle && state.ring && state.pinky);
        assert!(!state.thumb);
    }

    #[test]
    fn thumb_direction_follows_handedness() {
        let mut right = fist(Handedness::Right);
        extend_thumb(&mut right);
        assert!(classify(&right).thumb);

        // The same outward offset in the wrong direction is a tucked thumb.
        let mut left = fist(Handedness::Left);
        left.landmarks[lm::THUMB_TIP].x = left.landmarks[lm::THUMB_IP].x + 50.0;
        assert!(!classify(&left).thumb);

        extend_thumb(&mut left);
        // extend_thumb overwrote the tip; now it points the left way.
        assert!(classify(&left).thumb);
    }

    #[test]
    fn malformed_landmarks_fail_closed() {
        let mut hand = fist(Handedness::Right);
        raise(&mut hand, lm::INDEX_FINGER_TIP, lm::INDEX_FINGER_PIP);
        hand.landmarks[lm::WRIST].y = f32::NAN;
        assert_eq!(classify(&hand), FingerState::NONE);
    }
}
