//! Hand tracking via the MediaPipe hand landmarker, run as a Python
//! subprocess.
//!
//! The model is the only piece of the pipeline that is not plain Rust, so it
//! sits behind the narrow [`LandmarkProvider`] trait: one call per frame,
//! zero or one hand back. Everything downstream (classifier, controller,
//! tests) only ever sees [`HandLandmarks`] in pixel coordinates.
//!
//! # Model setup
//!
//! Download the MediaPipe hand landmarker model:
//! wget https://storage.googleapis.com/mediapipe-models/hand_landmarker/hand_landmarker/float16/latest/hand_landmarker.task
//! Place it at: models/hand_landmarker.task, then create the helper venv:
//! python3 -m venv .venv && .venv/bin/pip install mediapipe numpy

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use serde::Deserialize;

use crate::error::Error;
use crate::types::{FrameBuffer, Point};

/// Hand landmark indices (MediaPipe hand landmark model convention).
///
/// - **MCP**: knuckle joint at the palm. - **PIP**: middle joint.
/// - **DIP**: joint below the tip. - **IP/CMC**: thumb equivalents.
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Bone connectivity of the 21-landmark hand, for the skeleton overlay.
pub const CONNECTIVITY: &[(usize, usize)] = {
    use landmarks::*;
    &[
        // Surround the palm:
        (WRIST, THUMB_CMC),
        (THUMB_CMC, INDEX_FINGER_MCP),
        (INDEX_FINGER_MCP, MIDDLE_FINGER_MCP),
        (MIDDLE_FINGER_MCP, RING_FINGER_MCP),
        (RING_FINGER_MCP, PINKY_MCP),
        (PINKY_MCP, WRIST),
        // Thumb:
        (THUMB_CMC, THUMB_MCP),
        (THUMB_MCP, THUMB_IP),
        (THUMB_IP, THUMB_TIP),
        // Index:
        (INDEX_FINGER_MCP, INDEX_FINGER_PIP),
        (INDEX_FINGER_PIP, INDEX_FINGER_DIP),
        (INDEX_FINGER_DIP, INDEX_FINGER_TIP),
        // Middle:
        (MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP),
        (MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP),
        (MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP),
        // Ring:
        (RING_FINGER_MCP, RING_FINGER_PIP),
        (RING_FINGER_PIP, RING_FINGER_DIP),
        (RING_FINGER_DIP, RING_FINGER_TIP),
        // Pinky:
        (PINKY_MCP, PINKY_PIP),
        (PINKY_PIP, PINKY_DIP),
        (PINKY_DIP, PINKY_TIP),
    ]
};

/// A single hand landmark in pixel coordinates. `z` is the model's relative
/// depth (wrist-centered); the painter only uses x/y.
#[derive(Clone, Copy, Debug, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Which hand the model saw. The mirrored camera feed is what the model
/// sees, so this is the handedness as it appears on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand: all 21 landmarks plus the model's confidence.
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; 21],
    pub confidence: f32,
    pub handedness: Handedness,
}

impl HandLandmarks {
    /// A landmark rounded to integer pixel coordinates.
    pub fn point(&self, index: usize) -> Point {
        let lm = &self.landmarks[index];
        (lm.x as i32, lm.y as i32)
    }

    pub fn index_tip(&self) -> Point {
        self.point(landmarks::INDEX_FINGER_TIP)
    }

    pub fn thumb_tip(&self) -> Point {
        self.point(landmarks::THUMB_TIP)
    }
}

/// The narrow seam between the painter and the landmark model. Anything
/// that can look at a frame and report zero or one hand fits here; tests
/// use a scripted stub.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<HandLandmarks>, Error>;
}

// -------- JSON structures for parsing the helper's output --------

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Hand tracker speaking to `hand_detect.py` over pipes: raw RGB frames in,
/// one JSON line per frame out.
pub struct MediaPipeTracker {
    process: Child,
    stdout_reader: BufReader<std::process::ChildStdout>,
    confidence_threshold: f32,
}

impl MediaPipeTracker {
    /// Start the Python subprocess and wait for its READY handshake.
    pub fn new() -> Result<Self, Error> {
        let script_path = std::env::current_dir()?.join("hand_detect.py");
        let venv_python = std::env::current_dir()?.join(".venv/bin/python");

        if !script_path.exists() {
            return Err(Error::Tracker(format!(
                "hand detection script not found at {}",
                script_path.display()
            )));
        }
        if !venv_python.exists() {
            return Err(Error::Tracker(
                "Python venv not found. Run: python3 -m venv .venv && \
                 .venv/bin/pip install mediapipe numpy"
                    .into(),
            ));
        }

        log::info!("starting MediaPipe hand landmarker subprocess");

        let mut process = Command::new(&venv_python)
            .arg(&script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Tracker(format!("spawn subprocess: {e}")))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::Tracker("subprocess has no stdout".into()))?;
        let mut stdout_reader = BufReader::new(stdout);

        let mut ready_line = String::new();
        stdout_reader.read_line(&mut ready_line)?;
        if ready_line.trim() != "READY" {
            return Err(Error::Tracker(format!(
                "subprocess did not signal ready, got: {ready_line}"
            )));
        }

        log::info!("hand landmarker ready");

        Ok(Self {
            process,
            stdout_reader,
            confidence_threshold: 0.5,
        })
    }

    #[allow(dead_code)]
    pub fn set_confidence_threshold(&mut self, threshold: f32) {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
    }
}

impl LandmarkProvider for MediaPipeTracker {
    /// Ship one frame to the helper and parse its answer. Returns the first
    /// hand above the confidence threshold, scaled to pixel coordinates.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<HandLandmarks>, Error> {
        let (w, h) = (frame.width, frame.height);
        if w == 0 || h == 0 {
            return Ok(None);
        }

        // Unpack 0x00RRGGBB into the raw RGB byte stream the helper expects.
        let mut rgb = Vec::with_capacity(w * h * 3);
        for &px in &frame.pixels {
            rgb.push((px >> 16) as u8);
            rgb.push((px >> 8) as u8);
            rgb.push(px as u8);
        }

        // Header (width, height, channels as LE u32) + pixel data.
        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or_else(|| Error::Tracker("subprocess has no stdin".into()))?;
        stdin.write_all(&(w as u32).to_le_bytes())?;
        stdin.write_all(&(h as u32).to_le_bytes())?;
        stdin.write_all(&3u32.to_le_bytes())?;
        stdin.write_all(&rgb)?;
        stdin.flush()?;

        let mut response = String::new();
        self.stdout_reader.read_line(&mut response)?;

        let result: DetectionResult = serde_json::from_str(&response)?;
        if let Some(error) = result.error {
            log::warn!("hand landmarker: {error}");
            return Ok(None);
        }

        for hand in result.hands {
            if hand.score < self.confidence_threshold {
                continue;
            }
            if hand.landmarks.len() != 21 {
                log::warn!("expected 21 landmarks, got {}", hand.landmarks.len());
                continue;
            }

            // The model reports handedness of the image it saw; the frame
            // is already mirrored, so no swap is needed here.
            let handedness = match hand.handedness.as_str() {
                "Left" => Handedness::Left,
                _ => Handedness::Right,
            };

            let mut lms = [Landmark::default(); 21];
            for (out, lm) in lms.iter_mut().zip(&hand.landmarks) {
                *out = Landmark {
                    x: lm.x * w as f32,
                    y: lm.y * h as f32,
                    z: lm.z,
                };
            }

            log::debug!(
                "hand: {:?} (confidence={:.2}), index_tip=({:.0},{:.0})",
                handedness,
                hand.score,
                lms[landmarks::INDEX_FINGER_TIP].x,
                lms[landmarks::INDEX_FINGER_TIP].y,
            );

            return Ok(Some(HandLandmarks {
                landmarks: lms,
                confidence: hand.score,
                handedness,
            }));
        }

        Ok(None)
    }
}

impl Drop for MediaPipeTracker {
    fn drop(&mut self) {
        // Kill the Python subprocess when the tracker is dropped.
        let _ = self.process.kill();
    }
}

/// Default model path the helper script loads.
#[allow(dead_code)]
pub fn default_model_path() -> std::path::PathBuf {
    Path::new("models/hand_landmarker.task").to_path_buf()
}
