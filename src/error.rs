// Crate-wide error type. Every variant states *where* things went wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String),   // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String),  // Grabbing/decoding a frame failed
    #[error("Overlay load error: {0}")]
    OverlayLoad(String),  // Reading the header images failed
    #[error("Hand tracker error: {0}")]
    Tracker(String),      // The landmark subprocess misbehaved
    #[error("Hand tracker I/O error: {0}")]
    TrackerIo(#[from] std::io::Error),
    #[error("Hand tracker protocol error: {0}")]
    TrackerProtocol(#[from] serde_json::Error),
}
