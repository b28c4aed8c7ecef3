// Opens the default camera and converts frames into a buffer suitable for
// the window. Frames are mirrored horizontally so the window behaves like a
// mirror: moving your hand right moves the on-screen hand right.

use crate::error::Error;
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Try to open a camera at a target resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        // 1) Choose the device (0 = default webcam)
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            fps,
        );

        // 2) Ask for RGB frames in the closest available format.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // 3) Create the camera (this might fail if no device exists).
        let mut cam =
            Camera::new(idx, req).map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // 4) Start streaming frames from the camera.
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // 5) The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        log::info!(
            "camera stream open: {}x{} (requested {}x{})",
            actual.width(),
            actual.height(),
            width,
            height
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame, convert it to 0x00RRGGBB pixels and mirror it.
    /// Blocks until the camera has a new frame.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        // 1) Pull a frame from the camera.
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // 2) Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // 3) Pack as u32 pixels, flipping each row right-to-left.
        let (w, h) = rgb_img.dimensions();
        let (w, h) = (w as usize, h as usize);
        let raw = rgb_img.as_raw();
        let mut out = vec![0u32; w * h];
        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let src = (row + x) * 3;
                let r = raw[src] as u32;
                let g = raw[src + 1] as u32;
                let b = raw[src + 2] as u32;
                out[row + (w - 1 - x)] = (r << 16) | (g << 8) | b;
            }
        }

        Ok(FrameBuffer {
            width: w,
            height: h,
            pixels: out,
        })
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    // Release the device on every exit path, including errors.
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("stopping camera stream: {e}");
        }
    }
}
